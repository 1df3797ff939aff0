//! Email bodies for the portal notifications. Each template yields a subject
//! plus matching text and html bodies.

use chrono::{DateTime, Utc};

use crate::models::partner_application;

pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Operator summary of a new partner application
pub fn application_received(application: &partner_application::Model) -> RenderedEmail {
    let company = application.company_name.as_deref().unwrap_or("-");

    let subject = format!("New partner application: {}", application.name);
    let text_body = format!(
        "A new partner application was submitted.\n\n\
         Name: {}\nEmail: {}\nPhone: {}\nCompany: {}\n\n{}\n\n\
         Application id: {}\nSubmitted: {}\n",
        application.name,
        application.email,
        application.phone,
        company,
        application.description,
        application.id,
        format_timestamp(&application.created_at),
    );
    let html_body = format!(
        "<h2>New partner application</h2>\
         <table>\
         <tr><td><strong>Name</strong></td><td>{}</td></tr>\
         <tr><td><strong>Email</strong></td><td>{}</td></tr>\
         <tr><td><strong>Phone</strong></td><td>{}</td></tr>\
         <tr><td><strong>Company</strong></td><td>{}</td></tr>\
         </table>\
         <p>{}</p>\
         <p><small>Application id {} submitted {}</small></p>",
        escape_html(&application.name),
        escape_html(&application.email),
        escape_html(&application.phone),
        escape_html(company),
        escape_html(&application.description).replace('\n', "<br>"),
        escape_html(&application.id),
        format_timestamp(&application.created_at),
    );

    RenderedEmail {
        subject,
        text_body,
        html_body,
    }
}

/// Applicant email carrying the invite code and sign-up link
pub fn invite_issued(
    application: &partner_application::Model,
    invite_code: &str,
    expires_at: &DateTime<Utc>,
    site_url: &str,
) -> RenderedEmail {
    let link = signup_link(site_url, &application.email, invite_code);

    let subject = "Your partner application has been approved".to_string();
    let text_body = format!(
        "Hi {},\n\n\
         Good news: your partner application has been approved.\n\n\
         Create your partner account here:\n{}\n\n\
         Or enter this invite code on the sign-up page: {}\n\n\
         The code can be used once and expires on {}.\n",
        application.name,
        link,
        invite_code,
        format_timestamp(expires_at),
    );
    let html_body = format!(
        "<p>Hi {},</p>\
         <p>Good news: your partner application has been approved.</p>\
         <p><a href=\"{}\">Create your partner account</a></p>\
         <p>Or enter this invite code on the sign-up page: <code>{}</code></p>\
         <p>The code can be used once and expires on {}.</p>",
        escape_html(&application.name),
        escape_html(&link),
        escape_html(invite_code),
        format_timestamp(expires_at),
    );

    RenderedEmail {
        subject,
        text_body,
        html_body,
    }
}

/// Sign-up URL with the email and code prefilled
pub fn signup_link(site_url: &str, email: &str, invite_code: &str) -> String {
    format!(
        "{}/partners/signup?email={}&code={}",
        site_url.trim_end_matches('/'),
        urlencoding::encode(email),
        urlencoding::encode(invite_code),
    )
}

/// Operator summary of a contact or enquiry form submission.
/// `fields` are rendered in order as label/value rows.
pub fn enquiry_received(kind_label: &str, fields: &[(&str, String)], message: &str) -> RenderedEmail {
    let subject = match fields.iter().find(|(label, _)| *label == "Name") {
        Some((_, name)) => format!("{} from {}", kind_label, name),
        None => kind_label.to_string(),
    };

    let mut text_body = format!("{}\n\n", kind_label);
    let mut rows = String::new();
    for (label, value) in fields {
        text_body.push_str(&format!("{}: {}\n", label, value));
        rows.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        ));
    }
    text_body.push_str(&format!("\n{}\n", message));

    let html_body = format!(
        "<h2>{}</h2><table>{}</table><p>{}</p>",
        escape_html(kind_label),
        rows,
        escape_html(message).replace('\n', "<br>"),
    );

    RenderedEmail {
        subject,
        text_body,
        html_body,
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
