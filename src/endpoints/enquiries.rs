use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::services::enquiries::Enquiry;
use crate::state::AppState;

pub fn enquiry_routes(state: AppState) -> Router {
    Router::new().route("/", post(submit_enquiry)).with_state(state)
}

/// Contact, training and wellbeing-assessment forms
async fn submit_enquiry(
    State(state): State<AppState>,
    Json(enquiry): Json<Enquiry>,
) -> Result<Json<serde_json::Value>> {
    let kind = state.enquiries.submit(enquiry).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "kind": kind,
        "message": "Thanks for getting in touch. We'll reply as soon as we can."
    })))
}
