use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::Result;
use crate::schemas::SubmissionResponse;
use crate::services::applications::ApplicationSubmission;
use crate::state::AppState;

pub fn application_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(submit_application))
        .with_state(state)
}

/// Public partner application form
async fn submit_application(
    State(state): State<AppState>,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<(StatusCode, Json<SubmissionResponse>)> {
    let record = state.intake.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Thanks for applying. We'll review your application and be in touch by email."
                .to_string(),
            application_id: record.id,
        }),
    ))
}
