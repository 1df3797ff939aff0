use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::middleware::{Authorized, PartnerOnly};
use crate::schemas::{AccountResponse, LinkedApplication, PartnerProfileResponse};
use crate::services::accounts;
use crate::state::AppState;

pub fn partner_routes(state: AppState) -> Router {
    Router::new().route("/me", get(get_profile)).with_state(state)
}

/// The signed-in partner and the application their account came from
async fn get_profile(
    auth: Authorized<PartnerOnly>,
    State(state): State<AppState>,
) -> Result<Json<PartnerProfileResponse>> {
    let account = auth.context().account.clone();
    let application = accounts::linked_application(&state.db, &account).await?;

    Ok(Json(PartnerProfileResponse {
        account: AccountResponse::from(account),
        application: application.map(LinkedApplication::from),
    }))
}
