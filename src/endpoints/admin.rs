use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{AdminOnly, Authorized};
use crate::models::partner_application::ApplicationStatus;
use crate::schemas::{
    AccountResponse, ApplicationDetail, ApplicationListQuery, ApplicationSummary, Paginated,
    ReviewRequest, UpdateNotesRequest,
};
use crate::services::accounts;
use crate::services::applications::{ApplicationError, ApplicationFilter, StatusCounts};
use crate::state::AppState;

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/{id}", get(get_application))
        .route("/applications/{id}/review", post(review_application))
        .route("/applications/{id}/notes", patch(update_notes))
        .route("/partners", get(list_partners))
        .route("/stats", get(get_stats))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub applications: StatusCounts,
    pub partners: u64,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// `None` for an absent, empty or `all` filter
fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => ApplicationStatus::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter: {}", value))),
    }
}

// ============================================================================
// Application Review Endpoints
// ============================================================================

async fn list_applications(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Paginated<ApplicationSummary>>> {
    let filter = ApplicationFilter {
        status: parse_status_filter(query.status.as_deref())?,
        search: query.search,
        page: query.page,
        per_page: query.per_page,
    };

    let page = state.store.list(&filter).await?;
    Ok(Json(Paginated::from(page)))
}

async fn get_application(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>> {
    let record = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or(ApplicationError::NotFound)?;
    Ok(Json(ApplicationDetail::from(record)))
}

async fn review_application(
    auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ApplicationDetail>> {
    let updated = state
        .review
        .review(auth.context().actor(), &id, request.decision, request.notes)
        .await?;
    Ok(Json(ApplicationDetail::from(updated)))
}

async fn update_notes(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<ApplicationDetail>> {
    let updated = state.review.update_notes(&id, request.admin_notes).await?;
    Ok(Json(ApplicationDetail::from(updated)))
}

// ============================================================================
// Dashboard Endpoints
// ============================================================================

async fn list_partners(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<AccountResponse>>> {
    let (items, total, page, per_page) =
        accounts::list_partners(&state.db, query.page, query.per_page).await?;
    let items = items.into_iter().map(AccountResponse::from).collect();
    Ok(Json(Paginated::new(items, total, page, per_page)))
}

async fn get_stats(
    _auth: Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let applications = state.store.count_by_status().await?;
    let partners = accounts::count_partners(&state.db).await?;
    Ok(Json(StatsResponse {
        applications,
        partners,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_status_filter(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("Approved")).unwrap(),
            Some(ApplicationStatus::Approved)
        );
        assert!(matches!(
            parse_status_filter(Some("archived")),
            Err(AppError::BadRequest(_))
        ));
    }
}
