//! Dashboard handler.

use crate::error::AppError;
use crate::extractors::AuthPrincipal;
use crate::state::AppState;
use axum::{Json, extract::State};
use stockroom_core::dashboard::DashboardReport;

/// `GET /api/dashboard` — the full report, recomputed per request.
pub async fn report(
    State(state): State<AppState>,
    AuthPrincipal(_): AuthPrincipal,
) -> Result<Json<DashboardReport>, AppError> {
    Ok(Json(state.dashboard.report().await?))
}
