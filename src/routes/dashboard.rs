//! Dashboard routes: the aggregated overview payload.

use axum::{extract::State, Json};

use crate::errors::ApiResponse;
use crate::middleware::auth::CurrentUser;
use crate::services::analytics::{self, DashboardOverview};
use crate::AppState;

/// GET /api/v1/dashboard/overview — tiles, charts, and the response table.
///
/// Always 200 for an authenticated caller: a failed fetch degrades to a
/// zero-valued payload rather than an error response.
pub async fn overview(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Json<ApiResponse<DashboardOverview>> {
    let overview = analytics::get_overview(&state.db).await;
    ApiResponse::success(overview)
}
