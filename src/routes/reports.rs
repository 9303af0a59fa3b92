use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reports::{CodReport, DateRangeQuery, ReturnsReport, SalesReport, ShippingReport},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Download},
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(sales))
        .route("/cod", get(cod))
        .route("/shipping", get(shipping))
        .route("/returns", get(returns))
        .route("/sales/export", get(export_sales))
        .route("/cod/export", get(export_cod))
}

#[utoipa::path(get, path = "/api/reports/sales", tag = "Reports")]
pub async fn sales(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    Ok(Json(report_service::sales(&state, &user, range).await?))
}

#[utoipa::path(get, path = "/api/reports/cod", tag = "Reports")]
pub async fn cod(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<CodReport>>> {
    Ok(Json(report_service::cod(&state, &user, range).await?))
}

#[utoipa::path(get, path = "/api/reports/shipping", tag = "Reports")]
pub async fn shipping(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<ShippingReport>>> {
    Ok(Json(report_service::shipping(&state, &user, range).await?))
}

#[utoipa::path(get, path = "/api/reports/returns", tag = "Reports")]
pub async fn returns(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<ReturnsReport>>> {
    Ok(Json(report_service::returns(&state, &user, range).await?))
}

#[utoipa::path(get, path = "/api/reports/sales/export", tag = "Reports")]
pub async fn export_sales(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Download> {
    report_service::export_sales(&state, &user, range).await
}

#[utoipa::path(get, path = "/api/reports/cod/export", tag = "Reports")]
pub async fn export_cod(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Download> {
    report_service::export_cod(&state, &user, range).await
}
