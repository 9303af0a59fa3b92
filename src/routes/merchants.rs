use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::merchants::{MerchantDashboard, MerchantListItem, MerchantListQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Merchant,
    response::ApiResponse,
    services::merchant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/profile", get(profile))
        .route("/dashboard-stats", get(dashboard_stats))
}

#[utoipa::path(get, path = "/api/merchants", tag = "Merchants")]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MerchantListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MerchantListItem>>>> {
    Ok(Json(merchant_service::list(&state, &user, query).await?))
}

#[utoipa::path(get, path = "/api/merchants/profile", tag = "Merchants")]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    Ok(Json(merchant_service::profile(&state, &user).await?))
}

#[utoipa::path(get, path = "/api/merchants/dashboard-stats", tag = "Merchants")]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MerchantDashboard>>> {
    Ok(Json(
        merchant_service::dashboard_stats(&state, &user).await?,
    ))
}
