use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        merchants::MerchantListQuery,
        owner::{MerchantDetail, MerchantOverview, OwnerDashboard},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Merchant,
    response::ApiResponse,
    services::owner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/merchants", get(list_merchants))
        .route("/merchants/{id}", get(merchant_detail))
        .route("/merchants/{id}/toggle-status", patch(toggle_status))
        .route("/dashboard-stats", get(dashboard))
}

#[utoipa::path(get, path = "/api/owner/merchants", tag = "Owner")]
pub async fn list_merchants(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MerchantListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MerchantOverview>>>> {
    Ok(Json(
        owner_service::list_merchants(&state, &user, query).await?,
    ))
}

#[utoipa::path(get, path = "/api/owner/merchants/{id}", tag = "Owner")]
pub async fn merchant_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MerchantDetail>>> {
    Ok(Json(
        owner_service::merchant_detail(&state, &user, id).await?,
    ))
}

#[utoipa::path(get, path = "/api/owner/dashboard-stats", tag = "Owner")]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OwnerDashboard>>> {
    Ok(Json(owner_service::dashboard(&state, &user).await?))
}

#[utoipa::path(patch, path = "/api/owner/merchants/{id}/toggle-status", tag = "Owner")]
pub async fn toggle_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    Ok(Json(owner_service::toggle_status(&state, &user, id).await?))
}
