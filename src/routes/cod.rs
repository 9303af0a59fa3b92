use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::cod::{
        BulkSettleRequest, BulkSettleResult, CodDetail, CodListQuery, CodSummary, CodWithOrder,
        UpdateCodStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::CodRecord,
    response::ApiResponse,
    services::cod_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/summary", get(summary))
        .route("/bulk-settle", post(bulk_settle))
        .route("/{id}", get(detail))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(get, path = "/api/cod", tag = "COD")]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CodListQuery>,
) -> AppResult<Json<ApiResponse<Vec<CodWithOrder>>>> {
    Ok(Json(cod_service::list(&state, &user, query).await?))
}

#[utoipa::path(get, path = "/api/cod/summary", tag = "COD")]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CodSummary>>> {
    Ok(Json(cod_service::summary(&state, &user).await?))
}

#[utoipa::path(get, path = "/api/cod/{id}", tag = "COD")]
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CodDetail>>> {
    Ok(Json(cod_service::get(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/cod/{id}/status",
    request_body = UpdateCodStatusRequest,
    tag = "COD"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCodStatusRequest>,
) -> AppResult<Json<ApiResponse<CodRecord>>> {
    Ok(Json(
        cod_service::update_status(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cod/bulk-settle",
    request_body = BulkSettleRequest,
    tag = "COD"
)]
pub async fn bulk_settle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkSettleRequest>,
) -> AppResult<Json<ApiResponse<BulkSettleResult>>> {
    Ok(Json(
        cod_service::bulk_settle(&state, &user, payload).await?,
    ))
}
