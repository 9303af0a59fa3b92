use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::returns::{
        CreateReturnRequest, ReturnListQuery, ReturnStats, ReturnWithOrder,
        UpdateReturnStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ReturnRequest,
    response::ApiResponse,
    services::return_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats/summary", get(stats))
        .route("/{id}", get(detail).delete(delete))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(post, path = "/api/returns", request_body = CreateReturnRequest, tag = "Returns")]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReturnRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReturnRequest>>)> {
    let response = return_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(get, path = "/api/returns", tag = "Returns")]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReturnListQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReturnWithOrder>>>> {
    Ok(Json(return_service::list(&state, &user, query).await?))
}

#[utoipa::path(get, path = "/api/returns/stats/summary", tag = "Returns")]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReturnStats>>> {
    Ok(Json(return_service::stats(&state, &user).await?))
}

#[utoipa::path(get, path = "/api/returns/{id}", tag = "Returns")]
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReturnWithOrder>>> {
    Ok(Json(return_service::get(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/returns/{id}/status",
    request_body = UpdateReturnStatusRequest,
    tag = "Returns"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReturnStatusRequest>,
) -> AppResult<Json<ApiResponse<ReturnRequest>>> {
    Ok(Json(
        return_service::update_status(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/returns/{id}", tag = "Returns")]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(return_service::delete(&state, &user, id).await?))
}
