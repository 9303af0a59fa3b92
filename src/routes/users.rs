use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::users::{
        UpdateRoleRequest, UpdateUserStatusRequest, UserListQuery, UserStats,
        UserWithMerchantSummary,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats/summary", get(stats))
        .route("/{id}", get(detail).delete(delete))
        .route("/{id}/role", patch(update_role))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(get, path = "/api/users", tag = "Users")]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<Vec<UserWithMerchantSummary>>>> {
    Ok(Json(user_service::list(&state, &user, query).await?))
}

#[utoipa::path(get, path = "/api/users/stats/summary", tag = "Users")]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserStats>>> {
    Ok(Json(user_service::stats(&state, &user).await?))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "Users")]
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserWithMerchantSummary>>> {
    Ok(Json(user_service::get(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    request_body = UpdateRoleRequest,
    tag = "Users"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(
        user_service::update_role(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/status",
    request_body = UpdateUserStatusRequest,
    tag = "Users"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> AppResult<Json<ApiResponse<UserWithMerchantSummary>>> {
    Ok(Json(
        user_service::update_status(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "Users")]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(user_service::delete(&state, &user, id).await?))
}
