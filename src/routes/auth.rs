use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::auth::{
        AuthResponse, LoginRequest, MerchantProfileRequest, RegisterRequest, UserWithMerchant,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Merchant,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/complete-profile", post(complete_profile))
        .route("/profile", put(update_profile))
}

#[utoipa::path(post, path = "/api/auth/register", request_body = RegisterRequest, tag = "Auth")]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let response = auth_service::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(post, path = "/api/auth/login", request_body = LoginRequest, tag = "Auth")]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth")]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserWithMerchant>>> {
    Ok(Json(auth_service::me(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/auth/complete-profile",
    request_body = MerchantProfileRequest,
    tag = "Auth"
)]
pub async fn complete_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MerchantProfileRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Merchant>>)> {
    let response = auth_service::complete_profile(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = MerchantProfileRequest,
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MerchantProfileRequest>,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    Ok(Json(
        auth_service::update_profile(&state, &user, payload).await?,
    ))
}
