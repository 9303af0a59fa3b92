use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::shipping::{RateQuote, RatesRequest, TrackingResponse, WebhookStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::shipping_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rates", post(rates))
        .route("/track/order/{orderId}", get(track_by_order))
        .route("/track/{trackingNumber}", get(track))
        .route("/public/track/{trackingNumber}", get(public_track))
        .route("/webhook/update-status", post(webhook_update_status))
}

#[utoipa::path(post, path = "/api/shipping/rates", request_body = RatesRequest, tag = "Shipping")]
pub async fn rates(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<RatesRequest>,
) -> AppResult<Json<ApiResponse<Vec<RateQuote>>>> {
    Ok(Json(shipping_service::rates(&state, payload).await?))
}

#[utoipa::path(get, path = "/api/shipping/track/{trackingNumber}", tag = "Shipping")]
pub async fn track(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tracking_number): Path<String>,
) -> AppResult<Json<ApiResponse<TrackingResponse>>> {
    Ok(Json(
        shipping_service::track(&state, &user, &tracking_number).await?,
    ))
}

#[utoipa::path(get, path = "/api/shipping/track/order/{orderId}", tag = "Shipping")]
pub async fn track_by_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TrackingResponse>>> {
    Ok(Json(
        shipping_service::track_by_order(&state, &user, order_id).await?,
    ))
}

/// Unauthenticated; the tracking number itself is the lookup key.
#[utoipa::path(get, path = "/api/shipping/public/track/{trackingNumber}", tag = "Shipping")]
pub async fn public_track(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> AppResult<Json<ApiResponse<TrackingResponse>>> {
    Ok(Json(
        shipping_service::public_track(&state, &tracking_number).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/shipping/webhook/update-status",
    request_body = WebhookStatusRequest,
    tag = "Shipping"
)]
pub async fn webhook_update_status(
    State(state): State<AppState>,
    Json(payload): Json<WebhookStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(
        shipping_service::webhook_update_status(&state, payload).await?,
    ))
}
