use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        BulkImportReport, CreateOrderRequest, OrderDetail, OrderListItem, OrderListQuery,
        OrderWithCod, UpdateOrderStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Download},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/bulk-import", post(bulk_import))
        .route("/bulk-import/template", get(import_template))
        .route("/{id}", get(detail).delete(delete))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/label", get(label))
}

#[utoipa::path(get, path = "/api/orders", tag = "Orders")]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderListItem>>>> {
    Ok(Json(
        order_service::list_orders(&state, &user, query).await?,
    ))
}

#[utoipa::path(post, path = "/api/orders", request_body = CreateOrderRequest, tag = "Orders")]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithCod>>)> {
    let response = order_service::create_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders")]
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(Json(order_service::get_order(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderWithCod>>> {
    Ok(Json(
        order_service::update_status(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/orders/{id}", tag = "Orders")]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(order_service::delete_order(&state, &user, id).await?))
}

#[utoipa::path(get, path = "/api/orders/{id}/label", tag = "Orders")]
pub async fn label(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Download> {
    order_service::print_label(&state, &user, id).await
}

#[utoipa::path(get, path = "/api/orders/bulk-import/template", tag = "Orders")]
pub async fn import_template(_user: AuthUser) -> AppResult<Download> {
    order_service::import_template()
}

#[utoipa::path(post, path = "/api/orders/bulk-import", tag = "Orders")]
pub async fn bulk_import(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<BulkImportReport>>> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
            file = Some(bytes.to_vec());
        }
    }
    let file = file.ok_or_else(|| AppError::Validation("No file uploaded".into()))?;

    Ok(Json(
        order_service::bulk_import(&state, &user, &file).await?,
    ))
}
