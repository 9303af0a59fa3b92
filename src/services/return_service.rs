use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::returns::{
        CreateReturnRequest, ReturnListQuery, ReturnOrderSummary, ReturnStats, ReturnWithOrder,
        UpdateReturnStatusRequest,
    },
    entity::{Orders, Returns, orders, returns},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ReturnRequest, ReturnStatus},
    response::{ApiResponse, Pagination},
    routes::params::normalize,
    services::{merchant_service::resolve_merchant, now},
    state::AppState,
};

pub async fn create(
    state: &AppState,
    auth: &AuthUser,
    payload: CreateReturnRequest,
) -> AppResult<ApiResponse<ReturnRequest>> {
    payload.validate()?;
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let order = Orders::find_by_id(payload.order_id)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    if !order.status.eligible_for_return() {
        return Err(AppError::Validation(
            "Order is not eligible for return".into(),
        ));
    }

    let existing = order.find_related(Returns).one(&state.orm).await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Return request already exists for this order".into(),
        ));
    }

    let record = returns::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        reason: Set(payload.reason),
        notes: Set(payload.notes),
        status: Set(ReturnStatus::Requested),
        requested_at: Set(now()),
        approved_at: Set(None),
        completed_at: Set(None),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::with_message(
        record.into(),
        "Return request created successfully",
    ))
}

pub async fn list(
    state: &AppState,
    auth: &AuthUser,
    query: ReturnListQuery,
) -> AppResult<ApiResponse<Vec<ReturnWithOrder>>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (page, limit, offset) = normalize(query.page, query.limit);

    let mut finder = Returns::find()
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id));
    if let Some(status) = query.status {
        finder = finder.filter(returns::Column::Status.eq(status));
    }
    finder = finder.order_by_desc(returns::Column::RequestedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let rows = finder
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(with_order_summary)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    ))
}

pub async fn get(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ReturnWithOrder>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let row = Returns::find_by_id(id)
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Return request not found".into()))?;
    Ok(ApiResponse::success(with_order_summary(row)?))
}

/// Status move with the same back-fill rule as COD: completing a return that
/// was never explicitly approved stamps both timestamps.
pub async fn update_status(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateReturnStatusRequest,
) -> AppResult<ApiResponse<ReturnRequest>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (record, _) = Returns::find_by_id(id)
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Return request not found".into()))?;

    let ts = now();
    let approved_at = record.approved_at;
    let mut active: returns::ActiveModel = record.into();
    active.status = Set(payload.status);
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    match payload.status {
        ReturnStatus::Approved => {
            active.approved_at = Set(Some(ts));
        }
        ReturnStatus::Completed => {
            active.completed_at = Set(Some(ts));
            if approved_at.is_none() {
                active.approved_at = Set(Some(ts));
            }
        }
        _ => {}
    }
    let record = active.update(&state.orm).await?;

    Ok(ApiResponse::with_message(
        record.into(),
        "Return status updated successfully",
    ))
}

/// Merchants can withdraw a request only while it is still REQUESTED.
pub async fn delete(state: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<ApiResponse<()>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (record, _) = Returns::find_by_id(id)
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(returns::Column::Status.eq(ReturnStatus::Requested))
        .one(&state.orm)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Return request not found or cannot be cancelled".into())
        })?;

    record.delete(&state.orm).await?;
    Ok(ApiResponse::message("Return request cancelled successfully"))
}

pub async fn stats(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<ReturnStats>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT r.status, COUNT(*)::BIGINT \
         FROM returns r \
         JOIN orders o ON o.id = r.order_id \
         WHERE o.merchant_id = $1 \
         GROUP BY r.status",
    )
    .bind(merchant.id)
    .fetch_all(&state.pool)
    .await?;

    let mut stats = ReturnStats {
        requested: 0,
        approved: 0,
        rejected: 0,
        in_progress: 0,
        completed: 0,
        total: 0,
    };
    for (status, count) in rows {
        stats.total += count;
        match ReturnStatus::parse(&status) {
            Some(ReturnStatus::Requested) => stats.requested = count,
            Some(ReturnStatus::Approved) => stats.approved = count,
            Some(ReturnStatus::Rejected) => stats.rejected = count,
            Some(ReturnStatus::InProgress) => stats.in_progress = count,
            Some(ReturnStatus::Completed) => stats.completed = count,
            None => {}
        }
    }

    Ok(ApiResponse::success(stats))
}

pub(crate) fn with_order_summary(
    (record, order): (returns::Model, Option<orders::Model>),
) -> AppResult<ReturnWithOrder> {
    let order = order.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("return {} has no order", record.id))
    })?;
    Ok(ReturnWithOrder {
        record: record.into(),
        order: ReturnOrderSummary {
            order_number: order.order_number,
            recipient_name: order.recipient_name,
            item_name: order.item_name,
            item_value: order.item_value,
            status: order.status,
            created_at: order.created_at.to_utc(),
        },
    })
}
