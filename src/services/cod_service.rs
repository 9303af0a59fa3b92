use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::cod::{
        BulkSettleRequest, BulkSettleResult, CodBucket, CodDetail, CodListQuery, CodOrderSummary,
        CodSummary, CodWithOrder, MerchantContact, UpdateCodStatusRequest,
    },
    entity::{CodRecords, Orders, cod_records, orders},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CodRecord, CodStatus},
    response::{ApiResponse, Pagination},
    routes::params::normalize,
    services::{merchant_service::resolve_merchant, now},
    state::AppState,
};

pub async fn list(
    state: &AppState,
    auth: &AuthUser,
    query: CodListQuery,
) -> AppResult<ApiResponse<Vec<CodWithOrder>>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (page, limit, offset) = normalize(query.page, query.limit);

    let mut finder = CodRecords::find()
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id));
    if let Some(status) = query.status {
        finder = finder.filter(cod_records::Column::Status.eq(status));
    }
    finder = finder.order_by_desc(cod_records::Column::CreatedAt);

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

pub async fn summary(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<CodSummary>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT c.status, COUNT(*)::BIGINT, COALESCE(SUM(c.amount), 0)::BIGINT \
         FROM cod_records c \
         JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1 \
         GROUP BY c.status",
    )
    .bind(merchant.id)
    .fetch_all(&state.pool)
    .await?;

    let mut summary = CodSummary {
        pending: CodBucket::default(),
        collected: CodBucket::default(),
        remitted: CodBucket::default(),
        settled: CodBucket::default(),
        total: CodBucket::default(),
    };
    for (status, count, amount) in rows {
        summary.total.count += count;
        summary.total.amount += amount;
        let bucket = match CodStatus::parse(&status) {
            Some(CodStatus::Pending) => &mut summary.pending,
            Some(CodStatus::Collected) => &mut summary.collected,
            Some(CodStatus::Remitted) => &mut summary.remitted,
            Some(CodStatus::Settled) => &mut summary.settled,
            None => continue,
        };
        bucket.count = count;
        bucket.amount = amount;
    }

    Ok(ApiResponse::success(summary))
}

pub async fn get(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CodDetail>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (record, order) = find_owned(state, merchant.id, id).await?;

    Ok(ApiResponse::success(CodDetail {
        record: record.into(),
        order: order.into(),
        merchant: MerchantContact {
            business_name: merchant.business_name,
            phone: merchant.phone,
            email: merchant.email,
        },
    }))
}

/// Manual status move. Skipped stages get their timestamps back-filled so a
/// record jumped straight to SETTLED still shows when the money path started.
pub async fn update_status(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateCodStatusRequest,
) -> AppResult<ApiResponse<CodRecord>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (record, _) = find_owned(state, merchant.id, id).await?;

    let ts = now();
    let collected_at = record.collected_at;
    let remitted_at = record.remitted_at;
    let mut active: cod_records::ActiveModel = record.into();
    active.status = Set(payload.status);
    match payload.status {
        CodStatus::Pending => {}
        CodStatus::Collected => {
            active.collected_at = Set(Some(ts));
        }
        CodStatus::Remitted => {
            active.remitted_at = Set(Some(ts));
            if collected_at.is_none() {
                active.collected_at = Set(Some(ts));
            }
        }
        CodStatus::Settled => {
            active.settled_at = Set(Some(ts));
            if collected_at.is_none() {
                active.collected_at = Set(Some(ts));
            }
            if remitted_at.is_none() {
                active.remitted_at = Set(Some(ts));
            }
        }
    }
    active.updated_at = Set(ts);
    let record = active.update(&state.orm).await?;

    Ok(ApiResponse::with_message(
        record.into(),
        "COD status updated successfully",
    ))
}

/// All-or-nothing settlement of a batch. If any requested record is missing,
/// foreign, or not yet collected, nothing is settled.
pub async fn bulk_settle(
    state: &AppState,
    auth: &AuthUser,
    payload: BulkSettleRequest,
) -> AppResult<ApiResponse<BulkSettleResult>> {
    payload.validate()?;
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let txn = state.orm.begin().await?;

    let records = CodRecords::find()
        .find_also_related(Orders)
        .filter(cod_records::Column::Id.is_in(payload.cod_ids.clone()))
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(cod_records::Column::Status.is_in([CodStatus::Collected, CodStatus::Remitted]))
        .all(&txn)
        .await?;

    if records.len() != payload.cod_ids.len() {
        return Err(AppError::Validation(
            "Some COD records not found or invalid status".into(),
        ));
    }

    let ts = now();
    let mut total_amount = 0i64;
    for (record, _) in records {
        total_amount += record.amount;
        let remitted_at = record.remitted_at;
        let mut active: cod_records::ActiveModel = record.into();
        active.status = Set(CodStatus::Settled);
        active.settled_at = Set(Some(ts));
        if remitted_at.is_none() {
            active.remitted_at = Set(Some(ts));
        }
        active.updated_at = Set(ts);
        active.update(&txn).await?;
    }
    txn.commit().await?;

    Ok(ApiResponse::with_message(
        BulkSettleResult {
            settled_count: payload.cod_ids.len(),
            total_amount,
            settled_at: ts.to_utc(),
        },
        "COD records settled successfully",
    ))
}

pub(crate) fn with_order_summary(
    (record, order): (cod_records::Model, Option<orders::Model>),
) -> AppResult<CodWithOrder> {
    let order = order.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("cod record {} has no order", record.id))
    })?;
    Ok(CodWithOrder {
        record: record.into(),
        order: CodOrderSummary {
            order_number: order.order_number,
            recipient_name: order.recipient_name,
            status: order.status,
            created_at: order.created_at.to_utc(),
        },
    })
}

async fn find_owned(
    state: &AppState,
    merchant_id: Uuid,
    id: Uuid,
) -> AppResult<(cod_records::Model, orders::Model)> {
    let (record, order) = CodRecords::find_by_id(id)
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("COD record not found".into()))?;
    let order =
        order.ok_or_else(|| AppError::Internal(anyhow::anyhow!("cod record {} has no order", id)))?;
    Ok((record, order))
}
