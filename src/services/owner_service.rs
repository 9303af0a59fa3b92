use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::{
        merchants::{MerchantListQuery, UserSummary},
        owner::{
            CodTotals, MerchantDetail, MerchantDetailStats, MerchantOverview, MerchantStats,
            MerchantTotals, OrderTotals, OwnerDashboard, RecentMerchant, RevenueTotals,
            TopMerchant,
        },
        reports::StatusCount,
    },
    entity::{Merchants, Orders, Users, merchants, orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::Merchant,
    response::{ApiResponse, Pagination},
    routes::params::normalize,
    services::{merchant_service::order_brief, now},
    state::AppState,
};

/// Cross-tenant merchant listing with per-merchant volume and COD exposure.
pub async fn list_merchants(
    state: &AppState,
    auth: &AuthUser,
    query: MerchantListQuery,
) -> AppResult<ApiResponse<Vec<MerchantOverview>>> {
    ensure_capability(auth, Capability::ViewAllMerchants)?;
    let (page, limit, offset) = normalize(query.page, query.limit);

    let finder = Merchants::find().order_by_desc(merchants::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let rows = finder
        .find_also_related(Users)
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (merchant, user) in rows {
        let user = user.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("merchant {} has no user", merchant.id))
        })?;
        let stats = merchant_stats(state, merchant.id).await?;
        items.push(MerchantOverview {
            merchant: merchant.into(),
            user: UserSummary {
                name: user.name,
                email: user.email,
            },
            stats,
        });
    }

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    ))
}

pub async fn merchant_detail(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MerchantDetail>> {
    ensure_capability(auth, Capability::ViewAllMerchants)?;

    let merchant = Merchants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;
    let user = merchant
        .find_related(Users)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("merchant {id} has no user")))?;

    let recent_orders = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .order_by_desc(orders::Column::CreatedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_brief)
        .collect();

    let (total_orders, total_revenue): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, COALESCE(SUM(item_value), 0)::BIGINT \
         FROM orders WHERE merchant_id = $1",
    )
    .bind(merchant.id)
    .fetch_one(&state.pool)
    .await?;

    let orders_by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*)::BIGINT FROM orders \
         WHERE merchant_id = $1 GROUP BY status ORDER BY COUNT(*) DESC",
    )
    .bind(merchant.id)
    .fetch_all(&state.pool)
    .await?;

    let (cod_records, cod_amount): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, COALESCE(SUM(c.amount), 0)::BIGINT \
         FROM cod_records c JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1",
    )
    .bind(merchant.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(MerchantDetail {
        merchant: merchant.into(),
        user: user.into(),
        recent_orders,
        stats: MerchantDetailStats {
            total_orders,
            total_revenue,
            orders_by_status: orders_by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            cod: CodTotals {
                total_amount: cod_amount,
                total_records: cod_records,
            },
        },
    }))
}

pub async fn dashboard(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<OwnerDashboard>> {
    ensure_capability(auth, Capability::ViewAllMerchants)?;

    let total_merchants = Merchants::find().count(&state.orm).await? as i64;
    let active_merchants = Merchants::find()
        .filter(merchants::Column::IsActive.eq(true))
        .count(&state.orm)
        .await? as i64;
    let total_orders = Orders::find().count(&state.orm).await? as i64;

    let (total_item_value, total_shipping): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(item_value), 0)::BIGINT, COALESCE(SUM(shipping_cost), 0)::BIGINT \
         FROM orders",
    )
    .fetch_one(&state.pool)
    .await?;

    let recent_merchants = Merchants::find()
        .find_also_related(Users)
        .order_by_desc(merchants::Column::CreatedAt)
        .limit(5)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(merchant, user)| {
            let user = user.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("merchant {} has no user", merchant.id))
            })?;
            Ok(RecentMerchant {
                id: merchant.id,
                business_name: merchant.business_name,
                city: merchant.city,
                is_active: merchant.is_active,
                created_at: merchant.created_at.to_utc(),
                user: UserSummary {
                    name: user.name,
                    email: user.email,
                },
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let top_rows: Vec<(Uuid, String, String, i64)> = sqlx::query_as(
        "SELECT m.id, m.business_name, m.city, COUNT(o.id)::BIGINT \
         FROM merchants m \
         LEFT JOIN orders o ON o.merchant_id = m.id \
         GROUP BY m.id, m.business_name, m.city \
         ORDER BY COUNT(o.id) DESC \
         LIMIT 10",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(OwnerDashboard {
        merchants: MerchantTotals {
            total: total_merchants,
            active: active_merchants,
        },
        orders: OrderTotals {
            total: total_orders,
        },
        revenue: RevenueTotals {
            total_item_value,
            total_shipping,
            total: total_item_value + total_shipping,
        },
        recent_merchants,
        top_merchants: top_rows
            .into_iter()
            .map(|(id, business_name, city, total_orders)| TopMerchant {
                id,
                business_name,
                city,
                total_orders,
            })
            .collect(),
    }))
}

pub async fn toggle_status(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Merchant>> {
    ensure_capability(auth, Capability::ManageMerchants)?;

    let merchant = Merchants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;

    let activated = !merchant.is_active;
    let mut active: merchants::ActiveModel = merchant.into();
    active.is_active = Set(activated);
    active.updated_at = Set(now());
    let merchant = active.update(&state.orm).await?;

    let message = if activated {
        "Merchant activated successfully"
    } else {
        "Merchant deactivated successfully"
    };
    Ok(ApiResponse::with_message(merchant.into(), message))
}

async fn merchant_stats(state: &AppState, merchant_id: Uuid) -> AppResult<MerchantStats> {
    let (total_orders, delivered_orders, total_revenue): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, \
                COUNT(*) FILTER (WHERE status = 'DELIVERED')::BIGINT, \
                COALESCE(SUM(item_value), 0)::BIGINT \
         FROM orders WHERE merchant_id = $1",
    )
    .bind(merchant_id)
    .fetch_one(&state.pool)
    .await?;

    let pending_cod: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(c.amount), 0)::BIGINT \
         FROM cod_records c JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1 AND c.status <> 'SETTLED'",
    )
    .bind(merchant_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(MerchantStats {
        total_orders,
        delivered_orders,
        total_revenue,
        pending_cod,
    })
}
