use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::merchants::{
        CodCounters, MerchantDashboard, MerchantListItem, MerchantListQuery, OrderBrief,
        OrderCounters, RevenueCounters, UserSummary,
    },
    entity::{Merchants, Orders, Users, merchants, orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::{Merchant, OrderStatus},
    response::{ApiResponse, Pagination},
    routes::params::normalize,
    state::AppState,
};

/// Tenant resolution: every merchant-scoped operation starts here. A user
/// without a merchant profile cannot touch merchant data at all.
pub async fn resolve_merchant<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<merchants::Model> {
    Merchants::find()
        .filter(merchants::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant profile not found".into()))
}

pub async fn profile(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<Merchant>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    Ok(ApiResponse::success(merchant.into()))
}

pub async fn dashboard_stats(
    state: &AppState,
    auth: &AuthUser,
) -> AppResult<ApiResponse<MerchantDashboard>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let total = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .count(&state.orm)
        .await? as i64;
    let pending = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(orders::Column::Status.is_in([OrderStatus::Pending, OrderStatus::Confirmed]))
        .count(&state.orm)
        .await? as i64;
    let delivered = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(orders::Column::Status.eq(OrderStatus::Delivered))
        .count(&state.orm)
        .await? as i64;

    let revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(item_value), 0)::BIGINT FROM orders \
         WHERE merchant_id = $1 AND status = 'DELIVERED'",
    )
    .bind(merchant.id)
    .fetch_one(&state.pool)
    .await?;

    let (cod_pending, cod_settled): (i64, i64) = sqlx::query_as(
        "SELECT \
             COALESCE(SUM(c.amount) FILTER (WHERE c.status IN ('PENDING', 'COLLECTED', 'REMITTED')), 0)::BIGINT, \
             COALESCE(SUM(c.amount) FILTER (WHERE c.status = 'SETTLED'), 0)::BIGINT \
         FROM cod_records c \
         JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1",
    )
    .bind(merchant.id)
    .fetch_one(&state.pool)
    .await?;

    let recent_orders = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .order_by_desc(orders::Column::CreatedAt)
        .limit(5)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_brief)
        .collect();

    Ok(ApiResponse::success(MerchantDashboard {
        orders: OrderCounters {
            total,
            pending,
            delivered,
        },
        revenue: RevenueCounters { total: revenue },
        cod: CodCounters {
            pending: cod_pending,
            settled: cod_settled,
        },
        recent_orders,
    }))
}

/// Admin-side listing across all tenants.
pub async fn list(
    state: &AppState,
    auth: &AuthUser,
    query: MerchantListQuery,
) -> AppResult<ApiResponse<Vec<MerchantListItem>>> {
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
        let total_orders = Orders::find()
            .filter(orders::Column::MerchantId.eq(merchant.id))
            .count(&state.orm)
            .await? as i64;
        items.push(MerchantListItem {
            merchant: merchant.into(),
            user: UserSummary {
                name: user.name,
                email: user.email,
            },
            total_orders,
        });
    }

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    ))
}

pub(crate) fn order_brief(order: orders::Model) -> OrderBrief {
    OrderBrief {
        id: order.id,
        order_number: order.order_number,
        recipient_name: order.recipient_name,
        status: order.status,
        shipping_cost: order.shipping_cost,
        created_at: order.created_at.to_utc(),
    }
}
