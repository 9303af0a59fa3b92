use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Merchant, OrderStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MerchantListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBrief {
    pub id: Uuid,
    pub order_number: String,
    pub recipient_name: String,
    pub status: OrderStatus,
    pub shipping_cost: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCounters {
    pub total: i64,
    pub pending: i64,
    pub delivered: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueCounters {
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CodCounters {
    pub pending: i64,
    pub settled: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDashboard {
    pub orders: OrderCounters,
    pub revenue: RevenueCounters,
    pub cod: CodCounters,
    pub recent_orders: Vec<OrderBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

/// Admin list row: merchant plus its account holder and order volume.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantListItem {
    #[serde(flatten)]
    pub merchant: Merchant,
    pub user: UserSummary,
    pub total_orders: i64,
}
