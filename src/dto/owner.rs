use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    merchants::{OrderBrief, UserSummary},
    reports::StatusCount,
};
use crate::models::{Merchant, User};

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantStats {
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub total_revenue: i64,
    pub pending_cod: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantOverview {
    #[serde(flatten)]
    pub merchant: Merchant,
    pub user: UserSummary,
    pub stats: MerchantStats,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodTotals {
    pub total_amount: i64,
    pub total_records: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDetailStats {
    pub total_orders: i64,
    pub total_revenue: i64,
    pub orders_by_status: Vec<StatusCount>,
    pub cod: CodTotals,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDetail {
    #[serde(flatten)]
    pub merchant: Merchant,
    pub user: User,
    pub recent_orders: Vec<OrderBrief>,
    pub stats: MerchantDetailStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantTotals {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderTotals {
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTotals {
    pub total_item_value: i64,
    pub total_shipping: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentMerchant {
    pub id: Uuid,
    pub business_name: String,
    pub city: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopMerchant {
    pub id: Uuid,
    pub business_name: String,
    pub city: String,
    pub total_orders: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub merchants: MerchantTotals,
    pub orders: OrderTotals,
    pub revenue: RevenueTotals,
    pub recent_merchants: Vec<RecentMerchant>,
    pub top_merchants: Vec<TopMerchant>,
}
