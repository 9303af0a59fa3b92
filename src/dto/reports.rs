use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{cod::CodWithOrder, returns::ReturnWithOrder};

/// Optional reporting window, inclusive on both ends. Dates arrive as
/// `YYYY-MM-DD` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusAmount {
    pub status: String,
    pub count: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub total_orders: i64,
    pub total_revenue: i64,
    pub total_shipping_cost: i64,
    pub average_order_value: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyTrend {
    pub month: String,
    pub orders: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityCount {
    pub city: String,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourierUsage {
    pub courier: String,
    pub orders: i64,
    pub total_shipping_cost: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub overview: SalesOverview,
    pub orders_by_status: Vec<StatusCount>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub top_destinations: Vec<CityCount>,
    pub courier_usage: Vec<CourierUsage>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodOverview {
    pub total_amount: i64,
    pub total_records: i64,
    pub average_amount: f64,
    /// Mean days from collection to settlement, one decimal place.
    pub average_settlement_days: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodReport {
    pub overview: CodOverview,
    pub status_breakdown: Vec<StatusAmount>,
    pub recent_records: Vec<CodWithOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOverview {
    pub total_orders: i64,
    pub total_shipping_cost: i64,
    pub average_shipping_cost: f64,
    pub total_weight: f64,
    pub average_weight: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourierPerformance {
    pub courier: String,
    pub total_orders: i64,
    pub total_cost: i64,
    pub delivered: i64,
    pub failed: i64,
    pub pending: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceUsage {
    pub service: String,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteUsage {
    pub destination: String,
    pub orders: i64,
    pub total_shipping_cost: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingReport {
    pub overview: ShippingOverview,
    pub courier_performance: Vec<CourierPerformance>,
    pub service_usage: Vec<ServiceUsage>,
    pub top_routes: Vec<RouteUsage>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsOverview {
    pub total_returns: i64,
    /// Returns as a percentage of all orders in the window.
    pub return_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReasonCategory {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsReport {
    pub overview: ReturnsOverview,
    pub status_breakdown: Vec<StatusCount>,
    pub reason_categories: Vec<ReasonCategory>,
    pub recent_returns: Vec<ReturnWithOrder>,
}
