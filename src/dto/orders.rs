use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{
    CodRecord, Courier, Merchant, Order, OrderStatus, PaymentMethod, ReturnRequest, TrackingEvent,
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 2, message = "Recipient name is required"))]
    pub recipient_name: String,
    #[validate(length(min = 10, message = "Valid phone number is required"))]
    pub recipient_phone: String,
    #[validate(length(min = 10, message = "Complete address is required"))]
    pub recipient_address: String,
    #[validate(length(min = 2, message = "City is required"))]
    pub recipient_city: String,
    #[validate(length(min = 2, message = "Province is required"))]
    pub recipient_province: String,
    #[validate(length(min = 5, message = "Postal code is required"))]
    pub recipient_postal_code: String,
    pub courier: Courier,
    #[validate(length(min = 2, message = "Service type is required"))]
    pub service: String,
    #[validate(range(min = 0.1, message = "Weight must be at least 0.1 kg"))]
    pub weight: f64,
    #[validate(range(min = 1.0, message = "Length is required"))]
    pub length: f64,
    #[validate(range(min = 1.0, message = "Width is required"))]
    pub width: f64,
    #[validate(range(min = 1.0, message = "Height is required"))]
    pub height: f64,
    #[validate(length(min = 2, message = "Item name is required"))]
    pub item_name: String,
    #[validate(range(min = 1000, message = "Item value must be at least Rp 1,000"))]
    pub item_value: i64,
    pub payment_method: PaymentMethod,
    pub cod_amount: Option<i64>,
    #[validate(range(min = 1000, message = "Shipping cost is required"))]
    pub shipping_cost: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// List row: the order plus its COD record and the latest tracking event.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItem {
    #[serde(flatten)]
    pub order: Order,
    pub cod_record: Option<CodRecord>,
    pub tracking_history: Vec<TrackingEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub merchant: Merchant,
    pub cod_record: Option<CodRecord>,
    pub tracking_history: Vec<TrackingEvent>,
    pub return_record: Option<ReturnRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCod {
    #[serde(flatten)]
    pub order: Order,
    pub cod_record: Option<CodRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportedOrder {
    pub row: usize,
    pub order_number: String,
    pub recipient_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportError {
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReport {
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub success_orders: Vec<ImportedOrder>,
    /// Only the first 10 failures are reported.
    pub errors: Vec<ImportError>,
}
