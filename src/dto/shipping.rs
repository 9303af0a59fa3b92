use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Courier, OrderStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RatesRequest {
    #[validate(length(min = 2, message = "Origin city is required"))]
    pub origin: String,
    #[validate(length(min = 2, message = "Destination city is required"))]
    pub destination: String,
    #[validate(range(min = 0.1, message = "Weight must be at least 0.1 kg"))]
    pub weight: f64,
    pub courier: Option<Courier>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    pub courier: Courier,
    pub service: String,
    pub description: String,
    pub price: i64,
    pub estimated_days: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingPoint {
    pub status: OrderStatus,
    pub description: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub tracking_number: Option<String>,
    pub order_number: String,
    pub status: OrderStatus,
    pub courier: Courier,
    pub service: String,
    pub recipient_name: String,
    pub recipient_city: String,
    pub created_at: DateTime<Utc>,
    pub history: Vec<TrackingPoint>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatusRequest {
    #[validate(length(min = 1, message = "Tracking number is required"))]
    pub tracking_number: String,
    pub status: OrderStatus,
    pub description: Option<String>,
    pub city: Option<String>,
}
