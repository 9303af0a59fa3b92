use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{OrderStatus, ReturnRequest, ReturnStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnRequest {
    pub order_id: Uuid,
    #[validate(length(min = 10, message = "Reason must be at least 10 characters"))]
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReturnStatusRequest {
    pub status: ReturnStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ReturnStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnOrderSummary {
    pub order_number: String,
    pub recipient_name: String,
    pub item_name: String,
    pub item_value: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnWithOrder {
    #[serde(flatten)]
    pub record: ReturnRequest,
    pub order: ReturnOrderSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnStats {
    pub requested: i64,
    pub approved: i64,
    pub rejected: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub total: i64,
}
