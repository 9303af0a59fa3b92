use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CodRecord, CodStatus, Order, OrderStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCodStatusRequest {
    pub status: CodStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSettleRequest {
    #[validate(length(min = 1, message = "At least one COD record is required"))]
    pub cod_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CodListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<CodStatus>,
}

/// Slim order projection embedded in COD list rows.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodOrderSummary {
    pub order_number: String,
    pub recipient_name: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodWithOrder {
    #[serde(flatten)]
    pub record: CodRecord,
    pub order: CodOrderSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantContact {
    pub business_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodDetail {
    #[serde(flatten)]
    pub record: CodRecord,
    pub order: Order,
    pub merchant: MerchantContact,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct CodBucket {
    pub amount: i64,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CodSummary {
    pub pending: CodBucket,
    pub collected: CodBucket,
    pub remitted: CodBucket,
    pub settled: CodBucket,
    pub total: CodBucket,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSettleResult {
    pub settled_count: usize,
    pub total_amount: i64,
    pub settled_at: DateTime<Utc>,
}
