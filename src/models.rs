use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roles carried in the token. Authorization decisions go through the
/// capability table in `middleware::auth`, not ad hoc role lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "MAIN_ADMIN")]
    MainAdmin,
    #[sea_orm(string_value = "GENERAL_ADMIN")]
    GeneralAdmin,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "OWNER")]
    Owner,
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "MERCHANT")]
    Merchant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::MainAdmin => "MAIN_ADMIN",
            Role::GeneralAdmin => "GENERAL_ADMIN",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::User => "USER",
            Role::Merchant => "MERCHANT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MAIN_ADMIN" => Some(Role::MainAdmin),
            "GENERAL_ADMIN" => Some(Role::GeneralAdmin),
            "ADMIN" => Some(Role::Admin),
            "OWNER" => Some(Role::Owner),
            "USER" => Some(Role::User),
            "MERCHANT" => Some(Role::Merchant),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Courier {
    #[sea_orm(string_value = "JNE")]
    Jne,
    #[sea_orm(string_value = "TIKI")]
    Tiki,
    #[sea_orm(string_value = "POS")]
    Pos,
    #[sea_orm(string_value = "NINJA")]
    Ninja,
    #[sea_orm(string_value = "SICEPAT")]
    Sicepat,
    #[sea_orm(string_value = "ANTERAJA")]
    Anteraja,
}

impl Courier {
    pub fn as_str(self) -> &'static str {
        match self {
            Courier::Jne => "JNE",
            Courier::Tiki => "TIKI",
            Courier::Pos => "POS",
            Courier::Ninja => "NINJA",
            Courier::Sicepat => "SICEPAT",
            Courier::Anteraja => "ANTERAJA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "JNE" => Some(Courier::Jne),
            "TIKI" => Some(Courier::Tiki),
            "POS" => Some(Courier::Pos),
            "NINJA" => Some(Courier::Ninja),
            "SICEPAT" => Some(Courier::Sicepat),
            "ANTERAJA" => Some(Courier::Anteraja),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "COD")]
    Cod,
    #[sea_orm(string_value = "PREPAID")]
    Prepaid,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::Prepaid => "PREPAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COD" => Some(PaymentMethod::Cod),
            "PREPAID" => Some(PaymentMethod::Prepaid),
            _ => None,
        }
    }
}

/// Order lifecycle. Any value is accepted by the status-update endpoints
/// regardless of the current state; the frontend offers sensible next steps
/// and operators may override (see DESIGN.md).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "PICKED_UP")]
    PickedUp,
    #[sea_orm(string_value = "IN_TRANSIT")]
    InTransit,
    #[sea_orm(string_value = "OUT_FOR_DELIVERY")]
    OutForDelivery,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "RETURNED")]
    Returned,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Returned => "RETURNED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "PICKED_UP" => Some(OrderStatus::PickedUp),
            "IN_TRANSIT" => Some(OrderStatus::InTransit),
            "OUT_FOR_DELIVERY" => Some(OrderStatus::OutForDelivery),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "FAILED" => Some(OrderStatus::Failed),
            "RETURNED" => Some(OrderStatus::Returned),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Returns are only accepted for orders that reached the recipient or
    /// failed delivery.
    pub fn eligible_for_return(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Failed)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COLLECTED")]
    Collected,
    #[sea_orm(string_value = "REMITTED")]
    Remitted,
    #[sea_orm(string_value = "SETTLED")]
    Settled,
}

impl CodStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CodStatus::Pending => "PENDING",
            CodStatus::Collected => "COLLECTED",
            CodStatus::Remitted => "REMITTED",
            CodStatus::Settled => "SETTLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(CodStatus::Pending),
            "COLLECTED" => Some(CodStatus::Collected),
            "REMITTED" => Some(CodStatus::Remitted),
            "SETTLED" => Some(CodStatus::Settled),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    #[sea_orm(string_value = "REQUESTED")]
    Requested,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl ReturnStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnStatus::Requested => "REQUESTED",
            ReturnStatus::Approved => "APPROVED",
            ReturnStatus::Rejected => "REJECTED",
            ReturnStatus::InProgress => "IN_PROGRESS",
            ReturnStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REQUESTED" => Some(ReturnStatus::Requested),
            "APPROVED" => Some(ReturnStatus::Approved),
            "REJECTED" => Some(ReturnStatus::Rejected),
            "IN_PROGRESS" => Some(ReturnStatus::InProgress),
            "COMPLETED" => Some(ReturnStatus::Completed),
            _ => None,
        }
    }
}

// API-facing models. The entity Models stay inside the services; handlers
// and tests see these.

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub business_type: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub order_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_province: String,
    pub recipient_postal_code: String,
    pub courier: Courier,
    pub service: String,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub item_name: String,
    pub item_value: i64,
    pub payment_method: PaymentMethod,
    pub cod_amount: Option<i64>,
    pub shipping_cost: i64,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub print_count: i32,
    pub last_printed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub status: CodStatus,
    pub collected_at: Option<DateTime<Utc>>,
    pub remitted_at: Option<DateTime<Utc>>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub description: String,
    pub city: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reason: String,
    pub notes: Option<String>,
    pub status: ReturnStatus,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRate {
    pub id: Uuid,
    pub courier: Courier,
    pub service: String,
    pub origin: String,
    pub destination: String,
    pub weight: f64,
    pub cost: i64,
    pub etd: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::users::Model> for User {
    fn from(m: crate::entity::users::Model) -> Self {
        User {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::merchants::Model> for Merchant {
    fn from(m: crate::entity::merchants::Model) -> Self {
        Merchant {
            id: m.id,
            user_id: m.user_id,
            business_name: m.business_name,
            business_type: m.business_type,
            address: m.address,
            city: m.city,
            province: m.province,
            postal_code: m.postal_code,
            phone: m.phone,
            email: m.email,
            is_active: m.is_active,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::orders::Model> for Order {
    fn from(m: crate::entity::orders::Model) -> Self {
        Order {
            id: m.id,
            merchant_id: m.merchant_id,
            order_number: m.order_number,
            recipient_name: m.recipient_name,
            recipient_phone: m.recipient_phone,
            recipient_address: m.recipient_address,
            recipient_city: m.recipient_city,
            recipient_province: m.recipient_province,
            recipient_postal_code: m.recipient_postal_code,
            courier: m.courier,
            service: m.service,
            weight: m.weight,
            length: m.length,
            width: m.width,
            height: m.height,
            item_name: m.item_name,
            item_value: m.item_value,
            payment_method: m.payment_method,
            cod_amount: m.cod_amount,
            shipping_cost: m.shipping_cost,
            status: m.status,
            tracking_number: m.tracking_number,
            notes: m.notes,
            print_count: m.print_count,
            last_printed_at: m.last_printed_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::cod_records::Model> for CodRecord {
    fn from(m: crate::entity::cod_records::Model) -> Self {
        CodRecord {
            id: m.id,
            order_id: m.order_id,
            amount: m.amount,
            status: m.status,
            collected_at: m.collected_at.map(|dt| dt.with_timezone(&Utc)),
            remitted_at: m.remitted_at.map(|dt| dt.with_timezone(&Utc)),
            settled_at: m.settled_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::tracking_history::Model> for TrackingEvent {
    fn from(m: crate::entity::tracking_history::Model) -> Self {
        TrackingEvent {
            id: m.id,
            order_id: m.order_id,
            status: m.status,
            description: m.description,
            city: m.city,
            date: m.date.with_timezone(&Utc),
        }
    }
}

impl From<crate::entity::returns::Model> for ReturnRequest {
    fn from(m: crate::entity::returns::Model) -> Self {
        ReturnRequest {
            id: m.id,
            order_id: m.order_id,
            reason: m.reason,
            notes: m.notes,
            status: m.status,
            requested_at: m.requested_at.with_timezone(&Utc),
            approved_at: m.approved_at.map(|dt| dt.with_timezone(&Utc)),
            completed_at: m.completed_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<crate::entity::shipping_rates::Model> for ShippingRate {
    fn from(m: crate::entity::shipping_rates::Model) -> Self {
        ShippingRate {
            id: m.id,
            courier: m.courier,
            service: m.service,
            origin: m.origin,
            destination: m.destination,
            weight: m.weight,
            cost: m.cost,
            etd: m.etd,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::PickedUp,
            OrderStatus::OutForDelivery,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
    }

    #[test]
    fn only_delivered_and_failed_are_return_eligible() {
        assert!(OrderStatus::Delivered.eligible_for_return());
        assert!(OrderStatus::Failed.eligible_for_return());
        assert!(!OrderStatus::Pending.eligible_for_return());
        assert!(!OrderStatus::Returned.eligible_for_return());
    }

    #[test]
    fn enums_serialize_in_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"OUT_FOR_DELIVERY\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).unwrap(),
            "\"COD\""
        );
        assert_eq!(serde_json::to_string(&Role::MainAdmin).unwrap(), "\"MAIN_ADMIN\"");
    }
}
