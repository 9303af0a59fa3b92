use sea_orm::entity::prelude::*;

use crate::models::{Courier, OrderStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub merchant_id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_province: String,
    pub recipient_postal_code: String,
    pub courier: Courier,
    pub service: String,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    #[sea_orm(column_type = "Double")]
    pub length: f64,
    #[sea_orm(column_type = "Double")]
    pub width: f64,
    #[sea_orm(column_type = "Double")]
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
    pub last_printed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::merchants::Entity",
        from = "Column::MerchantId",
        to = "super::merchants::Column::Id"
    )]
    Merchants,
    #[sea_orm(has_one = "super::cod_records::Entity")]
    CodRecords,
    #[sea_orm(has_many = "super::tracking_history::Entity")]
    TrackingHistory,
    #[sea_orm(has_one = "super::returns::Entity")]
    Returns,
}

impl Related<super::merchants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Merchants.def()
    }
}

impl Related<super::cod_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CodRecords.def()
    }
}

impl Related<super::tracking_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingHistory.def()
    }
}

impl Related<super::returns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Returns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
