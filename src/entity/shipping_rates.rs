use sea_orm::entity::prelude::*;

use crate::models::Courier;

// Static reference data; not tenant-scoped.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shipping_rates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub courier: Courier,
    pub service: String,
    pub origin: String,
    pub destination: String,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    pub cost: i64,
    pub etd: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
