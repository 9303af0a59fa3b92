pub mod auth_service;
pub mod cod_service;
pub mod merchant_service;
pub mod order_service;
pub mod owner_service;
pub mod report_service;
pub mod return_service;
pub mod shipping_service;
pub mod user_service;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Single timestamp for a whole write so related rows agree on "now".
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}
