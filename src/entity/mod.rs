pub mod cod_records;
pub mod merchants;
pub mod orders;
pub mod returns;
pub mod shipping_rates;
pub mod tracking_history;
pub mod users;

pub use cod_records::Entity as CodRecords;
pub use merchants::Entity as Merchants;
pub use orders::Entity as Orders;
pub use returns::Entity as Returns;
pub use shipping_rates::Entity as ShippingRates;
pub use tracking_history::Entity as TrackingHistory;
pub use users::Entity as Users;
