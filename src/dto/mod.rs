pub mod auth;
pub mod cod;
pub mod merchants;
pub mod orders;
pub mod owner;
pub mod reports;
pub mod returns;
pub mod shipping;
pub mod users;
