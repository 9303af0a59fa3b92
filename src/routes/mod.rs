use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cod;
pub mod doc;
pub mod health;
pub mod merchants;
pub mod orders;
pub mod owner;
pub mod params;
pub mod reports;
pub mod returns;
pub mod shipping;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/merchants", merchants::router())
        .nest("/orders", orders::router())
        .nest("/cod", cod::router())
        .nest("/returns", returns::router())
        .nest("/shipping", shipping::router())
        .nest("/reports", reports::router())
        .nest("/owner", owner::router())
        .nest("/users", users::router())
}
