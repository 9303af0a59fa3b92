use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::shipping::{
        RateQuote, RatesRequest, TrackingPoint, TrackingResponse, WebhookStatusRequest,
    },
    entity::{Orders, ShippingRates, TrackingHistory, orders, shipping_rates, tracking_history},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Courier,
    response::ApiResponse,
    services::{merchant_service::resolve_merchant, order_service::apply_status},
    state::AppState,
};

/// Rate lookup against the seeded table, with a computed fallback so the quote
/// endpoint always answers even on an empty rate card.
pub async fn rates(
    state: &AppState,
    payload: RatesRequest,
) -> AppResult<ApiResponse<Vec<RateQuote>>> {
    payload.validate()?;

    let mut condition = Condition::all()
        .add(Expr::col(shipping_rates::Column::Origin).ilike(format!("%{}%", payload.origin)))
        .add(
            Expr::col(shipping_rates::Column::Destination)
                .ilike(format!("%{}%", payload.destination)),
        )
        .add(shipping_rates::Column::Weight.lte(payload.weight));
    if let Some(courier) = payload.courier {
        condition = condition.add(shipping_rates::Column::Courier.eq(courier));
    }

    let matches = ShippingRates::find()
        .filter(condition)
        .order_by_asc(shipping_rates::Column::Cost)
        .all(&state.orm)
        .await?;

    let quotes: Vec<RateQuote> = if matches.is_empty() {
        fallback_rates(payload.weight, payload.courier)
    } else {
        matches
            .into_iter()
            .map(|rate| RateQuote {
                courier: rate.courier,
                service: rate.service.clone(),
                description: format!("{} {}", rate.courier.as_str(), rate.service),
                price: rate.cost,
                estimated_days: rate.etd,
            })
            .collect()
    };

    Ok(ApiResponse::success(quotes))
}

pub async fn track(
    state: &AppState,
    auth: &AuthUser,
    tracking_number: &str,
) -> AppResult<ApiResponse<TrackingResponse>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = Orders::find()
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(orders::Column::TrackingNumber.eq(tracking_number))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    tracking_response(state, order).await
}

pub async fn track_by_order(
    state: &AppState,
    auth: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<TrackingResponse>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = Orders::find_by_id(order_id)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let unassigned = order.tracking_number.is_none();
    let mut response = tracking_response(state, order).await?;
    if unassigned {
        response.message = Some("Tracking number not assigned yet".into());
    }
    Ok(response)
}

/// Recipient-facing lookup; no tenant scoping because the tracking number is
/// the credential.
pub async fn public_track(
    state: &AppState,
    tracking_number: &str,
) -> AppResult<ApiResponse<TrackingResponse>> {
    let order = Orders::find()
        .filter(orders::Column::TrackingNumber.eq(tracking_number))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    tracking_response(state, order).await
}

/// Courier callback. Runs the same status pipeline as the manual endpoint,
/// including the COD collection cascade on delivery.
pub async fn webhook_update_status(
    state: &AppState,
    payload: WebhookStatusRequest,
) -> AppResult<ApiResponse<()>> {
    payload.validate()?;

    let order = Orders::find()
        .filter(orders::Column::TrackingNumber.eq(payload.tracking_number.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let txn = state.orm.begin().await?;
    apply_status(
        &txn,
        order,
        payload.status,
        None,
        payload.description,
        payload.city,
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::message("Order status updated"))
}

async fn tracking_response(
    state: &AppState,
    order: orders::Model,
) -> AppResult<ApiResponse<TrackingResponse>> {
    let history = TrackingHistory::find()
        .filter(tracking_history::Column::OrderId.eq(order.id))
        .order_by_desc(tracking_history::Column::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|event| TrackingPoint {
            status: event.status,
            description: Some(event.description),
            city: event.city,
            created_at: event.date.to_utc(),
        })
        .collect();

    Ok(ApiResponse::success(TrackingResponse {
        tracking_number: order.tracking_number,
        order_number: order.order_number,
        status: order.status,
        courier: order.courier,
        service: order.service,
        recipient_name: order.recipient_name,
        recipient_city: order.recipient_city,
        created_at: order.created_at.to_utc(),
        history,
    }))
}

/// Demo rate card: flat per-kg pricing, rounded up to whole kilograms.
fn fallback_rates(weight: f64, courier: Option<Courier>) -> Vec<RateQuote> {
    let kg = weight.ceil().max(1.0) as i64;
    let card: [(Courier, &str, &str, i64, &str); 5] = [
        (Courier::Jne, "REG", "Regular service", 12_000, "2-3"),
        (Courier::Jne, "YES", "Next-day service", 18_000, "1"),
        (Courier::Tiki, "REG", "Regular service", 11_000, "3-4"),
        (Courier::Sicepat, "BEST", "Express service", 15_000, "1-2"),
        (Courier::Anteraja, "REG", "Regular service", 10_000, "3-5"),
    ];
    card.into_iter()
        .filter(|(c, ..)| courier.map_or(true, |wanted| *c == wanted))
        .map(|(courier, service, description, per_kg, etd)| RateQuote {
            courier,
            service: service.into(),
            description: description.into(),
            price: per_kg * kg,
            estimated_days: etd.into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rounds_weight_up_to_whole_kilograms() {
        let quotes = fallback_rates(1.2, Some(Courier::Jne));
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, 24_000);
    }

    #[test]
    fn fallback_without_courier_returns_full_card() {
        let quotes = fallback_rates(0.5, None);
        assert_eq!(quotes.len(), 5);
        assert!(quotes.iter().all(|q| q.price >= 10_000));
    }
}
