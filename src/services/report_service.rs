use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::reports::{
        CityCount, CodOverview, CodReport, CourierPerformance, CourierUsage, DateRangeQuery,
        MonthlyTrend, ReasonCategory, ReturnsOverview, ReturnsReport, RouteUsage, SalesOverview,
        SalesReport, ServiceUsage, ShippingOverview, ShippingReport, StatusAmount, StatusCount,
    },
    entity::{CodRecords, Orders, Returns, cod_records, orders, returns},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Download},
    services::{cod_service, merchant_service::resolve_merchant, return_service},
    spreadsheet::write_csv,
    state::AppState,
};

/// Inclusive date range to half-open timestamp bounds. `None` on either side
/// leaves that side of the window open.
fn window(range: DateRangeQuery) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let start = range
        .start_date
        .map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let end = range
        .end_date
        .map(|d| (d + chrono::Days::new(1)).and_time(NaiveTime::MIN).and_utc());
    (start, end)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub async fn sales(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<SalesReport>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let (total_orders, total_revenue, total_shipping_cost): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, COALESCE(SUM(item_value), 0)::BIGINT, \
                COALESCE(SUM(shipping_cost), 0)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3)",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let orders_by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT o.status, COUNT(*)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.status \
         ORDER BY COUNT(*) DESC",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    // Trends always cover the trailing twelve months, independent of the
    // requested window.
    let monthly_trends: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT to_char(date_trunc('month', o.created_at), 'YYYY-MM'), \
                COUNT(*)::BIGINT, COALESCE(SUM(item_value), 0)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND o.created_at >= date_trunc('month', now()) - interval '11 months' \
         GROUP BY 1 \
         ORDER BY 1",
    )
    .bind(merchant.id)
    .fetch_all(&state.pool)
    .await?;

    let top_destinations: Vec<(String, i64)> = sqlx::query_as(
        "SELECT o.recipient_city, COUNT(*)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.recipient_city \
         ORDER BY COUNT(*) DESC \
         LIMIT 10",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let courier_usage: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT o.courier, COUNT(*)::BIGINT, COALESCE(SUM(shipping_cost), 0)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.courier \
         ORDER BY COUNT(*) DESC",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let average_order_value = if total_orders > 0 {
        round1(total_revenue as f64 / total_orders as f64)
    } else {
        0.0
    };

    Ok(ApiResponse::success(SalesReport {
        overview: SalesOverview {
            total_orders,
            total_revenue,
            total_shipping_cost,
            average_order_value,
        },
        orders_by_status: orders_by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        monthly_trends: monthly_trends
            .into_iter()
            .map(|(month, orders, revenue)| MonthlyTrend {
                month,
                orders,
                revenue,
            })
            .collect(),
        top_destinations: top_destinations
            .into_iter()
            .map(|(city, orders)| CityCount { city, orders })
            .collect(),
        courier_usage: courier_usage
            .into_iter()
            .map(|(courier, orders, total_shipping_cost)| CourierUsage {
                courier,
                orders,
                total_shipping_cost,
            })
            .collect(),
    }))
}

pub async fn cod(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<CodReport>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let (total_records, total_amount, average_settlement_days): (i64, i64, f64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, COALESCE(SUM(c.amount), 0)::BIGINT, \
                COALESCE(AVG(EXTRACT(EPOCH FROM (c.settled_at - c.collected_at)) / 86400.0) \
                    FILTER (WHERE c.settled_at IS NOT NULL AND c.collected_at IS NOT NULL), 0)::FLOAT8 \
         FROM cod_records c \
         JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR c.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR c.created_at < $3)",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let status_breakdown: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT c.status, COUNT(*)::BIGINT, COALESCE(SUM(c.amount), 0)::BIGINT \
         FROM cod_records c \
         JOIN orders o ON o.id = c.order_id \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR c.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR c.created_at < $3) \
         GROUP BY c.status",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let recent_records = CodRecords::find()
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .order_by_desc(cod_records::Column::CreatedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cod_service::with_order_summary)
        .collect::<AppResult<Vec<_>>>()?;

    let average_amount = if total_records > 0 {
        round1(total_amount as f64 / total_records as f64)
    } else {
        0.0
    };

    Ok(ApiResponse::success(CodReport {
        overview: CodOverview {
            total_amount,
            total_records,
            average_amount,
            average_settlement_days: round1(average_settlement_days),
        },
        status_breakdown: status_breakdown
            .into_iter()
            .map(|(status, count, amount)| StatusAmount {
                status,
                count,
                amount,
            })
            .collect(),
        recent_records,
    }))
}

pub async fn shipping(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<ShippingReport>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let (total_orders, total_shipping_cost, total_weight): (i64, i64, f64) = sqlx::query_as(
        "SELECT COUNT(*)::BIGINT, COALESCE(SUM(shipping_cost), 0)::BIGINT, \
                COALESCE(SUM(weight), 0)::FLOAT8 \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3)",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let courier_rows: Vec<(String, i64, i64, i64, i64)> = sqlx::query_as(
        "SELECT o.courier, COUNT(*)::BIGINT, COALESCE(SUM(shipping_cost), 0)::BIGINT, \
                COUNT(*) FILTER (WHERE o.status = 'DELIVERED')::BIGINT, \
                COUNT(*) FILTER (WHERE o.status = 'FAILED')::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.courier \
         ORDER BY COUNT(*) DESC",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let service_usage: Vec<(String, i64)> = sqlx::query_as(
        "SELECT o.service, COUNT(*)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.service \
         ORDER BY COUNT(*) DESC",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let top_routes: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT o.recipient_city, COUNT(*)::BIGINT, COALESCE(SUM(shipping_cost), 0)::BIGINT \
         FROM orders o \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
           AND ($3::timestamptz IS NULL OR o.created_at < $3) \
         GROUP BY o.recipient_city \
         ORDER BY COUNT(*) DESC \
         LIMIT 10",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let (average_shipping_cost, average_weight) = if total_orders > 0 {
        (
            round1(total_shipping_cost as f64 / total_orders as f64),
            round1(total_weight / total_orders as f64),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(ApiResponse::success(ShippingReport {
        overview: ShippingOverview {
            total_orders,
            total_shipping_cost,
            average_shipping_cost,
            total_weight: round1(total_weight),
            average_weight,
        },
        courier_performance: courier_rows
            .into_iter()
            .map(
                |(courier, total_orders, total_cost, delivered, failed)| CourierPerformance {
                    courier,
                    total_orders,
                    total_cost,
                    delivered,
                    failed,
                    pending: total_orders - delivered - failed,
                },
            )
            .collect(),
        service_usage: service_usage
            .into_iter()
            .map(|(service, orders)| ServiceUsage { service, orders })
            .collect(),
        top_routes: top_routes
            .into_iter()
            .map(|(destination, orders, total_shipping_cost)| RouteUsage {
                destination,
                orders,
                total_shipping_cost,
            })
            .collect(),
    }))
}

pub async fn returns(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<ReturnsReport>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let (total_returns, total_orders): (i64, i64) = sqlx::query_as(
        "SELECT \
             (SELECT COUNT(*)::BIGINT FROM returns r \
              JOIN orders o ON o.id = r.order_id \
              WHERE o.merchant_id = $1 \
                AND ($2::timestamptz IS NULL OR r.requested_at >= $2) \
                AND ($3::timestamptz IS NULL OR r.requested_at < $3)), \
             (SELECT COUNT(*)::BIGINT FROM orders o \
              WHERE o.merchant_id = $1 \
                AND ($2::timestamptz IS NULL OR o.created_at >= $2) \
                AND ($3::timestamptz IS NULL OR o.created_at < $3))",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let status_breakdown: Vec<(String, i64)> = sqlx::query_as(
        "SELECT r.status, COUNT(*)::BIGINT \
         FROM returns r \
         JOIN orders o ON o.id = r.order_id \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR r.requested_at >= $2) \
           AND ($3::timestamptz IS NULL OR r.requested_at < $3) \
         GROUP BY r.status",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let reasons: Vec<(String,)> = sqlx::query_as(
        "SELECT r.reason \
         FROM returns r \
         JOIN orders o ON o.id = r.order_id \
         WHERE o.merchant_id = $1 \
           AND ($2::timestamptz IS NULL OR r.requested_at >= $2) \
           AND ($3::timestamptz IS NULL OR r.requested_at < $3)",
    )
    .bind(merchant.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let mut categories: Vec<ReasonCategory> = Vec::new();
    for (reason,) in &reasons {
        let category = categorize_reason(reason);
        match categories.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.count += 1,
            None => categories.push(ReasonCategory {
                category: category.into(),
                count: 1,
            }),
        }
    }
    categories.sort_by(|a, b| b.count.cmp(&a.count));

    let recent_returns = Returns::find()
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .order_by_desc(returns::Column::RequestedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(return_service::with_order_summary)
        .collect::<AppResult<Vec<_>>>()?;

    let return_rate = if total_orders > 0 {
        round1(total_returns as f64 / total_orders as f64 * 100.0)
    } else {
        0.0
    };

    Ok(ApiResponse::success(ReturnsReport {
        overview: ReturnsOverview {
            total_returns,
            return_rate,
        },
        status_breakdown: status_breakdown
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        reason_categories: categories,
        recent_returns,
    }))
}

pub async fn export_sales(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<Download> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let mut finder = Orders::find().filter(orders::Column::MerchantId.eq(merchant.id));
    if let Some(start) = start {
        finder = finder.filter(orders::Column::CreatedAt.gte(start));
    }
    if let Some(end) = end {
        finder = finder.filter(orders::Column::CreatedAt.lt(end));
    }
    let rows = finder
        .order_by_desc(orders::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let headers = [
        "Order Number",
        "Date",
        "Recipient",
        "City",
        "Courier",
        "Service",
        "Status",
        "Payment Method",
        "Item Value",
        "Shipping Cost",
    ];
    let records = rows.into_iter().map(|order| {
        vec![
            order.order_number,
            order.created_at.format("%Y-%m-%d").to_string(),
            order.recipient_name,
            order.recipient_city,
            order.courier.as_str().to_string(),
            order.service,
            order.status.as_str().to_string(),
            order.payment_method.as_str().to_string(),
            order.item_value.to_string(),
            order.shipping_cost.to_string(),
        ]
    });

    Ok(Download {
        filename: format!("sales-report-{}.csv", Utc::now().format("%Y-%m-%d")),
        content_type: "text/csv",
        bytes: write_csv(&headers, records)?,
    })
}

pub async fn export_cod(
    state: &AppState,
    auth: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<Download> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (start, end) = window(range);

    let mut finder = CodRecords::find()
        .find_also_related(Orders)
        .filter(orders::Column::MerchantId.eq(merchant.id));
    if let Some(start) = start {
        finder = finder.filter(cod_records::Column::CreatedAt.gte(start));
    }
    if let Some(end) = end {
        finder = finder.filter(cod_records::Column::CreatedAt.lt(end));
    }
    let rows = finder
        .order_by_desc(cod_records::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let format_ts = |ts: Option<sea_orm::prelude::DateTimeWithTimeZone>| {
        ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    };
    let headers = [
        "Order Number",
        "Recipient",
        "Amount",
        "Status",
        "Collected At",
        "Remitted At",
        "Settled At",
    ];
    let records: Vec<Vec<String>> = rows
        .into_iter()
        .map(|(record, order)| {
            let (order_number, recipient) = order
                .map(|o| (o.order_number, o.recipient_name))
                .unwrap_or_default();
            vec![
                order_number,
                recipient,
                record.amount.to_string(),
                record.status.as_str().to_string(),
                format_ts(record.collected_at),
                format_ts(record.remitted_at),
                format_ts(record.settled_at),
            ]
        })
        .collect();

    Ok(Download {
        filename: format!("cod-report-{}.csv", Utc::now().format("%Y-%m-%d")),
        content_type: "text/csv",
        bytes: write_csv(&headers, records)?,
    })
}

fn categorize_reason(reason: &str) -> &'static str {
    let reason = reason.to_lowercase();
    if reason.contains("damaged") || reason.contains("broken") {
        "Damaged"
    } else if reason.contains("wrong") || reason.contains("incorrect") {
        "Wrong Item"
    } else if reason.contains("size") || reason.contains("fit") {
        "Size/Fit Issue"
    } else if reason.contains("quality") {
        "Quality Issue"
    } else if reason.contains("late") || reason.contains("delay") {
        "Delivery Issue"
    } else {
        "Other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn window_is_half_open_on_the_end_date() {
        let range = DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        };
        let (start, end) = window(range);
        assert_eq!(start.unwrap().to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn reasons_map_to_categories_by_keyword() {
        assert_eq!(categorize_reason("Item arrived broken"), "Damaged");
        assert_eq!(categorize_reason("Wrong color delivered"), "Wrong Item");
        assert_eq!(categorize_reason("Does not fit"), "Size/Fit Issue");
        assert_eq!(categorize_reason("Poor quality stitching"), "Quality Issue");
        assert_eq!(categorize_reason("Arrived two weeks late"), "Delivery Issue");
        assert_eq!(categorize_reason("Changed my mind"), "Other");
    }

    #[test]
    fn averages_round_to_one_decimal() {
        assert_eq!(round1(2.34), 2.3);
        assert_eq!(round1(2.35), 2.4);
        assert_eq!(round1(0.0), 0.0);
    }
}
