use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::orders::{
        BulkImportReport, CreateOrderRequest, ImportError, ImportedOrder, OrderDetail,
        OrderListItem, OrderListQuery, OrderWithCod, UpdateOrderStatusRequest,
    },
    entity::{
        CodRecords, Orders, Returns, TrackingHistory, cod_records, orders, tracking_history,
    },
    error::{AppError, AppResult},
    label,
    middleware::auth::AuthUser,
    models::{CodRecord, Courier, OrderStatus, PaymentMethod, TrackingEvent},
    response::{ApiResponse, Download, Pagination},
    routes::params::normalize,
    services::{merchant_service::resolve_merchant, now},
    spreadsheet::{self, OrderRow},
    state::AppState,
    util::{generate_order_number, generate_tracking_number},
};

pub async fn create_order(
    state: &AppState,
    auth: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithCod>> {
    payload.validate()?;
    if payload.payment_method == PaymentMethod::Cod && payload.cod_amount.unwrap_or(0) <= 0 {
        return Err(AppError::Validation(
            "COD amount is required for COD orders".into(),
        ));
    }

    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;

    let txn = state.orm.begin().await?;
    let (order, cod) = insert_order(&txn, merchant.id, payload).await?;
    txn.commit().await?;

    Ok(ApiResponse::with_message(
        OrderWithCod {
            order: order.into(),
            cod_record: cod.map(CodRecord::from),
        },
        "Order created successfully",
    ))
}

pub async fn list_orders(
    state: &AppState,
    auth: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<Vec<OrderListItem>>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let (page, limit, offset) = normalize(query.page, query.limit);

    let mut finder = Orders::find().filter(orders::Column::MerchantId.eq(merchant.id));
    if let Some(status) = query.status {
        finder = finder.filter(orders::Column::Status.eq(status));
    }
    finder = finder.order_by_desc(orders::Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let page_rows = finder
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = page_rows.iter().map(|o| o.id).collect();
    let cods = CodRecords::find()
        .filter(cod_records::Column::OrderId.is_in(ids.clone()))
        .all(&state.orm)
        .await?;
    let events = TrackingHistory::find()
        .filter(tracking_history::Column::OrderId.is_in(ids))
        .order_by_desc(tracking_history::Column::Date)
        .all(&state.orm)
        .await?;

    let items = page_rows
        .into_iter()
        .map(|order| {
            let cod_record = cods
                .iter()
                .find(|c| c.order_id == order.id)
                .cloned()
                .map(CodRecord::from);
            // events are date-descending, so the first match is the latest
            let tracking_history = events
                .iter()
                .find(|e| e.order_id == order.id)
                .cloned()
                .map(TrackingEvent::from)
                .into_iter()
                .collect();
            OrderListItem {
                order: order.into(),
                cod_record,
                tracking_history,
            }
        })
        .collect();

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    ))
}

pub async fn get_order(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = find_owned(&state.orm, merchant.id, id).await?;

    let cod_record = order
        .find_related(CodRecords)
        .one(&state.orm)
        .await?
        .map(CodRecord::from);
    let tracking_history = order
        .find_related(TrackingHistory)
        .order_by_desc(tracking_history::Column::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(TrackingEvent::from)
        .collect();
    let return_record = order
        .find_related(Returns)
        .one(&state.orm)
        .await?
        .map(Into::into);

    Ok(ApiResponse::success(OrderDetail {
        order: order.into(),
        merchant: merchant.into(),
        cod_record,
        tracking_history,
        return_record,
    }))
}

pub async fn update_status(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithCod>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = find_owned(&state.orm, merchant.id, id).await?;

    let txn = state.orm.begin().await?;
    let (order, cod) = apply_status(&txn, order, payload.status, payload.tracking_number, None, None)
        .await?;
    txn.commit().await?;

    Ok(ApiResponse::with_message(
        OrderWithCod {
            order: order.into(),
            cod_record: cod.map(CodRecord::from),
        },
        "Order status updated successfully",
    ))
}

/// Orders are only deletable while still PENDING; anything further along has
/// already been handed to a courier.
pub async fn delete_order(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<()>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = Orders::find_by_id(id)
        .filter(orders::Column::MerchantId.eq(merchant.id))
        .filter(orders::Column::Status.eq(OrderStatus::Pending))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found or cannot be deleted".into()))?;

    order.delete(&state.orm).await?;
    Ok(ApiResponse::message("Order deleted successfully"))
}

/// Renders the label and bumps the print counter in one go.
pub async fn print_label(state: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<Download> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let order = find_owned(&state.orm, merchant.id, id).await?;

    let print_count = order.print_count + 1;
    let mut active: orders::ActiveModel = order.into();
    active.print_count = Set(print_count);
    active.last_printed_at = Set(Some(now()));
    let order = active.update(&state.orm).await?;

    let filename = format!("label-{}.pdf", order.order_number);
    let bytes = label::shipping_label(&order.into(), &merchant.into())?;
    Ok(Download {
        filename,
        content_type: "application/pdf",
        bytes,
    })
}

pub fn import_template() -> AppResult<Download> {
    Ok(Download {
        filename: "order-import-template.csv".into(),
        content_type: "text/csv",
        bytes: spreadsheet::order_template_csv()?,
    })
}

/// Bulk CSV import. Each row gets its own transaction so one bad row never
/// takes down the rest of the file.
pub async fn bulk_import(
    state: &AppState,
    auth: &AuthUser,
    file: &[u8],
) -> AppResult<ApiResponse<BulkImportReport>> {
    let merchant = resolve_merchant(&state.orm, auth.user_id).await?;
    let rows = spreadsheet::parse_order_csv(file)?;
    let total_rows = rows.len();

    let mut success_orders = Vec::new();
    let mut errors: Vec<ImportError> = Vec::new();

    for (i, row) in rows.into_iter().enumerate() {
        // +2: rows are 1-based and the header occupies the first line
        let row_number = i + 2;
        match import_row(state, merchant.id, row).await {
            Ok((order_number, recipient_name)) => success_orders.push(ImportedOrder {
                row: row_number,
                order_number,
                recipient_name,
            }),
            Err(err) => {
                if errors.len() < 10 {
                    errors.push(ImportError {
                        row: row_number,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    let success_count = success_orders.len();
    let error_count = total_rows - success_count;
    let message = format!("Import completed: {success_count} successful, {error_count} failed");
    Ok(ApiResponse::with_message(
        BulkImportReport {
            total_rows,
            success_count,
            error_count,
            success_orders,
            errors,
        },
        message,
    ))
}

async fn import_row(
    state: &AppState,
    merchant_id: Uuid,
    row: OrderRow,
) -> AppResult<(String, String)> {
    let courier = Courier::parse(&row.courier)
        .ok_or_else(|| AppError::Validation(format!("Unknown courier: {}", row.courier)))?;
    let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
        AppError::Validation(format!("Unknown payment method: {}", row.payment_method))
    })?;

    let cod_amount = match payment_method {
        PaymentMethod::Cod if row.cod_amount > 0 => Some(row.cod_amount),
        // COD rows without an explicit amount collect the item value
        PaymentMethod::Cod => Some(row.item_value),
        PaymentMethod::Prepaid => None,
    };

    let payload = CreateOrderRequest {
        recipient_name: row.recipient_name,
        recipient_phone: row.recipient_phone,
        recipient_address: row.recipient_address,
        recipient_city: row.recipient_city,
        recipient_province: row.recipient_province,
        recipient_postal_code: row.recipient_postal_code,
        courier,
        service: row.service,
        weight: row.weight,
        length: row.length,
        width: row.width,
        height: row.height,
        item_name: row.item_name,
        item_value: row.item_value,
        payment_method,
        cod_amount,
        shipping_cost: row.shipping_cost,
        notes: if row.notes.is_empty() {
            None
        } else {
            Some(row.notes)
        },
    };
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let (order, _) = insert_order(&txn, merchant_id, payload).await?;
    txn.commit().await?;
    Ok((order.order_number, order.recipient_name))
}

/// Insert an order plus its initial tracking event and, for COD, the pending
/// collection record. Caller owns the transaction.
async fn insert_order<C: ConnectionTrait>(
    conn: &C,
    merchant_id: Uuid,
    payload: CreateOrderRequest,
) -> AppResult<(orders::Model, Option<cod_records::Model>)> {
    let ts = now();
    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        merchant_id: Set(merchant_id),
        order_number: Set(generate_order_number()),
        recipient_name: Set(payload.recipient_name),
        recipient_phone: Set(payload.recipient_phone),
        recipient_address: Set(payload.recipient_address),
        recipient_city: Set(payload.recipient_city),
        recipient_province: Set(payload.recipient_province),
        recipient_postal_code: Set(payload.recipient_postal_code),
        courier: Set(payload.courier),
        service: Set(payload.service),
        weight: Set(payload.weight),
        length: Set(payload.length),
        width: Set(payload.width),
        height: Set(payload.height),
        item_name: Set(payload.item_name),
        item_value: Set(payload.item_value),
        payment_method: Set(payload.payment_method),
        cod_amount: Set(payload.cod_amount),
        shipping_cost: Set(payload.shipping_cost),
        status: Set(OrderStatus::Pending),
        tracking_number: Set(None),
        notes: Set(payload.notes),
        print_count: Set(0),
        last_printed_at: Set(None),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(conn)
    .await?;

    tracking_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        status: Set(OrderStatus::Pending),
        description: Set("Order created".into()),
        city: Set(None),
        date: Set(ts),
    }
    .insert(conn)
    .await?;

    let cod = if order.payment_method == PaymentMethod::Cod {
        let amount = order.cod_amount.unwrap_or(order.item_value);
        Some(
            cod_records::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                amount: Set(amount),
                status: Set(crate::models::CodStatus::Pending),
                collected_at: Set(None),
                remitted_at: Set(None),
                settled_at: Set(None),
                created_at: Set(ts),
                updated_at: Set(ts),
            }
            .insert(conn)
            .await?,
        )
    } else {
        None
    };

    Ok((order, cod))
}

/// Shared by the status endpoint and the courier webhook: move the order,
/// append a tracking event, and mark the COD record collected on delivery.
pub(crate) async fn apply_status<C: ConnectionTrait>(
    conn: &C,
    order: orders::Model,
    status: OrderStatus,
    tracking_number: Option<String>,
    description: Option<String>,
    city: Option<String>,
) -> AppResult<(orders::Model, Option<cod_records::Model>)> {
    let ts = now();

    let assign_tracking = order.tracking_number.is_none()
        && tracking_number.is_none()
        && status == OrderStatus::Confirmed;
    let courier = order.courier;

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    if let Some(tracking) = tracking_number {
        active.tracking_number = Set(Some(tracking));
    } else if assign_tracking {
        // Confirmation hands the parcel to the courier; make sure it is
        // trackable from that point on.
        active.tracking_number = Set(Some(generate_tracking_number(courier)));
    }
    active.updated_at = Set(ts);
    let order = active.update(conn).await?;

    tracking_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        status: Set(status),
        description: Set(
            description.unwrap_or_else(|| format!("Status updated to {}", status.as_str())),
        ),
        city: Set(city),
        date: Set(ts),
    }
    .insert(conn)
    .await?;

    let mut cod = CodRecords::find()
        .filter(cod_records::Column::OrderId.eq(order.id))
        .one(conn)
        .await?;

    if status == OrderStatus::Delivered && order.payment_method == PaymentMethod::Cod {
        if let Some(record) = cod.take() {
            if record.status == crate::models::CodStatus::Pending {
                let mut active: cod_records::ActiveModel = record.into();
                active.status = Set(crate::models::CodStatus::Collected);
                active.collected_at = Set(Some(ts));
                active.updated_at = Set(ts);
                cod = Some(active.update(conn).await?);
            } else {
                cod = Some(record);
            }
        }
    }

    Ok((order, cod))
}

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    merchant_id: Uuid,
    id: Uuid,
) -> AppResult<orders::Model> {
    Orders::find_by_id(id)
        .filter(orders::Column::MerchantId.eq(merchant_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))
}
