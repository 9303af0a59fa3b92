use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{
    models::{Merchant, Order, PaymentMethod},
    util::{format_currency, format_phone_number},
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;

/// Render the A4 shipping label for an order. Pure function of the order and
/// its merchant; the print-count bookkeeping happens in the order service.
pub fn shipping_label(order: &Order, merchant: &Merchant) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Shipping Label {}", order.order_number),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "label",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut cursor = Cursor {
        layer,
        regular,
        bold,
        y: PAGE_HEIGHT - 20.0,
    };

    cursor.heading(18.0, "SHIPPING LABEL");
    cursor.space();

    cursor.heading(12.0, "ORDER INFORMATION");
    cursor.line(&format!("Order Number: {}", order.order_number));
    cursor.line(&format!(
        "Courier: {} - {}",
        order.courier.as_str(),
        order.service
    ));
    cursor.line(&format!("Weight: {} kg", order.weight));
    cursor.line(&format!("Payment: {}", order.payment_method.as_str()));
    if order.payment_method == PaymentMethod::Cod {
        if let Some(amount) = order.cod_amount {
            cursor.line(&format!("COD Amount: {}", format_currency(amount)));
        }
    }
    cursor.line(&format!(
        "Shipping Cost: {}",
        format_currency(order.shipping_cost)
    ));
    cursor.space();

    cursor.heading(12.0, "FROM:");
    cursor.line(&merchant.business_name);
    cursor.line(&merchant.address);
    cursor.line(&format!("{}, {}", merchant.city, merchant.province));
    cursor.line(&format!("Phone: {}", format_phone_number(&merchant.phone)));
    cursor.space();

    cursor.heading(12.0, "TO:");
    cursor.line(&order.recipient_name);
    cursor.line(&order.recipient_address);
    cursor.line(&format!(
        "{}, {}",
        order.recipient_city, order.recipient_province
    ));
    cursor.line(&format!("Postal Code: {}", order.recipient_postal_code));
    cursor.line(&format!(
        "Phone: {}",
        format_phone_number(&order.recipient_phone)
    ));
    cursor.space();

    cursor.heading(12.0, "ITEM DETAILS:");
    cursor.line(&format!("Item Name: {}", order.item_name));
    cursor.line(&format!(
        "Item Value: {}",
        format_currency(order.item_value)
    ));
    cursor.line(&format!(
        "Dimensions: {} x {} x {} cm",
        order.length, order.width, order.height
    ));
    cursor.space();

    cursor.heading(12.0, "TRACKING INFORMATION:");
    match order.tracking_number.as_deref() {
        Some(tracking) => cursor.line(&format!("Tracking Number: {tracking}")),
        None => cursor.line("Tracking Number: [To be assigned by courier]"),
    }
    cursor.space();

    cursor.heading(14.0, &format!("|||| {} ||||", order.order_number));

    let bytes = doc.save_to_bytes()?;
    Ok(bytes)
}

struct Cursor {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Cursor {
    fn heading(&mut self, size: f32, text: &str) {
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT;
    }

    fn line(&mut self, text: &str) {
        self.layer
            .use_text(text, 10.0, Mm(MARGIN), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT;
    }

    fn space(&mut self) {
        self.y -= LINE_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Courier, OrderStatus, PaymentMethod};

    fn sample_merchant() -> Merchant {
        let now = Utc::now();
        Merchant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_name: "Toko Maju".into(),
            business_type: "Retail".into(),
            address: "Jl. Sudirman No. 123".into(),
            city: "Jakarta".into(),
            province: "DKI Jakarta".into(),
            postal_code: "10220".into(),
            phone: "081234567890".into(),
            email: "shop@example.com".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_order(merchant_id: Uuid) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            merchant_id,
            order_number: "ORD-20260826-AB12CD34".into(),
            recipient_name: "Budi Santoso".into(),
            recipient_phone: "081298765432".into(),
            recipient_address: "Jl. Braga No. 45".into(),
            recipient_city: "Bandung".into(),
            recipient_province: "Jawa Barat".into(),
            recipient_postal_code: "40111".into(),
            courier: Courier::Jne,
            service: "REG".into(),
            weight: 1.5,
            length: 20.0,
            width: 15.0,
            height: 10.0,
            item_name: "Sepatu Lari".into(),
            item_value: 250_000,
            payment_method: PaymentMethod::Cod,
            cod_amount: Some(250_000),
            shipping_cost: 15_000,
            status: OrderStatus::Pending,
            tracking_number: None,
            notes: None,
            print_count: 0,
            last_printed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn renders_pdf_bytes() {
        let merchant = sample_merchant();
        let order = sample_order(merchant.id);
        let bytes = shipping_label(&order, &merchant).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_with_tracking_number() {
        let merchant = sample_merchant();
        let mut order = sample_order(merchant.id);
        order.tracking_number = Some("JNE12345678901".into());
        let bytes = shipping_label(&order, &merchant).unwrap();
        assert!(!bytes.is_empty());
    }
}
