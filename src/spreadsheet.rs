use csv::{ReaderBuilder, Writer};

use crate::error::{AppError, AppResult};

pub const ORDER_IMPORT_HEADERS: [&str; 18] = [
    "Recipient Name",
    "Recipient Phone",
    "Recipient Address",
    "Recipient City",
    "Recipient Province",
    "Recipient Postal Code",
    "Courier",
    "Service",
    "Weight",
    "Length",
    "Width",
    "Height",
    "Item Name",
    "Item Value",
    "Payment Method",
    "COD Amount",
    "Shipping Cost",
    "Notes",
];

/// One raw import row with the original's loose defaults applied. Semantic
/// validation (phone length, minimum item value, courier enum) happens in the
/// order service so that per-row failures can be reported with row numbers.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_province: String,
    pub recipient_postal_code: String,
    pub courier: String,
    pub service: String,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub item_name: String,
    pub item_value: i64,
    pub payment_method: String,
    pub cod_amount: i64,
    pub shipping_cost: i64,
    pub notes: String,
}

/// Parse an uploaded CSV into order rows. Headers are matched by either the
/// template's "Title Case" names or their camelCase equivalents.
pub fn parse_order_csv(data: &[u8]) -> AppResult<Vec<OrderRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Failed to parse file: {e}")))?
        .clone();

    let index_of = |names: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };

    let col = |record: &csv::StringRecord, names: &[&str]| -> String {
        index_of(names)
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Validation(format!("Failed to parse file: {e}")))?;

        let number = |names: &[&str], default: f64| -> f64 {
            let raw = col(&record, names);
            if raw.is_empty() {
                default
            } else {
                raw.parse().unwrap_or(default)
            }
        };
        let amount = |names: &[&str], default: i64| -> i64 {
            number(names, default as f64) as i64
        };

        let courier = {
            let raw = col(&record, &["Courier", "courier"]);
            if raw.is_empty() {
                "JNE".to_string()
            } else {
                raw.to_uppercase()
            }
        };
        let service = {
            let raw = col(&record, &["Service", "service"]);
            if raw.is_empty() { "REG".to_string() } else { raw }
        };
        let payment_method = {
            let raw = col(&record, &["Payment Method", "paymentMethod"]);
            if raw.is_empty() {
                "COD".to_string()
            } else {
                raw.to_uppercase()
            }
        };

        rows.push(OrderRow {
            recipient_name: col(&record, &["Recipient Name", "recipientName"]),
            recipient_phone: col(&record, &["Recipient Phone", "recipientPhone"]),
            recipient_address: col(&record, &["Recipient Address", "recipientAddress"]),
            recipient_city: col(&record, &["Recipient City", "recipientCity"]),
            recipient_province: col(&record, &["Recipient Province", "recipientProvince"]),
            recipient_postal_code: col(&record, &["Recipient Postal Code", "recipientPostalCode"]),
            courier,
            service,
            weight: number(&["Weight", "weight"], 1.0),
            length: number(&["Length", "length"], 10.0),
            width: number(&["Width", "width"], 10.0),
            height: number(&["Height", "height"], 10.0),
            item_name: col(&record, &["Item Name", "itemName"]),
            item_value: amount(&["Item Value", "itemValue"], 0),
            payment_method,
            cod_amount: amount(&["COD Amount", "codAmount"], 0),
            shipping_cost: amount(&["Shipping Cost", "shippingCost"], 0),
            notes: col(&record, &["Notes", "notes"]),
        });
    }

    if rows.is_empty() {
        return Err(AppError::Validation("File is empty".into()));
    }

    Ok(rows)
}

/// Downloadable template with one sample row.
pub fn order_template_csv() -> AppResult<Vec<u8>> {
    let sample = [
        "John Doe",
        "08123456789",
        "Jl. Sudirman No. 123",
        "Jakarta",
        "DKI Jakarta",
        "10220",
        "JNE",
        "REG",
        "1.0",
        "20",
        "15",
        "10",
        "Paket Barang",
        "150000",
        "COD",
        "150000",
        "15000",
        "Handle with care",
    ];
    write_csv(&ORDER_IMPORT_HEADERS, std::iter::once(sample.map(String::from).to_vec()))
}

/// Serialize header + rows into CSV bytes for download endpoints.
pub fn write_csv<I>(headers: &[&str], rows: I) -> AppResult<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_template_headers() {
        let template = order_template_csv().unwrap();
        let rows = parse_order_csv(&template).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.recipient_name, "John Doe");
        assert_eq!(row.courier, "JNE");
        assert_eq!(row.item_value, 150_000);
        assert_eq!(row.cod_amount, 150_000);
        assert!((row.weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_camel_case_headers_with_defaults() {
        let data = b"recipientName,recipientPhone,recipientAddress,itemName,itemValue\n\
            Jane,08111111111,Jl. Thamrin No. 5 Jakarta,Sepatu,250000\n";
        let rows = parse_order_csv(data).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.recipient_name, "Jane");
        assert_eq!(row.courier, "JNE");
        assert_eq!(row.service, "REG");
        assert_eq!(row.payment_method, "COD");
        assert!((row.weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(row.item_value, 250_000);
    }

    #[test]
    fn empty_file_is_rejected() {
        let data = b"Recipient Name,Recipient Phone\n";
        assert!(parse_order_csv(data).is_err());
    }
}
