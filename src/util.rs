use chrono::Utc;
use uuid::Uuid;

use crate::models::Courier;

/// Order numbers are generated server-side, never user-supplied. The suffix
/// comes from a v4 UUID so numbers are unique and unpredictable.
pub fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{date}-{}", suffix[..8].to_uppercase())
}

pub fn generate_tracking_number(courier: Courier) -> String {
    let prefix = &courier.as_str()[..3];
    let millis = Utc::now().timestamp_millis().to_string();
    let ts = &millis[millis.len().saturating_sub(6)..];
    let random = Uuid::new_v4().as_u128() % 100_000;
    format!("{prefix}{ts}{random:05}")
}

/// Rupiah with id-ID thousand grouping, no decimals: `Rp 1.500.000`.
pub fn format_currency(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Normalize to the +62 international form, assuming Indonesian numbers.
pub fn format_phone_number(phone: &str) -> String {
    let cleaned: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = cleaned.strip_prefix('0') {
        format!("+62{rest}")
    } else if cleaned.starts_with("62") {
        format!("+{cleaned}")
    } else {
        format!("+62{cleaned}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_has_date_and_suffix() {
        let number = generate_order_number();
        assert!(number.starts_with("ORD-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn order_numbers_do_not_collide() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert_ne!(a, b);
    }

    #[test]
    fn tracking_number_uses_courier_prefix() {
        let number = generate_tracking_number(Courier::Sicepat);
        assert!(number.starts_with("SIC"));
        assert_eq!(number.len(), 14);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0), "Rp 0");
        assert_eq!(format_currency(1500), "Rp 1.500");
        assert_eq!(format_currency(150_000), "Rp 150.000");
        assert_eq!(format_currency(1_500_000), "Rp 1.500.000");
        assert_eq!(format_currency(-25_000), "-Rp 25.000");
    }

    #[test]
    fn phone_numbers_normalize_to_plus_62() {
        assert_eq!(format_phone_number("08123456789"), "+628123456789");
        assert_eq!(format_phone_number("628123456789"), "+628123456789");
        assert_eq!(format_phone_number("+62 812-3456-789"), "+628123456789");
        assert_eq!(format_phone_number("8123456789"), "+628123456789");
    }
}
