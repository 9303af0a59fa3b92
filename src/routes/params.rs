/// Clamp raw pagination query values. Pages are 1-based; limits are capped so
/// a single request cannot pull the whole table.
pub fn normalize(page: Option<i64>, limit: Option<i64>) -> (i64, i64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    let offset = ((page - 1) * limit) as u64;
    (page, limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        assert_eq!(normalize(None, None), (1, 10, 0));
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(normalize(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(normalize(Some(-3), Some(1000)), (1, 100, 0));
        assert_eq!(normalize(Some(3), Some(20)), (3, 20, 40));
    }
}
