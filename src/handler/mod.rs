pub mod health;
pub mod logs;
pub mod snapshots;
pub mod stats;

/// Normalize 1-indexed pagination query params. Missing or non-positive
/// values fall back to page 1 and the given default page size.
pub(crate) fn normalize_page(
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: usize,
) -> (usize, usize) {
    let page = page.filter(|p| *p >= 1).unwrap_or(1) as usize;
    let per_page = per_page
        .filter(|p| *p >= 1)
        .map(|p| p as usize)
        .unwrap_or(default_per_page);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::normalize_page;

    #[test]
    fn missing_params_use_defaults() {
        assert_eq!(normalize_page(None, None, 50), (1, 50));
    }

    #[test]
    fn non_positive_params_use_defaults() {
        assert_eq!(normalize_page(Some(0), Some(-3), 20), (1, 20));
    }

    #[test]
    fn positive_params_pass_through() {
        assert_eq!(normalize_page(Some(2), Some(10), 50), (2, 10));
    }
}
