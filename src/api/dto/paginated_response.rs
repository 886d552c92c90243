use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(default)]
    pub max_limit_reached: bool,
}

impl PaginationInfo {
    /// `total_items` is whatever the caller wants reported, which may be the
    /// cap rather than an exact count when `max_limit_reached` is set.
    pub fn compute(
        page: usize,
        page_size: usize,
        total_items: usize,
        max_limit_reached: bool,
    ) -> Self {
        let page_size = page_size.max(1);
        let total_pages = if total_items > 0 {
            total_items.div_ceil(page_size)
        } else {
            1
        };

        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
            max_limit_reached,
        }
    }
}

/// Start and end offsets of `page` within a list of `len` items.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> (usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_still_has_one_page() {
        let info = PaginationInfo::compute(1, 50, 0, false);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
        assert!(!info.has_previous);
    }

    #[test]
    fn total_pages_rounds_up() {
        for (total, size, pages) in [(1, 50, 1), (50, 50, 1), (51, 50, 2), (1000, 50, 20), (7, 3, 3)] {
            let info = PaginationInfo::compute(1, size, total, false);
            assert_eq!(info.total_pages, pages, "total={total} size={size}");
        }
    }

    #[test]
    fn next_and_previous_follow_page_position() {
        let first = PaginationInfo::compute(1, 10, 25, false);
        assert!(first.has_next && !first.has_previous);

        let middle = PaginationInfo::compute(2, 10, 25, false);
        assert!(middle.has_next && middle.has_previous);

        let last = PaginationInfo::compute(3, 10, 25, false);
        assert!(!last.has_next && last.has_previous);

        let beyond = PaginationInfo::compute(9, 10, 25, false);
        assert!(!beyond.has_next && beyond.has_previous);
    }

    #[test]
    fn page_bounds_cover_list_without_overlap() {
        let len = 23;
        let size = 5;
        let mut seen = Vec::new();
        for page in 1..=6 {
            let (start, end) = page_bounds(page, size, len);
            assert_eq!(start, ((page - 1) * size).min(len));
            assert_eq!(end, (page * size).min(len));
            seen.extend(start..end);
        }
        assert_eq!(seen, (0..len).collect::<Vec<_>>());
    }
}
