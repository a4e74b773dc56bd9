//! Pagination policy for list endpoints
//!
//! Raw `page` / `pageSize` query values are normalized into a bounded window.
//! Nothing here fails: non-numeric input falls back to defaults and
//! out-of-range input is clamped.
//!
//! # Example
//!
//! ```rust
//! use listing_service::listing::{PageWindow, RawListParams};
//!
//! let window = PageWindow::normalize(Some("2"), Some("50"));
//! assert_eq!(window.page, 2);
//! assert_eq!(window.page_size, 50);
//! assert_eq!(window.offset, 50);
//! assert_eq!(window.limit_inclusive_end, 99);
//!
//! let params = RawListParams::default();
//! assert_eq!(params.window(), PageWindow::normalize(None, None));
//! ```

use serde::{Deserialize, Serialize};

use crate::store::RecordRange;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number
pub const DEFAULT_PAGE: u64 = 1;

/// Query parameters as they arrive, before any parsing
///
/// Values stay strings so that garbage input can be defaulted instead of
/// rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListParams {
    /// Requested page (1-indexed)
    #[serde(default)]
    pub page: Option<String>,

    /// Requested items per page
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<String>,
}

impl RawListParams {
    /// Params with both values set
    pub fn new(page: impl Into<String>, page_size: impl Into<String>) -> Self {
        Self {
            page: Some(page.into()),
            page_size: Some(page_size.into()),
        }
    }

    /// Normalize into a page window
    pub fn window(&self) -> PageWindow {
        PageWindow::normalize(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// A normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page number, at least 1
    pub page: u64,
    /// Items per page, within `1..=MAX_PAGE_SIZE`
    pub page_size: u64,
    /// Records to skip: `(page - 1) * page_size`
    pub offset: u64,
    /// Position of the last record on this page: `offset + page_size - 1`
    pub limit_inclusive_end: u64,
}

impl PageWindow {
    /// Build a window from raw query values
    ///
    /// - `page`: parse failure or a value below 1 gives 1
    /// - `page_size`: parse failure gives 20, then clamped to `1..=100`
    ///
    /// # Example
    ///
    /// ```rust
    /// use listing_service::listing::PageWindow;
    ///
    /// // Capped at MAX_PAGE_SIZE
    /// assert_eq!(PageWindow::normalize(None, Some("500")).page_size, 100);
    /// // Raised to the minimum
    /// assert_eq!(PageWindow::normalize(None, Some("0")).page_size, 1);
    /// // Not a number
    /// assert_eq!(PageWindow::normalize(Some("abc"), Some("lots")).page, 1);
    /// assert_eq!(PageWindow::normalize(Some("abc"), Some("lots")).page_size, 20);
    /// ```
    #[must_use]
    pub fn normalize(raw_page: Option<&str>, raw_page_size: Option<&str>) -> Self {
        let page = raw_page
            .and_then(parse_integer)
            .filter(|page| *page >= 1)
            .map_or(DEFAULT_PAGE, |page| page as u64);

        let page_size = raw_page_size
            .and_then(parse_integer)
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u64;

        Self::new(page, page_size)
    }

    /// Build a window from already-valid numbers, clamping them the same way
    #[must_use]
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(page_size);
        Self {
            page,
            page_size,
            offset,
            limit_inclusive_end: offset.saturating_add(page_size - 1),
        }
    }

    /// The store range this window covers, newest first
    #[must_use]
    pub fn range(&self) -> RecordRange {
        RecordRange::new(self.offset, self.limit_inclusive_end)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Decimal integer with optional sign and surrounding whitespace
///
/// Values beyond `i64` saturate instead of failing, so an absurd page number
/// still reads as "very large" rather than "missing".
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            let (negative, digits) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
            };
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                Some(if negative { i64::MIN } else { i64::MAX })
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let window = PageWindow::normalize(None, None);
        assert_eq!(window.page, 1);
        assert_eq!(window.page_size, 20);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit_inclusive_end, 19);
        assert_eq!(window, PageWindow::default());
    }

    #[test]
    fn test_page_below_one_or_garbage_is_one() {
        for raw in ["0", "-3", "abc", "", "1.5", "2abc", " "] {
            assert_eq!(PageWindow::normalize(Some(raw), None).page, 1, "page {:?}", raw);
        }
    }

    #[test]
    fn test_page_size_non_numeric_defaults() {
        for raw in ["abc", "", "20.0", "ten"] {
            assert_eq!(
                PageWindow::normalize(None, Some(raw)).page_size,
                20,
                "pageSize {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_page_size_clamped_from_below() {
        assert_eq!(PageWindow::normalize(None, Some("0")).page_size, 1);
        assert_eq!(PageWindow::normalize(None, Some("-50")).page_size, 1);
    }

    #[test]
    fn test_page_size_capped() {
        assert_eq!(PageWindow::normalize(None, Some("101")).page_size, 100);
        assert_eq!(PageWindow::normalize(None, Some("500")).page_size, 100);
        assert_eq!(
            PageWindow::normalize(None, Some("99999999999999999999999")).page_size,
            100
        );
        assert_eq!(PageWindow::normalize(None, Some("100")).page_size, 100);
    }

    #[test]
    fn test_whitespace_and_sign_are_accepted() {
        let window = PageWindow::normalize(Some(" 3 "), Some("+10"));
        assert_eq!(window.page, 3);
        assert_eq!(window.page_size, 10);
    }

    #[test]
    fn test_offset_and_inclusive_end() {
        let window = PageWindow::normalize(Some("2"), Some("50"));
        assert_eq!(window.offset, 50);
        assert_eq!(window.limit_inclusive_end, 99);

        let window = PageWindow::normalize(Some("3"), Some("1"));
        assert_eq!(window.offset, 2);
        assert_eq!(window.limit_inclusive_end, 2);
    }

    #[test]
    fn test_huge_page_saturates() {
        let window = PageWindow::normalize(Some("99999999999999999999999"), Some("100"));
        assert_eq!(window.page, i64::MAX as u64);
        assert_eq!(window.offset, u64::MAX);
        assert_eq!(window.limit_inclusive_end, u64::MAX);
    }

    #[test]
    fn test_range_matches_window() {
        let range = PageWindow::normalize(Some("4"), Some("25")).range();
        assert_eq!(range.offset, 75);
        assert_eq!(range.end_inclusive, 99);
        assert_eq!(range.len(), 25);
    }

    #[test]
    fn test_raw_params_deserialize_camel_case() {
        let params: RawListParams =
            serde_json::from_str(r#"{"page": "2", "pageSize": "50"}"#).unwrap();
        assert_eq!(params, RawListParams::new("2", "50"));
        assert_eq!(params.window().offset, 50);
    }
}
