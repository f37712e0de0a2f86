//! Record queries: month + search predicate and pagination parameters

use salesboard_config::PaginationConfig;

use crate::models::TransactionRecord;
use crate::time::MonthFilter;
use crate::types::SaleMonth;

/// Free-text search over title and description, plus exact price match for numeric input
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    needle: String,
    price: Option<f64>,
}

impl SearchTerm {
    /// Build a search term; `None` when the input is empty
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let trimmed = raw.trim();
        let price = if trimmed.is_empty() {
            None
        } else {
            trimmed.parse::<f64>().ok().filter(|p| p.is_finite())
        };
        Some(Self {
            needle: raw.to_lowercase(),
            price,
        })
    }

    /// Price the term matches exactly, if it is numeric
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Check a record against the term
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.title.to_lowercase().contains(&self.needle)
            || record.description.to_lowercase().contains(&self.needle)
            || matches!((self.price, record.numeric_price()), (Some(wanted), Some(actual)) if wanted == actual)
    }
}

/// Filter shared by every read operation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub month: SaleMonth,
    pub search: Option<SearchTerm>,
}

impl RecordQuery {
    /// All records of a month
    pub fn month(month: SaleMonth) -> Self {
        Self { month, search: None }
    }

    /// Narrow by a search string; empty strings match everything
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = SearchTerm::new(search);
        self
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.in_month(self.month)
            && self.search.as_ref().map_or(true, |term| term.matches(record))
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Read `page`/`perPage` request values
    ///
    /// Missing, unparseable or zero values fall back to page 1 and the configured
    /// page size; the page size is capped at `max_per_page`.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>, config: &PaginationConfig) -> Self {
        let parse = |value: Option<&str>| {
            value
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
        };
        Self {
            page: parse(page).unwrap_or(1),
            per_page: parse(per_page)
                .unwrap_or(config.per_page)
                .min(config.max_per_page),
        }
    }

    /// Number of matches skipped before this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_sale_date;

    fn record(title: &str, description: &str, price: Option<f64>, date: &str) -> TransactionRecord {
        TransactionRecord {
            product_id: title.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            price,
            category: "misc".to_string(),
            date_of_sale: parse_sale_date(date).unwrap(),
            sold: false,
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let term = SearchTerm::new("BACKPACK").unwrap();
        assert!(term.matches(&record("Fjallraven Backpack", "", Some(1.0), "2024-03-01")));
        assert!(term.matches(&record("Bag", "fits a backpack", Some(1.0), "2024-03-01")));
        assert!(!term.matches(&record("Bag", "tote", Some(1.0), "2024-03-01")));
    }

    #[test]
    fn test_numeric_search_matches_price_or_text() {
        let term = SearchTerm::new("150").unwrap();
        assert_eq!(term.price(), Some(150.0));
        assert!(term.matches(&record("Shoes", "", Some(150.0), "2024-03-01")));
        assert!(term.matches(&record("Model 1500", "", Some(9.0), "2024-03-01")));
        assert!(!term.matches(&record("Shoes", "", Some(151.0), "2024-03-01")));
        assert!(!term.matches(&record("Shoes", "", None, "2024-03-01")));
    }

    #[test]
    fn test_search_is_literal_text() {
        let term = SearchTerm::new("a.c").unwrap();
        assert!(term.matches(&record("a.c adapter", "", None, "2024-03-01")));
        assert!(!term.matches(&record("abc", "", None, "2024-03-01")));
        assert_eq!(SearchTerm::new("inf").unwrap().price(), None);
    }

    #[test]
    fn test_empty_search_matches_month() {
        let query = RecordQuery::month(SaleMonth::new(3).unwrap()).with_search("");
        assert!(query.search.is_none());
        assert!(query.matches(&record("x", "y", None, "2020-03-09")));
        assert!(!query.matches(&record("x", "y", None, "2020-04-09")));
    }

    #[test]
    fn test_search_does_not_match_category() {
        let query = RecordQuery::month(SaleMonth::new(3).unwrap()).with_search("misc");
        assert!(!query.matches(&record("x", "y", None, "2020-03-09")));
    }

    #[test]
    fn test_pagination_defaults_and_caps() {
        let config = PaginationConfig::default();
        assert_eq!(Pagination::from_params(None, None, &config), Pagination { page: 1, per_page: 10 });
        assert_eq!(
            Pagination::from_params(Some("3"), Some("5"), &config),
            Pagination { page: 3, per_page: 5 }
        );
        assert_eq!(
            Pagination::from_params(Some("0"), Some("abc"), &config),
            Pagination { page: 1, per_page: 10 }
        );
        assert_eq!(Pagination::from_params(None, Some("100000"), &config).per_page, 100);
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination { page: 1, per_page: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 4, per_page: 10 }.offset(), 30);
        assert_eq!(Pagination { page: usize::MAX, per_page: usize::MAX }.offset(), usize::MAX);
    }
}
