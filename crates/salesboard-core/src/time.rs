//! Month filtering: which records belong to a calendar month, any year

use chrono::{DateTime, Datelike, Utc};

use crate::models::TransactionRecord;
use crate::types::SaleMonth;

/// Month of a timestamp, evaluated in UTC
pub fn month_of(date: &DateTime<Utc>) -> u32 {
    date.month()
}

/// Month filtering trait
pub trait MonthFilter {
    /// Check if the item falls in the given month of any year
    fn in_month(&self, month: SaleMonth) -> bool;
}

impl MonthFilter for TransactionRecord {
    fn in_month(&self, month: SaleMonth) -> bool {
        month_of(&self.date_of_sale) == month.number()
    }
}

impl MonthFilter for DateTime<Utc> {
    fn in_month(&self, month: SaleMonth) -> bool {
        month_of(self) == month.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_sale_date;

    #[test]
    fn test_month_filter_ignores_year() {
        let march = SaleMonth::new(3).unwrap();
        for raw in ["2019-03-31", "2021-03-01T00:00:00Z", "2024-03-15T23:59:59Z"] {
            assert!(parse_sale_date(raw).unwrap().in_month(march), "{raw}");
        }
        assert!(!parse_sale_date("2024-04-01").unwrap().in_month(march));
        assert!(!parse_sale_date("2024-02-29").unwrap().in_month(march));
    }
}
