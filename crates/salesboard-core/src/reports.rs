//! Report structures for API responses

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::TransactionRecord;
use crate::types::{bucket_index, PRICE_BUCKETS};

/// One page of the transaction list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    /// Matches before pagination
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub transactions: Vec<TransactionRecord>,
}

/// Monthly sales totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sale_amount: f64,
    pub total_sold_items: usize,
    pub total_not_sold_items: usize,
}

impl Statistics {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let total_sale_amount = records.iter().filter_map(TransactionRecord::numeric_price).sum();
        let total_sold_items = records.iter().filter(|r| r.sold).count();
        Self {
            total_sale_amount,
            total_sold_items,
            total_not_sold_items: records.len() - total_sold_items,
        }
    }
}

/// Histogram entry for one price range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub range: String,
    pub count: usize,
}

impl BucketCount {
    /// Price histogram over all ten ranges, lowest first, empty ranges included
    pub fn histogram(records: &[TransactionRecord]) -> Vec<BucketCount> {
        let mut counts = [0usize; PRICE_BUCKETS.len()];
        for idx in records
            .iter()
            .filter_map(TransactionRecord::numeric_price)
            .filter_map(bucket_index)
        {
            counts[idx] += 1;
        }
        PRICE_BUCKETS
            .iter()
            .zip(counts)
            .map(|(bucket, count)| BucketCount {
                range: bucket.label.to_string(),
                count,
            })
            .collect()
    }
}

/// Record count for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    /// Count per category present, ascending by category name
    pub fn breakdown(records: &[TransactionRecord]) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.category.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect()
    }
}

/// Statistics, bar chart and pie chart for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub statistics: Statistics,
    pub bar_chart: Vec<BucketCount>,
    pub pie_chart: Vec<CategoryCount>,
}

impl CombinedReport {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        Self {
            statistics: Statistics::from_records(records),
            bar_chart: BucketCount::histogram(records),
            pie_chart: CategoryCount::breakdown(records),
        }
    }
}

/// Result of a reseed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSummary {
    pub message: String,
    pub inserted: usize,
}

// ==================== Tests ====================
