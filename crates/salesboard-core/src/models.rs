//! Core data models: stored transaction records and raw seed records

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One catalog item observed in the sales feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Externally assigned identifier, unique across the store
    pub product_id: String,
    pub title: String,
    pub description: String,
    /// `None` when the source price was not a finite non-negative number
    pub price: Option<f64>,
    pub category: String,
    pub date_of_sale: DateTime<Utc>,
    #[serde(default)]
    pub sold: bool,
}

impl TransactionRecord {
    /// Price usable in sums and histograms
    pub fn numeric_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p >= 0.0)
    }
}

/// A record as it arrives from the seed source, before coercion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    #[serde(default)]
    pub product_id: Option<serde_json::Value>,
    /// Fallback identifier used by feeds that carry no `productId`
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: serde_json::Value,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date_of_sale: Option<String>,
    #[serde(default)]
    pub sold: Option<bool>,
}

impl SeedRecord {
    /// Coerce into a stored record; `index` is the element position, for error messages
    pub fn into_record(self, index: usize) -> CoreResult<TransactionRecord> {
        let product_id = identifier(self.product_id)
            .or_else(|| identifier(self.id))
            .ok_or_else(|| CoreError::SeedParseError {
                message: format!("record {} has no usable productId", index),
            })?;

        let raw_date = self.date_of_sale.unwrap_or_default();
        let date_of_sale = parse_sale_date(&raw_date).ok_or_else(|| CoreError::SeedParseError {
            message: format!("record {} has invalid dateOfSale '{}'", index, raw_date),
        })?;

        Ok(TransactionRecord {
            product_id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: coerce_price(&self.price),
            category: self.category.unwrap_or_default(),
            date_of_sale,
            sold: self.sold.unwrap_or(false),
        })
    }
}

/// Non-blank string ids pass through, numeric ids are stringified
fn identifier(raw: Option<serde_json::Value>) -> Option<String> {
    match raw? {
        serde_json::Value::String(id) if !id.trim().is_empty() => Some(id),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Parse a full seed payload: a JSON array of seed records
pub fn parse_seed_payload(payload: &[u8]) -> CoreResult<Vec<TransactionRecord>> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|e| CoreError::SeedParseError {
            message: format!("invalid JSON: {}", e),
        })?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(CoreError::SeedParseError {
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let seed: SeedRecord =
                serde_json::from_value(item).map_err(|e| CoreError::SeedParseError {
                    message: format!("record {}: {}", index, e),
                })?;
            seed.into_record(index)
        })
        .collect()
}

/// Coerce a JSON price the way a loose numeric cast would
///
/// Numbers pass through, numeric strings are parsed (blank means 0), booleans
/// map to 0/1. Everything else, and any negative or non-finite result, is `None`.
pub fn coerce_price(raw: &serde_json::Value) -> Option<f64> {
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) if s.trim().is_empty() => Some(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    value.filter(|p| p.is_finite() && *p >= 0.0)
}

/// Parse a sale timestamp: RFC 3339, a naive datetime (UTC) or a bare date (midnight UTC)
pub fn parse_sale_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ==================== Tests ====================
