//! Basic types shared by the query engine: sale months and price buckets

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month (1-12) a sale falls in, independent of year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SaleMonth(u32);

impl SaleMonth {
    /// Build from a month number, `None` outside 1-12
    pub fn new(number: u32) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    /// Month number, 1 = January
    pub fn number(self) -> u32 {
        self.0
    }

    /// English month name
    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.0 - 1) as usize]
    }

    /// All twelve months in calendar order
    pub fn all() -> impl Iterator<Item = SaleMonth> {
        (1..=12).map(SaleMonth)
    }

    /// Resolve an optional request parameter into a month
    ///
    /// Absent or blank designators are `MissingMonth`; anything that is neither
    /// a number 1-12 nor a full English month name is `InvalidMonth`.
    pub fn resolve(designator: Option<&str>) -> CoreResult<Self> {
        match designator.map(str::trim) {
            None | Some("") => Err(CoreError::MissingMonth),
            Some(value) => value.parse(),
        }
    }
}

impl std::str::FromStr for SaleMonth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Ok(number) = value.parse::<u32>() {
            return SaleMonth::new(number).ok_or_else(|| CoreError::InvalidMonth {
                value: s.to_string(),
            });
        }
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value))
            .map(|idx| SaleMonth(idx as u32 + 1))
            .ok_or_else(|| CoreError::InvalidMonth {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for SaleMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u32> for SaleMonth {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        SaleMonth::new(value).ok_or_else(|| format!("Invalid month number: {}", value))
    }
}

impl From<SaleMonth> for u32 {
    fn from(month: SaleMonth) -> Self {
        month.0
    }
}

// ==================== Price Buckets ====================

/// One histogram range: `lower` inclusive, `upper` exclusive (`None` = unbounded)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub label: &'static str,
}

impl PriceBucket {
    const fn new(lower: f64, upper: Option<f64>, label: &'static str) -> Self {
        Self { lower, upper, label }
    }

    /// Check if a price falls in this bucket
    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && self.upper.map_or(true, |upper| price < upper)
    }
}

/// Histogram ranges in ascending price order
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::new(0.0, Some(101.0), "0-100"),
    PriceBucket::new(101.0, Some(201.0), "101-200"),
    PriceBucket::new(201.0, Some(301.0), "201-300"),
    PriceBucket::new(301.0, Some(401.0), "301-400"),
    PriceBucket::new(401.0, Some(501.0), "401-500"),
    PriceBucket::new(501.0, Some(601.0), "501-600"),
    PriceBucket::new(601.0, Some(701.0), "601-700"),
    PriceBucket::new(701.0, Some(801.0), "701-800"),
    PriceBucket::new(801.0, Some(901.0), "801-900"),
    PriceBucket::new(901.0, None, "901-above"),
];

/// Index into [`PRICE_BUCKETS`] for a price, `None` for negative or non-finite prices
pub fn bucket_index(price: f64) -> Option<usize> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    PRICE_BUCKETS.iter().rposition(|bucket| price >= bucket.lower)
}

// ==================== Tests ====================
