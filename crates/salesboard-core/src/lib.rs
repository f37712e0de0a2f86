//! Core transaction query engine
//!
//! Records live in an injected [`TransactionStore`]; every read operation is
//! scoped to a calendar month (any year) and the reseed operation replaces the
//! whole record set from a [`SeedSource`].

pub mod engine;
pub mod error;
pub mod models;
pub mod query;
pub mod reports;
pub mod source;
pub mod store;
pub mod time;
pub mod types;

pub use engine::TransactionEngine;
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorLogger, ErrorSeverity};
pub use models::{parse_seed_payload, SeedRecord, TransactionRecord};
pub use query::{Pagination, RecordQuery, SearchTerm};
pub use reports::{BucketCount, CategoryCount, CombinedReport, SeedSummary, Statistics, TransactionsPage};
pub use source::{FileSeedSource, HttpSeedSource, SeedSource, SourceRef, StaticSeedSource};
pub use store::{MemoryStore, StoreError, StoreRef, TransactionStore};
pub use time::MonthFilter;
pub use types::{SaleMonth, PriceBucket, PRICE_BUCKETS};
