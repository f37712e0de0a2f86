//! Transaction query engine: the read operations and the reseed write

use salesboard_config::PaginationConfig;

use crate::error::CoreResult;
use crate::models::{parse_seed_payload, TransactionRecord};
use crate::query::{Pagination, RecordQuery};
use crate::reports::{BucketCount, CategoryCount, CombinedReport, Statistics, TransactionsPage};
use crate::source::SourceRef;
use crate::store::StoreRef;
use crate::types::SaleMonth;

/// Query engine over an injected store and seed source
#[derive(Clone)]
pub struct TransactionEngine {
    store: StoreRef,
    source: SourceRef,
    pagination: PaginationConfig,
}

impl TransactionEngine {
    pub fn new(store: StoreRef, source: SourceRef, pagination: PaginationConfig) -> Self {
        Self {
            store,
            source,
            pagination,
        }
    }

    /// Page-size defaults used to interpret list requests
    pub fn pagination_config(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Replace every stored record with the source's current payload
    ///
    /// The payload is fetched and fully parsed before the store is touched, so a
    /// failed fetch or a malformed payload leaves the previous data in place.
    pub async fn reseed(&self) -> CoreResult<usize> {
        log::info!("Reseeding from {}", self.source.describe());
        let payload = self.source.fetch().await?;
        let records = parse_seed_payload(&payload)?;
        let inserted = self.store.replace_all(records).await?;
        log::info!("Reseed complete: {} records inserted", inserted);
        Ok(inserted)
    }

    /// Records of a month matching `search`, one page at a time
    pub async fn list(
        &self,
        month: SaleMonth,
        search: &str,
        pagination: Pagination,
    ) -> CoreResult<TransactionsPage> {
        let query = RecordQuery::month(month).with_search(search);
        let (total, transactions) = self
            .store
            .find_page(&query, pagination.offset(), pagination.per_page)
            .await?;
        log::debug!(
            "list month={} search={:?} page={} -> {}/{}",
            month.number(),
            search,
            pagination.page,
            transactions.len(),
            total
        );

        Ok(TransactionsPage {
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            transactions,
        })
    }

    pub async fn statistics(&self, month: SaleMonth) -> CoreResult<Statistics> {
        let records = self.month_records(month).await?;
        Ok(Statistics::from_records(&records))
    }

    pub async fn bar_chart(&self, month: SaleMonth) -> CoreResult<Vec<BucketCount>> {
        let records = self.month_records(month).await?;
        Ok(BucketCount::histogram(&records))
    }

    pub async fn pie_chart(&self, month: SaleMonth) -> CoreResult<Vec<CategoryCount>> {
        let records = self.month_records(month).await?;
        Ok(CategoryCount::breakdown(&records))
    }

    /// All three monthly views computed from one read of the store
    pub async fn combined(&self, month: SaleMonth) -> CoreResult<CombinedReport> {
        let records = self.month_records(month).await?;
        Ok(CombinedReport::from_records(&records))
    }

    async fn month_records(&self, month: SaleMonth) -> CoreResult<Vec<TransactionRecord>> {
        Ok(self.store.find_all(&RecordQuery::month(month)).await?)
    }
}

// ==================== Tests ====================
