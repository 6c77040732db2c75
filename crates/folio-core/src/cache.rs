//! Item cache: keeps the last successful portfolio fetch for a short freshness window.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::config::FolioConfig;
use crate::error::FolioResult;
use crate::model::PortfolioItem;
use crate::store::{RecordQuery, RecordStore};

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub items: Vec<PortfolioItem>,
    pub fetched_at: DateTime<Utc>,
}

pub struct ItemCache {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    page_size: usize,
    entry: RwLock<Option<CacheEntry>>,
}

impl ItemCache {
    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        ttl: std::time::Duration,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::minutes(5)),
            page_size,
            entry: RwLock::new(None),
        }
    }

    pub fn from_config(
        config: &FolioConfig,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(store, clock, config.cache_ttl, config.page_size)
    }

    /// Visible items in display order. Served from memory while fresh, otherwise
    /// fetched once from the store. A failed fetch leaves the previous entry in place.
    pub async fn get_items(&self) -> FolioResult<Vec<PortfolioItem>> {
        let started = self.clock.now();
        if let Some(items) = self.fresh_items(started) {
            tracing::debug!("[PORTFOLIO] serving {} cached items", items.len());
            return Ok(items);
        }

        let query = RecordQuery::visible_portfolio(self.page_size);
        let rows = self.store.select(&query).await?;
        let items = rows
            .into_iter()
            .map(serde_json::from_value::<PortfolioItem>)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("[PORTFOLIO] fetched {} items from backend", items.len());
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = Some(CacheEntry {
            items: items.clone(),
            fetched_at: started,
        });
        Ok(items)
    }

    pub fn invalidate(&self) {
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = None;
    }

    /// Snapshot of the current entry, fresh or not.
    pub fn entry(&self) -> Option<CacheEntry> {
        self.entry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn fresh_items(&self, now: DateTime<Utc>) -> Option<Vec<PortfolioItem>> {
        let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
        entry
            .as_ref()
            .filter(|e| now - e.fetched_at < self.ttl)
            .map(|e| e.items.clone())
    }
}
