//! Remote record store: the hosted backend the site reads portfolio items from and
//! appends contact submissions to. [`SupabaseStore`] talks PostgREST over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FolioConfig;
use crate::error::{FolioError, FolioResult};

pub const PORTFOLIO_TABLE: &str = "portfolio_items";
pub const CONTACT_TABLE: &str = "contact_submissions";

const PORTFOLIO_COLUMNS: &[&str] = &[
    "id",
    "title",
    "category",
    "description",
    "image_url",
    "video_thumbnail_url",
    "vimeo_url",
    "photo_360_url",
];

/// A select against one collection: projection, equality filters, ordering and a row cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, bool)>,
    pub limit: Option<usize>,
}

impl RecordQuery {
    pub fn from_table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Visible portfolio items in display order, capped at `page_size`.
    pub fn visible_portfolio(page_size: usize) -> Self {
        Self::from_table(PORTFOLIO_TABLE)
            .select(PORTFOLIO_COLUMNS)
            .eq("is_visible", true)
            .order("order_index", true)
            .limit(page_size)
    }

    /// PostgREST query-string pairs for this select.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };
        pairs.push(("select".to_string(), select));
        for (column, value) in &self.filters {
            pairs.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some((column, ascending)) = &self.order {
            let dir = if *ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{}", column, dir)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows matching the query, in the order the backend returns them.
    async fn select(&self, query: &RecordQuery) -> FolioResult<Vec<Value>>;

    /// Append rows to a collection.
    async fn insert(&self, table: &str, rows: Value) -> FolioResult<()>;
}

/// Supabase (PostgREST) backend authenticated with the public anon key.
pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            client,
        }
    }

    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(&config.supabase_url, &config.supabase_anon_key)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn select(&self, query: &RecordQuery) -> FolioResult<Vec<Value>> {
        let res = self
            .client
            .get(self.table_url(&query.table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(FolioError::DataUnavailable(format!(
                "{} {}: {}",
                query.table,
                status.as_u16(),
                text
            )));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn insert(&self, table: &str, rows: Value) -> FolioResult<()> {
        let res = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(FolioError::DataUnavailable(format!(
                "{} {}: {}",
                table,
                status.as_u16(),
                text
            )));
        }
        Ok(())
    }
}
