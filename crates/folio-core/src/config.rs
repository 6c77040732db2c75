//! Site configuration loaded from the environment (and `.env` via [`FolioConfig::load`]).
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | SUPABASE_URL / VITE_SUPABASE_URL | required | Backend endpoint. |
//! | SUPABASE_ANON_KEY / VITE_SUPABASE_ANON_KEY | required | Public access key. |
//! | FOLIO_CACHE_TTL_SECS | 300 | Freshness window of the item cache. |
//! | FOLIO_PAGE_SIZE | 20 | Max portfolio items fetched per load. |
//! | FOLIO_PANORAMA_SCRIPT_URL | pannellum 2.5.6 (jsDelivr) | Panorama library script. |
//! | FOLIO_PANORAMA_STYLESHEET_URL | pannellum 2.5.6 (jsDelivr) | Panorama library stylesheet. |

use std::time::Duration;

use crate::error::{FolioError, FolioResult};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PANORAMA_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/pannellum@2.5.6/build/pannellum.js";
pub const DEFAULT_PANORAMA_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/pannellum@2.5.6/build/pannellum.css";

/// Where the external panorama library is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoramaAssets {
    pub script_url: String,
    pub stylesheet_url: String,
}

impl Default for PanoramaAssets {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_PANORAMA_SCRIPT_URL.to_string(),
            stylesheet_url: DEFAULT_PANORAMA_STYLESHEET_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FolioConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub cache_ttl: Duration,
    pub page_size: usize,
    pub panorama: PanoramaAssets,
}

impl FolioConfig {
    /// Config with explicit credentials and defaults for everything else.
    pub fn new(supabase_url: impl Into<String>, supabase_anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into().trim().trim_end_matches('/').to_string(),
            supabase_anon_key: supabase_anon_key.into().trim().to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            page_size: DEFAULT_PAGE_SIZE,
            panorama: PanoramaAssets::default(),
        }
    }

    /// Read `.env` (if present) and then the process environment.
    pub fn load() -> FolioResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load from environment. Endpoint and key are required; the rest fall back to defaults.
    pub fn from_env() -> FolioResult<Self> {
        let url = env_opt_string("SUPABASE_URL")
            .or_else(|| env_opt_string("VITE_SUPABASE_URL"))
            .ok_or_else(|| FolioError::Config("SUPABASE_URL is not set".into()))?;
        let key = env_opt_string("SUPABASE_ANON_KEY")
            .or_else(|| env_opt_string("VITE_SUPABASE_ANON_KEY"))
            .ok_or_else(|| FolioError::Config("SUPABASE_ANON_KEY is not set".into()))?;

        let mut config = Self::new(url, key);
        config.cache_ttl = env_cache_ttl();
        config.page_size = env_page_size();
        if let Some(script) = env_opt_string("FOLIO_PANORAMA_SCRIPT_URL") {
            config.panorama.script_url = script;
        }
        if let Some(css) = env_opt_string("FOLIO_PANORAMA_STYLESHEET_URL") {
            config.panorama.stylesheet_url = css;
        }
        Ok(config)
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

fn env_cache_ttl() -> Duration {
    match std::env::var("FOLIO_CACHE_TTL_SECS") {
        Ok(v) => v
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL),
        Err(_) => DEFAULT_CACHE_TTL,
    }
}

fn env_page_size() -> usize {
    match std::env::var("FOLIO_PAGE_SIZE") {
        Ok(v) => v
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        Err(_) => DEFAULT_PAGE_SIZE,
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
