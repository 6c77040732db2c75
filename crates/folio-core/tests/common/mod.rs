//! Shared fakes: an in-memory record store, a gated asset loader and a recording
//! panorama library.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_core::{
    AssetLoader, FolioConfig, FolioError, FolioResult, ManualClock, PanoramaConfig,
    PanoramaLibrary, PanoramaViewer, PortfolioPage, RecordQuery, RecordStore,
};
use serde_json::{json, Value};
use tokio::sync::Semaphore;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn row(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": null,
        "description": null,
        "image_url": format!("https://cdn.example/{}.jpg", id),
        "video_thumbnail_url": null,
        "vimeo_url": null,
        "photo_360_url": null
    })
}

pub fn with(mut row: Value, field: &str, value: &str) -> Value {
    row[field] = Value::String(value.to_string());
    row
}

#[derive(Default)]
pub struct MemoryStore {
    pub rows: Mutex<Vec<Value>>,
    pub selects: AtomicUsize,
    pub queries: Mutex<Vec<RecordQuery>>,
    pub inserted: Mutex<Vec<(String, Value)>>,
    pub fail_select: AtomicBool,
    pub fail_insert: AtomicBool,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Default::default()
        })
    }

    pub fn set_rows(&self, rows: Vec<Value>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn select_count(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, query: &RecordQuery) -> FolioResult<Vec<Value>> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(FolioError::DataUnavailable("backend offline".into()));
        }
        let rows = self.rows.lock().unwrap().clone();
        Ok(rows.into_iter().take(query.limit.unwrap_or(usize::MAX)).collect())
    }

    async fn insert(&self, table: &str, rows: Value) -> FolioResult<()> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(FolioError::DataUnavailable("insert rejected".into()));
        }
        self.inserted.lock().unwrap().push((table.to_string(), rows));
        Ok(())
    }
}

/// Library that records every viewer it creates and every destroy call.
#[derive(Default)]
pub struct RecordingLibrary {
    pub created: Mutex<Vec<(String, String)>>,
    pub destroyed: Arc<AtomicUsize>,
}

struct RecordingViewer {
    destroyed: Arc<AtomicUsize>,
}

impl PanoramaViewer for RecordingViewer {
    fn destroy(&mut self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

impl PanoramaLibrary for RecordingLibrary {
    fn create(
        &self,
        target_id: &str,
        image_url: &str,
        config: &PanoramaConfig,
    ) -> FolioResult<Box<dyn PanoramaViewer>> {
        assert_eq!(config.projection, "equirectangular");
        self.created
            .lock()
            .unwrap()
            .push((target_id.to_string(), image_url.to_string()));
        Ok(Box::new(RecordingViewer {
            destroyed: Arc::clone(&self.destroyed),
        }))
    }
}

impl RecordingLibrary {
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

/// Asset loader whose script load can be held open until the test releases it.
pub struct FakeAssets {
    pub library: Arc<RecordingLibrary>,
    pub stylesheets: AtomicUsize,
    pub scripts: AtomicUsize,
    pub fail: AtomicBool,
    gate: Option<Arc<Semaphore>>,
}

impl FakeAssets {
    pub fn new(library: Arc<RecordingLibrary>) -> Arc<Self> {
        Arc::new(Self {
            library,
            stylesheets: AtomicUsize::new(0),
            scripts: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate: None,
        })
    }

    pub fn gated(library: Arc<RecordingLibrary>, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            library,
            stylesheets: AtomicUsize::new(0),
            scripts: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate: Some(gate),
        })
    }

    pub fn script_loads(&self) -> usize {
        self.scripts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for FakeAssets {
    async fn load_stylesheet(&self, _href: &str) -> Result<(), String> {
        self.stylesheets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_script(&self, src: &str) -> Result<Arc<dyn PanoramaLibrary>, String> {
        self.scripts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.map_err(|e| e.to_string())?.forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(format!("failed to load {}", src));
        }
        let library: Arc<dyn PanoramaLibrary> = self.library.clone();
        Ok(library)
    }
}

pub struct Harness {
    pub page: PortfolioPage,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub assets: Arc<FakeAssets>,
    pub library: Arc<RecordingLibrary>,
}

pub fn harness(rows: Vec<Value>) -> Harness {
    let library = Arc::new(RecordingLibrary::default());
    harness_with_assets(rows, FakeAssets::new(Arc::clone(&library)), library)
}

pub fn harness_with_assets(
    rows: Vec<Value>,
    assets: Arc<FakeAssets>,
    library: Arc<RecordingLibrary>,
) -> Harness {
    init_tracing();
    let store = MemoryStore::with_rows(rows);
    let clock = Arc::new(ManualClock::default());
    let config = FolioConfig::new("https://demo.supabase.co", "anon-key");
    let page = PortfolioPage::new(&config, store.clone(), clock.clone(), assets.clone());
    Harness {
        page,
        store,
        clock,
        assets,
        library,
    }
}
