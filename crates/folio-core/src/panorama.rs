//! External 360° panorama library: the viewer seam and a load-once loader.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::config::PanoramaAssets;
use crate::error::{FolioError, FolioResult};

/// Viewer configuration record handed to the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanoramaConfig {
    #[serde(rename = "type")]
    pub projection: String,
    pub auto_load: bool,
    pub show_controls: bool,
    pub compass: bool,
    pub north_offset: i32,
    pub hot_spot_debug: bool,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            projection: "equirectangular".to_string(),
            auto_load: true,
            show_controls: true,
            compass: true,
            north_offset: 0,
            hot_spot_debug: false,
        }
    }
}

/// A live viewer instance. Must be destroyed before its element is removed.
pub trait PanoramaViewer: Send {
    fn destroy(&mut self);
}

pub trait PanoramaLibrary: Send + Sync {
    fn create(
        &self,
        target_id: &str,
        image_url: &str,
        config: &PanoramaConfig,
    ) -> FolioResult<Box<dyn PanoramaViewer>>;
}

/// Injects the library's stylesheet and script into the page.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load_stylesheet(&self, href: &str) -> Result<(), String>;

    /// Resolves with the library once the script has executed.
    async fn load_script(&self, src: &str) -> Result<Arc<dyn PanoramaLibrary>, String>;
}

/// Fetches the panorama library at most once per page lifetime. Concurrent callers
/// share the in-flight load; a failed load leaves the cell empty for a later retry.
pub struct PanoramaLoader {
    assets: PanoramaAssets,
    loader: Arc<dyn AssetLoader>,
    library: OnceCell<Arc<dyn PanoramaLibrary>>,
}

impl PanoramaLoader {
    pub fn new(assets: PanoramaAssets, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            assets,
            loader,
            library: OnceCell::new(),
        }
    }

    /// Loader for a page where the library is already present.
    pub fn preloaded(library: Arc<dyn PanoramaLibrary>, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            assets: PanoramaAssets::default(),
            loader,
            library: OnceCell::new_with(Some(library)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.library.initialized()
    }

    pub async fn load(&self) -> FolioResult<Arc<dyn PanoramaLibrary>> {
        let library = self.library.get_or_try_init(|| self.fetch()).await?;
        Ok(Arc::clone(library))
    }

    async fn fetch(&self) -> FolioResult<Arc<dyn PanoramaLibrary>> {
        tracing::info!("[VIEWER] loading panorama library from {}", self.assets.script_url);
        self.loader
            .load_stylesheet(&self.assets.stylesheet_url)
            .await
            .map_err(FolioError::ViewerLibraryLoadFailure)?;
        self.loader
            .load_script(&self.assets.script_url)
            .await
            .map_err(FolioError::ViewerLibraryLoadFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serialises_with_library_keys() {
        let json = serde_json::to_value(PanoramaConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "equirectangular",
                "autoLoad": true,
                "showControls": true,
                "compass": true,
                "northOffset": 0,
                "hotSpotDebug": false
            })
        );
    }
}
