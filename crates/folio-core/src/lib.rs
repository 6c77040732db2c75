//! Folio — portfolio site core.
//! Item cache, grid rendering, viewer dispatch, modal lifecycle and the contact form,
//! run against a headless page model.

pub mod cache;
pub mod clock;
pub mod config;
pub mod contact;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod grid;
pub mod markup;
pub mod modal;
pub mod model;
pub mod notify;
pub mod page;
pub mod panorama;
pub mod store;

pub use cache::{CacheEntry, ItemCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FolioConfig, PanoramaAssets};
pub use contact::{ContactForm, ContactSender};
pub use dispatch::{extract_video_id, select_viewer, ViewerKind, ViewerRequest};
pub use document::{Document, ElementId, EventKind, ListenerTarget};
pub use error::{FolioError, FolioResult};
pub use grid::{Card, CardRegistry, GridRenderer};
pub use modal::{ModalClick, ModalId, ModalManager, ModalState};
pub use model::{ContactSubmission, PortfolioItem};
pub use notify::{NoticeBoard, NoticeId, NoticeKind};
pub use page::{PageState, PortfolioPage};
pub use panorama::{AssetLoader, PanoramaConfig, PanoramaLibrary, PanoramaLoader, PanoramaViewer};
pub use store::{RecordQuery, RecordStore, SupabaseStore};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
