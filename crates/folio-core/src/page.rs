//! The portfolio page: loads the grid, routes card clicks to viewers, drives modal and
//! notice transitions, and submits the contact form.
//!
//! Page state sits behind one mutex that is never held across an `.await`, so a click
//! or keypress can interleave with a pending fetch or library load.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::ItemCache;
use crate::clock::Clock;
use crate::config::FolioConfig;
use crate::contact::{ContactForm, ContactSender, FAILURE_MESSAGE, SUCCESS_MESSAGE};
use crate::dispatch::{extract_video_id, select_viewer, ViewerRequest};
use crate::document::Document;
use crate::error::{FolioError, FolioResult};
use crate::grid::{CardRegistry, GridRenderer};
use crate::modal::{
    detail_modal, panorama_modal, panorama_target, video_modal, ModalClick, ModalContent,
    ModalId, ModalManager,
};
use crate::notify::{NoticeBoard, NoticeId, NoticeKind};
use crate::panorama::{AssetLoader, PanoramaConfig, PanoramaLoader};
use crate::store::RecordStore;

pub const VIEWER_FAILED_MESSAGE: &str =
    "Deze 360° weergave kon niet worden geladen. Probeer het later opnieuw.";

#[derive(Default)]
pub struct PageState {
    pub document: Document,
    pub cards: CardRegistry,
    pub modals: ModalManager,
    pub notices: NoticeBoard,
    pub contact: ContactForm,
}

pub struct PortfolioPage {
    cache: ItemCache,
    renderer: GridRenderer,
    panorama: PanoramaLoader,
    sender: ContactSender,
    clock: Arc<dyn Clock>,
    state: Mutex<PageState>,
}

impl PortfolioPage {
    pub fn new(
        config: &FolioConfig,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        assets: Arc<dyn AssetLoader>,
    ) -> Self {
        Self {
            cache: ItemCache::from_config(config, Arc::clone(&store), Arc::clone(&clock)),
            renderer: GridRenderer,
            panorama: PanoramaLoader::new(config.panorama.clone(), assets),
            sender: ContactSender::new(store),
            clock,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn with_panorama_loader(mut self, loader: PanoramaLoader) -> Self {
        self.panorama = loader;
        self
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    pub fn panorama_loader(&self) -> &PanoramaLoader {
        &self.panorama
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read-only view of the page.
    pub fn with_state<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(&self.lock())
    }

    /// Load items through the cache and paint the grid. A failed load paints the
    /// failure message instead and the error is returned for the caller's records.
    pub async fn ready(&self) -> FolioResult<usize> {
        let loaded = self.cache.get_items().await;
        let mut state = self.lock();
        let PageState {
            document, cards, ..
        } = &mut *state;
        match loaded {
            Ok(items) => {
                *cards = self.renderer.render(document, &items);
                Ok(cards.len())
            }
            Err(e) => {
                tracing::error!("[PORTFOLIO] error loading portfolio items: {}", e);
                *cards = self.renderer.render_failure(document);
                Err(e)
            }
        }
    }

    /// Click on a grid card. `Ok(None)` when no card with a live listener has that id.
    pub async fn click_card(&self, card_id: &str) -> FolioResult<Option<ModalId>> {
        let card = {
            let state = self.lock();
            let bound = state
                .cards
                .listener(card_id)
                .is_some_and(|l| state.document.has_listener(l));
            match state.cards.get(card_id) {
                Some(card) if bound => card.clone(),
                _ => return Ok(None),
            }
        };
        self.open_viewer(select_viewer(&card)).await.map(Some)
    }

    pub async fn open_viewer(&self, request: ViewerRequest) -> FolioResult<ModalId> {
        match request {
            ViewerRequest::Video { url, title } => {
                let Some(video_id) = extract_video_id(&url) else {
                    tracing::error!("[VIEWER] invalid Vimeo URL: {}", url);
                    return Err(FolioError::InvalidVideoReference(url));
                };
                Ok(self.open_modal(|_| video_modal(&video_id, &title)))
            }
            ViewerRequest::Panorama { image_url, title } => {
                self.open_panorama(&image_url, &title).await
            }
            ViewerRequest::Detail {
                title,
                category,
                description,
                image_url,
            } => Ok(self.open_modal(|_| {
                detail_modal(&title, &category, description.as_deref(), image_url.as_deref())
            })),
        }
    }

    fn open_modal<F>(&self, build: F) -> ModalId
    where
        F: FnOnce(ModalId) -> ModalContent,
    {
        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document, modals, ..
        } = &mut *state;
        modals.open(document, now, build)
    }

    /// Open the panorama shell, wait for the library, then attach a viewer if the modal
    /// is still open by then.
    async fn open_panorama(&self, image_url: &str, title: &str) -> FolioResult<ModalId> {
        let id = self.open_modal(|id| panorama_modal(id, title));

        let created = match self.panorama.load().await {
            Ok(library) => {
                let mut state = self.lock();
                if !state.modals.is_live(id) {
                    tracing::debug!("[VIEWER] modal {} closed before panorama loaded", id);
                    return Ok(id);
                }
                library
                    .create(&panorama_target(id), image_url, &PanoramaConfig::default())
                    .map(|mut viewer| {
                        state
                            .modals
                            .set_teardown(id, Box::new(move || viewer.destroy()));
                    })
            }
            Err(e) => Err(e),
        };

        match created {
            Ok(()) => Ok(id),
            Err(e) => {
                tracing::error!("[VIEWER] panorama viewer unavailable: {}", e);
                let now = self.clock.now();
                let mut state = self.lock();
                let PageState {
                    document,
                    modals,
                    notices,
                    ..
                } = &mut *state;
                modals.close(document, now, id);
                notices.show(document, now, VIEWER_FAILED_MESSAGE, NoticeKind::Error);
                Err(e)
            }
        }
    }

    /// Keydown anywhere on the page.
    pub fn press_key(&self, key: &str) -> Option<ModalId> {
        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document, modals, ..
        } = &mut *state;
        modals.handle_key(document, now, key)
    }

    pub fn click_modal(&self, id: ModalId, target: ModalClick) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document, modals, ..
        } = &mut *state;
        modals.click(document, now, id, target)
    }

    pub fn dismiss_notice(&self, id: NoticeId) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document, notices, ..
        } = &mut *state;
        notices.dismiss(document, now, id)
    }

    /// Run every deferred transition due by now.
    pub fn tick(&self) {
        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document,
            modals,
            notices,
            ..
        } = &mut *state;
        modals.tick(document, now);
        notices.tick(document, now);
    }

    pub fn fill_contact(&self, field: &str, value: &str) -> bool {
        self.lock().contact.set(field, value)
    }

    /// Submit the contact form. `None` when a submission is already in flight.
    pub async fn submit_contact(&self) -> Option<FolioResult<()>> {
        let submission = self.lock().contact.begin_submit()?;
        let outcome = self.sender.send(&submission).await;

        let now = self.clock.now();
        let mut state = self.lock();
        let PageState {
            document,
            notices,
            contact,
            ..
        } = &mut *state;
        match &outcome {
            Ok(()) => notices.show(document, now, SUCCESS_MESSAGE, NoticeKind::Success),
            Err(_) => notices.show(document, now, FAILURE_MESSAGE, NoticeKind::Error),
        };
        contact.finish_submit(&outcome);
        Some(outcome)
    }
}
