//! Modal lifecycle shared by the video, panorama and detail viewers.
//!
//! Every modal walks `Created -> Visible -> Closing -> Destroyed`. Opening appends the
//! element and registers one Escape listener; a deferred task adds the `show` class.
//! Closing removes `show` and runs the teardown (panorama destroy) right away; the element
//! and its Escape listener go away after the close transition.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::dispatch::{player_embed_url, ViewerKind};
use crate::document::{Document, ElementId, EventKind, ListenerId, ListenerTarget, Timers};
use crate::markup::html_escape;

pub const SHOW_CLASS: &str = "show";
pub const SHOW_DELAY_MS: i64 = 10;
pub const CLOSE_TRANSITION_MS: i64 = 300;
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Created,
    Visible,
    Closing,
    Destroyed,
}

/// Where inside a modal a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseButton,
    /// The modal root itself, outside the content box.
    Backdrop,
    /// Anywhere inside the content box.
    Content,
    /// "Start a similar project" link on the detail modal.
    CallToAction,
}

/// Released when the modal starts closing, before its element is removed.
pub type Teardown = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub kind: ViewerKind,
    pub class_name: &'static str,
    pub inner_html: String,
}

struct ModalInstance {
    kind: ViewerKind,
    element: ElementId,
    escape_listener: ListenerId,
    state: ModalState,
    teardown: Option<Teardown>,
}

#[derive(Debug, Clone, Copy)]
enum ModalTask {
    Show(ModalId),
    Destroy(ModalId),
}

#[derive(Default)]
pub struct ModalManager {
    next_id: u64,
    modals: BTreeMap<ModalId, ModalInstance>,
    timers: Timers<ModalTask>,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the content for a fresh id, attach it and schedule the show step.
    pub fn open<F>(&mut self, doc: &mut Document, now: DateTime<Utc>, build: F) -> ModalId
    where
        F: FnOnce(ModalId) -> ModalContent,
    {
        self.next_id += 1;
        let id = ModalId(self.next_id);
        let content = build(id);
        let element = doc.append_to_body(content.class_name, content.inner_html);
        let escape_listener = doc.add_listener(EventKind::KeyDown, ListenerTarget::Document);
        self.modals.insert(
            id,
            ModalInstance {
                kind: content.kind,
                element,
                escape_listener,
                state: ModalState::Created,
                teardown: None,
            },
        );
        self.timers
            .schedule(now + Duration::milliseconds(SHOW_DELAY_MS), ModalTask::Show(id));
        tracing::debug!("[VIEWER] modal {} opened ({:?})", id, content.kind);
        id
    }

    /// Attach a teardown to a live modal. A modal that is already closing or gone runs
    /// the teardown immediately instead and `false` is returned.
    pub fn set_teardown(&mut self, id: ModalId, teardown: Teardown) -> bool {
        match self.modals.get_mut(&id) {
            Some(modal) if is_live(modal.state) => {
                if let Some(previous) = modal.teardown.replace(teardown) {
                    previous();
                }
                true
            }
            _ => {
                teardown();
                false
            }
        }
    }

    /// Enter `Closing`. Returns `false` when the modal is not live.
    pub fn close(&mut self, doc: &mut Document, now: DateTime<Utc>, id: ModalId) -> bool {
        let Some(modal) = self.modals.get_mut(&id) else {
            return false;
        };
        if !is_live(modal.state) {
            return false;
        }
        modal.state = ModalState::Closing;
        doc.remove_class(modal.element, SHOW_CLASS);
        if let Some(teardown) = modal.teardown.take() {
            teardown();
        }
        self.timers.schedule(
            now + Duration::milliseconds(CLOSE_TRANSITION_MS),
            ModalTask::Destroy(id),
        );
        tracing::debug!("[VIEWER] modal {} closing", id);
        true
    }

    pub fn click(
        &mut self,
        doc: &mut Document,
        now: DateTime<Utc>,
        id: ModalId,
        target: ModalClick,
    ) -> bool {
        match target {
            ModalClick::Content => false,
            ModalClick::CloseButton | ModalClick::Backdrop | ModalClick::CallToAction => {
                self.close(doc, now, id)
            }
        }
    }

    /// Keydown on the document. Escape closes the active modal only.
    pub fn handle_key(&mut self, doc: &mut Document, now: DateTime<Utc>, key: &str) -> Option<ModalId> {
        if key != ESCAPE_KEY {
            return None;
        }
        let id = self.active()?;
        let listener = self.modals.get(&id)?.escape_listener;
        if !doc.has_listener(listener) {
            return None;
        }
        self.close(doc, now, id).then_some(id)
    }

    /// Run every transition step due at `now`.
    pub fn tick(&mut self, doc: &mut Document, now: DateTime<Utc>) {
        for task in self.timers.take_due(now) {
            match task {
                ModalTask::Show(id) => {
                    if let Some(modal) = self.modals.get_mut(&id) {
                        if modal.state == ModalState::Created {
                            doc.add_class(modal.element, SHOW_CLASS);
                            modal.state = ModalState::Visible;
                        }
                    }
                }
                ModalTask::Destroy(id) => {
                    if let Some(modal) = self.modals.remove(&id) {
                        doc.remove_listener(modal.escape_listener);
                        doc.remove(modal.element);
                        tracing::debug!("[VIEWER] modal {} destroyed", id);
                    }
                }
            }
        }
    }

    pub fn state(&self, id: ModalId) -> ModalState {
        self.modals
            .get(&id)
            .map(|m| m.state)
            .unwrap_or(ModalState::Destroyed)
    }

    pub fn is_live(&self, id: ModalId) -> bool {
        is_live(self.state(id))
    }

    pub fn kind(&self, id: ModalId) -> Option<ViewerKind> {
        self.modals.get(&id).map(|m| m.kind)
    }

    pub fn element(&self, id: ModalId) -> Option<ElementId> {
        self.modals.get(&id).map(|m| m.element)
    }

    /// Most recently opened modal that is not closing.
    pub fn active(&self) -> Option<ModalId> {
        self.modals
            .iter()
            .rev()
            .find(|(_, m)| is_live(m.state))
            .map(|(id, _)| *id)
    }

    /// Modals not yet destroyed, closing ones included.
    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }
}

fn is_live(state: ModalState) -> bool {
    matches!(state, ModalState::Created | ModalState::Visible)
}

pub fn video_modal(video_id: &str, title: &str) -> ModalContent {
    ModalContent {
        kind: ViewerKind::Video,
        class_name: "video-viewer-modal",
        inner_html: format!(
            r#"<div class="video-viewer-content"><button class="video-viewer-close">&times;</button><h3 class="video-viewer-title">{}</h3><div class="video-viewer-iframe-wrapper"><iframe src="{}" frameborder="0" allow="autoplay; fullscreen; picture-in-picture" allowfullscreen class="video-viewer-iframe"></iframe></div></div>"#,
            html_escape(title),
            html_escape(&player_embed_url(video_id))
        ),
    }
}

/// DOM id of the element the panorama viewer renders into.
pub fn panorama_target(id: ModalId) -> String {
    format!("panorama-{}", id)
}

pub fn panorama_modal(id: ModalId, title: &str) -> ModalContent {
    ModalContent {
        kind: ViewerKind::Panorama,
        class_name: "viewer-360-modal",
        inner_html: format!(
            r#"<div class="viewer-360-content"><button class="viewer-360-close">&times;</button><h3 class="viewer-360-title">{}</h3><div id="{}" class="viewer-360-panorama"></div></div>"#,
            html_escape(title),
            panorama_target(id)
        ),
    }
}

pub fn detail_modal(
    title: &str,
    category: &str,
    description: Option<&str>,
    image_url: Option<&str>,
) -> ModalContent {
    let title = html_escape(title);
    let image = image_url
        .map(|src| format!(r#"<img src="{}" alt="{}" />"#, html_escape(src), title))
        .unwrap_or_default();
    let description = description
        .map(|d| format!(r#"<p class="project-detail-description">{}</p>"#, html_escape(d)))
        .unwrap_or_default();
    ModalContent {
        kind: ViewerKind::Detail,
        class_name: "project-detail-modal",
        inner_html: format!(
            r##"<div class="project-detail-content"><button class="project-detail-close">&times;</button><div class="project-detail-image">{}</div><div class="project-detail-info"><span class="project-detail-category">{}</span><h2 class="project-detail-title">{}</h2>{}<a href="#contact" class="btn btn-primary">Start Vergelijkbaar Project</a></div></div>"##,
            image,
            html_escape(category),
            title,
            description
        ),
    }
}
