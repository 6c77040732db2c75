//! Toast notifications: animate in, close button, auto-dismiss.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::document::{Document, ElementId, Timers};
use crate::markup::{html_escape, ERROR_ICON, SUCCESS_ICON};
use crate::modal::{CLOSE_TRANSITION_MS, SHOW_CLASS, SHOW_DELAY_MS};

pub const AUTO_DISMISS_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

#[derive(Debug)]
struct Notice {
    kind: NoticeKind,
    message: String,
    element: ElementId,
    dismissed: bool,
}

#[derive(Debug, Clone, Copy)]
enum NoticeTask {
    Show(NoticeId),
    Dismiss(NoticeId),
    Remove(NoticeId),
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: BTreeMap<NoticeId, Notice>,
    timers: Timers<NoticeTask>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        doc: &mut Document,
        now: DateTime<Utc>,
        message: &str,
        kind: NoticeKind,
    ) -> NoticeId {
        self.next_id += 1;
        let id = NoticeId(self.next_id);
        let icon = match kind {
            NoticeKind::Success => SUCCESS_ICON,
            NoticeKind::Error => ERROR_ICON,
        };
        let html = format!(
            r#"<div class="notification-content"><div class="notification-icon">{}</div><p class="notification-message">{}</p><button class="notification-close" aria-label="Sluiten">&times;</button></div>"#,
            icon,
            html_escape(message)
        );
        let class_name = format!("custom-notification custom-notification-{}", kind.as_str());
        let element = doc.append_to_body(&class_name, html);
        self.notices.insert(
            id,
            Notice {
                kind,
                message: message.to_string(),
                element,
                dismissed: false,
            },
        );
        self.timers
            .schedule(now + Duration::milliseconds(SHOW_DELAY_MS), NoticeTask::Show(id));
        self.timers
            .schedule(now + Duration::milliseconds(AUTO_DISMISS_MS), NoticeTask::Dismiss(id));
        id
    }

    /// Close button. Dismissing an already dismissed notice is a no-op.
    pub fn dismiss(&mut self, doc: &mut Document, now: DateTime<Utc>, id: NoticeId) -> bool {
        let Some(notice) = self.notices.get_mut(&id) else {
            return false;
        };
        if notice.dismissed {
            return false;
        }
        notice.dismissed = true;
        doc.remove_class(notice.element, SHOW_CLASS);
        self.timers.schedule(
            now + Duration::milliseconds(CLOSE_TRANSITION_MS),
            NoticeTask::Remove(id),
        );
        true
    }

    pub fn tick(&mut self, doc: &mut Document, now: DateTime<Utc>) {
        for task in self.timers.take_due(now) {
            match task {
                NoticeTask::Show(id) => {
                    if let Some(notice) = self.notices.get(&id).filter(|n| !n.dismissed) {
                        doc.add_class(notice.element, SHOW_CLASS);
                    }
                }
                NoticeTask::Dismiss(id) => {
                    self.dismiss(doc, now, id);
                }
                NoticeTask::Remove(id) => {
                    if let Some(notice) = self.notices.remove(&id) {
                        doc.remove(notice.element);
                    }
                }
            }
        }
    }

    pub fn last(&self) -> Option<(NoticeKind, &str)> {
        self.notices
            .values()
            .next_back()
            .map(|n| (n.kind, n.message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
