//! Viewer dispatch: which modal a clicked card opens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::Card;
use crate::markup::BRAND_ACCENT;

/// Accepted Vimeo URL shapes, tried in order.
static VIMEO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"vimeo\.com/(\d+)",
        r"vimeo\.com/video/(\d+)",
        r"player\.vimeo\.com/video/(\d+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerKind {
    Video,
    Panorama,
    Detail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerRequest {
    Video {
        url: String,
        title: String,
    },
    Panorama {
        image_url: String,
        title: String,
    },
    Detail {
        title: String,
        category: String,
        description: Option<String>,
        image_url: Option<String>,
    },
}

impl ViewerRequest {
    pub fn kind(&self) -> ViewerKind {
        match self {
            ViewerRequest::Video { .. } => ViewerKind::Video,
            ViewerRequest::Panorama { .. } => ViewerKind::Panorama,
            ViewerRequest::Detail { .. } => ViewerKind::Detail,
        }
    }
}

/// Video wins over panorama, panorama over the plain detail view.
pub fn select_viewer(card: &Card) -> ViewerRequest {
    if let Some(url) = &card.video_url {
        return ViewerRequest::Video {
            url: url.clone(),
            title: card.title.clone(),
        };
    }
    if let Some(image_url) = &card.panorama_url {
        return ViewerRequest::Panorama {
            image_url: image_url.clone(),
            title: card.title.clone(),
        };
    }
    ViewerRequest::Detail {
        title: card.title.clone(),
        category: card.category.clone(),
        description: card.description.clone(),
        image_url: card.thumbnail.clone(),
    }
}

/// Numeric Vimeo id from a page or player URL, or `None` for anything else.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIMEO_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn player_embed_url(video_id: &str) -> String {
    format!(
        "https://player.vimeo.com/video/{}?autoplay=1&color={}&title=0&byline=0&portrait=0",
        video_id, BRAND_ACCENT
    )
}
