//! Grid renderer: paints portfolio cards into the grid container and keeps a typed
//! registry of what each card carries for click dispatch.

use std::collections::HashMap;

use crate::document::{Document, EventKind, ListenerId, ListenerTarget};
use crate::markup::{grid_message, html_escape, PANORAMA_ICON, PLAY_ICON};
use crate::model::PortfolioItem;

pub const GRID_CONTAINER: &str = "portfolio-grid";
pub const EMPTY_MESSAGE: &str = "Binnenkort beschikbaar...";
pub const LOAD_FAILED_MESSAGE: &str = "Portfolio items laden mislukt.";

/// Data a rendered card exposes to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub panorama_url: Option<String>,
    pub thumbnail: Option<String>,
}

impl Card {
    pub fn from_item(item: &PortfolioItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.category_or_default().to_string(),
            description: item.description.clone(),
            video_url: item.vimeo_url.clone(),
            panorama_url: item.photo_360_url.clone(),
            thumbnail: item.thumbnail().map(str::to_string),
        }
    }

    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }

    pub fn has_panorama(&self) -> bool {
        self.panorama_url.is_some()
    }

    /// DOM address of this card inside the grid container.
    pub fn node(&self) -> String {
        format!("{}/{}", GRID_CONTAINER, self.id)
    }
}

/// Cards of the last render, in display order, with their click listeners.
#[derive(Debug, Default, Clone)]
pub struct CardRegistry {
    cards: Vec<Card>,
    index: HashMap<String, usize>,
    listeners: HashMap<String, ListenerId>,
}

impl CardRegistry {
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    pub fn listener(&self, id: &str) -> Option<ListenerId> {
        self.listeners.get(id).copied()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GridRenderer;

impl GridRenderer {
    /// Paint `items` into the grid. Card data is registered before the click listeners
    /// go on, so a listener always sees its card's final data.
    pub fn render(&self, doc: &mut Document, items: &[PortfolioItem]) -> CardRegistry {
        if items.is_empty() {
            doc.set_inner_html(GRID_CONTAINER, grid_message(EMPTY_MESSAGE));
            return CardRegistry::default();
        }

        let mut registry = CardRegistry::default();
        let mut html = String::new();
        for item in items {
            let card = Card::from_item(item);
            html.push_str(&card_markup(&card));
            if registry.index.contains_key(&card.id) {
                tracing::warn!("[PORTFOLIO] duplicate item id {} skipped for dispatch", card.id);
                continue;
            }
            registry.index.insert(card.id.clone(), registry.cards.len());
            registry.cards.push(card);
        }
        doc.set_inner_html(GRID_CONTAINER, html);

        for card in &registry.cards {
            let listener = doc.add_listener(EventKind::Click, ListenerTarget::Node(card.node()));
            registry.listeners.insert(card.id.clone(), listener);
        }
        tracing::debug!("[PORTFOLIO] rendered {} cards", registry.len());
        registry
    }

    /// Replace the grid with the load-failure message.
    pub fn render_failure(&self, doc: &mut Document) -> CardRegistry {
        doc.set_inner_html(GRID_CONTAINER, grid_message(LOAD_FAILED_MESSAGE));
        CardRegistry::default()
    }
}

fn card_markup(card: &Card) -> String {
    let title = html_escape(&card.title);
    let category = html_escape(&card.category);

    let image = card
        .thumbnail
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}" loading="lazy" decoding="async" />"#,
                html_escape(src),
                title
            )
        })
        .unwrap_or_default();
    let play_icon = if card.has_video() {
        format!(r#"<div class="portfolio-play-icon">{}</div>"#, PLAY_ICON)
    } else {
        String::new()
    };
    let panorama_icon = if card.has_panorama() {
        format!(r#"<div class="portfolio-360-icon">{}</div>"#, PANORAMA_ICON)
    } else {
        String::new()
    };

    format!(
        r#"<div class="portfolio-item" id="portfolio-item-{}">{}{}{}<div class="portfolio-overlay"><div><span class="portfolio-category">{}</span><h3 class="portfolio-title">{}</h3></div></div></div>"#,
        html_escape(&card.id),
        image,
        play_icon,
        panorama_icon,
        category,
        title
    )
}
