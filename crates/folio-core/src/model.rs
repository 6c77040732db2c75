//! Wire types for the `portfolio_items` and `contact_submissions` collections.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CATEGORY: &str = "Project";

/// A portfolio record as served by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub video_thumbnail_url: Option<String>,
    /// External video reference (Vimeo page or player URL).
    #[serde(default, deserialize_with = "non_empty")]
    pub vimeo_url: Option<String>,
    /// Equirectangular panorama image.
    #[serde(default, deserialize_with = "non_empty")]
    pub photo_360_url: Option<String>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub order_index: i64,
}

fn visible_by_default() -> bool {
    true
}

impl PortfolioItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            description: None,
            image_url: None,
            video_thumbnail_url: None,
            vimeo_url: None,
            photo_360_url: None,
            is_visible: true,
            order_index: 0,
        }
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn has_video(&self) -> bool {
        self.vimeo_url.is_some()
    }

    pub fn has_panorama(&self) -> bool {
        self.photo_360_url.is_some()
    }

    /// Video thumbnail when the item has a video and a thumbnail, else the primary image.
    pub fn thumbnail(&self) -> Option<&str> {
        match (&self.vimeo_url, &self.video_thumbnail_url) {
            (Some(_), Some(thumb)) => Some(thumb.as_str()),
            _ => self.image_url.as_deref(),
        }
    }
}

/// One row for `contact_submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// Backend ids are bigint or uuid depending on the table; both become text here.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
