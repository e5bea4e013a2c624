use serde::{Deserialize, Serialize};

/// Metadata of one Notion page, reduced to what the homepage needs.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Icon image URL. Emoji icons are already resolved to an image URL.
    pub icon: Option<String>,
    /// Freshness token; passed back unchanged when fetching the page's blocks.
    pub last_edited_time: String,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub enum LastEditedTime {
    /// Ignore any cached copy and ask the source again.
    #[default]
    Force,
    Known(String),
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct FetchPageRequest {
    pub page_id: String,
    pub last_edited_time: LastEditedTime,
}

impl FetchPageRequest {
    pub fn force(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            last_edited_time: LastEditedTime::Force,
        }
    }
}
