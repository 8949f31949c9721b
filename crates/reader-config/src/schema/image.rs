//! Adaptive image configuration types.

use serde::{Deserialize, Serialize};

/// How the responsive image hook derives and applies image URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageConfig {
    /// Selector of the image element inside the hook element.
    pub selector: String,
    /// Value of the `height` query parameter in portrait (valid range: 1-10000).
    pub portrait_height: u32,
    /// Class attribute applied in portrait.
    pub portrait_class: String,
    /// Class attribute applied in landscape.
    pub landscape_class: String,
    /// Resource path for a page. `{comic_id}` and `{current_page}` are
    /// substituted from the element's data attributes.
    pub page_route: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            selector: "img".to_string(),
            portrait_height: 1200,
            portrait_class: "portrait-image block".to_string(),
            landscape_class: "landscape-image w-full h-auto object-contain".to_string(),
            page_route: "/api/comics/{comic_id}/page/{current_page}".to_string(),
        }
    }
}
