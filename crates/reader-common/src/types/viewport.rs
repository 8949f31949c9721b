use serde::{Deserialize, Serialize};

/// Size of the browsing viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
}

impl ViewportState {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Portrait only when height strictly exceeds width; a square viewport
    /// is landscape.
    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    Instant,
    #[default]
    Smooth,
}

/// Window scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    pub top: f64,
    pub left: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollTarget {
    pub fn top_of_page(behavior: ScrollBehavior) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            behavior,
        }
    }
}
