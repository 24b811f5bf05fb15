use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Deepest heading level the renderer distinguishes
pub const MAX_RENDER_LEVEL: usize = 6;

/// A markdown heading (`## title #tag`) that groups the lines nested under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Number of leading `#` characters, preserved as parsed
    pub level: usize,
    pub title: String,
    pub tags: Vec<Tag>,

    // --- Source tracking ---
    #[serde(skip)]
    pub source_text: Option<String>,
    #[serde(skip)]
    pub dirty: bool,
}

impl Group {
    pub fn new(level: usize, title: impl Into<String>) -> Self {
        Group {
            level,
            title: title.into(),
            tags: Vec::new(),
            source_text: None,
            dirty: true,
        }
    }

    /// Level clamped to what the renderer can show
    pub fn render_level(&self) -> usize {
        self.level.clamp(1, MAX_RENDER_LEVEL)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.title == other.title && self.tags == other.tags
    }
}
