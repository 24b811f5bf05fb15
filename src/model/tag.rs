use std::fmt;

use serde::{Deserialize, Serialize};

/// A `#name` or `#name:quantity` tag on a task or heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (without the `#` prefix)
    pub name: String,
    /// Optional count after the colon, e.g. pomodoros planned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Display color. Never written to markdown; assigned from config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            quantity: None,
            color: None,
        }
    }

    pub fn with_quantity(name: impl Into<String>, quantity: u32) -> Self {
        Tag {
            quantity: Some(quantity),
            ..Tag::new(name)
        }
    }

    /// Parse a single `#name[:quantity]` word. Returns None if the word is
    /// not a tag (no leading `#`, empty name, or a nested `#`).
    pub fn parse(word: &str) -> Option<Tag> {
        let body = word.strip_prefix('#')?;
        if body.is_empty() || body.contains('#') {
            return None;
        }
        if let Some((name, qty)) = body.rsplit_once(':')
            && !name.is_empty()
            && let Ok(quantity) = qty.parse::<u32>()
        {
            return Some(Tag::with_quantity(name, quantity));
        }
        Some(Tag::new(body))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity {
            Some(q) => write!(f, "#{}:{}", self.name, q),
            None => write!(f, "#{}", self.name),
        }
    }
}
