use std::sync::LazyLock;

use regex::Regex;

use crate::model::tag::Tag;

/// `~actual`, `~actual/estimate` or `~/estimate`
static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^~((?:\d+(?:\.\d+)?[dhm])+)?(?:/((?:\d+(?:\.\d+)?[dhm])+))?$")
        .expect("time suffix pattern")
});

/// Title text with the time and tag words that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    pub title: String,
    pub actual: Option<String>,
    pub estimated: Option<String>,
    pub tags: Vec<Tag>,
}

/// Split `s` into a title and its suffix. The title ends at the first
/// ` #` (or, if `allow_time`, ` ~`). Every `#tag[:qty]` word after that
/// point is a tag; the first `~time` word is the time. Other words in the
/// suffix are ignored.
pub fn split_suffix(s: &str, allow_time: bool) -> Suffix {
    let (title, rest) = s.split_at(title_end(s, allow_time));
    let mut suffix = Suffix {
        title: title.trim_end().to_string(),
        actual: None,
        estimated: None,
        tags: Vec::new(),
    };

    let mut seen_time = false;
    for word in rest.split_whitespace() {
        if let Some(tag) = Tag::parse(word) {
            suffix.tags.push(tag);
            continue;
        }
        if allow_time
            && !seen_time
            && let Some(caps) = TIME_SUFFIX.captures(word)
            && (caps.get(1).is_some() || caps.get(2).is_some())
        {
            suffix.actual = caps.get(1).map(|m| m.as_str().to_string());
            suffix.estimated = caps.get(2).map(|m| m.as_str().to_string());
            seen_time = true;
        }
    }
    suffix
}

/// Byte offset where the title stops
fn title_end(s: &str, allow_time: bool) -> usize {
    let is_marker = |c: char| c == '#' || (allow_time && c == '~');
    if s.starts_with(is_marker) {
        return 0;
    }
    s.match_indices(' ')
        .map(|(i, _)| i)
        .find(|&i| s[i + 1..].starts_with(is_marker))
        .unwrap_or(s.len())
}
