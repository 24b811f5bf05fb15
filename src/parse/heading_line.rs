use std::sync::LazyLock;

use regex::Regex;

use crate::model::group::Group;
use crate::parse::suffix::split_suffix;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#+ ").expect("heading line pattern"));

/// Whether a line is a markdown heading (`#`, `##`, … followed by a space)
pub fn is_heading_str(line: &str) -> bool {
    HEADING_LINE.is_match(line)
}

/// Parse a heading line into level, title and tags
pub fn parse_group(line: &str) -> Option<Group> {
    if !is_heading_str(line) {
        tracing::warn!(line, "not a heading line");
        return None;
    }
    let content = line.trim_start();
    let level = content.chars().take_while(|&c| c == '#').count();
    // Markers are ASCII, and the pattern guarantees a space after them
    let body = &content[level + 1..];
    let suffix = split_suffix(body, false);

    Some(Group {
        level,
        title: suffix.title,
        tags: suffix.tags,
        source_text: Some(line.to_string()),
        dirty: false,
    })
}

/// Serialize a heading. A clean heading is emitted verbatim.
pub fn group_to_line(group: &Group) -> String {
    if !group.dirty
        && let Some(ref source) = group.source_text
    {
        return source.clone();
    }
    canonical_group_line(group)
}

/// `## title #tag #tag:2`
pub fn canonical_group_line(group: &Group) -> String {
    let mut words: Vec<String> = Vec::new();
    if !group.title.is_empty() {
        words.push(group.title.clone());
    }
    words.extend(group.tags.iter().map(|t| t.to_string()));
    format!("{} {}", "#".repeat(group.level), words.join(" "))
}
