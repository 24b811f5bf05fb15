use serde::Serialize;

use crate::model::config::Config;
use crate::model::node::{NodeData, NodeKind, Tree};
use crate::model::tag::Tag;
use crate::model::task::TaskState;
use crate::model::time::Time;
use crate::model::tracking::AlarmRule;
use crate::ops::side_tables::SideTables;
use crate::util::flat::flat;
use crate::util::text::{pad_to_width, truncate_to_width};

/// Width of the text column in the human listing
const TEXT_WIDTH: usize = 48;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LineJson {
    pub line: usize,
    pub depth: usize,
    pub kind: NodeKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tracking: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alarms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

#[derive(Serialize)]
pub struct ListJson {
    pub lines: Vec<LineJson>,
    pub total_actual: String,
    pub total_estimated: String,
}

/// Result of a tracking command
#[derive(Serialize)]
pub struct TrackingJson {
    pub line: usize,
    pub title: String,
    pub tracking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
    pub actual: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn alarm_to_string(alarm: &AlarmRule) -> Option<String> {
    let fires_at = alarm.fires_at();
    if fires_at.is_none() {
        tracing::warn!(line = alarm.line, "skipping alarm outside the date range");
    }
    fires_at.map(|at| at.to_rfc3339())
}

/// One entry per line, in document order, with config colors applied
pub fn list_to_json(tree: &Tree, tables: &SideTables, config: &Config) -> ListJson {
    let mut lines = Vec::new();
    for item in flat(tree) {
        let Some(node) = tree.node(item.index) else {
            continue;
        };
        let mut entry = LineJson {
            line: item.line,
            depth: item.depth,
            kind: node.kind(),
            text: String::new(),
            state: None,
            level: None,
            actual: None,
            estimated: None,
            tags: Vec::new(),
            tracking: tables.tracking_at(item.line).is_some_and(|r| r.is_tracking),
            alarms: tables.alarms_at(item.line).filter_map(alarm_to_string).collect(),
            events: tables
                .events_at(item.line)
                .map(|e| e.event_id.clone())
                .collect(),
        };
        match &node.data {
            NodeData::Task(task) => {
                entry.text = task.title.clone();
                entry.state = Some(task.state);
                entry.actual = non_empty(task.actual.to_string());
                entry.estimated = non_empty(task.estimated.to_string());
                entry.tags = task.tags.clone();
            }
            NodeData::Heading(group) => {
                entry.text = group.title.clone();
                entry.level = Some(group.level);
                entry.tags = group.tags.clone();
            }
            NodeData::Other(text) => entry.text = text.clone(),
            NodeData::Root => {}
        }
        config.colorize(&mut entry.tags);
        lines.push(entry);
    }

    let (actual, estimated) = totals(tree);
    ListJson {
        lines,
        total_actual: actual,
        total_estimated: estimated,
    }
}

/// Sum of actual and estimated time over all tasks
pub fn totals(tree: &Tree) -> (String, String) {
    let mut actual = Time::default();
    let mut estimated = Time::default();
    for task in tree.iter().filter_map(|n| n.as_task()) {
        actual += &task.actual;
        estimated += &task.estimated;
    }
    (actual.to_string(), estimated.to_string())
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn format_tags(tags: &[Tag], config: &Config) -> String {
    tags.iter()
        .map(|t| match config.tag_color(&t.name) {
            Some(color) => format!("{}({})", t, color),
            None => t.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_times(actual: &str, estimated: &str) -> String {
    match (actual.is_empty(), estimated.is_empty()) {
        (true, true) => String::new(),
        (false, true) => actual.to_string(),
        (true, false) => format!("-/{}", estimated),
        (false, false) => format!("{}/{}", actual, estimated),
    }
}

/// Format one line of the listing:
/// `   3    [x] title                      1h/2h  #tag`
pub fn format_line(entry: &LineJson, config: &Config) -> String {
    let indent = "  ".repeat(entry.depth);
    let body = match entry.kind {
        NodeKind::Task => {
            let mark = if entry.tracking {
                '>'
            } else {
                entry.state.map(|s| s.checkbox_char()).unwrap_or(' ')
            };
            format!("{}[{}] {}", indent, mark, entry.text)
        }
        NodeKind::Heading => format!(
            "{}{} {}",
            indent,
            "#".repeat(entry.level.unwrap_or(1)),
            entry.text
        ),
        NodeKind::Other | NodeKind::Root => format!("{}{}", indent, entry.text),
    };

    let times = format_times(
        entry.actual.as_deref().unwrap_or(""),
        entry.estimated.as_deref().unwrap_or(""),
    );
    let tags = format_tags(&entry.tags, config);
    let mut extras: Vec<String> = Vec::new();
    if !times.is_empty() {
        extras.push(times);
    }
    if !tags.is_empty() {
        extras.push(tags);
    }
    if !entry.alarms.is_empty() {
        extras.push(format!("alarm {}", entry.alarms.join(", ")));
    }

    let line = format!("{:>4}  ", entry.line);
    if extras.is_empty() {
        return format!("{}{}", line, body).trim_end().to_string();
    }
    let body = pad_to_width(&truncate_to_width(&body, TEXT_WIDTH), TEXT_WIDTH);
    format!("{}{}  {}", line, body, extras.join("  "))
}

/// The whole listing, with a totals footer when any time is recorded
pub fn format_listing(list: &ListJson, config: &Config) -> Vec<String> {
    let mut lines: Vec<String> = list.lines.iter().map(|e| format_line(e, config)).collect();
    let times = format_times(&list.total_actual, &list.total_estimated);
    if !times.is_empty() {
        lines.push(String::new());
        lines.push(format!("total {}", times));
    }
    lines
}
