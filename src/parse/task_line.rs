use std::sync::LazyLock;

use regex::Regex;

use crate::model::node::IdGen;
use crate::model::task::{Task, TaskState};
use crate::model::time::Time;
use crate::parse::suffix::split_suffix;

static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- (\[ \]|\[x\])\s.+$").expect("task line pattern"));

/// Whether a dedented line is a checklist item: `- [ ] title` or `- [x] title`
pub fn is_task_str(line: &str) -> bool {
    TASK_LINE.is_match(line)
}

/// Parse a dedented task line: `- [x] Title ~1h/2h #tag #tag:2`.
///
/// Returns None (with a warning) for lines that are not tasks.
pub fn parse_task(line: &str, ids: &mut IdGen) -> Option<Task> {
    if !is_task_str(line) {
        tracing::warn!(line, "not a task line");
        return None;
    }

    // "- [x]" is five ASCII bytes, followed by one whitespace character
    let state = line[3..]
        .chars()
        .next()
        .and_then(TaskState::from_checkbox_char)
        .unwrap_or(TaskState::Stop);
    let after_box = &line[5..];
    let body = after_box
        .char_indices()
        .nth(1)
        .map_or("", |(i, _)| &after_box[i..]);

    let suffix = split_suffix(body, true);
    Some(Task {
        id: ids.next_id(),
        title: suffix.title,
        state,
        actual: suffix.actual.as_deref().map(Time::parse_str).unwrap_or_default(),
        estimated: suffix
            .estimated
            .as_deref()
            .map(Time::parse_str)
            .unwrap_or_default(),
        tags: suffix.tags,
        source_text: Some(line.to_string()),
        dirty: false,
    })
}

/// Serialize a task without indentation. A clean task is emitted verbatim.
pub fn task_to_line(task: &Task) -> String {
    if !task.dirty
        && let Some(ref source) = task.source_text
    {
        return source.clone();
    }
    canonical_task_line(task)
}

/// `- [X] title[ ~actual[/estimate]][ #tag…]`
pub fn canonical_task_line(task: &Task) -> String {
    let mut words: Vec<String> = Vec::new();
    if !task.title.is_empty() {
        words.push(task.title.clone());
    }

    let actual = task.actual.to_string();
    let estimated = task.estimated.to_string();
    if !actual.is_empty() || !estimated.is_empty() {
        let mut time = format!("~{}", actual);
        if !estimated.is_empty() {
            time.push('/');
            time.push_str(&estimated);
        }
        words.push(time);
    }

    words.extend(task.tags.iter().map(|t| t.to_string()));
    format!("- [{}] {}", task.state.checkbox_char(), words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tag::Tag;

    fn parse(line: &str) -> Option<Task> {
        parse_task(line, &mut IdGen::new())
    }

    #[test]
    fn test_is_task_str() {
        assert!(is_task_str("- [ ] task"));
        assert!(is_task_str("- [x] done"));
        assert!(is_task_str("- [ ]\ttabbed"));
        assert!(!is_task_str("- [ ] "));
        assert!(!is_task_str("- [X] upper"));
        assert!(!is_task_str("  - [ ] indented"));
        assert!(!is_task_str("- plain bullet"));
        assert!(!is_task_str("-[ ] nospace"));
    }

    #[test]
    fn test_parse_title_only() {
        let task = parse("- [ ] task title").unwrap();
        assert_eq!(task.title, "task title");
        assert_eq!(task.state, TaskState::Stop);
        assert_eq!(task.actual.to_string(), "");
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_parse_actual_time() {
        let task = parse("- [ ] tasktitle ~2h").unwrap();
        assert_eq!(task.title, "tasktitle");
        assert_eq!(task.actual.to_string(), "2h");
        assert!(task.estimated.is_empty());
    }

    #[test]
    fn test_parse_complete_with_estimate_and_tags() {
        let task = parse("- [x] review PR ~45m/1h #work #pomo:2").unwrap();
        assert_eq!(task.state, TaskState::Complete);
        assert_eq!(task.title, "review PR");
        assert_eq!(task.actual.to_string(), "45m");
        assert_eq!(task.estimated.to_string(), "1h");
        assert_eq!(task.tags, vec![Tag::new("work"), Tag::with_quantity("pomo", 2)]);
    }

    #[test]
    fn test_title_stops_at_first_tag_or_time() {
        let task = parse("- [ ] a #tag more").unwrap();
        assert_eq!(task.title, "a");
        assert_eq!(task.tags, vec![Tag::new("tag")]);

        let task = parse("- [ ] task ~1h later").unwrap();
        assert_eq!(task.title, "task");
        assert_eq!(task.actual.to_string(), "1h");
        // the clean line still round-trips
        assert_eq!(task_to_line(&task), "- [ ] task ~1h later");
    }

    #[test]
    fn test_parse_rejects_non_task() {
        assert!(parse("## heading").is_none());
        assert!(parse("plain text").is_none());
    }

    #[test]
    fn test_parse_assigns_ids() {
        let mut ids = IdGen::new();
        let a = parse_task("- [ ] a", &mut ids).unwrap();
        let b = parse_task("- [ ] b", &mut ids).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[test]
    fn test_clean_task_is_verbatim() {
        let task = parse("- [ ] odd   spacing  #t").unwrap();
        assert_eq!(task_to_line(&task), "- [ ] odd   spacing  #t");
    }

    #[test]
    fn test_dirty_task_keeps_tags_and_estimate() {
        let mut task = parse("- [ ] write ~1h/3h #deep").unwrap();
        task.set_title("write more");
        assert_eq!(task_to_line(&task), "- [ ] write more ~1h/3h #deep");
    }

    #[test]
    fn test_canonical_forms() {
        let mut task = Task::new(1, "plan");
        assert_eq!(canonical_task_line(&task), "- [ ] plan");
        task.estimated = Time::parse_str("30m");
        assert_eq!(canonical_task_line(&task), "- [ ] plan ~/30m");
        task.set_complete(true);
        assert_eq!(canonical_task_line(&task), "- [x] plan ~/30m");
        assert_eq!(canonical_task_line(&Task::empty(2)), "- [ ] ");
    }
}
