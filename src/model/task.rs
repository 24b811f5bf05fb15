use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;
use super::time::Time;

/// Task tracking state. Only `Complete` is visible in the checkbox;
/// `Running` is written as an open box and lives in the tracking records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Stop,
    Running,
    Complete,
}

impl TaskState {
    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskState::Stop | TaskState::Running => ' ',
            TaskState::Complete => 'x',
        }
    }

    /// Parse a checkbox character into a state
    pub fn from_checkbox_char(c: char) -> Option<TaskState> {
        match c {
            ' ' => Some(TaskState::Stop),
            'x' => Some(TaskState::Complete),
            _ => None,
        }
    }
}

/// A checklist item with its parsed fields and source tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Process-unique id, only meaningful as a render key
    pub id: u64,
    pub title: String,
    pub state: TaskState,
    /// Accumulated time spent (`~1h30m`)
    pub actual: Time,
    /// Target time (`~/2h` or `~1h/2h`)
    pub estimated: Time,
    /// Tags in source order
    pub tags: Vec<Tag>,

    // --- Source tracking ---
    /// The original line with its depth indentation removed
    #[serde(skip)]
    pub source_text: Option<String>,
    /// Whether this task has been modified since parsing
    #[serde(skip)]
    pub dirty: bool,
}

impl Task {
    /// Create a new task with the given title, marked dirty (no source)
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            state: TaskState::Stop,
            actual: Time::default(),
            estimated: Time::default(),
            tags: Vec::new(),
            source_text: None,
            dirty: true,
        }
    }

    /// An untitled open task, as inserted by the editor on Enter
    pub fn empty(id: u64) -> Self {
        Task::new(id, "")
    }

    /// Mark this task as dirty (will be serialized in canonical format)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == TaskState::Complete
    }

    /// Start timing. Returns the start timestamp, which the caller keeps in
    /// a tracking record; the task itself does not hold it.
    pub fn tracking_start(&mut self) -> DateTime<Utc> {
        self.tracking_start_at(Utc::now())
    }

    pub fn tracking_start_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.set_state(TaskState::Running);
        now
    }

    /// Stop timing and add the time since `start` to the actual time.
    /// Returns the elapsed time that was added.
    pub fn tracking_stop(&mut self, start: DateTime<Utc>) -> Time {
        self.tracking_stop_at(start, Utc::now())
    }

    pub fn tracking_stop_at(&mut self, start: DateTime<Utc>, now: DateTime<Utc>) -> Time {
        if !self.is_running() {
            tracing::debug!(task = self.id, "stopping a task that is not running");
        }
        let elapsed = Time::parse_ms((now - start).num_milliseconds().max(0));
        if !elapsed.is_empty() {
            self.actual.add(&elapsed);
            self.mark_dirty();
        }
        self.set_state(TaskState::Stop);
        elapsed
    }

    /// Set or clear completion. A running task is left untouched: the
    /// caller must stop tracking first. Returns whether the state changed.
    pub fn set_complete(&mut self, complete: bool) -> bool {
        if self.is_running() {
            tracing::debug!(task = self.id, "refusing to change completion of a running task");
            return false;
        }
        let target = if complete {
            TaskState::Complete
        } else {
            TaskState::Stop
        };
        if self.state == target {
            return false;
        }
        self.set_state(target);
        true
    }

    /// Replace the title, marking the task dirty
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.mark_dirty();
    }

    fn set_state(&mut self, state: TaskState) {
        if self.state != state {
            self.state = state;
            self.mark_dirty();
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.state == other.state
            && self.actual == other.actual
            && self.estimated == other.estimated
            && self.tags == other.tags
    }
}
