use serde::{Deserialize, Serialize};

use crate::model::node::{NodeId, Tree};
use crate::model::tracking::{AlarmRule, EventLine, LineAddressed, TrackingRecord};
use crate::util::move_line::LineMove;

/// Follow a structural edit: every record moves the way its line moved,
/// and records whose line was deleted are dropped.
pub fn remap_lines<T: LineAddressed>(items: &mut Vec<T>, line_move: &LineMove) {
    items.retain_mut(|item| match line_move.apply(item.line()) {
        Some(line) => {
            item.set_line(line);
            true
        }
        None => false,
    });
}

/// All line-indexed records kept beside a list: tracking state, calendar
/// event links and alarms. Edits must be applied to all three together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideTables {
    #[serde(default)]
    pub tracking: Vec<TrackingRecord>,
    #[serde(default)]
    pub events: Vec<EventLine>,
    #[serde(default)]
    pub alarms: Vec<AlarmRule>,
}

impl SideTables {
    pub fn is_empty(&self) -> bool {
        self.tracking.is_empty() && self.events.is_empty() && self.alarms.is_empty()
    }

    /// Remap every table through one line move
    pub fn apply(&mut self, line_move: &LineMove) {
        remap_lines(&mut self.tracking, line_move);
        remap_lines(&mut self.events, line_move);
        remap_lines(&mut self.alarms, line_move);
    }

    /// Apply an optional move, as returned by a tree edit
    pub fn follow(&mut self, line_move: Option<LineMove>) {
        if let Some(mv) = line_move {
            self.apply(&mv);
        }
    }

    /// Recompute lines from stable node ids after an edit that cannot be
    /// expressed as a line move (e.g. filtering). Records whose node is gone
    /// are dropped; records without a node id keep their line.
    pub fn resync(&mut self, tree: &Tree) {
        self.tracking
            .retain_mut(|r| relocate(tree, Some(r.node_id), &mut r.line));
        self.events.retain_mut(|e| relocate(tree, e.node_id, &mut e.line));
        self.alarms.retain_mut(|a| relocate(tree, a.node_id, &mut a.line));
    }

    /// Attach every record to the node now on its line. Node ids only live
    /// as long as one parsed tree, so stored tables are rebound after each
    /// load. Records pointing past the end of the list are dropped.
    pub fn rebind(&mut self, tree: &Tree) {
        let before = self.tracking.len() + self.events.len() + self.alarms.len();
        self.tracking.retain_mut(|r| match tree.node_at_line(r.line) {
            Some(node) => {
                r.node_id = node.id;
                true
            }
            None => false,
        });
        self.events.retain_mut(|e| bind(tree, e.line, &mut e.node_id));
        self.alarms.retain_mut(|a| bind(tree, a.line, &mut a.node_id));

        let dropped = before - (self.tracking.len() + self.events.len() + self.alarms.len());
        if dropped > 0 {
            tracing::warn!(dropped, "dropped records for lines no longer in the list");
        }
    }

    /// The running tracking record, if any
    pub fn active(&self) -> Option<&TrackingRecord> {
        self.tracking.iter().find(|r| r.is_tracking)
    }

    pub fn tracking_at(&self, line: usize) -> Option<&TrackingRecord> {
        self.tracking.iter().find(|r| r.line == line)
    }

    pub(crate) fn tracking_at_mut(&mut self, line: usize) -> Option<&mut TrackingRecord> {
        self.tracking.iter_mut().find(|r| r.line == line)
    }

    pub fn alarms_at(&self, line: usize) -> impl Iterator<Item = &AlarmRule> {
        self.alarms.iter().filter(move |a| a.line == line)
    }

    pub fn events_at(&self, line: usize) -> impl Iterator<Item = &EventLine> {
        self.events.iter().filter(move |e| e.line == line)
    }
}

fn bind(tree: &Tree, line: usize, node_id: &mut Option<NodeId>) -> bool {
    match tree.node_at_line(line) {
        Some(node) => {
            *node_id = Some(node.id);
            true
        }
        None => false,
    }
}

fn relocate(tree: &Tree, node_id: Option<NodeId>, line: &mut usize) -> bool {
    let Some(id) = node_id else {
        return true;
    };
    match tree.line_of(id) {
        Some(new_line) => {
            *line = new_line;
            true
        }
        None => false,
    }
}
