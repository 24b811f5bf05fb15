use chrono::{DateTime, Utc};

use crate::model::node::Tree;
use crate::model::time::Time;
use crate::model::tracking::TrackingRecord;
use crate::ops::side_tables::SideTables;
use crate::ops::tree_ops::TreeError;

/// Error type for tracking operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("line {0} is not being tracked")]
    NotTracking(usize),
    #[error("line {0} is already being tracked")]
    AlreadyTracking(usize),
}

/// Start timing the task on `line`. Only one task runs at a time: a task
/// already running elsewhere is stopped first and its time recorded.
pub fn start(
    tree: &Tree,
    tables: &mut SideTables,
    line: usize,
    now: DateTime<Utc>,
) -> Result<Tree, TrackingError> {
    if tables.tracking_at(line).is_some_and(|r| r.is_tracking) {
        return Err(TrackingError::AlreadyTracking(line));
    }

    let mut tree = tree.clone();
    if let Some(active) = tables.active().map(|r| r.line) {
        tracing::debug!(line = active, "stopping previous task");
        tree = stop(&tree, tables, active, now)?.0;
    }

    let tree = tree.update_task(line, |task| {
        task.tracking_start_at(now);
    })?;
    let node_id = tree
        .node_at_line(line)
        .map(|n| n.id)
        .ok_or(TreeError::LineOutOfRange(line))?;

    match tables.tracking_at_mut(line) {
        Some(record) => {
            record.node_id = node_id;
            record.is_tracking = true;
            record.tracking_start = Some(now);
        }
        None => tables
            .tracking
            .push(TrackingRecord::started(line, node_id, now)),
    }
    Ok(tree)
}

/// Stop timing the task on `line`, adding the elapsed time to the task.
/// Returns the new tree and the time added.
pub fn stop(
    tree: &Tree,
    tables: &mut SideTables,
    line: usize,
    now: DateTime<Utc>,
) -> Result<(Tree, Time), TrackingError> {
    let start = tables
        .tracking_at(line)
        .filter(|r| r.is_tracking)
        .and_then(|r| r.tracking_start)
        .ok_or(TrackingError::NotTracking(line))?;

    let mut elapsed = Time::default();
    let tree = tree.update_task(line, |task| {
        elapsed = task.tracking_stop_at(start, now);
    })?;

    if let Some(record) = tables.tracking_at_mut(line) {
        record.is_tracking = false;
        record.tracking_start = None;
        record.elapsed.add(&elapsed);
    }
    Ok((tree, elapsed))
}

/// Flip completion of the task on `line`. A running task is stopped (and
/// its time recorded) before it is completed.
pub fn toggle_complete(
    tree: &Tree,
    tables: &mut SideTables,
    line: usize,
    now: DateTime<Utc>,
) -> Result<Tree, TrackingError> {
    let mut tree = tree.clone();
    if tables.tracking_at(line).is_some_and(|r| r.is_tracking) {
        tree = stop(&tree, tables, line, now)?.0;
    }
    Ok(tree.update_task(line, |task| {
        let complete = !task.is_complete();
        task.set_complete(complete);
    })?)
}
