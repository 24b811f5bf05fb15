use crate::model::config::CarryConfig;
use crate::model::node::{Node, NodeData, Tree};
use crate::model::time::Time;

fn is_completed_task(node: &Node) -> bool {
    node.as_task().is_some_and(|t| t.is_complete())
}

/// The list to start the next day with: completed tasks are dropped (their
/// open subtasks move up into their place) and, optionally, actual times
/// are cleared.
pub fn carry_over(tree: &Tree, config: &CarryConfig) -> Tree {
    let mut carried = if config.drop_completed {
        tree.filter(|n| !is_completed_task(n))
    } else {
        tree.clone()
    };

    if config.reset_times {
        for node in carried.nodes.iter_mut() {
            if let NodeData::Task(task) = &mut node.data
                && !task.actual.is_empty()
            {
                task.actual = Time::default();
                task.mark_dirty();
            }
        }
    }
    carried
}

/// What got done: headings and completed tasks only. Completed tasks under
/// an open parent are kept and move up.
pub fn completed_log(tree: &Tree) -> Tree {
    tree.filter(|n| n.is_heading() || is_completed_task(n))
}
