use crate::model::node::{IdGen, Node, NodeData, ROOT, Tree};
use crate::model::task::Task;
use crate::util::move_line::LineMove;

/// Error type for structural edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("line {0} is out of range")]
    LineOutOfRange(usize),
    #[error("invalid line range {first}..={last}")]
    InvalidRange { first: usize, last: usize },
    #[error("cannot move line {from} ({length} lines) to line {to}")]
    InvalidTarget {
        from: usize,
        to: usize,
        length: usize,
    },
    #[error("line {0} is not a task")]
    NotATask(usize),
    #[error("line {0} cannot hold root data")]
    RootData(usize),
}

/// The result of a structural edit: the new tree, plus how existing lines
/// shifted (None when no line moved).
#[derive(Debug, Clone)]
pub struct Edit {
    pub tree: Tree,
    pub line_move: Option<LineMove>,
}

impl Edit {
    fn unchanged(tree: Tree) -> Self {
        Edit {
            tree,
            line_move: None,
        }
    }

    /// Line of the node an insertion created
    pub fn inserted_line(&self) -> Option<usize> {
        match self.line_move {
            Some(LineMove {
                from: None,
                to: Some(to),
                ..
            }) => Some(to),
            _ => None,
        }
    }
}

impl Tree {
    // -----------------------------------------------------------------------
    // Filtering and replacement
    // -----------------------------------------------------------------------

    /// Drop every node for which `keep` is false. The children of a dropped
    /// node take its place in its parent, so keeping a descendant never
    /// depends on keeping its ancestors. `keep` sees the original lines.
    pub fn filter(&self, keep: impl Fn(&Node) -> bool) -> Tree {
        let mut tree = self.clone();
        // Reverse breadth-first: descendants are resolved before ancestors
        let order = tree.breadth_first();
        for &index in order.iter().rev() {
            if index == ROOT || keep(&tree.nodes[index]) {
                continue;
            }
            tree.detach_promoting(index);
        }
        tree.renumber();
        tree
    }

    /// Swap the payload of the first node matching `predicate`, keeping its
    /// id, position and (if `keep_children`) its subtree. Dropped children
    /// are reported as a deletion. Without a match the clone comes back
    /// unchanged.
    pub fn replace(
        &self,
        predicate: impl Fn(&Node) -> bool,
        data: NodeData,
        keep_children: bool,
    ) -> Edit {
        let mut tree = self.clone();
        let Some(index) = tree.find_index(predicate) else {
            tracing::debug!("replace: no matching node");
            return Edit::unchanged(tree);
        };
        if index == ROOT {
            tracing::debug!("replace: refusing to replace the root");
            return Edit::unchanged(tree);
        }
        tree.nodes[index].data = data;
        let mut line_move = None;
        if !keep_children {
            let dropped = tree.subtree_len(index);
            for child in std::mem::take(&mut tree.nodes[index].children) {
                tree.nodes[child].parent = None;
            }
            if dropped > 0 {
                line_move = Some(LineMove::delete(index + 1, dropped));
            }
        }
        tree.renumber();
        Edit { tree, line_move }
    }

    /// Copy of the tree with the payload on `line` swapped for `data`. The
    /// node keeps its id, position and children, so no line moves.
    pub fn with_data(&self, line: usize, data: NodeData) -> Result<Tree, TreeError> {
        self.check_line(line)?;
        if matches!(data, NodeData::Root) {
            return Err(TreeError::RootData(line));
        }
        let mut tree = self.clone();
        tree.nodes[line].data = data;
        Ok(tree)
    }

    /// Copy of the tree with the task on `line` changed by `f`; nothing
    /// else is touched.
    pub fn update_task(&self, line: usize, f: impl FnOnce(&mut Task)) -> Result<Tree, TreeError> {
        if line == ROOT {
            return Err(TreeError::LineOutOfRange(line));
        }
        let mut tree = self.clone();
        match tree.nodes.get_mut(line).map(|n| &mut n.data) {
            Some(NodeData::Task(task)) => {
                f(task);
                Ok(tree)
            }
            Some(_) => Err(TreeError::NotATask(line)),
            None => Err(TreeError::LineOutOfRange(line)),
        }
    }

    /// Every task and heading re-emitted in canonical form
    pub fn normalized(&self) -> Tree {
        let mut tree = self.clone();
        for node in tree.nodes.iter_mut() {
            match &mut node.data {
                NodeData::Task(task) => task.mark_dirty(),
                NodeData::Heading(group) => group.mark_dirty(),
                NodeData::Root | NodeData::Other(_) => {}
            }
        }
        tree
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Add `data` as the last line under the root
    pub fn append(&self, data: NodeData, ids: &mut IdGen) -> Edit {
        let at = self.len() + 1;
        let mut tree = self.clone();
        tree.push_child(ROOT, ids.node_id(), data);
        tree.renumber();
        Edit {
            tree,
            line_move: Some(LineMove::insert(at, 1)),
        }
    }

    /// Add `data` as the last child of the node on `parent_line`
    /// (line 0 is the root)
    pub fn append_to(
        &self,
        parent_line: usize,
        data: NodeData,
        ids: &mut IdGen,
    ) -> Result<Edit, TreeError> {
        if parent_line > self.len() {
            return Err(TreeError::LineOutOfRange(parent_line));
        }
        let at = parent_line + self.subtree_len(parent_line) + 1;
        let mut tree = self.clone();
        tree.push_child(parent_line, ids.node_id(), data);
        tree.renumber();
        Ok(Edit {
            tree,
            line_move: Some(LineMove::insert(at, 1)),
        })
    }

    /// Insert an empty task after `line`: as the first child of a heading,
    /// otherwise as the next sibling. A missing line leaves the tree as is.
    pub fn insert_empty_task(&self, line: usize, ids: &mut IdGen) -> Edit {
        let mut tree = self.clone();
        if line == ROOT || line > self.len() {
            tracing::debug!(line, "insert_empty_task: no such line");
            return Edit::unchanged(tree);
        }

        let task = NodeData::Task(Task::empty(ids.next_id()));
        let id = ids.node_id();
        let at;
        if self.nodes[line].is_heading() {
            let index = tree.push_child(line, id, task);
            tree.detach(index);
            tree.attach(line, 0, index);
            at = line + 1;
        } else {
            let parent = self.nodes[line].parent.unwrap_or(ROOT);
            let position = self.nodes[parent]
                .children
                .iter()
                .position(|&c| c == line)
                .map_or(0, |p| p + 1);
            let index = tree.push_child(parent, id, task);
            tree.detach(index);
            tree.attach(parent, position, index);
            at = line + self.subtree_len(line) + 1;
        }
        tree.renumber();
        Edit {
            tree,
            line_move: Some(LineMove::insert(at, 1)),
        }
    }

    /// Append an empty task as the last child of the first node matching
    /// `predicate`. Without a match the tree comes back unchanged.
    pub fn append_empty_task(&self, predicate: impl Fn(&Node) -> bool, ids: &mut IdGen) -> Edit {
        let Some(index) = self.find_index(predicate) else {
            tracing::debug!("append_empty_task: no matching node");
            return Edit::unchanged(self.clone());
        };
        let task = NodeData::Task(Task::empty(ids.next_id()));
        match self.append_to(index, task, ids) {
            Ok(edit) => edit,
            Err(_) => Edit::unchanged(self.clone()),
        }
    }

    // -----------------------------------------------------------------------
    // Removal and moves
    // -----------------------------------------------------------------------

    /// Remove the node on `line` together with its descendants
    pub fn remove(&self, line: usize) -> Result<Edit, TreeError> {
        self.check_line(line)?;
        let length = 1 + self.subtree_len(line);
        let mut tree = self.clone();
        tree.detach(line);
        tree.renumber();
        Ok(Edit {
            tree,
            line_move: Some(LineMove::delete(line, length)),
        })
    }

    /// Move the node on `from` and its descendants so the block starts at
    /// line `to` of the result. The block lands in front of the line that
    /// will follow it and shares that line's parent; at the very end it
    /// goes under the root.
    pub fn move_block(&self, from: usize, to: usize) -> Result<Edit, TreeError> {
        self.check_line(from)?;
        let length = 1 + self.subtree_len(from);
        if to == 0 || to + length > self.len() + 1 {
            return Err(TreeError::InvalidTarget { from, to, length });
        }
        if to == from {
            return Ok(Edit::unchanged(self.clone()));
        }

        let mut tree = self.clone();
        tree.detach(from);
        tree.insert_at_position(from, to);
        tree.renumber();
        Ok(Edit {
            tree,
            line_move: Some(LineMove::moved(from, to, length)),
        })
    }

    /// Move only the line `from` to line `to`. Its children stay behind and
    /// take its old place.
    pub fn move_single(&self, from: usize, to: usize) -> Result<Edit, TreeError> {
        self.check_line(from)?;
        if to == 0 || to > self.len() {
            return Err(TreeError::InvalidTarget { from, to, length: 1 });
        }
        if to == from {
            return Ok(Edit::unchanged(self.clone()));
        }

        let mut tree = self.clone();
        tree.detach_promoting(from);
        tree.insert_at_position(from, to);
        tree.renumber();
        Ok(Edit {
            tree,
            line_move: Some(LineMove::moved(from, to, 1)),
        })
    }

    // -----------------------------------------------------------------------
    // Indentation
    // -----------------------------------------------------------------------

    /// Nest each top-most node of `first..=last` under its previous
    /// sibling. Nodes without a previous sibling stay. Lines do not change.
    pub fn indent(&self, first: usize, last: usize) -> Result<Tree, TreeError> {
        self.check_range(first, last)?;
        let mut tree = self.clone();
        for index in self.top_most_in_range(first, last) {
            let Some(parent) = tree.nodes[index].parent else {
                continue;
            };
            let siblings = &tree.nodes[parent].children;
            let Some(pos) = siblings.iter().position(|&c| c == index) else {
                continue;
            };
            if pos == 0 {
                continue;
            }
            let previous = siblings[pos - 1];
            tree.detach(index);
            let end = tree.nodes[previous].children.len();
            tree.attach(previous, end, index);
        }
        tree.renumber();
        Ok(tree)
    }

    /// Lift each top-most node of `first..=last` out of its parent, to sit
    /// right after it. Siblings that followed the node become its last
    /// children, so document order and lines do not change.
    pub fn outdent(&self, first: usize, last: usize) -> Result<Tree, TreeError> {
        self.check_range(first, last)?;
        let mut tree = self.clone();
        for index in self.top_most_in_range(first, last) {
            let Some(parent) = tree.nodes[index].parent else {
                continue;
            };
            if parent == ROOT {
                continue;
            }
            let Some(grandparent) = tree.nodes[parent].parent else {
                continue;
            };
            let siblings = &tree.nodes[parent].children;
            let Some(pos) = siblings.iter().position(|&c| c == index) else {
                continue;
            };

            let following: Vec<usize> = tree.nodes[parent].children.split_off(pos + 1);
            tree.nodes[parent].children.truncate(pos);
            tree.nodes[index].parent = None;
            for &f in &following {
                tree.nodes[f].parent = Some(index);
            }
            tree.nodes[index].children.extend(following);

            let parent_pos = tree.nodes[grandparent]
                .children
                .iter()
                .position(|&c| c == parent)
                .map_or(0, |p| p + 1);
            tree.attach(grandparent, parent_pos, index);
        }
        tree.renumber();
        Ok(tree)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn check_line(&self, line: usize) -> Result<(), TreeError> {
        if line == ROOT || line > self.len() {
            return Err(TreeError::LineOutOfRange(line));
        }
        Ok(())
    }

    fn check_range(&self, first: usize, last: usize) -> Result<(), TreeError> {
        if first == ROOT || first > last || last > self.len() {
            return Err(TreeError::InvalidRange { first, last });
        }
        Ok(())
    }

    /// Nodes in `first..=last` whose parent is outside the range, in
    /// document order
    fn top_most_in_range(&self, first: usize, last: usize) -> Vec<usize> {
        (first..=last)
            .filter(|&line| match self.nodes[line].parent {
                Some(p) => p == ROOT || p < first || p > last,
                None => false,
            })
            .collect()
    }

    /// Put the detached node `index` so its block starts at line `to` of
    /// the final tree. Must run before renumbering.
    fn insert_at_position(&mut self, index: usize, to: usize) {
        let remaining: Vec<usize> = crate::util::flat::flat(self)
            .into_iter()
            .map(|item| item.index)
            .collect();
        match remaining.get(to - 1) {
            Some(&next) => {
                let parent = self.nodes[next].parent.unwrap_or(ROOT);
                let position = self.nodes[parent]
                    .children
                    .iter()
                    .position(|&c| c == next)
                    .unwrap_or(0);
                self.attach(parent, position, index);
            }
            None => {
                let end = self.nodes[ROOT].children.len();
                self.attach(ROOT, end, index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::group::Group;
    use crate::model::node::NodeKind;
    use crate::parse::{node_to_string, parse_md};
    use crate::util::move_line::move_line;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> (Tree, IdGen) {
        let mut ids = IdGen::new();
        let tree = parse_md(text, &mut ids);
        (tree, ids)
    }

    fn assert_lines_sequential(tree: &Tree) {
        let lines: Vec<usize> = crate::util::flat::flat(tree).iter().map(|i| i.line).collect();
        assert_eq!(lines, (1..=tree.len()).collect::<Vec<_>>());
    }

    /// Every node that survived must sit where `line_move` says it would
    fn assert_follows_move(before: &Tree, edit: &Edit) {
        let Some(mv) = edit.line_move else {
            return;
        };
        for node in before.iter() {
            let expected = move_line(node.line, mv.from, mv.to, mv.length);
            assert_eq!(edit.tree.line_of(node.id), expected, "node at line {}", node.line);
        }
    }

    const LIST: &str = "# Today\n- [ ] a\n  - [ ] a1\n  - [ ] a2\n- [ ] b\n- [ ] c";

    #[test]
    fn test_normalized_rewrites_tasks_only() {
        let (tree, _) = parse("# Reading\n- [ ] novel ~90m #book\n   free text");
        assert_eq!(node_to_string(&tree), "# Reading\n- [ ] novel ~90m #book\n   free text");
        assert_eq!(
            node_to_string(&tree.normalized()),
            "# Reading\n- [ ] novel ~1h30m #book\n   free text"
        );
    }

    // --- filter ---

    #[test]
    fn test_filter_promotes_children() {
        let (tree, _) = parse("- [ ] parent\n  - [ ] child");
        let filtered = tree.filter(|n| n.line != 1);
        assert_eq!(filtered.len(), 1);
        let child = filtered.node_at_line(1).unwrap();
        assert_eq!(child.as_task().map(|t| t.title.as_str()), Some("child"));
        assert_eq!(child.parent_index(), Some(ROOT));
        assert_eq!(node_to_string(&filtered), "- [ ] child");
    }

    #[test]
    fn test_filter_keeps_completed_under_dropped_ancestor() {
        let (tree, _) = parse("- [ ] p\n  - [ ] q\n    - [x] done\n- [x] top");
        let done_only = tree.filter(|n| n.as_task().is_some_and(|t| t.is_complete()));
        assert_eq!(node_to_string(&done_only), "- [x] done\n- [x] top");
        assert_lines_sequential(&done_only);
    }

    #[test]
    fn test_filter_leaves_receiver_alone() {
        let (tree, _) = parse(LIST);
        let before = tree.clone();
        let _ = tree.filter(|n| !n.is_task());
        assert_eq!(tree, before);
    }

    // --- replace ---

    #[test]
    fn test_replace_keeps_identity_and_children() {
        let (tree, mut ids) = parse(LIST);
        let original = tree.node_at_line(2).unwrap().clone();
        let replacement = NodeData::Task(Task::new(ids.next_id(), "renamed"));
        let edit = tree.replace(|n| n.line == 2, replacement, true);
        assert_eq!(edit.line_move, None);
        let replaced = edit.tree;

        let node = replaced.node_at_line(2).unwrap();
        assert_eq!(node.id, original.id);
        assert_eq!(replaced.subtree_len(2), 2);
        assert!(node_to_string(&replaced).contains("- [ ] renamed\n  - [ ] a1"));
    }

    #[test]
    fn test_replace_without_children_drops_them() {
        let (tree, _) = parse(LIST);
        let edit = tree.replace(|n| n.line == 2, NodeData::Other("text".into()), false);
        assert_eq!(node_to_string(&edit.tree), "# Today\ntext\n- [ ] b\n- [ ] c");
        assert_eq!(edit.line_move, Some(LineMove::delete(3, 2)));
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_replace_miss_is_noop() {
        let (tree, _) = parse(LIST);
        let edit = tree.replace(|n| n.line == 99, NodeData::Other("x".into()), true);
        assert_eq!(edit.tree, tree);
        assert_eq!(edit.line_move, None);
    }

    #[test]
    fn test_with_data_swaps_any_kind() {
        let (tree, mut ids) = parse(LIST);
        let heading = tree.node_at_line(1).unwrap().id;

        let swapped = tree
            .with_data(1, NodeData::Heading(Group::new(2, "Tomorrow")))
            .unwrap();
        let swapped = swapped
            .with_data(3, NodeData::Other("  plain note".into()))
            .unwrap();
        let swapped = swapped
            .with_data(2, NodeData::Task(Task::new(ids.next_id(), "a, renamed")))
            .unwrap();

        assert_eq!(swapped.node_at_line(1).unwrap().id, heading);
        assert_eq!(swapped.subtree_len(2), 2);
        assert_eq!(
            node_to_string(&swapped),
            "## Tomorrow\n- [ ] a, renamed\n    plain note\n  - [ ] a2\n- [ ] b\n- [ ] c"
        );
        // the original is untouched
        assert_eq!(node_to_string(&tree), LIST);
    }

    #[test]
    fn test_with_data_rejects_bad_input() {
        let (tree, _) = parse(LIST);
        assert_eq!(
            tree.with_data(0, NodeData::Other("x".into())).unwrap_err(),
            TreeError::LineOutOfRange(0)
        );
        assert_eq!(
            tree.with_data(7, NodeData::Other("x".into())).unwrap_err(),
            TreeError::LineOutOfRange(7)
        );
        assert_eq!(tree.with_data(2, NodeData::Root).unwrap_err(), TreeError::RootData(2));
    }

    #[test]
    fn test_update_task() {
        let (tree, _) = parse(LIST);
        let updated = tree.update_task(5, |t| {
            t.set_complete(true);
        });
        assert!(node_to_string(&updated.unwrap()).contains("- [x] b"));
        assert_eq!(tree.update_task(1, |_| {}).unwrap_err(), TreeError::NotATask(1));
        assert_eq!(tree.update_task(9, |_| {}).unwrap_err(), TreeError::LineOutOfRange(9));
    }

    // --- insertion ---

    #[test]
    fn test_append() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree.append(NodeData::Task(Task::new(ids.next_id(), "d")), &mut ids);
        assert_eq!(edit.inserted_line(), Some(7));
        assert!(node_to_string(&edit.tree).ends_with("- [ ] c\n- [ ] d"));
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_append_to_nested() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree
            .append_to(2, NodeData::Task(Task::new(ids.next_id(), "a3")), &mut ids)
            .unwrap();
        assert_eq!(edit.inserted_line(), Some(5));
        assert_eq!(edit.tree.depth(5), 1);
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_insert_empty_task_under_heading() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree.insert_empty_task(1, &mut ids);
        assert_eq!(edit.inserted_line(), Some(2));
        let node = edit.tree.node_at_line(2).unwrap();
        assert_eq!(node.kind(), NodeKind::Task);
        assert_eq!(edit.tree.depth(2), 1);
        assert!(edit.tree.is_member_of_heading(2));
        assert_follows_move(&tree, &edit);
        assert_lines_sequential(&edit.tree);
    }

    #[test]
    fn test_insert_empty_task_after_subtree() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree.insert_empty_task(2, &mut ids);
        // a has two children, so the new sibling lands on line 5
        assert_eq!(edit.inserted_line(), Some(5));
        assert_eq!(edit.tree.depth(5), 0);
        assert_eq!(
            node_to_string(&edit.tree),
            "# Today\n- [ ] a\n  - [ ] a1\n  - [ ] a2\n- [ ] \n- [ ] b\n- [ ] c"
        );
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_insert_empty_task_missing_line() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree.insert_empty_task(42, &mut ids);
        assert_eq!(edit.tree, tree);
        assert!(edit.line_move.is_none());
    }

    #[test]
    fn test_append_empty_task() {
        let (tree, mut ids) = parse(LIST);
        let edit = tree.append_empty_task(|n| n.is_heading(), &mut ids);
        // the heading owns no children here, so the task goes right under it
        assert_eq!(edit.inserted_line(), Some(2));
        assert_eq!(edit.tree.depth(2), 1);
        assert_follows_move(&tree, &edit);

        let miss = tree.append_empty_task(|_| false, &mut ids);
        assert_eq!(miss.tree, tree);
    }

    // --- removal and moves ---

    #[test]
    fn test_remove_subtree() {
        let (tree, _) = parse(LIST);
        let edit = tree.remove(2).unwrap();
        assert_eq!(node_to_string(&edit.tree), "# Today\n- [ ] b\n- [ ] c");
        assert_eq!(edit.line_move, Some(LineMove::delete(2, 3)));
        assert_follows_move(&tree, &edit);
        assert_eq!(tree.remove(0).unwrap_err(), TreeError::LineOutOfRange(0));
    }

    #[test]
    fn test_move_block_down() {
        let (tree, _) = parse(LIST);
        // a (3 lines) moves to the end: block starts at 6 - 3 + 1 = 4
        let edit = tree.move_block(2, 4).unwrap();
        assert_eq!(
            node_to_string(&edit.tree),
            "# Today\n- [ ] b\n- [ ] c\n- [ ] a\n  - [ ] a1\n  - [ ] a2"
        );
        assert_follows_move(&tree, &edit);
        assert_lines_sequential(&edit.tree);
    }

    #[test]
    fn test_move_block_up_adopts_parent_of_next() {
        let (tree, _) = parse(LIST);
        // c moves in front of a2 and becomes a's child
        let edit = tree.move_block(6, 4).unwrap();
        assert_eq!(
            node_to_string(&edit.tree),
            "# Today\n- [ ] a\n  - [ ] a1\n  - [ ] c\n  - [ ] a2\n- [ ] b"
        );
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_move_block_rejects_bad_target() {
        let (tree, _) = parse(LIST);
        assert!(matches!(
            tree.move_block(2, 5),
            Err(TreeError::InvalidTarget { length: 3, .. })
        ));
        assert!(tree.move_block(2, 0).is_err());
        assert!(tree.move_block(7, 1).is_err());
    }

    #[test]
    fn test_move_block_onto_itself() {
        let (tree, _) = parse(LIST);
        let edit = tree.move_block(5, 5).unwrap();
        assert_eq!(edit.tree, tree);
        assert!(edit.line_move.is_none());
    }

    #[test]
    fn test_move_single_leaves_children() {
        let (tree, _) = parse(LIST);
        let edit = tree.move_single(2, 6).unwrap();
        assert_eq!(
            node_to_string(&edit.tree),
            "# Today\n- [ ] a1\n- [ ] a2\n- [ ] b\n- [ ] c\n- [ ] a"
        );
        assert_follows_move(&tree, &edit);
    }

    #[test]
    fn test_every_move_follows_move_line() {
        let (tree, _) = parse(LIST);
        for from in 1..=tree.len() {
            let length = 1 + tree.subtree_len(from);
            for to in 1..=(tree.len() + 1 - length) {
                let edit = tree.move_block(from, to).unwrap();
                assert_follows_move(&tree, &edit);
                assert_lines_sequential(&edit.tree);
                assert_eq!(edit.tree.len(), tree.len());
            }
            for to in 1..=tree.len() {
                let edit = tree.move_single(from, to).unwrap();
                assert_follows_move(&tree, &edit);
                assert_lines_sequential(&edit.tree);
            }
        }
    }

    // --- indentation ---

    #[test]
    fn test_indent_range() {
        let (tree, _) = parse(LIST);
        let indented = tree.indent(5, 6).unwrap();
        assert_eq!(
            node_to_string(&indented),
            "# Today\n- [ ] a\n  - [ ] a1\n  - [ ] a2\n  - [ ] b\n  - [ ] c"
        );
        let ids_before: Vec<_> = tree.iter().map(|n| n.id).collect();
        let ids_after: Vec<_> = indented.iter().map(|n| n.id).collect();
        assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn test_indent_first_child_stays() {
        let (tree, _) = parse(LIST);
        let indented = tree.indent(3, 3).unwrap();
        assert_eq!(indented, tree);
    }

    #[test]
    fn test_indent_moves_subtree_along() {
        let (tree, _) = parse("- [ ] a\n- [ ] b\n  - [ ] b1");
        let indented = tree.indent(2, 3).unwrap();
        assert_eq!(node_to_string(&indented), "- [ ] a\n  - [ ] b\n    - [ ] b1");
    }

    #[test]
    fn test_outdent_adopts_following_siblings() {
        let (tree, _) = parse(LIST);
        let outdented = tree.outdent(3, 3).unwrap();
        assert_eq!(
            node_to_string(&outdented),
            "# Today\n- [ ] a\n- [ ] a1\n  - [ ] a2\n- [ ] b\n- [ ] c"
        );
        assert_lines_sequential(&outdented);
    }

    #[test]
    fn test_outdent_range_flattens() {
        let (tree, _) = parse(LIST);
        let outdented = tree.outdent(3, 4).unwrap();
        assert_eq!(
            node_to_string(&outdented),
            "# Today\n- [ ] a\n- [ ] a1\n- [ ] a2\n- [ ] b\n- [ ] c"
        );
    }

    #[test]
    fn test_outdent_top_level_is_noop() {
        let (tree, _) = parse(LIST);
        assert_eq!(tree.outdent(1, 2).unwrap(), tree);
    }

    #[test]
    fn test_indent_then_outdent_restores() {
        let (tree, _) = parse(LIST);
        let back = tree.indent(5, 5).unwrap().outdent(5, 5).unwrap();
        assert_eq!(node_to_string(&back), node_to_string(&tree));
    }

    #[test]
    fn test_invalid_ranges() {
        let (tree, _) = parse(LIST);
        assert_eq!(
            tree.indent(4, 3).unwrap_err(),
            TreeError::InvalidRange { first: 4, last: 3 }
        );
        assert!(tree.outdent(0, 1).is_err());
        assert!(tree.outdent(1, 7).is_err());
    }

    #[test]
    fn test_lines_stay_sequential_after_edit_chain() {
        let (tree, mut ids) = parse(LIST);
        let tree = tree.insert_empty_task(3, &mut ids).tree;
        let tree = tree.move_block(1, 2).unwrap().tree;
        let tree = tree.indent(3, 5).unwrap();
        let tree = tree.remove(2).unwrap().tree;
        let tree = tree.outdent(1, tree.len()).unwrap();
        let tree = tree.filter(|n| n.line % 2 == 1);
        assert_lines_sequential(&tree);
    }
}
