use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::group::Group;
use super::task::Task;

/// Arena index of the root node
pub const ROOT: usize = 0;

/// Identity of a node that survives renumbering and copy-on-write edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Hands out node and task ids. Passed explicitly to the parser and to every
/// edit that creates nodes, so two trees never share a counter by accident.
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        IdGen { next: 1 }
    }

    /// Continue numbering after `last`, e.g. when editing a tree parsed by
    /// another generator.
    pub fn starting_after(last: u64) -> Self {
        IdGen { next: last + 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn node_id(&mut self) -> NodeId {
        NodeId(self.next_id())
    }
}

impl Default for IdGen {
    fn default() -> Self {
        IdGen::new()
    }
}

/// Node type, derived from the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Task,
    Heading,
    Other,
    Root,
}

/// What a line holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Root,
    Task(Task),
    Heading(Group),
    /// Raw text with its depth indentation removed
    Other(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root => NodeKind::Root,
            NodeData::Task(_) => NodeKind::Task,
            NodeData::Heading(_) => NodeKind::Heading,
            NodeData::Other(_) => NodeKind::Other,
        }
    }
}

/// One line of the list. Parent and children are arena indices into the
/// owning [`Tree`] and are only meaningful inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// 1-based line in the serialized text, 0 for the root
    pub line: usize,
    pub data: NodeData,
    /// UI-only fold state
    pub collapsed: bool,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl Node {
    pub(crate) fn new(id: NodeId, data: NodeData) -> Self {
        Node {
            id,
            line: 0,
            data,
            collapsed: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }

    pub fn as_task(&self) -> Option<&Task> {
        match &self.data {
            NodeData::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.data {
            NodeData::Heading(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_task(&self) -> bool {
        self.kind() == NodeKind::Task
    }

    pub fn is_heading(&self) -> bool {
        self.kind() == NodeKind::Heading
    }
}

/// A line-addressed list tree stored as an arena.
///
/// Every tree handed out by this crate is normalized: the arena is laid out
/// in depth-first document order, so `nodes[i].line == i` and the root sits
/// at index 0 with line 0. Structural edits clone the tree, relink the
/// clone and renumber it; the receiver is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only the root
    pub fn new(ids: &mut IdGen) -> Self {
        Tree {
            nodes: vec![Node::new(ids.node_id(), NodeData::Root)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Number of lines (nodes other than the root)
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// The node on a 1-based line; line 0 is the root
    pub fn node_at_line(&self, line: usize) -> Option<&Node> {
        self.nodes.get(line)
    }

    /// All lines in document order, root excluded
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().skip(1)
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = &Node> {
        self.nodes
            .get(index)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&c| &self.nodes[c])
    }

    pub fn parent(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)?.parent.map(|p| &self.nodes[p])
    }

    /// Number of ancestors, not counting the root
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(index).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ROOT {
                break;
            }
            depth += 1;
            current = self.nodes[p].parent;
        }
        depth
    }

    /// Number of descendants below `index`
    pub fn subtree_len(&self, index: usize) -> usize {
        let mut count = 0;
        let mut stack: Vec<usize> = match self.nodes.get(index) {
            Some(n) => n.children.clone(),
            None => return 0,
        };
        while let Some(i) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[i].children.iter().copied());
        }
        count
    }

    /// Breadth-first search from the root (included). First match wins.
    pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<&Node> {
        self.find_index(predicate).map(|i| &self.nodes[i])
    }

    pub fn find_index(&self, predicate: impl Fn(&Node) -> bool) -> Option<usize> {
        self.breadth_first()
            .into_iter()
            .find(|&i| predicate(&self.nodes[i]))
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Current line of the node with `id`
    pub fn line_of(&self, id: NodeId) -> Option<usize> {
        self.find_by_id(id).map(|n| n.line)
    }

    /// Whether any ancestor below the root is a heading
    pub fn is_member_of_heading(&self, index: usize) -> bool {
        let mut current = self.nodes.get(index).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ROOT {
                return false;
            }
            if self.nodes[p].is_heading() {
                return true;
            }
            current = self.nodes[p].parent;
        }
        false
    }

    /// Largest node or task id in use, for seeding an [`IdGen`]
    pub fn max_id(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| match &n.data {
                NodeData::Task(task) => n.id.0.max(task.id),
                _ => n.id.0,
            })
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn breadth_first(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([ROOT]);
        while let Some(i) = queue.pop_front() {
            order.push(i);
            queue.extend(self.nodes[i].children.iter().copied());
        }
        order
    }

    /// Attach a new node as the last child of `parent`. Used while building;
    /// the caller renumbers once the tree is complete.
    pub(crate) fn push_child(&mut self, parent: usize, id: NodeId, data: NodeData) -> usize {
        let index = self.nodes.len();
        let mut node = Node::new(id, data);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        index
    }

    /// Unlink `index` from its parent, leaving its subtree intact but
    /// unreachable until reattached.
    pub(crate) fn detach(&mut self, index: usize) {
        if let Some(parent) = self.nodes[index].parent.take() {
            self.nodes[parent].children.retain(|&c| c != index);
        }
    }

    /// Unlink `index` and put its children where it was
    pub(crate) fn detach_promoting(&mut self, index: usize) {
        let Some(parent) = self.nodes[index].parent else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[index].children);
        for &c in &children {
            self.nodes[c].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent].children;
        if let Some(pos) = siblings.iter().position(|&c| c == index) {
            siblings.splice(pos..=pos, children);
        }
        self.nodes[index].parent = None;
    }

    /// Insert `index` into `parent`'s children at `position`
    pub(crate) fn attach(&mut self, parent: usize, position: usize, index: usize) {
        self.nodes[index].parent = Some(parent);
        let siblings = &mut self.nodes[parent].children;
        let position = position.min(siblings.len());
        siblings.insert(position, index);
    }

    /// Rebuild the arena in document order and assign `line = position`.
    /// Nodes no longer reachable from the root are dropped. This is the only
    /// place line numbers are assigned.
    pub(crate) fn renumber(&mut self) {
        let order: Vec<usize> = std::iter::once(ROOT)
            .chain(crate::util::flat::flat(self).into_iter().map(|item| item.index))
            .collect();

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }

        let mut old_nodes: Vec<Option<Node>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for (new, &old) in order.iter().enumerate() {
            if let Some(mut node) = old_nodes[old].take() {
                node.line = new;
                node.parent = node.parent.map(|p| remap[p]);
                for c in node.children.iter_mut() {
                    *c = remap[*c];
                }
                nodes.push(node);
            }
        }
        self.nodes = nodes;
    }
}
