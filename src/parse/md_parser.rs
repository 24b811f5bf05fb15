use crate::model::node::{IdGen, NodeData, ROOT, Tree};
use crate::parse::heading_line::{is_heading_str, parse_group};
use crate::parse::task_line::{is_task_str, parse_task};

/// Spaces per nesting level
pub const INDENT_WIDTH: usize = 2;

/// Nesting depth from leading spaces, truncated to whole indent units
pub fn indent_depth(line: &str, indent_width: usize) -> usize {
    if indent_width == 0 {
        return 0;
    }
    let spaces = line.len() - line.trim_start_matches(' ').len();
    spaces / indent_width
}

/// Leading whitespace for a line at `depth`
pub fn depth_to_indent(depth: usize, indent_width: usize) -> String {
    " ".repeat(depth * indent_width)
}

/// Parse markdown into a list tree using the default indent width
pub fn parse_md(text: &str, ids: &mut IdGen) -> Tree {
    parse_md_with(text, INDENT_WIDTH, ids)
}

/// Parse markdown into a list tree. Every `\n`-separated line becomes one
/// node, blank lines included, so parsing never fails.
///
/// A line may sit at most one level deeper than the line before it. Extra
/// indentation is left in the stored text, which keeps serialization exact.
pub fn parse_md_with(text: &str, indent_width: usize, ids: &mut IdGen) -> Tree {
    let mut tree = Tree::new(ids);
    // (arena index, depth) of the previous line
    let mut prev: Option<(usize, usize)> = None;

    for line in text.split('\n') {
        let raw_depth = indent_depth(line, indent_width);
        let (depth, parent) = match prev {
            None => (0, ROOT),
            Some((prev_index, prev_depth)) => {
                let depth = raw_depth.min(prev_depth + 1);
                let parent = if depth > prev_depth {
                    prev_index
                } else {
                    // Sibling of the previous line, or of one of its ancestors
                    let mut parent = tree.nodes[prev_index].parent.unwrap_or(ROOT);
                    for _ in depth..prev_depth {
                        parent = tree.nodes[parent].parent.unwrap_or(ROOT);
                    }
                    parent
                };
                (depth, parent)
            }
        };

        let content = &line[depth * indent_width..];
        let data = classify_line(content, ids);
        let id = ids.node_id();
        let index = tree.push_child(parent, id, data);
        prev = Some((index, depth));
    }

    tree.renumber();
    tree
}

/// Turn a dedented line into a task, heading or raw text payload
pub fn classify_line(content: &str, ids: &mut IdGen) -> NodeData {
    if is_task_str(content)
        && let Some(task) = parse_task(content, ids)
    {
        return NodeData::Task(task);
    }
    if is_heading_str(content)
        && let Some(group) = parse_group(content)
    {
        return NodeData::Heading(group);
    }
    NodeData::Other(content.to_string())
}
