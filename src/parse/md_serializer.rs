use crate::model::node::{NodeData, Tree};
use crate::parse::heading_line::group_to_line;
use crate::parse::md_parser::{INDENT_WIDTH, depth_to_indent};
use crate::parse::task_line::task_to_line;
use crate::util::flat::flat;

/// Serialize a list tree back to markdown using the default indent width
pub fn node_to_string(tree: &Tree) -> String {
    node_to_string_with(tree, INDENT_WIDTH)
}

/// Serialize a list tree. Indentation comes from tree depth, never from
/// the source whitespace.
pub fn node_to_string_with(tree: &Tree, indent_width: usize) -> String {
    flat(tree)
        .iter()
        .filter_map(|item| {
            let node = tree.node(item.index)?;
            Some(format!(
                "{}{}",
                depth_to_indent(item.depth, indent_width),
                node_line(&node.data)
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single node's text without indentation
pub fn node_line(data: &NodeData) -> String {
    match data {
        NodeData::Root => String::new(),
        NodeData::Task(task) => task_to_line(task),
        NodeData::Heading(group) => group_to_line(group),
        NodeData::Other(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::IdGen;
    use crate::parse::md_parser::{parse_md, parse_md_with};
    use pretty_assertions::assert_eq;

    fn round_trip(text: &str) -> String {
        node_to_string(&parse_md(text, &mut IdGen::new()))
    }

    #[test]
    fn test_round_trip_nested() {
        let text = "# heading1\n  - [ ] child\n    - [x] grandchild\n    ## heading2\n      some text\n      - [ ] task";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_round_trip_blank_and_trailing_newline() {
        let text = "## Today\n\n- [ ] a ~1h #work\n  \n- [x] b\n";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_round_trip_odd_indentation() {
        let text = "- [ ] a\n   three spaces\n        way too deep\n  - [ ] back";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_round_trip_empty() {
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_root_only_tree_is_empty_string() {
        let tree = crate::model::node::Tree::new(&mut IdGen::new());
        assert_eq!(node_to_string(&tree), "");
    }

    #[test]
    fn test_indent_comes_from_depth() {
        let text = "- [ ] a\n    - [ ] b";
        let tree = parse_md_with(text, 4, &mut IdGen::new());
        assert_eq!(node_to_string_with(&tree, 2), "- [ ] a\n  - [ ] b");
    }
}
