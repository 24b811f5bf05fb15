pub mod heading_line;
pub mod md_parser;
pub mod md_serializer;
pub mod suffix;
pub mod task_line;

pub use heading_line::{is_heading_str, parse_group};
pub use md_parser::{INDENT_WIDTH, depth_to_indent, indent_depth, parse_md, parse_md_with};
pub use md_serializer::{node_to_string, node_to_string_with};
pub use task_line::{is_task_str, parse_task};
