use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Configuration from tickmark.toml. A missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub carry: CarryConfig,
    #[serde(default)]
    pub tags: TagConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Spaces per nesting level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// List file used when `-f` is not given
    #[serde(default = "default_list_file")]
    pub default_file: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            indent_width: default_indent_width(),
            default_file: default_list_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Side-table file, relative to the list file's directory
    #[serde(default = "default_state_file")]
    pub file: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig {
            file: default_state_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarryConfig {
    #[serde(default = "default_true")]
    pub drop_completed: bool,
    /// Clear actual times on carried tasks
    #[serde(default)]
    pub reset_times: bool,
}

impl Default for CarryConfig {
    fn default() -> Self {
        CarryConfig {
            drop_completed: true,
            reset_times: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagConfig {
    /// Tag name → display color, in file order
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl Config {
    /// Indent width, never zero
    pub fn indent_width(&self) -> usize {
        if self.list.indent_width == 0 {
            default_indent_width()
        } else {
            self.list.indent_width
        }
    }

    pub fn tag_color(&self, name: &str) -> Option<&str> {
        self.tags.colors.get(name).map(String::as_str)
    }

    /// Fill in configured colors on a set of tags
    pub fn colorize(&self, tags: &mut [Tag]) {
        for tag in tags {
            tag.color = self.tag_color(&tag.name).map(str::to_string);
        }
    }
}

fn default_indent_width() -> usize {
    2
}

fn default_list_file() -> String {
    "tasks.md".to_string()
}

fn default_state_file() -> String {
    ".tickmark-state.json".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.indent_width(), 2);
        assert_eq!(config.list.default_file, "tasks.md");
        assert_eq!(config.state.file, ".tickmark-state.json");
        assert!(config.carry.drop_completed);
        assert!(!config.carry.reset_times);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"[list]
indent_width = 4

[tags.colors]
work = "blue"
home = "green"
"#,
        )
        .unwrap();
        assert_eq!(config.indent_width(), 4);
        assert_eq!(config.list.default_file, "tasks.md");
        let names: Vec<&String> = config.tags.colors.keys().collect();
        assert_eq!(names, vec!["work", "home"]);
    }

    #[test]
    fn test_zero_indent_falls_back() {
        let config: Config = toml::from_str("[list]\nindent_width = 0\n").unwrap();
        assert_eq!(config.indent_width(), 2);
    }

    #[test]
    fn test_colorize() {
        let config: Config = toml::from_str("[tags.colors]\nwork = \"blue\"\n").unwrap();
        let mut tags = vec![Tag::new("work"), Tag::new("misc")];
        config.colorize(&mut tags);
        assert_eq!(tags[0].color.as_deref(), Some("blue"));
        assert_eq!(tags[1].color, None);
    }
}
