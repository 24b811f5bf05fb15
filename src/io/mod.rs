pub mod config_io;
pub mod list_io;
pub mod state_io;

pub use config_io::{ConfigError, config_path, read_config, update_config};
pub use list_io::{ListError, read_list, write_list};
pub use state_io::{read_state, state_path, write_state};
