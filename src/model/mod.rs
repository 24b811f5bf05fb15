pub mod config;
pub mod group;
pub mod node;
pub mod tag;
pub mod task;
pub mod time;
pub mod tracking;

pub use config::*;
pub use group::*;
pub use node::*;
pub use tag::*;
pub use task::*;
pub use time::*;
pub use tracking::*;
