pub mod carry;
pub mod side_tables;
pub mod tracking_ops;
pub mod tree_ops;

pub use side_tables::SideTables;
pub use tracking_ops::TrackingError;
pub use tree_ops::{Edit, TreeError};
