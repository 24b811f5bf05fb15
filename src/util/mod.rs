pub mod flat;
pub mod move_line;
pub mod text;

pub use flat::{FlatItem, flat};
pub use move_line::{LineMove, move_line};
