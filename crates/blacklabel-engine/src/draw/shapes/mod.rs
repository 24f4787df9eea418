pub mod rect;
pub mod text;
