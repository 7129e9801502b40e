pub mod entry;
pub mod rows;
