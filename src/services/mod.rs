pub mod builder;
pub mod mutations;
pub mod names;
pub mod optimistic;
