pub mod page;
pub mod rotation;
pub mod schedule;
