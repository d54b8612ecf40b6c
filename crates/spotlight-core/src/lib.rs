pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod rotation;
pub mod store;
pub mod types;

pub use error::{Result, SpotlightError};
