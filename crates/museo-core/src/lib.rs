pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod sink;

pub use error::{Error, Result};
