mod client;
mod reader;
mod types;

pub use client::{CatalogClient, CatalogSource};
pub use reader::FileCatalog;
pub use types::*;
