// HTTP surface for catalog data and reports

pub mod cache;
pub mod error;
pub mod handler;
pub mod server;

pub use cache::TtlCache;
pub use error::{Error, Result};
pub use handler::{AppState, Rendered, SharedSink, SharedSource};
pub use server::{CatalogServer, ServerConfig};
