use crate::SourceOptions;
use anyhow::Result;
use museo_server::{CatalogServer, ServerConfig, SharedSource};
use std::net::IpAddr;
use std::time::Duration;

pub fn execute(options: &SourceOptions, host: IpAddr, port: u16, cache_ttl: u64) -> Result<()> {
    tracing::info!("Starting museo server on {}:{}", host, port);

    let source: SharedSource = options.open()?.into();
    let config = ServerConfig {
        host,
        port,
        cache_ttl: Duration::from_secs(cache_ttl),
    };

    println!("📚 Serving records from {}", options.describe());
    println!();

    let server = CatalogServer::new(config, source.clone());

    // Run the server (this blocks until Ctrl+C)
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { server.start().await })?;

    // The HTTP client must be released outside the async runtime
    drop(runtime);
    drop(source);

    Ok(())
}
