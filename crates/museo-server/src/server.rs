use crate::Result;
use crate::handler::{AppState, SharedSink, SharedSource, route};
use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;

/// Listening address and cache lifetime for the HTTP surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// HTTP/1 server exposing `/api/data` and `/api/report`
pub struct CatalogServer {
    config: ServerConfig,
    state: AppState,
}

impl CatalogServer {
    pub fn new(config: ServerConfig, source: SharedSource) -> Self {
        let state = AppState::new(source, config.cache_ttl);
        Self { config, state }
    }

    /// Also write each freshly fetched batch to `sink`
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.state = self.state.with_sink(sink);
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.addr()).await?;
        let addr = listener.local_addr()?;

        tracing::info!("✓ Server listening on http://{}", addr);
        println!("✓ Server listening on http://{}", addr);
        println!();
        println!("  Records: http://{}/api/data", addr);
        println!("  Report:  http://{}/api/report", addr);
        println!();
        println!("Press Ctrl+C to stop...");

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, shutting down...");
        };

        self.serve(listener, shutdown).await?;

        println!("✅ Server stopped gracefully");
        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };
                    tracing::debug!("Accepted connection from {}", peer);

                    let state = self.state.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            let state = state.clone();
                            async move {
                                Ok::<_, Infallible>(
                                    route(&state, req.method(), req.uri().path()).await,
                                )
                            }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!("Connection from {} ended with error: {}", peer, e);
                        }
                    });
                }
                _ = &mut shutdown => break,
            }
        }

        Ok(())
    }
}
