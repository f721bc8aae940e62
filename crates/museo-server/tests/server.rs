use museo_core::catalog::FileCatalog;
use museo_core::sink::JsonFileSink;
use museo_server::{CatalogServer, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

struct Running {
    addr: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<museo_server::Result<()>>,
}

async fn spawn_server(server: CatalogServer) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let task = tokio::spawn(server.serve(listener, async move {
        let _ = stopped.await;
    }));

    Running { addr, stop, task }
}

/// Send one raw HTTP/1.1 request and return the full response as bytes
async fn request(addr: std::net::SocketAddr, method: &str, path: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        method, path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

fn split_response(response: &[u8]) -> (String, &[u8]) {
    let end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header block");
    let head = String::from_utf8_lossy(&response[..end]).to_lowercase();
    (head, &response[end + 4..])
}

fn sample_server(config: ServerConfig) -> CatalogServer {
    CatalogServer::new(
        config,
        Arc::new(FileCatalog::new(fixture_path("catalog-sample.json"))),
    )
}

#[tokio::test]
async fn test_data_endpoint_over_http() {
    // Arrange
    let running = spawn_server(sample_server(ServerConfig::default())).await;

    // Act
    let response = request(running.addr, "GET", "/api/data").await;
    let (head, body) = split_response(&response);

    // Assert
    assert!(head.starts_with("http/1.1 200"));
    assert!(head.contains("content-type: application/json"));

    let records: serde_json::Value = serde_json::from_slice(body).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "Sunset over the Harbor");
    assert_eq!(records[1]["artist_name"], "Unknown Artist");

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_report_endpoint_over_http() {
    let config = ServerConfig {
        cache_ttl: Duration::ZERO,
        ..ServerConfig::default()
    };
    let running = spawn_server(sample_server(config)).await;

    let response = request(running.addr, "GET", "/api/report").await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("http/1.1 200"));
    assert!(head.contains("content-type: application/pdf"));
    assert!(head.contains("content-disposition: attachment; filename=\"art_report.pdf\""));
    assert!(body.starts_with(b"%PDF"));

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_catalog_file_is_500() {
    let server = CatalogServer::new(
        ServerConfig::default(),
        Arc::new(FileCatalog::new(fixture_path("does-not-exist.json"))),
    );
    let running = spawn_server(server).await;

    let response = request(running.addr, "GET", "/api/data").await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("http/1.1 500"));
    let error: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("could not read catalog file"));

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let running = spawn_server(sample_server(ServerConfig::default())).await;

    let (head, body) = {
        let response = request(running.addr, "GET", "/").await;
        let (head, body) = split_response(&response);
        (head, body.to_vec())
    };
    assert!(head.starts_with("http/1.1 404"));
    assert_eq!(body, br#"{"error":"not found"}"#);

    let response = request(running.addr, "DELETE", "/api/data").await;
    let (head, _) = split_response(&response);
    assert!(head.starts_with("http/1.1 405"));

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_snapshot_written_on_fetch() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("nested").join("last_batch.json");
    let server = sample_server(ServerConfig::default())
        .with_sink(Arc::new(JsonFileSink::new(&snapshot)));
    let running = spawn_server(server).await;

    let response = request(running.addr, "GET", "/api/data").await;
    assert!(response.starts_with(b"HTTP/1.1 200"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}
