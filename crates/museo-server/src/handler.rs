use crate::cache::TtlCache;
use crate::{Error, Result};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderValue, Method, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use mime::Mime;
use museo_core::catalog::CatalogSource;
use museo_core::pipeline::Pipeline;
use museo_core::sink::BatchSink;
use museo_report::{BitmapChartRenderer, ReportMeta, build_report, render_charts};
use std::sync::Arc;
use std::time::Duration;

pub const DATA_PATH: &str = "/api/data";
pub const REPORT_PATH: &str = "/api/report";
pub const REPORT_FILENAME: &str = "art_report.pdf";

pub type SharedSource = Arc<dyn CatalogSource + Send + Sync>;
pub type SharedSink = Arc<dyn BatchSink + Send + Sync>;

type RenderFn = fn(&dyn CatalogSource, Option<&dyn BatchSink>) -> Result<Rendered>;

/// A finished response body plus its content type, as stored in the cache
#[derive(Debug, Clone)]
pub struct Rendered {
    pub content_type: Mime,
    pub body: Bytes,
}

/// Everything a request needs; cheap to clone per connection.
#[derive(Clone)]
pub struct AppState {
    source: SharedSource,
    sink: Option<SharedSink>,
    cache: Arc<TtlCache<Rendered>>,
}

impl AppState {
    pub fn new(source: SharedSource, cache_ttl: Duration) -> Self {
        Self {
            source,
            sink: None,
            cache: Arc::new(TtlCache::new(cache_ttl)),
        }
    }

    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn cache(&self) -> &TtlCache<Rendered> {
        &self.cache
    }
}

/// Normalized records as a JSON array
pub fn render_data(source: &dyn CatalogSource, sink: Option<&dyn BatchSink>) -> Result<Rendered> {
    let mut pipeline = Pipeline::new(source);
    if let Some(sink) = sink {
        pipeline = pipeline.with_sink(sink);
    }

    let batch = pipeline.run()?;
    let body = serde_json::to_vec(batch.records())?;

    Ok(Rendered {
        content_type: mime::APPLICATION_JSON,
        body: Bytes::from(body),
    })
}

/// The full PDF report for one fresh batch
pub fn render_report(source: &dyn CatalogSource, sink: Option<&dyn BatchSink>) -> Result<Rendered> {
    let mut pipeline = Pipeline::new(source);
    if let Some(sink) = sink {
        pipeline = pipeline.with_sink(sink);
    }

    let (_, analysis) = pipeline.analyze()?;
    let charts = render_charts(&BitmapChartRenderer, &analysis.frequencies)?;
    let cursor = build_report(
        &charts,
        &analysis.frequencies.titles,
        &analysis.frequencies.artists,
        ReportMeta::default(),
    )?;

    Ok(Rendered {
        content_type: mime::APPLICATION_PDF,
        body: Bytes::from(cursor.into_inner()),
    })
}

/// Run a blocking renderer on the blocking pool, going through the cache
async fn cached_render(
    state: &AppState,
    path: &'static str,
    render: RenderFn,
) -> Result<Rendered> {
    state
        .cache
        .get_or_try_insert(path, || {
            let source = Arc::clone(&state.source);
            let sink = state.sink.clone();
            async move {
                tokio::task::spawn_blocking(move || {
                    let sink = sink.as_deref().map(|s| s as &dyn BatchSink);
                    render(source.as_ref(), sink)
                })
                .await
                .map_err(|e| Error::Server(format!("Render task failed: {}", e)))?
            }
        })
        .await
}

fn json_error(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    if let Ok(value) = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}

fn ok_response(rendered: Rendered, attachment: Option<&str>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, rendered.content_type.as_ref());
    if let Some(filename) = attachment {
        builder = builder.header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    match builder.body(Full::new(rendered.body)) {
        Ok(response) => response,
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// Dispatch one request to its route.
///
/// Every outcome is a response: pipeline failures become a 500 with a
/// JSON `error` body.
pub async fn route(state: &AppState, method: &Method, path: &str) -> Response<Full<Bytes>> {
    let (key, render, attachment): (&'static str, RenderFn, Option<&str>) = match path {
        DATA_PATH => (DATA_PATH, render_data, None),
        REPORT_PATH => (REPORT_PATH, render_report, Some(REPORT_FILENAME)),
        _ => {
            tracing::debug!("No route for {} {}", method, path);
            return json_error(StatusCode::NOT_FOUND, "not found");
        }
    };

    if method != Method::GET {
        return json_error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    }

    match cached_render(state, key, render).await {
        Ok(rendered) => {
            tracing::info!("{} {} -> 200 ({} bytes)", method, path, rendered.body.len());
            ok_response(rendered, attachment)
        }
        Err(e) => {
            tracing::error!("{} {} failed: {}", method, path, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}
