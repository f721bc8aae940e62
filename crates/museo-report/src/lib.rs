// Chart rendering and PDF report assembly

pub mod builder;
pub mod chart;
pub mod error;
pub mod narrative;
pub mod pdf;

pub use builder::{ReportBuilder, ReportMeta, build_report};
pub use chart::{
    BitmapChartRenderer, ChartImage, ChartKind, ChartRenderer, ChartSet, ChartStyle, render_charts,
};
pub use error::{Error, Result};
