//! Minimal flowable page composer on top of `lopdf`.
//!
//! Content is appended as a flat list of [`Flowable`]s, laid out top to
//! bottom across as many pages as needed, then written out as a PDF with
//! per-page decorations (header, footer) supplied by the caller.

mod layout;
mod table;
pub mod text;
mod writer;

pub use table::Table;

use crate::Result;
use lopdf::content::Operation;

/// One unit of appendable report content
#[derive(Debug, Clone)]
pub enum Flowable {
    Heading(String),
    Paragraph(String),
    Image(ImageBlock),
    Table(Table),
    Spacer(f32),
    /// Following content starts on a fresh page
    PageBreak,
}

/// Raw 8-bit RGB pixels to place on the page
#[derive(Debug, Clone)]
pub struct ImageBlock {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    /// Width on the page in points; clamped to the content width
    pub display_width: f32,
}

/// Page size and the box content is laid out in, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub content_top: f32,
    pub content_bottom: f32,
}

impl PageGeometry {
    /// A4 portrait with room above and below the content for header and footer
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin_x: 56.0,
            content_top: 842.0 - 96.0,
            content_bottom: 72.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Draws the fixed furniture (headers, footers) onto each finished page.
pub trait PageDecorator {
    fn decorate(&self, page_number: usize, page_count: usize, geometry: &PageGeometry)
    -> Vec<Operation>;
}

/// Collects flowables and renders them into a PDF byte buffer.
pub struct PdfComposer {
    geometry: PageGeometry,
    flowables: Vec<Flowable>,
}

impl PdfComposer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            flowables: Vec::new(),
        }
    }

    pub fn push(&mut self, flowable: Flowable) {
        self.flowables.push(flowable);
    }

    pub fn extend(&mut self, flowables: impl IntoIterator<Item = Flowable>) {
        self.flowables.extend(flowables);
    }

    pub fn flowables(&self) -> &[Flowable] {
        &self.flowables
    }

    /// Lay out every flowable and serialize the document
    pub fn render(self, decorator: &dyn PageDecorator) -> Result<Vec<u8>> {
        tracing::debug!("Laying out {} flowables", self.flowables.len());

        let (pages, images) = layout::lay_out(&self.geometry, self.flowables);
        let page_count = pages.len();

        let decorated: Vec<Vec<Operation>> = pages
            .into_iter()
            .enumerate()
            .map(|(idx, page)| {
                let mut ops = page.operations;
                ops.extend(decorator.decorate(idx + 1, page_count, &self.geometry));
                ops
            })
            .collect();

        let bytes = writer::write_document(&self.geometry, decorated, &images)?;

        tracing::info!(
            "Rendered PDF with {} pages ({} bytes)",
            page_count,
            bytes.len()
        );

        Ok(bytes)
    }
}
