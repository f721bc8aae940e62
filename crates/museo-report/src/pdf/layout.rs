use super::table::{ROW_HEIGHT, row_ops};
use super::text::{Font, text_ops, wrap};
use super::{Flowable, ImageBlock, PageGeometry, Table};
use lopdf::content::Operation;

const HEADING_SIZE: f32 = 16.0;
const HEADING_LEADING: f32 = 26.0;
const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 15.0;
const BLOCK_GAP: f32 = 10.0;

/// Content of one laid-out page, before decoration
#[derive(Debug, Default)]
pub(crate) struct PageContent {
    pub operations: Vec<Operation>,
}

/// Name under which image `idx` is registered in the page resources
pub(crate) fn image_name(idx: usize) -> String {
    format!("Im{}", idx + 1)
}

struct Cursor<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<PageContent>,
    y: f32,
    break_pending: bool,
}

impl<'a> Cursor<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            y: geometry.content_top,
            break_pending: true,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageContent::default());
        self.y = self.geometry.content_top;
        self.break_pending = false;
    }

    fn page_is_empty(&self) -> bool {
        self.y >= self.geometry.content_top
    }

    /// Make room for `height` points, moving to a new page when the current
    /// one is full. A block taller than a page is placed on its own page.
    fn reserve(&mut self, height: f32) {
        if self.break_pending || self.pages.is_empty() {
            self.new_page();
        }
        if self.y - height < self.geometry.content_bottom && !self.page_is_empty() {
            self.new_page();
        }
    }

    fn emit(&mut self, ops: impl IntoIterator<Item = Operation>) {
        if let Some(page) = self.pages.last_mut() {
            page.operations.extend(ops);
        }
    }

    fn heading(&mut self, text: &str) {
        // Keep a heading together with at least a line of what follows it
        self.reserve(HEADING_LEADING + BODY_LEADING);
        let baseline = self.y - HEADING_SIZE;
        let ops = text_ops(text, Font::Bold, HEADING_SIZE, self.geometry.margin_x, baseline);
        self.emit(ops);
        self.y -= HEADING_LEADING;
    }

    fn paragraph(&mut self, text: &str) {
        let lines = wrap(text, Font::Regular, BODY_SIZE, self.geometry.content_width());
        for line in lines {
            self.reserve(BODY_LEADING);
            let baseline = self.y - BODY_SIZE;
            let ops = text_ops(&line, Font::Regular, BODY_SIZE, self.geometry.margin_x, baseline);
            self.emit(ops);
            self.y -= BODY_LEADING;
        }
        self.gap();
    }

    fn image(&mut self, image: &ImageBlock, idx: usize) {
        let max_height = self.geometry.content_top - self.geometry.content_bottom;
        let mut width = image.display_width.min(self.geometry.content_width());
        let mut height = width * image.height as f32 / image.width.max(1) as f32;
        if height > max_height {
            width *= max_height / height;
            height = max_height;
        }

        self.reserve(height);
        let x = self.geometry.margin_x + (self.geometry.content_width() - width) / 2.0;
        let y = self.y - height;
        self.emit([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![image_name(idx).as_str().into()]),
            Operation::new("Q", vec![]),
        ]);
        self.y -= height;
        self.gap();
    }

    fn table(&mut self, table: &Table) {
        let x = self.geometry.margin_x;
        let width = self.geometry.content_width();

        self.reserve(2.0 * ROW_HEIGHT);
        let header = row_ops(&table.header.0, &table.header.1, x, self.y, width, true);
        self.emit(header);
        self.y -= ROW_HEIGHT;

        for (label, value) in &table.rows {
            let before = self.pages.len();
            self.reserve(ROW_HEIGHT);
            if self.pages.len() != before {
                // Continued on a new page: repeat the header row
                let header = row_ops(&table.header.0, &table.header.1, x, self.y, width, true);
                self.emit(header);
                self.y -= ROW_HEIGHT;
            }
            let row = row_ops(label, value, x, self.y, width, false);
            self.emit(row);
            self.y -= ROW_HEIGHT;
        }
        self.gap();
    }

    fn spacer(&mut self, height: f32) {
        if self.y - height < self.geometry.content_bottom {
            self.break_pending = true;
        } else {
            self.y -= height;
        }
    }

    fn gap(&mut self) {
        self.y = (self.y - BLOCK_GAP).max(self.geometry.content_bottom);
    }
}

/// Place flowables onto pages.
///
/// Returns the page contents plus the images referenced from them, where
/// image `i` is drawn under [`image_name`]`(i)`. A trailing page break does
/// not produce an empty page, but a document always has at least one page.
pub(crate) fn lay_out(
    geometry: &PageGeometry,
    flowables: Vec<Flowable>,
) -> (Vec<PageContent>, Vec<ImageBlock>) {
    let mut cursor = Cursor::new(geometry);
    let mut images = Vec::new();

    for flowable in flowables {
        match flowable {
            Flowable::Heading(text) => cursor.heading(&text),
            Flowable::Paragraph(text) => cursor.paragraph(&text),
            Flowable::Image(image) => {
                cursor.image(&image, images.len());
                images.push(image);
            }
            Flowable::Table(table) => cursor.table(&table),
            Flowable::Spacer(height) => cursor.spacer(height),
            Flowable::PageBreak => cursor.break_pending = true,
        }
    }

    if cursor.pages.is_empty() {
        cursor.new_page();
    }

    (cursor.pages, images)
}
