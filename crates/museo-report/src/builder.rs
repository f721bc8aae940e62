use crate::Result;
use crate::chart::{ChartImage, ChartKind, ChartSet};
use crate::narrative::{chart_description, stats_narrative, stats_rows};
use crate::pdf::text::{Font, text_ops, text_width};
use crate::pdf::{Flowable, ImageBlock, PageDecorator, PageGeometry, PdfComposer, Table};
use chrono::{Local, NaiveDate};
use lopdf::content::Operation;
use museo_core::analysis::{CountMap, summarize_counts};
use std::io::Cursor;
use std::marker::PhantomData;

pub const DEFAULT_TITLE: &str = "Harvard Art Museums Collection Report";
pub const DEFAULT_AUTHOR: &str = "Museo Analytics";

const HEADER_TITLE_SIZE: f32 = 14.0;
const FURNITURE_SIZE: f32 = 9.0;
const CHART_DISPLAY_WIDTH: f32 = 400.0;
const SECTION_GAP: f32 = 8.0;

/// Fixed information repeated on every page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMeta {
    pub title: String,
    pub author: String,
    pub generated: NaiveDate,
}

impl ReportMeta {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            generated: Local::now().date_naive(),
        }
    }
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_AUTHOR)
    }
}

/// Header: report title on the left, author and date on the right, and a rule below
pub fn header_ops(meta: &ReportMeta, geometry: &PageGeometry) -> Vec<Operation> {
    let top = geometry.height - 48.0;
    let left = geometry.margin_x;
    let right = geometry.width - geometry.margin_x;

    let mut ops = text_ops(&meta.title, Font::Bold, HEADER_TITLE_SIZE, left, top);

    let byline = format!("{} | {}", meta.author, meta.generated.format("%B %-d, %Y"));
    let byline_x = right - text_width(&byline, Font::Regular, FURNITURE_SIZE);
    ops.extend(text_ops(&byline, Font::Regular, FURNITURE_SIZE, byline_x, top));

    ops.extend(rule_ops(left, right, top - 10.0));
    ops
}

/// Footer: a rule and the running page number, centred
pub fn footer_ops(
    page_number: usize,
    page_count: usize,
    geometry: &PageGeometry,
) -> Vec<Operation> {
    let baseline = 40.0;
    let left = geometry.margin_x;
    let right = geometry.width - geometry.margin_x;

    let mut ops = rule_ops(left, right, baseline + 14.0);

    let label = format!("Page {} of {}", page_number, page_count);
    let x = (geometry.width - text_width(&label, Font::Regular, FURNITURE_SIZE)) / 2.0;
    ops.extend(text_ops(&label, Font::Regular, FURNITURE_SIZE, x, baseline));
    ops
}

fn rule_ops(left: f32, right: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("w", vec![0.75f32.into()]),
        Operation::new("G", vec![0.5f32.into()]),
        Operation::new("m", vec![left.into(), y.into()]),
        Operation::new("l", vec![right.into(), y.into()]),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]
}

struct ReportDecorator<'a> {
    meta: &'a ReportMeta,
}

impl PageDecorator for ReportDecorator<'_> {
    fn decorate(
        &self,
        page_number: usize,
        page_count: usize,
        geometry: &PageGeometry,
    ) -> Vec<Operation> {
        let mut ops = header_ops(self.meta, geometry);
        ops.extend(footer_ops(page_number, page_count, geometry));
        ops
    }
}

/// Builder states, in the only order a report can be assembled
pub struct HeaderSet;
pub struct PieSection;
pub struct BarSection;
pub struct LineSection;

/// Assembles the three report sections in a fixed order.
///
/// Each step consumes the builder, so a builder yields exactly one document.
pub struct ReportBuilder<S> {
    meta: ReportMeta,
    composer: PdfComposer,
    _state: PhantomData<S>,
}

impl<S> ReportBuilder<S> {
    fn advance<T>(self) -> ReportBuilder<T> {
        ReportBuilder {
            meta: self.meta,
            composer: self.composer,
            _state: PhantomData,
        }
    }

    fn section(
        mut self,
        title: &str,
        chart: &ChartImage,
        counts: &CountMap,
        columns: (&str, &str),
        subject: &str,
    ) -> Self {
        self.composer
            .extend(section_flowables(title, chart, counts, columns, subject));
        self
    }
}

impl ReportBuilder<HeaderSet> {
    /// Start a report; the generation date is fixed from here on
    pub fn new(meta: ReportMeta) -> Self {
        Self {
            meta,
            composer: PdfComposer::new(PageGeometry::a4()),
            _state: PhantomData,
        }
    }

    pub fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    pub fn pie_section(self, chart: &ChartImage, titles: &CountMap) -> ReportBuilder<PieSection> {
        self.section(
            "Title Distribution",
            chart,
            titles,
            ("Title", "Count"),
            "title",
        )
        .advance()
    }
}

impl ReportBuilder<PieSection> {
    pub fn bar_section(self, chart: &ChartImage, artists: &CountMap) -> ReportBuilder<BarSection> {
        self.section(
            "Artist Distribution",
            chart,
            artists,
            ("Artist", "Count"),
            "artist",
        )
        .advance()
    }
}

impl ReportBuilder<BarSection> {
    pub fn line_section(
        self,
        chart: &ChartImage,
        titles: &CountMap,
    ) -> ReportBuilder<LineSection> {
        self.section(
            "Title Frequency Trend",
            chart,
            titles,
            ("Title", "Count"),
            "title",
        )
        .advance()
    }
}

impl ReportBuilder<LineSection> {
    /// Lay out and serialize the document, returning it rewound to the start
    pub fn finalize(self) -> Result<Cursor<Vec<u8>>> {
        let decorator = ReportDecorator { meta: &self.meta };
        let bytes = self.composer.render(&decorator)?;
        Ok(Cursor::new(bytes))
    }
}

/// Flowables for one chart section, in their fixed order
pub fn section_flowables(
    title: &str,
    chart: &ChartImage,
    counts: &CountMap,
    columns: (&str, &str),
    subject: &str,
) -> Vec<Flowable> {
    let summary = summarize_counts(counts);

    let count_table = Table::new(columns.0, columns.1).with_rows(
        counts
            .display_entries()
            .into_iter()
            .map(|(label, count)| (label, count.to_string())),
    );
    let stats_table = Table::new("Statistic", "Value").with_rows(stats_rows(&summary));

    vec![
        Flowable::Heading(title.to_string()),
        Flowable::Image(ImageBlock {
            width: chart.width,
            height: chart.height,
            rgb: chart.rgb.clone(),
            display_width: CHART_DISPLAY_WIDTH,
        }),
        Flowable::Paragraph(chart_description(chart.kind).to_string()),
        Flowable::Table(count_table),
        Flowable::Spacer(SECTION_GAP),
        Flowable::Heading("Statistical Insights".to_string()),
        Flowable::Paragraph(stats_narrative(subject, &summary).join(" ")),
        Flowable::Table(stats_table),
        Flowable::PageBreak,
    ]
}

/// Build the complete PDF report from rendered charts and the two count maps
pub fn build_report(
    charts: &ChartSet,
    titles: &CountMap,
    artists: &CountMap,
    meta: ReportMeta,
) -> Result<Cursor<Vec<u8>>> {
    tracing::debug!(
        "Building report with {} titles and {} artists",
        titles.len(),
        artists.len()
    );

    debug_assert_eq!(charts.pie.kind, ChartKind::Pie);
    debug_assert_eq!(charts.bar.kind, ChartKind::Bar);
    debug_assert_eq!(charts.line.kind, ChartKind::Line);

    ReportBuilder::new(meta)
        .pie_section(&charts.pie, titles)
        .bar_section(&charts.bar, artists)
        .line_section(&charts.line, titles)
        .finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReportMeta {
        ReportMeta {
            title: DEFAULT_TITLE.to_string(),
            author: "Tester".to_string(),
            generated: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        }
    }

    fn text_of(ops: &[Operation]) -> Vec<Vec<u8>> {
        ops.iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect()
    }

    #[test]
    fn test_header_has_title_author_and_date() {
        let texts = text_of(&header_ops(&meta(), &PageGeometry::a4()));
        assert_eq!(texts[0], DEFAULT_TITLE.as_bytes());
        assert_eq!(texts[1], b"Tester | March 9, 2024");
    }

    #[test]
    fn test_footer_numbers_pages() {
        let texts = text_of(&footer_ops(2, 5, &PageGeometry::a4()));
        assert_eq!(texts, vec![b"Page 2 of 5".to_vec()]);
    }

    #[test]
    fn test_section_order() {
        let chart = ChartImage {
            kind: ChartKind::Pie,
            width: 2,
            height: 2,
            rgb: vec![255; 12],
        };
        let counts: CountMap = ["[Sunset]", "Vase", "Vase"].into_iter().collect();

        let flowables = section_flowables(
            "Title Distribution",
            &chart,
            &counts,
            ("Title", "Count"),
            "title",
        );

        assert!(matches!(&flowables[0], Flowable::Heading(t) if t == "Title Distribution"));
        assert!(matches!(flowables[1], Flowable::Image(_)));
        assert!(matches!(flowables[2], Flowable::Paragraph(_)));
        match &flowables[3] {
            Flowable::Table(table) => {
                assert_eq!(table.rows[0], ("Sunset".to_string(), "1".to_string()));
                assert_eq!(table.rows[1], ("Vase".to_string(), "2".to_string()));
            }
            other => panic!("expected count table, got {:?}", other),
        }
        assert!(matches!(&flowables[5], Flowable::Heading(t) if t == "Statistical Insights"));
        assert!(matches!(flowables[6], Flowable::Paragraph(_)));
        match &flowables[7] {
            Flowable::Table(table) => assert_eq!(table.rows.len(), 8),
            other => panic!("expected stats table, got {:?}", other),
        }
        assert!(matches!(flowables.last(), Some(Flowable::PageBreak)));
    }
}
