use crate::{Error, Result};
use museo_core::analysis::{CountMap, Frequencies};
use plotters::prelude::*;
use plotters::style::register_font;
use std::sync::OnceLock;

/// Font family every chart label is drawn with
const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Make the embedded font available to plotters; registration happens once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    let ok = *REGISTERED.get_or_init(|| {
        let ok = register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok();
        if !ok {
            tracing::warn!("Embedded chart font could not be parsed");
        }
        ok
    });

    if ok {
        Ok(())
    } else {
        Err(Error::Chart("embedded chart font is invalid".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        }
    }
}

/// Presentation options for one chart
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub color: RGBColor,
    /// Cap on how many labels are plotted; `None` plots them all
    pub max_items: Option<usize>,
    /// Dataset caption drawn above the chart
    pub caption: String,
    /// What one category on the x axis (or one legend entry) stands for
    pub category: String,
}

impl ChartStyle {
    /// The fixed presentation used for each chart kind in the report
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Pie => Self {
                width: 480,
                height: 360,
                color: RGBColor(75, 192, 192),
                max_items: None,
                caption: "Number of Objects by Title".to_string(),
                category: "Title".to_string(),
            },
            ChartKind::Bar => Self {
                width: 480,
                height: 320,
                color: RGBColor(54, 162, 235),
                max_items: Some(15),
                caption: "Number of Objects by Artist".to_string(),
                category: "Artist".to_string(),
            },
            ChartKind::Line => Self {
                width: 480,
                height: 320,
                color: RGBColor(153, 102, 255),
                max_items: None,
                caption: "Title Frequency".to_string(),
                category: "Title".to_string(),
            },
        }
    }
}

/// A rendered chart: tightly packed 8-bit RGB pixels, row-major
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Turns label counts into a chart image.
pub trait ChartRenderer {
    fn render(&self, kind: ChartKind, counts: &CountMap, style: &ChartStyle) -> Result<ChartImage>;
}

/// The three charts that go into a report
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub pie: ChartImage,
    pub bar: ChartImage,
    pub line: ChartImage,
}

/// Render the report charts: titles as pie and line, artists as bar.
pub fn render_charts(renderer: &dyn ChartRenderer, frequencies: &Frequencies) -> Result<ChartSet> {
    Ok(ChartSet {
        pie: renderer.render(
            ChartKind::Pie,
            &frequencies.titles,
            &ChartStyle::for_kind(ChartKind::Pie),
        )?,
        bar: renderer.render(
            ChartKind::Bar,
            &frequencies.artists,
            &ChartStyle::for_kind(ChartKind::Bar),
        )?,
        line: renderer.render(
            ChartKind::Line,
            &frequencies.titles,
            &ChartStyle::for_kind(ChartKind::Line),
        )?,
    })
}

/// Renders charts into in-memory bitmaps with plotters.
///
/// Text is drawn with a font embedded in the binary, so rendering never
/// depends on fonts installed on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapChartRenderer;

/// Slice colours for the pie chart, cycled when there are more labels
const PALETTE: [RGBColor; 10] = [
    RGBColor(255, 99, 132),
    RGBColor(54, 162, 235),
    RGBColor(255, 206, 86),
    RGBColor(75, 192, 192),
    RGBColor(153, 102, 255),
    RGBColor(255, 159, 64),
    RGBColor(199, 199, 199),
    RGBColor(83, 102, 255),
    RGBColor(40, 159, 64),
    RGBColor(210, 99, 132),
];

const CAPTION_SIZE: i32 = 16;
const LABEL_SIZE: i32 = 11;
const LEGEND_ROW: i32 = 16;
/// Longest category label printed under an axis or in the legend
const MAX_LABEL_CHARS: usize = 14;

fn chart_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}

/// Shorten `label` to `max` characters, marking the cut with an ellipsis
fn short_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let mut short: String = label.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

impl ChartRenderer for BitmapChartRenderer {
    fn render(&self, kind: ChartKind, counts: &CountMap, style: &ChartStyle) -> Result<ChartImage> {
        tracing::debug!(
            "Rendering {} chart for {} labels ({}x{})",
            kind.as_str(),
            counts.len(),
            style.width,
            style.height
        );
        ensure_font()?;

        let mut entries = match kind {
            ChartKind::Pie | ChartKind::Bar => counts.sorted_by_count(),
            ChartKind::Line => counts.sorted_by_label(),
        };
        if let Some(max) = style.max_items {
            entries.truncate(max);
        }

        let mut rgb = vec![0u8; (style.width * style.height * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut rgb, (style.width, style.height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            match kind {
                ChartKind::Pie => draw_pie(&root, &entries, style)?,
                ChartKind::Bar => draw_bars(&root, &entries, style)?,
                ChartKind::Line => draw_line(&root, &entries, style)?,
            }

            root.present().map_err(chart_error)?;
        }

        Ok(ChartImage {
            kind,
            width: style.width,
            height: style.height,
            rgb,
        })
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

/// Pie on the left, legend on the right, caption across the top
fn draw_pie(root: &Area<'_>, entries: &[(String, usize)], style: &ChartStyle) -> Result<()> {
    let area = root
        .titled(&style.caption, (FONT_FAMILY, CAPTION_SIZE))
        .map_err(chart_error)?;
    let (width, _) = area.dim_in_pixel();
    let (plot, legend) = area.split_horizontally((width as f64 * 0.6) as i32);

    let (plot_width, plot_height) = plot.dim_in_pixel();
    let center = (plot_width as i32 / 2, plot_height as i32 / 2);
    let radius = (plot_width.min(plot_height) as f64 / 2.0) - 12.0;
    let total: usize = entries.iter().map(|(_, count)| count).sum();

    if total == 0 {
        plot.draw(&Circle::new(center, radius as i32, RGBColor(220, 220, 220).filled()))
            .map_err(chart_error)?;
        legend
            .draw(&Text::new(
                "No records",
                (4, 4),
                (FONT_FAMILY, LABEL_SIZE).into_font(),
            ))
            .map_err(chart_error)?;
        return Ok(());
    }

    let sizes: Vec<f64> = entries.iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> = (0..entries.len())
        .map(|idx| PALETTE[idx % PALETTE.len()])
        .collect();
    // Slice text would overlap on busy charts; the legend names every slice
    let slice_labels = vec![""; entries.len()];

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &slice_labels);
    pie.start_angle(-90.0);
    plot.draw(&pie).map_err(chart_error)?;

    draw_legend(&legend, entries, &colors)
}

/// One swatch and "label (count)" per row, with a "+N more" row when the area runs out
fn draw_legend(area: &Area<'_>, entries: &[(String, usize)], colors: &[RGBColor]) -> Result<()> {
    let (_, height) = area.dim_in_pixel();
    let capacity = ((height as i32 - 8) / LEGEND_ROW).max(1) as usize;
    let shown = if entries.len() > capacity {
        capacity - 1
    } else {
        entries.len()
    };

    for (idx, (label, count)) in entries.iter().take(shown).enumerate() {
        let y = 4 + idx as i32 * LEGEND_ROW;
        area.draw(&Rectangle::new([(4, y + 1), (14, y + 11)], colors[idx].filled()))
            .map_err(chart_error)?;
        area.draw(&Text::new(
            format!("{} ({})", short_label(label, MAX_LABEL_CHARS), count),
            (20, y),
            (FONT_FAMILY, LABEL_SIZE).into_font(),
        ))
        .map_err(chart_error)?;
    }

    if shown < entries.len() {
        let y = 4 + shown as i32 * LEGEND_ROW;
        area.draw(&Text::new(
            format!("+{} more", entries.len() - shown),
            (20, y),
            (FONT_FAMILY, LABEL_SIZE).into_font(),
        ))
        .map_err(chart_error)?;
    }

    Ok(())
}

/// Upper end of the count axis, leaving headroom above the tallest point
fn value_axis_max(entries: &[(String, usize)]) -> usize {
    entries.iter().map(|(_, count)| *count).max().unwrap_or(0) + 1
}

/// Last category index on the x axis; a segmented range always spans at least two segments
fn category_axis_end(entries: &[(String, usize)]) -> usize {
    entries.len().saturating_sub(1).max(1)
}

/// Characters a category label may use so neighbouring labels do not collide
fn label_budget(width: u32, slots: usize) -> usize {
    let slot_px = width.saturating_sub(60) as usize / slots.max(1);
    (slot_px / 6).clamp(3, MAX_LABEL_CHARS)
}

fn category_formatter(
    entries: &[(String, usize)],
    max_chars: usize,
) -> impl Fn(&SegmentValue<usize>) -> String + '_ {
    move |value| match value {
        SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => entries
            .get(*idx)
            .map(|(label, _)| short_label(label, max_chars))
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn draw_bars(root: &Area<'_>, entries: &[(String, usize)], style: &ChartStyle) -> Result<()> {
    let labels = category_formatter(entries, label_budget(style.width, entries.len()));

    let mut chart = ChartBuilder::on(root)
        .margin(12)
        .caption(&style.caption, (FONT_FAMILY, CAPTION_SIZE))
        .x_label_area_size(32)
        .y_label_area_size(36)
        .build_cartesian_2d(
            (0usize..category_axis_end(entries)).into_segmented(),
            0usize..value_axis_max(entries),
        )
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len().max(1))
        .x_label_formatter(&labels)
        .x_desc(style.category.as_str())
        .y_desc("Objects")
        .label_style((FONT_FAMILY, LABEL_SIZE))
        .axis_desc_style((FONT_FAMILY, LABEL_SIZE + 1))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(entries.iter().enumerate().map(|(i, (_, count))| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), *count)],
                style.color.filled(),
            );
            bar.set_margin(0, 0, 4, 4);
            bar
        }))
        .map_err(chart_error)?;

    Ok(())
}

fn draw_line(root: &Area<'_>, entries: &[(String, usize)], style: &ChartStyle) -> Result<()> {
    let labels = category_formatter(entries, label_budget(style.width, entries.len()));

    let mut chart = ChartBuilder::on(root)
        .margin(12)
        .caption(&style.caption, (FONT_FAMILY, CAPTION_SIZE))
        .x_label_area_size(32)
        .y_label_area_size(36)
        .build_cartesian_2d(
            (0usize..category_axis_end(entries)).into_segmented(),
            0usize..value_axis_max(entries),
        )
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len().max(1))
        .x_label_formatter(&labels)
        .x_desc(style.category.as_str())
        .y_desc("Objects")
        .label_style((FONT_FAMILY, LABEL_SIZE))
        .axis_desc_style((FONT_FAMILY, LABEL_SIZE + 1))
        .draw()
        .map_err(chart_error)?;

    let points: Vec<(SegmentValue<usize>, usize)> = entries
        .iter()
        .enumerate()
        .map(|(i, (_, count))| (SegmentValue::CenterOf(i), *count))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), style.color.stroke_width(2)))
        .map_err(chart_error)?;
    chart
        .draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, 4, style.color.filled())),
        )
        .map_err(chart_error)?;

    Ok(())
}
