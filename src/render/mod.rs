//! Chart rendering with Plotters.
//!
//! One drawing routine per chart kind, generic over the Plotters backend, so
//! the web page (SVG) and the terminal (Ratatui buffer) share the same code.
//! Categories are placed at integer x positions in descriptor order; the axis
//! formatter maps positions back to category labels.

use std::f64::consts::{FRAC_PI_2, TAU};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{Category, ChartDescriptor, ChartKind};
use crate::error::AppError;

/// Fraction of a category slot covered by its bars.
const BAR_SPAN: f64 = 0.8;
/// Upper bound on x tick labels; long year axes get thinned.
const MAX_X_LABELS: usize = 12;

/// Colours and sizes for one rendering target.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
    pub series: [RGBColor; 6],
    pub title_size: u32,
    pub label_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
}

impl Palette {
    /// Light theme for the SVG charts on the web page.
    pub const WEB: Palette = Palette {
        background: RGBColor(255, 255, 255),
        foreground: RGBColor(42, 63, 95),
        grid: RGBColor(229, 236, 246),
        series: [
            RGBColor(99, 110, 250),
            RGBColor(239, 85, 59),
            RGBColor(0, 204, 150),
            RGBColor(171, 99, 250),
            RGBColor(255, 161, 90),
            RGBColor(25, 211, 243),
        ],
        title_size: 18,
        label_size: 12,
        margin: 12,
        x_label_area: 40,
        y_label_area: 60,
    };

    /// High-contrast theme for terminal cells.
    pub const TERMINAL: Palette = Palette {
        background: RGBColor(0, 0, 0),
        foreground: RGBColor(255, 255, 255),
        grid: RGBColor(90, 90, 90),
        series: [
            RGBColor(0, 255, 255),
            RGBColor(255, 0, 255),
            RGBColor(0, 255, 0),
            RGBColor(255, 255, 0),
            RGBColor(255, 0, 0),
            RGBColor(0, 0, 255),
        ],
        title_size: 10,
        label_size: 10,
        margin: 1,
        x_label_area: 3,
        y_label_area: 7,
    };

    pub fn color(&self, idx: usize) -> RGBColor {
        self.series[idx % self.series.len()]
    }

    fn title_style(&self) -> TextStyle<'static> {
        ("sans-serif", self.title_size).into_font().color(&self.foreground)
    }

    fn label_style(&self) -> TextStyle<'static> {
        ("sans-serif", self.label_size).into_font().color(&self.foreground)
    }
}

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Draw one chart onto `root`.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartDescriptor,
    palette: &Palette,
) -> DrawResult<DB> {
    if chart.is_empty() || (chart.kind == ChartKind::Pie && chart.total() <= 0.0) {
        return draw_placeholder(root, chart, palette);
    }

    match chart.kind {
        ChartKind::Line => draw_line(root, chart, palette),
        ChartKind::Bar | ChartKind::GroupedBar => draw_bars(root, chart, palette),
        ChartKind::Pie => draw_pie(root, chart, palette),
    }
}

/// Render a chart to a standalone SVG document.
pub fn render_svg(chart: &ChartDescriptor, size: (u32, u32)) -> Result<String, AppError> {
    let palette = Palette::WEB;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&palette.background).map_err(render_error)?;
        draw_chart(&root, chart, &palette).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> AppError {
    AppError::runtime(format!("Chart rendering failed: {err}"))
}

fn draw_placeholder<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartDescriptor,
    palette: &Palette,
) -> DrawResult<DB> {
    let (_, height) = root.dim_in_pixel();
    let margin = palette.margin as i32;
    root.draw(&Text::new(chart.title.clone(), (margin, margin), palette.title_style()))?;
    root.draw(&Text::new(
        "No data for this selection".to_string(),
        (margin, height as i32 / 2),
        palette.label_style(),
    ))?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartDescriptor,
    palette: &Palette,
) -> DrawResult<DB> {
    let labels = category_labels(chart);
    let (y0, y1) = value_bounds(chart, false);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, palette.title_style())
        .margin(palette.margin)
        .x_label_area_size(palette.x_label_area)
        .y_label_area_size(palette.y_label_area)
        .build_cartesian_2d(x_range(labels.len()), y0..y1)?;

    let x_fmt = |v: &f64| label_at(&labels, *v);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().min(MAX_X_LABELS))
        .y_labels(5)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&|v: &f64| format_value(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .label_style(palette.label_style())
        .axis_style(&palette.foreground)
        .bold_line_style(&palette.grid)
        .light_line_style(&palette.background)
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = palette.color(idx);
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .filter_map(|p| position(&labels, &p.category).map(|x| (x, p.value)))
            .collect();
        ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
    }

    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartDescriptor,
    palette: &Palette,
) -> DrawResult<DB> {
    let labels = category_labels(chart);
    let (y0, y1) = value_bounds(chart, true);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, palette.title_style())
        .margin(palette.margin)
        .x_label_area_size(palette.x_label_area)
        .y_label_area_size(palette.y_label_area)
        .build_cartesian_2d(x_range(labels.len()), y0..y1)?;

    let x_fmt = |v: &f64| label_at(&labels, *v);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().min(MAX_X_LABELS))
        .y_labels(5)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&|v: &f64| format_value(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .label_style(palette.label_style())
        .axis_style(&palette.foreground)
        .bold_line_style(&palette.grid)
        .light_line_style(&palette.background)
        .draw()?;

    let groups = chart.series.len().max(1);
    let slot = BAR_SPAN / groups as f64;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = palette.color(idx);
        let offset = -BAR_SPAN / 2.0 + slot * idx as f64;
        let bars: Vec<Rectangle<(f64, f64)>> = series
            .points
            .iter()
            .filter_map(|p| {
                let x0 = position(&labels, &p.category)? + offset;
                Some(Rectangle::new([(x0, 0.0), (x0 + slot * 0.9, p.value)], color.filled()))
            })
            .collect();

        let anno = ctx.draw_series(bars)?;
        if let Some(name) = &series.name {
            anno.label(name.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled()));
        }
    }

    if chart.series.iter().any(|s| s.name.is_some()) {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&palette.background)
            .border_style(&palette.foreground)
            .label_font(palette.label_style())
            .draw()?;
    }

    Ok(())
}

/// Pie slices as filled wedges, clockwise from twelve o'clock.
fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartDescriptor,
    palette: &Palette,
) -> DrawResult<DB> {
    let total = chart.total();

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, palette.title_style())
        .margin(palette.margin)
        .build_cartesian_2d(-1.8..1.8, -1.3..1.3)?;

    let mut start = FRAC_PI_2;
    let slices = chart.series.iter().flat_map(|s| s.points.iter());
    for (idx, point) in slices.enumerate() {
        let share = point.value / total;
        let sweep = share * TAU;
        let color = palette.color(idx);

        ctx.draw_series(std::iter::once(Polygon::new(
            wedge(start, start - sweep),
            color.filled(),
        )))?;

        let mid = start - sweep / 2.0;
        let label = format!("{} {:.1}%", point.category, share * 100.0);
        ctx.draw_series(std::iter::once(Text::new(
            label,
            (1.15 * mid.cos(), 1.15 * mid.sin()),
            palette.label_style(),
        )))?;

        start -= sweep;
    }

    Ok(())
}

fn wedge(from: f64, to: f64) -> Vec<(f64, f64)> {
    let steps = ((from - to).abs() / (TAU / 120.0)).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((0.0, 0.0));
    for i in 0..=steps {
        let angle = from + (to - from) * (i as f64 / steps as f64);
        points.push((angle.cos(), angle.sin()));
    }
    points
}

/// Category labels in first-seen order. Grouped bars sort numeric
/// categories so the axis reads left to right.
fn category_labels(chart: &ChartDescriptor) -> Vec<String> {
    let mut categories: Vec<&Category> = chart.categories();
    if chart.kind == ChartKind::GroupedBar {
        categories.sort_by(|a, b| match (a, b) {
            (Category::Float(x), Category::Float(y)) => x.total_cmp(y),
            _ => a.to_string().cmp(&b.to_string()),
        });
    }
    categories.into_iter().map(ToString::to_string).collect()
}

fn position(labels: &[String], category: &Category) -> Option<f64> {
    let label = category.to_string();
    labels.iter().position(|l| *l == label).map(|idx| idx as f64)
}

fn x_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

fn label_at(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if idx < 0.0 || (v - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Y bounds with a little headroom. Bars always include zero.
fn value_bounds(chart: &ChartDescriptor, from_zero: bool) -> (f64, f64) {
    let values = chart.series.iter().flat_map(|s| s.points.iter()).map(|p| p.value);
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if from_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if hi - lo < 1e-12 {
        lo -= 1.0;
        hi += 1.0;
    }

    let pad = (hi - lo) * 0.08;
    let lo = if from_zero && lo == 0.0 { 0.0 } else { lo - pad };
    (lo, hi + pad)
}

fn format_value(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
