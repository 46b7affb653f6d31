//! Plotters-powered chart widget for Ratatui.
//!
//! Drawing goes through `render::draw_chart`, the same routine the web page
//! uses for SVG, rendered into the Ratatui buffer with
//! `plotters-ratatui-backend`.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ChartDescriptor;
use crate::render::{Palette, draw_chart};

/// Render-only view of one chart descriptor.
pub struct ChartWidget<'a> {
    pub chart: &'a ChartDescriptor,
}

impl<'a> Widget for ChartWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out axes in a handful of cells.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let chart = self.chart;
        let widget = widget_fn(move |root| {
            draw_chart(&root, chart, &Palette::TERMINAL)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
