//! Ratatui-based terminal UI.
//!
//! The settings panel mirrors the two dashboard selectors. Every change is
//! reported to [`Dashboard::dispatch`] and the returned updates drive the
//! year selector's disabled flag and the chart grid below.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info};

use crate::domain::{ChartSet, SelectionState};
use crate::error::AppError;
use crate::shell::{ComponentId, Dashboard, DropdownOption, TITLE, Update, UpdateValue};

mod chart_widget;

use chart_widget::ChartWidget;

/// Start the TUI.
pub fn run(dashboard: Dashboard) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dashboard);
    info!(rows = app.dashboard.table().len(), "terminal dashboard started");
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which selector the arrow keys act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Report,
    Year,
}

impl Field {
    fn component(self) -> ComponentId {
        match self {
            Field::Report => ComponentId::ReportSelector,
            Field::Year => ComponentId::YearSelector,
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Report => 0,
            Field::Year => 1,
        }
    }
}

struct App {
    dashboard: Dashboard,
    report_options: Vec<DropdownOption>,
    year_options: Vec<DropdownOption>,
    selection: SelectionState,
    selected_field: Field,
    year_disabled: bool,
    charts: ChartSet,
    status: String,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        let layout = dashboard.layout();
        let report_options = layout.dropdown_options(ComponentId::ReportSelector).to_vec();
        let year_options = layout.dropdown_options(ComponentId::YearSelector).to_vec();

        let mut app = Self {
            dashboard,
            report_options,
            year_options,
            selection: SelectionState::default(),
            selected_field: Field::Report,
            year_disabled: true,
            charts: ChartSet::empty(),
            status: "Select a report type.".to_string(),
        };

        let updates = app.dashboard.dispatch(&app.selection, None);
        app.apply(updates);
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = Field::Report,
            KeyCode::Down => self.selected_field = Field::Year,
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Backspace | KeyCode::Delete => self.set_value(self.selected_field, None),
            _ => {}
        }
        false
    }

    /// Step the focused selector through `[unset, options...]`.
    fn cycle(&mut self, delta: i64) {
        let field = self.selected_field;
        if field == Field::Year && self.year_disabled {
            self.status = "Year selection is only available for yearly statistics.".to_string();
            return;
        }

        let options = self.options(field);
        let current = self
            .value(field)
            .and_then(|v| options.iter().position(|o| o.value == v))
            .map_or(0, |idx| idx + 1);
        let slots = options.len() as i64 + 1;
        let next = (current as i64 + delta).rem_euclid(slots) as usize;
        let value = next.checked_sub(1).map(|idx| options[idx].value.clone());

        self.set_value(field, value);
    }

    fn options(&self, field: Field) -> &[DropdownOption] {
        match field {
            Field::Report => &self.report_options,
            Field::Year => &self.year_options,
        }
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Report => self.selection.report(),
            Field::Year => self.selection.year(),
        }
    }

    fn set_value(&mut self, field: Field, value: Option<String>) {
        if field == Field::Year && self.year_disabled {
            return;
        }
        match field {
            Field::Report => self.selection.report = value,
            Field::Year => self.selection.year = value,
        }
        debug!(field = ?field, report = ?self.selection.report, year = ?self.selection.year, "selection changed");

        let updates = self.dashboard.dispatch(&self.selection, Some(field.component()));
        self.apply(updates);
    }

    fn apply(&mut self, updates: Vec<Update>) {
        for update in updates {
            match (update.target.component, update.value) {
                (ComponentId::YearSelector, UpdateValue::Disabled(disabled)) => {
                    self.year_disabled = disabled;
                }
                (ComponentId::Output, UpdateValue::Children(charts)) => {
                    self.status = match charts.len() {
                        0 => "No charts for this selection.".to_string(),
                        n => format!("{n} charts"),
                    };
                    self.charts = charts;
                }
                (component, value) => {
                    debug!(?component, ?value, "ignoring update");
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
        self.draw_charts(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.dashboard.table();
        let span = table
            .year_span()
            .map(|(first, last)| format!("{first}-{last}"))
            .unwrap_or_else(|| "-".to_string());

        let line = Line::from(vec![
            Span::styled(TITLE, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({} rows, {span})", table.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let report = self.selection.report().unwrap_or("Select a report type");
        let year = self.selection.year().unwrap_or("Select-year");

        let year_style = if self.year_disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let year_suffix = if self.year_disabled { " (disabled)" } else { "" };

        let items = vec![
            ListItem::new(format!("Select Statistics: {report}")),
            ListItem::new(format!("Select Year: {year}{year_suffix}")).style(year_style),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.charts.is_empty() {
            let msg = Paragraph::new("Select a report type (and a year for yearly statistics) to show charts.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let rows: Vec<_> = self.charts.rows().collect();
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
            .split(area);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, ChartSet::PER_ROW as u32); ChartSet::PER_ROW])
                .split(*row_area);

            for (chart, cell) in row.iter().zip(cells.iter()) {
                let block = Block::default()
                    .title(chart.kind.display_name())
                    .borders(Borders::ALL);
                let inner = block.inner(*cell);
                frame.render_widget(block, *cell);
                frame.render_widget(Clear, inner);
                frame.render_widget(ChartWidget { chart }, inner);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  Backspace clear  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
