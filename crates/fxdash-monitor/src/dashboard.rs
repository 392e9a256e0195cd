//! TUI Dashboard using ratatui.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fxdash_analytics::{CurrencyOverview, StrengthClass, Trend};
use fxdash_core::types::{Currencies, CurrencyCode};
use fxdash_data::MarketSnapshot;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::store::Selection;

/// Dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub snapshot: Option<Arc<MarketSnapshot>>,
    pub selection: Selection,
    pub names: Arc<Currencies>,
    pub messages: Vec<String>,
}

/// User actions forwarded to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Filter text edited; emitted on every keystroke
    FilterChanged(String),
    RefreshRequested,
}

#[derive(Debug, Default)]
struct Input {
    filter: String,
    editing: bool,
}

enum KeyAction {
    Quit,
    Emit(DashboardEvent),
    None,
}

impl Input {
    fn handle(&mut self, code: KeyCode) -> KeyAction {
        if self.editing {
            return match code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing = false;
                    KeyAction::None
                }
                KeyCode::Backspace => {
                    self.filter.pop();
                    KeyAction::Emit(DashboardEvent::FilterChanged(self.filter.clone()))
                }
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    KeyAction::Emit(DashboardEvent::FilterChanged(self.filter.clone()))
                }
                _ => KeyAction::None,
            };
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('/') => {
                self.editing = true;
                KeyAction::None
            }
            KeyCode::Char('r') => KeyAction::Emit(DashboardEvent::RefreshRequested),
            KeyCode::Char('c') if !self.filter.is_empty() => {
                self.filter.clear();
                KeyAction::Emit(DashboardEvent::FilterChanged(String::new()))
            }
            _ => KeyAction::None,
        }
    }
}

/// Rows matching `filter` on code or currency name, ignoring case.
pub(crate) fn visible_rows<'a>(
    rows: &'a [CurrencyOverview],
    names: &Currencies,
    filter: &str,
) -> Vec<&'a CurrencyOverview> {
    let needle = filter.trim().to_lowercase();
    rows.iter()
        .filter(|row| {
            needle.is_empty()
                || row.code.as_str().to_lowercase().contains(&needle)
                || names
                    .get(&row.code)
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

fn change_color(value: Option<f64>) -> Color {
    match value {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        _ => Color::Gray,
    }
}

fn percent(value: Option<f64>) -> String {
    value.map(|v| format!("{:+.2}%", v)).unwrap_or_else(|| "-".to_string())
}

/// TUI Dashboard.
pub struct Dashboard {
    refresh_ms: u64,
}

impl Dashboard {
    /// Create a new dashboard redrawing every `refresh_ms`.
    pub fn new(refresh_ms: u64) -> Self {
        Self { refresh_ms }
    }

    /// Run the dashboard until the user quits.
    ///
    /// `get_state` is polled before every redraw; `on_event` receives filter
    /// edits and refresh requests.
    pub fn run<F, E>(&self, mut get_state: F, mut on_event: E) -> io::Result<()>
    where
        F: FnMut() -> DashboardState,
        E: FnMut(DashboardEvent),
    {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, &mut get_state, &mut on_event);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<B, F, E>(&self, terminal: &mut Terminal<B>, get_state: &mut F, on_event: &mut E) -> io::Result<()>
    where
        B: Backend,
        F: FnMut() -> DashboardState,
        E: FnMut(DashboardEvent),
    {
        let mut input = Input::default();
        loop {
            let state = get_state();
            terminal.draw(|f| self.ui(f, &state, &input))?;

            if event::poll(Duration::from_millis(self.refresh_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match input.handle(key.code) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Emit(ev) => on_event(ev),
                        KeyAction::None => {}
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, state: &DashboardState, input: &Input) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Summary
                Constraint::Min(8),    // Rates
                Constraint::Length(7), // Messages
            ])
            .split(frame.area());

        let rows = state
            .snapshot
            .as_deref()
            .map(|s| visible_rows(&s.rows, &state.names, &state.selection.filter))
            .unwrap_or_default();

        self.render_header(frame, chunks[0], state, input);
        self.render_summary(frame, chunks[1], state, &rows);
        self.render_rates(frame, chunks[2], state, &rows);
        self.render_messages(frame, chunks[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &DashboardState, input: &Input) {
        let filter_style = if input.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled("FX Dashboard", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | Base: "),
            Span::styled(state.selection.base.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(" | Filter: "),
            Span::styled(format!("{}_", input.filter), filter_style),
            Span::raw(" | '/' filter  'r' refresh  'q' quit"),
        ])])
        .block(Block::default().borders(Borders::ALL).title("System"));
        frame.render_widget(header, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, state: &DashboardState, rows: &[&CurrencyOverview]) {
        let (date, fetched) = match state.snapshot.as_deref() {
            Some(s) => (
                s.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                s.fetched_at.format("%H:%M:%S").to_string(),
            ),
            None => ("-".to_string(), "loading".to_string()),
        };

        let strongest = rows
            .iter()
            .filter_map(|r| r.strength.map(|s| (r.code, s.score)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let weakest = rows
            .iter()
            .filter_map(|r| r.strength.map(|s| (r.code, s.score)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let label = |v: Option<(CurrencyCode, f64)>| {
            v.map(|(c, s)| format!("{} ({:+.2})", c, s)).unwrap_or_else(|| "-".to_string())
        };

        let summary = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Rates date: "),
                Span::styled(date, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  |  Updated: "),
                Span::raw(fetched),
                Span::raw("  |  Shown: "),
                Span::raw(rows.len().to_string()),
            ]),
            Line::from(vec![
                Span::raw("Strongest: "),
                Span::styled(label(strongest), Style::default().fg(Color::Green)),
                Span::raw("  |  Weakest: "),
                Span::styled(label(weakest), Style::default().fg(Color::Red)),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title("Summary"));
        frame.render_widget(summary, area);
    }

    fn render_rates(&self, frame: &mut Frame, area: Rect, state: &DashboardState, rows: &[&CurrencyOverview]) {
        let header_cells = ["Code", "Name", "Rate", "24h", "7d", "30d", "Strength", "Trend"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let table_rows = rows.iter().map(|row| {
            let name = state.names.get(&row.code).cloned().unwrap_or_default();
            let (strength, strength_color) = match row.strength {
                Some(s) => (
                    format!("{:+.2} {}", s.score, s.class),
                    match s.class {
                        StrengthClass::Strong => Color::Green,
                        StrengthClass::Moderate => Color::Yellow,
                        StrengthClass::Weak => Color::Red,
                    },
                ),
                None => ("-".to_string(), Color::Gray),
            };
            let trend = match row.metrics.and_then(|m| m.trend) {
                Some(Trend::Up) => "▲ up",
                Some(Trend::Down) => "▼ down",
                Some(Trend::Neutral) => "● flat",
                None => "-",
            };

            Row::new(vec![
                Cell::from(row.code.to_string()),
                Cell::from(name),
                Cell::from(format!("{:.4}", row.rate)),
                Cell::from(percent(row.change_percent_24h()))
                    .style(Style::default().fg(change_color(row.change_percent_24h()))),
                Cell::from(percent(row.change_7d)).style(Style::default().fg(change_color(row.change_7d))),
                Cell::from(percent(row.change_30d)).style(Style::default().fg(change_color(row.change_30d))),
                Cell::from(strength).style(Style::default().fg(strength_color)),
                Cell::from(trend),
            ])
        });

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(25),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(16),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Rates"));

        frame.render_widget(table, area);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let messages: Vec<Line> = state
            .messages
            .iter()
            .rev()
            .take(5)
            .map(|m| Line::from(m.as_str()))
            .collect();

        let paragraph =
            Paragraph::new(messages).block(Block::default().borders(Borders::ALL).title("Log"));
        frame.render_widget(paragraph, area);
    }
}
