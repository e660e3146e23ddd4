//! View command implementation - Interactive TUI viewer.

use super::{village_name, CliError, WorldArgs};
use bastion::config::WorldConfig;
use bastion::render::{assign_glyphs, glyph_of, occupancy, Cell, EMPTY, OVERLAP};
use bastion::{audit_village, Audit, Catalog, Village};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use std::path::Path;
use std::time::Duration;

/// Execute the view command.
///
/// # Errors
///
/// Returns an error if the village cannot be audited or the TUI fails.
pub(crate) fn execute(input_village: &Path, world: &WorldArgs) -> Result<(), CliError> {
    let config = world.load_config()?;
    let village = Village::load(input_village)?;
    let mut catalog = Catalog::from_dir(&world.catalog_dir);
    let audit = audit_village(&village, &mut catalog, config.cell_size)?;

    let app = App::new(village_name(input_village), audit, config);
    run_tui(app)
}

/// App state for the TUI.
struct App {
    name: String,
    audit: Audit,
    config: WorldConfig,
    /// Top-left visible cell.
    scroll: (usize, usize),
}

impl App {
    fn new(name: String, audit: Audit, config: WorldConfig) -> Self {
        Self {
            name,
            audit,
            config,
            scroll: (0, 0),
        }
    }

    fn cols(&self) -> usize {
        usize::try_from(self.config.num_cols).unwrap_or(0)
    }

    fn rows(&self) -> usize {
        usize::try_from(self.config.num_rows).unwrap_or(0)
    }

    fn scroll_by(&mut self, dx: isize, dy: isize) {
        let max_x = self.cols().saturating_sub(1);
        let max_y = self.rows().saturating_sub(1);
        self.scroll.0 = self.scroll.0.saturating_add_signed(dx).min(max_x);
        self.scroll.1 = self.scroll.1.saturating_add_signed(dy).min(max_y);
    }

    fn reset_scroll(&mut self) {
        self.scroll = (0, 0);
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.config.frame_rate.max(1)))
    }
}

type Term = Terminal<CrosstermBackend<Stdout>>;

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(terminal: &mut Term, app: &mut App) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if event::poll(app.poll_interval())?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Left | KeyCode::Char('h') => app.scroll_by(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => app.scroll_by(1, 0),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_by(0, -1),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_by(0, 1),
                KeyCode::Char('r') => app.reset_scroll(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_grid(f, main_chunks[0], app);
    render_report(f, main_chunks[1], app);

    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let result = &app.audit.result;
    let townhall = result
        .townhall_level
        .map_or_else(|| "no townhall".to_string(), |l| format!("TH{l}"));
    let status = if result.is_valid() { "VALID" } else { "INVALID" };

    let title = format!(
        " Bastion Village Viewer | {} | {} | {} | {} structures ",
        app.name,
        townhall,
        status,
        app.audit.structures.len()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let structures = &app.audit.structures;
    let glyphs = assign_glyphs(structures);
    let cols = app.cols();
    let grid = occupancy(structures, cols, app.rows());

    // Two terminal columns per cell
    let visible_width = usize::from(area.width).saturating_sub(2) / 2;
    let visible_height = usize::from(area.height).saturating_sub(2);
    let (left, top) = app.scroll;

    let mut lines: Vec<Line> = Vec::new();
    for row in grid.chunks(cols.max(1)).skip(top).take(visible_height) {
        let spans: Vec<Span> = row
            .iter()
            .skip(left)
            .take(visible_width)
            .map(|cell| {
                let (ch, color) = match cell {
                    Cell::Empty => (EMPTY, Color::DarkGray),
                    Cell::Overlap => (OVERLAP, Color::LightRed),
                    Cell::Covered(index) => {
                        let kind = structures[*index].kind.as_str();
                        let color = app
                            .config
                            .color_of(kind)
                            .map_or(Color::White, |[r, g, b]| Color::Rgb(r, g, b));
                        (glyph_of(&glyphs, kind), color)
                    }
                };
                Span::styled(format!("{ch} "), Style::default().fg(color))
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let title = format!(" Grid {}x{} @ ({left}, {top}) ", cols, app.rows());
    let grid_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(grid_widget, area);
}

fn render_report(f: &mut Frame, area: Rect, app: &App) {
    let result = &app.audit.result;
    let mut lines = vec![Line::from("")];

    let (verdict, color) = if result.townhall_level.is_none() {
        ("No townhall found", Color::Red)
    } else if result.is_valid() {
        ("Valid village", Color::Green)
    } else {
        ("Invalid village", Color::Red)
    };
    lines.push(Line::from(Span::styled(
        verdict,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    if result.warnings.is_empty() {
        lines.push(Line::from("No warnings"));
    }
    for warning in &result.warnings {
        let color = if warning.invalidates() {
            Color::Yellow
        } else {
            Color::Gray
        };
        lines.push(Line::from(Span::styled(
            format!("[!] {warning}"),
            Style::default().fg(color),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Legend",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for glyph in assign_glyphs(&app.audit.structures) {
        lines.push(Line::from(format!("  {} {}", glyph.symbol, glyph.kind)));
    }
    lines.push(Line::from(format!("  {OVERLAP} overlap")));

    let report_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Report "))
        .wrap(Wrap { trim: false });

    f.render_widget(report_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(" [q] Quit  [←/→/↑/↓ or h/j/k/l] Scroll  [r] Reset view ")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion::ValidationResult;

    fn app() -> App {
        let config = WorldConfig {
            num_cols: 5,
            num_rows: 3,
            frame_rate: 20,
            ..WorldConfig::default()
        };
        let audit = Audit {
            structures: Vec::new(),
            result: ValidationResult::missing_townhall(),
        };
        App::new("v.json".to_string(), audit, config)
    }

    #[test]
    fn test_scroll_is_clamped_to_grid() {
        let mut app = app();
        app.scroll_by(-3, -3);
        assert_eq!(app.scroll, (0, 0));
        app.scroll_by(10, 10);
        assert_eq!(app.scroll, (4, 2));
        app.reset_scroll();
        assert_eq!(app.scroll, (0, 0));
    }

    #[test]
    fn test_poll_interval_follows_frame_rate() {
        let mut app = app();
        assert_eq!(app.poll_interval(), Duration::from_millis(50));
        app.config.frame_rate = 0;
        assert_eq!(app.poll_interval(), Duration::from_millis(1000));
    }
}
