use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph};

use eurostats_terminal::chart::{self, APPEARANCES_COLOR, Rgb, SeasonChartSpec};
use eurostats_terminal::config::{self, DbConfig};
use eurostats_terminal::export;
use eurostats_terminal::provider;
use eurostats_terminal::state::{AppState, Delta, Focus, Notice, ProviderCommand, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    backend_label: &'static str,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>, backend_label: &'static str) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            backend_label,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.cycle_focus(),
            KeyCode::Char('j') | KeyCode::Down => match self.state.focus {
                Focus::MinimumSeasons => self.state.bump_minimum_seasons(-1),
                _ => self.state.select_next(),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.focus {
                Focus::MinimumSeasons => self.state.bump_minimum_seasons(1),
                _ => self.state.select_prev(),
            },
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.focus == Focus::MinimumSeasons {
                    self.state.bump_minimum_seasons(-1);
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.state.focus == Focus::MinimumSeasons {
                    self.state.bump_minimum_seasons(1);
                }
            }
            KeyCode::Char(' ') => match self.state.focus {
                Focus::Competitions => self.state.toggle_competition_at_cursor(),
                Focus::Seasons => self.state.toggle_season_at_cursor(),
                Focus::Players => self.state.choose_player_at_cursor(),
                Focus::MinimumSeasons => {}
            },
            KeyCode::Enter => {
                if self.state.focus == Focus::Players {
                    self.state.choose_player_at_cursor();
                }
            }
            KeyCode::Char('r') => {
                self.state.refresh();
                self.state.push_log("[INFO] Refresh requested");
            }
            KeyCode::Char('e') => self.export(ExportFormat::Xlsx),
            KeyCode::Char('o') => self.export(ExportFormat::Json),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(player) = self.state.selected_player.clone() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let Some(aggregate) = self.state.aggregate.clone() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };

        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let slug: String = chart::display_name(&player)
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let path = PathBuf::from(match format {
            ExportFormat::Xlsx => format!("player_overview_{slug}_{stamp}.xlsx"),
            ExportFormat::Json => format!("player_overview_{slug}_{stamp}.json"),
        });

        let result = match format {
            ExportFormat::Xlsx => export::export_xlsx(&path, &player, &aggregate),
            ExportFormat::Json => export::export_json(&path, &player, &aggregate),
        };
        match result {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Exported {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn drain_pending(&mut self) {
        let pending: Vec<_> = self.state.pending.drain(..).collect();
        for cmd in pending {
            if self.cmd_tx.send(cmd).is_err() {
                self.state.push_log("[WARN] Query worker is gone");
                break;
            }
        }
    }
}

#[derive(Clone, Copy)]
enum ExportFormat {
    Xlsx,
    Json,
}

fn main() -> Result<()> {
    config::load_env_files();

    let backend = match DbConfig::from_env_opt()? {
        Some(cfg) => provider::Backend::Live(cfg),
        None => provider::Backend::Sample,
    };
    let backend_label = backend.label();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend_term = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend_term)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(backend, tx, cmd_rx);

    let mut app = App::new(cmd_tx, backend_label);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    app.drain_pending();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.drain_pending();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                    app.drain_pending();
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn accent() -> Color {
    rgb(APPEARANCES_COLOR)
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(40)])
        .split(chunks[1]);

    render_filters(frame, body[0], &app.state);
    render_overview(frame, body[1], &app.state);

    let footer = Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> Text<'static> {
    let title = Line::from(vec![
        Span::styled(
            "⚽ European Competitions: Player overview ⚽",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{} data]", app.backend_label)),
    ]);
    let date = match app.state.latest_game_date {
        Some(date) => format!("Latest game date: {}", date.format("%B %d, %Y")),
        None => "Latest game date: loading...".to_string(),
    };
    Text::from(vec![title, Line::from(Span::styled(
        date,
        Style::default().fg(Color::DarkGray),
    ))])
}

fn footer_text(app: &App) -> String {
    let keys = "Tab Focus | j/k Move | Space Toggle/Pick | Enter Pick | r Refresh | e Export xlsx | o Export json | ? Help | q Quit";
    match app.state.logs.back() {
        Some(log) => format!("{keys}   {log}"),
        None => keys.to_string(),
    }
}

fn render_filters(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Filters").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let comp_height = (state.competition_options.len() as u16 + 2).clamp(3, 9);
    let season_height = (state.season_options.len() as u16 + 2).clamp(3, 10);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(comp_height),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(season_height),
        ])
        .split(inner);

    render_checklist(
        frame,
        chunks[0],
        "Competitions",
        &state.competition_options,
        &state.selected_comps,
        state.competition_cursor,
        state.focus == Focus::Competitions,
    );

    render_minimum_seasons(frame, chunks[1], state);

    render_picklist(
        frame,
        chunks[2],
        if state.players_loading {
            "Players (loading...)"
        } else {
            "Players"
        },
        &state.player_options,
        state.selected_player.as_deref(),
        state.player_cursor,
        state.focus == Focus::Players,
    );

    render_checklist(
        frame,
        chunks[3],
        "Seasons (optional)",
        &state.season_options,
        &state.selected_seasons,
        state.season_cursor,
        state.focus == Focus::Seasons,
    );
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(accent())
    } else {
        Style::default()
    }
}

fn render_checklist(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    options: &[String],
    selected: &[String],
    cursor: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = visible_window(options, cursor, inner.height as usize)
        .map(|(idx, option)| {
            let mark = if selected.contains(option) { "[x]" } else { "[ ]" };
            let prefix = if focused && idx == cursor { ">" } else { " " };
            let style = if focused && idx == cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{prefix} {mark} {option}"), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_picklist(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    options: &[String],
    selected: Option<&str>,
    cursor: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if options.is_empty() {
        let empty = Paragraph::new("No players for these filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = visible_window(options, cursor, inner.height as usize)
        .map(|(idx, option)| {
            let mark = if selected == Some(option.as_str()) {
                "(*)"
            } else {
                "( )"
            };
            let prefix = if focused && idx == cursor { ">" } else { " " };
            let style = if focused && idx == cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{prefix} {mark} {option}"), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

// Keeps the cursor in view for lists taller than their pane.
fn visible_window<'a>(
    options: &'a [String],
    cursor: usize,
    height: usize,
) -> impl Iterator<Item = (usize, &'a String)> {
    let start = if options.len() <= height {
        0
    } else {
        cursor
            .saturating_sub(height / 2)
            .min(options.len() - height)
    };
    options.iter().enumerate().skip(start).take(height.max(1))
}

fn render_minimum_seasons(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::MinimumSeasons;
    let block = Block::default()
        .title("Minimum seasons")
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let upper = state.max_seasons.unwrap_or(1).max(1);
    let text = format!(
        "{} {} / {} {}",
        if focused { "<" } else { " " },
        state.minimum_seasons,
        upper,
        if focused { ">" } else { " " },
    );
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.notice() {
        Some(Notice::SelectCompetition) => {
            render_notice(frame, area, "Please select at least one competition.", Color::Red);
            return;
        }
        Some(Notice::SelectPlayer) => {
            render_notice(frame, area, "Please select a player.", Color::Red);
            return;
        }
        Some(Notice::NoRowsForPlayer) => {
            render_notice(
                frame,
                area,
                "No data available for this player in the selected competitions.",
                Color::Yellow,
            );
            return;
        }
        None => {}
    }

    let (Some(player), Some(aggregate)) = (&state.selected_player, &state.aggregate) else {
        render_notice(frame, area, "Loading player data...", Color::DarkGray);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Length(2),
            Constraint::Min(8),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        format!("Player overview for {}:", chart::display_name(player)),
        Style::default().fg(accent()).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    render_metric_tiles(frame, chunks[1], state);

    let teams = Paragraph::new(vec![
        Line::from(Span::styled(
            "Teams played for",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(aggregate.overview.teams.clone()),
    ]);
    frame.render_widget(teams, chunks[2]);

    let spec = chart::season_chart_spec(player, &aggregate.seasons);
    render_season_chart(frame, chunks[3], &spec);
}

fn render_notice(frame: &mut Frame, area: Rect, msg: &str, color: Color) {
    let notice = Paragraph::new(msg).style(Style::default().fg(color));
    frame.render_widget(notice, area);
}

fn render_metric_tiles(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(aggregate) = &state.aggregate else {
        return;
    };
    let tiles = chart::overview_tiles(&aggregate.overview);

    // First tile on its own row, the rest in rows of three.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(area);

    render_tile_row(frame, rows[0], &tiles[0..1]);
    render_tile_row(frame, rows[1], &tiles[1..4]);
    render_tile_row(frame, rows[2], &tiles[4..7]);
    render_tile_row(frame, rows[3], &tiles[7..10]);
}

fn render_tile_row(frame: &mut Frame, area: Rect, tiles: &[chart::MetricTile]) {
    let constraints: Vec<Constraint> = tiles
        .iter()
        .map(|_| Constraint::Ratio(1, tiles.len() as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (tile, col) in tiles.iter().zip(cols.iter()) {
        let text = vec![
            Line::from(Span::styled(
                tile.label.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                tile.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(text), *col);
    }
}

fn render_season_chart(frame: &mut Frame, area: Rect, spec: &SeasonChartSpec) {
    if spec.points.is_empty() {
        render_notice(frame, area, "No seasons to chart.", Color::DarkGray);
        return;
    }

    let bar_data: Vec<(f64, f64)> = spec
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| (idx as f64, p.appearances as f64))
        .collect();
    let line_data: Vec<(f64, f64)> = spec
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| (idx as f64, p.goals as f64))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name(spec.bar_axis.title.clone())
            .graph_type(GraphType::Bar)
            .marker(symbols::Marker::HalfBlock)
            .style(Style::default().fg(rgb(spec.bar_axis.color)))
            .data(&bar_data),
        Dataset::default()
            .name(spec.line_axis.title.clone())
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(rgb(spec.line_axis.color)))
            .data(&line_data),
    ];

    // Axis labels stay hidden; the series titles carry the axis colors and
    // the x-axis shows only the first and last season.
    let first = spec.points.first().map(|p| p.season.clone()).unwrap_or_default();
    let last = spec.points.last().map(|p| p.season.clone()).unwrap_or_default();
    let x_labels = if spec.points.len() > 1 {
        vec![Span::raw(first), Span::raw(last)]
    } else {
        vec![Span::raw(first)]
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Line::from(vec![
                    Span::styled(
                        spec.bar_axis.title.clone(),
                        Style::default().fg(rgb(spec.bar_axis.color)),
                    ),
                    Span::raw(" / "),
                    Span::styled(
                        spec.line_axis.title.clone(),
                        Style::default().fg(rgb(spec.line_axis.color)),
                    ),
                    Span::raw(" per season"),
                ]))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([-0.5, spec.points.len() as f64 - 0.5])
                .labels(x_labels),
        )
        .y_axis(Axis::default().bounds([0.0, spec.y_max]));

    frame.render_widget(chart, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Player overview - Help",
        "",
        "Global:",
        "  Tab          Cycle filter focus",
        "  j/k or ↑/↓   Move / adjust slider",
        "  Space        Toggle competition/season, pick player",
        "  Enter        Pick player",
        "  r            Re-run all queries",
        "  e            Export overview to .xlsx",
        "  o            Export overview to .json",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Filters apply in order: competitions, minimum seasons,",
        "player, then the optional season subset.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
