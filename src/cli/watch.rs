//! Watch command implementation - Interactive TUI viewer.

#![allow(clippy::needless_pass_by_value)]

use super::{load_config, CliError};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, Borders, Paragraph,
    },
    Frame, Terminal,
};
use squadron::roster::{DetectionKind, MoveDirection};
use squadron::ScenarioError;
use squadron::scenario::{Action, DebugKey, FrameSnapshot, Scenario, ScenarioPlayer};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if loading fails or the TUI fails.
pub(crate) fn execute(
    scenario: Option<PathBuf>,
    frames: u32,
    frame_rate: f32,
    save: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let scenario = match scenario {
        Some(path) => Scenario::load(&path)?,
        None => Scenario::new("live", frames, frame_rate),
    };
    let player = ScenarioPlayer::new(scenario, config)?;

    let player = run_tui(player)?;

    if let Some(path) = save {
        player.scenario().save(&path)?;
    }
    Ok(())
}

/// App state for the TUI.
struct App {
    player: ScenarioPlayer,
    last: Option<FrameSnapshot>,
    paused: bool,
    shooting: bool,
    status: Option<String>,
    last_step: Instant,
}

impl App {
    fn new(player: ScenarioPlayer) -> Self {
        Self {
            player,
            last: None,
            paused: false,
            shooting: true,
            status: None,
            last_step: Instant::now(),
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.player.scenario().dt()).unwrap_or(Duration::from_secs(1))
    }

    fn step_forward(&mut self) {
        match self.player.step_forward() {
            Ok(snapshot) => {
                self.last = Some(snapshot);
                self.status = None;
                self.shooting = shooting_at(self.player.scenario(), self.player.frame());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
        self.last_step = Instant::now();
    }

    fn step_backward(&mut self) {
        let stepped = self.player.step_backward();
        self.after_seek(stepped);
        self.last_step = Instant::now();
    }

    fn restart(&mut self) {
        let rewound = self.player.goto_frame(0);
        self.after_seek(rewound);
        self.paused = true;
    }

    /// Resync view state with the replayed squad.
    fn after_seek(&mut self, result: Result<(), ScenarioError>) {
        self.status = result.err().map(|err| err.to_string());
        self.last = None;
        self.shooting = shooting_at(self.player.scenario(), self.player.frame());
    }

    fn inject(&mut self, action: Action) {
        if let Err(err) = self.player.inject(action) {
            self.status = Some(err.to_string());
        }
    }

    fn toggle_shooting(&mut self) {
        self.shooting = !self.shooting;
        let action = if self.shooting {
            Action::StartShooting
        } else {
            Action::StopShooting
        };
        self.inject(action);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused && !self.player.is_finished() && self.last_step.elapsed() >= self.frame_interval()
    }
}

/// Whether auto-fire is on once every event before `frame` has applied.
fn shooting_at(scenario: &Scenario, frame: u32) -> bool {
    scenario
        .events
        .iter()
        .take_while(|e| e.frame < frame)
        .filter_map(|e| match e.action {
            Action::StartShooting => Some(true),
            Action::StopShooting => Some(false),
            _ => None,
        })
        .last()
        .unwrap_or(true)
}

/// Convert a terminal column into a pointer x in screen pixels.
fn pointer_x(column: u16, app: &App) -> f32 {
    let width = crossterm::terminal::size().map_or(80, |(w, _)| w).max(1);
    f32::from(column) / f32::from(width) * app.player.config().drag.screen_width
}

fn run_tui(player: ScenarioPlayer) -> Result<ScenarioPlayer, CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(player);

    loop {
        // Draw
        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        // Auto-step if needed
        if app.should_auto_step() {
            app.step_forward();
        }

        // Handle input with timeout
        if !event::poll(Duration::from_millis(5)).map_err(|e| CliError::new(e.to_string()))? {
            continue;
        }
        match event::read().map_err(|e| CliError::new(e.to_string()))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.paused = !app.paused,
                KeyCode::Right | KeyCode::Char('l') => {
                    app.paused = true;
                    app.step_forward();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    app.paused = true;
                    app.step_backward();
                }
                KeyCode::Char('r') => app.restart(),
                KeyCode::Char('+' | '=') => app.inject(Action::DebugKey { key: DebugKey::Add }),
                KeyCode::Char('-') => app.inject(Action::DebugKey {
                    key: DebugKey::Remove,
                }),
                KeyCode::Char('m') => app.inject(Action::DebugKey {
                    key: DebugKey::Multiply,
                }),
                KeyCode::Char('d') => app.inject(Action::DebugKey {
                    key: DebugKey::Divide,
                }),
                KeyCode::Char('f') => app.toggle_shooting(),
                _ => {}
            },
            Event::Mouse(mouse) => {
                let x = pointer_x(mouse.column, &app);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => app.inject(Action::Press { x }),
                    MouseEventKind::Drag(MouseButton::Left) => app.inject(Action::Drag { x }),
                    MouseEventKind::Up(MouseButton::Left) => app.inject(Action::Release),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(app.player)
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_field(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let scenario = app.player.scenario();
    let status = if app.player.is_finished() {
        "FINISHED"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Squadron | {} | Frame {}/{} | {} | {} fps ",
        scenario.name,
        app.player.frame(),
        scenario.frames,
        status,
        scenario.frame_rate
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_field(f: &mut Frame, area: Rect, app: &App) {
    let squad = app.player.squad();
    let drag = app.player.config().drag;
    let origin = squad.origin();
    let zone = squad.detection_zone(DetectionKind::Enemy);
    let depth = f64::from(zone.radius.max(3.0)) * 1.2;

    let soldiers: Vec<(f64, f64)> = (0..squad.engine().soldier_count())
        .filter_map(|i| squad.world_position(i))
        .map(|p| (f64::from(p.x), f64::from(p.z)))
        .collect();

    let x_min = f64::from(drag.min_x) - depth;
    let x_max = f64::from(drag.max_x) + depth;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Lane "))
        .marker(Marker::Braille)
        .x_bounds([x_min, x_max])
        .y_bounds([-depth, depth])
        .paint(move |ctx| {
            for x in [drag.min_x, drag.max_x] {
                ctx.draw(&CanvasLine {
                    x1: f64::from(x),
                    y1: -depth,
                    x2: f64::from(x),
                    y2: depth,
                    color: Color::DarkGray,
                });
            }
            ctx.draw(&Circle {
                x: f64::from(origin.x),
                y: f64::from(origin.z),
                radius: f64::from(zone.radius),
                color: Color::Red,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &soldiers,
                color: Color::Yellow,
            });
        });

    f.render_widget(canvas, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let squad = app.player.squad();
    let engine = squad.engine();

    let direction = match squad.direction() {
        MoveDirection::Left => "left",
        MoveDirection::Idle => "idle",
        MoveDirection::Right => "right",
    };
    let outcome = app
        .last
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| s.outcome.to_string());

    let mut lines = vec![
        Line::from(""),
        Line::from(format!("  Soldiers: {}", engine.soldier_count())),
        Line::from(format!("  Radius:   {:.3}", engine.radius())),
        Line::from(format!("  Settle:   {}", engine.settle().frames_remaining())),
        Line::from(format!("  Update:   {outcome}")),
        Line::from(format!("  Origin x: {:.3}", squad.origin().x)),
        Line::from(format!("  Moving:   {direction}")),
    ];

    if let Some(units) = squad.units() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("  Firing:    {}", units.firing_count())));
        lines.push(Line::from(format!("  Spawned:   {}", units.spawned())));
        lines.push(Line::from(format!("  Despawned: {}", units.despawned())));
    }

    let stats_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Squad "));

    f.render_widget(stats_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.player.is_finished() {
        " [q] Quit  [r] Restart  [←/→] Step "
    } else {
        " [q] Quit  [Space] Pause  [←/→] Step  [r] Restart  [+/-] Add/Remove  [m/d] x2 /2  [f] Fire  [mouse] Drag "
    };

    let text = match &app.status {
        Some(status) => format!("{controls} | {status}"),
        None => controls.to_string(),
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggles() -> Scenario {
        Scenario::new("toggles", 20, 60.0)
            .with_event(3, Action::StopShooting)
            .with_event(8, Action::StartShooting)
            .with_event(12, Action::StopShooting)
    }

    #[test]
    fn test_shooting_follows_replayed_toggles() {
        let scenario = toggles();
        assert!(shooting_at(&scenario, 0));
        assert!(shooting_at(&scenario, 3));
        assert!(!shooting_at(&scenario, 4));
        assert!(shooting_at(&scenario, 9));
        assert!(!shooting_at(&scenario, 20));
    }

    #[test]
    fn test_restart_resyncs_shooting() {
        let player = ScenarioPlayer::new(toggles(), squadron::SquadConfig::default()).unwrap();
        let mut app = App::new(player);
        for _ in 0..5 {
            app.step_forward();
        }
        assert!(!app.shooting);
        app.toggle_shooting();
        assert!(app.shooting);

        // The toggle fires on the next frame, so one step back undoes it
        app.step_forward();
        app.step_backward();
        assert_eq!(app.player.frame(), 5);
        assert!(!app.shooting);

        app.restart();
        assert!(app.shooting);
        assert!(app.paused);
        assert_eq!(app.player.frame(), 0);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_step_back_at_start_reports_error() {
        let player = ScenarioPlayer::new(toggles(), squadron::SquadConfig::default()).unwrap();
        let mut app = App::new(player);
        app.step_backward();
        assert!(app.status.is_some());
        assert_eq!(app.player.frame(), 0);
    }
}
