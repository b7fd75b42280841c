use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use pacman_sim::{
    Cell as Tile, Direction, Engine, EngineOptions, GameState, GameStatus, GhostKind, GhostMode,
    LevelTable, MazeLayout, MovementModel, Pos,
};

const CELL_W: usize = 2;
const DEFAULT_RENDER_FPS: u64 = 120;
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Pellet,
    Power,
    Gate,
    Bonus,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

struct Settings {
    /// Fixed tick length; `None` follows the engine's per-level pacing.
    tick_ms: Option<u64>,
    render_fps: u64,
    seed: u64,
    levels: LevelTable,
    layout: MazeLayout,
    options: EngineOptions,
}

fn main() -> Result<()> {
    env_logger::init();
    let settings = read_settings()?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, settings: Settings) -> Result<()> {
    let engine = Engine::with_options(settings.levels, settings.options);
    let layout = Arc::new(settings.layout);
    let mut state = engine.new_game(Arc::clone(&layout), settings.seed);
    let mut renderer = Renderer::new(layout.grid.width(), layout.grid.height());
    let mut last_tick = Instant::now();
    let mut last_seen: [Option<Instant>; 4] = [None, None, None, None];
    let mut last_pressed: Option<Direction> = None;
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    log::info!("starting with seed {}", settings.seed);

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                let dir = match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => {
                        state = engine.new_game(Arc::clone(&layout), state.seed.wrapping_add(1));
                        renderer.needs_full = true;
                        None
                    }
                    KeyCode::Char('k') | KeyCode::Up => Some(Direction::Up),
                    KeyCode::Char('j') | KeyCode::Down => Some(Direction::Down),
                    KeyCode::Char('h') | KeyCode::Left => Some(Direction::Left),
                    KeyCode::Char('l') | KeyCode::Right => Some(Direction::Right),
                    _ => None,
                };
                if let Some(dir) = dir {
                    last_seen[idx_for_dir(dir)] = Some(Instant::now());
                    last_pressed = Some(dir);
                }
            }
        }

        let tick_ms = settings
            .tick_ms
            .unwrap_or_else(|| engine.pacman_step_ms(&state) as u64);
        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = Instant::now();
            let desired_dir = active_dir_recent(&last_seen, last_pressed);
            state = engine.step(&state, desired_dir);
        }
        render(stdout, &engine, &state, &mut renderer)?;
        if state.status == GameStatus::GameOver && state.death_animation == 0 {
            render_game_over(stdout, &state, &renderer)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn env_number(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
}

fn read_settings() -> Result<Settings> {
    let levels = match std::env::var("PACMAN_LEVELS") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading level table {path}"))?;
            LevelTable::from_json(&json).with_context(|| format!("parsing level table {path}"))?
        }
        Err(_) => LevelTable::default(),
    };
    let layout = match std::env::var("PACMAN_MAP") {
        Ok(path) => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("reading map {path}"))?;
            MazeLayout::parse(&text).with_context(|| format!("parsing map {path}"))?
        }
        Err(_) => MazeLayout::classic(),
    };
    let movement = match std::env::var("PACMAN_MOVEMENT").as_deref() {
        Ok("continuous") => MovementModel::Continuous,
        _ => MovementModel::PerInput,
    };
    Ok(Settings {
        tick_ms: env_number("PACMAN_TICK_MS"),
        render_fps: env_number("PACMAN_FPS").unwrap_or(DEFAULT_RENDER_FPS),
        seed: env_number("PACMAN_SEED").unwrap_or_else(rand::random),
        levels,
        layout,
        options: EngineOptions {
            movement,
            ..EngineOptions::default()
        },
    })
}

fn render(
    stdout: &mut Stdout,
    engine: &Engine,
    state: &GameState,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let width = state.grid.width();
    let height = state.grid.height();
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = format!(
        "Score: {}  Lives: {}  Level: {}  Pellets: {}  Mode: {:?}  (r reset, q quit)",
        state.score,
        state.lives,
        state.level,
        state.pellets_remaining,
        engine.global_mode(state)
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..height {
        for x in 0..width {
            let cell = cell_for(state, Pos::new(x as i32, y as i32));
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

fn cell_for(state: &GameState, pos: Pos) -> Cell {
    if pos == state.agent.pos {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = state.ghosts.iter().find(|g| g.pos == pos) {
        return match ghost.mode {
            GhostMode::Frightened => Cell {
                glyph: Glyph::Frightened,
                color: Color::Blue,
            },
            GhostMode::Eaten => Cell {
                glyph: Glyph::Eyes,
                color: Color::White,
            },
            GhostMode::Scatter | GhostMode::Chase => Cell {
                glyph: Glyph::Ghost,
                color: ghost_color(ghost.kind),
            },
        };
    }
    if pos == state.layout.fruit_pos && state.fruits.iter().any(|f| !f.collected) {
        return Cell {
            glyph: Glyph::Bonus,
            color: Color::Green,
        };
    }
    match state.grid.at(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Door => Cell {
            glyph: Glyph::Gate,
            color: Color::Cyan,
        },
        Tile::Empty => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        Tile::Pellet => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Tile::PowerPellet => Cell {
            glyph: Glyph::Power,
            color: Color::Magenta,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Player => ("😃", cell.color),
        Glyph::Ghost => ("👻", cell.color),
        Glyph::Frightened => ("😱", cell.color),
        Glyph::Eyes => ("👀", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Empty => ("  ", cell.color),
        Glyph::Pellet => ("· ", cell.color),
        Glyph::Power => ("● ", cell.color),
        Glyph::Gate => ("==", cell.color),
        Glyph::Bonus => ("🍒", cell.color),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn render_game_over(stdout: &mut Stdout, state: &GameState, renderer: &Renderer) -> io::Result<()> {
    stdout.queue(MoveTo(
        renderer.origin_x,
        renderer.origin_y + state.grid.height() as u16,
    ))?;
    stdout.queue(Print(format!(
        "GAME OVER - Final Score: {} (r to restart, q to quit)",
        state.score
    )))?;
    stdout.flush()
}

/// The held direction, or failing that the most recently seen one still
/// inside the hold window. A released key yields no input.
fn active_dir_recent(
    last_seen: &[Option<Instant>; 4],
    last_pressed: Option<Direction>,
) -> Option<Direction> {
    let now = Instant::now();
    let hold = Duration::from_millis(INPUT_HOLD_MS);
    if let Some(dir) = last_pressed {
        if let Some(t) = last_seen[idx_for_dir(dir)] {
            if now.duration_since(t) <= hold {
                return Some(dir);
            }
        }
    }
    let mut best: Option<(Direction, Instant)> = None;
    for (idx, dir) in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .iter()
    .enumerate()
    {
        if let Some(t) = last_seen[idx] {
            if now.duration_since(t) <= hold {
                match best {
                    None => best = Some((*dir, t)),
                    Some((_, bt)) if t > bt => best = Some((*dir, t)),
                    _ => {}
                }
            }
        }
    }
    best.map(|(dir, _)| dir)
}

fn idx_for_dir(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}
