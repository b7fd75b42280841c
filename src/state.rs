use std::sync::Arc;

use crate::ghost::{Ghost, GhostKind};
use crate::grid::{Grid, MazeLayout};
use crate::level::{FruitKind, LevelTable};
use crate::mode::{mode_schedule, ModeTimer};
use crate::player::Agent;

pub const STARTING_LIVES: u32 = 3;
/// Pause after losing a life with lives to spare.
pub const DEATH_ANIMATION_TICKS: u32 = 15;
/// Longer pause after the final life.
pub const GAME_OVER_ANIMATION_TICKS: u32 = 40;
/// Ticks after a respawn during which ghost contact is harmless.
pub const RESPAWN_PROTECTION_TICKS: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// What happened this tick, for a sound layer to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Pellet,
    PowerPellet,
    Fruit,
    GhostEaten,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FruitInstance {
    pub kind: FruitKind,
    pub spawn_tick: u64,
    /// Dots-eaten count that triggered the spawn; one fruit per threshold.
    pub spawn_dots: u32,
    pub collected: bool,
}

/// Complete world state. [`crate::Engine::step`] never mutates its input;
/// each tick yields a fresh value.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub layout: Arc<MazeLayout>,
    pub grid: Grid,
    pub agent: Agent,
    /// Indexed by `GhostKind::index`.
    pub ghosts: [Ghost; 4],
    pub score: u32,
    pub lives: u32,
    pub pellets_remaining: u32,
    pub dots_eaten: u32,
    pub frightened_ticks: u32,
    pub mode_timer: ModeTimer,
    /// Ghosts eaten during the current frightened window.
    pub ghost_chain: u32,
    pub tick: u64,
    pub level: u32,
    pub status: GameStatus,
    /// False until the first direction input of a life-cycle/level.
    pub started: bool,
    pub death_animation: u32,
    pub respawn_protection: u32,
    pub fruits: Vec<FruitInstance>,
    pub audio_event: Option<AudioEvent>,
    pub seed: u64,
}

impl GameState {
    pub fn new(layout: Arc<MazeLayout>, levels: &LevelTable, seed: u64) -> Self {
        let level = 1;
        let schedule = mode_schedule(level, levels.get(level));
        let grid = layout.grid.clone();
        Self {
            agent: Agent::spawn(&layout),
            ghosts: spawn_ghosts(&layout),
            pellets_remaining: grid.pellet_count() as u32,
            grid,
            layout,
            score: 0,
            lives: STARTING_LIVES,
            dots_eaten: 0,
            frightened_ticks: 0,
            mode_timer: ModeTimer::start(&schedule),
            ghost_chain: 0,
            tick: 0,
            level,
            status: GameStatus::Playing,
            started: false,
            death_animation: 0,
            respawn_protection: 0,
            fruits: Vec::new(),
            audio_event: None,
            seed,
        }
    }

    pub fn ghost(&self, kind: GhostKind) -> &Ghost {
        &self.ghosts[kind.index()]
    }

    pub fn is_tunnel_row(&self, y: i32) -> bool {
        self.grid.is_tunnel_row(y)
    }
}

pub fn spawn_ghosts(layout: &MazeLayout) -> [Ghost; 4] {
    GhostKind::ALL.map(|kind| Ghost::spawn(kind, layout))
}

/// Takes a life and puts every actor back on its spawn.
pub fn handle_pacman_death(mut state: GameState) -> GameState {
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        state.status = GameStatus::GameOver;
        state.death_animation = GAME_OVER_ANIMATION_TICKS;
        log::info!("game over at level {} with score {}", state.level, state.score);
    } else {
        state.death_animation = DEATH_ANIMATION_TICKS;
        log::debug!("life lost, {} remaining", state.lives);
    }
    state.agent = Agent::spawn(&state.layout);
    state.ghosts = spawn_ghosts(&state.layout);
    state.frightened_ticks = 0;
    state.ghost_chain = 0;
    state.respawn_protection = RESPAWN_PROTECTION_TICKS;
    state.audio_event = Some(AudioEvent::Death);
    state
}

/// Rebuilds the maze for the next level. Score and lives carry over.
pub fn advance_level(mut state: GameState, levels: &LevelTable) -> GameState {
    state.level += 1;
    let schedule = mode_schedule(state.level, levels.get(state.level));
    state.grid = state.layout.grid.clone();
    state.pellets_remaining = state.grid.pellet_count() as u32;
    state.agent = Agent::spawn(&state.layout);
    state.ghosts = spawn_ghosts(&state.layout);
    state.dots_eaten = 0;
    state.frightened_ticks = 0;
    state.ghost_chain = 0;
    state.respawn_protection = 0;
    state.mode_timer = ModeTimer::start(&schedule);
    state.fruits.clear();
    state.started = false;
    log::info!("advancing to level {}", state.level);
    state
}
