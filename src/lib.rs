//! Deterministic tick-based Pac-Man simulation.
//!
//! [`Engine::step`] maps a [`GameState`] and an optional direction to the
//! next state. It does no I/O, no waiting and no rendering; a driver calls it
//! at a fixed cadence and draws whatever comes back.

pub mod components;
pub mod error;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod level;
pub mod mode;
pub mod player;
pub mod release;
pub mod scoring;
pub mod speed;
pub mod state;
pub mod targeting;

pub use components::{Cell, Direction, Pos};
pub use error::{ConfigError, MapError};
pub use game::{Engine, EngineOptions, FrightenedMovement, MovementModel};
pub use ghost::{Ghost, GhostKind, GhostMode};
pub use grid::{Grid, House, MazeLayout};
pub use level::{GlobalMode, LevelConfig, LevelTable, TICK_MS};
pub use player::Agent;
pub use state::{AudioEvent, FruitInstance, GameState, GameStatus};
