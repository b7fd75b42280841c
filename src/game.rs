use std::sync::Arc;

use crate::components::Direction;
use crate::ghost::{step_ghosts, GhostContext};
use crate::grid::MazeLayout;
use crate::level::{GlobalMode, LevelConfig, LevelTable};
use crate::mode::mode_schedule;
use crate::player::{attempt_move, continuous_move};
use crate::scoring::{consume_if_any, expire_fruits};
use crate::speed::pacman_step_ms;
use crate::state::{advance_level, handle_pacman_death, AudioEvent, GameState, GameStatus};

/// How the agent reacts to ticks without input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementModel {
    /// One tile per tick that carries a direction; idle otherwise.
    #[default]
    PerInput,
    /// Keep moving in the facing direction and buffer turns.
    Continuous,
}

/// How frightened ghosts pick their next tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrightenedMovement {
    /// Keep steering toward the usual target.
    #[default]
    Nominal,
    /// Uniform choice among legal non-reverse moves, seeded per tick.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    pub movement: MovementModel,
    pub frightened: FrightenedMovement,
}

/// The simulation: a level table plus rules, applied one tick at a time.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    levels: LevelTable,
    options: EngineOptions,
}

impl Engine {
    pub fn new(levels: LevelTable) -> Self {
        Self::with_options(levels, EngineOptions::default())
    }

    pub fn with_options(levels: LevelTable, options: EngineOptions) -> Self {
        Self { levels, options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn set_levels(&mut self, levels: Vec<LevelConfig>) {
        self.levels.set_levels(levels);
    }

    pub fn reset_levels(&mut self) {
        self.levels.reset_levels();
    }

    pub fn level_config(&self, level: u32) -> Option<&LevelConfig> {
        self.levels.get(level)
    }

    pub fn new_game(&self, layout: Arc<MazeLayout>, seed: u64) -> GameState {
        GameState::new(layout, &self.levels, seed)
    }

    /// Milliseconds the driver should wait before the next tick.
    pub fn pacman_step_ms(&self, state: &GameState) -> u32 {
        pacman_step_ms(state, self.levels.get(state.level))
    }

    pub fn global_mode(&self, state: &GameState) -> GlobalMode {
        let schedule = mode_schedule(state.level, self.levels.get(state.level));
        state.mode_timer.mode(&schedule)
    }

    /// Computes the next state. `state` is left untouched.
    pub fn step(&self, state: &GameState, input: Option<Direction>) -> GameState {
        let mut next = state.clone();
        next.audio_event = None;

        if next.status != GameStatus::Playing || next.death_animation > 0 {
            next.death_animation = next.death_animation.saturating_sub(1);
            return next;
        }
        if !next.started {
            if input.is_none() {
                return next;
            }
            next.started = true;
        }

        let config = self.levels.get(next.level);
        next = match self.options.movement {
            MovementModel::PerInput => match input {
                Some(dir) => attempt_move(next, dir),
                None => next,
            },
            MovementModel::Continuous => continuous_move(next, input),
        };
        next = consume_if_any(next, config);
        next = expire_fruits(next);

        let schedule = mode_schedule(next.level, config);
        let ctx = GhostContext {
            config,
            global: next.mode_timer.mode(&schedule),
            frightened: self.options.frightened,
        };
        let pass = step_ghosts(&next, &ctx);
        next.ghosts = pass.ghosts;
        next.score += pass.score_gained;
        next.ghost_chain = pass.chain;
        if pass.ghosts_eaten > 0 {
            next.audio_event = Some(AudioEvent::GhostEaten);
        }
        if let Some(killer) = pass.death_by {
            log::debug!("caught by {:?} at tick {}", killer, next.tick);
            next = handle_pacman_death(next);
            next.tick += 1;
            return next;
        }

        next.frightened_ticks = next.frightened_ticks.saturating_sub(1);
        if next.frightened_ticks == 0 {
            next.ghost_chain = 0;
        }
        next.respawn_protection = next.respawn_protection.saturating_sub(1);
        next.mode_timer = next.mode_timer.advance(&schedule);
        next.tick += 1;

        if next.pellets_remaining == 0 && next.status == GameStatus::Playing {
            next = advance_level(next, &self.levels);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Pos;
    use crate::ghost::GhostKind;
    use crate::state::DEATH_ANIMATION_TICKS;

    fn engine_and_state() -> (Engine, GameState) {
        let engine = Engine::default();
        let state = engine.new_game(Arc::new(MazeLayout::classic()), 1);
        (engine, state)
    }

    #[test]
    fn nothing_happens_before_the_first_input() {
        let (engine, state) = engine_and_state();
        let after = engine.step(&state, None);
        assert_eq!(after, state);
    }

    #[test]
    fn first_input_starts_the_game() {
        let (engine, state) = engine_and_state();
        let after = engine.step(&state, Some(Direction::Left));
        assert!(after.started);
        assert_eq!(after.agent.pos, Pos::new(12, 23));
        assert_eq!(after.score, 10);
        assert_eq!(after.tick, 1);
        assert_eq!(after.mode_timer.ticks_remaining, Some(87));
    }

    #[test]
    fn death_animation_freezes_the_world() {
        let (engine, mut state) = engine_and_state();
        state.started = true;
        state.death_animation = 2;
        let after = engine.step(&state, Some(Direction::Left));
        assert_eq!(after.death_animation, 1);
        assert_eq!(after.agent, state.agent);
        assert_eq!(after.ghosts, state.ghosts);
        assert_eq!(after.tick, state.tick);
    }

    #[test]
    fn blinky_catches_an_agent_standing_on_it() {
        let (engine, mut state) = engine_and_state();
        state.started = true;
        state.agent.pos = Pos::new(12, 11);
        state.ghosts[GhostKind::Blinky.index()].pos = Pos::new(12, 11);
        let after = engine.step(&state, None);
        assert_eq!(after.lives, 2);
        assert_eq!(after.death_animation, DEATH_ANIMATION_TICKS);
        assert_eq!(after.audio_event, Some(AudioEvent::Death));
        assert_eq!(after.agent.pos, after.layout.agent_spawn);
    }

    #[test]
    fn frightened_window_and_chain_decay_together() {
        let (engine, mut state) = engine_and_state();
        state.started = true;
        state.frightened_ticks = 1;
        state.ghost_chain = 2;
        let after = engine.step(&state, None);
        assert_eq!(after.frightened_ticks, 0);
        assert_eq!(after.ghost_chain, 0);
    }

    #[test]
    fn step_ms_hint_follows_the_level_table() {
        let (engine, state) = engine_and_state();
        assert_eq!(engine.pacman_step_ms(&state), 80);
        assert_eq!(engine.global_mode(&state), GlobalMode::Scatter);
    }

    #[test]
    fn override_hooks_swap_and_restore() {
        let (mut engine, _) = engine_and_state();
        let mut custom = engine.level_config(1).cloned().expect("level 1");
        custom.pacman_step_ms = 50;
        engine.set_levels(vec![custom]);
        assert_eq!(engine.level_config(3).map(|c| c.pacman_step_ms), Some(50));
        engine.reset_levels();
        assert_eq!(engine.level_config(1).map(|c| c.pacman_step_ms), Some(80));
    }
}
