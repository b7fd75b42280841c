//! Movement pacing. The player's interval is a wall-clock hint for the
//! driver; ghosts skip ticks according to their stride.

use crate::ghost::{Ghost, GhostKind, GhostMode};
use crate::level::LevelConfig;
use crate::state::GameState;

const DEFAULT_PACMAN_STEP_MS: u32 = 80;
const DEFAULT_PACMAN_TUNNEL_STEP_MS: u32 = 100;
const DEFAULT_GHOST_STRIDE: u32 = 2;
const DEFAULT_TUNNEL_DELTA: i32 = 2;
const DEFAULT_FRIGHTENED_DELTA: i32 = 1;
const DEFAULT_EATEN_DELTA: i32 = -1;
const DEFAULT_ELROY_BONUS: i32 = -1;
const DEFAULT_ELROY_DOTS: [u32; 2] = [20, 10];

pub fn pacman_step_ms(state: &GameState, config: Option<&LevelConfig>) -> u32 {
    if state.is_tunnel_row(state.agent.pos.y) {
        config.map_or(DEFAULT_PACMAN_TUNNEL_STEP_MS, |c| c.pacman_tunnel_step_ms)
    } else {
        config.map_or(DEFAULT_PACMAN_STEP_MS, |c| c.pacman_step_ms)
    }
}

/// Blinky's aggression phase: 2 at or below the second threshold, 1 at or
/// below the first, else 0.
pub fn elroy_phase(pellets_remaining: u32, config: Option<&LevelConfig>) -> u32 {
    let [phase1, phase2] = config.map_or(DEFAULT_ELROY_DOTS, |c| c.elroy_dots);
    if pellets_remaining <= phase2 {
        2
    } else if pellets_remaining <= phase1 {
        1
    } else {
        0
    }
}

/// Ticks between moves for `ghost`, never below 1.
pub fn ghost_stride(state: &GameState, ghost: &Ghost, config: Option<&LevelConfig>) -> u32 {
    let mut stride = i64::from(config.map_or(DEFAULT_GHOST_STRIDE, |c| c.ghost_base_stride));
    if state.is_tunnel_row(ghost.pos.y) {
        stride += i64::from(config.map_or(DEFAULT_TUNNEL_DELTA, |c| c.ghost_tunnel_stride_delta));
    }
    let delta = if ghost.mode == GhostMode::Eaten {
        config.map_or(DEFAULT_EATEN_DELTA, |c| c.ghost_eaten_stride_delta)
    } else if state.frightened_ticks > 0 {
        config.map_or(DEFAULT_FRIGHTENED_DELTA, |c| c.ghost_frightened_stride_delta)
    } else if ghost.kind == GhostKind::Blinky {
        let bonus = config.map_or(DEFAULT_ELROY_BONUS, |c| c.elroy_stride_bonus);
        bonus.saturating_mul(elroy_phase(state.pellets_remaining, config) as i32)
    } else {
        0
    };
    stride += i64::from(delta);
    u32::try_from(stride.max(1)).unwrap_or(u32::MAX)
}

pub fn should_move(tick: u64, stride: u32) -> bool {
    tick % stride.max(1) as u64 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::components::Pos;
    use crate::grid::MazeLayout;
    use crate::level::LevelTable;

    fn setup() -> (GameState, LevelConfig) {
        let table = LevelTable::default();
        let state = GameState::new(Arc::new(MazeLayout::classic()), &table, 0);
        let mut config = table.get(1).cloned().expect("level 1");
        config.ghost_base_stride = 3;
        config.elroy_stride_bonus = -1;
        config.elroy_dots = [20, 10];
        (state, config)
    }

    #[test]
    fn elroy_speeds_up_blinky_only() {
        let (mut state, config) = setup();
        let blinky = *state.ghost(GhostKind::Blinky);
        let pinky = *state.ghost(GhostKind::Pinky);

        state.pellets_remaining = 100;
        assert_eq!(ghost_stride(&state, &blinky, Some(&config)), 3);
        state.pellets_remaining = 20;
        assert_eq!(ghost_stride(&state, &blinky, Some(&config)), 2);
        state.pellets_remaining = 10;
        assert_eq!(ghost_stride(&state, &blinky, Some(&config)), 1);
        assert_eq!(ghost_stride(&state, &pinky, Some(&config)), 3);
    }

    #[test]
    fn tunnel_and_frightened_slow_ghosts_down() {
        let (mut state, config) = setup();
        let mut ghost = *state.ghost(GhostKind::Inky);
        ghost.pos = Pos::new(3, 14);
        assert_eq!(ghost_stride(&state, &ghost, Some(&config)), 5);
        state.frightened_ticks = 10;
        assert_eq!(ghost_stride(&state, &ghost, Some(&config)), 6);
    }

    #[test]
    fn eaten_ghosts_are_fast_but_never_below_one() {
        let (state, mut config) = setup();
        let mut ghost = *state.ghost(GhostKind::Clyde);
        ghost.mode = GhostMode::Eaten;
        assert_eq!(ghost_stride(&state, &ghost, Some(&config)), 2);
        config.ghost_eaten_stride_delta = -10;
        assert_eq!(ghost_stride(&state, &ghost, Some(&config)), 1);
    }

    #[test]
    fn extreme_configs_stay_in_range() {
        let (mut state, mut config) = setup();
        let mut clyde = *state.ghost(GhostKind::Clyde);
        config.ghost_base_stride = u32::MAX;
        assert_eq!(ghost_stride(&state, &clyde, Some(&config)), u32::MAX);
        clyde.mode = GhostMode::Eaten;
        assert_eq!(ghost_stride(&state, &clyde, Some(&config)), u32::MAX - 1);

        let blinky = *state.ghost(GhostKind::Blinky);
        config.ghost_base_stride = 3;
        config.elroy_stride_bonus = i32::MIN;
        state.pellets_remaining = 0;
        assert_eq!(ghost_stride(&state, &blinky, Some(&config)), 1);
    }

    #[test]
    fn fallbacks_apply_without_config() {
        let (mut state, _) = setup();
        let blinky = *state.ghost(GhostKind::Blinky);
        assert_eq!(ghost_stride(&state, &blinky, None), DEFAULT_GHOST_STRIDE);
        assert_eq!(pacman_step_ms(&state, None), DEFAULT_PACMAN_STEP_MS);
        state.agent.pos = Pos::new(2, 14);
        assert_eq!(pacman_step_ms(&state, None), DEFAULT_PACMAN_TUNNEL_STEP_MS);
    }

    #[test]
    fn stride_gates_by_tick() {
        assert!(should_move(0, 3));
        assert!(!should_move(1, 3));
        assert!(should_move(6, 3));
        assert!(should_move(5, 1));
    }
}
