//! Target tile selection, one rule per ghost.

use crate::components::{Direction, Pos};
use crate::ghost::{Ghost, GhostKind, GhostMode};
use crate::grid::Grid;
use crate::level::GlobalMode;
use crate::player::Agent;

const PINKY_LOOKAHEAD: i32 = 4;
const INKY_PIVOT: i32 = 2;
/// Clyde gives up the chase inside this radius (squared tiles).
const CLYDE_SHY_DIST_SQ: i64 = 8 * 8;

/// Fixed off-board corner each ghost heads for while scattering.
pub fn scatter_corner(kind: GhostKind, grid: &Grid) -> Pos {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    match kind {
        GhostKind::Blinky => Pos::new(w - 3, -3),
        GhostKind::Pinky => Pos::new(2, -3),
        GhostKind::Inky => Pos::new(w - 1, h),
        GhostKind::Clyde => Pos::new(0, h),
    }
}

/// Four tiles ahead of the agent. Facing up also shifts four tiles left,
/// as the arcade board does.
pub fn pinky_chase_target(agent: &Agent) -> Pos {
    let ahead = agent.pos.offset(agent.facing, PINKY_LOOKAHEAD);
    if agent.facing == Direction::Up {
        ahead.offset(Direction::Left, PINKY_LOOKAHEAD)
    } else {
        ahead
    }
}

/// Pivot two tiles ahead of the agent, then double Blinky's vector to it.
pub fn inky_chase_target(agent: &Agent, blinky: Pos) -> Pos {
    let pivot = agent.pos.offset(agent.facing, INKY_PIVOT);
    Pos::new(2 * pivot.x - blinky.x, 2 * pivot.y - blinky.y)
}

pub fn clyde_chase_target(agent: &Agent, clyde: Pos, grid: &Grid) -> Pos {
    if clyde.dist_sq(agent.pos) > CLYDE_SHY_DIST_SQ {
        agent.pos
    } else {
        scatter_corner(GhostKind::Clyde, grid)
    }
}

/// Target for `ghost`. `blinky` is Blinky's position at the start of the
/// tick. Frightened ghosts still get their nominal target; eaten ones go
/// home.
pub fn target_tile_for_ghost(
    ghost: &Ghost,
    global: GlobalMode,
    agent: &Agent,
    blinky: Pos,
    grid: &Grid,
    home: Pos,
) -> Pos {
    if ghost.mode == GhostMode::Eaten {
        return home;
    }
    if global == GlobalMode::Scatter {
        return scatter_corner(ghost.kind, grid);
    }
    match ghost.kind {
        GhostKind::Blinky => agent.pos,
        GhostKind::Pinky => pinky_chase_target(agent),
        GhostKind::Inky => inky_chase_target(agent, blinky),
        GhostKind::Clyde => clyde_chase_target(agent, ghost.pos, grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MazeLayout;

    fn agent_at(x: i32, y: i32, facing: Direction) -> Agent {
        Agent {
            pos: Pos::new(x, y),
            facing,
            queued: None,
        }
    }

    #[test]
    fn pinky_reproduces_the_up_overflow() {
        let up = agent_at(10, 20, Direction::Up);
        assert_eq!(pinky_chase_target(&up), Pos::new(6, 16));
        let left = agent_at(10, 20, Direction::Left);
        assert_eq!(pinky_chase_target(&left), Pos::new(6, 20));
        let down = agent_at(10, 20, Direction::Down);
        assert_eq!(pinky_chase_target(&down), Pos::new(10, 24));
    }

    #[test]
    fn inky_doubles_blinkys_vector() {
        let agent = agent_at(10, 10, Direction::Right);
        assert_eq!(inky_chase_target(&agent, Pos::new(8, 6)), Pos::new(16, 14));
    }

    #[test]
    fn clyde_retreats_when_close() {
        let grid = MazeLayout::classic().grid;
        let agent = agent_at(10, 10, Direction::Left);
        assert_eq!(clyde_chase_target(&agent, Pos::new(10, 19), &grid), agent.pos);
        assert_eq!(
            clyde_chase_target(&agent, Pos::new(10, 18), &grid),
            scatter_corner(GhostKind::Clyde, &grid)
        );
    }

    #[test]
    fn eaten_overrides_everything_and_scatter_uses_corners() {
        let layout = MazeLayout::classic();
        let agent = agent_at(1, 1, Direction::Left);
        let mut ghost = Ghost::spawn(GhostKind::Inky, &layout);
        let home = layout.house.exit;

        let scatter =
            target_tile_for_ghost(&ghost, GlobalMode::Scatter, &agent, home, &layout.grid, home);
        assert_eq!(scatter, scatter_corner(GhostKind::Inky, &layout.grid));

        ghost.mode = GhostMode::Eaten;
        let eaten =
            target_tile_for_ghost(&ghost, GlobalMode::Chase, &agent, home, &layout.grid, home);
        assert_eq!(eaten, home);
    }
}
