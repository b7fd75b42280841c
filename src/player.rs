use crate::components::{Cell, Direction, Pos};
use crate::grid::{Grid, MazeLayout};
use crate::state::GameState;

/// The player-controlled character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub pos: Pos,
    pub facing: Direction,
    /// Buffered turn, taken as soon as it is legal. Only used by continuous
    /// movement.
    pub queued: Option<Direction>,
}

impl Agent {
    pub fn spawn(layout: &MazeLayout) -> Self {
        Self {
            pos: layout.agent_spawn,
            facing: layout.agent_facing,
            queued: None,
        }
    }

    /// Where a step in `dir` would land, or `None` if it is blocked.
    pub fn destination(&self, grid: &Grid, dir: Direction) -> Option<Pos> {
        let (dest, _) = grid.destination(self.pos, dir)?;
        if blocks_agent(grid.at(dest)) {
            None
        } else {
            Some(dest)
        }
    }

    /// Moves one tile if possible; always turns to face `dir`.
    pub fn moved(self, grid: &Grid, dir: Direction) -> Self {
        Self {
            pos: self.destination(grid, dir).unwrap_or(self.pos),
            facing: dir,
            ..self
        }
    }
}

fn blocks_agent(cell: Cell) -> bool {
    matches!(cell, Cell::Wall | Cell::Door)
}

/// One input-driven move. Bumping a wall only changes facing.
pub fn attempt_move(mut state: GameState, dir: Direction) -> GameState {
    state.agent = state.agent.moved(&state.grid, dir);
    state
}

/// Momentum movement: keep going the way we face, taking the buffered turn
/// the first tick it opens up.
pub fn continuous_move(mut state: GameState, input: Option<Direction>) -> GameState {
    let mut agent = state.agent;
    if input.is_some() {
        agent.queued = input;
    }
    if let Some(turn) = agent.queued {
        if agent.destination(&state.grid, turn).is_some() {
            agent = agent.moved(&state.grid, turn);
            agent.queued = None;
            state.agent = agent;
            return state;
        }
    }
    if let Some(dest) = agent.destination(&state.grid, agent.facing) {
        agent.pos = dest;
    }
    state.agent = agent;
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::level::LevelTable;

    const ROWS: [&str; 6] = [
        "#######",
        "#.....#",
        "#b#-#.#",
        "#ikc#.#",
        ".P....#",
        "#######",
    ];

    fn state() -> GameState {
        let layout = MazeLayout::from_rows(&ROWS).expect("test map");
        GameState::new(Arc::new(layout), &LevelTable::default(), 0)
    }

    #[test]
    fn wall_bump_turns_without_moving() {
        let s = state();
        let after = attempt_move(s.clone(), Direction::Down);
        assert_eq!(after.agent.pos, s.agent.pos);
        assert_eq!(after.agent.facing, Direction::Down);
    }

    #[test]
    fn open_move_steps_and_faces() {
        let after = attempt_move(state(), Direction::Right);
        assert_eq!(after.agent.pos, Pos::new(2, 4));
        assert_eq!(after.agent.facing, Direction::Right);
    }

    #[test]
    fn door_blocks_the_agent() {
        let mut s = state();
        s.agent.pos = Pos::new(3, 3);
        let after = attempt_move(s.clone(), Direction::Up);
        assert_eq!(after.agent.pos, s.agent.pos);
        assert_eq!(s.grid.at(Pos::new(3, 2)), Cell::Door);
    }

    #[test]
    fn continuous_buffers_a_turn_until_it_opens() {
        let mut s = state();
        s.agent.pos = Pos::new(4, 4);
        s.agent.facing = Direction::Right;
        s = continuous_move(s, Some(Direction::Up));
        assert_eq!(s.agent.pos, Pos::new(5, 4));
        assert_eq!(s.agent.queued, Some(Direction::Up));
        s = continuous_move(s, None);
        assert_eq!(s.agent.pos, Pos::new(5, 3));
        assert_eq!(s.agent.facing, Direction::Up);
        assert_eq!(s.agent.queued, None);
    }
}
