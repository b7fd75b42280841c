use crate::ghost::{Ghost, GhostKind};
use crate::level::{default_release_dots, LevelConfig};
use crate::state::GameState;

/// Whether a penned ghost may leave. Blinky never waits.
pub fn should_release_ghost(
    state: &GameState,
    ghost: &Ghost,
    config: Option<&LevelConfig>,
) -> bool {
    let dots = config.map_or_else(|| default_release_dots(state.level), |c| c.release_dots);
    let threshold = match ghost.kind {
        GhostKind::Blinky => return true,
        GhostKind::Pinky => dots.pinky,
        GhostKind::Inky => dots.inky,
        GhostKind::Clyde => dots.clyde,
    };
    state.dots_eaten >= threshold
}
