use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::components::{Cell, Direction, Pos};
use crate::game::FrightenedMovement;
use crate::grid::{Grid, MazeLayout};
use crate::level::{GlobalMode, LevelConfig};
use crate::release::should_release_ghost;
use crate::speed::{ghost_stride, should_move};
use crate::state::GameState;
use crate::targeting::target_tile_for_ghost;

/// Bonus for the n-th ghost eaten in one frightened window, as a multiple
/// of the base score.
const EAT_MULTIPLIERS: [u32; 4] = [1, 2, 4, 8];
const DEFAULT_GHOST_EAT_SCORE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    /// Update order. Inky reads Blinky, so Blinky comes first.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn index(self) -> usize {
        match self {
            GhostKind::Blinky => 0,
            GhostKind::Pinky => 1,
            GhostKind::Inky => 2,
            GhostKind::Clyde => 3,
        }
    }

    pub fn marker(self) -> char {
        match self {
            GhostKind::Blinky => 'b',
            GhostKind::Pinky => 'k',
            GhostKind::Inky => 'i',
            GhostKind::Clyde => 'c',
        }
    }

    pub fn from_marker(ch: char) -> Option<Self> {
        GhostKind::ALL.into_iter().find(|k| k.marker() == ch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
    /// Eyes heading back to the house. Harmless and cannot be eaten again.
    Eaten,
}

impl From<GlobalMode> for GhostMode {
    fn from(mode: GlobalMode) -> Self {
        match mode {
            GlobalMode::Scatter => GhostMode::Scatter,
            GlobalMode::Chase => GhostMode::Chase,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Pos,
    pub facing: Direction,
    pub mode: GhostMode,
    pub in_pen: bool,
    /// Dots eaten while this ghost waited in the pen.
    pub dot_counter: u32,
    pub eyes_only: bool,
    /// Set on the tick the ghost went through a tunnel edge.
    pub just_wrapped: bool,
}

impl Ghost {
    pub fn spawn(kind: GhostKind, layout: &MazeLayout) -> Self {
        let in_pen = kind != GhostKind::Blinky;
        Self {
            kind,
            pos: layout.ghost_spawns[kind.index()],
            facing: if in_pen { Direction::Up } else { Direction::Left },
            mode: GhostMode::Scatter,
            in_pen,
            dot_counter: 0,
            eyes_only: false,
            just_wrapped: false,
        }
    }

    fn is_hostile(&self) -> bool {
        matches!(self.mode, GhostMode::Scatter | GhostMode::Chase)
    }
}

/// Per-tick inputs to the ghost pass that do not live in the state.
#[derive(Debug, Clone, Copy)]
pub struct GhostContext<'a> {
    pub config: Option<&'a LevelConfig>,
    pub global: GlobalMode,
    pub frightened: FrightenedMovement,
}

/// Result of moving every ghost once.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostPass {
    pub ghosts: [Ghost; 4],
    pub score_gained: u32,
    pub chain: u32,
    pub ghosts_eaten: u32,
    /// The ghost that caught the agent, if any. Remaining ghosts were not
    /// updated.
    pub death_by: Option<GhostKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    None,
    Eat,
    Kill,
    /// Hostile contact during respawn protection.
    Shielded,
}

fn contact(ghost: &Ghost, agent: Pos, protected: bool) -> Contact {
    if ghost.pos != agent {
        return Contact::None;
    }
    match ghost.mode {
        GhostMode::Frightened => Contact::Eat,
        GhostMode::Eaten => Contact::None,
        GhostMode::Scatter | GhostMode::Chase if protected => Contact::Shielded,
        GhostMode::Scatter | GhostMode::Chase => Contact::Kill,
    }
}

/// Mode a ghost should be in this tick.
pub fn resolve_mode(current: GhostMode, frightened_ticks: u32, global: GlobalMode) -> GhostMode {
    match current {
        GhostMode::Eaten => GhostMode::Eaten,
        _ if frightened_ticks > 0 => GhostMode::Frightened,
        _ => global.into(),
    }
}

/// Score for eating one more ghost after `chain` already this window.
pub fn eat_bonus(chain: u32, config: Option<&LevelConfig>) -> u32 {
    let base = config.map_or(DEFAULT_GHOST_EAT_SCORE, |c| c.ghost_eat_base_score);
    base * EAT_MULTIPLIERS[(chain as usize).min(EAT_MULTIPLIERS.len() - 1)]
}

/// Legal single-step moves in tie-break order.
fn legal_moves(grid: &Grid, ghost: &Ghost) -> Vec<(Direction, Pos, bool)> {
    Direction::PRIORITY
        .into_iter()
        .filter_map(|dir| {
            let (dest, wrapped) = grid.destination(ghost.pos, dir)?;
            match grid.at(dest) {
                Cell::Wall => None,
                Cell::Door if ghost.mode != GhostMode::Eaten => None,
                _ => Some((dir, dest, wrapped)),
            }
        })
        .collect()
}

/// Picks the move whose landing tile is closest to `target`, never reversing
/// unless forced. Ties go to the earlier direction in up, left, down, right.
pub fn choose_move(
    grid: &Grid,
    ghost: &Ghost,
    target: Pos,
    rng: Option<&mut StdRng>,
) -> Option<(Direction, Pos, bool)> {
    let moves = legal_moves(grid, ghost);
    let forward: Vec<_> = moves
        .iter()
        .copied()
        .filter(|(dir, _, _)| *dir != ghost.facing.opposite())
        .collect();
    let candidates = if forward.is_empty() { moves } else { forward };

    if let Some(rng) = rng {
        return candidates.choose(rng).copied();
    }
    candidates.into_iter().fold(None, |best, m| match best {
        Some(b) if b.1.dist_sq(target) <= m.1.dist_sq(target) => Some(b),
        _ => Some(m),
    })
}

fn nudge_toward_exit(ghost: &mut Ghost, exit: Pos) {
    if ghost.pos != exit {
        let dir = if ghost.pos.x < exit.x {
            Direction::Right
        } else if ghost.pos.x > exit.x {
            Direction::Left
        } else {
            Direction::Up
        };
        ghost.pos = ghost.pos.offset(dir, 1);
        ghost.facing = dir;
    }
    if ghost.pos == exit {
        ghost.in_pen = false;
        ghost.dot_counter = 0;
        ghost.facing = Direction::Left;
    }
}

fn frightened_rng(state: &GameState, kind: GhostKind) -> StdRng {
    let salt = state.tick.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ kind.index() as u64;
    StdRng::seed_from_u64(state.seed ^ salt)
}

fn eat(ghost: &mut Ghost, pass: &mut GhostPass, config: Option<&LevelConfig>) {
    let bonus = eat_bonus(pass.chain, config);
    ghost.mode = GhostMode::Eaten;
    ghost.eyes_only = true;
    pass.score_gained += bonus;
    pass.chain += 1;
    pass.ghosts_eaten += 1;
    log::debug!("{:?} eaten for {}", ghost.kind, bonus);
}

/// Moves every ghost once. Stops at the first ghost that catches the agent.
pub fn step_ghosts(state: &GameState, ctx: &GhostContext<'_>) -> GhostPass {
    let house = state.layout.house;
    let agent = state.agent;
    let protected = state.respawn_protection > 0;
    // Targets read positions from the start of the tick.
    let blinky = state.ghost(GhostKind::Blinky).pos;

    let mut pass = GhostPass {
        ghosts: state.ghosts,
        score_gained: 0,
        chain: state.ghost_chain,
        ghosts_eaten: 0,
        death_by: None,
    };

    for kind in GhostKind::ALL {
        let mut ghost = pass.ghosts[kind.index()];
        ghost.just_wrapped = false;
        ghost.mode = resolve_mode(ghost.mode, state.frightened_ticks, ctx.global);

        if !should_move(state.tick, ghost_stride(state, &ghost, ctx.config)) {
            pass.ghosts[kind.index()] = ghost;
            continue;
        }

        match contact(&ghost, agent.pos, protected) {
            Contact::Kill => {
                pass.ghosts[kind.index()] = ghost;
                pass.death_by = Some(kind);
                return pass;
            }
            Contact::Shielded => {
                pass.ghosts[kind.index()] = ghost;
                continue;
            }
            Contact::Eat => eat(&mut ghost, &mut pass, ctx.config),
            Contact::None => {}
        }

        if ghost.in_pen {
            if !should_release_ghost(state, &ghost, ctx.config) {
                pass.ghosts[kind.index()] = ghost;
                continue;
            }
            nudge_toward_exit(&mut ghost, house.exit);
        } else {
            let target =
                target_tile_for_ghost(&ghost, ctx.global, &agent, blinky, &state.grid, house.exit);
            let mut rng = (ghost.mode == GhostMode::Frightened
                && ctx.frightened == FrightenedMovement::Random)
                .then(|| frightened_rng(state, kind));
            if let Some((dir, dest, wrapped)) =
                choose_move(&state.grid, &ghost, target, rng.as_mut())
            {
                ghost.pos = dest;
                ghost.facing = dir;
                ghost.just_wrapped = wrapped;
            }
        }

        match contact(&ghost, agent.pos, protected) {
            Contact::Kill => {
                pass.ghosts[kind.index()] = ghost;
                pass.death_by = Some(kind);
                return pass;
            }
            Contact::Eat => eat(&mut ghost, &mut pass, ctx.config),
            Contact::None | Contact::Shielded => {}
        }

        if ghost.mode == GhostMode::Eaten && ghost.pos.manhattan(house.exit) <= 1 {
            ghost.mode = ctx.global.into();
            ghost.eyes_only = false;
            ghost.in_pen = true;
            ghost.pos = house.center;
            ghost.facing = Direction::Up;
            ghost.dot_counter = 0;
            log::debug!("{:?} back in the house", kind);
        }

        pass.ghosts[kind.index()] = ghost;
    }
    pass
}
