use crate::components::Cell;
use crate::level::{ms_to_ticks, FruitKind, LevelConfig};
use crate::state::{AudioEvent, FruitInstance, GameState};

pub const PELLET_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
/// How long an uncollected fruit stays on the board.
pub const FRUIT_LIFETIME_TICKS: u64 = 119;

const DEFAULT_FRIGHTENED_TICKS: u32 = 75;
const DEFAULT_FRUIT_DOTS: [u32; 2] = [70, 170];
const DEFAULT_FRUIT_SCORE: u32 = 100;

/// Eats whatever is under the agent, then tries to pick up a fruit.
pub fn consume_if_any(mut state: GameState, config: Option<&LevelConfig>) -> GameState {
    let pos = state.agent.pos;
    let cell = state.grid.at(pos);
    if cell.is_pellet() {
        state.grid.set(pos, Cell::Empty);
        state.pellets_remaining = state.pellets_remaining.saturating_sub(1);
        state.dots_eaten += 1;
        for ghost in state.ghosts.iter_mut().filter(|g| g.in_pen) {
            ghost.dot_counter += 1;
        }

        if cell == Cell::PowerPellet {
            state.score += POWER_PELLET_SCORE;
            state.frightened_ticks =
                config.map_or(DEFAULT_FRIGHTENED_TICKS, |c| ms_to_ticks(c.frightened_ms));
            state.ghost_chain = 0;
            state.audio_event = Some(AudioEvent::PowerPellet);
            log::debug!("frightened for {} ticks", state.frightened_ticks);
        } else {
            state.score += PELLET_SCORE;
            state.audio_event = Some(AudioEvent::Pellet);
        }
        state = spawn_fruit_if_due(state, config);
    }
    collect_fruit(state, config)
}

fn spawn_fruit_if_due(mut state: GameState, config: Option<&LevelConfig>) -> GameState {
    let thresholds = config.map_or(DEFAULT_FRUIT_DOTS, |c| c.fruit_dots);
    let dots = state.dots_eaten;
    if !thresholds.contains(&dots) || state.fruits.iter().any(|f| f.spawn_dots == dots) {
        return state;
    }
    let kind = config.map_or(FruitKind::Cherry, |c| c.fruit);
    log::debug!("{:?} appears after {} dots", kind, dots);
    state.fruits.push(FruitInstance {
        kind,
        spawn_tick: state.tick,
        spawn_dots: dots,
        collected: false,
    });
    state
}

fn collect_fruit(mut state: GameState, config: Option<&LevelConfig>) -> GameState {
    if state.agent.pos != state.layout.fruit_pos {
        return state;
    }
    if let Some(fruit) = state.fruits.iter_mut().find(|f| !f.collected) {
        fruit.collected = true;
        let points = config.map_or(DEFAULT_FRUIT_SCORE, |c| c.fruit_score);
        state.score += points;
        state.audio_event = Some(AudioEvent::Fruit);
        log::debug!("{:?} collected for {}", fruit.kind, points);
    }
    state
}

/// Drops collected fruit and fruit past its lifetime.
pub fn expire_fruits(mut state: GameState) -> GameState {
    let now = state.tick;
    state
        .fruits
        .retain(|f| !f.collected && now.saturating_sub(f.spawn_tick) < FRUIT_LIFETIME_TICKS);
    state
}
