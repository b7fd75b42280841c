/// Errors raised while turning an ASCII layout into a maze.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },

    /// A layout without spawn markers cannot produce an initial state.
    #[error("map is missing required marker {0:?}")]
    MissingMarker(char),

    #[error("marker {ch:?} appears more than once")]
    DuplicateMarker { ch: char },

    /// Ghosts leave the house through the tile above the door.
    #[error("house exit ({x}, {y}) above the door is not open")]
    BlockedExit { x: i32, y: i32 },
}

/// Errors raised while loading a level table override.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid level table: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("level table override must contain at least one level")]
    NoLevels,
}
