use crate::components::{Cell, Direction, Pos};
use crate::error::MapError;
use crate::ghost::GhostKind;

/// The arcade maze. `P` marks the player spawn, `b`/`k`/`i`/`c` the ghost
/// spawns, `-` the house door and `F` the fruit tile.
pub const CLASSIC_MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##    b     ##.######",
    "######.## ###-#### ##.######",
    "######.## #i k c # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##    F     ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P........##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Rectangular row-major maze. Anything outside the bounds reads as wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    tunnel_rows: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        let tunnel_rows = (0..height)
            .map(|y| {
                width > 0
                    && cells[y * width] != Cell::Wall
                    && cells[y * width + width - 1] != Cell::Wall
            })
            .collect();
        Self {
            width,
            height,
            cells,
            tunnel_rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Cell {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize]
        } else {
            Cell::Wall
        }
    }

    pub fn at(&self, pos: Pos) -> Cell {
        self.get(pos.x, pos.y)
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if self.in_bounds(pos.x, pos.y) {
            self.cells[pos.y as usize * self.width + pos.x as usize] = cell;
        }
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Cell::Wall
    }

    /// A tunnel row has open cells on both horizontal edges.
    pub fn is_tunnel_row(&self, y: i32) -> bool {
        y >= 0 && self.tunnel_rows.get(y as usize).copied().unwrap_or(false)
    }

    pub fn pellet_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_pellet()).count()
    }

    /// The tile reached by stepping once from `from`, wrapping horizontally on
    /// tunnel rows. Returns the tile and whether a wrap happened, or `None`
    /// when the step leaves the board without a tunnel.
    pub fn destination(&self, from: Pos, dir: Direction) -> Option<(Pos, bool)> {
        let next = from.offset(dir, 1);
        if self.in_bounds(next.x, next.y) {
            return Some((next, false));
        }
        if !self.is_tunnel_row(from.y) || next.y != from.y {
            return None;
        }
        let w = self.width as i32;
        let wrapped = if next.x == -1 {
            Pos::new(w - 1, next.y)
        } else if next.x == w {
            Pos::new(0, next.y)
        } else {
            return None;
        };
        Some((wrapped, true))
    }
}

/// Ghost house geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct House {
    pub door: Pos,
    /// Tile just outside the door; eaten ghosts head here.
    pub exit: Pos,
    /// Where returning ghosts are placed back inside the pen.
    pub center: Pos,
}

/// An immutable parsed map: the pristine grid plus spawn markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeLayout {
    pub grid: Grid,
    pub agent_spawn: Pos,
    pub agent_facing: Direction,
    /// Indexed by `GhostKind::index`.
    pub ghost_spawns: [Pos; 4],
    pub house: House,
    pub fruit_pos: Pos,
}

impl MazeLayout {
    pub fn classic() -> Self {
        Self::from_rows(&CLASSIC_MAZE).expect("built-in maze is well-formed")
    }

    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let height = rows.len();
        if height == 0 {
            return Err(MapError::Empty);
        }
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut agent = None;
        let mut ghosts: [Option<Pos>; 4] = [None; 4];
        let mut door = None;
        let mut fruit = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' => Cell::Pellet,
                    'o' => Cell::PowerPellet,
                    ' ' => Cell::Empty,
                    '-' => {
                        place(&mut door, pos, ch)?;
                        Cell::Door
                    }
                    'P' => {
                        place(&mut agent, pos, ch)?;
                        Cell::Empty
                    }
                    'F' => {
                        place(&mut fruit, pos, ch)?;
                        Cell::Empty
                    }
                    'b' | 'k' | 'i' | 'c' => {
                        let kind = GhostKind::from_marker(ch).ok_or(MapError::UnknownTile {
                            ch,
                            x,
                            y,
                        })?;
                        place(&mut ghosts[kind.index()], pos, ch)?;
                        Cell::Empty
                    }
                    _ => return Err(MapError::UnknownTile { ch, x, y }),
                };
                cells.push(cell);
            }
        }

        let agent_spawn = agent.ok_or(MapError::MissingMarker('P'))?;
        let door = door.ok_or(MapError::MissingMarker('-'))?;
        let mut ghost_spawns = [Pos::default(); 4];
        for kind in GhostKind::ALL {
            ghost_spawns[kind.index()] =
                ghosts[kind.index()].ok_or(MapError::MissingMarker(kind.marker()))?;
        }

        let grid = Grid::new(width, height, cells);
        let exit = Pos::new(door.x, door.y - 1);
        if matches!(grid.at(exit), Cell::Wall | Cell::Door) {
            return Err(MapError::BlockedExit {
                x: exit.x,
                y: exit.y,
            });
        }
        let house = House {
            door,
            exit,
            center: ghost_spawns[GhostKind::Pinky.index()],
        };

        Ok(Self {
            grid,
            agent_spawn,
            agent_facing: Direction::Left,
            ghost_spawns,
            house,
            fruit_pos: fruit.unwrap_or(agent_spawn),
        })
    }
}

fn place(slot: &mut Option<Pos>, pos: Pos, ch: char) -> Result<(), MapError> {
    if slot.is_some() {
        return Err(MapError::DuplicateMarker { ch });
    }
    *slot = Some(pos);
    Ok(())
}
