//! The playing grid.
//!
//! Holds placed tiles, the fixed building locations, the stop signs created
//! during play, and each line's terminal entrances. The outer ring of the
//! grid (outside the playable row/col ranges) is reserved for terminals.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::direction::Direction;
use super::tile::{ConnectionTable, Orientation, PlacedTile, TileCatalog, TERMINAL_TILE};

/// A grid cell. Signed so that stepping off the edge is representable;
/// whether a coordinate is on the grid is a `Board` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The adjacent cell in the given direction.
    pub const fn step(self, d: Direction) -> Coord {
        let (dr, dc) = d.delta();
        Coord { row: self.row + dr, col: self.col + dc }
    }

    pub const fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Direction of travel from `self` into an adjacent `to`.
    pub fn direction_to(self, to: Coord) -> Option<Direction> {
        Direction::between((self.row, self.col), (to.row, to.col))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Coord { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// One end of a line: two adjacent terminal curve cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalEntrance {
    pub cells: [(Coord, Orientation); 2],
}

impl TerminalEntrance {
    /// The coordinate routes start from and end at.
    pub const fn coord(&self) -> Coord {
        self.cells[0].0
    }
}

/// Errors from direct board mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("coordinate ({0}) is off the grid")]
    OutOfBounds(Coord),

    #[error("cannot put a tile on building {1} at ({0})")]
    Building(Coord, String),

    #[error("cannot overwrite terminal at ({0})")]
    Terminal(Coord),

    #[error("cell ({0}) is already occupied")]
    Occupied(Coord),

    #[error("duplicate building id '{0}'")]
    DuplicateBuilding(String),

    #[error("tile catalog has no '{0}' tile for terminals")]
    MissingTerminalTile(&'static str),
}

/// Grid of optional placed tiles plus building and stop-sign bookkeeping.
#[derive(Debug, Clone)]
pub struct Board {
    rows: i32,
    cols: i32,
    playable_rows: (i32, i32),
    playable_cols: (i32, i32),
    grid: Vec<Option<PlacedTile>>,
    catalog: Arc<TileCatalog>,
    building_coords: BTreeMap<String, Coord>,
    coord_to_building: HashMap<Coord, String>,
    building_stop_locations: BTreeMap<String, Coord>,
    stop_to_building: HashMap<Coord, String>,
    terminals: BTreeMap<u8, [TerminalEntrance; 2]>,
}

impl Board {
    /// Creates a board with no tiles, buildings, or terminals.
    ///
    /// `playable_rows` and `playable_cols` are inclusive ranges.
    pub fn empty(
        rows: i32,
        cols: i32,
        playable_rows: (i32, i32),
        playable_cols: (i32, i32),
        catalog: Arc<TileCatalog>,
    ) -> Board {
        let cells = (rows.max(0) * cols.max(0)) as usize;
        Board {
            rows,
            cols,
            playable_rows,
            playable_cols,
            grid: vec![None; cells],
            catalog,
            building_coords: BTreeMap::new(),
            coord_to_building: HashMap::new(),
            building_stop_locations: BTreeMap::new(),
            stop_to_building: HashMap::new(),
            terminals: BTreeMap::new(),
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    fn index(&self, c: Coord) -> Option<usize> {
        self.is_valid_coordinate(c)
            .then(|| (c.row * self.cols + c.col) as usize)
    }

    pub fn is_valid_coordinate(&self, c: Coord) -> bool {
        (0..self.rows).contains(&c.row) && (0..self.cols).contains(&c.col)
    }

    /// True for cells inside the playable interior (not the terminal ring).
    pub fn is_playable_coordinate(&self, c: Coord) -> bool {
        (self.playable_rows.0..=self.playable_rows.1).contains(&c.row)
            && (self.playable_cols.0..=self.playable_cols.1).contains(&c.col)
    }

    /// Iterates every on-grid coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Coord::new(r, c)))
    }

    pub fn get_tile(&self, c: Coord) -> Option<&PlacedTile> {
        self.index(c).and_then(|i| self.grid[i].as_ref())
    }

    /// Writes or clears a cell.
    ///
    /// Building cells never take a tile, and a terminal is only replaced by
    /// another terminal.
    pub fn set_tile(&mut self, c: Coord, tile: Option<PlacedTile>) -> Result<(), BoardError> {
        let idx = self.index(c).ok_or(BoardError::OutOfBounds(c))?;
        if tile.is_some() {
            if let Some(building) = self.coord_to_building.get(&c) {
                return Err(BoardError::Building(c, building.clone()));
            }
        }
        if let (Some(existing), Some(new)) = (&self.grid[idx], &tile) {
            if existing.is_terminal && !new.is_terminal {
                log::warn!("refusing to overwrite terminal at ({})", c);
                return Err(BoardError::Terminal(c));
            }
        }
        self.grid[idx] = tile;
        Ok(())
    }

    /// Effective connections of a placed tile.
    pub fn connections_of(&self, tile: &PlacedTile) -> &ConnectionTable {
        self.catalog[tile.kind].connections_at(tile.orientation)
    }

    /// Registers a building. The cell must be on the grid and empty.
    pub fn add_building(&mut self, id: impl Into<String>, c: Coord) -> Result<(), BoardError> {
        let id = id.into();
        let idx = self.index(c).ok_or(BoardError::OutOfBounds(c))?;
        if self.building_coords.contains_key(&id) {
            return Err(BoardError::DuplicateBuilding(id));
        }
        if self.grid[idx].is_some() || self.coord_to_building.contains_key(&c) {
            return Err(BoardError::Occupied(c));
        }
        self.coord_to_building.insert(c, id.clone());
        self.building_coords.insert(id, c);
        Ok(())
    }

    pub fn get_building_at(&self, c: Coord) -> Option<&str> {
        self.coord_to_building.get(&c).map(String::as_str)
    }

    pub fn building_coords(&self) -> &BTreeMap<String, Coord> {
        &self.building_coords
    }

    /// Building id -> coordinate of the stop sign serving it.
    pub fn building_stop_locations(&self) -> &BTreeMap<String, Coord> {
        &self.building_stop_locations
    }

    pub fn has_stop_for(&self, building: &str) -> bool {
        self.building_stop_locations.contains_key(building)
    }

    /// The building served by a stop sign at `c`, if any.
    pub fn stop_building_at(&self, c: Coord) -> Option<&str> {
        self.stop_to_building.get(&c).map(String::as_str)
    }

    pub fn is_stop(&self, c: Coord) -> bool {
        self.stop_to_building.contains_key(&c)
    }

    /// Flags the tile at `c` as a stop sign serving `building`.
    ///
    /// Returns false (and changes nothing) if `c` holds no tile.
    pub(crate) fn record_stop_sign(&mut self, building: &str, c: Coord) -> bool {
        let Some(idx) = self.index(c) else { return false };
        let Some(tile) = self.grid[idx].as_mut() else { return false };
        tile.has_stop_sign = true;
        self.building_stop_locations.insert(building.to_string(), c);
        self.stop_to_building.insert(c, building.to_string());
        true
    }

    /// Places the four terminal curve tiles of a line.
    pub fn add_terminal_line(
        &mut self,
        line: u8,
        entrances: [TerminalEntrance; 2],
    ) -> Result<(), BoardError> {
        let curve = self
            .catalog
            .id(TERMINAL_TILE)
            .ok_or(BoardError::MissingTerminalTile(TERMINAL_TILE))?;
        for entrance in &entrances {
            for &(c, orientation) in &entrance.cells {
                self.set_tile(c, Some(PlacedTile::terminal(curve, orientation)))?;
            }
        }
        self.terminals.insert(line, entrances);
        Ok(())
    }

    /// The two terminal coordinates of a line.
    pub fn terminal_coords(&self, line: u8) -> Option<(Coord, Coord)> {
        self.terminals.get(&line).map(|[a, b]| (a.coord(), b.coord()))
    }

    pub fn terminal_entrances(&self, line: u8) -> Option<&[TerminalEntrance; 2]> {
        self.terminals.get(&line)
    }

    /// Line numbers in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = u8> + '_ {
        self.terminals.keys().copied()
    }

    /// Terminal coordinates of every line.
    pub fn all_terminal_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.terminals.values().flat_map(|[a, b]| [a.coord(), b.coord()])
    }

    pub fn is_terminal_coord(&self, c: Coord) -> bool {
        self.all_terminal_coords().any(|t| t == c)
    }
}
