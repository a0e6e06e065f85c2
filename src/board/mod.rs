//! Board representation.
//!
//! Contains the core data structures for directions, tile kinds and their
//! connection tables, and the grid of placed tiles with its building,
//! stop-sign, and terminal bookkeeping.

pub mod direction;
pub mod grid;
pub mod tile;

pub use direction::{Direction, InvalidInput, ALL_DIRECTIONS};
pub use grid::{Board, BoardError, Coord, TerminalEntrance};
pub use tile::{
    CatalogError, ConnectionTable, EdgeSet, Orientation, PairSet, PlacedTile, TileCatalog,
    TileDefinition, TileId, TileKind, ALL_ORIENTATIONS, EDGE_PAIRS, TERMINAL_TILE,
};
