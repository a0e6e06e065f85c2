//! Level files.
//!
//! A level fixes the grid size, the playable interior, the building
//! locations, and the terminal entrances of every line. Levels are JSON:
//!
//! ```json
//! {
//!   "level_name": "Classic", "author": "...",
//!   "grid_rows": 14, "grid_cols": 14,
//!   "playable_rows": [1, 12], "playable_cols": [1, 12],
//!   "building_coords": { "A": [8, 12] },
//!   "terminal_data": { "1": [[[[6, 0], 90], [[7, 0], 0]], [[[2, 13], 180], [[3, 13], 270]]] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{
    Board, BoardError, Coord, InvalidInput, Orientation, TerminalEntrance, TileCatalog,
};

/// One terminal cell: `[[row, col], degrees]`.
pub type TerminalCell = ((i32, i32), i32);

/// Both entrances of a line, two cells each.
pub type LineTerminals = [[TerminalCell; 2]; 2];

/// Errors loading or validating a level.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("cannot read level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("grid {0}x{1} is empty")]
    EmptyGrid(i32, i32),

    #[error("playable area rows {0:?} cols {1:?} does not fit inside the grid")]
    PlayableArea((i32, i32), (i32, i32)),

    #[error("building {0} at ({1}) is outside the playable area")]
    BuildingOutside(String, Coord),

    #[error("terminal of line {0} at ({1}) is off the grid")]
    TerminalOffGrid(u8, Coord),

    #[error("terminal of line {0}: {1}")]
    TerminalOrientation(u8, InvalidInput),

    #[error("level defines no lines")]
    NoLines,

    #[error(transparent)]
    Board(#[from] BoardError),
}

fn unknown_author() -> String {
    "Unknown".to_string()
}

/// A parsed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub level_name: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    pub grid_rows: i32,
    pub grid_cols: i32,
    pub playable_rows: (i32, i32),
    pub playable_cols: (i32, i32),
    pub building_coords: BTreeMap<String, (i32, i32)>,
    pub terminal_data: BTreeMap<u8, LineTerminals>,
}

impl Level {
    /// The standard 12x12 city with six lines.
    pub fn classic() -> Level {
        let buildings = [
            ("A", (8, 12)),
            ("B", (11, 9)),
            ("C", (12, 5)),
            ("D", (8, 2)),
            ("E", (5, 1)),
            ("F", (2, 4)),
            ("G", (1, 8)),
            ("H", (4, 11)),
            ("I", (6, 9)),
            ("K", (9, 7)),
            ("L", (7, 4)),
            ("M", (4, 6)),
        ];
        let terminals: [(u8, LineTerminals); 6] = [
            (1, [[((6, 0), 90), ((7, 0), 0)], [((2, 13), 180), ((3, 13), 270)]]),
            (2, [[((10, 0), 90), ((11, 0), 0)], [((6, 13), 180), ((7, 13), 270)]]),
            (3, [[((2, 0), 90), ((3, 0), 0)], [((10, 13), 180), ((11, 13), 270)]]),
            (4, [[((0, 6), 90), ((0, 7), 180)], [((13, 10), 0), ((13, 11), 270)]]),
            (5, [[((0, 2), 90), ((0, 3), 180)], [((13, 6), 0), ((13, 7), 270)]]),
            (6, [[((0, 10), 90), ((0, 11), 180)], [((13, 2), 0), ((13, 3), 270)]]),
        ];
        Level {
            level_name: "Classic".to_string(),
            author: "Linie 1".to_string(),
            grid_rows: 14,
            grid_cols: 14,
            playable_rows: (1, 12),
            playable_cols: (1, 12),
            building_coords: buildings.iter().map(|(id, rc)| (id.to_string(), *rc)).collect(),
            terminal_data: terminals.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Level, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Reads and validates a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Level, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!("loaded level '{}' from {}", level.level_name, path.display());
        Ok(level)
    }

    fn on_grid(&self, c: Coord) -> bool {
        (0..self.grid_rows).contains(&c.row) && (0..self.grid_cols).contains(&c.col)
    }

    /// Checks the level's structure without building a board.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.grid_rows <= 0 || self.grid_cols <= 0 {
            return Err(LevelError::EmptyGrid(self.grid_rows, self.grid_cols));
        }
        let fits = |(lo, hi): (i32, i32), n: i32| 0 <= lo && lo <= hi && hi < n;
        if !fits(self.playable_rows, self.grid_rows) || !fits(self.playable_cols, self.grid_cols) {
            return Err(LevelError::PlayableArea(self.playable_rows, self.playable_cols));
        }
        for (id, &rc) in &self.building_coords {
            let c = Coord::from(rc);
            let (rows, cols) = (self.playable_rows, self.playable_cols);
            if !(rows.0..=rows.1).contains(&c.row) || !(cols.0..=cols.1).contains(&c.col) {
                return Err(LevelError::BuildingOutside(id.clone(), c));
            }
        }
        if self.terminal_data.is_empty() {
            return Err(LevelError::NoLines);
        }
        for (&line, entrances) in &self.terminal_data {
            for &(rc, degrees) in entrances.iter().flatten() {
                let c = Coord::from(rc);
                if !self.on_grid(c) {
                    return Err(LevelError::TerminalOffGrid(line, c));
                }
                Orientation::from_degrees(degrees)
                    .map_err(|e| LevelError::TerminalOrientation(line, e))?;
            }
        }
        Ok(())
    }

    /// Builds an empty board for this level: buildings placed, terminal
    /// tiles laid, no track.
    pub fn build_board(&self, catalog: Arc<TileCatalog>) -> Result<Board, LevelError> {
        self.validate()?;
        let mut board = Board::empty(
            self.grid_rows,
            self.grid_cols,
            self.playable_rows,
            self.playable_cols,
            catalog,
        );
        for (id, &rc) in &self.building_coords {
            board.add_building(id.as_str(), Coord::from(rc))?;
        }
        for (&line, entrances) in &self.terminal_data {
            let entrance = |cells: &[TerminalCell; 2]| -> Result<TerminalEntrance, LevelError> {
                let cell = |(rc, deg): TerminalCell| {
                    Orientation::from_degrees(deg)
                        .map(|o| (Coord::from(rc), o))
                        .map_err(|e| LevelError::TerminalOrientation(line, e))
                };
                Ok(TerminalEntrance { cells: [cell(cells[0])?, cell(cells[1])?] })
            };
            board.add_terminal_line(line, [entrance(&entrances[0])?, entrance(&entrances[1])?])?;
        }
        log::debug!(
            "built board for '{}': {} buildings, {} lines",
            self.level_name,
            self.building_coords.len(),
            self.terminal_data.len()
        );
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = include_str!("../../levels/tiny.json");
    const CLASSIC: &str = include_str!("../../levels/classic.json");

    #[test]
    fn classic_file_matches_builtin() {
        assert_eq!(Level::from_json(CLASSIC).unwrap(), Level::classic());
    }

    #[test]
    fn classic_board_layout() {
        let board = Level::classic().build_board(Arc::new(TileCatalog::standard())).unwrap();
        assert_eq!(board.lines().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(board.terminal_coords(1), Some((Coord::new(6, 0), Coord::new(2, 13))));
        assert_eq!(board.terminal_coords(5), Some((Coord::new(0, 2), Coord::new(13, 6))));
        assert_eq!(board.get_building_at(Coord::new(4, 6)), Some("M"));
        assert_eq!(board.building_coords().len(), 12);

        let t = board.get_tile(Coord::new(6, 0)).unwrap();
        assert!(t.is_terminal);
        assert_eq!(t.orientation, Orientation::Deg90);
        // Each entrance is a U-turn: the two curves face each other.
        let a = board.connections_of(board.get_tile(Coord::new(0, 6)).unwrap());
        let b = board.connections_of(board.get_tile(Coord::new(0, 7)).unwrap());
        assert!(a.has_edge(crate::board::Direction::E));
        assert!(b.has_edge(crate::board::Direction::W));
    }

    #[test]
    fn tiny_level_parses() {
        let level = Level::from_json(TINY).unwrap();
        assert_eq!(level.grid_rows, 5);
        assert_eq!(level.building_coords.get("A"), Some(&(1, 2)));
        let board = level.build_board(Arc::new(TileCatalog::standard())).unwrap();
        assert_eq!(board.terminal_coords(1), Some((Coord::new(0, 3), Coord::new(4, 3))));
        let [top, bottom] = board.terminal_entrances(1).unwrap();
        assert_eq!(top.cells[1], (Coord::new(0, 4), Orientation::Deg180));
        assert_eq!(bottom.cells[1], (Coord::new(4, 4), Orientation::Deg270));
    }

    #[test]
    fn author_defaults_when_missing() {
        let json = r#"{
            "level_name": "x", "grid_rows": 4, "grid_cols": 4,
            "playable_rows": [1, 2], "playable_cols": [1, 2],
            "building_coords": {},
            "terminal_data": {"1": [[[[0, 1], 90], [[0, 2], 180]], [[[3, 1], 0], [[3, 2], 270]]]}
        }"#;
        assert_eq!(Level::from_json(json).unwrap().author, "Unknown");
    }

    #[test]
    fn validation_errors() {
        let mut level = Level::classic();
        level.playable_rows = (1, 14);
        assert!(matches!(level.validate(), Err(LevelError::PlayableArea(..))));

        let mut level = Level::classic();
        level.building_coords.insert("Z".into(), (0, 0));
        assert!(matches!(level.validate(), Err(LevelError::BuildingOutside(id, _)) if id == "Z"));

        let mut level = Level::classic();
        level.terminal_data.get_mut(&2).unwrap()[0][1].1 = 45;
        assert!(matches!(
            level.validate(),
            Err(LevelError::TerminalOrientation(2, InvalidInput::Orientation(45)))
        ));

        let mut level = Level::classic();
        level.terminal_data.get_mut(&3).unwrap()[1][0].0 = (20, 0);
        assert!(matches!(level.validate(), Err(LevelError::TerminalOffGrid(3, _))));

        let mut level = Level::classic();
        level.terminal_data.clear();
        assert!(matches!(level.validate(), Err(LevelError::NoLines)));

        let mut level = Level::classic();
        level.grid_cols = 0;
        assert!(matches!(level.validate(), Err(LevelError::EmptyGrid(14, 0))));
    }

    #[test]
    fn bad_json_and_missing_file() {
        assert!(matches!(Level::from_json("{"), Err(LevelError::Json(_))));
        assert!(matches!(
            Level::from_json(r#"{"level_name": "x"}"#),
            Err(LevelError::Json(_))
        ));
        assert!(matches!(
            Level::load("/nonexistent/level.json"),
            Err(LevelError::Io { .. })
        ));
    }

    #[test]
    fn overlapping_terminals_fail_at_build() {
        let mut level = Level::classic();
        // Line 2 reuses a building cell for a terminal.
        level.terminal_data.get_mut(&2).unwrap()[0][0].0 = (8, 12);
        assert!(matches!(
            level.build_board(Arc::new(TileCatalog::standard())),
            Err(LevelError::Board(BoardError::Building(..)))
        ));
    }
}
