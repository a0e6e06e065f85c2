//! The parts of a player the rules and route checks read.
//!
//! A player owns one line (two terminals), an ordered list of buildings
//! whose stops the route must visit, and a hand of tiles.

use crate::board::{Board, Coord, TileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub line: u8,
    pub line_terminals: (Coord, Coord),
    pub required_stop_ids: Vec<String>,
    pub hand: Vec<TileId>,
}

impl Player {
    /// Creates a player for one of the board's lines. Returns None if the
    /// board has no such line.
    pub fn for_line(
        board: &Board,
        id: usize,
        line: u8,
        required_stop_ids: Vec<String>,
        hand: Vec<TileId>,
    ) -> Option<Player> {
        let line_terminals = board.terminal_coords(line)?;
        Some(Player { id, line, line_terminals, required_stop_ids, hand })
    }

    pub fn holds(&self, tile: TileId) -> bool {
        self.hand.contains(&tile)
    }

    /// Coordinates of the required stops, in route order.
    ///
    /// Returns None as soon as one required building has no stop sign yet.
    pub fn required_stop_coords(&self, board: &Board) -> Option<Vec<Coord>> {
        self.required_stop_ids
            .iter()
            .map(|id| board.building_stop_locations().get(id).copied())
            .collect()
    }

    /// The full waypoint sequence starting from the given terminal:
    /// `[start, stops.., other terminal]`.
    pub fn waypoint_sequence(&self, board: &Board, start: Coord) -> Option<Vec<Coord>> {
        let (t1, t2) = self.line_terminals;
        let end = if start == t1 {
            t2
        } else if start == t2 {
            t1
        } else {
            return None;
        };
        let stops = self.required_stop_coords(board)?;
        let mut sequence = Vec::with_capacity(stops.len() + 2);
        sequence.push(start);
        sequence.extend(stops);
        sequence.push(end);
        Some(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Orientation, PlacedTile, TerminalEntrance, TileCatalog};
    use std::sync::Arc;

    fn board_with_line() -> Board {
        let mut board = Board::empty(6, 6, (1, 4), (1, 4), Arc::new(TileCatalog::standard()));
        board
            .add_terminal_line(
                2,
                [
                    TerminalEntrance {
                        cells: [(Coord::new(0, 1), Orientation::Deg90), (Coord::new(0, 2), Orientation::Deg180)],
                    },
                    TerminalEntrance {
                        cells: [(Coord::new(5, 1), Orientation::Deg0), (Coord::new(5, 2), Orientation::Deg270)],
                    },
                ],
            )
            .unwrap();
        board.add_building("A", Coord::new(2, 3)).unwrap();
        board.add_building("B", Coord::new(3, 3)).unwrap();
        board
    }

    #[test]
    fn for_line_reads_terminals() {
        let board = board_with_line();
        let p = Player::for_line(&board, 0, 2, vec!["A".into()], vec![]).unwrap();
        assert_eq!(p.line_terminals, (Coord::new(0, 1), Coord::new(5, 1)));
        assert!(Player::for_line(&board, 0, 7, vec![], vec![]).is_none());
    }

    #[test]
    fn stop_coords_require_every_stop() {
        let mut board = board_with_line();
        let p = Player::for_line(&board, 0, 2, vec!["A".into(), "B".into()], vec![]).unwrap();
        assert_eq!(p.required_stop_coords(&board), None);

        let straight = board.catalog().id("Straight").unwrap();
        board.set_tile(Coord::new(2, 2), Some(PlacedTile::new(straight, Orientation::Deg0))).unwrap();
        board.set_tile(Coord::new(3, 2), Some(PlacedTile::new(straight, Orientation::Deg0))).unwrap();
        board.record_stop_sign("A", Coord::new(2, 2));
        assert_eq!(p.required_stop_coords(&board), None);
        board.record_stop_sign("B", Coord::new(3, 2));
        assert_eq!(
            p.required_stop_coords(&board),
            Some(vec![Coord::new(2, 2), Coord::new(3, 2)])
        );
        assert_eq!(
            p.waypoint_sequence(&board, Coord::new(5, 1)),
            Some(vec![Coord::new(5, 1), Coord::new(2, 2), Coord::new(3, 2), Coord::new(0, 1)])
        );
        assert_eq!(p.waypoint_sequence(&board, Coord::new(4, 4)), None);
    }
}
