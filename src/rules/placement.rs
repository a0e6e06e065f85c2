//! Placement and exchange legality.
//!
//! Both checks read the board through an [`Overlay`] of moves the player has
//! already committed to this turn but which are not yet on the board. The
//! board itself is never modified.

use std::collections::HashMap;

use crate::board::{Board, Coord, Direction, Orientation, PlacedTile, TileId, ALL_DIRECTIONS};
use crate::player::Player;

/// Why a placement or exchange was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("({0}) is outside the playable area")]
    NotPlayable(Coord),

    #[error("({0}) is occupied by building {1}")]
    OnBuilding(Coord, String),

    #[error("({0}) is already occupied")]
    Occupied(Coord),

    #[error("connection mismatch with tile at ({neighbor}) on edge {edge}")]
    Mismatch { neighbor: Coord, edge: Direction },

    #[error("track at ({0}) points off the grid")]
    OffGrid(Coord),

    #[error("track points into the border at ({0})")]
    IntoBorder(Coord),

    #[error("track points into building {1} at ({0})")]
    IntoBuilding(Coord, String),

    #[error("no tile to exchange at ({0})")]
    NothingToExchange(Coord),

    #[error("tile at ({0}) is not swappable")]
    NotSwappable(Coord),

    #[error("tile at ({0}) carries a stop sign")]
    HasStopSign(Coord),

    #[error("tile at ({0}) is a terminal")]
    Terminal(Coord),

    #[error("player does not hold {0}")]
    NotInHand(String),

    #[error("tile at ({0}) is already a {1}")]
    SameKind(Coord, String),

    #[error("exchange at ({0}) would remove existing track")]
    RemovesTrack(Coord),
}

/// Outcome of a legality check.
pub type Verdict = Result<(), RuleViolation>;

/// A move committed earlier in the same turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub coord: Coord,
    pub tile: TileId,
    pub orientation: Orientation,
}

/// Read-only view of the board with pending moves laid on top.
pub struct Overlay<'a> {
    board: &'a Board,
    pending: HashMap<Coord, PlacedTile>,
}

impl<'a> Overlay<'a> {
    pub fn new(board: &'a Board, pending: &[PendingMove]) -> Overlay<'a> {
        let pending = pending
            .iter()
            .map(|m| (m.coord, PlacedTile::new(m.tile, m.orientation)))
            .collect();
        Overlay { board, pending }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// The pending tile at `c` if there is one, else the board's.
    pub fn tile_at(&self, c: Coord) -> Option<&PlacedTile> {
        self.pending.get(&c).or_else(|| self.board.get_tile(c))
    }
}

/// Checks one edge of a tile at `coord`.
///
/// `outgoing` says whether the tile has track on edge `d`. A neighboring tile
/// must agree exactly; an empty neighbor only matters when track leaves
/// toward it.
fn check_edge(view: &Overlay<'_>, coord: Coord, d: Direction, outgoing: bool) -> Verdict {
    let board = view.board();
    let n = coord.step(d);
    match view.tile_at(n) {
        Some(neighbor) => {
            let back = board.connections_of(neighbor).has_edge(d.opposite());
            if outgoing != back {
                return Err(RuleViolation::Mismatch { neighbor: n, edge: d });
            }
        }
        None if outgoing => {
            if !board.is_valid_coordinate(n) {
                return Err(RuleViolation::OffGrid(coord));
            }
            if let Some(building) = board.get_building_at(n) {
                return Err(RuleViolation::IntoBuilding(n, building.to_string()));
            }
            if !board.is_playable_coordinate(n) {
                return Err(RuleViolation::IntoBorder(n));
            }
        }
        None => {}
    }
    Ok(())
}

/// Can `tile` at `orientation` go on the empty cell `coord`?
///
/// The target must be playable, not a building, and empty on the real board.
/// Every edge must agree with the neighbor there (pending moves included),
/// and track may only lead toward an empty cell if that cell is playable.
pub fn check_placement_validity(
    board: &Board,
    tile: TileId,
    orientation: Orientation,
    coord: Coord,
    pending: &[PendingMove],
) -> Verdict {
    if !board.is_playable_coordinate(coord) {
        return Err(RuleViolation::NotPlayable(coord));
    }
    if let Some(building) = board.get_building_at(coord) {
        return Err(RuleViolation::OnBuilding(coord, building.to_string()));
    }
    if board.get_tile(coord).is_some() {
        return Err(RuleViolation::Occupied(coord));
    }

    let view = Overlay::new(board, pending);
    let table = board.catalog()[tile].connections_at(orientation);
    for d in ALL_DIRECTIONS {
        check_edge(&view, coord, d, table.has_edge(d))?;
    }
    Ok(())
}

/// Can `player` replace the tile at `coord` with `new_tile` at `orientation`?
///
/// The old tile must be an ordinary swappable track tile. The new tile must be
/// in the player's hand, differ in kind, and keep every connection pair the
/// old one had. Each added pair must lead somewhere legal at both ends.
pub fn check_exchange_validity(
    board: &Board,
    player: &Player,
    new_tile: TileId,
    orientation: Orientation,
    coord: Coord,
    pending: &[PendingMove],
) -> Verdict {
    if !board.is_playable_coordinate(coord) {
        return Err(RuleViolation::NotPlayable(coord));
    }
    let old = board
        .get_tile(coord)
        .ok_or(RuleViolation::NothingToExchange(coord))?;
    let catalog = board.catalog();
    if !catalog[old.kind].is_swappable() {
        return Err(RuleViolation::NotSwappable(coord));
    }
    if old.has_stop_sign {
        return Err(RuleViolation::HasStopSign(coord));
    }
    if old.is_terminal {
        return Err(RuleViolation::Terminal(coord));
    }
    if !player.holds(new_tile) {
        return Err(RuleViolation::NotInHand(catalog[new_tile].name().to_string()));
    }
    if old.kind == new_tile {
        return Err(RuleViolation::SameKind(coord, catalog[new_tile].name().to_string()));
    }

    let old_pairs = board.connections_of(old).pairs();
    let new_pairs = catalog[new_tile].connections_at(orientation).pairs();
    if !old_pairs.is_subset(new_pairs) {
        return Err(RuleViolation::RemovesTrack(coord));
    }

    let view = Overlay::new(board, pending);
    for (a, b) in new_pairs.difference(old_pairs).iter() {
        for d in [a, b] {
            check_edge(&view, coord, d, true)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{TileCatalog, ALL_ORIENTATIONS};
    use std::sync::Arc;

    fn board() -> Board {
        let mut board = Board::empty(6, 6, (1, 4), (1, 4), Arc::new(TileCatalog::standard()));
        board.add_building("A", Coord::new(2, 4)).unwrap();
        board
    }

    fn id(board: &Board, name: &str) -> TileId {
        board.catalog().id(name).unwrap()
    }

    fn put(board: &mut Board, name: &str, o: Orientation, r: i32, c: i32) {
        let t = PlacedTile::new(id(board, name), o);
        board.set_tile(Coord::new(r, c), Some(t)).unwrap();
    }

    fn player_holding(board: &Board, names: &[&str]) -> Player {
        Player {
            id: 0,
            line: 1,
            line_terminals: (Coord::new(0, 1), Coord::new(5, 1)),
            required_stop_ids: vec![],
            hand: names.iter().map(|n| id(board, n)).collect(),
        }
    }

    #[test]
    fn straight_in_open_space_is_legal() {
        let b = board();
        let straight = id(&b, "Straight");
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(2, 2), &[]),
            Ok(())
        );
    }

    #[test]
    fn target_cell_checks() {
        let mut b = board();
        let straight = id(&b, "Straight");
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(0, 2), &[]),
            Err(RuleViolation::NotPlayable(Coord::new(0, 2)))
        );
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(2, 4), &[]),
            Err(RuleViolation::OnBuilding(Coord::new(2, 4), "A".into()))
        );
        put(&mut b, "Curve", Orientation::Deg0, 3, 3);
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(3, 3), &[]),
            Err(RuleViolation::Occupied(Coord::new(3, 3)))
        );
    }

    #[test]
    fn track_may_not_point_into_border_or_building() {
        let b = board();
        let straight = id(&b, "Straight");
        // Row 1 running N-S points into the border ring at row 0.
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(1, 2), &[]),
            Err(RuleViolation::IntoBorder(Coord::new(0, 2)))
        );
        // E-W next to building A.
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg90, Coord::new(2, 3), &[]),
            Err(RuleViolation::IntoBuilding(Coord::new(2, 4), "A".into()))
        );
    }

    #[test]
    fn track_off_the_grid_is_rejected() {
        // No border ring: playable cells touch the grid edge.
        let b = Board::empty(3, 3, (0, 2), (0, 2), Arc::new(TileCatalog::standard()));
        let straight = id(&b, "Straight");
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(0, 1), &[]),
            Err(RuleViolation::OffGrid(Coord::new(0, 1)))
        );
    }

    #[test]
    fn neighbors_must_agree_both_ways() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 3, 2);
        let straight = id(&b, "Straight");

        // New tile points west, neighbor has no east edge.
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg90, Coord::new(3, 3), &[]),
            Err(RuleViolation::Mismatch { neighbor: Coord::new(3, 2), edge: Direction::W })
        );
        // Parallel straights never touch.
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(3, 3), &[]),
            Ok(())
        );

        // Neighbor points east into a tile without a west edge.
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg90, 3, 2);
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg0, Coord::new(3, 3), &[]),
            Err(RuleViolation::Mismatch { neighbor: Coord::new(3, 2), edge: Direction::W })
        );
    }

    #[test]
    fn pending_moves_are_seen_as_neighbors() {
        let b = board();
        let straight = id(&b, "Straight");
        let pending = [PendingMove {
            coord: Coord::new(3, 2),
            tile: straight,
            orientation: Orientation::Deg0,
        }];
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg90, Coord::new(3, 3), &[]),
            Ok(())
        );
        assert_eq!(
            check_placement_validity(&b, straight, Orientation::Deg90, Coord::new(3, 3), &pending),
            Err(RuleViolation::Mismatch { neighbor: Coord::new(3, 2), edge: Direction::W })
        );
        assert!(b.get_tile(Coord::new(3, 2)).is_none());
    }

    #[test]
    fn exchange_adding_a_branch_is_legal() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 2, 2);
        let p = player_holding(&b, &["StraightLeftCurve"]);
        let new = id(&b, "StraightLeftCurve");
        assert_eq!(
            check_exchange_validity(&b, &p, new, Orientation::Deg0, Coord::new(2, 2), &[]),
            Ok(())
        );
    }

    #[test]
    fn exchange_must_keep_existing_track() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 2, 2);
        let p = player_holding(&b, &["Curve", "StraightLeftCurve"]);
        let curve = id(&b, "Curve");
        assert_eq!(
            check_exchange_validity(&b, &p, curve, Orientation::Deg0, Coord::new(2, 2), &[]),
            Err(RuleViolation::RemovesTrack(Coord::new(2, 2)))
        );
        // The right orientation matters too: rotated 90 the straight part runs E-W.
        let left = id(&b, "StraightLeftCurve");
        assert_eq!(
            check_exchange_validity(&b, &p, left, Orientation::Deg90, Coord::new(2, 2), &[]),
            Err(RuleViolation::RemovesTrack(Coord::new(2, 2)))
        );
    }

    #[test]
    fn exchange_rejects_protected_tiles() {
        let mut b = board();
        put(&mut b, "Tree_Crossroad", Orientation::Deg0, 2, 2);
        put(&mut b, "Straight", Orientation::Deg0, 3, 2);
        put(&mut b, "Straight", Orientation::Deg0, 3, 3);
        b.record_stop_sign("A", Coord::new(3, 3));
        let p = player_holding(&b, &["Tree_Roundabout", "Straight", "StraightLeftCurve"]);
        let roundabout = id(&b, "Tree_Roundabout");

        assert_eq!(
            check_exchange_validity(&b, &p, roundabout, Orientation::Deg0, Coord::new(2, 2), &[]),
            Err(RuleViolation::NotSwappable(Coord::new(2, 2)))
        );
        assert_eq!(
            check_exchange_validity(&b, &p, roundabout, Orientation::Deg0, Coord::new(3, 3), &[]),
            Err(RuleViolation::HasStopSign(Coord::new(3, 3)))
        );
        assert_eq!(
            check_exchange_validity(&b, &p, roundabout, Orientation::Deg0, Coord::new(1, 1), &[]),
            Err(RuleViolation::NothingToExchange(Coord::new(1, 1)))
        );
        assert_eq!(
            check_exchange_validity(&b, &p, id(&b, "Straight"), Orientation::Deg0, Coord::new(3, 2), &[]),
            Err(RuleViolation::SameKind(Coord::new(3, 2), "Straight".into()))
        );
        let empty_hand = player_holding(&b, &[]);
        assert_eq!(
            check_exchange_validity(&b, &empty_hand, roundabout, Orientation::Deg0, Coord::new(3, 2), &[]),
            Err(RuleViolation::NotInHand("Tree_Roundabout".into()))
        );
    }

    #[test]
    fn exchange_never_replaces_a_terminal() {
        // Terminal inside the playable area so only the terminal flag rejects it.
        let mut b = board();
        let curve = id(&b, "Curve");
        b.set_tile(Coord::new(1, 1), Some(PlacedTile::terminal(curve, Orientation::Deg0)))
            .unwrap();
        let p = player_holding(&b, &["Tree_Roundabout"]);
        let roundabout = id(&b, "Tree_Roundabout");
        assert_eq!(
            check_exchange_validity(&b, &p, roundabout, Orientation::Deg0, Coord::new(1, 1), &[]),
            Err(RuleViolation::Terminal(Coord::new(1, 1)))
        );
    }

    #[test]
    fn added_track_must_lead_somewhere_legal() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 2, 3);
        let p = player_holding(&b, &["StraightRightCurve"]);
        // Adds S-E, pointing east into building A.
        let right = id(&b, "StraightRightCurve");
        assert_eq!(
            check_exchange_validity(&b, &p, right, Orientation::Deg0, Coord::new(2, 3), &[]),
            Err(RuleViolation::IntoBuilding(Coord::new(2, 4), "A".into()))
        );

        // A neighbor that does not connect back also fails.
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 2, 2);
        put(&mut b, "Straight", Orientation::Deg0, 2, 1);
        let p = player_holding(&b, &["StraightLeftCurve"]);
        let left = id(&b, "StraightLeftCurve");
        assert_eq!(
            check_exchange_validity(&b, &p, left, Orientation::Deg0, Coord::new(2, 2), &[]),
            Err(RuleViolation::Mismatch { neighbor: Coord::new(2, 1), edge: Direction::W })
        );
    }

    #[test]
    fn approved_exchanges_only_add_track() {
        let mut b = board();
        put(&mut b, "Curve", Orientation::Deg90, 3, 2);
        let all: Vec<&str> = b.catalog().ids().map(|i| b.catalog()[i].name()).collect();
        let p = player_holding(&b, &all);
        let old_pairs = b.connections_of(b.get_tile(Coord::new(3, 2)).unwrap()).pairs();
        let mut approved = 0;
        for tile in b.catalog().ids() {
            for o in ALL_ORIENTATIONS {
                if check_exchange_validity(&b, &p, tile, o, Coord::new(3, 2), &[]).is_ok() {
                    approved += 1;
                    let new_pairs = b.catalog()[tile].connections_at(o).pairs();
                    assert!(old_pairs.is_subset(new_pairs));
                }
            }
        }
        assert!(approved > 0);
    }
}
