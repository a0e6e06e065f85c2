//! Stop signs.
//!
//! A tile placed next to a building becomes that building's stop when it has
//! a straight running parallel to the shared edge. A stop only counts as
//! visited when the streetcar travels along that straight.

use crate::board::{Board, Coord, Direction, ALL_DIRECTIONS};

/// Awards a stop sign to the tile just placed at `coord`, if it qualifies.
///
/// Neighbors are checked in N, E, S, W order and the first building without
/// a stop wins; at most one sign is created. Returns the building id.
pub fn check_and_place_stop_sign(board: &mut Board, coord: Coord) -> Option<String> {
    let tile = board.get_tile(coord)?;
    if tile.has_stop_sign || tile.is_terminal {
        return None;
    }
    let table = *board.connections_of(tile);

    let building = ALL_DIRECTIONS.into_iter().find_map(|d| {
        let id = board.get_building_at(coord.step(d))?;
        if board.has_stop_for(id) {
            return None;
        }
        let parallel = if d.is_vertical() {
            table.has_ew_straight()
        } else {
            table.has_ns_straight()
        };
        parallel.then(|| id.to_string())
    })?;

    if !board.record_stop_sign(&building, coord) {
        return None;
    }
    log::info!("stop sign at ({}) for building {}", coord, building);
    Some(building)
}

/// Is travelling in `direction` onto the stop at `coord` a valid visit?
///
/// The direction must lie on the axis of the straight that earned the sign:
/// E or W for a building north or south of the stop, N or S otherwise.
pub fn is_valid_stop_entry(board: &Board, coord: Coord, direction: Direction) -> bool {
    let Some(tile) = board.get_tile(coord) else { return false };
    if !tile.has_stop_sign {
        return false;
    }
    let Some(building) = board.stop_building_at(coord) else { return false };
    let Some(&bcoord) = board.building_coords().get(building) else { return false };

    if bcoord.row != coord.row {
        !direction.is_vertical()
    } else {
        direction.is_vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Orientation, PlacedTile, TileCatalog};
    use std::sync::Arc;

    fn board() -> Board {
        let mut board = Board::empty(8, 8, (1, 6), (1, 6), Arc::new(TileCatalog::standard()));
        board.add_building("A", Coord::new(2, 3)).unwrap();
        board
    }

    fn put(board: &mut Board, name: &str, o: Orientation, r: i32, c: i32) {
        let id = board.catalog().id(name).unwrap();
        board.set_tile(Coord::new(r, c), Some(PlacedTile::new(id, o))).unwrap();
    }

    #[test]
    fn parallel_straight_earns_a_stop() {
        let mut b = board();
        // Building A is north of (3,3); an E-W straight runs along it.
        put(&mut b, "Straight", Orientation::Deg90, 3, 3);
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(3, 3)), Some("A".into()));
        assert!(b.get_tile(Coord::new(3, 3)).unwrap().has_stop_sign);
        assert_eq!(b.building_stop_locations().get("A"), Some(&Coord::new(3, 3)));
    }

    #[test]
    fn perpendicular_straight_never_earns_a_stop() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 3, 3);
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(3, 3)), None);
        assert!(!b.get_tile(Coord::new(3, 3)).unwrap().has_stop_sign);
        assert!(!b.has_stop_for("A"));
    }

    #[test]
    fn curves_never_earn_a_stop() {
        let mut b = board();
        put(&mut b, "Tree_Roundabout", Orientation::Deg0, 2, 2);
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(2, 2)), None);
    }

    #[test]
    fn a_building_gets_one_stop() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg90, 3, 3);
        put(&mut b, "Straight", Orientation::Deg90, 1, 3);
        assert!(check_and_place_stop_sign(&mut b, Coord::new(3, 3)).is_some());
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(1, 3)), None);
        assert_eq!(b.building_stop_locations().get("A"), Some(&Coord::new(3, 3)));
    }

    #[test]
    fn first_building_in_direction_order_wins() {
        let mut b = board();
        // (2,4) has A to the west and B to the south; a crossroad qualifies for both.
        b.add_building("B", Coord::new(3, 4)).unwrap();
        put(&mut b, "Tree_Crossroad", Orientation::Deg0, 2, 4);
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(2, 4)), Some("B".into()));
        assert!(!b.has_stop_for("A"));
    }

    #[test]
    fn repeated_calls_do_not_stack_signs() {
        let mut b = board();
        b.add_building("B", Coord::new(4, 3)).unwrap();
        put(&mut b, "Straight", Orientation::Deg90, 3, 3);
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(3, 3)), Some("A".into()));
        assert_eq!(check_and_place_stop_sign(&mut b, Coord::new(3, 3)), None);
        assert!(!b.has_stop_for("B"));
    }

    #[test]
    fn entry_must_follow_the_qualifying_straight() {
        let mut b = board();
        put(&mut b, "Tree_Crossroad", Orientation::Deg0, 3, 3);
        check_and_place_stop_sign(&mut b, Coord::new(3, 3));
        let stop = Coord::new(3, 3);
        assert!(is_valid_stop_entry(&b, stop, Direction::E));
        assert!(is_valid_stop_entry(&b, stop, Direction::W));
        assert!(!is_valid_stop_entry(&b, stop, Direction::N));
        assert!(!is_valid_stop_entry(&b, stop, Direction::S));

        // Building to the east: the N-S axis counts.
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 2, 2);
        check_and_place_stop_sign(&mut b, Coord::new(2, 2));
        assert!(is_valid_stop_entry(&b, Coord::new(2, 2), Direction::S));
        assert!(!is_valid_stop_entry(&b, Coord::new(2, 2), Direction::E));
    }

    #[test]
    fn entry_onto_a_plain_tile_is_never_a_visit() {
        let mut b = board();
        put(&mut b, "Straight", Orientation::Deg0, 5, 5);
        assert!(!is_valid_stop_entry(&b, Coord::new(5, 5), Direction::N));
        assert!(!is_valid_stop_entry(&b, Coord::new(9, 9), Direction::N));
    }
}
