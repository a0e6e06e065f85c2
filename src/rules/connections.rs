//! Effective connections of tiles at an orientation.
//!
//! Rotating a tile by k quarter turns rotates every edge label, keys and
//! values alike, k steps clockwise.

use crate::board::{ConnectionTable, Orientation, PairSet, TileCatalog, TileId};

/// The connection table of `tile` after rotating to `orientation`.
pub fn effective_connections(
    catalog: &TileCatalog,
    tile: TileId,
    orientation: Orientation,
) -> ConnectionTable {
    *catalog[tile].connections_at(orientation)
}

/// The unordered edge pairs `tile` joins at `orientation`.
pub fn connection_pairs(catalog: &TileCatalog, tile: TileId, orientation: Orientation) -> PairSet {
    effective_connections(catalog, tile, orientation).pairs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    #[test]
    fn rotating_twice_by_90_equals_180() {
        let catalog = TileCatalog::standard();
        for id in catalog.ids() {
            let once = effective_connections(&catalog, id, Orientation::Deg90);
            assert_eq!(
                once.rotated(1),
                effective_connections(&catalog, id, Orientation::Deg180),
                "{}",
                catalog[id].name()
            );
        }
    }

    #[test]
    fn straight_rotated_90_runs_east_west() {
        let catalog = TileCatalog::standard();
        let straight = catalog.id("Straight").unwrap();
        let t = effective_connections(&catalog, straight, Orientation::Deg90);
        assert!(t.has_ew_straight());
        assert!(!t.has_ns_straight());
        assert!(t.has_edge(Direction::E));
        assert!(!t.has_edge(Direction::N));
    }

    #[test]
    fn junction_pairs_follow_rotation() {
        let catalog = TileCatalog::standard();
        let left = catalog.id("StraightLeftCurve").unwrap();
        let pairs = connection_pairs(&catalog, left, Orientation::Deg180);
        // N-S stays N-S, S-W becomes N-E.
        assert!(pairs.contains(Direction::N, Direction::S));
        assert!(pairs.contains(Direction::E, Direction::N));
        assert_eq!(pairs.len(), 2);
    }
}
