//! Move enumeration.
//!
//! Enumerates every legal placement and exchange a player could make with
//! the tiles in hand. Used to detect a player with no legal move.

use std::collections::BTreeSet;

use crate::board::{Board, Coord, Orientation, TileId, ALL_ORIENTATIONS};
use crate::player::Player;

use super::placement::{check_exchange_validity, check_placement_validity};

/// A single legal action on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalMove {
    Place { tile: TileId, orientation: Orientation, coord: Coord },
    Exchange { tile: TileId, orientation: Orientation, coord: Coord },
}

impl LegalMove {
    pub fn coord(&self) -> Coord {
        match *self {
            LegalMove::Place { coord, .. } | LegalMove::Exchange { coord, .. } => coord,
        }
    }
}

/// Lazily yields legal moves, grouped by distinct tile in hand, then by
/// cell in row-major order, then by orientation. Placement is tried before
/// exchange at each candidate.
fn candidates<'a>(board: &'a Board, player: &'a Player) -> impl Iterator<Item = LegalMove> + 'a {
    let tiles: BTreeSet<TileId> = player.hand.iter().copied().collect();
    tiles.into_iter().flat_map(move |tile| {
        board.coords().flat_map(move |coord| {
            ALL_ORIENTATIONS.into_iter().flat_map(move |orientation| {
                let place = check_placement_validity(board, tile, orientation, coord, &[])
                    .ok()
                    .map(|()| LegalMove::Place { tile, orientation, coord });
                let exchange = check_exchange_validity(board, player, tile, orientation, coord, &[])
                    .ok()
                    .map(|()| LegalMove::Exchange { tile, orientation, coord });
                place.into_iter().chain(exchange)
            })
        })
    })
}

/// All legal moves for `player` on the current board.
pub fn legal_moves(board: &Board, player: &Player) -> Vec<LegalMove> {
    candidates(board, player).collect()
}

/// Exhaustive check whether `player` has any legal placement or exchange.
/// Stops at the first one found.
pub fn can_player_make_any_move(board: &Board, player: &Player) -> bool {
    match candidates(board, player).next() {
        Some(found) => {
            log::debug!("player {} can move: {:?}", player.id, found);
            true
        }
        None => {
            log::debug!("player {} has no legal move", player.id);
            false
        }
    }
}
