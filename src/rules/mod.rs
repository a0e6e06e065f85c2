//! Tile-laying rules.
//!
//! Connection lookup, placement and exchange legality, stop-sign creation,
//! and exhaustive enumeration of a player's legal moves.

pub mod connections;
pub mod moves;
pub mod placement;
pub mod stops;

pub use connections::{connection_pairs, effective_connections};
pub use moves::{can_player_make_any_move, legal_moves, LegalMove};
pub use placement::{
    check_exchange_validity, check_placement_validity, Overlay, PendingMove, RuleViolation,
    Verdict,
};
pub use stops::{check_and_place_stop_sign, is_valid_stop_entry};
