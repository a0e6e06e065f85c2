//! Route completion for a player's line.

use crate::board::{Board, Coord};
use crate::player::Player;

use super::search::{FoundPath, Pathfinder};

/// A completed route and the waypoint sequence it satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCompletion {
    pub start_terminal: Coord,
    pub sequence: Vec<Coord>,
    pub path: FoundPath,
}

/// Checks whether `player`'s track connects their terminals through every
/// required stop, in order.
///
/// Both terminal orderings are searched. When both succeed the cheaper one
/// wins, the first terminal on a tie. Returns None if a required stop has
/// no sign on the board yet or neither ordering has a route.
pub fn check_player_route_completion<P: Pathfinder + ?Sized>(
    board: &Board,
    player: &Player,
    pathfinder: &P,
) -> Option<RouteCompletion> {
    let (t1, t2) = player.line_terminals;
    let attempt = |start: Coord| -> Option<RouteCompletion> {
        let sequence = player.waypoint_sequence(board, start)?;
        let path = pathfinder.find_path(board, &sequence)?;
        Some(RouteCompletion { start_terminal: start, sequence, path })
    };

    if player.required_stop_coords(board).is_none() {
        log::debug!("player {}: required stops not all on the board", player.id);
        return None;
    }

    let best = match (attempt(t1), attempt(t2)) {
        (Some(fwd), Some(back)) if back.path.cost < fwd.path.cost => back,
        (Some(fwd), _) => fwd,
        (None, Some(back)) => back,
        (None, None) => {
            log::debug!("player {}: no complete route", player.id);
            return None;
        }
    };
    log::info!(
        "player {} route complete from ({}) in {} moves",
        player.id,
        best.start_terminal,
        best.path.cost
    );
    Some(best)
}
