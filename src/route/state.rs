//! Search state and the transition rule.
//!
//! A state is a cell plus how the streetcar entered it plus how many
//! waypoints are already satisfied. The same cell entered from a different
//! side, or with different progress, is a different state.

use crate::board::{Board, Coord, Direction, EdgeSet};
use crate::rules::is_valid_stop_entry;

/// One node of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathState {
    pub pos: Coord,
    /// Direction of travel into `pos`; None only at the start.
    pub arrival: Option<Direction>,
    /// Index of the next unmet waypoint in the sequence.
    pub seq_idx: usize,
}

impl PathState {
    /// The initial state for a waypoint sequence.
    pub fn start(sequence: &[Coord]) -> Option<PathState> {
        sequence.first().map(|&pos| PathState { pos, arrival: None, seq_idx: 1 })
    }

    pub fn is_accepting(&self, sequence: &[Coord]) -> bool {
        self.seq_idx == sequence.len()
    }
}

/// One step of a resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteStep {
    pub coord: Coord,
    pub is_goal_node: bool,
    pub arrival: Option<Direction>,
}

/// Does travelling in `d` onto `coord` satisfy waypoint `seq_idx`?
///
/// The cell must be the waypoint, and a stop only counts when entered along
/// its parallel straight.
pub fn satisfies_waypoint(
    board: &Board,
    sequence: &[Coord],
    seq_idx: usize,
    coord: Coord,
    d: Direction,
) -> bool {
    sequence.get(seq_idx) == Some(&coord)
        && (!board.is_stop(coord) || is_valid_stop_entry(board, coord, d))
}

/// Edges the streetcar may leave `state.pos` through.
fn legal_exits(board: &Board, state: PathState, sequence: &[Coord]) -> EdgeSet {
    let Some(tile) = board.get_tile(state.pos) else { return EdgeSet::EMPTY };
    let table = board.connections_of(tile);
    let Some(arrival) = state.arrival else { return table.edges() };
    let entry = arrival.opposite();

    let just_satisfied = state
        .seq_idx
        .checked_sub(1)
        .and_then(|i| sequence.get(i))
        .is_some_and(|&c| c == state.pos);
    if board.is_stop(state.pos) && just_satisfied && is_valid_stop_entry(board, state.pos, arrival) {
        // Straight through, no turning off a stop just visited.
        return if table.connects(entry, arrival) {
            [arrival].into_iter().collect()
        } else {
            EdgeSet::EMPTY
        };
    }
    table.exits(entry)
}

/// States reachable in one step from `state`.
pub fn successors<'a>(
    board: &'a Board,
    state: PathState,
    sequence: &'a [Coord],
) -> impl Iterator<Item = PathState> + 'a {
    legal_exits(board, state, sequence).iter().filter_map(move |d| {
        let next = state.pos.step(d);
        let tile = board.get_tile(next)?;
        if !board.connections_of(tile).has_edge(d.opposite()) {
            return None;
        }
        let seq_idx = if satisfies_waypoint(board, sequence, state.seq_idx, next, d) {
            state.seq_idx + 1
        } else {
            state.seq_idx
        };
        Some(PathState { pos: next, arrival: Some(d), seq_idx })
    })
}
