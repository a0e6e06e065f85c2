//! Sequential multi-waypoint route search.
//!
//! Two searches share the transition rule in [`super::state`]: plain
//! breadth-first search and A* with a waypoint-chain Manhattan heuristic.
//! Every edge costs 1, so both return a route of minimal length.

use pathfinding::prelude::{astar, bfs};

use crate::board::{Board, Coord};

use super::state::{successors, PathState, RouteStep};

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    pub steps: Vec<RouteStep>,
    /// Number of moves, `steps.len() - 1`.
    pub cost: usize,
    /// `waypoint_steps[k]` is the step index at which `sequence[k + 1]` was
    /// satisfied.
    pub waypoint_steps: Vec<usize>,
}

impl FoundPath {
    fn from_states(states: &[PathState], sequence: &[Coord]) -> FoundPath {
        let steps = states
            .iter()
            .map(|s| RouteStep {
                coord: s.pos,
                is_goal_node: sequence.contains(&s.pos),
                arrival: s.arrival,
            })
            .collect();
        let waypoint_steps = states
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1].seq_idx > w[0].seq_idx)
            .map(|(i, _)| i + 1)
            .collect();
        FoundPath { steps, cost: states.len().saturating_sub(1), waypoint_steps }
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.steps.iter().map(|s| s.coord)
    }
}

/// A search strategy over route states.
pub trait Pathfinder {
    /// Returns the state chain from the start to the first accepting state,
    /// or None if no accepting state is reachable.
    fn search(&self, board: &Board, sequence: &[Coord]) -> Option<Vec<PathState>>;

    /// Searches for a route visiting `sequence` in order.
    ///
    /// None stands for an infinite cost: empty sequence, no tile on the
    /// start cell, or no route.
    fn find_path(&self, board: &Board, sequence: &[Coord]) -> Option<FoundPath> {
        let start = *sequence.first()?;
        if board.get_tile(start).is_none() {
            log::debug!("no tile at route start ({})", start);
            return None;
        }
        let states = self.search(board, sequence)?;
        Some(FoundPath::from_states(&states, sequence))
    }
}

/// Breadth-first search: fewest moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsPathfinder;

impl Pathfinder for BfsPathfinder {
    fn search(&self, board: &Board, sequence: &[Coord]) -> Option<Vec<PathState>> {
        let start = PathState::start(sequence)?;
        bfs(
            &start,
            |s| successors(board, *s, sequence),
            |s| s.is_accepting(sequence),
        )
    }
}

/// A* search with [`waypoint_heuristic`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPathfinder;

impl Pathfinder for AStarPathfinder {
    fn search(&self, board: &Board, sequence: &[Coord]) -> Option<Vec<PathState>> {
        let start = PathState::start(sequence)?;
        astar(
            &start,
            |s| successors(board, *s, sequence).map(|n| (n, 1u32)),
            |s| waypoint_heuristic(s, sequence),
            |s| s.is_accepting(sequence),
        )
        .map(|(states, _cost)| states)
    }
}

/// Lower bound on the moves left from `state`: distance to the next unmet
/// waypoint, then between each remaining pair in order.
///
/// Satisfying a waypoint costs exactly the one step onto it, so the bound
/// is consistent as well as admissible.
pub fn waypoint_heuristic(state: &PathState, sequence: &[Coord]) -> u32 {
    let Some(remaining) = sequence.get(state.seq_idx..) else { return 0 };
    let Some(&next) = remaining.first() else { return 0 };
    state.pos.manhattan(next) + remaining.windows(2).map(|w| w[0].manhattan(w[1])).sum::<u32>()
}

/// Which search a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathfinderKind {
    #[default]
    Bfs,
    AStar,
}

impl Pathfinder for PathfinderKind {
    fn search(&self, board: &Board, sequence: &[Coord]) -> Option<Vec<PathState>> {
        match self {
            PathfinderKind::Bfs => BfsPathfinder.search(board, sequence),
            PathfinderKind::AStar => AStarPathfinder.search(board, sequence),
        }
    }
}

impl std::str::FromStr for PathfinderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(PathfinderKind::Bfs),
            "astar" | "a*" => Ok(PathfinderKind::AStar),
            other => Err(format!("unknown pathfinder: {other}")),
        }
    }
}

impl std::fmt::Display for PathfinderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathfinderKind::Bfs => write!(f, "bfs"),
            PathfinderKind::AStar => write!(f, "astar"),
        }
    }
}

/// Breadth-first [`Pathfinder::find_path`].
pub fn find_path(board: &Board, sequence: &[Coord]) -> Option<FoundPath> {
    BfsPathfinder.find_path(board, sequence)
}
