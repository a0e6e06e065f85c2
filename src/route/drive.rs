//! Driving a completed route.
//!
//! Once a route is complete the streetcar rolls a die each turn and moves
//! along the route's steps. A numbered face moves that many steps, an `H`
//! face moves to the next stop sign or terminal. Either way the streetcar
//! never passes its next required waypoint in one move.

use rand::Rng;

use crate::board::{Board, Coord, Direction, InvalidInput};

use super::completion::RouteCompletion;
use super::state::RouteStep;

/// One face of the driving die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DieFace {
    Steps(u8),
    /// Drive to the next stop or terminal.
    Stop,
}

pub const DIE_FACES: [DieFace; 6] = [
    DieFace::Steps(1),
    DieFace::Steps(2),
    DieFace::Steps(3),
    DieFace::Steps(4),
    DieFace::Stop,
    DieFace::Stop,
];

impl DieFace {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> DieFace {
        DIE_FACES[rng.gen_range(0..DIE_FACES.len())]
    }
}

impl std::str::FromStr for DieFace {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" => Ok(DieFace::Stop),
            "1" => Ok(DieFace::Steps(1)),
            "2" => Ok(DieFace::Steps(2)),
            "3" => Ok(DieFace::Steps(3)),
            "4" => Ok(DieFace::Steps(4)),
            other => Err(InvalidInput::DieFace(other.to_string())),
        }
    }
}

impl std::fmt::Display for DieFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DieFace::Steps(n) => write!(f, "{}", n),
            DieFace::Stop => write!(f, "H"),
        }
    }
}

/// Index reached by moving `steps` along the path from `current`, never
/// beyond `goal_index` or the end of the path.
pub fn trace_track_steps(path: &[RouteStep], current: usize, goal_index: usize, steps: usize) -> usize {
    let last = path.len().saturating_sub(1);
    current.saturating_add(steps).min(goal_index).min(last)
}

/// First index after `current`, up to `goal_index`, that holds a stop sign
/// or is a terminal of any line. `goal_index` itself if there is none.
pub fn find_next_feature_on_path(
    board: &Board,
    path: &[RouteStep],
    current: usize,
    goal_index: usize,
) -> usize {
    let goal_index = goal_index.min(path.len().saturating_sub(1));
    (current + 1..goal_index)
        .find(|&i| {
            let c = path[i].coord;
            board.is_stop(c) || board.is_terminal_coord(c)
        })
        .unwrap_or(goal_index)
}

/// Errors moving the streetcar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    #[error("streetcar has already arrived")]
    Arrived,

    #[error("step {0} is not on the route")]
    OffRoute(usize),

    #[error("cannot move back from step {from} to {to}")]
    Backwards { from: usize, to: usize },

    #[error("cannot pass waypoint at step {0}")]
    PastWaypoint(usize),
}

/// A streetcar driving a completed route.
#[derive(Debug, Clone)]
pub struct Streetcar {
    route: RouteCompletion,
    path_index: usize,
    /// Index into the route's sequence of the next waypoint to reach.
    required_node_index: usize,
}

impl Streetcar {
    /// Places a streetcar on the route's start terminal.
    pub fn new(route: RouteCompletion) -> Streetcar {
        Streetcar { route, path_index: 0, required_node_index: 1 }
    }

    pub fn route(&self) -> &RouteCompletion {
        &self.route
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn required_node_index(&self) -> usize {
        self.required_node_index
    }

    pub fn position(&self) -> Coord {
        self.route.path.steps[self.path_index].coord
    }

    /// Direction the streetcar was travelling when it reached its position.
    pub fn heading(&self) -> Option<Direction> {
        self.route.path.steps[self.path_index].arrival
    }

    /// The next waypoint, if any is left.
    pub fn next_goal(&self) -> Option<Coord> {
        self.route.sequence.get(self.required_node_index).copied()
    }

    /// Path index at which the next waypoint is satisfied.
    fn next_goal_index(&self) -> Option<usize> {
        self.route.path.waypoint_steps.get(self.required_node_index - 1).copied()
    }

    /// Where a roll of `face` would take the streetcar.
    pub fn target_for_roll(&self, board: &Board, face: DieFace) -> Result<usize, DriveError> {
        let goal = self.next_goal_index().ok_or(DriveError::Arrived)?;
        let steps = &self.route.path.steps;
        Ok(match face {
            DieFace::Stop => find_next_feature_on_path(board, steps, self.path_index, goal),
            DieFace::Steps(n) => trace_track_steps(steps, self.path_index, goal, n as usize),
        })
    }

    /// Moves to `index`, marking the next waypoint satisfied on reaching it.
    pub fn move_to(&mut self, index: usize) -> Result<(), DriveError> {
        if index >= self.route.path.steps.len() {
            return Err(DriveError::OffRoute(index));
        }
        if index < self.path_index {
            return Err(DriveError::Backwards { from: self.path_index, to: index });
        }
        if let Some(goal) = self.next_goal_index() {
            if index > goal {
                return Err(DriveError::PastWaypoint(goal));
            }
            if index == goal {
                self.required_node_index += 1;
            }
        }
        self.path_index = index;
        Ok(())
    }

    /// Rolls `face` and moves. Returns the new path index.
    pub fn drive(&mut self, board: &Board, face: DieFace) -> Result<usize, DriveError> {
        let target = self.target_for_roll(board, face)?;
        self.move_to(target)?;
        log::debug!(
            "rolled {}: streetcar at ({}), step {}",
            face,
            self.position(),
            self.path_index
        );
        Ok(target)
    }

    /// True once every waypoint is satisfied and the streetcar stands on the
    /// final terminal.
    pub fn has_arrived(&self) -> bool {
        self.required_node_index >= self.route.sequence.len()
            && self.route.sequence.last() == Some(&self.position())
    }
}
