//! Route validation.
//!
//! A route is a walk along connected track from one terminal, through each
//! required stop in order, to the other terminal. The search state carries
//! the arrival direction and waypoint progress, so a cell may be crossed
//! several times on one route.

pub mod completion;
pub mod drive;
pub mod search;
pub mod state;

pub use completion::{check_player_route_completion, RouteCompletion};
pub use drive::{
    find_next_feature_on_path, trace_track_steps, DieFace, DriveError, Streetcar, DIE_FACES,
};
pub use search::{
    find_path, waypoint_heuristic, AStarPathfinder, BfsPathfinder, FoundPath, Pathfinder,
    PathfinderKind,
};
pub use state::{successors, PathState, RouteStep};
