//! Tramline rules library.
//!
//! Exposes the board representation, placement rules, route search, and
//! the session protocol for use by integration tests and the binary entry
//! point.

pub mod board;
pub mod engine;
pub mod player;
pub mod protocol;
pub mod route;
pub mod rules;
