//! Level files and the session command language.
//!
//! `level` reads and validates the JSON level format; `parser` turns the
//! text commands of the session binary into structured `Command`s.

pub mod level;
pub mod parser;

pub use level::{Level, LevelError};
pub use parser::{parse_command, Command, LevelSource, MoveArgs, Roll};
