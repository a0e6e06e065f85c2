//! Session command parser.
//!
//! Parses incoming session commands from raw text into structured
//! `Command` variants that the main loop can dispatch on.

use crate::board::{Orientation, ALL_ORIENTATIONS};
use crate::route::DieFace;

/// Where to load a level from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    /// The built-in classic level.
    Default,
    Path(String),
}

/// A tile, orientation and target cell, shared by `place`, `exchange` and
/// `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveArgs {
    pub tile: String,
    pub orientation: Orientation,
    pub row: i32,
    pub col: i32,
}

/// What to roll for `drive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roll {
    Face(DieFace),
    /// Let the session roll the die.
    Random,
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; session must reply `readyok`.
    IsReady,

    /// Load a level and reset the board.
    Level(LevelSource),

    /// Set a session option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Set the active player: `player <line> <stops|-> <tiles|->`.
    Player {
        line: u8,
        stops: Vec<String>,
        tiles: Vec<String>,
    },

    Place(MoveArgs),

    Exchange(MoveArgs),

    /// Check a move without making it.
    Check { exchange: bool, args: MoveArgs },

    /// Check whether the active player's route is complete.
    Route,

    Drive(Roll),

    /// Does the active player have any legal move?
    AnyMove,

    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "isready" => Some(Command::IsReady),
        "route" => Some(Command::Route),
        "anymove" => Some(Command::AnyMove),
        "quit" => Some(Command::Quit),

        "level" => parse_level(&tokens),
        "setoption" => parse_setoption(&tokens),
        "player" => parse_player(&tokens),
        "place" => parse_move_args(&tokens[1..]).map(Command::Place),
        "exchange" => parse_move_args(&tokens[1..]).map(Command::Exchange),
        "check" => parse_check(&tokens),
        "drive" => parse_drive(&tokens),

        other => {
            log::warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `level default` or `level <path>`.
fn parse_level(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_, "default"] => Some(Command::Level(LevelSource::Default)),
        [_, path] => Some(Command::Level(LevelSource::Path(path.to_string()))),
        _ => {
            log::warn!("malformed level: expected 'level default' or 'level <path>'");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        log::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            if name_parts.is_empty() {
                log::warn!("malformed setoption: empty name");
                return None;
            }
            let value_parts = &tokens[vi + 1..];
            let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Splits a comma-separated list; `-` is the empty list.
fn parse_list(token: &str) -> Vec<String> {
    if token == "-" {
        return Vec::new();
    }
    token
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `player <line> <stops|-> <tiles|->`.
fn parse_player(tokens: &[&str]) -> Option<Command> {
    let [_, line, stops, tiles] = tokens else {
        log::warn!("malformed player: expected 'player <line> <stops|-> <tiles|->'");
        return None;
    };
    let Ok(line) = line.parse::<u8>() else {
        log::warn!("invalid line number: '{}'", line);
        return None;
    };
    Some(Command::Player {
        line,
        stops: parse_list(stops),
        tiles: parse_list(tiles),
    })
}

/// Parses `<tile> <degrees> <row> <col>`.
fn parse_move_args(tokens: &[&str]) -> Option<MoveArgs> {
    let [tile, degrees, row, col] = tokens else {
        log::warn!("malformed move: expected '<tile> <degrees> <row> <col>'");
        return None;
    };
    let orientation = match degrees.parse::<i32>().map(Orientation::from_degrees) {
        Ok(Ok(o)) => o,
        _ => {
            log::warn!(
                "invalid orientation: '{}' (expected one of {:?})",
                degrees,
                ALL_ORIENTATIONS.map(|o| o.degrees())
            );
            return None;
        }
    };
    match (row.parse::<i32>(), col.parse::<i32>()) {
        (Ok(row), Ok(col)) => Some(MoveArgs {
            tile: tile.to_string(),
            orientation,
            row,
            col,
        }),
        _ => {
            log::warn!("invalid coordinate: '{} {}'", row, col);
            None
        }
    }
}

/// Parses `check place|exchange <tile> <degrees> <row> <col>`.
fn parse_check(tokens: &[&str]) -> Option<Command> {
    let exchange = match tokens.get(1) {
        Some(&"place") => false,
        Some(&"exchange") => true,
        _ => {
            log::warn!("malformed check: expected 'check place|exchange ...'");
            return None;
        }
    };
    let args = parse_move_args(&tokens[2..])?;
    Some(Command::Check { exchange, args })
}

/// Parses `drive <1-4|H|roll>`.
fn parse_drive(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_, "roll"] => Some(Command::Drive(Roll::Random)),
        [_, face] => match face.parse::<DieFace>() {
            Ok(face) => Some(Command::Drive(Roll::Face(face))),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        },
        _ => {
            log::warn!("malformed drive: expected 'drive <1-4|H|roll>'");
            None
        }
    }
}
