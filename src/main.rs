//! Tramline: a text session over the track-laying rules engine.
//!
//! This binary reads commands from stdin and writes replies to stdout.
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io::{self, BufRead};

use tramline::engine::Session;
use tramline::protocol::parser::{parse_command, Command};

/// Runs the session loop, reading commands from stdin and writing replies
/// to stdout.
fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::IsReady => session.handle_isready(&mut out)?,
            Command::Level(source) => session.handle_level(&mut out, &source)?,
            Command::SetOption { name, value } => session.handle_setoption(&mut out, name, value)?,
            Command::Player { line, stops, tiles } => {
                session.handle_player(&mut out, line, stops, &tiles)?
            }
            Command::Place(args) => session.handle_move(&mut out, &args, false)?,
            Command::Exchange(args) => session.handle_move(&mut out, &args, true)?,
            Command::Check { exchange, args } => session.handle_check(&mut out, &args, exchange)?,
            Command::Route => session.handle_route(&mut out)?,
            Command::Drive(roll) => session.handle_drive(&mut out, roll)?,
            Command::AnyMove => session.handle_anymove(&mut out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}
