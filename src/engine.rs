//! Session state management.
//!
//! Holds the loaded level's board, the active player, session options, and
//! the streetcar once a route is complete. Each `handle_*` method writes its
//! reply lines to the given writer.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{
    Board, BoardError, CatalogError, Coord, InvalidInput, PlacedTile, TileCatalog, TileId,
};
use crate::player::Player;
use crate::protocol::level::{Level, LevelError};
use crate::protocol::parser::{LevelSource, MoveArgs, Roll};
use crate::route::{
    check_player_route_completion, DieFace, DriveError, PathfinderKind, RouteCompletion,
    Streetcar,
};
use crate::rules::{
    can_player_make_any_move, check_and_place_stop_sign, check_exchange_validity,
    check_placement_validity, RuleViolation,
};

/// Errors from session commands. Each is reported as an `error` or
/// `illegal` reply; the session keeps running.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no level loaded")]
    NoLevel,

    #[error("no player set")]
    NoPlayer,

    #[error("no line {0} on this level")]
    UnknownLine(u8),

    #[error("no building {0} on this level")]
    UnknownBuilding(String),

    #[error("no completed route to drive")]
    NoRoute,

    #[error("invalid value '{value}' for option {name}")]
    BadOption { name: String, value: String },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Illegal(#[from] RuleViolation),

    #[error(transparent)]
    Input(#[from] InvalidInput),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Drive(#[from] DriveError),
}

/// Holds the mutable state of the session between commands.
pub struct Session {
    pub options: HashMap<String, String>,
    catalog: Arc<TileCatalog>,
    level_name: Option<String>,
    board: Option<Board>,
    player: Option<Player>,
    streetcar: Option<Streetcar>,
    rng: SmallRng,
}

impl Session {
    /// Creates a session with the standard tiles and no level.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Creates a session whose die rolls are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Session {
            options: HashMap::new(),
            catalog: Arc::new(TileCatalog::standard()),
            level_name: None,
            board: None,
            player: None,
            streetcar: None,
            rng,
        }
    }

    pub fn level_name(&self) -> Option<&str> {
        self.level_name.as_deref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn streetcar(&self) -> Option<&Streetcar> {
        self.streetcar.as_ref()
    }

    /// Sets a session option.
    ///
    /// `Seed` reseeds the die and `TileCatalog` loads a catalog file, which
    /// clears the board. Other names are stored as given.
    pub fn set_option(&mut self, name: String, value: Option<String>) -> Result<(), SessionError> {
        let value = value.unwrap_or_default();
        let bad = || SessionError::BadOption { name: name.clone(), value: value.clone() };
        match name.as_str() {
            "Pathfinder" => {
                value.parse::<PathfinderKind>().map_err(|_| bad())?;
            }
            "Seed" => {
                let seed = value.parse::<u64>().map_err(|_| bad())?;
                self.rng = SmallRng::seed_from_u64(seed);
            }
            "TileCatalog" => {
                let json = std::fs::read_to_string(&value).map_err(|source| SessionError::Io {
                    path: PathBuf::from(&value),
                    source,
                })?;
                self.catalog = Arc::new(TileCatalog::from_json(&json)?);
                log::info!("loaded {} tile kinds from {}", self.catalog.len(), value);
                self.level_name = None;
                self.board = None;
                self.player = None;
                self.streetcar = None;
            }
            _ => {}
        }
        self.options.insert(name, value);
        Ok(())
    }

    /// Returns the configured pathfinder, or breadth-first search.
    fn pathfinder(&self) -> PathfinderKind {
        self.options
            .get("Pathfinder")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Loads a level, replacing the board. Clears the player and streetcar.
    pub fn load_level(&mut self, source: &LevelSource) -> Result<&str, SessionError> {
        let level = match source {
            LevelSource::Default => Level::classic(),
            LevelSource::Path(path) => Level::load(path)?,
        };
        let board = level.build_board(Arc::clone(&self.catalog))?;
        self.board = Some(board);
        self.player = None;
        self.streetcar = None;
        Ok(self.level_name.insert(level.level_name).as_str())
    }

    /// Sets the active player. Every stop must name a building on the board
    /// and every tile a catalog entry.
    pub fn set_player(
        &mut self,
        line: u8,
        stops: Vec<String>,
        tiles: &[String],
    ) -> Result<(), SessionError> {
        let board = self.board.as_ref().ok_or(SessionError::NoLevel)?;
        if let Some(unknown) = stops
            .iter()
            .find(|id| !board.building_coords().contains_key(id.as_str()))
        {
            return Err(SessionError::UnknownBuilding(unknown.clone()));
        }
        let hand = tiles
            .iter()
            .map(|name| board.catalog().lookup(name))
            .collect::<Result<Vec<TileId>, _>>()?;
        let player =
            Player::for_line(board, 0, line, stops, hand).ok_or(SessionError::UnknownLine(line))?;
        self.player = Some(player);
        self.streetcar = None;
        Ok(())
    }

    /// Checks a placement or exchange without making it.
    pub fn check_move(&self, args: &MoveArgs, exchange: bool) -> Result<(TileId, Coord), SessionError> {
        let board = self.board.as_ref().ok_or(SessionError::NoLevel)?;
        let tile = board.catalog().lookup(&args.tile)?;
        let coord = Coord::new(args.row, args.col);
        if exchange {
            let player = self.player.as_ref().ok_or(SessionError::NoPlayer)?;
            check_exchange_validity(board, player, tile, args.orientation, coord, &[])?;
        } else {
            check_placement_validity(board, tile, args.orientation, coord, &[])?;
        }
        Ok((tile, coord))
    }

    /// Makes a checked placement or exchange and awards any stop sign it
    /// earns. Returns the building the new stop sign serves.
    ///
    /// Any change to the track discards the current streetcar.
    pub fn apply_move(&mut self, args: &MoveArgs, exchange: bool) -> Result<Option<String>, SessionError> {
        let (tile, coord) = self.check_move(args, exchange)?;
        let board = self.board.as_mut().ok_or(SessionError::NoLevel)?;
        board.set_tile(coord, Some(PlacedTile::new(tile, args.orientation)))?;
        self.streetcar = None;
        Ok(check_and_place_stop_sign(board, coord))
    }

    /// Runs the route completion check and, on success, puts a fresh
    /// streetcar at the start of the route.
    pub fn check_route(&mut self) -> Result<Option<&RouteCompletion>, SessionError> {
        let pathfinder = self.pathfinder();
        let board = self.board.as_ref().ok_or(SessionError::NoLevel)?;
        let player = self.player.as_ref().ok_or(SessionError::NoPlayer)?;
        let route = check_player_route_completion(board, player, &pathfinder);
        self.streetcar = route.map(Streetcar::new);
        Ok(self.streetcar.as_ref().map(Streetcar::route))
    }

    /// Drives the streetcar one roll. Returns the face, the new position,
    /// and whether the streetcar has arrived.
    pub fn drive(&mut self, roll: Roll) -> Result<(DieFace, Coord, bool), SessionError> {
        let board = self.board.as_ref().ok_or(SessionError::NoLevel)?;
        let car = self.streetcar.as_mut().ok_or(SessionError::NoRoute)?;
        let face = match roll {
            Roll::Face(face) => face,
            Roll::Random => DieFace::roll(&mut self.rng),
        };
        car.drive(board, face)?;
        Ok((face, car.position(), car.has_arrived()))
    }

    pub fn any_move(&self) -> Result<bool, SessionError> {
        let board = self.board.as_ref().ok_or(SessionError::NoLevel)?;
        let player = self.player.as_ref().ok_or(SessionError::NoPlayer)?;
        Ok(can_player_make_any_move(board, player))
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    pub fn handle_setoption<W: Write>(
        &mut self,
        out: &mut W,
        name: String,
        value: Option<String>,
    ) -> io::Result<()> {
        if let Err(e) = self.set_option(name, value) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    pub fn handle_level<W: Write>(&mut self, out: &mut W, source: &LevelSource) -> io::Result<()> {
        match self.load_level(source) {
            Ok(name) => writeln!(out, "levelok {}", name)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    pub fn handle_player<W: Write>(
        &mut self,
        out: &mut W,
        line: u8,
        stops: Vec<String>,
        tiles: &[String],
    ) -> io::Result<()> {
        match self.set_player(line, stops, tiles) {
            Ok(()) => writeln!(out, "playerok")?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `place` and `exchange`.
    pub fn handle_move<W: Write>(&mut self, out: &mut W, args: &MoveArgs, exchange: bool) -> io::Result<()> {
        let verb = if exchange { "exchanged" } else { "placed" };
        match self.apply_move(args, exchange) {
            Ok(Some(building)) => writeln!(out, "{} stop {}", verb, building)?,
            Ok(None) => writeln!(out, "{}", verb)?,
            Err(SessionError::Illegal(v)) => writeln!(out, "illegal {}", v)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    pub fn handle_check<W: Write>(&self, out: &mut W, args: &MoveArgs, exchange: bool) -> io::Result<()> {
        match self.check_move(args, exchange) {
            Ok(_) => writeln!(out, "legal")?,
            Err(SessionError::Illegal(v)) => writeln!(out, "illegal {}", v)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `route`: `route <start> <cost> <coords..>` or `noroute`.
    pub fn handle_route<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.check_route() {
            Ok(Some(route)) => {
                let steps: Vec<String> = route.path.coords().map(|c| c.to_string()).collect();
                writeln!(
                    out,
                    "route {} {} {}",
                    route.start_terminal,
                    route.path.cost,
                    steps.join(" ")
                )?;
            }
            Ok(None) => writeln!(out, "noroute")?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    pub fn handle_drive<W: Write>(&mut self, out: &mut W, roll: Roll) -> io::Result<()> {
        match self.drive(roll) {
            Ok((face, pos, true)) => writeln!(out, "drove {} {} arrived", face, pos)?,
            Ok((face, pos, false)) => writeln!(out, "drove {} {}", face, pos)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    pub fn handle_anymove<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.any_move() {
            Ok(yes) => writeln!(out, "anymove {}", if yes { "yes" } else { "no" })?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }
}
