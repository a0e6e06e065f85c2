//! Tile kinds, orientations, and connection tables.
//!
//! A tile's track geometry is a symmetric adjacency between its four edges.
//! Tables are stored as per-edge bitsets so rotation, lookup, and subset
//! checks are a few bit operations. Every tile kind precomputes its four
//! rotated tables at construction.

use std::collections::HashMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::direction::{Direction, InvalidInput, ALL_DIRECTIONS};

/// Clockwise rotation of a placed tile, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}

/// All orientations in increasing angle.
pub const ALL_ORIENTATIONS: [Orientation; 4] = [
    Orientation::Deg0,
    Orientation::Deg90,
    Orientation::Deg180,
    Orientation::Deg270,
];

impl Orientation {
    /// Builds an orientation from degrees. Values are taken mod 360; anything
    /// that is not a multiple of 90 is rejected.
    pub fn from_degrees(degrees: i32) -> Result<Orientation, InvalidInput> {
        let normalized = degrees.rem_euclid(360);
        if normalized % 90 != 0 {
            return Err(InvalidInput::Orientation(degrees));
        }
        Ok(ALL_ORIENTATIONS[(normalized / 90) as usize])
    }

    /// Number of clockwise quarter turns (0..=3).
    pub const fn steps(self) -> u8 {
        self as u8
    }

    pub const fn degrees(self) -> i32 {
        self as i32 * 90
    }
}

impl TryFrom<i32> for Orientation {
    type Error = InvalidInput;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Orientation::from_degrees(degrees)
    }
}

/// A set of tile edges, one bit per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const EMPTY: EdgeSet = EdgeSet(0);

    pub const fn contains(self, d: Direction) -> bool {
        self.0 & (1 << d as u8) != 0
    }

    pub fn insert(&mut self, d: Direction) {
        self.0 |= 1 << d as u8;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn union(self, other: EdgeSet) -> EdgeSet {
        EdgeSet(self.0 | other.0)
    }

    /// Rotates every member clockwise by `steps` quarter turns.
    pub const fn rotated(self, steps: u8) -> EdgeSet {
        let s = steps % 4;
        EdgeSet(((self.0 << s) | (self.0 >> (4 - s))) & 0x0F)
    }

    /// Iterates members in N, E, S, W order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        ALL_DIRECTIONS.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = EdgeSet::EMPTY;
        for d in iter {
            set.insert(d);
        }
        set
    }
}

/// The six unordered edge pairs a tile can connect, in bit order.
pub const EDGE_PAIRS: [(Direction, Direction); 6] = [
    (Direction::N, Direction::E),
    (Direction::N, Direction::S),
    (Direction::N, Direction::W),
    (Direction::E, Direction::S),
    (Direction::E, Direction::W),
    (Direction::S, Direction::W),
];

/// Returns the bit index of an unordered pair of distinct edges.
fn pair_index(a: Direction, b: Direction) -> Option<usize> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    EDGE_PAIRS.iter().position(|&p| p == (lo, hi))
}

/// A set of unordered edge pairs (which edges a tile joins by track).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PairSet(u8);

impl PairSet {
    pub const EMPTY: PairSet = PairSet(0);

    pub fn contains(self, a: Direction, b: Direction) -> bool {
        pair_index(a, b).is_some_and(|i| self.0 & (1 << i) != 0)
    }

    pub fn insert(&mut self, a: Direction, b: Direction) {
        if let Some(i) = pair_index(a, b) {
            self.0 |= 1 << i;
        }
    }

    pub const fn is_subset(self, other: PairSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Pairs in `self` that are not in `other`.
    pub const fn difference(self, other: PairSet) -> PairSet {
        PairSet(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn iter(self) -> impl Iterator<Item = (Direction, Direction)> {
        EDGE_PAIRS
            .into_iter()
            .enumerate()
            .filter(move |(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, p)| p)
    }
}

/// Symmetric edge-to-edges adjacency of one tile at one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConnectionTable {
    exits: [EdgeSet; 4],
}

impl ConnectionTable {
    /// Builds a table from edge pairs, adding each pair in both directions.
    /// Pairs joining an edge to itself are ignored.
    pub fn from_pairs(pairs: &[(Direction, Direction)]) -> ConnectionTable {
        let mut table = ConnectionTable::default();
        for &(a, b) in pairs {
            if a == b {
                continue;
            }
            table.exits[a as usize].insert(b);
            table.exits[b as usize].insert(a);
        }
        table
    }

    /// Edges reachable by track from the given edge.
    pub const fn exits(&self, from: Direction) -> EdgeSet {
        self.exits[from as usize]
    }

    pub const fn connects(&self, a: Direction, b: Direction) -> bool {
        self.exits[a as usize].contains(b)
    }

    /// True if any track touches the given edge.
    pub const fn has_edge(&self, d: Direction) -> bool {
        !self.exits[d as usize].is_empty()
    }

    /// Every edge touched by track.
    pub fn edges(&self) -> EdgeSet {
        self.exits.iter().fold(EdgeSet::EMPTY, |acc, e| acc.union(*e))
    }

    pub const fn has_ns_straight(&self) -> bool {
        self.connects(Direction::N, Direction::S)
    }

    pub const fn has_ew_straight(&self) -> bool {
        self.connects(Direction::E, Direction::W)
    }

    /// Rotates keys and values clockwise by `steps` quarter turns.
    pub fn rotated(&self, steps: u8) -> ConnectionTable {
        let mut out = ConnectionTable::default();
        for d in ALL_DIRECTIONS {
            out.exits[d.rotated(steps) as usize] = self.exits[d as usize].rotated(steps);
        }
        out
    }

    /// The unordered edge pairs this table connects.
    pub fn pairs(&self) -> PairSet {
        let mut set = PairSet::EMPTY;
        for from in ALL_DIRECTIONS {
            for to in self.exits(from).iter() {
                set.insert(from, to);
            }
        }
        set
    }
}

/// Handle into a `TileCatalog`. Tiles compare by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u8);

/// An immutable tile kind: a name, its base track geometry, and whether a
/// placed copy may later be exchanged.
#[derive(Debug, Clone)]
pub struct TileKind {
    name: String,
    swappable: bool,
    rotations: [ConnectionTable; 4],
}

impl TileKind {
    pub fn new(name: impl Into<String>, pairs: &[(Direction, Direction)], swappable: bool) -> TileKind {
        let base = ConnectionTable::from_pairs(pairs);
        TileKind {
            name: name.into(),
            swappable,
            rotations: [base, base.rotated(1), base.rotated(2), base.rotated(3)],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_swappable(&self) -> bool {
        self.swappable
    }

    /// The connection table at orientation 0.
    pub fn base_connections(&self) -> &ConnectionTable {
        &self.rotations[0]
    }

    /// The connection table after rotating to `orientation`.
    pub fn connections_at(&self, orientation: Orientation) -> &ConnectionTable {
        &self.rotations[orientation as usize]
    }
}

/// Serialized form of a tile definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub name: String,
    pub connections: Vec<[Direction; 2]>,
    pub is_swappable: bool,
}

/// Errors building a tile catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate tile name: '{0}'")]
    DuplicateName(String),

    #[error("tile '{0}' connects edge {1} to itself")]
    SelfLoop(String, Direction),

    #[error("tile '{0}' has no track")]
    NoTrack(String),

    #[error("too many tile kinds: {0}")]
    TooMany(usize),

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Base connections of the standard tile set, in catalog order.
const STANDARD_TILES: [(&str, &[(Direction, Direction)], bool); 12] = {
    use Direction::*;
    [
        ("Straight", &[(N, S)], true),
        ("Curve", &[(N, E)], true),
        ("StraightLeftCurve", &[(N, S), (S, W)], true),
        ("StraightRightCurve", &[(N, S), (S, E)], true),
        ("DoubleCurveY", &[(N, W), (N, E)], true),
        ("DiagonalCurve", &[(S, W), (N, E)], true),
        ("Tree_JunctionTop", &[(E, W), (W, N), (N, E)], false),
        ("Tree_JunctionRight", &[(E, W), (N, E), (S, E)], false),
        ("Tree_Roundabout", &[(W, N), (N, E), (E, S), (S, W)], false),
        ("Tree_Crossroad", &[(N, S), (E, W)], false),
        ("Tree_StraightDiagonal1", &[(N, S), (S, W), (N, E)], false),
        ("Tree_StraightDiagonal2", &[(N, S), (N, W), (S, E)], false),
    ]
};

/// Name of the tile kind used for terminals.
pub const TERMINAL_TILE: &str = "Curve";

/// Immutable registry of tile kinds, addressed by `TileId`.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    kinds: Vec<TileKind>,
    by_name: HashMap<String, TileId>,
}

impl TileCatalog {
    /// Builds the standard twelve-tile catalog.
    pub fn standard() -> TileCatalog {
        let kinds = STANDARD_TILES
            .iter()
            .map(|(name, pairs, swappable)| TileKind::new(*name, pairs, *swappable))
            .collect();
        Self::from_kinds_unchecked(kinds)
    }

    /// Builds a catalog from serialized definitions, validating each one.
    pub fn from_definitions(defs: &[TileDefinition]) -> Result<TileCatalog, CatalogError> {
        if defs.len() > u8::MAX as usize {
            return Err(CatalogError::TooMany(defs.len()));
        }
        let mut kinds = Vec::with_capacity(defs.len());
        let mut seen = std::collections::HashSet::new();
        for def in defs {
            if !seen.insert(def.name.as_str()) {
                return Err(CatalogError::DuplicateName(def.name.clone()));
            }
            if def.connections.is_empty() {
                return Err(CatalogError::NoTrack(def.name.clone()));
            }
            let mut pairs = Vec::with_capacity(def.connections.len());
            for [a, b] in &def.connections {
                if a == b {
                    return Err(CatalogError::SelfLoop(def.name.clone(), *a));
                }
                pairs.push((*a, *b));
            }
            kinds.push(TileKind::new(def.name.clone(), &pairs, def.is_swappable));
        }
        Ok(Self::from_kinds_unchecked(kinds))
    }

    /// Parses a JSON array of tile definitions.
    pub fn from_json(json: &str) -> Result<TileCatalog, CatalogError> {
        let defs: Vec<TileDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(&defs)
    }

    fn from_kinds_unchecked(kinds: Vec<TileKind>) -> TileCatalog {
        let by_name = kinds
            .iter()
            .enumerate()
            .map(|(i, k)| (k.name.clone(), TileId(i as u8)))
            .collect();
        TileCatalog { kinds, by_name }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&TileKind> {
        self.kinds.get(id.0 as usize)
    }

    /// Looks up a tile id by name.
    pub fn id(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    /// Like `id`, but reports unknown names as `InvalidInput`.
    pub fn lookup(&self, name: &str) -> Result<TileId, InvalidInput> {
        self.id(name).ok_or_else(|| InvalidInput::UnknownTile(name.to_string()))
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.kinds.len()).map(|i| TileId(i as u8))
    }
}

impl Index<TileId> for TileCatalog {
    type Output = TileKind;

    fn index(&self, id: TileId) -> &TileKind {
        &self.kinds[id.0 as usize]
    }
}

/// A tile on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    pub kind: TileId,
    pub orientation: Orientation,
    pub has_stop_sign: bool,
    pub is_terminal: bool,
}

impl PlacedTile {
    pub fn new(kind: TileId, orientation: Orientation) -> Self {
        Self { kind, orientation, has_stop_sign: false, is_terminal: false }
    }

    /// A permanent terminal tile placed at board setup.
    pub fn terminal(kind: TileId, orientation: Orientation) -> Self {
        Self { kind, orientation, has_stop_sign: false, is_terminal: true }
    }
}
