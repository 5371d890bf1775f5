use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;
pub const MIN_RUN: usize = 3;
/// Redraws allowed per cell during board generation before falling back to
/// the first kind that does not complete a run.
pub const MAX_GENERATION_ATTEMPTS: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GemKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Cyan,
}

impl GemKind {
    pub const ALL: [GemKind; 6] = [
        GemKind::Red,
        GemKind::Blue,
        GemKind::Green,
        GemKind::Yellow,
        GemKind::Purple,
        GemKind::Cyan,
    ];

    /// The first `size` kinds, clamped to the six available.
    pub fn palette(size: usize) -> &'static [GemKind] {
        &Self::ALL[..size.min(Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            GemKind::Red => "red",
            GemKind::Blue => "blue",
            GemKind::Green => "green",
            GemKind::Yellow => "yellow",
            GemKind::Purple => "purple",
            GemKind::Cyan => "cyan",
        }
    }
}

impl fmt::Display for GemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placeholder for power-up gems; carried on every gem, never produced yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpecialMarker {
    #[default]
    None,
    RowClear,
    ColumnClear,
    Bomb,
    ColorBomb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GemId(pub u64);

impl fmt::Display for GemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gem {
    pub id: GemId,
    /// `None` while the cell is cleared and waiting for gravity.
    pub kind: Option<GemKind>,
    pub special: SpecialMarker,
}

impl Gem {
    pub fn new(id: GemId, kind: GemKind) -> Self {
        Self {
            id,
            kind: Some(kind),
            special: SpecialMarker::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearedCell {
    pub position: Position,
    pub kind: GemKind,
}

/// One settle iteration's worth of matches.
///
/// `gem_kind` is the kind of the last qualifying run in scan order (rows
/// first, then columns). When a pass matches several kinds at once only that
/// last one is reported here; `cleared` still lists every cell with its own
/// kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchEvent {
    pub cleared_count: usize,
    pub combo: u32,
    pub gem_kind: GemKind,
    pub cleared: Vec<ClearedCell>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GemMove {
    pub id: GemId,
    pub from: Position,
    pub to: Position,
}

/// Receives match events as the cascade resolves them.
pub trait MatchHandler {
    fn on_match(&mut self, event: &MatchEvent);
}

impl<F> MatchHandler for F
where
    F: FnMut(&MatchEvent),
{
    fn on_match(&mut self, event: &MatchEvent) {
        self(event)
    }
}
