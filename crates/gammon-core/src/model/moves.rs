use serde::{Deserialize, Serialize};

/// Notation value for a checker entering from the bar.
pub const BAR: u8 = 25;
/// Notation value for a checker borne off the board.
pub const OFF: u8 = 0;

/// One checker's movement between two board locations. Used both for the
/// atomic segments of parsed notation and for the reduced per-checker spans:
/// a span covers the checker's whole turn regardless of how many dice it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveSpan {
    pub from: u8,
    pub to: u8,
}

impl MoveSpan {
    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }

    pub const fn is_bar_entry(&self) -> bool {
        self.from == BAR
    }

    pub const fn is_bear_off(&self) -> bool {
        self.to == OFF
    }

    /// Exact pip distance of the span.
    pub const fn distance(&self) -> u8 {
        self.from - self.to
    }
}

/// One single-die hop. `die` equals the distance except for bear-off hops,
/// where an oversized die may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicHop {
    pub from: u8,
    pub to: u8,
    pub die: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HopKind {
    Move,
    Enter,
    Hit,
    EnterHit,
    BearOff,
}

impl HopKind {
    pub fn classify(from: u8, to: u8, hit: bool) -> Self {
        if to == OFF {
            HopKind::BearOff
        } else if from == BAR {
            if hit { HopKind::EnterHit } else { HopKind::Enter }
        } else if hit {
            HopKind::Hit
        } else {
            HopKind::Move
        }
    }

    /// Tag the dispatch layer sends with each move packet.
    pub const fn tag(self) -> &'static str {
        match self {
            HopKind::Move => "MOVE",
            HopKind::Enter => "ENTER_MOVE",
            HopKind::Hit => "HIT",
            HopKind::EnterHit => "ENTER_HIT",
            HopKind::BearOff => "BEAR_OFF",
        }
    }

    pub const fn is_hit(self) -> bool {
        matches!(self, HopKind::Hit | HopKind::EnterHit)
    }
}
