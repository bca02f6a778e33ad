//! Decoding of the oracle's free-form hint text. Nothing about the reply is
//! structured, so both extractors are tolerant: a missing equity line or an
//! unexpected cube phrasing degrades to `None` / a safe default, never an
//! error.

use serde::{Deserialize, Serialize};

const EQUITY_MARKER: &str = "Eq.:";
const CUBE_MARKER: &str = "proper cube action:";

/// Machine decision extracted from a cube-analysis reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeAction {
    Take,
    Pass,
    NoDouble,
    DoubleTake,
    DoublePass,
    Beaver,
}

impl CubeAction {
    pub const fn code(self) -> &'static str {
        match self {
            CubeAction::Take => "take",
            CubeAction::Pass => "pass",
            CubeAction::NoDouble => "no_double",
            CubeAction::DoubleTake => "double_take",
            CubeAction::DoublePass => "double_pass",
            CubeAction::Beaver => "beaver",
        }
    }

    pub const fn recommends_double(self) -> bool {
        matches!(self, CubeAction::DoubleTake | CubeAction::DoublePass)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeDecision {
    pub action: CubeAction,
    pub label: &'static str,
}

/// Classifies the oracle's cube recommendation. The phrase is the text after
/// the first "proper cube action" marker, falling back to the whole reply
/// when the marker is missing. Tie-break order differs between the two
/// question kinds; every branch ends in a safe default.
pub fn classify_cube(raw: &str, receiving_double: bool) -> CubeDecision {
    let lower = raw.to_lowercase();
    let phrase = match lower.find(CUBE_MARKER) {
        Some(idx) => lower[idx + CUBE_MARKER.len()..]
            .lines()
            .next()
            .unwrap_or(""),
        None => lower.as_str(),
    };

    let (action, label) = if receiving_double {
        if phrase.contains("beaver") {
            (CubeAction::Take, "Beaver (Take)")
        } else if phrase.contains("take") || phrase.contains("accept") {
            (CubeAction::Take, "Take")
        } else if phrase.contains("no double") || phrase.contains("no redouble") {
            // The opponent doubled from a position where doubling is an
            // error. Still a take for us.
            (CubeAction::Take, "Take (Opponent Error)")
        } else if phrase.contains("pass") || phrase.contains("drop") {
            (CubeAction::Pass, "Pass")
        } else {
            (CubeAction::Take, "Take (Unclear)")
        }
    } else if phrase.contains("no double") || phrase.contains("no redouble") {
        (CubeAction::NoDouble, "No Double")
    } else if phrase.contains("double, pass") {
        (CubeAction::DoublePass, "Double / Pass")
    } else if phrase.contains("double, take") {
        (CubeAction::DoubleTake, "Double / Take")
    } else if phrase.contains("redouble, pass") {
        (CubeAction::DoublePass, "Redouble / Pass")
    } else if phrase.contains("redouble, take") {
        (CubeAction::DoubleTake, "Redouble / Take")
    } else if phrase.contains("beaver") {
        (CubeAction::Beaver, "Beaver")
    } else if phrase.contains("double") && !phrase.contains("no") {
        (CubeAction::DoubleTake, "Double (Generic)")
    } else {
        (CubeAction::NoDouble, "No Double (Default)")
    };

    CubeDecision { action, label }
}

/// Extracts the recommended move from a hint reply: on each line carrying the
/// equity marker, the first maximal run of movement tokens left of the
/// marker. Returns `None` when no line yields one.
pub fn best_move_fragment(raw: &str) -> Option<String> {
    for line in raw.lines() {
        if let Some(idx) = line.find(EQUITY_MARKER) {
            if let Some(island) = move_island(&line[..idx]) {
                return Some(island);
            }
        }
    }
    None
}

/// First maximal run of consecutive whitespace-separated movement tokens.
fn move_island(text: &str) -> Option<String> {
    let mut island: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        if is_move_token(token) {
            island.push(token);
        } else if !island.is_empty() {
            break;
        }
    }
    if island.is_empty() {
        None
    } else {
        Some(island.join(" "))
    }
}

/// A movement token is `<pt>[*](/<pt>[*])+` with an optional trailing
/// `(count)`, where `<pt>` is `bar`, `off` or one or two digits.
fn is_move_token(token: &str) -> bool {
    let body = match strip_repeat_suffix(token) {
        Some(body) => body,
        None => return false,
    };
    let parts: Vec<&str> = body.split('/').collect();
    if parts.len() < 2 {
        return false;
    }
    parts.iter().all(|part| is_endpoint(part))
}

fn strip_repeat_suffix(token: &str) -> Option<&str> {
    if let Some(stripped) = token.strip_suffix(')') {
        let open = stripped.rfind('(')?;
        let digits = &stripped[open + 1..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(&stripped[..open])
    } else {
        Some(token)
    }
}

fn is_endpoint(part: &str) -> bool {
    let part = part.strip_suffix('*').unwrap_or(part);
    if part.eq_ignore_ascii_case("bar") || part.eq_ignore_ascii_case("off") {
        return true;
    }
    !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
}
