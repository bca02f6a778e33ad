//! Move-notation expansion and chain reduction. The oracle reports a turn as
//! tokens like `24/18/13` or `13/11(2)`; downstream planning wants one span
//! per checker, independent of how many dice composed it.

use crate::model::moves::{BAR, MoveSpan, OFF};

/// Expands raw notation into atomic from/to segments, in token order.
/// Unparseable tokens are skipped; a tolerant decode is part of the oracle
/// reply contract.
pub fn parse_moves(raw: &str) -> Vec<MoveSpan> {
    raw.split_whitespace().flat_map(expand_token).collect()
}

fn expand_token(token: &str) -> Vec<MoveSpan> {
    let (body, count) = match split_repeat(token) {
        Some(parsed) => parsed,
        None => return Vec::new(),
    };

    let mut points = Vec::new();
    for part in body.split('/') {
        match parse_endpoint(part) {
            Some(point) => points.push(point),
            None => return Vec::new(),
        }
    }
    if points.len() < 2 {
        return Vec::new();
    }

    let segments: Vec<MoveSpan> = points
        .windows(2)
        .map(|pair| MoveSpan::new(pair[0], pair[1]))
        .collect();

    let mut expanded = Vec::with_capacity(segments.len() * count);
    for _ in 0..count {
        expanded.extend_from_slice(&segments);
    }
    expanded
}

fn split_repeat(token: &str) -> Option<(&str, usize)> {
    if let Some(stripped) = token.strip_suffix(')') {
        let open = stripped.rfind('(')?;
        let count = stripped[open + 1..].parse::<usize>().ok()?;
        Some((&stripped[..open], count))
    } else {
        Some((token, 1))
    }
}

fn parse_endpoint(part: &str) -> Option<u8> {
    let part = part.trim_end_matches('*');
    if part.eq_ignore_ascii_case("bar") {
        return Some(BAR);
    }
    if part.eq_ignore_ascii_case("off") {
        return Some(OFF);
    }
    let point = part.parse::<u8>().ok()?;
    (point <= 24).then_some(point)
}

/// Collapses atomic segments into one minimal span per checker. Segments are
/// edges of a multigraph: repeatedly pick a chain head (a `from` that is no
/// edge's `to`), follow continuations until none remain, and emit the merged
/// span. A closed loop cannot occur in valid data but must not hang, so the
/// first remaining edge serves as a fallback head. Result is sorted by
/// `(from, to)` descending and the operation is idempotent.
pub fn reduce(atomic: &[MoveSpan]) -> Vec<MoveSpan> {
    let mut edges: Vec<MoveSpan> = atomic.to_vec();
    let mut reduced = Vec::new();

    while !edges.is_empty() {
        let head = edges
            .iter()
            .position(|edge| !edges.iter().any(|other| other.to == edge.from))
            .unwrap_or(0);
        let start = edges.remove(head);
        let from = start.from;
        let mut to = start.to;

        while let Some(next) = edges.iter().position(|edge| edge.from == to) {
            to = edges.remove(next).to;
        }
        reduced.push(MoveSpan::new(from, to));
    }

    reduced.sort_by(|a, b| (b.from, b.to).cmp(&(a.from, a.to)));
    reduced
}
