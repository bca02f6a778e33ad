//! Path reconstruction: binds the oracle's reduced move spans to the dice
//! that were actually rolled. Dice come from one shared pool across all
//! spans; each committed span consumes its dice and mutates a private
//! simulation copy of both boards, so hits and vacated points are visible to
//! the spans planned after it. The caller's position is never touched.

use gammon_core::model::board::{Board, Position, mirror_point};
use gammon_core::model::dice::DiceRoll;
use gammon_core::model::moves::{AtomicHop, BAR, HopKind, MoveSpan, OFF};
use itertools::Itertools;
use tracing::{debug, warn};

/// One single-die hop of the final plan, classified against the simulated
/// boards at the moment it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedHop {
    pub from: u8,
    pub to: u8,
    pub die: u8,
    pub kind: HopKind,
}

/// Plans the turn. Proceeds in passes: bar entries first, then the first
/// span with a currently legal hop sequence commits and the scan restarts.
/// A pass that commits nothing ends the plan; partial plans are valid
/// output and the caller must not assume completion.
pub fn plan(spans: &[MoveSpan], dice: DiceRoll, position: &Position) -> Vec<PlannedHop> {
    let mut pool = dice.pool();
    let mut own = position.own;
    let mut opponent = position.opponent;
    let mut pending: Vec<MoveSpan> = spans.to_vec();
    let mut planned = Vec::new();

    while !pending.is_empty() {
        // Checkers on the bar must re-enter before anything else moves.
        pending.sort_by_key(|span| !span.is_bar_entry());

        let mut committed = None;
        for (idx, span) in pending.iter().enumerate() {
            if !span.is_bar_entry() && own.point(span.from) == 0 {
                continue;
            }
            let Some(path) = find_path(span.from, span.to, &pool, &opponent) else {
                continue;
            };

            for hop in &path {
                match pool.iter().position(|&die| die == hop.die) {
                    Some(at) => {
                        pool.remove(at);
                    }
                    None if !pool.is_empty() => {
                        pool.remove(0);
                    }
                    None => {}
                }
            }
            for hop in path {
                let hit = hop.to != OFF && opponent.point(mirror_point(hop.to)) == 1;
                if hit {
                    opponent.clear_point(mirror_point(hop.to));
                }
                if hop.from != BAR {
                    own.remove_checker(hop.from);
                }
                if hop.to != OFF {
                    own.add_checker(hop.to);
                }
                planned.push(PlannedHop {
                    from: hop.from,
                    to: hop.to,
                    die: hop.die,
                    kind: HopKind::classify(hop.from, hop.to, hit),
                });
            }
            debug!(from = span.from, to = span.to, "committed span");
            committed = Some(idx);
            break;
        }

        match committed {
            Some(idx) => {
                pending.remove(idx);
            }
            None => {
                warn!(
                    remaining = pending.len(),
                    "no legal path for remaining spans, returning partial plan"
                );
                break;
            }
        }
    }

    planned
}

/// Finds an ordered hop sequence covering `start -> end` from the remaining
/// pool, in priority order: exact single die, bear-off with the smallest
/// oversized die, multi-die compositions (order matters for intermediate
/// landings), and a best-effort bear-off fallback.
fn find_path(start: u8, end: u8, pool: &[u8], opponent: &Board) -> Option<Vec<AtomicHop>> {
    let needed = i16::from(start) - i16::from(end);

    if (1..=6).contains(&needed)
        && pool.contains(&(needed as u8))
        && !is_blocked(opponent, end)
    {
        return Some(vec![AtomicHop {
            from: start,
            to: end,
            die: needed as u8,
        }]);
    }

    if end == OFF {
        if let Some(&die) = pool.iter().filter(|&&die| i16::from(die) > needed).min() {
            return Some(vec![AtomicHop {
                from: start,
                to: OFF,
                die,
            }]);
        }
    }

    for width in 2..=pool.len() {
        for combo in pool.iter().copied().permutations(width).unique() {
            let total: i16 = combo.iter().map(|&die| i16::from(die)).sum();
            if end != OFF && total != needed {
                continue;
            }
            if end == OFF && total < needed {
                continue;
            }
            if let Some(path) = walk(start, end, &combo, opponent) {
                return Some(path);
            }
        }
    }

    // Last resort for bear-offs: play the biggest die even when imperfect
    // rather than stalling the turn.
    if end == OFF {
        if let Some(&best) = pool.iter().max() {
            let pool_total: i16 = pool.iter().map(|&die| i16::from(die)).sum();
            if i16::from(best) >= needed || pool_total < needed {
                return Some(vec![AtomicHop {
                    from: start,
                    to: OFF,
                    die: best,
                }]);
            }
        }
    }

    None
}

/// Simulates one dice ordering hop by hop. Own hits clear the simulated
/// opponent point so later hops of the same span see it open. Bear-off
/// spans clamp the final hop at 0; any other overshoot fails the ordering.
fn walk(start: u8, end: u8, combo: &[u8], opponent: &Board) -> Option<Vec<AtomicHop>> {
    let mut sim = *opponent;
    let mut path = Vec::new();
    let mut curr = i16::from(start);
    let target = i16::from(end);

    for &die in combo {
        let mut next = curr - i16::from(die);
        if next < 0 {
            if end == OFF {
                next = 0;
            } else {
                return None;
            }
        }
        if next > 0 {
            let landing = mirror_point(next as u8);
            if sim.point(landing) >= 2 {
                return None;
            }
        }
        path.push(AtomicHop {
            from: curr as u8,
            to: next as u8,
            die,
        });
        if next > 0 {
            let landing = mirror_point(next as u8);
            if sim.point(landing) == 1 {
                sim.clear_point(landing);
            }
        }
        curr = next;
        if curr == target {
            break;
        }
    }

    (curr == target).then_some(path)
}

fn is_blocked(opponent: &Board, landing: u8) -> bool {
    landing != OFF && opponent.point(mirror_point(landing)) >= 2
}
