//! Turns a planned hop list into a wire-ready schedule of waits and packets.
//!
//! Each distinct checker movement becomes one wait (hesitation plus drag)
//! followed by one `MoveCheckerV2` packet carrying a single move. Successive
//! hops of the same checker are momentum hops: they skip hesitation and use
//! the short momentum drag instead of the distance model.

use gammon_core::model::board::mirror_point;
use gammon_core::model::moves::{BAR, OFF};
use serde::Serialize;
use uuid::Uuid;

use crate::pacing::Pacer;
use crate::planner::PlannedHop;

/// One step of a timed execution schedule.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimedAction {
    Wait { seconds: f64 },
    Send { payload: MovePacket, hint: String },
}

/// Outbound checker-movement packet.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovePacket {
    pub stage: &'static str,
    pub action: &'static str,
    pub data: MoveData,
    pub nonce: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoveData {
    pub moves: Vec<WireMove>,
}

/// A single move in board coordinates the server understands. Bar sources
/// and bear-off destinations are carried as nulls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireMove {
    pub from: Option<u8>,
    pub to: Option<u8>,
    pub die: u8,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl MovePacket {
    fn single(wire: WireMove) -> Self {
        Self {
            stage: "GamePlay",
            action: "MoveCheckerV2",
            data: MoveData { moves: vec![wire] },
            nonce: Uuid::new_v4().to_string(),
        }
    }
}

fn wire_point(point: u8, reversed: bool) -> u8 {
    if reversed { mirror_point(point) } else { point }
}

/// Builds the full timed schedule for one turn: a planning wait up front,
/// then per hop a wait and a send. Returns an empty schedule when there is
/// nothing to move.
pub fn sequence(
    pacer: &mut Pacer,
    hops: &[PlannedHop],
    spans: usize,
    complex: bool,
    reversed: bool,
) -> Vec<TimedAction> {
    if hops.is_empty() {
        return Vec::new();
    }

    let mut schedule = Vec::with_capacity(1 + hops.len() * 2);
    schedule.push(TimedAction::Wait {
        seconds: pacer.planning_delay(spans, complex),
    });

    let mut last_destination: Option<u8> = None;
    let mut prev_was_hit = false;
    let mut executed = 0usize;

    for hop in hops {
        let momentum = last_destination == Some(hop.from) && hop.from != BAR;
        let hit = hop.kind.is_hit();
        let bearoff = hop.to == OFF;
        let distance = hop.from.abs_diff(hop.to);

        let hesitation = if momentum {
            0.0
        } else {
            pacer.hesitation_delay(executed, prev_was_hit)
        };
        let drag = pacer.drag_delay(distance, hit, bearoff, momentum);
        schedule.push(TimedAction::Wait {
            seconds: hesitation + drag,
        });

        let wire_from = (hop.from != BAR).then(|| wire_point(hop.from, reversed));
        let wire_to = (hop.to != OFF).then(|| wire_point(hop.to, reversed));
        let arrow = if hit { "\u{1f4a5}" } else { "\u{27a1}" };
        let hint = format!("{}{}{}", hop.from, arrow, hop.to);
        schedule.push(TimedAction::Send {
            payload: MovePacket::single(WireMove {
                from: wire_from,
                to: wire_to,
                die: hop.die,
                kind: hop.kind.tag(),
            }),
            hint,
        });

        if !momentum {
            executed += 1;
        }
        last_destination = Some(hop.to);
        prev_was_hit = hit;
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::{TimedAction, sequence};
    use crate::pacing::{Pacer, PacingConfig};
    use crate::planner::PlannedHop;
    use gammon_core::model::moves::HopKind;

    fn pacer() -> Pacer {
        Pacer::with_seed(PacingConfig::default(), 99)
    }

    fn hop(from: u8, to: u8, die: u8, kind: HopKind) -> PlannedHop {
        PlannedHop {
            from,
            to,
            die,
            kind,
        }
    }

    #[test]
    fn empty_plan_yields_empty_schedule() {
        let mut pacer = pacer();
        assert!(sequence(&mut pacer, &[], 0, false, false).is_empty());
    }

    #[test]
    fn schedule_alternates_waits_and_sends() {
        let mut pacer = pacer();
        pacer.start_turn();
        let hops = [
            hop(24, 18, 6, HopKind::Move),
            hop(13, 8, 5, HopKind::Move),
        ];
        let schedule = sequence(&mut pacer, &hops, 2, false, false);
        assert_eq!(schedule.len(), 5);
        assert!(matches!(schedule[0], TimedAction::Wait { .. }));
        assert!(matches!(schedule[1], TimedAction::Wait { .. }));
        assert!(matches!(schedule[2], TimedAction::Send { .. }));
        assert!(matches!(schedule[3], TimedAction::Wait { .. }));
        assert!(matches!(schedule[4], TimedAction::Send { .. }));
    }

    #[test]
    fn bar_and_off_become_nulls_on_the_wire() {
        let mut pacer = pacer();
        pacer.start_turn();
        let hops = [
            hop(25, 20, 5, HopKind::Enter),
            hop(3, 0, 3, HopKind::BearOff),
        ];
        let schedule = sequence(&mut pacer, &hops, 2, false, false);
        let sends: Vec<_> = schedule
            .iter()
            .filter_map(|action| match action {
                TimedAction::Send { payload, .. } => Some(&payload.data.moves[0]),
                TimedAction::Wait { .. } => None,
            })
            .collect();
        assert_eq!(sends[0].from, None);
        assert_eq!(sends[0].to, Some(20));
        assert_eq!(sends[0].kind, "ENTER_MOVE");
        assert_eq!(sends[1].from, Some(3));
        assert_eq!(sends[1].to, None);
        assert_eq!(sends[1].kind, "BEAR_OFF");
    }

    #[test]
    fn reversed_board_mirrors_wire_points() {
        let mut pacer = pacer();
        pacer.start_turn();
        let hops = [hop(24, 18, 6, HopKind::Move)];
        let schedule = sequence(&mut pacer, &hops, 1, false, true);
        let TimedAction::Send { payload, hint } = &schedule[2] else {
            panic!("expected a send");
        };
        assert_eq!(payload.data.moves[0].from, Some(1));
        assert_eq!(payload.data.moves[0].to, Some(7));
        // The hint keeps the bot's own perspective.
        assert_eq!(hint, "24\u{27a1}18");
    }

    #[test]
    fn momentum_hop_shares_the_checker_and_skips_hesitation() {
        let hops = [
            hop(13, 8, 5, HopKind::Move),
            hop(8, 5, 3, HopKind::Move),
        ];
        // Momentum waits are bounded by the fixed momentum drag range, with
        // no hesitation component on top.
        let mut pacer = pacer();
        pacer.start_turn();
        let schedule = sequence(&mut pacer, &hops, 2, false, false);
        let TimedAction::Wait { seconds } = schedule[3] else {
            panic!("expected a wait");
        };
        assert!(seconds < 0.32);
    }

    #[test]
    fn hit_hint_uses_the_impact_marker() {
        let mut pacer = pacer();
        pacer.start_turn();
        let hops = [hop(13, 8, 5, HopKind::Hit)];
        let schedule = sequence(&mut pacer, &hops, 1, false, false);
        let TimedAction::Send { hint, .. } = &schedule[2] else {
            panic!("expected a send");
        };
        assert_eq!(hint, "13\u{1f4a5}8");
    }

    #[test]
    fn packets_carry_distinct_nonces() {
        let mut pacer = pacer();
        pacer.start_turn();
        let hops = [
            hop(24, 18, 6, HopKind::Move),
            hop(13, 8, 5, HopKind::Move),
        ];
        let schedule = sequence(&mut pacer, &hops, 2, false, false);
        let nonces: Vec<_> = schedule
            .iter()
            .filter_map(|action| match action {
                TimedAction::Send { payload, .. } => Some(payload.nonce.clone()),
                TimedAction::Wait { .. } => None,
            })
            .collect();
        assert_eq!(nonces.len(), 2);
        assert_ne!(nonces[0], nonces[1]);
    }
}
