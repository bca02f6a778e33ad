//! Decision router: one inbound table event in, at most one decision out.
//!
//! The engine owns the session oracle and pacer, classifies each event,
//! and answers with either a single outbound action or a timed schedule of
//! checker movements. Every failure along the way degrades to the safest
//! available action; the router itself never returns an error.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use gammon_core::codec::hint::{CubeAction, best_move_fragment, classify_cube};
use gammon_core::codec::{matchid, position};
use gammon_core::model::board::{Board, Position};
use gammon_core::model::cube::MatchInfo;
use gammon_core::model::dice::DiceRoll;
use gammon_core::notation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::oracle::Oracle;
use crate::pacing::Pacer;
use crate::planner;
use crate::sequencer::{self, TimedAction};

/// Actions the table currently offers the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionTag {
    Accept,
    RollDice,
    MoveChecker,
    DoublingOffer,
    DoublingAccept,
    TurnCommit,
    BankSplittingReject,
}

impl ActionTag {
    pub const fn wire_name(self) -> &'static str {
        match self {
            ActionTag::Accept => "Accept",
            ActionTag::RollDice => "RollDice",
            ActionTag::MoveChecker => "MoveChecker",
            ActionTag::DoublingOffer => "DoublingOffer",
            ActionTag::DoublingAccept => "DoublingAccept",
            ActionTag::TurnCommit => "TurnCommit",
            ActionTag::BankSplittingReject => "BankSplittingReject",
        }
    }
}

/// Fully parsed game state attached to an inbound event. Absent when the
/// upstream adapter could not make sense of the board payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub position: Position,
    pub match_info: MatchInfo,
    pub dice: DiceRoll,
    pub is_reversed: bool,
    pub active_player: Option<String>,
}

/// One inbound table event, already lifted out of the transport envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inbound {
    pub event: String,
    pub stage: String,
    pub phase: String,
    #[serde(default)]
    pub actions: BTreeSet<ActionTag>,
    pub snapshot: Option<Snapshot>,
}

/// A single outbound table action.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundAction {
    pub stage: &'static str,
    pub action: &'static str,
    pub data: Option<serde_json::Value>,
}

impl OutboundAction {
    fn game_play(tag: ActionTag) -> Self {
        Self {
            stage: "GamePlay",
            action: tag.wire_name(),
            data: None,
        }
    }
}

/// What the router decided for one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Act(OutboundAction),
    Sequence(Vec<TimedAction>),
}

pub struct Engine {
    player_id: String,
    oracle: Box<dyn Oracle>,
    pacer: Pacer,
    last_cube_hash: Option<u64>,
}

impl Engine {
    pub fn new(player_id: impl Into<String>, oracle: Box<dyn Oracle>, pacer: Pacer) -> Self {
        Self {
            player_id: player_id.into(),
            oracle,
            pacer,
            last_cube_hash: None,
        }
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Routes one event to at most one decision.
    pub fn handle(&mut self, inbound: &Inbound) -> Option<Decision> {
        // Checker-animation chatter carries no decision.
        if matches!(
            inbound.event.as_str(),
            "TurnCheckerMoved" | "TurnCheckerMovedV2"
        ) {
            return None;
        }

        self.pacer.start_turn();

        if self.is_new_game(inbound) {
            info!(event = %inbound.event, "new game, resetting session state");
            self.last_cube_hash = None;
            self.pacer.resample_persona();
            let warmup = self.pacer.config().warmup;
            self.pacer.heartbeat_sleep(warmup);
            if inbound.actions.is_empty() {
                return None;
            }
        }

        if inbound.stage == "GameInitiation" && inbound.actions.contains(&ActionTag::Accept) {
            let delay = self.pacer.uniform(0.3, 5.0);
            self.pacer.heartbeat_sleep(delay);
            return Some(Decision::Act(OutboundAction {
                stage: "GameInitiation",
                action: ActionTag::Accept.wire_name(),
                data: None,
            }));
        }

        if inbound.event == "BankSplittingOffered" {
            let delay = self.pacer.uniform(2.0, 7.0);
            self.pacer.heartbeat_sleep(delay);
            return Some(Decision::Act(OutboundAction::game_play(
                ActionTag::BankSplittingReject,
            )));
        }

        let Some(snapshot) = inbound.snapshot.as_ref() else {
            // The board payload did not parse; confirm the turn if the table
            // lets us, otherwise stay silent.
            warn!(event = %inbound.event, "no snapshot, falling back to turn confirm");
            return self.turn_ack(&inbound.actions);
        };

        let opponent_on_turn = snapshot
            .active_player
            .as_deref()
            .is_some_and(|active| active != self.player_id);
        if opponent_on_turn && !inbound.actions.contains(&ActionTag::DoublingAccept) {
            debug!(event = %inbound.event, "opponent on turn, ignoring");
            return None;
        }

        if inbound.actions.contains(&ActionTag::DoublingAccept) {
            return Some(self.respond_to_double(snapshot));
        }

        if inbound.actions.contains(&ActionTag::DoublingOffer)
            && inbound.event != "DoublingAccepted"
        {
            if let Some(decision) = self.consider_doubling(snapshot) {
                return Some(decision);
            }
        }

        if inbound.actions.contains(&ActionTag::RollDice) && !snapshot.dice.is_rolled() {
            let delay = self.pacer.pre_roll_delay();
            self.pacer.heartbeat_sleep(delay);
            return Some(Decision::Act(OutboundAction::game_play(ActionTag::RollDice)));
        }

        if inbound.actions.contains(&ActionTag::MoveChecker) && snapshot.dice.is_rolled() {
            return self.play_checkers(snapshot, &inbound.actions);
        }

        // A parsed snapshot that matches no branch needs nothing from us;
        // the confirm fallback is reserved for parse failures and no-move
        // turns.
        debug!(event = %inbound.event, "no actionable branch");
        None
    }

    fn is_new_game(&self, inbound: &Inbound) -> bool {
        matches!(inbound.event.as_str(), "MatchStarted" | "GameStarted")
            || (inbound.event == "StageChanged"
                && inbound.stage == "GamePlay"
                && inbound.phase == "INIT")
    }

    fn turn_ack(&self, actions: &BTreeSet<ActionTag>) -> Option<Decision> {
        actions
            .contains(&ActionTag::TurnCommit)
            .then(|| Decision::Act(OutboundAction::game_play(ActionTag::TurnCommit)))
    }

    /// An incoming double. The snapshot still describes the doubler's
    /// perspective, so boards and match context are swapped before encoding.
    fn respond_to_double(&mut self, snapshot: &Snapshot) -> Decision {
        let delay = self.pacer.cube_delay(true);
        self.pacer.heartbeat_sleep(delay);

        let position = snapshot.position.swapped();
        let info = snapshot.match_info.swapped();
        let Some(raw) = self.cube_query(&position, &info) else {
            // Without an oracle verdict, taking is the conservative default.
            return Decision::Act(OutboundAction::game_play(ActionTag::DoublingAccept));
        };

        let verdict = classify_cube(&raw, true);
        info!(action = verdict.action.code(), label = verdict.label, "cube response");
        if verdict.action == CubeAction::Pass {
            self.pacer.heartbeat_sleep(0.8);
            return Decision::Act(OutboundAction {
                stage: "GamePlay",
                action: "DoublingReject",
                data: None,
            });
        }
        Decision::Act(OutboundAction::game_play(ActionTag::DoublingAccept))
    }

    /// Our turn with the cube available. Returns `None` to fall through to
    /// rolling or moving when doubling is not warranted or already weighed
    /// for this exact state.
    fn consider_doubling(&mut self, snapshot: &Snapshot) -> Option<Decision> {
        let hash = stable_hash(&snapshot.position, &snapshot.match_info);
        if self.last_cube_hash == Some(hash) {
            debug!("cube state already weighed, skipping oracle");
            return None;
        }
        self.last_cube_hash = Some(hash);

        let delay = self.pacer.cube_delay(false);
        self.pacer.heartbeat_sleep(delay);

        let raw = self.cube_query(&snapshot.position, &snapshot.match_info)?;
        let verdict = classify_cube(&raw, false);
        info!(action = verdict.action.code(), label = verdict.label, "cube offer verdict");
        if verdict.action.recommends_double() {
            self.last_cube_hash = None;
            self.pacer.heartbeat_sleep(0.5);
            return Some(Decision::Act(OutboundAction::game_play(
                ActionTag::DoublingOffer,
            )));
        }
        None
    }

    fn play_checkers(
        &mut self,
        snapshot: &Snapshot,
        actions: &BTreeSet<ActionTag>,
    ) -> Option<Decision> {
        let raw = match self.move_query(snapshot) {
            Some(raw) => raw,
            None => return self.turn_ack(actions),
        };

        let Some(fragment) = best_move_fragment(&raw) else {
            warn!("oracle reply carried no move line");
            return self.turn_ack(actions);
        };
        let spans = notation::reduce(&notation::parse_moves(&fragment));
        if spans.is_empty() {
            let delay = self.pacer.planning_delay(0, false);
            self.pacer.heartbeat_sleep(delay);
            return self.turn_ack(actions);
        }

        let complex = is_complex_position(&snapshot.position, spans.len());
        let hops = planner::plan(&spans, snapshot.dice, &snapshot.position);
        if hops.is_empty() {
            warn!(spans = spans.len(), "no hop could be planned, confirming turn");
            return self.turn_ack(actions);
        }

        debug!(hops = hops.len(), complex, "executing planned turn");
        Some(Decision::Sequence(sequencer::sequence(
            &mut self.pacer,
            &hops,
            spans.len(),
            complex,
            snapshot.is_reversed,
        )))
    }

    /// Cube analysis always goes out with unrolled dice and no pending
    /// double, so the oracle judges the pre-roll position.
    fn cube_query(&mut self, position: &Position, info: &MatchInfo) -> Option<String> {
        let pos_id = match position::position_id(position) {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "position encoding failed");
                return None;
            }
        };
        let match_id = match matchid::match_id(info, DiceRoll::unrolled(), false) {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "match encoding failed");
                return None;
            }
        };
        match self.oracle.analyze(&pos_id, &match_id) {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!(%err, "oracle cube query failed");
                None
            }
        }
    }

    fn move_query(&mut self, snapshot: &Snapshot) -> Option<String> {
        let pos_id = match position::position_id(&snapshot.position) {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "position encoding failed");
                return None;
            }
        };
        let match_id = match matchid::match_id(&snapshot.match_info, snapshot.dice, false) {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "match encoding failed");
                return None;
            }
        };
        match self.oracle.analyze(&pos_id, &match_id) {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!(%err, "oracle move query failed");
                None
            }
        }
    }
}

fn stable_hash(position: &Position, info: &MatchInfo) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    position.hash(&mut hasher);
    info.hash(&mut hasher);
    hasher.finish()
}

/// A position reads as complex when both sides still have checkers outside
/// their home boards, or the oracle's line spreads over many spans.
fn is_complex_position(position: &Position, span_count: usize) -> bool {
    let outside = |board: &Board| (0..18).any(|p| board.point(p) > 0);
    (outside(&position.own) && outside(&position.opponent)) || span_count > 4
}
