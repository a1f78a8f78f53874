use super::types::{GameStage, GameState, SeatId};

/// Action menu derived from the current snapshot. No independent
/// bookkeeping: every flag is recomputed from state on each render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegalActions {
    pub may_fold: bool,
    pub may_check: bool,
    pub may_call: bool,
    pub may_raise: bool,
    pub may_deal: bool,
}

impl LegalActions {
    pub fn any_betting_action(&self) -> bool {
        self.may_fold || self.may_check || self.may_call || self.may_raise
    }
}

/// Compute which actions the viewer may be offered. Betting actions require
/// it to be the viewer's turn; dealing the next hand is a ready signal open
/// to any seated participant at showdown. The engine remains the final
/// arbiter of raise sizing.
pub fn legal_actions(state: &GameState, viewer: SeatId) -> LegalActions {
    let mut legals = LegalActions {
        may_deal: state.game_stage == GameStage::Showdown && state.player(viewer).is_some(),
        ..LegalActions::default()
    };

    if !state.is_turn_of(viewer) {
        return legals;
    }
    let Some(player) = state.player(viewer) else {
        return legals;
    };

    legals.may_fold = true;
    if player.current_bet == state.current_bet {
        legals.may_check = true;
    } else {
        legals.may_call = true;
    }
    legals.may_raise = true;
    legals
}
