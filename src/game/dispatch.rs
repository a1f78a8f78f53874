use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::client::{ActionRequest, EngineApi, EngineError, WireAction};
use crate::session::SessionContext;
use crate::table::{legal_actions, ActionError, Chips, GameState};

const LOG_TARGET: &str = "game::dispatch";

/// A command the viewer can issue against the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableCommand {
    Fold,
    Check,
    Call,
    Raise { to: Chips },
    DealNextHand,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Refused locally; no network call was made.
    #[error(transparent)]
    Refused(#[from] ActionError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Serializes the viewer's submissions: local turn/legality gating first,
/// then at most one outstanding engine call. The engine's response body is
/// dropped; the view advances only on the push broadcast.
#[derive(Clone)]
pub struct ActionDispatcher {
    api: Arc<dyn EngineApi>,
    in_flight: Arc<AtomicBool>,
}

struct FlightSlot(Arc<AtomicBool>);

impl FlightSlot {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ActionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ActionError::SubmissionInFlight)?;
        Ok(Self(Arc::clone(flag)))
    }
}

impl Drop for FlightSlot {
    fn drop(&mut self) {
        // Released on every exit path, including transport failures and
        // late completions already superseded by a newer broadcast.
        self.0.store(false, Ordering::Release);
    }
}

impl ActionDispatcher {
    pub fn new(api: Arc<dyn EngineApi>) -> Self {
        Self {
            api,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate a command against the current snapshot and, if it passes,
    /// submit it. All gate failures happen before any network traffic.
    pub async fn submit(
        &self,
        session: &SessionContext,
        state: Option<&GameState>,
        command: TableCommand,
    ) -> Result<(), SubmitError> {
        let game_id = session.game_id().ok_or(ActionError::NoState)?.to_string();
        let state = state.ok_or(ActionError::NoState)?;
        let viewer = session
            .viewer_seat()
            .ok_or(ActionError::IdentityUnresolved)?;
        let request = Self::validate(state, viewer, command)?;

        let _slot = FlightSlot::acquire(&self.in_flight)?;
        match request {
            Some(request) => {
                info!(
                    target = LOG_TARGET,
                    seat = viewer,
                    action = ?request.action,
                    amount = request.amount,
                    "submitting action"
                );
                // Snapshot in the response is informational only.
                let _ = self.api.submit_action(&game_id, &request).await?;
            }
            None => {
                info!(target = LOG_TARGET, seat = viewer, "requesting next hand");
                let _ = self.api.deal_next_hand(&game_id).await?;
            }
        }
        debug!(target = LOG_TARGET, "submission acknowledged");
        Ok(())
    }

    /// Returns the wire request for betting actions, `None` for the deal
    /// signal (which has no body).
    fn validate(
        state: &GameState,
        viewer: usize,
        command: TableCommand,
    ) -> Result<Option<ActionRequest>, ActionError> {
        let legals = legal_actions(state, viewer);
        match command {
            TableCommand::DealNextHand => {
                if !legals.may_deal {
                    return Err(ActionError::DealNotAvailable);
                }
                Ok(None)
            }
            _ if !state.is_turn_of(viewer) => Err(ActionError::NotYourTurn),
            TableCommand::Fold => Ok(Some(ActionRequest::new(viewer, WireAction::Fold, 0))),
            TableCommand::Check => {
                if !legals.may_check {
                    return Err(ActionError::CannotCheckFacingBet);
                }
                Ok(Some(ActionRequest::new(viewer, WireAction::Check, 0)))
            }
            TableCommand::Call => {
                if !legals.may_call {
                    return Err(ActionError::NothingToCall);
                }
                Ok(Some(ActionRequest::new(viewer, WireAction::Call, 0)))
            }
            TableCommand::Raise { to } => {
                if to == 0 {
                    return Err(ActionError::NonPositiveRaise(to));
                }
                Ok(Some(ActionRequest::new(viewer, WireAction::Raise, to)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CreateGameRequest, JoinGameRequest, JoinedTable};
    use crate::session::IdentitySource;
    use crate::table::{GameStage, Player, PlayerType};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct MockEngine {
        submissions: AtomicUsize,
        deals: AtomicUsize,
        release: Notify,
        reject_with: Option<String>,
    }

    impl MockEngine {
        fn new() -> Self {
            Self {
                submissions: AtomicUsize::new(0),
                deals: AtomicUsize::new(0),
                release: Notify::new(),
                reject_with: None,
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                reject_with: Some(message.to_string()),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl EngineApi for MockEngine {
        async fn create_game(
            &self,
            _request: &CreateGameRequest,
        ) -> Result<JoinedTable, EngineError> {
            unreachable!("not exercised")
        }

        async fn fetch_game(&self, _game_id: &str) -> Result<GameState, EngineError> {
            unreachable!("not exercised")
        }

        async fn join_game(
            &self,
            _game_id: &str,
            _request: &JoinGameRequest,
        ) -> Result<JoinedTable, EngineError> {
            unreachable!("not exercised")
        }

        async fn submit_action(
            &self,
            _game_id: &str,
            _request: &ActionRequest,
        ) -> Result<GameState, EngineError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            if let Some(message) = &self.reject_with {
                return Err(EngineError::Rejected(message.clone()));
            }
            Ok(turn_state(0, &[0, 0]))
        }

        async fn deal_next_hand(&self, _game_id: &str) -> Result<GameState, EngineError> {
            self.deals.fetch_add(1, Ordering::SeqCst);
            Ok(turn_state(0, &[0, 0]))
        }

        async fn opponent_service_online(&self) -> bool {
            true
        }
    }

    fn turn_state(to_act: usize, bets: &[Chips]) -> GameState {
        GameState {
            game_id: "g".into(),
            community_cards: vec![],
            pot: 0,
            current_bet: bets.iter().copied().max().unwrap_or(0),
            players: bets
                .iter()
                .enumerate()
                .map(|(seat, bet)| Player {
                    id: seat,
                    name: format!("p{seat}"),
                    player_type: PlayerType::Human,
                    chips: 1000,
                    hole_cards: vec![],
                    is_dealer: false,
                    is_small_blind: false,
                    is_big_blind: false,
                    is_active: true,
                    current_bet: *bet,
                    folded: false,
                })
                .collect(),
            current_player_index: Some(to_act),
            game_stage: GameStage::Flop,
            small_blind: 5,
            big_blind: 10,
        }
    }

    fn joined_session(seat: usize) -> SessionContext {
        let mut session = SessionContext::new();
        session.enter_game("g");
        session.assign(IdentitySource::JoinResponse, seat);
        session
    }

    #[tokio::test]
    async fn premature_action_is_refused_before_any_network_call() {
        let engine = Arc::new(MockEngine::new());
        let dispatcher = ActionDispatcher::new(engine.clone());
        let mut session = SessionContext::new();
        session.enter_game("g");
        let state = turn_state(0, &[0, 0]);

        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::Fold)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Refused(ActionError::IdentityUnresolved)
        ));
        assert_eq!(engine.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_raise_is_refused_locally() {
        let engine = Arc::new(MockEngine::new());
        let dispatcher = ActionDispatcher::new(engine.clone());
        let session = joined_session(0);
        let state = turn_state(0, &[0, 0]);

        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::Raise { to: 0 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Refused(ActionError::NonPositiveRaise(0))
        ));
        assert_eq!(engine.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn off_turn_commands_are_refused_locally() {
        let engine = Arc::new(MockEngine::new());
        let dispatcher = ActionDispatcher::new(engine.clone());
        let session = joined_session(1);
        let state = turn_state(0, &[0, 0]);

        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::Check)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Refused(ActionError::NotYourTurn)));
        assert_eq!(engine.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_submission_is_refused_while_one_is_outstanding() {
        let engine = Arc::new(MockEngine::new());
        let dispatcher = ActionDispatcher::new(engine.clone());
        let session = joined_session(0);
        let state = turn_state(0, &[0, 0]);

        let background = {
            let dispatcher = dispatcher.clone();
            let session = session.clone();
            let state = state.clone();
            tokio::spawn(async move {
                dispatcher
                    .submit(&session, Some(&state), TableCommand::Check)
                    .await
            })
        };
        // Let the first submission reach the engine and park there.
        while engine.submissions.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(dispatcher.is_in_flight());

        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::Fold)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Refused(ActionError::SubmissionInFlight)
        ));
        assert_eq!(engine.submissions.load(Ordering::SeqCst), 1);

        engine.release.notify_one();
        background.await.unwrap().unwrap();
        assert!(!dispatcher.is_in_flight());

        // The slot is free again after completion.
        let third = {
            let dispatcher = dispatcher.clone();
            let session = session.clone();
            let state = state.clone();
            tokio::spawn(async move {
                dispatcher
                    .submit(&session, Some(&state), TableCommand::Check)
                    .await
            })
        };
        while engine.submissions.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        engine.release.notify_one();
        third.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn engine_rejections_surface_verbatim_and_release_the_slot() {
        let engine = Arc::new(MockEngine::rejecting("Not your turn"));
        let dispatcher = ActionDispatcher::new(engine.clone());
        let session = joined_session(0);
        let state = turn_state(0, &[0, 0]);

        engine.release.notify_one();
        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::Check)
            .await
            .unwrap_err();
        match err {
            SubmitError::Engine(EngineError::Rejected(message)) => {
                assert_eq!(message, "Not your turn");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!dispatcher.is_in_flight());
    }

    #[tokio::test]
    async fn deal_is_gated_on_showdown() {
        let engine = Arc::new(MockEngine::new());
        let dispatcher = ActionDispatcher::new(engine.clone());
        let session = joined_session(1);

        let mut state = turn_state(0, &[0, 0]);
        let err = dispatcher
            .submit(&session, Some(&state), TableCommand::DealNextHand)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Refused(ActionError::DealNotAvailable)
        ));

        state.game_stage = GameStage::Showdown;
        state.current_player_index = None;
        // Not the viewer's turn; the ready signal goes through anyway.
        dispatcher
            .submit(&session, Some(&state), TableCommand::DealNextHand)
            .await
            .unwrap();
        assert_eq!(engine.deals.load(Ordering::SeqCst), 1);
    }
}
