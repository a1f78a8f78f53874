use tracing::{debug, warn};

use crate::client::JoinedTable;
use crate::realtime::PushEvent;
use crate::session::{IdentityOutcome, IdentitySource, SessionContext};
use crate::sync::{StateSynchronizer, SyncOutcome};
use crate::table::{legal_actions, GameState, LegalActions, SeatId};

const LOG_TARGET: &str = "game::coordinator";

/// What an inbound signal did to the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewUpdate {
    /// The snapshot (or the viewer's identity) changed; redraw the table.
    Redraw,
    /// Informational line for the user, no state transition.
    Notice(String),
    /// Nothing visible happened.
    Quiet,
}

/// Routes the two racing channels into the session and state cells. One
/// logical writer per cell: identity changes go through the resolver here,
/// snapshots through the synchronizer.
#[derive(Default)]
pub struct TableCoordinator {
    session: SessionContext,
    sync: StateSynchronizer,
}

impl TableCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn state(&self) -> Option<&GameState> {
        self.sync.state()
    }

    pub fn viewer_seat(&self) -> Option<SeatId> {
        self.session.viewer_seat()
    }

    pub fn revision(&self) -> u64 {
        self.sync.revision()
    }

    /// Action menu for the current snapshot; spectators get none.
    pub fn legals(&self) -> LegalActions {
        match (self.sync.state(), self.session.viewer_seat()) {
            (Some(state), Some(viewer)) => legal_actions(state, viewer),
            _ => LegalActions::default(),
        }
    }

    /// Adopt a create/join response: identity first, then the snapshot as
    /// the bootstrap (the only HTTP-sourced state application). A broadcast
    /// may already have raced past the response; the identity write still
    /// counts as a visible change when it lands here first.
    pub fn adopt_joined(&mut self, joined: JoinedTable) -> ViewUpdate {
        self.session.enter_game(joined.state.game_id.clone());
        let identity = self
            .session
            .assign(IdentitySource::JoinResponse, joined.player_id);
        let snapshot = self.sync.apply_bootstrap(joined.state);
        if snapshot == SyncOutcome::Updated || matches!(identity, IdentityOutcome::Assigned(_)) {
            ViewUpdate::Redraw
        } else {
            ViewUpdate::Quiet
        }
    }

    /// Adopt a spectator lookup (no identity attached).
    pub fn adopt_spectator(&mut self, state: GameState) -> ViewUpdate {
        self.session.enter_game(state.game_id.clone());
        match self.sync.apply_bootstrap(state) {
            SyncOutcome::Updated => ViewUpdate::Redraw,
            _ => ViewUpdate::Quiet,
        }
    }

    pub fn handle_push(&mut self, event: PushEvent) -> ViewUpdate {
        match event {
            PushEvent::PlayerAssigned {
                player_id,
                player_name,
                game_id,
            } => self.handle_assignment(player_id, &player_name, &game_id),
            PushEvent::PlayerConnected {
                player_name,
                connected_players,
                ..
            } => ViewUpdate::Notice(format!(
                "{player_name} connected ({} online)",
                connected_players.len()
            )),
            PushEvent::Error { message } => ViewUpdate::Notice(format!("table error: {message}")),
            state_bearing => {
                let Some(snapshot) = state_bearing.snapshot() else {
                    return ViewUpdate::Quiet;
                };
                match self.sync.apply_broadcast(snapshot.clone()) {
                    SyncOutcome::Updated => ViewUpdate::Redraw,
                    _ => ViewUpdate::Quiet,
                }
            }
        }
    }

    fn handle_assignment(
        &mut self,
        player_id: Option<SeatId>,
        player_name: &str,
        game_id: &str,
    ) -> ViewUpdate {
        let Some(seat) = player_id else {
            debug!(
                target = LOG_TARGET,
                player_name, "assignment carried no seat, ignoring"
            );
            return ViewUpdate::Quiet;
        };
        if let Some(current) = self.session.game_id() {
            if current != game_id {
                warn!(
                    target = LOG_TARGET,
                    current, received = game_id, "assignment for another table ignored"
                );
                return ViewUpdate::Quiet;
            }
        }
        if let Some(state) = self.sync.state() {
            if state.player(seat).is_none() {
                warn!(
                    target = LOG_TARGET,
                    seat, "assignment names a seat absent from the snapshot, ignoring"
                );
                return ViewUpdate::Quiet;
            }
        }
        let was_spectator = self.session.is_spectator();
        self.session.assign(IdentitySource::PushAssignment, seat);
        if was_spectator && !self.session.is_spectator() {
            // Orientation and the action menu both just changed.
            ViewUpdate::Redraw
        } else {
            ViewUpdate::Quiet
        }
    }

    /// Leave the table: explicit reset of both cells.
    pub fn leave(&mut self) {
        self.session.reset();
        self.sync.clear();
    }
}
