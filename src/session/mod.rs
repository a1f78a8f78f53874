//! Session-scoped viewer identity.
//!
//! Identity arrives over two racing channels: the synchronous create/join
//! response and asynchronous `player_assigned` push events. The first value
//! to land wins; later signals never overwrite it.

use tracing::{debug, info, warn};

use crate::table::SeatId;

const LOG_TARGET: &str = "session";

/// Where an identity signal came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentitySource {
    JoinResponse,
    PushAssignment,
}

impl IdentitySource {
    fn as_str(self) -> &'static str {
        match self {
            IdentitySource::JoinResponse => "join_response",
            IdentitySource::PushAssignment => "push_assignment",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// First writer; the seat is now locked in.
    Assigned(SeatId),
    /// Re-delivery of the value already held.
    Confirmed(SeatId),
    /// Conflicting signal; the stored seat is kept and the conflict logged.
    Conflict { kept: SeatId, rejected: SeatId },
}

/// Narrow, explicit session context replacing ambient globals: the current
/// game id and the viewer's locked-in seat.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    game_id: Option<String>,
    viewer_seat: Option<SeatId>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn viewer_seat(&self) -> Option<SeatId> {
        self.viewer_seat
    }

    /// True until an identity is known; spectators get neutral layout
    /// anchoring and no action menu.
    pub fn is_spectator(&self) -> bool {
        self.viewer_seat.is_none()
    }

    pub fn enter_game(&mut self, game_id: impl Into<String>) {
        let game_id = game_id.into();
        info!(target = LOG_TARGET, %game_id, "entering table");
        self.game_id = Some(game_id);
    }

    /// Record an identity signal. First-writer-wins across both sources.
    pub fn assign(&mut self, source: IdentitySource, seat: SeatId) -> IdentityOutcome {
        match self.viewer_seat {
            None => {
                self.viewer_seat = Some(seat);
                info!(
                    target = LOG_TARGET,
                    seat,
                    source = source.as_str(),
                    "viewer seat assigned"
                );
                IdentityOutcome::Assigned(seat)
            }
            Some(existing) if existing == seat => {
                debug!(
                    target = LOG_TARGET,
                    seat,
                    source = source.as_str(),
                    "viewer seat re-confirmed"
                );
                IdentityOutcome::Confirmed(seat)
            }
            Some(existing) => {
                warn!(
                    target = LOG_TARGET,
                    kept = existing,
                    rejected = seat,
                    source = source.as_str(),
                    "conflicting identity signal ignored"
                );
                IdentityOutcome::Conflict {
                    kept: existing,
                    rejected: seat,
                }
            }
        }
    }

    /// Full reset when leaving a table.
    pub fn reset(&mut self) {
        if let Some(game_id) = self.game_id.take() {
            info!(target = LOG_TARGET, %game_id, "leaving table");
        }
        self.viewer_seat = None;
    }
}
