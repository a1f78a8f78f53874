//! Single current-GameState cell fed by two racing channels.
//!
//! The push channel is the canonical path: any broadcast snapshot replaces
//! the cell unconditionally. HTTP responses become state exactly once, as
//! the bootstrap snapshot before the first broadcast has arrived; after
//! that they are informational only for the requester.

use tracing::debug;

use crate::table::GameState;

const LOG_TARGET: &str = "sync";

/// Explicit bootstrap-vs-steady-state flag, not an incidental check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    /// No broadcast seen yet; a synchronous response may seed the view.
    Bootstrap,
    /// The push channel has delivered state; HTTP snapshots are ignored.
    Steady,
}

/// What an application attempt did to the visible view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cell changed; renderers should redraw.
    Updated,
    /// Identical snapshot re-delivered; no visible transition.
    Unchanged,
    /// Snapshot discarded by the merge policy (steady-state HTTP response).
    Ignored,
}

#[derive(Debug)]
pub struct StateSynchronizer {
    current: Option<GameState>,
    phase: SyncPhase,
    revision: u64,
}

impl Default for StateSynchronizer {
    fn default() -> Self {
        Self {
            current: None,
            phase: SyncPhase::Bootstrap,
            revision: 0,
        }
    }
}

impl StateSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&GameState> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Monotonic count of visible transitions; unchanged and ignored
    /// snapshots do not advance it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a push-channel snapshot. The server is the sole source of
    /// truth, so the replacement is unconditional; equality only suppresses
    /// the redundant render.
    pub fn apply_broadcast(&mut self, snapshot: GameState) -> SyncOutcome {
        self.phase = SyncPhase::Steady;
        self.replace(snapshot)
    }

    /// Apply the synchronous create/join response. Only honored while still
    /// bootstrapping; once any state is visible the push channel owns every
    /// transition.
    pub fn apply_bootstrap(&mut self, snapshot: GameState) -> SyncOutcome {
        if self.phase == SyncPhase::Steady || self.current.is_some() {
            debug!(
                target = LOG_TARGET,
                game_id = %snapshot.game_id,
                "discarding http snapshot outside bootstrap"
            );
            return SyncOutcome::Ignored;
        }
        self.replace(snapshot)
    }

    /// Drop all state when leaving a table.
    pub fn clear(&mut self) {
        self.current = None;
        self.phase = SyncPhase::Bootstrap;
    }

    fn replace(&mut self, snapshot: GameState) -> SyncOutcome {
        if self.current.as_ref() == Some(&snapshot) {
            debug!(
                target = LOG_TARGET,
                game_id = %snapshot.game_id,
                revision = self.revision,
                "identical snapshot, render suppressed"
            );
            return SyncOutcome::Unchanged;
        }
        self.current = Some(snapshot);
        self.revision += 1;
        SyncOutcome::Updated
    }
}
