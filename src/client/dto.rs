use serde::{Deserialize, Serialize};

use crate::table::{Chips, GameState, SeatId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub player_name: String,
    /// Table size, 2 to 9 seats; the engine clamps out-of-range values.
    pub num_players: usize,
    pub starting_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinGameRequest {
    pub player_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireAction {
    Fold,
    Check,
    Call,
    Raise,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub player_id: SeatId,
    pub action: WireAction,
    /// Raise target; the engine ignores it for other actions.
    pub amount: Chips,
}

impl ActionRequest {
    pub fn new(player_id: SeatId, action: WireAction, amount: Chips) -> Self {
        Self {
            player_id,
            action,
            amount,
        }
    }
}

/// Create/join response: the full snapshot flattened together with the seat
/// the engine assigned to this session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedTable {
    #[serde(flatten)]
    pub state: GameState,
    pub player_id: SeatId,
}

/// Rejection payload shape shared by every engine endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
