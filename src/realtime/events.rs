use serde::{Deserialize, Serialize};

use crate::table::{GameState, SeatId};

/// Messages broadcast by the engine over the push channel, wrapped in an
/// `{event, data}` envelope on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    /// Identity signal for this session. The seat may be missing when the
    /// engine's name fallback found no match.
    PlayerAssigned {
        player_id: Option<SeatId>,
        player_name: String,
        game_id: String,
    },
    /// Another participant claimed a seat; carries the full snapshot.
    PlayerJoined {
        game_id: String,
        player_name: String,
        game_state: GameState,
    },
    /// Unsolicited full-snapshot refresh.
    GameStateUpdate { game_state: GameState },
    /// Someone acted; carries the post-action snapshot.
    GameAction {
        game_id: String,
        player_id: SeatId,
        action: String,
        game_state: GameState,
    },
    /// Connection roster notice; informational only, no state transition.
    PlayerConnected {
        player_name: String,
        game_id: String,
        connected_players: Vec<String>,
    },
    /// Human-readable failure reason from the engine.
    Error { message: String },
}

impl PushEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            PushEvent::PlayerAssigned { .. } => "player_assigned",
            PushEvent::PlayerJoined { .. } => "player_joined",
            PushEvent::GameStateUpdate { .. } => "game_state_update",
            PushEvent::GameAction { .. } => "game_action",
            PushEvent::PlayerConnected { .. } => "player_connected",
            PushEvent::Error { .. } => "error",
        }
    }

    /// The snapshot this event carries, if it is state-bearing.
    pub fn snapshot(&self) -> Option<&GameState> {
        match self {
            PushEvent::PlayerJoined { game_state, .. }
            | PushEvent::GameStateUpdate { game_state }
            | PushEvent::GameAction { game_state, .. } => Some(game_state),
            _ => None,
        }
    }
}

/// Signals the client sends upstream over the push channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientSignal {
    JoinGameRoom {
        game_id: String,
        player_id: Option<SeatId>,
        player_name: String,
    },
    LeaveGameRoom {
        game_id: String,
        player_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::GameStage;

    fn minimal_state_json(game_id: &str) -> serde_json::Value {
        serde_json::json!({
            "game_id": game_id,
            "community_cards": [],
            "pot": 0,
            "current_bet": 0,
            "players": [],
            "current_player_index": -1,
            "game_stage": "waiting",
            "small_blind": 5,
            "big_blind": 10
        })
    }

    #[test]
    fn decodes_identity_assignment_with_and_without_seat() {
        let raw = serde_json::json!({
            "event": "player_assigned",
            "data": {"player_id": 4, "player_name": "alice", "game_id": "g"}
        });
        let event: PushEvent = serde_json::from_value(raw).unwrap();
        match event {
            PushEvent::PlayerAssigned { player_id, .. } => assert_eq!(player_id, Some(4)),
            other => panic!("unexpected event {other:?}"),
        }

        let raw = serde_json::json!({
            "event": "player_assigned",
            "data": {"player_id": null, "player_name": "alice", "game_id": "g"}
        });
        let event: PushEvent = serde_json::from_value(raw).unwrap();
        match event {
            PushEvent::PlayerAssigned { player_id, .. } => assert_eq!(player_id, None),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn state_bearing_events_expose_their_snapshot() {
        let raw = serde_json::json!({
            "event": "game_action",
            "data": {
                "game_id": "g",
                "player_id": 1,
                "action": "call",
                "game_state": minimal_state_json("g")
            }
        });
        let event: PushEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.event_name(), "game_action");
        let snapshot = event.snapshot().expect("game_action carries state");
        assert_eq!(snapshot.game_stage, GameStage::Waiting);

        let raw = serde_json::json!({
            "event": "player_connected",
            "data": {"player_name": "bob", "game_id": "g", "connected_players": ["bob"]}
        });
        let event: PushEvent = serde_json::from_value(raw).unwrap();
        assert!(event.snapshot().is_none());
    }

    #[test]
    fn unknown_events_fail_to_decode() {
        let raw = serde_json::json!({"event": "mystery", "data": {}});
        assert!(serde_json::from_value::<PushEvent>(raw).is_err());
    }

    #[test]
    fn join_signal_encodes_the_room_contract() {
        let signal = ClientSignal::JoinGameRoom {
            game_id: "g-1".into(),
            player_id: Some(0),
            player_name: "alice".into(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["event"], serde_json::json!("join_game_room"));
        assert_eq!(json["data"]["player_id"], serde_json::json!(0));
    }
}
