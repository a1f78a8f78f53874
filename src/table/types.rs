use serde::{Deserialize, Serialize};

pub type Chips = u64;
pub type SeatId = usize; // index into GameState::players

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "T")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

/// Immutable card value in the engine's wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    #[default]
    Human,
    Demo,
    Llm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: SeatId,
    pub name: String,
    #[serde(default)]
    pub player_type: PlayerType,
    pub chips: Chips,
    /// Empty when the engine hides the cards from this viewer.
    #[serde(default)]
    pub hole_cards: Vec<Card>,
    #[serde(default)]
    pub is_dealer: bool,
    #[serde(default)]
    pub is_small_blind: bool,
    #[serde(default)]
    pub is_big_blind: bool,
    pub is_active: bool,
    #[serde(default)]
    pub current_bet: Chips,
    #[serde(default)]
    pub folded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStage {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// Full table snapshot as produced by the engine. The client never mutates
/// fields; it only replaces whole snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    #[serde(default)]
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub players: Vec<Player>,
    /// `-1` on the wire when no seat is to act.
    #[serde(with = "seat_sentinel")]
    pub current_player_index: Option<SeatId>,
    pub game_stage: GameStage,
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl GameState {
    pub fn player(&self, seat: SeatId) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index.and_then(|i| self.players.get(i))
    }

    /// Seated participants still in the game (not left/busted). Folded
    /// players sit out the current hand only and still count here.
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active).count()
    }

    pub fn is_turn_of(&self, seat: SeatId) -> bool {
        self.current_player_index == Some(seat)
    }
}

/// The engine encodes "no seat to act" as `-1` rather than omitting the
/// field; anything negative or out of `usize` range decodes to `None`.
mod seat_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(seat) => serializer.serialize_i64(*seat as i64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            Ok(None)
        } else {
            Ok(Some(raw as usize))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serde::{assert_round_trip_eq, assert_round_trip_json};

    fn seated(seat: SeatId, chips: Chips) -> Player {
        Player {
            id: seat,
            name: format!("player-{seat}"),
            player_type: PlayerType::Human,
            chips,
            hole_cards: vec![],
            is_dealer: false,
            is_small_blind: false,
            is_big_blind: false,
            is_active: true,
            current_bet: 0,
            folded: false,
        }
    }

    #[test]
    fn cards_use_the_engine_wire_encoding() {
        let card = Card {
            rank: Rank::Ten,
            suit: Suit::Hearts,
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json, serde_json::json!({"rank": "T", "suit": "hearts"}));
        assert_round_trip_eq(&card);
    }

    #[test]
    fn stages_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(GameStage::PreFlop).unwrap(),
            serde_json::json!("pre_flop")
        );
        assert_round_trip_eq(&GameStage::Showdown);
    }

    #[test]
    fn seat_sentinel_maps_minus_one_to_none() {
        let mut state = GameState {
            game_id: "g-1".into(),
            community_cards: vec![],
            pot: 0,
            current_bet: 0,
            players: vec![seated(0, 1000), seated(1, 1000)],
            current_player_index: None,
            game_stage: GameStage::Waiting,
            small_blind: 5,
            big_blind: 10,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["current_player_index"], serde_json::json!(-1));

        state.current_player_index = Some(1);
        assert_round_trip_json(&state);
    }

    #[test]
    fn unknown_engine_fields_are_ignored() {
        // The engine ships internal bookkeeping (`acted_this_round`,
        // `pending_active`, `max_players`) the client has no use for.
        let raw = serde_json::json!({
            "game_id": "g-2",
            "community_cards": [],
            "pot": 15,
            "current_bet": 10,
            "players": [{
                "id": 0,
                "name": "alice",
                "player_type": "human",
                "chips": 990,
                "hole_cards": [],
                "is_dealer": true,
                "is_small_blind": true,
                "is_big_blind": false,
                "is_active": true,
                "pending_active": false,
                "acted_this_round": false,
                "current_bet": 5,
                "folded": false
            }],
            "current_player_index": 0,
            "game_stage": "pre_flop",
            "small_blind": 5,
            "big_blind": 10,
            "max_players": 6,
            "starting_chips": 1000
        });
        let state: GameState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.players.len(), 1);
        assert!(state.is_turn_of(0));
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn player_type_defaults_to_human() {
        let raw = serde_json::json!({
            "id": 2,
            "name": "bob",
            "chips": 500,
            "is_active": true
        });
        let player: Player = serde_json::from_value(raw).unwrap();
        assert_eq!(player.player_type, PlayerType::Human);
        assert!(player.hole_cards.is_empty());
    }
}
