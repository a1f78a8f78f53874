//! Text rendering of a table snapshot for the interactive CLI.

use crate::table::{Card, GameStage, GameState, LegalActions, Player, Rank, SeatId, Suit};
use crate::view::layout::{project, SeatAnchor};

/// Anchor render order, top of the screen first.
const ANCHOR_ORDER: [SeatAnchor; 8] = [
    SeatAnchor::TopCenter,
    SeatAnchor::UpperLeft,
    SeatAnchor::UpperRight,
    SeatAnchor::Left,
    SeatAnchor::Right,
    SeatAnchor::LowerLeft,
    SeatAnchor::LowerRight,
    SeatAnchor::BottomCenter,
];

pub fn suit_glyph(suit: Suit) -> &'static str {
    match suit {
        Suit::Hearts => "♥",
        Suit::Diamonds => "♦",
        Suit::Clubs => "♣",
        Suit::Spades => "♠",
    }
}

pub fn rank_glyph(rank: Rank) -> &'static str {
    match rank {
        Rank::Two => "2",
        Rank::Three => "3",
        Rank::Four => "4",
        Rank::Five => "5",
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "T",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", rank_glyph(card.rank), suit_glyph(card.suit))
}

pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor_label(anchor: SeatAnchor) -> &'static str {
    match anchor {
        SeatAnchor::TopCenter => "top",
        SeatAnchor::UpperRight => "upper-right",
        SeatAnchor::LowerRight => "lower-right",
        SeatAnchor::BottomCenter => "bottom",
        SeatAnchor::LowerLeft => "lower-left",
        SeatAnchor::UpperLeft => "upper-left",
        SeatAnchor::Left => "left",
        SeatAnchor::Right => "right",
    }
}

fn stage_label(stage: GameStage) -> &'static str {
    match stage {
        GameStage::Waiting => "waiting",
        GameStage::PreFlop => "pre-flop",
        GameStage::Flop => "flop",
        GameStage::Turn => "turn",
        GameStage::River => "river",
        GameStage::Showdown => "showdown",
    }
}

fn seat_line(state: &GameState, player: &Player, anchor: SeatAnchor, viewer: Option<SeatId>) -> String {
    let mut markers = Vec::new();
    if viewer == Some(player.id) {
        markers.push("you");
    }
    if player.is_dealer {
        markers.push("D");
    }
    if player.is_small_blind {
        markers.push("SB");
    }
    if player.is_big_blind {
        markers.push("BB");
    }
    if player.folded {
        markers.push("folded");
    }
    let markers = if markers.is_empty() {
        String::new()
    } else {
        format!(" [{}]", markers.join(","))
    };
    let turn = if state.is_turn_of(player.id) { "->" } else { "  " };
    let cards = if player.hole_cards.is_empty() {
        String::new()
    } else {
        format!("  {}", format_cards(&player.hole_cards))
    };
    format!(
        "{turn} {:<11} {} ({} chips, bet {}){markers}{cards}",
        anchor_label(anchor),
        player.name,
        player.chips,
        player.current_bet,
    )
}

/// Render the whole table around the viewer-relative anchors. A viewer of
/// `None` renders from the neutral seat-0 orientation.
pub fn render_table(state: &GameState, viewer: Option<SeatId>) -> String {
    let orientation = viewer.unwrap_or(0);
    let active_count = state.active_count();

    let mut lines = vec![format!(
        "stage: {}   pot: {}   bet to match: {}   blinds: {}/{}",
        stage_label(state.game_stage),
        state.pot,
        state.current_bet,
        state.small_blind,
        state.big_blind,
    )];
    if !state.community_cards.is_empty() {
        lines.push(format!("board: {}", format_cards(&state.community_cards)));
    }

    for anchor in ANCHOR_ORDER {
        for player in state.players.iter().filter(|p| p.is_active) {
            if project(player.id, orientation, active_count) == anchor {
                lines.push(seat_line(state, player, anchor, viewer));
            }
        }
    }
    lines.join("\n")
}

/// One-line prompt of the currently available commands.
pub fn render_prompt(legals: &LegalActions) -> String {
    let mut options = Vec::new();
    if legals.may_fold {
        options.push("fold");
    }
    if legals.may_check {
        options.push("check");
    }
    if legals.may_call {
        options.push("call");
    }
    if legals.may_raise {
        options.push("raise <amount>");
    }
    if legals.may_deal {
        options.push("deal");
    }
    if options.is_empty() {
        "waiting on the table (commands: quit)".to_string()
    } else {
        format!("your options: {} (or quit)", options.join(", "))
    }
}
