use crate::table::SeatId;

/// Fixed positions on the circular table layout a seat can be projected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeatAnchor {
    TopCenter,
    UpperRight,
    LowerRight,
    BottomCenter,
    LowerLeft,
    UpperLeft,
    /// Heads-up only.
    Left,
    /// Heads-up only; always the viewer.
    Right,
}

/// Heads-up table: the viewer (relative 0) is pinned to the right.
const HEADS_UP: [SeatAnchor; 2] = [SeatAnchor::Right, SeatAnchor::Left];

/// Three-handed override. The generic ring degenerates visually below four
/// players, so three-handed gets its own geometry with the viewer on top.
const THREE_HANDED: [SeatAnchor; 3] = [
    SeatAnchor::TopCenter,
    SeatAnchor::LowerLeft,
    SeatAnchor::LowerRight,
];

/// Generic ring for four or more players. Seats fan out from the viewer at
/// the bottom, alternating sides: relative 1 sits immediately
/// counterclockwise (lower right), relative 2 immediately clockwise (lower
/// left), and so on toward the top. Counts above six reuse anchors.
const FULL_RING: [SeatAnchor; 6] = [
    SeatAnchor::BottomCenter,
    SeatAnchor::LowerRight,
    SeatAnchor::LowerLeft,
    SeatAnchor::UpperRight,
    SeatAnchor::UpperLeft,
    SeatAnchor::TopCenter,
];

/// Project an absolute seat onto a viewer-relative screen anchor.
///
/// Pure function of its three inputs; invoked once per render per seat.
/// Callers without an assigned viewer pass seat 0 as the neutral anchor so
/// spectator rendering stays stable.
pub fn project(seat_index: SeatId, viewer_seat: SeatId, active_count: usize) -> SeatAnchor {
    let count = active_count.max(1);
    let relative = (seat_index + count - viewer_seat % count) % count;
    match count {
        2 => HEADS_UP[relative % 2],
        3 => THREE_HANDED[relative % 3],
        _ => FULL_RING[relative % FULL_RING.len()],
    }
}
