pub mod layout;
pub mod render;

pub use layout::{project, SeatAnchor};
