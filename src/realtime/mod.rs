pub mod events;
pub mod push;

pub use events::{ClientSignal, PushEvent};
pub use push::{PushChannelClient, PushChannelConfig, RoomSubscription};
