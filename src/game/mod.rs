pub mod coordinator;
pub mod dispatch;
pub mod monitor;

pub use coordinator::{TableCoordinator, ViewUpdate};
pub use dispatch::{ActionDispatcher, SubmitError, TableCommand};
pub use monitor::OpponentServiceMonitor;
