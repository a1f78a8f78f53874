pub mod api;
pub mod dto;
pub mod error;

pub use api::{EngineApi, EngineClientConfig, HttpEngineClient};
pub use dto::*;
pub use error::EngineError;
