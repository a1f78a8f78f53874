/// Failures crossing the request/response channel. None of these are fatal;
/// the worst case is a notice and a user-initiated retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request never completed (connect, timeout, body read).
    #[error("engine unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The engine answered with an `{error}` payload; surfaced verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("invalid engine url: {0}")]
    Url(#[from] url::ParseError),
}

impl EngineError {
    /// True when retrying the same request later could succeed.
    pub fn is_transport(&self) -> bool {
        matches!(self, EngineError::Transport(_))
    }
}
