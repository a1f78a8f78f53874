use super::types::Chips;

/// Commands refused locally, before any network call.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("waiting for seat assignment")]
    IdentityUnresolved,
    #[error("not your turn")]
    NotYourTurn,
    #[error("cannot check while facing a bet")]
    CannotCheckFacingBet,
    #[error("nothing to call")]
    NothingToCall,
    #[error("raise amount must be positive (got {0})")]
    NonPositiveRaise(Chips),
    #[error("next hand can only be dealt at showdown")]
    DealNotAvailable,
    #[error("another submission is still in flight")]
    SubmissionInFlight,
    #[error("no table snapshot yet")]
    NoState,
}
