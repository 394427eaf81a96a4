use thiserror::Error;

use super::error_code::ErrorCode;
use crate::domain::cards::CardId;

/// Every condition the engine can reject a client action with.
///
/// The first five variants are *local*: the submitting seat is told no and
/// the outstanding decision stays open. `DeadlineExceeded`/`MatchAborted` are
/// terminal for the decision in question. `IllegalTransition` indicates a
/// caller bug, not a player mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cards do not form a legal combination at this level")]
    InvalidCombination,

    #[error("card {0:?} is not in the seat's hand")]
    NotInHand(CardId),

    #[error("combination does not beat the current trick lead")]
    DoesNotBeatLead,

    #[error("seat has no outstanding decision request")]
    NotYourTurn,

    #[error("the trick leader cannot pass before playing")]
    IllegalPass,

    #[error("card is not a legal tribute selection or return")]
    IllegalTributeCard,

    #[error("submission arrived after the decision deadline")]
    DeadlineExceeded,

    #[error("match is no longer live")]
    MatchAborted,

    #[error("seat's transport session exceeded back-pressure limits")]
    SessionUnhealthy,

    #[error("illegal state transition: {0}")]
    IllegalTransition(String),

    #[error("no decision is currently outstanding for this seat")]
    NoPendingDecision,
}

impl DomainError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InvalidCombination => ErrorCode::InvalidCombination,
            DomainError::NotInHand(_) => ErrorCode::NotInHand,
            DomainError::DoesNotBeatLead => ErrorCode::DoesNotBeatLead,
            DomainError::NotYourTurn => ErrorCode::NotYourTurn,
            DomainError::IllegalPass => ErrorCode::IllegalPass,
            DomainError::IllegalTributeCard => ErrorCode::IllegalTributeCard,
            DomainError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            DomainError::MatchAborted => ErrorCode::MatchAborted,
            DomainError::SessionUnhealthy => ErrorCode::SessionUnhealthy,
            DomainError::IllegalTransition(_) => ErrorCode::IllegalTransition,
            DomainError::NoPendingDecision => ErrorCode::NoPendingDecision,
        }
    }

    /// Local errors leave the outstanding decision open; the caller should
    /// just report the rejection and keep waiting.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidCombination
                | DomainError::NotInHand(_)
                | DomainError::DoesNotBeatLead
                | DomainError::NotYourTurn
                | DomainError::IllegalPass
                | DomainError::IllegalTributeCard
        )
    }
}
