use std::fmt;

/// Wire-stable identifier for a [`super::domain::DomainError`] condition.
///
/// Mirrors the condition names in the specification's error taxonomy exactly,
/// so client-side error handling can match on a string without parsing prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCombination,
    NotInHand,
    DoesNotBeatLead,
    NotYourTurn,
    IllegalPass,
    IllegalTributeCard,
    DeadlineExceeded,
    MatchAborted,
    SessionUnhealthy,
    IllegalTransition,
    NoPendingDecision,
    MatchNotFound,
    InvalidSeat,
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCombination => "INVALID_COMBINATION",
            ErrorCode::NotInHand => "NOT_IN_HAND",
            ErrorCode::DoesNotBeatLead => "DOES_NOT_BEAT_LEAD",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::IllegalPass => "ILLEGAL_PASS",
            ErrorCode::IllegalTributeCard => "ILLEGAL_TRIBUTE_CARD",
            ErrorCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ErrorCode::MatchAborted => "MATCH_ABORTED",
            ErrorCode::SessionUnhealthy => "SESSION_UNHEALTHY",
            ErrorCode::IllegalTransition => "ILLEGAL_TRANSITION",
            ErrorCode::NoPendingDecision => "NO_PENDING_DECISION",
            ErrorCode::MatchNotFound => "MATCH_NOT_FOUND",
            ErrorCode::InvalidSeat => "INVALID_SEAT",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
