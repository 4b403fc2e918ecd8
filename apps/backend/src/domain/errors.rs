use thiserror::Error;

/// Rejections produced by the pure veto core.
///
/// Every failed validation leaves the input state untouched; the caller gets
/// exactly one of these kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VetoError {
    /// Pool cannot supply the picks required by the round format.
    #[error("insufficient maps: {0}")]
    InsufficientMaps(String),
    #[error("wrong turn: {0}")]
    WrongTurn(String),
    #[error("wrong action: {0}")]
    WrongAction(String),
    #[error("map unavailable: {0}")]
    MapUnavailable(String),
    #[error("side rule violation: {0}")]
    SideRuleViolation(String),
    /// Stored state is structurally corrupt. Not retryable.
    #[error("invalid veto state: {0}")]
    InvalidState(String),
}

impl VetoError {
    /// True for rejections a client fixes by refetching state and resubmitting.
    pub fn is_client_recoverable(&self) -> bool {
        matches!(
            self,
            VetoError::WrongTurn(_)
                | VetoError::WrongAction(_)
                | VetoError::MapUnavailable(_)
                | VetoError::SideRuleViolation(_)
        )
    }

    pub fn invalid_state(detail: impl Into<String>) -> Self {
        VetoError::InvalidState(detail.into())
    }
}
