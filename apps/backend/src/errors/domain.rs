//! Domain-level error type used across services and adapters.
//!
//! This error type is transport- and storage-agnostic. Callers of the service
//! layer receive `crate::error::AppError`, converted from `DomainError` via the
//! provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::errors::VetoError;

/// Validation kinds: rule violations a client can correct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InsufficientMaps,
    WrongTurn,
    WrongAction,
    MapUnavailable,
    SideRuleViolation,
    /// Map pool is empty, contains duplicates, or is outside configured bounds.
    InvalidPool,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Room state moved between read and commit.
    OptimisticLock,
    /// Veto already initialized for this room.
    RoomExists,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::OptimisticLock, _))
    }
}

impl From<VetoError> for DomainError {
    fn from(err: VetoError) -> Self {
        match err {
            VetoError::InsufficientMaps(d) => {
                DomainError::validation(ValidationKind::InsufficientMaps, d)
            }
            VetoError::WrongTurn(d) => DomainError::validation(ValidationKind::WrongTurn, d),
            VetoError::WrongAction(d) => DomainError::validation(ValidationKind::WrongAction, d),
            VetoError::MapUnavailable(d) => {
                DomainError::validation(ValidationKind::MapUnavailable, d)
            }
            VetoError::SideRuleViolation(d) => {
                DomainError::validation(ValidationKind::SideRuleViolation, d)
            }
            VetoError::InvalidState(d) => DomainError::infra(InfraErrorKind::DataCorruption, d),
        }
    }
}
