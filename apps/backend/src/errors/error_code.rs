//! Error codes surfaced by the veto service.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings clients see.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Veto rule violations (client-recoverable)
    /// Pool smaller than the round format's required picks
    InsufficientMaps,
    /// Actor does not hold the turn
    WrongTurn,
    /// Action kind does not match the expected step
    WrongAction,
    /// Map already banned, picked, or not in the pool
    MapUnavailable,
    /// Side supplied where forbidden, or missing where required
    SideRuleViolation,
    /// Map pool failed setup validation
    InvalidPool,
    /// General validation error
    ValidationError,

    // Resource Not Found
    RoomNotFound,
    NotFound,

    // Conflicts
    /// Veto already created for the room
    RoomExists,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Stored veto state is structurally corrupt
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientMaps => "INSUFFICIENT_MAPS",
            Self::WrongTurn => "WRONG_TURN",
            Self::WrongAction => "WRONG_ACTION",
            Self::MapUnavailable => "MAP_UNAVAILABLE",
            Self::SideRuleViolation => "SIDE_RULE_VIOLATION",
            Self::InvalidPool => "INVALID_POOL",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoomExists => "ROOM_EXISTS",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
