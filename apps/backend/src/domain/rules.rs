//! Core veto vocabulary: teams, sides, round formats, and action kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Map identifier as supplied by room setup (e.g. `"ascent"`).
pub type MapId = String;

/// One of the two competing teams.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// The other team.
    #[inline]
    pub const fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Team acting `n` alternations after `start` (A, B, A, ... when start is A).
    #[inline]
    pub const fn alternate(start: Team, n: usize) -> Team {
        if n % 2 == 0 {
            start
        } else {
            start.opponent()
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => f.write_str("A"),
            Team::B => f.write_str("B"),
        }
    }
}

/// Starting side for a picked map.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attack,
    Defense,
}

impl Side {
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Attack => Side::Defense,
            Side::Defense => Side::Attack,
        }
    }
}

/// Match length; fixes how many maps end up being played.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundFormat {
    Bo1,
    Bo3,
    Bo5,
}

impl RoundFormat {
    pub const fn required_picks(self) -> usize {
        match self {
            RoundFormat::Bo1 => 1,
            RoundFormat::Bo3 => 3,
            RoundFormat::Bo5 => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RoundFormat::Bo1 => "BO1",
            RoundFormat::Bo3 => "BO3",
            RoundFormat::Bo5 => "BO5",
        }
    }
}

impl fmt::Display for RoundFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formal sequence actions. Side selection is not a sequence step.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Ban => f.write_str("ban"),
            ActionKind::Pick => f.write_str("pick"),
        }
    }
}
