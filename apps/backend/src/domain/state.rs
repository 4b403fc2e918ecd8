use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::errors::VetoError;
use crate::domain::rules::{ActionKind, MapId, RoundFormat, Side, Team};
use crate::domain::sequence::{generate_sequence, SequenceStep};

/// Sub-state of the veto machine.
///
/// A pick whose side is chosen by the opponent inserts an unlisted step right
/// after it; the formal `current_step` has already advanced while this is set.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VetoPhase {
    /// Turn follows `sequence[current_step]`.
    Normal,
    /// `resolving_team` must choose the starting side for `map_id`.
    PendingSide { map_id: MapId, resolving_team: Team },
}

/// A map selected to be played, in pick order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PickedMap {
    pub map_id: MapId,
    pub picked_by: Team,
    /// Side taken by `side_chosen_by`.
    pub side: Option<Side>,
    pub side_chosen_by: Option<Team>,
    pub attacking_team: Option<Team>,
    pub defending_team: Option<Team>,
}

impl PickedMap {
    pub fn unresolved(map_id: MapId, picked_by: Team) -> Self {
        Self {
            map_id,
            picked_by,
            side: None,
            side_chosen_by: None,
            attacking_team: None,
            defending_team: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.side.is_some()
    }

    /// Record `chooser` starting on `side`; the other team takes the opposite.
    pub(crate) fn resolve_side(&mut self, chooser: Team, side: Side) {
        let (attacking, defending) = match side {
            Side::Attack => (chooser, chooser.opponent()),
            Side::Defense => (chooser.opponent(), chooser),
        };
        self.side = Some(side);
        self.side_chosen_by = Some(chooser);
        self.attacking_team = Some(attacking);
        self.defending_team = Some(defending);
    }
}

/// Kinds recorded in the action log.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggedActionKind {
    Ban,
    Pick,
    SideSelect,
}

impl From<ActionKind> for LoggedActionKind {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Ban => LoggedActionKind::Ban,
            ActionKind::Pick => LoggedActionKind::Pick,
        }
    }
}

/// Append-only audit entry. Never mutated once recorded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VetoAction {
    pub kind: LoggedActionKind,
    pub map_id: MapId,
    pub side: Option<Side>,
    pub team: Team,
    /// Sequence index this entry belongs to (side selections share their pick's index).
    pub step: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Fields compared at commit time to detect a concurrent writer.
///
/// `actions_logged` grows with every accepted action, so two distinct
/// committed states never share a stamp even when step and turn coincide
/// (e.g. before and after a side selection by the team that picks next).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnStamp {
    pub current_step: usize,
    pub current_turn: Option<Team>,
    pub actions_logged: usize,
}

/// Complete per-room veto state, sufficient for pure domain operations.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VetoState {
    pub round_format: RoundFormat,
    /// Original pool in setup order.
    pub map_pool: Vec<MapId>,
    pub sequence: Vec<SequenceStep>,
    /// Index of the next formal step; equals `sequence.len()` once exhausted.
    pub current_step: usize,
    pub phase: VetoPhase,
    /// Maps neither banned nor picked, in pool order.
    pub available_maps: Vec<MapId>,
    /// Banned maps in ban order.
    pub banned_maps: Vec<MapId>,
    pub picked_maps: Vec<PickedMap>,
    pub actions_log: Vec<VetoAction>,
}

impl VetoState {
    /// Initial state for a room whose teams are both ready.
    pub fn new(round_format: RoundFormat, map_pool: Vec<MapId>) -> Result<Self, VetoError> {
        let mut seen = HashSet::with_capacity(map_pool.len());
        for map in &map_pool {
            if map.is_empty() {
                return Err(VetoError::invalid_state("map pool contains an empty map id"));
            }
            if !seen.insert(map.as_str()) {
                return Err(VetoError::invalid_state(format!(
                    "map pool contains duplicate map '{map}'"
                )));
            }
        }

        let sequence = generate_sequence(round_format, map_pool.len())?;
        Ok(Self {
            round_format,
            available_maps: map_pool.clone(),
            map_pool,
            sequence,
            current_step: 0,
            phase: VetoPhase::Normal,
            banned_maps: Vec::new(),
            picked_maps: Vec::new(),
            actions_log: Vec::new(),
        })
    }

    /// Team expected to act next, if any.
    pub fn current_turn(&self) -> Option<Team> {
        match &self.phase {
            VetoPhase::PendingSide { resolving_team, .. } => Some(*resolving_team),
            VetoPhase::Normal => self.sequence.get(self.current_step).map(|s| s.team),
        }
    }

    pub fn current_sequence_step(&self) -> Option<&SequenceStep> {
        self.sequence.get(self.current_step)
    }

    pub fn turn_stamp(&self) -> TurnStamp {
        TurnStamp {
            current_step: self.current_step,
            current_turn: self.current_turn(),
            actions_logged: self.actions_log.len(),
        }
    }

    pub fn is_sequence_exhausted(&self) -> bool {
        self.current_step >= self.sequence.len()
    }

    pub fn is_available(&self, map_id: &str) -> bool {
        self.available_maps.iter().any(|m| m == map_id)
    }

    pub fn pending_side(&self) -> Option<(&str, Team)> {
        match &self.phase {
            VetoPhase::PendingSide {
                map_id,
                resolving_team,
            } => Some((map_id.as_str(), *resolving_team)),
            VetoPhase::Normal => None,
        }
    }

    /// Structural checks run before any mutation.
    pub fn ensure_well_formed(&self) -> Result<(), VetoError> {
        if self.sequence.is_empty() {
            return Err(VetoError::invalid_state("veto sequence is missing"));
        }
        if self.current_step > self.sequence.len() {
            return Err(VetoError::invalid_state(format!(
                "current step {} beyond sequence length {}",
                self.current_step,
                self.sequence.len()
            )));
        }
        Ok(())
    }

    /// Full invariant check: pool partition, completion flags, pending-side shape.
    pub fn check_invariants(&self) -> Result<(), VetoError> {
        self.ensure_well_formed()?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.map_pool.len());
        let partition = self
            .available_maps
            .iter()
            .chain(self.banned_maps.iter())
            .chain(self.picked_maps.iter().map(|p| &p.map_id));
        let mut total = 0usize;
        for map in partition {
            total += 1;
            if !seen.insert(map.as_str()) {
                return Err(VetoError::invalid_state(format!(
                    "map '{map}' appears in more than one bucket"
                )));
            }
        }
        let pool: HashSet<&str> = self.map_pool.iter().map(String::as_str).collect();
        if total != self.map_pool.len() || seen != pool {
            return Err(VetoError::invalid_state(
                "available, banned and picked maps do not partition the pool",
            ));
        }

        for (i, step) in self.sequence.iter().enumerate() {
            if step.completed != (i < self.current_step) {
                return Err(VetoError::invalid_state(format!(
                    "step {i} completion flag disagrees with current step {}",
                    self.current_step
                )));
            }
        }

        let unresolved: Vec<&PickedMap> =
            self.picked_maps.iter().filter(|p| !p.is_resolved()).collect();
        match (&self.phase, unresolved.as_slice()) {
            (VetoPhase::Normal, []) => Ok(()),
            (VetoPhase::PendingSide { map_id, .. }, [only]) if &only.map_id == map_id => Ok(()),
            _ => Err(VetoError::invalid_state(format!(
                "{} picked map(s) without a side in phase {:?}",
                unresolved.len(),
                self.phase
            ))),
        }
    }
}
