//! Domain layer: pure veto logic types and helpers.

pub mod completion;
pub mod errors;
pub mod legal;
pub mod rules;
pub mod sequence;
pub mod side_policy;
pub mod snapshot;
pub mod state;
pub mod transition;
pub mod veto_transition;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_invariants;

// Re-exports for ergonomics
pub use completion::{final_maps, is_complete, FinalMap};
pub use errors::VetoError;
pub use legal::{expected_move, ExpectedMove};
pub use rules::{ActionKind, MapId, RoundFormat, Side, Team};
pub use sequence::{generate_sequence, SequenceStep};
pub use side_policy::{side_rule, SideRule};
pub use snapshot::VetoSnapshot;
pub use state::{PickedMap, TurnStamp, VetoAction, VetoPhase, VetoState};
pub use transition::{replay, select_side, submit_action, VetoOutcome};
