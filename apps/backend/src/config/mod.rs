pub mod veto;

pub use veto::VetoConfig;
