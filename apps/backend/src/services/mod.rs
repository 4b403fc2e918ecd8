pub mod veto_flow;
