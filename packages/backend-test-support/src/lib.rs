//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: one-time logging
//! setup, unique fixture data, and assertions on serialized problem details.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
