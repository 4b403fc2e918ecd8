//! Repository layer: storage contracts the services depend on.

pub mod rooms;
