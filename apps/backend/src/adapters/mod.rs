//! Storage adapters implementing the repository contracts.

pub mod rooms_mem;

pub use rooms_mem::InMemoryRoomStore;
