//! Channel chat server library.
//!
//! Clients connect over WebSocket, join one channel room at a time and
//! exchange messages that are persisted to a JSON document before they are
//! broadcast to the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
