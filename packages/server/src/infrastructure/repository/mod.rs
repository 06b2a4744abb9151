//! Repository implementations.
//!
//! - `json_file`: persistent chat store (users, groups, channels, messages)
//! - `inmemory`: live room membership

pub mod inmemory;
pub mod json_file;

pub use inmemory::InMemoryRoomRepository;
pub use json_file::{ChatDocument, JsonFileChatRepository};
