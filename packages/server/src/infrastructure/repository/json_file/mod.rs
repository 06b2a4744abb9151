//! JSON file chat store.

pub mod document;
pub mod store;

pub use document::ChatDocument;
pub use store::JsonFileChatRepository;
