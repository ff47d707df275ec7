// Adapters layer: concrete implementations of the domain ports (stores, id generation).

pub mod ids;
pub mod json_file;
pub mod memory;

pub use ids::UuidGenerator;
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
