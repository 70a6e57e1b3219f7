pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::{Post, PostDraft, Profile};
pub use postgres::PgStore;
pub use repository::ContentStore;
