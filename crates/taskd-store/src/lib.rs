pub mod database;
pub mod error;
pub mod memory;
pub mod schema;
pub mod tasks;

pub use database::Database;
pub use error::StoreError;
pub use memory::MemoryTaskStore;
pub use tasks::{SqliteTaskStore, TaskStore};
