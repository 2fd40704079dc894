pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use tinypaste_core::{PasteRecord, ReadRepository, Repository, StorageError};
