// Storage layer for the study-tracking server
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Every owned resource goes through the `OwnedStore` contract in `owned`,
// which fuses the ownership predicate into each operation. The repository
// layer is the sole authority for tenant isolation; nothing above it filters
// rows by owner after the fact.

pub mod backend;
pub mod memory;
pub mod models;
pub mod owned;
pub mod password;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use owned::{OwnedRecord, OwnedStore};
pub use repositories::Database;
