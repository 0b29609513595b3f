//! Instance registry: durable store and provider-aware manager.
//!
//! The store owns the durable copy of the registry as one logical value
//! (the ordered list of records), read and replaced atomically. The manager
//! layers validation, status seeding, and the serialized read-modify-write
//! paths used by the reconciliation engine on top.

pub mod error;
pub mod file;
pub mod manager;
pub mod memory;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use file::FileRegistryStore;
pub use manager::RegistryManager;
pub use memory::InMemoryRegistryStore;
pub use store::RegistryStore;
