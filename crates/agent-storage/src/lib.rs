//! Object storage behind two agent tools
//!
//! [`ObjectStore`] is the storage seam; [`InMemoryObjectStore`] and
//! [`FsObjectStore`] implement it. [`CreateObjectTool`] and
//! [`ListObjectsTool`] expose a store to agents, reporting store faults as
//! `{"status": "error", "message": ...}` results rather than errors.

pub mod error;
pub mod fs;
pub mod memory;
pub mod store;
pub mod tools;

pub use error::{Result, StorageError};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use store::ObjectStore;
pub use tools::{CreateObjectTool, ListObjectsTool, storage_registry};
