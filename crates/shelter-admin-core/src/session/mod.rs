//! Session management for the signed-in administrator.
//!
//! This module provides:
//! - `SessionStore`: the in-memory token/user pair, mirrored to durable storage
//! - `DurableStore`: the storage seam, with file, keychain and memory backends
//!
//! The store is shared behind an `Arc` by the API client and the auth guard.

pub mod storage;
pub mod store;

pub use storage::{DurableStore, FileStore, KeyringStore, MemoryStore, StorageBackend, StorageError};
pub use store::{Session, SessionStore, SessionUser, TOKEN_KEY, USER_KEY};
