//! ColdCloud Storage
//!
//! Whole-value key-value storage shared by every manager:
//!
//! - **kv**: the `KeyValueStore` trait with in-memory and file backends
//! - **collection**: typed JSON load/save helpers and id allocation
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! coldCloudUsers      → [User, ...]
//! coldCloudAuth       → Session { user_id }
//! coldCloudServices   → [ServiceOrder, ...]
//! calculationHistory  → [CalculationRecord, ...]   (newest first)
//! ```
//!
//! # Example
//!
//! ```rust
//! use coldcloud::storage::{load_list, save_json, MemoryStore};
//!
//! let store = MemoryStore::new();
//! save_json(&store, "numbers", &vec![1, 2, 3]).unwrap();
//! let numbers: Vec<i32> = load_list(&store, "numbers").unwrap();
//! assert_eq!(numbers.len(), 3);
//! ```

pub mod collection;
pub mod error;
pub mod kv;

pub use collection::{load_json, load_list, next_id, save_json};
pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore, SharedStore};

/// Registered users
pub const USERS_KEY: &str = "coldCloudUsers";

/// Active session (user id only)
pub const SESSION_KEY: &str = "coldCloudAuth";

/// Service orders placed from the dashboard
pub const SERVICES_KEY: &str = "coldCloudServices";

/// Shared calculation history
pub const HISTORY_KEY: &str = "calculationHistory";
