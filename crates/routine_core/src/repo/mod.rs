//! Persistence layer.
//!
//! # Responsibility
//! - Define the local key-value store contract.
//! - Serialize the whole application state into that store.
//!
//! # Invariants
//! - Persistence is best effort: callers log write failures and move on.
//! - Nothing outside this module knows the storage keys.

pub mod kv_store;
pub mod snapshot;
