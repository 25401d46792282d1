//! SQLite backing for the local key-value store.
//!
//! Opens file or in-memory connections and brings their schema up to date.
//! The schema version lives in `PRAGMA user_version`; no key-value access
//! happens before migrations succeed. Failures surface as `StoreError`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
