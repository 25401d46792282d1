//! State mutation operations.
//!
//! # Responsibility
//! - Express every user action as a transition on an explicitly passed
//!   `AppState`.
//! - Keep persistence, rendering and notification out of the transitions;
//!   `crate::session` sequences those around each call.
//!
//! # Invariants
//! - An operation that returns `Err` has not modified routine contents.
//! - Operations act on the active routine unless an id says otherwise.

pub mod bootstrap;
pub mod course_service;
pub mod error;
pub mod routine_service;
pub mod slot_service;
pub mod view_service;
