//! Flutter-facing bindings for the routine planner core.

pub mod api;
