//! Helpers shared across the hook installer and the staged-lint engine.

pub mod glob;
