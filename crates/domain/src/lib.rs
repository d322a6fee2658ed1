//! Shared domain types for the Dharma Gateway.
//!
//! Holds the configuration schema, the cross-crate error type, and the
//! provider-agnostic chat message types. Every other crate in the
//! workspace depends on this one and nothing else in the workspace.

pub mod config;
pub mod error;
pub mod message;
