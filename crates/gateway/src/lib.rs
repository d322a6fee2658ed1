//! Dharma Gateway: a conversational backend that proxies user
//! messages to a chat-completion API under a fixed guide persona,
//! tracks a per-session conversation phase, and collects
//! user-disclosed facts via keyword extraction.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod persona;
pub mod runtime;
pub mod state;
