//! Outbound generation-service boundary.
//!
//! # Responsibility
//! - Own the HTTPS chat-completion call and its request/response shapes.
//! - Classify transport/HTTP failures into user-presentable error kinds.
//!
//! # Invariants
//! - Core state is never touched from this module; callers apply responses
//!   through the generation service against the latest snapshot.

pub mod client;

pub use client::{AiError, CompletionClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
