//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot persistence contract used by the application
//!   shell.
//! - Isolate SQLite details from model and service code.
//!
//! # Invariants
//! - Persistence is whole-snapshot only; there are no partial updates.

pub mod project_repo;
