//! Domain model for the document-organization workspace.
//!
//! # Responsibility
//! - Define the canonical snapshot types persisted and mutated by services.
//! - Keep one explicit container shape so location invariants stay
//!   mechanically checkable.
//!
//! # Invariants
//! - Every paper/folder is identified by a stable UUID.
//! - Deletion and archival are represented by tombstones, not hard delete.

pub mod paper;
pub mod project;
