//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate snapshot mutations into use-case level APIs.
//! - Keep UI layers decoupled from model and transport details.

pub mod backup_service;
pub mod context_service;
pub mod desk_service;
pub mod drag_service;
pub mod generation_service;
