//! Core domain logic for Paperdesk.
//! This crate is the single source of truth for organization invariants.

pub mod ai;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use ai::{AiError, CompletionClient};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::paper::{ContextFlag, Paper, PaperId, Version};
pub use model::project::{
    AiSettings, Desk, DeskSide, Folder, FolderId, IntegrityViolation, Project, ProjectId,
    Tombstone, TombstoneItem,
};
pub use repo::project_repo::{
    ProjectRepository, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::backup_service::{export_backup, import_backup, BackupError};
pub use service::context_service::{
    build_context, extract_seed, ChatMessage, ContextBundle, ContextDocument, Role, SeedSplit,
    CHAIN_DIVIDER,
};
pub use service::drag_service::{
    apply_drop, resolve_drop_target, visible_stack_paper, DragSession, DragState, DropTarget,
    DropZone, PaperSource, Point, Rect, SessionEnd,
};
pub use service::generation_service::{
    GenerationError, GenerationMode, GenerationService, PendingGeneration,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns the current wall-clock time in unix epoch milliseconds.
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
