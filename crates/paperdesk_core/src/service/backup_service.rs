//! Backup export/import.
//!
//! # Responsibility
//! - Serialize the full project set into the portable backup envelope.
//! - Validate and parse a backup file before any state is replaced.
//!
//! # Invariants
//! - Import is all-or-nothing: a rejected file leaves the in-memory project
//!   set untouched, because parsing happens before anything is applied.
//! - The envelope shape is `{ "projects": [...], "exportedAt": ms }`.

use crate::model::project::Project;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backup failure kinds.
#[derive(Debug)]
pub enum BackupError {
    /// File is not parseable or lacks a `projects` array.
    InvalidBackupFile(String),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackupFile(detail) => write!(f, "invalid backup file: {detail}"),
        }
    }
}

impl Error for BackupError {}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupEnvelope {
    projects: Vec<Project>,
    exported_at: i64,
}

/// Serializes all projects into the backup envelope (pretty JSON).
pub fn export_backup(projects: &[Project], exported_at: i64) -> String {
    let envelope = BackupEnvelope {
        projects: projects.to_vec(),
        exported_at,
    };
    // Serialization of the in-memory model cannot fail for these types.
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Parses a backup file into its project list.
///
/// Rejects anything without a `projects` array before the caller touches
/// any state; shape errors inside individual projects also reject the whole
/// file.
pub fn import_backup(text: &str) -> Result<Vec<Project>, BackupError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| BackupError::InvalidBackupFile(err.to_string()))?;

    let Some(projects) = value.get("projects") else {
        return Err(BackupError::InvalidBackupFile(
            "missing `projects` field".to_string(),
        ));
    };
    if !projects.is_array() {
        return Err(BackupError::InvalidBackupFile(
            "`projects` must be an array".to_string(),
        ));
    }

    serde_json::from_value(projects.clone())
        .map_err(|err| BackupError::InvalidBackupFile(err.to_string()))
}
