//! Project snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole-project JSON snapshots (no partial-field updates).
//! - Own the small key-value settings store (e.g. last active project).
//!
//! # Invariants
//! - `save_project` always writes the complete snapshot.
//! - Corrupted persisted snapshots surface as `InvalidData`, never as a
//!   silently shortened project list.
//! - `replace_all_projects` is transactional: all imported rows land, or
//!   none do.

use crate::db::DbError;
use crate::model::project::{Project, ProjectId};
use rusqlite::{params, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project snapshots and app settings.
pub trait ProjectRepository {
    /// Writes one whole-project snapshot (insert or replace).
    fn save_project(&self, project: &Project) -> RepoResult<()>;
    /// Loads every stored project snapshot.
    fn load_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Removes one project permanently.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<()>;
    /// Atomically replaces the full project set (backup import).
    fn replace_all_projects(&mut self, projects: &[Project]) -> RepoResult<()>;
    /// Writes one settings key.
    fn save_setting(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Reads one settings key.
    fn load_setting(&self, key: &str) -> RepoResult<Option<String>>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["projects", "settings"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::InvalidData(format!(
                    "required table `{table}` is missing; migrations not applied"
                )));
            }
        }
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn save_project(&self, project: &Project) -> RepoResult<()> {
        let data = encode_project(project)?;
        self.conn.execute(
            "INSERT INTO projects (id, title, data, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                data = excluded.data,
                updated_at = excluded.updated_at;",
            params![project.id.to_string(), project.title.as_str(), data],
        )?;
        Ok(())
    }

    fn load_all_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data FROM projects ORDER BY updated_at ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            let data: String = row.get("data")?;
            projects.push(decode_project(&data)?);
        }
        Ok(projects)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE id = ?1;",
            [project_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(project_id));
        }
        Ok(())
    }

    fn replace_all_projects(&mut self, projects: &[Project]) -> RepoResult<()> {
        // Encode up front so a bad snapshot can never leave a half-replaced
        // table behind.
        let mut encoded = Vec::with_capacity(projects.len());
        for project in projects {
            encoded.push((
                project.id.to_string(),
                project.title.clone(),
                encode_project(project)?,
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM projects;", [])?;
        for (id, title, data) in encoded {
            tx.execute(
                "INSERT INTO projects (id, title, data, updated_at)
                 VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000));",
                params![id, title, data],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn save_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn load_setting(&self, key: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get("value")?));
        }
        Ok(None)
    }
}

fn encode_project(project: &Project) -> RepoResult<String> {
    serde_json::to_string(project)
        .map_err(|err| RepoError::InvalidData(format!("snapshot encoding failed: {err}")))
}

fn decode_project(data: &str) -> RepoResult<Project> {
    serde_json::from_str(data)
        .map_err(|err| RepoError::InvalidData(format!("snapshot decoding failed: {err}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
