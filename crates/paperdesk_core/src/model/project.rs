//! Project aggregate: desks, folders, stack, trash and archive.
//!
//! # Responsibility
//! - Define the root snapshot persisted as a whole after every mutation.
//! - Provide the seeded default project and read-only queries.
//! - Provide the mechanical single-location integrity check used by tests.
//!
//! # Invariants
//! - Every paper id lives in exactly one container (stack, one folder, one
//!   trash, or the left-desk archive).
//! - Every folder id lives in exactly one container (a desk's folder list,
//!   a trash, or the left-desk archive).
//! - Only the left desk's archive is ever populated; the right desk has no
//!   archive surface. Preserved asymmetry, not a gap.
//! - `inactive_folder_ids` may reference folders that no longer exist;
//!   stale entries are tolerated opaque tokens.

use crate::model::paper::{Paper, PaperId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Stable identifier for a folder.
pub type FolderId = Uuid;

/// Default system prompt applied to new projects.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI writing assistant.";

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 131_072;

const ONBOARDING_SUBJECT: &str = "Guide to Paperdesk";
const ONBOARDING_CONTENT: &str = "\
Hello!

Welcome to Paperdesk. Your work lives in papers, your papers live in folders, \
and your folders feed the assistant when you ask for help.

The center of the screen is your desk. Papers stack as tabs at the top; the \
one on top is the one you are working on. Folders sit on the left and right \
sidebars. Each folder has a power toggle to activate or deactivate it, and \
each paper has a checkmark to include or exclude it from the assistant's \
context.

At the bottom of each sidebar you will find an Archive and a Trash bin. Drag \
a folder or paper there when you are done with it. Archive keeps things \
safely stored; Trash holds them until you delete permanently. Once you are \
done reading, drag this paper into a folder to store it.";

/// One of the two sidebar surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeskSide {
    Left,
    Right,
}

/// A named, ordered bucket of papers. Paper order is drag order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

impl Folder {
    /// Creates an empty folder with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            papers: Vec::new(),
        }
    }
}

/// Payload of a trash/archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TombstoneItem {
    Paper(Paper),
    Folder(Folder),
}

impl TombstoneItem {
    /// Returns the stable id of the enclosed item.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Paper(paper) => paper.id,
            Self::Folder(folder) => folder.id,
        }
    }
}

/// A deleted or archived copy of a paper/folder, inert until restored or
/// permanently deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    #[serde(flatten)]
    pub item: TombstoneItem,
    /// Set when the item entered a trash bin. Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    /// Set when the item entered the archive. Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<i64>,
}

impl Tombstone {
    /// Stamps an item as trashed.
    pub fn deleted(item: TombstoneItem, deleted_at: i64) -> Self {
        Self {
            item,
            deleted_at: Some(deleted_at),
            archived_at: None,
        }
    }

    /// Stamps an item as archived.
    pub fn archived(item: TombstoneItem, archived_at: i64) -> Self {
        Self {
            item,
            deleted_at: None,
            archived_at: Some(archived_at),
        }
    }

    /// Returns the stable id of the tombstoned item.
    pub fn id(&self) -> Uuid {
        self.item.id()
    }
}

/// One sidebar surface: folders plus its trash, and (left only) the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desk {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub trash: Vec<Tombstone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archive: Vec<Tombstone>,
}

impl Desk {
    /// Finds a folder by id.
    pub fn folder(&self, folder_id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == folder_id)
    }

    /// Finds a folder by id, mutably.
    pub fn folder_mut(&mut self, folder_id: FolderId) -> Option<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|folder| folder.id == folder_id)
    }
}

/// Per-project generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub system_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// The root aggregate, persisted as a whole snapshot after each mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub left_desk: Desk,
    pub right_desk: Desk,
    /// Ordered working stack; the last element is the active (top) paper.
    #[serde(default)]
    pub main_stack: Vec<Paper>,
    /// Deactivated folder ids. Held here, not on Folder, so activation
    /// state survives folder moves between desks.
    #[serde(default)]
    pub inactive_folder_ids: BTreeSet<FolderId>,
    #[serde(default)]
    pub ai_settings: AiSettings,
}

impl Project {
    /// Creates the seeded default project: one onboarding paper on the
    /// stack, starter folders on both desks, the two "inactive" starters
    /// pre-deactivated.
    pub fn create_default(name: impl Into<String>) -> Self {
        let left_inactive = Folder::new("Inactive Folder");
        let right_active = Folder::new("Active Folder");
        let right_inactive = Folder::new("Inactive Folder 2");

        let mut inactive_folder_ids = BTreeSet::new();
        inactive_folder_ids.insert(left_inactive.id);
        inactive_folder_ids.insert(right_inactive.id);

        Self {
            id: Uuid::new_v4(),
            title: name.into(),
            left_desk: Desk {
                folders: vec![left_inactive],
                ..Desk::default()
            },
            right_desk: Desk {
                folders: vec![right_active, right_inactive],
                ..Desk::default()
            },
            main_stack: vec![Paper::new(ONBOARDING_SUBJECT, ONBOARDING_CONTENT)],
            inactive_folder_ids,
            ai_settings: AiSettings::default(),
        }
    }

    /// Returns the desk for one side.
    pub fn desk(&self, side: DeskSide) -> &Desk {
        match side {
            DeskSide::Left => &self.left_desk,
            DeskSide::Right => &self.right_desk,
        }
    }

    /// Returns the desk for one side, mutably.
    pub fn desk_mut(&mut self, side: DeskSide) -> &mut Desk {
        match side {
            DeskSide::Left => &mut self.left_desk,
            DeskSide::Right => &mut self.right_desk,
        }
    }

    /// Returns the active (top-of-stack) paper, if any.
    pub fn active_paper(&self) -> Option<&Paper> {
        self.main_stack.last()
    }

    /// Returns the active paper mutably.
    pub fn active_paper_mut(&mut self) -> Option<&mut Paper> {
        self.main_stack.last_mut()
    }

    /// Returns whether a folder participates in generation context.
    ///
    /// Unknown ids count as active; activation state is a set of opaque
    /// tokens, not a strong reference.
    pub fn is_folder_active(&self, folder_id: FolderId) -> bool {
        !self.inactive_folder_ids.contains(&folder_id)
    }

    /// Locates a paper by id across the stack and both desks' folders.
    ///
    /// Completion handlers use this to apply results against the latest
    /// snapshot instead of splicing in a paper captured at request time.
    pub fn find_paper_mut(&mut self, paper_id: PaperId) -> Option<&mut Paper> {
        if let Some(index) = self
            .main_stack
            .iter()
            .position(|paper| paper.id == paper_id)
        {
            return self.main_stack.get_mut(index);
        }

        for desk in [&mut self.left_desk, &mut self.right_desk] {
            for folder in &mut desk.folders {
                if let Some(paper) = folder.papers.iter_mut().find(|paper| paper.id == paper_id) {
                    return Some(paper);
                }
            }
        }
        None
    }

    /// Checks the container invariants over the whole snapshot.
    pub fn verify_integrity(&self) -> Result<(), IntegrityViolation> {
        let mut paper_ids: BTreeSet<PaperId> = BTreeSet::new();
        let mut folder_ids: BTreeSet<FolderId> = BTreeSet::new();

        let mut seen_paper = |paper: &Paper| -> Result<(), IntegrityViolation> {
            if !paper.versions_are_dense() {
                return Err(IntegrityViolation::SparseVersions(paper.id));
            }
            if !paper_ids.insert(paper.id) {
                return Err(IntegrityViolation::DuplicatePaper(paper.id));
            }
            Ok(())
        };
        let mut seen_folder = |folder_id: FolderId| -> Result<(), IntegrityViolation> {
            if !folder_ids.insert(folder_id) {
                return Err(IntegrityViolation::DuplicateFolder(folder_id));
            }
            Ok(())
        };

        for paper in &self.main_stack {
            seen_paper(paper)?;
        }
        for desk in [&self.left_desk, &self.right_desk] {
            for folder in &desk.folders {
                seen_folder(folder.id)?;
                for paper in &folder.papers {
                    seen_paper(paper)?;
                }
            }
            for tombstone in desk.trash.iter().chain(desk.archive.iter()) {
                match &tombstone.item {
                    TombstoneItem::Paper(paper) => seen_paper(paper)?,
                    TombstoneItem::Folder(folder) => {
                        seen_folder(folder.id)?;
                        for paper in &folder.papers {
                            seen_paper(paper)?;
                        }
                    }
                }
            }
        }

        if !self.right_desk.archive.is_empty() {
            return Err(IntegrityViolation::RightDeskArchivePopulated);
        }

        Ok(())
    }
}

/// Violation reported by `Project::verify_integrity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// A paper id appears in more than one container.
    DuplicatePaper(PaperId),
    /// A folder id appears in more than one container.
    DuplicateFolder(FolderId),
    /// A paper's version numbering is not dense and 1-based.
    SparseVersions(PaperId),
    /// The right desk's archive must stay empty.
    RightDeskArchivePopulated,
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicatePaper(id) => write!(f, "paper appears in multiple containers: {id}"),
            Self::DuplicateFolder(id) => write!(f, "folder appears in multiple containers: {id}"),
            Self::SparseVersions(id) => write!(f, "paper has sparse version numbering: {id}"),
            Self::RightDeskArchivePopulated => {
                write!(f, "right desk archive must stay empty")
            }
        }
    }
}

impl Error for IntegrityViolation {}
