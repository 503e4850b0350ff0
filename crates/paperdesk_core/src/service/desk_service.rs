//! Non-drag organization operations.
//!
//! # Responsibility
//! - Provide the direct actions of the two desks and the stack: new paper,
//!   focus, folder create/rename, activation and context toggles, trash and
//!   archive restore/purge, top-paper editing and explicit save.
//!
//! # Invariants
//! - Every mutation preserves the single-location invariants; restores move
//!   a tombstoned item into exactly one live container.
//! - Missing ids degrade to a no-op (`false`), never an error: these
//!   operations mirror direct UI actions on items that were just visible.

use crate::model::paper::{Paper, PaperId};
use crate::model::project::{DeskSide, Folder, FolderId, Project, TombstoneItem};
use uuid::Uuid;

/// Pushes a blank paper onto the stack and returns its id.
pub fn add_paper(project: &mut Project) -> PaperId {
    let paper = Paper::untitled();
    let paper_id = paper.id;
    project.main_stack.push(paper);
    paper_id
}

/// Moves the stack paper at `index` to the top.
pub fn focus_paper(project: &mut Project, index: usize) -> bool {
    if index >= project.main_stack.len() {
        return false;
    }
    let paper = project.main_stack.remove(index);
    project.main_stack.push(paper);
    true
}

/// Appends a new folder to one desk and returns its id.
pub fn create_folder(project: &mut Project, side: DeskSide) -> FolderId {
    let folder = Folder::new("New Folder");
    let folder_id = folder.id;
    project.desk_mut(side).folders.push(folder);
    folder_id
}

/// Renames a folder on one desk.
pub fn rename_folder(
    project: &mut Project,
    side: DeskSide,
    folder_id: FolderId,
    name: impl Into<String>,
) -> bool {
    match project.desk_mut(side).folder_mut(folder_id) {
        Some(folder) => {
            folder.name = name.into();
            true
        }
        None => false,
    }
}

/// Edits the subject of a paper stored in a sidebar folder.
pub fn rename_paper(
    project: &mut Project,
    side: DeskSide,
    folder_id: FolderId,
    paper_id: PaperId,
    subject: impl Into<String>,
) -> bool {
    match folder_paper_mut(project, side, folder_id, paper_id) {
        Some(paper) => {
            paper.subject = subject.into();
            true
        }
        None => false,
    }
}

/// Flips a sidebar paper's context inclusion flag.
pub fn toggle_paper_context(
    project: &mut Project,
    side: DeskSide,
    folder_id: FolderId,
    paper_id: PaperId,
) -> bool {
    match folder_paper_mut(project, side, folder_id, paper_id) {
        Some(paper) => {
            paper.in_context = paper.in_context.toggled();
            true
        }
        None => false,
    }
}

/// Flips a folder's activation state.
///
/// Held as an id set at the project level, so the state survives folder
/// moves between desks and tolerates ids of folders that no longer exist.
pub fn toggle_folder_active(project: &mut Project, folder_id: FolderId) {
    if !project.inactive_folder_ids.remove(&folder_id) {
        project.inactive_folder_ids.insert(folder_id);
    }
}

/// Restores a trashed item: folders rejoin that desk's folder list, papers
/// rejoin the main stack.
pub fn restore_trash_item(project: &mut Project, side: DeskSide, item_id: Uuid) -> bool {
    let trash = &mut project.desk_mut(side).trash;
    let Some(index) = trash.iter().position(|tombstone| tombstone.id() == item_id) else {
        return false;
    };
    let tombstone = trash.remove(index);
    match tombstone.item {
        TombstoneItem::Folder(folder) => project.desk_mut(side).folders.push(folder),
        TombstoneItem::Paper(paper) => project.main_stack.push(paper),
    }
    true
}

/// Restores an archived item from the left-desk archive.
pub fn restore_archive_item(project: &mut Project, item_id: Uuid) -> bool {
    let archive = &mut project.left_desk.archive;
    let Some(index) = archive
        .iter()
        .position(|tombstone| tombstone.id() == item_id)
    else {
        return false;
    };
    let tombstone = archive.remove(index);
    match tombstone.item {
        TombstoneItem::Folder(folder) => project.left_desk.folders.push(folder),
        TombstoneItem::Paper(paper) => project.main_stack.push(paper),
    }
    true
}

/// Permanently deletes one trashed item. Unrecoverable.
pub fn delete_trash_item(project: &mut Project, side: DeskSide, item_id: Uuid) -> bool {
    let trash = &mut project.desk_mut(side).trash;
    let Some(index) = trash.iter().position(|tombstone| tombstone.id() == item_id) else {
        return false;
    };
    trash.remove(index);
    true
}

/// Permanently empties one desk's trash.
pub fn empty_trash(project: &mut Project, side: DeskSide) {
    project.desk_mut(side).trash.clear();
}

/// Records a version of the top-of-stack paper's current subject/content.
///
/// Returns the new version number, or `None` on an empty stack.
pub fn save_active_paper(project: &mut Project, now_ms: i64) -> Option<u32> {
    project
        .active_paper_mut()
        .map(|paper| paper.record_version(now_ms))
}

/// Replaces the top-of-stack paper's subject.
pub fn set_active_subject(project: &mut Project, subject: impl Into<String>) -> bool {
    match project.active_paper_mut() {
        Some(paper) => {
            paper.subject = subject.into();
            true
        }
        None => false,
    }
}

/// Replaces the top-of-stack paper's content.
pub fn set_active_content(project: &mut Project, content: impl Into<String>) -> bool {
    match project.active_paper_mut() {
        Some(paper) => {
            paper.content = content.into();
            true
        }
        None => false,
    }
}

fn folder_paper_mut<'a>(
    project: &'a mut Project,
    side: DeskSide,
    folder_id: FolderId,
    paper_id: PaperId,
) -> Option<&'a mut Paper> {
    project
        .desk_mut(side)
        .folder_mut(folder_id)?
        .papers
        .iter_mut()
        .find(|paper| paper.id == paper_id)
}
