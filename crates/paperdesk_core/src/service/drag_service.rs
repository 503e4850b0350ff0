//! Drag-and-drop move engine.
//!
//! # Responsibility
//! - Model the drag session state machine (`Idle -> Dragging ->
//!   Dropped|Cancelled`).
//! - Resolve the current drop target from hit-test zones in a fixed
//!   priority order.
//! - Apply exactly one container transition per drop, atomically.
//!
//! # Invariants
//! - A drop either produces a fully-updated snapshot or leaves the prior
//!   snapshot untouched; no partial container update is observable.
//! - The engine never raises recoverable errors: vanished sources/targets
//!   and identical-position drops degrade to a no-op.
//! - The engine has no knowledge of generation locks; locked papers are
//!   rejected at the input layer before a session starts.

use crate::model::paper::{Paper, PaperId};
use crate::model::project::{DeskSide, Folder, FolderId, Project, Tombstone, TombstoneItem};

/// Pointer position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned hit-test rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Returns whether the point lies inside this rect (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// A droppable surface reported by the layout for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub rect: Rect,
    pub kind: DropTarget,
}

/// Resolved drop target. Doubles as the zone kind in hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// The main-stack surface. Valid only for papers dragged from a folder.
    MainStack,
    /// One desk's trash bin.
    TrashBin(DeskSide),
    /// The archive bin. Archived items always land on the left desk.
    ArchiveBin,
    /// An individual paper row: insert before this paper.
    PaperRow {
        desk: DeskSide,
        folder_id: FolderId,
        paper_id: PaperId,
    },
    /// A folder body: append a paper, or reposition a folder before it.
    FolderBody { desk: DeskSide, folder_id: FolderId },
    /// A sidebar root surface: append a folder to this desk's list.
    SidebarRoot(DeskSide),
}

/// Where a dragged paper came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperSource {
    Stack,
    Folder { desk: DeskSide, folder_id: FolderId },
}

/// An in-flight drag session. Carries a copy of the dragged item and its
/// source locator; the drop target is recomputed on every pointer move.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSession {
    Paper {
        paper: Paper,
        source: PaperSource,
        target: Option<DropTarget>,
    },
    Folder {
        folder: Folder,
        source_desk: DeskSide,
        target: Option<DropTarget>,
    },
}

/// Explicit drag state owned by the input layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// How a drag session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// A transition applied; this is the new snapshot.
    Dropped(Project),
    /// A target was set but resolving it degraded to a no-op.
    NoOp,
    /// Pointer released with no drop target.
    Cancelled,
}

impl DragState {
    /// Enters `Dragging` with a paper grabbed by its handle or row.
    pub fn begin_paper(&mut self, paper: Paper, source: PaperSource) {
        *self = Self::Dragging(DragSession::Paper {
            paper,
            source,
            target: None,
        });
    }

    /// Enters `Dragging` with a folder grabbed by its rail.
    pub fn begin_folder(&mut self, folder: Folder, source_desk: DeskSide) {
        *self = Self::Dragging(DragSession::Folder {
            folder,
            source_desk,
            target: None,
        });
    }

    /// Recomputes the drop target for the current pointer position.
    pub fn pointer_moved(&mut self, zones: &[DropZone], point: Point) {
        if let Self::Dragging(session) = self {
            let target = resolve_drop_target(zones, point, session);
            session.set_target(target);
        }
    }

    /// Ends the session, applying at most one container transition.
    ///
    /// Always returns to `Idle`, whatever the outcome.
    pub fn pointer_released(&mut self, project: &Project, now_ms: i64) -> SessionEnd {
        let state = std::mem::take(self);
        let Self::Dragging(session) = state else {
            return SessionEnd::Cancelled;
        };

        match session.target() {
            None => SessionEnd::Cancelled,
            Some(target) => match apply_drop(project, &session, target, now_ms) {
                Some(next) => SessionEnd::Dropped(next),
                None => SessionEnd::NoOp,
            },
        }
    }

    /// Returns the active session while dragging.
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }
}

impl DragSession {
    fn set_target(&mut self, target: Option<DropTarget>) {
        match self {
            Self::Paper { target: slot, .. } | Self::Folder { target: slot, .. } => *slot = target,
        }
    }

    /// Returns the currently resolved drop target.
    pub fn target(&self) -> Option<DropTarget> {
        match self {
            Self::Paper { target, .. } | Self::Folder { target, .. } => *target,
        }
    }
}

/// Resolves the drop target for a pointer position.
///
/// Zone categories are tested in fixed priority order so overlapping
/// surfaces resolve deterministically (a paper row always beats its folder
/// body, a folder body always beats its sidebar root): main stack, trash
/// bins, archive bins, paper rows, folder bodies, sidebar roots. The first
/// zone of the winning category containing the point is kept.
pub fn resolve_drop_target(
    zones: &[DropZone],
    point: Point,
    session: &DragSession,
) -> Option<DropTarget> {
    let priorities: &[fn(&DropTarget, &DragSession) -> bool] = &[
        |kind, session| {
            matches!(kind, DropTarget::MainStack)
                && matches!(
                    session,
                    DragSession::Paper {
                        source: PaperSource::Folder { .. },
                        ..
                    }
                )
        },
        |kind, _| matches!(kind, DropTarget::TrashBin(_)),
        |kind, _| matches!(kind, DropTarget::ArchiveBin),
        |kind, session| match (kind, session) {
            (DropTarget::PaperRow { paper_id, .. }, DragSession::Paper { paper, .. }) => {
                *paper_id != paper.id
            }
            _ => false,
        },
        |kind, _| matches!(kind, DropTarget::FolderBody { .. }),
        |kind, session| {
            matches!(kind, DropTarget::SidebarRoot(_))
                && matches!(session, DragSession::Folder { .. })
        },
    ];

    for accepts in priorities {
        for zone in zones {
            if accepts(&zone.kind, session) && zone.rect.contains(point) {
                return Some(zone.kind);
            }
        }
    }
    None
}

/// Applies one container transition, returning the new snapshot.
///
/// Returns `None` when the transition degrades to a no-op: source or target
/// vanished, target invalid for the dragged item, or the drop lands on the
/// identical source position.
pub fn apply_drop(
    project: &Project,
    session: &DragSession,
    target: DropTarget,
    now_ms: i64,
) -> Option<Project> {
    match session {
        DragSession::Paper { paper, source, .. } => {
            apply_paper_drop(project, paper.id, *source, target, now_ms)
        }
        DragSession::Folder {
            folder,
            source_desk,
            ..
        } => apply_folder_drop(project, folder.id, *source_desk, target, now_ms),
    }
}

fn apply_paper_drop(
    project: &Project,
    paper_id: PaperId,
    source: PaperSource,
    target: DropTarget,
    now_ms: i64,
) -> Option<Project> {
    let mut next = project.clone();

    match target {
        DropTarget::PaperRow {
            desk,
            folder_id,
            paper_id: before_paper,
        } => {
            // Target folder must exist before the source loses the paper.
            next.desk(desk).folder(folder_id)?;
            let paper = take_paper(&mut next, source, paper_id)?;
            let folder = next.desk_mut(desk).folder_mut(folder_id)?;
            let index = folder
                .papers
                .iter()
                .position(|candidate| candidate.id == before_paper)
                .unwrap_or(folder.papers.len());
            folder.papers.insert(index, paper);
        }
        DropTarget::MainStack => {
            // Only reachable from a sidebar folder; a stack-sourced paper
            // dropped back on the stack surface is the identical position.
            if source == PaperSource::Stack {
                return None;
            }
            let paper = take_paper(&mut next, source, paper_id)?;
            next.main_stack.push(paper);
        }
        DropTarget::FolderBody { desk, folder_id } => {
            next.desk(desk).folder(folder_id)?;
            let paper = take_paper(&mut next, source, paper_id)?;
            let folder = next.desk_mut(desk).folder_mut(folder_id)?;
            folder.papers.push(paper);
        }
        DropTarget::TrashBin(desk) => {
            let paper = take_paper(&mut next, source, paper_id)?;
            next.desk_mut(desk)
                .trash
                .push(Tombstone::deleted(TombstoneItem::Paper(paper), now_ms));
        }
        DropTarget::ArchiveBin => {
            let paper = take_paper(&mut next, source, paper_id)?;
            next.left_desk
                .archive
                .push(Tombstone::archived(TombstoneItem::Paper(paper), now_ms));
        }
        DropTarget::SidebarRoot(_) => return None,
    }

    Some(next)
}

fn apply_folder_drop(
    project: &Project,
    folder_id: FolderId,
    source_desk: DeskSide,
    target: DropTarget,
    now_ms: i64,
) -> Option<Project> {
    let mut next = project.clone();

    match target {
        DropTarget::TrashBin(desk) => {
            let folder = take_folder(&mut next, source_desk, folder_id)?;
            next.desk_mut(desk)
                .trash
                .push(Tombstone::deleted(TombstoneItem::Folder(folder), now_ms));
        }
        DropTarget::ArchiveBin => {
            let folder = take_folder(&mut next, source_desk, folder_id)?;
            next.left_desk
                .archive
                .push(Tombstone::archived(TombstoneItem::Folder(folder), now_ms));
        }
        DropTarget::FolderBody {
            desk,
            folder_id: before_folder,
        } => {
            if before_folder == folder_id {
                return None;
            }
            let folder = take_folder(&mut next, source_desk, folder_id)?;
            let folders = &mut next.desk_mut(desk).folders;
            let index = folders
                .iter()
                .position(|candidate| candidate.id == before_folder)
                .unwrap_or(folders.len());
            folders.insert(index, folder);
        }
        DropTarget::SidebarRoot(desk) => {
            if desk == source_desk
                && next
                    .desk(desk)
                    .folders
                    .last()
                    .is_some_and(|last| last.id == folder_id)
            {
                return None;
            }
            let folder = take_folder(&mut next, source_desk, folder_id)?;
            next.desk_mut(desk).folders.push(folder);
        }
        DropTarget::MainStack | DropTarget::PaperRow { .. } => return None,
    }

    Some(next)
}

/// Removes the dragged paper from its source container.
fn take_paper(project: &mut Project, source: PaperSource, paper_id: PaperId) -> Option<Paper> {
    match source {
        PaperSource::Stack => {
            let index = project
                .main_stack
                .iter()
                .position(|paper| paper.id == paper_id)?;
            Some(project.main_stack.remove(index))
        }
        PaperSource::Folder { desk, folder_id } => {
            let folder = project.desk_mut(desk).folder_mut(folder_id)?;
            let index = folder
                .papers
                .iter()
                .position(|paper| paper.id == paper_id)?;
            Some(folder.papers.remove(index))
        }
    }
}

/// Removes the dragged folder, with its full paper list, from its desk.
fn take_folder(project: &mut Project, desk: DeskSide, folder_id: FolderId) -> Option<Folder> {
    let folders = &mut project.desk_mut(desk).folders;
    let index = folders.iter().position(|folder| folder.id == folder_id)?;
    Some(folders.remove(index))
}

/// Returns the stack paper that should render during a drag.
///
/// While the visible top-of-stack card is being dragged, the paper
/// underneath it shows through so the desk never looks empty mid-drag;
/// with a single-paper stack nothing shows.
pub fn visible_stack_paper<'a>(project: &'a Project, state: &DragState) -> Option<&'a Paper> {
    let dragging_top = matches!(
        state.session(),
        Some(DragSession::Paper {
            paper,
            source: PaperSource::Stack,
            ..
        }) if project.active_paper().is_some_and(|top| top.id == paper.id)
    );

    if dragging_top {
        let len = project.main_stack.len();
        if len < 2 {
            return None;
        }
        return project.main_stack.get(len - 2);
    }
    project.active_paper()
}
