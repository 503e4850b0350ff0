use paperdesk_core::{
    apply_drop, resolve_drop_target, visible_stack_paper, DeskSide, DragSession, DragState,
    DropTarget, DropZone, Folder, Paper, PaperSource, Point, Project, Rect, SessionEnd,
    TombstoneItem,
};

fn blank_project() -> Project {
    let mut project = Project::create_default("Move Lab");
    project.main_stack.clear();
    project.left_desk.folders.clear();
    project.right_desk.folders.clear();
    project.inactive_folder_ids.clear();
    project
}

fn folder_with(papers: Vec<Paper>) -> Folder {
    let mut folder = Folder::new("Bucket");
    folder.papers = papers;
    folder
}

fn zone(kind: DropTarget) -> DropZone {
    DropZone {
        rect: Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        },
        kind,
    }
}

const INSIDE: Point = Point { x: 50.0, y: 50.0 };

#[test]
fn paper_from_folder_to_stack_moves_to_top() {
    let mut project = blank_project();
    let paper = Paper::new("P", "body");
    let paper_id = paper.id;
    let folder = folder_with(vec![paper.clone(), Paper::new("Q", "other")]);
    let folder_id = folder.id;
    project.left_desk.folders.push(folder);
    project.main_stack.push(Paper::new("Existing", ""));

    let session = DragSession::Paper {
        paper,
        source: PaperSource::Folder {
            desk: DeskSide::Left,
            folder_id,
        },
        target: None,
    };
    let next = apply_drop(&project, &session, DropTarget::MainStack, 1).unwrap();

    assert_eq!(next.left_desk.folders[0].papers.len(), 1);
    assert_eq!(next.main_stack.len(), 2);
    assert_eq!(next.active_paper().unwrap().id, paper_id);
    next.verify_integrity().unwrap();
    // Everything else untouched.
    assert_eq!(next.right_desk, project.right_desk);
    assert_eq!(next.left_desk.trash, project.left_desk.trash);
}

#[test]
fn paper_from_stack_appends_to_folder_body() {
    let mut project = blank_project();
    let paper = Paper::new("Stacked", "body");
    let paper_id = paper.id;
    project.main_stack.push(paper.clone());
    let folder = folder_with(vec![Paper::new("A", "a")]);
    let folder_id = folder.id;
    project.right_desk.folders.push(folder);

    let session = DragSession::Paper {
        paper,
        source: PaperSource::Stack,
        target: None,
    };
    let next = apply_drop(
        &project,
        &session,
        DropTarget::FolderBody {
            desk: DeskSide::Right,
            folder_id,
        },
        1,
    )
    .unwrap();

    assert!(next.main_stack.is_empty());
    let papers = &next.right_desk.folders[0].papers;
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[1].id, paper_id);
    next.verify_integrity().unwrap();
}

#[test]
fn paper_drop_on_row_inserts_at_that_index() {
    let mut project = blank_project();
    let dragged = Paper::new("Dragged", "x");
    let first = Paper::new("First", "1");
    let second = Paper::new("Second", "2");
    let folder = folder_with(vec![first, second.clone()]);
    let folder_id = folder.id;
    project.left_desk.folders.push(folder);
    project.main_stack.push(dragged.clone());

    let session = DragSession::Paper {
        paper: dragged.clone(),
        source: PaperSource::Stack,
        target: None,
    };
    let next = apply_drop(
        &project,
        &session,
        DropTarget::PaperRow {
            desk: DeskSide::Left,
            folder_id,
            paper_id: second.id,
        },
        1,
    )
    .unwrap();

    let papers = &next.left_desk.folders[0].papers;
    assert_eq!(papers.len(), 3);
    // Insertion before the target row, not a swap.
    assert_eq!(papers[1].id, dragged.id);
    assert_eq!(papers[2].id, second.id);
    next.verify_integrity().unwrap();
}

#[test]
fn paper_to_trash_tombstones_on_that_desk() {
    let mut project = blank_project();
    let paper = Paper::new("Doomed", "body");
    let paper_id = paper.id;
    project.main_stack.push(paper.clone());

    let session = DragSession::Paper {
        paper,
        source: PaperSource::Stack,
        target: None,
    };
    let next = apply_drop(&project, &session, DropTarget::TrashBin(DeskSide::Right), 77).unwrap();

    assert!(next.main_stack.is_empty());
    assert_eq!(next.right_desk.trash.len(), 1);
    let tombstone = &next.right_desk.trash[0];
    assert_eq!(tombstone.id(), paper_id);
    assert_eq!(tombstone.deleted_at, Some(77));
    assert!(matches!(tombstone.item, TombstoneItem::Paper(_)));
    next.verify_integrity().unwrap();
}

#[test]
fn archive_always_lands_on_left_desk() {
    let mut project = blank_project();
    let paper = Paper::new("Keep", "body");
    let folder = folder_with(vec![paper.clone()]);
    let folder_id = folder.id;
    project.right_desk.folders.push(folder);

    let session = DragSession::Paper {
        paper,
        source: PaperSource::Folder {
            desk: DeskSide::Right,
            folder_id,
        },
        target: None,
    };
    let next = apply_drop(&project, &session, DropTarget::ArchiveBin, 5).unwrap();

    assert_eq!(next.left_desk.archive.len(), 1);
    assert_eq!(next.left_desk.archive[0].archived_at, Some(5));
    assert!(next.right_desk.archive.is_empty());
    next.verify_integrity().unwrap();
}

#[test]
fn folder_repositions_across_desks_with_its_papers() {
    let mut project = blank_project();
    let moved = folder_with(vec![Paper::new("Inside", "i")]);
    let moved_id = moved.id;
    let anchor = Folder::new("Anchor");
    let anchor_id = anchor.id;
    project.left_desk.folders.push(moved.clone());
    project.right_desk.folders.push(anchor);

    let session = DragSession::Folder {
        folder: moved,
        source_desk: DeskSide::Left,
        target: None,
    };
    let next = apply_drop(
        &project,
        &session,
        DropTarget::FolderBody {
            desk: DeskSide::Right,
            folder_id: anchor_id,
        },
        1,
    )
    .unwrap();

    assert!(next.left_desk.folders.is_empty());
    assert_eq!(next.right_desk.folders.len(), 2);
    assert_eq!(next.right_desk.folders[0].id, moved_id);
    assert_eq!(next.right_desk.folders[1].id, anchor_id);
    assert_eq!(next.right_desk.folders[0].papers.len(), 1);
    next.verify_integrity().unwrap();
}

#[test]
fn folder_appends_to_other_desk_root() {
    let mut project = blank_project();
    let moved = Folder::new("Mover");
    let moved_id = moved.id;
    project.left_desk.folders.push(moved.clone());
    project.right_desk.folders.push(Folder::new("Stay"));

    let session = DragSession::Folder {
        folder: moved,
        source_desk: DeskSide::Left,
        target: None,
    };
    let next = apply_drop(&project, &session, DropTarget::SidebarRoot(DeskSide::Right), 1).unwrap();

    assert!(next.left_desk.folders.is_empty());
    assert_eq!(next.right_desk.folders.last().unwrap().id, moved_id);
    next.verify_integrity().unwrap();
}

#[test]
fn folder_trash_and_archive_keep_papers_inside() {
    let mut project = blank_project();
    let folder = folder_with(vec![Paper::new("Inside", "i")]);
    project.left_desk.folders.push(folder.clone());

    let session = DragSession::Folder {
        folder,
        source_desk: DeskSide::Left,
        target: None,
    };
    let next = apply_drop(&project, &session, DropTarget::TrashBin(DeskSide::Left), 9).unwrap();

    assert!(next.left_desk.folders.is_empty());
    let tombstone = &next.left_desk.trash[0];
    match &tombstone.item {
        TombstoneItem::Folder(folder) => assert_eq!(folder.papers.len(), 1),
        TombstoneItem::Paper(_) => panic!("expected folder tombstone"),
    }
    next.verify_integrity().unwrap();
}

#[test]
fn release_without_target_cancels_without_mutation() {
    let mut project = blank_project();
    let paper = Paper::new("P", "x");
    project.main_stack.push(paper.clone());

    let mut state = DragState::default();
    state.begin_paper(paper, PaperSource::Stack);
    state.pointer_moved(&[], INSIDE);

    let end = state.pointer_released(&project, 1);
    assert_eq!(end, SessionEnd::Cancelled);
    assert_eq!(state, DragState::Idle);
}

#[test]
fn vanished_source_degrades_to_noop() {
    let project = blank_project();
    // Paper claims to come from the stack but is not there anymore.
    let session = DragSession::Paper {
        paper: Paper::new("Ghost", ""),
        source: PaperSource::Stack,
        target: None,
    };
    assert!(apply_drop(&project, &session, DropTarget::TrashBin(DeskSide::Left), 1).is_none());
}

#[test]
fn identical_position_drops_are_noops() {
    let mut project = blank_project();
    let folder = Folder::new("Solo");
    let folder_id = folder.id;
    project.left_desk.folders.push(folder.clone());

    let session = DragSession::Folder {
        folder: folder.clone(),
        source_desk: DeskSide::Left,
        target: None,
    };
    // Folder dropped on its own body.
    assert!(apply_drop(
        &project,
        &session,
        DropTarget::FolderBody {
            desk: DeskSide::Left,
            folder_id,
        },
        1,
    )
    .is_none());
    // Folder dropped on its own desk root while already last.
    assert!(apply_drop(&project, &session, DropTarget::SidebarRoot(DeskSide::Left), 1).is_none());

    // Stack-sourced paper dropped back on the stack surface.
    let paper = Paper::new("Top", "t");
    project.main_stack.push(paper.clone());
    let session = DragSession::Paper {
        paper,
        source: PaperSource::Stack,
        target: None,
    };
    assert!(apply_drop(&project, &session, DropTarget::MainStack, 1).is_none());
}

#[test]
fn hit_test_priority_resolves_overlapping_zones() {
    let folder = Folder::new("F");
    let in_folder = Paper::new("Row", "r");
    let dragged = Paper::new("Dragged", "d");

    let paper_session = DragSession::Paper {
        paper: dragged.clone(),
        source: PaperSource::Folder {
            desk: DeskSide::Left,
            folder_id: folder.id,
        },
        target: None,
    };

    // Paper row beats the folder body it sits on; folder body beats the
    // sidebar root.
    let zones = [
        zone(DropTarget::SidebarRoot(DeskSide::Left)),
        zone(DropTarget::FolderBody {
            desk: DeskSide::Left,
            folder_id: folder.id,
        }),
        zone(DropTarget::PaperRow {
            desk: DeskSide::Left,
            folder_id: folder.id,
            paper_id: in_folder.id,
        }),
    ];
    assert!(matches!(
        resolve_drop_target(&zones, INSIDE, &paper_session),
        Some(DropTarget::PaperRow { .. })
    ));

    // The dragged paper's own row never matches.
    let own_row = [zone(DropTarget::PaperRow {
        desk: DeskSide::Left,
        folder_id: folder.id,
        paper_id: dragged.id,
    })];
    assert_eq!(resolve_drop_target(&own_row, INSIDE, &paper_session), None);

    // The main-stack surface only accepts papers dragged from a folder.
    let stack_session = DragSession::Paper {
        paper: dragged.clone(),
        source: PaperSource::Stack,
        target: None,
    };
    let main = [zone(DropTarget::MainStack)];
    assert_eq!(resolve_drop_target(&main, INSIDE, &stack_session), None);
    assert_eq!(
        resolve_drop_target(&main, INSIDE, &paper_session),
        Some(DropTarget::MainStack)
    );

    // Sidebar roots only accept folder drags.
    let root = [zone(DropTarget::SidebarRoot(DeskSide::Right))];
    assert_eq!(resolve_drop_target(&root, INSIDE, &paper_session), None);
    let folder_session = DragSession::Folder {
        folder,
        source_desk: DeskSide::Left,
        target: None,
    };
    assert_eq!(
        resolve_drop_target(&root, INSIDE, &folder_session),
        Some(DropTarget::SidebarRoot(DeskSide::Right))
    );
}

#[test]
fn dragging_top_of_stack_reveals_paper_underneath() {
    let mut project = blank_project();
    let under = Paper::new("Under", "u");
    let top = Paper::new("Top", "t");
    project.main_stack.push(under.clone());
    project.main_stack.push(top.clone());

    let mut state = DragState::default();
    state.begin_paper(top.clone(), PaperSource::Stack);
    assert_eq!(visible_stack_paper(&project, &state).unwrap().id, under.id);

    // Single-paper stack shows nothing mid-drag.
    let mut single = blank_project();
    single.main_stack.push(top.clone());
    assert!(visible_stack_paper(&single, &state).is_none());

    // Idle shows the top paper.
    assert_eq!(
        visible_stack_paper(&project, &DragState::Idle).unwrap().id,
        top.id
    );
}

#[test]
fn full_session_through_state_machine_applies_exactly_one_transition() {
    let mut project = blank_project();
    let paper = Paper::new("Carried", "c");
    let folder = folder_with(vec![paper.clone()]);
    let folder_id = folder.id;
    project.left_desk.folders.push(folder);

    let mut state = DragState::default();
    state.begin_paper(
        paper,
        PaperSource::Folder {
            desk: DeskSide::Left,
            folder_id,
        },
    );
    state.pointer_moved(&[zone(DropTarget::MainStack)], INSIDE);

    match state.pointer_released(&project, 1) {
        SessionEnd::Dropped(next) => {
            assert_eq!(next.main_stack.len(), 1);
            assert!(next.left_desk.folders[0].papers.is_empty());
            next.verify_integrity().unwrap();
        }
        other => panic!("expected drop, got {other:?}"),
    }
    assert_eq!(state, DragState::Idle);
}
