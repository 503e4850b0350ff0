use paperdesk_core::service::desk_service::{
    add_paper, create_folder, delete_trash_item, empty_trash, focus_paper, rename_folder,
    rename_paper, restore_archive_item, restore_trash_item, save_active_paper,
    set_active_content, set_active_subject, toggle_folder_active, toggle_paper_context,
};
use paperdesk_core::{
    ContextFlag, DeskSide, Folder, Paper, Project, Tombstone, TombstoneItem,
};

fn empty_project() -> Project {
    let mut project = Project::create_default("Desk Lab");
    project.main_stack.clear();
    project.left_desk.folders.clear();
    project.right_desk.folders.clear();
    project.inactive_folder_ids.clear();
    project
}

#[test]
fn add_paper_puts_a_blank_untitled_paper_on_top() {
    let mut project = empty_project();
    let paper_id = add_paper(&mut project);

    let top = project.active_paper().unwrap();
    assert_eq!(top.id, paper_id);
    assert_eq!(top.subject, "Untitled");
    assert_eq!(top.content, "");
    assert_eq!(top.in_context, ContextFlag::Included);
    assert!(top.versions.is_empty());
    project.verify_integrity().unwrap();
}

#[test]
fn focus_paper_moves_a_buried_tab_to_the_top() {
    let mut project = empty_project();
    let a = Paper::new("A", "");
    let b = Paper::new("B", "");
    let c = Paper::new("C", "");
    let a_id = a.id;
    project.main_stack.extend([a, b, c]);

    assert!(focus_paper(&mut project, 0));
    assert_eq!(project.active_paper().unwrap().id, a_id);
    assert_eq!(project.main_stack.len(), 3);

    assert!(!focus_paper(&mut project, 99));
}

#[test]
fn folder_create_rename_and_paper_rename() {
    let mut project = empty_project();
    let folder_id = create_folder(&mut project, DeskSide::Right);
    assert_eq!(project.right_desk.folders[0].name, "New Folder");
    assert!(project.is_folder_active(folder_id));

    assert!(rename_folder(&mut project, DeskSide::Right, folder_id, "Research"));
    assert_eq!(project.right_desk.folders[0].name, "Research");

    let paper = Paper::new("Draft", "");
    let paper_id = paper.id;
    project.right_desk.folders[0].papers.push(paper);
    assert!(rename_paper(
        &mut project,
        DeskSide::Right,
        folder_id,
        paper_id,
        "Final"
    ));
    assert_eq!(project.right_desk.folders[0].papers[0].subject, "Final");

    // Wrong desk is a no-op.
    assert!(!rename_folder(&mut project, DeskSide::Left, folder_id, "X"));
}

#[test]
fn context_and_activation_toggles_flip_back_and_forth() {
    let mut project = empty_project();
    let folder_id = create_folder(&mut project, DeskSide::Left);
    let paper = Paper::new("P", "body");
    let paper_id = paper.id;
    project.left_desk.folders[0].papers.push(paper);

    assert!(toggle_paper_context(&mut project, DeskSide::Left, folder_id, paper_id));
    assert_eq!(
        project.left_desk.folders[0].papers[0].in_context,
        ContextFlag::Excluded
    );
    assert!(toggle_paper_context(&mut project, DeskSide::Left, folder_id, paper_id));
    assert_eq!(
        project.left_desk.folders[0].papers[0].in_context,
        ContextFlag::Included
    );

    toggle_folder_active(&mut project, folder_id);
    assert!(!project.is_folder_active(folder_id));
    toggle_folder_active(&mut project, folder_id);
    assert!(project.is_folder_active(folder_id));
}

#[test]
fn activation_state_survives_a_folder_that_no_longer_exists() {
    let mut project = empty_project();
    let ghost_id = uuid::Uuid::new_v4();
    toggle_folder_active(&mut project, ghost_id);
    assert!(!project.is_folder_active(ghost_id));
    // No folder with this id exists anywhere; integrity is unaffected.
    project.verify_integrity().unwrap();
}

#[test]
fn trash_restore_routes_folders_to_the_desk_and_papers_to_the_stack() {
    let mut project = empty_project();
    let folder = Folder::new("Trashed Folder");
    let folder_id = folder.id;
    let paper = Paper::new("Trashed Paper", "body");
    let paper_id = paper.id;
    project
        .left_desk
        .trash
        .push(Tombstone::deleted(TombstoneItem::Folder(folder), 1));
    project
        .left_desk
        .trash
        .push(Tombstone::deleted(TombstoneItem::Paper(paper), 2));

    assert!(restore_trash_item(&mut project, DeskSide::Left, folder_id));
    assert_eq!(project.left_desk.folders[0].id, folder_id);

    assert!(restore_trash_item(&mut project, DeskSide::Left, paper_id));
    assert_eq!(project.active_paper().unwrap().id, paper_id);

    assert!(project.left_desk.trash.is_empty());
    assert!(!restore_trash_item(&mut project, DeskSide::Left, paper_id));
    project.verify_integrity().unwrap();
}

#[test]
fn archive_restore_reads_from_the_left_desk() {
    let mut project = empty_project();
    let paper = Paper::new("Archived", "body");
    let paper_id = paper.id;
    project
        .left_desk
        .archive
        .push(Tombstone::archived(TombstoneItem::Paper(paper), 1));

    assert!(restore_archive_item(&mut project, paper_id));
    assert_eq!(project.active_paper().unwrap().id, paper_id);
    assert!(project.left_desk.archive.is_empty());
    assert!(!restore_archive_item(&mut project, paper_id));
    project.verify_integrity().unwrap();
}

#[test]
fn delete_and_empty_remove_trash_permanently() {
    let mut project = empty_project();
    let first = Paper::new("One", "");
    let first_id = first.id;
    project
        .right_desk
        .trash
        .push(Tombstone::deleted(TombstoneItem::Paper(first), 1));
    project
        .right_desk
        .trash
        .push(Tombstone::deleted(TombstoneItem::Paper(Paper::new("Two", "")), 2));

    assert!(delete_trash_item(&mut project, DeskSide::Right, first_id));
    assert_eq!(project.right_desk.trash.len(), 1);
    assert!(!delete_trash_item(&mut project, DeskSide::Right, first_id));

    empty_trash(&mut project, DeskSide::Right);
    assert!(project.right_desk.trash.is_empty());
}

#[test]
fn save_snapshots_the_top_paper_and_numbers_densely() {
    let mut project = empty_project();
    assert_eq!(save_active_paper(&mut project, 1), None);

    project.main_stack.push(Paper::new("Essay", "draft one"));
    assert_eq!(save_active_paper(&mut project, 10), Some(1));
    set_active_content(&mut project, "draft two");
    assert_eq!(save_active_paper(&mut project, 20), Some(2));

    let paper = project.active_paper().unwrap();
    assert_eq!(paper.versions[0].content, "draft one");
    assert_eq!(paper.versions[1].content, "draft two");
    project.verify_integrity().unwrap();
}

#[test]
fn active_paper_edits_hit_the_top_of_the_stack_only() {
    let mut project = empty_project();
    assert!(!set_active_subject(&mut project, "nothing to edit"));

    project.main_stack.push(Paper::new("Below", "below body"));
    project.main_stack.push(Paper::new("Top", "top body"));

    assert!(set_active_subject(&mut project, "Edited"));
    assert!(set_active_content(&mut project, "edited body"));

    assert_eq!(project.main_stack[1].subject, "Edited");
    assert_eq!(project.main_stack[1].content, "edited body");
    assert_eq!(project.main_stack[0].subject, "Below");
}
