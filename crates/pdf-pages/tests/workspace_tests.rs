mod common;

use common::*;
use pdf_pages::*;
use std::collections::BTreeSet;

fn numbers(pages: &[Page]) -> Vec<usize> {
    pages.iter().map(|page| page.number).collect()
}

fn all_ids(workspace: &PageWorkspace) -> BTreeSet<PageId> {
    let active: Vec<_> = workspace.pages().iter().map(|page| page.id.clone()).collect();
    let trashed: Vec<_> = workspace.trash().iter().map(|page| page.id.clone()).collect();
    let total = active.len() + trashed.len();
    let ids: BTreeSet<_> = active.into_iter().chain(trashed).collect();
    assert_eq!(ids.len(), total, "an id is present twice");
    ids
}

async fn workspace_with_pages(num_pages: usize) -> PageWorkspace {
    let mut workspace = PageWorkspace::new();
    let added = workspace
        .import_bytes("doc.pdf", pdf_bytes(create_test_pdf(num_pages)))
        .await;
    assert_eq!(added, num_pages);
    workspace
}

#[tokio::test]
async fn test_import_numbers_pages_in_order() {
    let workspace = workspace_with_pages(3).await;

    assert_eq!(numbers(workspace.pages()), [1, 2, 3]);
    assert_eq!(workspace.pages()[0].id.as_str(), "doc.pdf#0-0");
    assert_eq!(workspace.thumbnails().live(), 3);
    assert_eq!(workspace.notices().latest_message(), Some("Imported 3 pages from doc.pdf"));
}

#[tokio::test]
async fn test_trash_restore_undo_scenario() {
    let mut workspace = workspace_with_pages(3).await;
    let second = workspace.pages()[1].id.clone();

    workspace.toggle_select(&second);
    assert_eq!(workspace.delete_selected(), 1);
    assert_eq!(numbers(workspace.pages()), [1, 3]);
    assert_eq!(numbers(workspace.trash()), [2]);

    assert!(workspace.restore(&second));
    assert_eq!(numbers(workspace.pages()), [1, 3, 2]);
    assert!(workspace.trash().is_empty());

    assert!(workspace.undo());
    assert_eq!(numbers(workspace.pages()), [1, 3]);

    assert!(workspace.undo());
    assert_eq!(numbers(workspace.pages()), [1, 2, 3]);
    assert!(workspace.trash().is_empty());
    assert!(!workspace.can_undo());
}

#[tokio::test]
async fn test_redo_of_delete_puts_page_back_in_trash() {
    let mut workspace = workspace_with_pages(3).await;
    let initial = all_ids(&workspace);
    let second = workspace.pages()[1].id.clone();

    workspace.toggle_select(&second);
    workspace.delete_selected();
    assert!(workspace.undo());
    assert_eq!(numbers(workspace.pages()), [1, 2, 3]);
    assert!(workspace.trash().is_empty());

    assert!(workspace.redo());
    assert_eq!(numbers(workspace.pages()), [1, 3]);
    assert_eq!(numbers(workspace.trash()), [2]);
    assert_eq!(all_ids(&workspace), initial);

    assert!(workspace.restore(&second));
    assert_eq!(numbers(workspace.pages()), [1, 3, 2]);
}

#[tokio::test]
async fn test_undo_redo_restore_exact_states() {
    let mut workspace = workspace_with_pages(4).await;
    let before = workspace.pages().to_vec();

    assert!(workspace.reorder(3, 0));
    let after = workspace.pages().to_vec();
    assert_eq!(numbers(&after), [4, 1, 2, 3]);

    assert!(workspace.undo());
    assert_eq!(workspace.pages(), &before[..]);
    assert!(workspace.can_redo());

    assert!(workspace.redo());
    assert_eq!(workspace.pages(), &after[..]);
    assert!(!workspace.redo());
}

#[tokio::test]
async fn test_new_operation_discards_redo() {
    let mut workspace = workspace_with_pages(3).await;

    workspace.reorder(0, 2);
    workspace.reorder(0, 1);
    assert!(workspace.undo());
    assert!(workspace.can_redo());

    workspace.reorder(1, 2);
    assert!(!workspace.can_redo());
    assert!(!workspace.redo());
}

#[tokio::test]
async fn test_ids_are_conserved() {
    let mut workspace = workspace_with_pages(5).await;
    let initial = all_ids(&workspace);

    workspace.reorder(4, 1);
    workspace.select(&workspace.pages()[0].id.clone());
    workspace.select(&workspace.pages()[3].id.clone());
    workspace.delete_selected();
    assert_eq!(all_ids(&workspace), initial);

    let trashed = workspace.trash()[0].id.clone();
    workspace.restore(&trashed);
    workspace.reorder(0, 2);
    assert_eq!(all_ids(&workspace), initial);

    let purged = workspace.trash()[0].id.clone();
    assert!(workspace.purge(&purged));
    let mut expected = initial.clone();
    expected.remove(&purged);
    assert_eq!(all_ids(&workspace), expected);
}

#[tokio::test]
async fn test_restore_appends_to_end() {
    let mut workspace = workspace_with_pages(3).await;
    let first = workspace.pages()[0].id.clone();

    workspace.toggle_select(&first);
    workspace.delete_selected();
    workspace.restore(&first);

    assert_eq!(numbers(workspace.pages()), [2, 3, 1]);
}

#[tokio::test]
async fn test_restore_of_unknown_page_is_noop() {
    let mut workspace = workspace_with_pages(2).await;
    let history_len = workspace.history().len();

    assert!(!workspace.restore(&PageId::from("missing")));
    assert!(!workspace.purge(&PageId::from("missing")));
    assert_eq!(workspace.history().len(), history_len);
}

#[tokio::test]
async fn test_purge_releases_thumbnail() {
    let mut workspace = workspace_with_pages(3).await;
    let third = workspace.pages()[2].id.clone();

    workspace.toggle_select(&third);
    workspace.delete_selected();
    assert_eq!(workspace.thumbnails().live(), 3);

    assert!(workspace.purge(&third));
    assert_eq!(workspace.thumbnails().live(), 2);

    // Undo cannot bring a purged page back
    assert!(workspace.undo());
    assert_eq!(numbers(workspace.pages()), [1, 2]);
    assert!(workspace.trash().is_empty());
}

#[tokio::test]
async fn test_non_pdf_rejected_and_import_continues() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, b"not a pdf").unwrap();
    let first = write_pdf(dir.path(), "a.pdf", create_test_pdf(2));
    let second = write_pdf(dir.path(), "b.pdf", create_test_pdf(1));

    let mut workspace = PageWorkspace::new();
    let added = workspace.import_files(&[first, text, second]).await;

    assert_eq!(added, 3);
    let ids: Vec<_> = workspace.pages().iter().map(|p| p.id.as_str().to_string()).collect();
    assert_eq!(ids, ["a.pdf#0-0", "a.pdf#0-1", "b.pdf#2-0"]);

    let warnings: Vec<_> = workspace
        .notices()
        .entries()
        .iter()
        .filter(|notice| notice.level == log::Level::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("notes.txt"));
}

#[tokio::test]
async fn test_same_file_imported_twice_gets_distinct_ids() {
    let bytes = pdf_bytes(create_test_pdf(2));
    let mut workspace = PageWorkspace::new();

    assert_eq!(workspace.import_bytes("doc.pdf", bytes.clone()).await, 2);
    assert_eq!(workspace.import_bytes("doc.pdf", bytes).await, 2);
    assert_eq!(workspace.pages().len(), 4);
    assert_eq!(numbers(workspace.pages()), [1, 2, 1, 2]);
}

#[tokio::test]
async fn test_drag_gesture_reorders() {
    let mut workspace = workspace_with_pages(4).await;
    let ids: Vec<PageId> = workspace.pages().iter().map(|p| p.id.clone()).collect();

    assert!(workspace.drag_start(&ids[3]));
    let indicator = workspace.drag_over(Some(&ids[1])).unwrap();
    assert_eq!(indicator.target, ids[1]);
    assert_eq!(indicator.position, DropPosition::Before);

    assert!(workspace.drag_end(Some(&ids[1])));
    assert_eq!(numbers(workspace.pages()), [1, 4, 2, 3]);

    // Cancelled gestures change nothing
    let history_len = workspace.history().len();
    workspace.drag_start(&ids[0]);
    workspace.drag_over(Some(&ids[2]));
    workspace.drag_cancel();
    assert!(!workspace.drag_end(Some(&ids[2])));
    assert_eq!(workspace.history().len(), history_len);
}

#[tokio::test]
async fn test_dropping_on_itself_is_noop() {
    let mut workspace = workspace_with_pages(3).await;
    let id = workspace.pages()[1].id.clone();

    workspace.drag_start(&id);
    assert_eq!(workspace.drag_over(Some(&id)), None);
    assert!(!workspace.drag_end(Some(&id)));
    assert_eq!(numbers(workspace.pages()), [1, 2, 3]);
}
