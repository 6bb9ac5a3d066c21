mod common;

use common::*;
use pdf_pages::*;

async fn workspace_with_pages(num_pages: usize) -> PageWorkspace {
    let mut workspace = PageWorkspace::new();
    workspace
        .import_bytes("doc.pdf", pdf_bytes(create_test_pdf(num_pages)))
        .await;
    workspace
}

#[tokio::test]
async fn test_export_selection_contains_only_selected() {
    let mut workspace = workspace_with_pages(3).await;
    let second = workspace.pages()[1].id.clone();
    workspace.toggle_select(&second);

    let bytes = workspace
        .export(SelectionMode::Selection, &ExportOptions::default())
        .await
        .unwrap();

    let contents = page_contents(&bytes);
    assert_eq!(contents.len(), 1);
    assert!(contents[0].contains(&page_marker(2)));
}

#[tokio::test]
async fn test_linked_pages_stay_out_of_split_and_export() {
    let mut doc = create_test_pdf(3);
    add_page_link(&mut doc, 1, 3);

    let mut workspace = PageWorkspace::new();
    workspace.import_bytes("linked.pdf", pdf_bytes(doc)).await;
    let first = workspace.pages()[0].clone();
    assert!(!contains_bytes(&first.data, &page_marker(3)));
    assert!(!contains_bytes(&first.data, &page_marker(2)));

    workspace.toggle_select(&first.id);
    let bytes = workspace
        .export(SelectionMode::Selection, &ExportOptions::default())
        .await
        .unwrap();

    let contents = page_contents(&bytes);
    assert_eq!(contents.len(), 1);
    assert!(contents[0].contains(&page_marker(1)));
    assert!(!contains_bytes(&bytes, &page_marker(2)));
    assert!(!contains_bytes(&bytes, &page_marker(3)));
}

#[tokio::test]
async fn test_export_follows_collection_order() {
    let mut workspace = workspace_with_pages(3).await;
    workspace.reorder(2, 0);
    // Selection order does not matter
    let ids: Vec<PageId> = workspace.pages().iter().map(|p| p.id.clone()).collect();
    workspace.toggle_select(&ids[2]);
    workspace.toggle_select(&ids[0]);

    let bytes = workspace
        .export(SelectionMode::Selection, &ExportOptions::default())
        .await
        .unwrap();
    let contents = page_contents(&bytes);
    assert!(contents[0].contains(&page_marker(3)));
    assert!(contents[1].contains(&page_marker(2)));

    let bytes = workspace
        .export(SelectionMode::All, &ExportOptions::default())
        .await
        .unwrap();
    let contents = page_contents(&bytes);
    assert_eq!(contents.len(), 3);
    assert!(contents[0].contains(&page_marker(3)));
    assert!(contents[1].contains(&page_marker(1)));
    assert!(contents[2].contains(&page_marker(2)));
}

#[tokio::test]
async fn test_export_keeps_transformed_pages() {
    let mut workspace = workspace_with_pages(2).await;
    let id = workspace.pages()[0].id.clone();
    workspace.rotate(&id, 270).await.unwrap();

    let bytes = workspace
        .export(SelectionMode::All, &ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(page_rotate(&bytes), Some(270));
}

#[tokio::test]
async fn test_export_empty_selection_fails() {
    let mut workspace = workspace_with_pages(2).await;

    let result = workspace
        .export(SelectionMode::Selection, &ExportOptions::default())
        .await;
    assert!(matches!(result, Err(PagesError::NoPages)));
    assert!(workspace
        .notices()
        .latest_message()
        .is_some_and(|message| message.starts_with("Export failed")));
}

#[tokio::test]
async fn test_quality_tiers_produce_valid_documents() {
    let workspace = workspace_with_pages(3).await;

    for quality in [Quality::Low, Quality::Medium, Quality::High] {
        let options = ExportOptions {
            quality,
            ..Default::default()
        };
        let bytes = export_pages(workspace.pages(), &options).await.unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3, "quality {quality:?}");
    }
}

#[tokio::test]
async fn test_export_to_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut workspace = workspace_with_pages(2).await;

    let options = ExportOptions {
        filename: "out.pdf".to_string(),
        quality: Quality::Medium,
    };
    let (path, page_count) = workspace
        .export_to(SelectionMode::All, &options, dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("out.pdf"));
    assert_eq!(page_count, 2);
    let written = std::fs::read(&path).unwrap();
    assert_eq!(page_contents(&written).len(), 2);
}

#[tokio::test]
async fn test_blank_filename_falls_back_to_merged() {
    let dir = tempfile::tempdir().unwrap();
    let mut workspace = workspace_with_pages(1).await;

    let options = ExportOptions {
        filename: String::new(),
        ..Default::default()
    };
    let (path, _) = workspace
        .export_to(SelectionMode::All, &options, dir.path())
        .await
        .unwrap();
    assert_eq!(path.file_name().unwrap(), FALLBACK_EXPORT_FILENAME);
}

#[tokio::test]
async fn test_export_options_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");

    let options = ExportOptions {
        filename: "booklet.pdf".to_string(),
        quality: Quality::Low,
    };
    options.save(&path).await.unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"quality\": \"low\""));
    assert_eq!(ExportOptions::load(&path).await.unwrap(), options);
}

#[tokio::test]
async fn test_invalid_export_options_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, r#"{ "quality": "ultra" }"#).unwrap();

    assert!(matches!(
        ExportOptions::load(&path).await,
        Err(PagesError::Config(_))
    ));
}
