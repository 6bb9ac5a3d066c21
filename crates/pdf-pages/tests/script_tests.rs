mod common;

use common::*;
use pdf_pages::*;
use std::path::PathBuf;

#[tokio::test]
async fn test_script_runs_against_workspace() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(dir.path(), "scan.pdf", create_test_pdf(3));
    std::fs::create_dir(dir.path().join("out")).unwrap();

    let script_path = dir.path().join("edit.json");
    std::fs::write(
        &script_path,
        r#"{
            "imports": ["scan.pdf"],
            "steps": [
                { "op": "toggle", "page": 2 },
                { "op": "delete_selected" },
                { "op": "rotate", "page": 1, "degrees": 90 },
                { "op": "drag_start", "page": 2 },
                { "op": "drag_over", "target": 1 },
                { "op": "drag_end", "target": 1 },
                { "op": "restore", "page": 1 },
                { "op": "export", "dir": "out", "options": { "filename": "result.pdf" } }
            ]
        }"#,
    )
    .unwrap();

    let script = EditScript::load(&script_path).await.unwrap();
    let mut workspace = PageWorkspace::new();
    let outcomes = script.run(&mut workspace).await;

    assert_eq!(outcomes[0], StepOutcome::Updated);
    assert_eq!(
        outcomes[4],
        StepOutcome::Indicator(Some(DropIndicator {
            target: PageId::from("scan.pdf#0-0"),
            position: DropPosition::Before,
        }))
    );

    let numbers: Vec<_> = workspace.pages().iter().map(|p| p.number).collect();
    assert_eq!(numbers, [3, 1, 2]);
    assert_eq!(workspace.pages()[1].rotation, 90);

    match outcomes.last().unwrap() {
        StepOutcome::Exported { path, page_count } => {
            assert_eq!(path, &dir.path().join("out").join("result.pdf"));
            assert_eq!(*page_count, 3);
            let contents = page_contents(&std::fs::read(path).unwrap());
            assert!(contents[0].contains(&page_marker(3)));
        }
        other => panic!("expected export, got {other:?}"),
    }
}

#[tokio::test]
async fn test_steps_on_missing_pages_change_nothing() {
    let mut workspace = PageWorkspace::new();
    workspace
        .import_bytes("doc.pdf", pdf_bytes(create_test_pdf(2)))
        .await;
    let history_len = workspace.history().len();

    let steps = [
        EditStep::Toggle {
            page: PageRef::Position(5),
        },
        EditStep::Rotate {
            page: PageRef::Id(PageId::from("gone")),
            degrees: 90,
        },
        EditStep::Restore {
            page: PageRef::Position(1),
        },
        EditStep::Move {
            from: PageRef::Position(1),
            to: PageRef::Position(9),
        },
    ];
    for step in steps {
        assert_eq!(workspace.apply(step).await.unwrap(), StepOutcome::Unchanged);
    }
    assert_eq!(workspace.history().len(), history_len);
}

#[tokio::test]
async fn test_failed_step_does_not_stop_script() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(dir.path(), "scan.pdf", create_test_pdf(2));

    let mut workspace = PageWorkspace::new();
    let broken = Page::new(
        PageId::from("broken"),
        1,
        b"not a pdf".to_vec(),
        0,
        workspace.thumbnails(),
    );
    workspace.add(vec![broken]);

    let mut script = EditScript {
        imports: vec![PathBuf::from("scan.pdf")],
        steps: vec![
            EditStep::Rotate {
                page: PageRef::Id(PageId::from("broken")),
                degrees: 90,
            },
            EditStep::Toggle {
                page: PageRef::Id(PageId::from("broken")),
            },
            EditStep::DeleteSelected,
            EditStep::Export {
                mode: SelectionMode::All,
                options: ExportOptions::default(),
                dir: PathBuf::new(),
            },
        ],
    };
    script.rebase(dir.path());

    let outcomes = script.run(&mut workspace).await;

    assert!(matches!(&outcomes[0], StepOutcome::Failed(_)));
    assert_eq!(workspace.trash()[0].id.as_str(), "broken");
    assert_eq!(workspace.trash()[0].rotation, 0);
    match &outcomes[3] {
        StepOutcome::Exported { page_count, .. } => assert_eq!(*page_count, 2),
        other => panic!("expected export, got {other:?}"),
    }
    assert!(workspace
        .notices()
        .entries()
        .iter()
        .any(|notice| notice.message.starts_with("Rotation failed")));
}
