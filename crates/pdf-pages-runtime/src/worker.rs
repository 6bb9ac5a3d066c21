use crate::{PageCommand, PageSummary, PageUpdate};
use pdf_pages::PageWorkspace;
use tokio::sync::mpsc;

/// Process commands until the channel closes, then hand the workspace back.
pub async fn worker_task(
    mut workspace: PageWorkspace,
    mut command_rx: mpsc::UnboundedReceiver<PageCommand>,
    update_tx: mpsc::UnboundedSender<PageUpdate>,
) -> PageWorkspace {
    let mut pending = None;

    loop {
        let cmd = match pending.take() {
            Some(cmd) => cmd,
            None => match command_rx.recv().await {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let cmd = match cmd {
            PageCommand::DragOver { mut target } => {
                // Collapse queued hovers, keeping only the most recent
                while let Ok(next_cmd) = command_rx.try_recv() {
                    if let PageCommand::DragOver { target: newer } = next_cmd {
                        target = newer;
                    } else {
                        pending = Some(next_cmd);
                        break;
                    }
                }
                PageCommand::DragOver { target }
            }
            other => other,
        };

        let revision = workspace.revision();
        let update = process_command(cmd, &mut workspace).await;

        for notice in workspace.notices_mut().drain() {
            let _ = update_tx.send(PageUpdate::Notice(notice));
        }
        if let Some(update) = update {
            let _ = update_tx.send(update);
        }
        if workspace.revision() != revision {
            let _ = update_tx.send(pages_changed(&workspace));
        }
    }

    log::debug!("Command channel closed, worker stopping");
    workspace
}

fn pages_changed(workspace: &PageWorkspace) -> PageUpdate {
    let selection = workspace.selection();
    PageUpdate::PagesChanged {
        active: workspace
            .pages()
            .iter()
            .map(|page| PageSummary::new(page, selection.contains(&page.id)))
            .collect(),
        trash: workspace
            .trash()
            .iter()
            .map(|page| PageSummary::new(page, false))
            .collect(),
        can_undo: workspace.can_undo(),
        can_redo: workspace.can_redo(),
    }
}

/// Failures are already recorded as notices by the workspace, so they
/// only need logging here.
async fn process_command(cmd: PageCommand, workspace: &mut PageWorkspace) -> Option<PageUpdate> {
    match cmd {
        PageCommand::ImportFiles { paths } => {
            workspace.import_files(&paths[..]).await;
        }
        PageCommand::ImportBytes { name, bytes } => {
            workspace.import_bytes(&name, bytes).await;
        }
        PageCommand::ToggleSelect { id } => {
            workspace.toggle_select(&id);
        }
        PageCommand::SelectAll => workspace.select_all(),
        PageCommand::ClearSelection => workspace.clear_selection(),
        PageCommand::DragStart { id } => {
            workspace.drag_start(&id);
        }
        PageCommand::DragOver { target } => {
            let indicator = workspace.drag_over(target.as_ref());
            return Some(PageUpdate::DropIndicator { indicator });
        }
        PageCommand::DragEnd { target } => {
            workspace.drag_end(target.as_ref());
            return Some(PageUpdate::DropIndicator { indicator: None });
        }
        PageCommand::DragCancel => {
            workspace.drag_cancel();
            return Some(PageUpdate::DropIndicator { indicator: None });
        }
        PageCommand::Reorder {
            old_index,
            new_index,
        } => {
            workspace.reorder(old_index, new_index);
        }
        PageCommand::DeleteSelected => {
            workspace.delete_selected();
        }
        PageCommand::Restore { id } => {
            workspace.restore(&id);
        }
        PageCommand::Purge { id } => {
            workspace.purge(&id);
        }
        PageCommand::EmptyTrash => {
            workspace.empty_trash();
        }
        PageCommand::Rotate { id, degrees } => {
            if let Err(e) = workspace.rotate(&id, degrees).await {
                log::debug!("Rotate {} failed: {}", id, e);
            }
        }
        PageCommand::Resize { id, size } => {
            if let Err(e) = workspace.resize(&id, size).await {
                log::debug!("Resize {} failed: {}", id, e);
            }
        }
        PageCommand::ResizeAll { mode } => {
            if let Err(e) = workspace.resize_all(mode).await {
                log::debug!("Resize all failed: {}", e);
            }
        }
        PageCommand::Crop { id, rect } => {
            if let Err(e) = workspace.crop(&id, rect).await {
                log::debug!("Crop {} failed: {}", id, e);
            }
        }
        PageCommand::Annotate { id, annotations } => {
            if let Err(e) = workspace.annotate(&id, &annotations).await {
                log::debug!("Annotate {} failed: {}", id, e);
            }
        }
        PageCommand::Undo => {
            workspace.undo();
        }
        PageCommand::Redo => {
            workspace.redo();
        }
        PageCommand::Export { mode, options, dir } => {
            match workspace.export_to(mode, &options, &dir).await {
                Ok((path, page_count)) => {
                    return Some(PageUpdate::Exported { path, page_count });
                }
                Err(e) => log::debug!("Export failed: {}", e),
            }
        }
    }
    None
}
