//! Edit scripts
//!
//! A script is a list of files to import followed by a sequence of edit
//! steps, each of which maps onto one workspace operation. Scripts are
//! what the command line drives the workspace with.

use crate::geometry::{PageSize, Rect};
use crate::options::{ExportOptions, SelectionMode};
use crate::page::{Page, PageId};
use crate::pdf::Annotation;
use crate::reorder::DropIndicator;
use crate::types::*;
use crate::workspace::PageWorkspace;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A page named by 1-based position or by id
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum PageRef {
    Position(usize),
    Id(PageId),
}

impl PageRef {
    fn resolve(&self, pages: &[Page]) -> Option<PageId> {
        let page = match self {
            PageRef::Position(position) => position.checked_sub(1).and_then(|i| pages.get(i)),
            PageRef::Id(id) => pages.iter().find(|page| &page.id == id),
        };
        page.map(|page| page.id.clone())
    }
}

/// One workspace operation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "op", rename_all = "snake_case")
)]
pub enum EditStep {
    Import {
        paths: Vec<PathBuf>,
    },
    Select {
        pages: Vec<PageRef>,
    },
    Toggle {
        page: PageRef,
    },
    SelectAll,
    ClearSelection,
    /// Array-move between two positions of the active collection
    Move {
        from: PageRef,
        to: PageRef,
    },
    DragStart {
        page: PageRef,
    },
    DragOver {
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<PageRef>,
    },
    DragEnd {
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<PageRef>,
    },
    DragCancel,
    DeleteSelected,
    /// `page` refers to the trash
    Restore {
        page: PageRef,
    },
    /// `page` refers to the trash
    Purge {
        page: PageRef,
    },
    EmptyTrash,
    Rotate {
        page: PageRef,
        degrees: i32,
    },
    Resize {
        page: PageRef,
        width: f32,
        height: f32,
    },
    ResizeAll {
        #[cfg_attr(feature = "serde", serde(default))]
        mode: SelectionMode,
    },
    Crop {
        page: PageRef,
        rect: Rect,
    },
    Annotate {
        page: PageRef,
        annotations: Vec<Annotation>,
    },
    Undo,
    Redo,
    Export {
        #[cfg_attr(feature = "serde", serde(default))]
        mode: SelectionMode,
        #[cfg_attr(feature = "serde", serde(default))]
        options: ExportOptions,
        #[cfg_attr(feature = "serde", serde(default))]
        dir: PathBuf,
    },
}

/// What a step did
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Updated,
    Unchanged,
    Indicator(Option<DropIndicator>),
    Exported { path: PathBuf, page_count: usize },
    /// The step failed and changed nothing
    Failed(String),
}

impl StepOutcome {
    fn changed(changed: bool) -> Self {
        if changed {
            StepOutcome::Updated
        } else {
            StepOutcome::Unchanged
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EditScript {
    pub imports: Vec<PathBuf>,
    pub steps: Vec<EditStep>,
}

impl EditScript {
    /// Load a script from JSON. Relative paths are taken relative to the
    /// script's directory.
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mut script: EditScript = serde_json::from_slice(&bytes)
            .map_err(|e| PagesError::Config(format!("Failed to parse edit script: {}", e)))?;

        if let Some(base) = path.parent() {
            script.rebase(base);
        }
        Ok(script)
    }

    /// Resolve relative import paths and export directories against `base`.
    pub fn rebase(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        self.imports.iter_mut().for_each(rebase);
        for step in &mut self.steps {
            match step {
                EditStep::Import { paths } => paths.iter_mut().for_each(rebase),
                EditStep::Export { dir, .. } => rebase(dir),
                _ => {}
            }
        }
    }

    /// Import, then apply every step in order. A failed step is recorded
    /// as [`StepOutcome::Failed`] and the remaining steps still run.
    pub async fn run(&self, workspace: &mut PageWorkspace) -> Vec<StepOutcome> {
        if !self.imports.is_empty() {
            workspace.import_files(&self.imports[..]).await;
        }

        let mut outcomes = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let outcome = match workspace.apply(step.clone()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("Step {} failed: {}", index + 1, e);
                    StepOutcome::Failed(e.to_string())
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl PageWorkspace {
    fn resolve_active(&self, page: &PageRef) -> Option<PageId> {
        page.resolve(self.pages())
    }

    fn resolve_trashed(&self, page: &PageRef) -> Option<PageId> {
        page.resolve(self.trash())
    }

    fn position_of(&self, page: &PageRef) -> Option<usize> {
        let id = self.resolve_active(page)?;
        self.pages().iter().position(|page| page.id == id)
    }

    /// Apply one edit step.
    ///
    /// Steps naming pages that do not exist change nothing. Transform and
    /// export failures are returned after being recorded as notices.
    pub async fn apply(&mut self, step: EditStep) -> Result<StepOutcome> {
        let outcome = match step {
            EditStep::Import { paths } => StepOutcome::changed(self.import_files(&paths[..]).await > 0),
            EditStep::Select { pages } => {
                let mut changed = false;
                for page in &pages {
                    if let Some(id) = self.resolve_active(page) {
                        changed |= self.select(&id);
                    }
                }
                StepOutcome::changed(changed)
            }
            EditStep::Toggle { page } => match self.resolve_active(&page) {
                Some(id) => {
                    self.toggle_select(&id);
                    StepOutcome::Updated
                }
                None => StepOutcome::Unchanged,
            },
            EditStep::SelectAll => {
                self.select_all();
                StepOutcome::Updated
            }
            EditStep::ClearSelection => {
                self.clear_selection();
                StepOutcome::Updated
            }
            EditStep::Move { from, to } => match (self.position_of(&from), self.position_of(&to)) {
                (Some(old_index), Some(new_index)) => {
                    StepOutcome::changed(self.reorder(old_index, new_index))
                }
                _ => StepOutcome::Unchanged,
            },
            EditStep::DragStart { page } => {
                let id = self.resolve_active(&page);
                StepOutcome::changed(id.is_some_and(|id| self.drag_start(&id)))
            }
            EditStep::DragOver { target } => {
                let target = target.and_then(|target| self.resolve_active(&target));
                StepOutcome::Indicator(self.drag_over(target.as_ref()))
            }
            EditStep::DragEnd { target } => {
                let target = target.and_then(|target| self.resolve_active(&target));
                StepOutcome::changed(self.drag_end(target.as_ref()))
            }
            EditStep::DragCancel => {
                self.drag_cancel();
                StepOutcome::Unchanged
            }
            EditStep::DeleteSelected => StepOutcome::changed(self.delete_selected() > 0),
            EditStep::Restore { page } => {
                let id = self.resolve_trashed(&page);
                StepOutcome::changed(id.is_some_and(|id| self.restore(&id)))
            }
            EditStep::Purge { page } => {
                let id = self.resolve_trashed(&page);
                StepOutcome::changed(id.is_some_and(|id| self.purge(&id)))
            }
            EditStep::EmptyTrash => StepOutcome::changed(self.empty_trash() > 0),
            EditStep::Rotate { page, degrees } => match self.resolve_active(&page) {
                Some(id) => StepOutcome::changed(self.rotate(&id, degrees).await?),
                None => StepOutcome::Unchanged,
            },
            EditStep::Resize {
                page,
                width,
                height,
            } => match self.resolve_active(&page) {
                Some(id) => {
                    let reference = PageSize::new(width, height);
                    StepOutcome::changed(self.resize(&id, reference).await?)
                }
                None => StepOutcome::Unchanged,
            },
            EditStep::ResizeAll { mode } => StepOutcome::changed(self.resize_all(mode).await?),
            EditStep::Crop { page, rect } => match self.resolve_active(&page) {
                Some(id) => StepOutcome::changed(self.crop(&id, rect).await?),
                None => StepOutcome::Unchanged,
            },
            EditStep::Annotate { page, annotations } => match self.resolve_active(&page) {
                Some(id) => StepOutcome::changed(self.annotate(&id, &annotations).await?),
                None => StepOutcome::Unchanged,
            },
            EditStep::Undo => StepOutcome::changed(self.undo()),
            EditStep::Redo => StepOutcome::changed(self.redo()),
            EditStep::Export { mode, options, dir } => {
                let (path, page_count) = self.export_to(mode, &options, &dir).await?;
                StepOutcome::Exported { path, page_count }
            }
        };
        Ok(outcome)
    }
}
