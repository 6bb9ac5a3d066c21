//! Drag-and-drop reordering
//!
//! Gesture recognition belongs to whatever front end drives the workspace.
//! This controller only consumes its start/over/end/cancel events and
//! turns them into a drop indicator and, on drop, an index move.

use crate::page::{Page, PageId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the drop indicator renders relative to the hovered page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum DropPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DropIndicator {
    pub target: PageId,
    pub position: DropPosition,
}

/// Index permutation produced by a completed drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub old_index: usize,
    pub new_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: PageId,
        indicator: Option<DropIndicator>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ReorderController {
    state: DragState,
}

impl ReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active(&self) -> Option<&PageId> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    pub fn indicator(&self) -> Option<&DropIndicator> {
        match &self.state {
            DragState::Dragging { indicator, .. } => indicator.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Grab a page. Ids not in `pages` leave the controller idle.
    pub fn start(&mut self, id: &PageId, pages: &[Page]) -> bool {
        if index_of(pages, id).is_none() {
            self.state = DragState::Idle;
            return false;
        }
        self.state = DragState::Dragging {
            active: id.clone(),
            indicator: None,
        };
        true
    }

    /// Hover over `target` (or nothing). A page moving forward lands after
    /// the target, one moving backward lands before it, which is exactly
    /// where [`end`](Self::end) will put it.
    pub fn over(&mut self, target: Option<&PageId>, pages: &[Page]) -> Option<&DropIndicator> {
        let DragState::Dragging { active, indicator } = &mut self.state else {
            return None;
        };
        let active = &*active;

        *indicator = target
            .filter(|target| *target != active)
            .and_then(|target| {
                let active_index = index_of(pages, active)?;
                let target_index = index_of(pages, target)?;
                let position = if active_index < target_index {
                    DropPosition::After
                } else {
                    DropPosition::Before
                };
                Some(DropIndicator {
                    target: target.clone(),
                    position,
                })
            });

        indicator.as_ref()
    }

    /// Drop onto `target`. Returns the move to apply, if any.
    pub fn end(&mut self, target: Option<&PageId>, pages: &[Page]) -> Option<Move> {
        let DragState::Dragging { active, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let target = target.filter(|target| **target != active)?;
        Some(Move {
            old_index: index_of(pages, &active)?,
            new_index: index_of(pages, target)?,
        })
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

fn index_of(pages: &[Page], id: &PageId) -> Option<usize> {
    pages.iter().position(|page| &page.id == id)
}
