//! Linear undo/redo log of full snapshots.

/// Snapshot history with a cursor on the snapshot currently shown.
///
/// Pushing after an undo discards the redo branch.
#[derive(Debug, Clone)]
pub struct History<T> {
    log: Vec<T>,
    /// `None` until the first push
    cursor: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            cursor: None,
        }
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new snapshot and make it current.
    pub fn push(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.log.truncate(keep);
        self.log.push(snapshot);
        self.cursor = Some(self.log.len() - 1);
    }

    /// Step back one snapshot. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<T> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.log.get(cursor - 1).cloned()
            }
            _ => None,
        }
    }

    /// Step forward one snapshot. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<T> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if self.cursor.is_some() && next < self.log.len() {
            self.cursor = Some(next);
            self.log.get(next).cloned()
        } else {
            None
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(cursor) => cursor + 1 < self.log.len(),
            None => false,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|cursor| self.log.get(cursor))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Rewrite every stored snapshot in place. The cursor does not move.
    pub fn rewrite(&mut self, mut f: impl FnMut(&mut T)) {
        self.log.iter_mut().for_each(|snapshot| f(snapshot));
    }
}
