//! Snapshot-based undo.
//!
//! Each snapshot is a deep copy of the full element list (ids, geometry,
//! attributes, dirty flags). Undo replaces the scene wholesale. The deletion
//! set is not part of a snapshot; see [`SceneStore::replace_all`] for how
//! restored ids leave it. There is no redo.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::debug;

use crate::element::LayoutElement;
use crate::scene::SceneStore;

/// Bounded stack of scene snapshots.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<Vec<LayoutElement>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::consts::HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` snapshots (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { stack: Vec::new(), limit: limit.max(1) }
    }

    /// Push a deep copy of the current scene. Drops the oldest snapshot once
    /// the limit is reached.
    pub fn snapshot(&mut self, scene: &SceneStore) {
        if self.stack.len() >= self.limit {
            self.stack.remove(0);
        }
        self.stack.push(scene.all().to_vec());
        debug!(depth = self.stack.len(), elements = scene.len(), "history snapshot");
    }

    /// Restore the most recent snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut SceneStore) -> bool {
        let Some(elements) = self.stack.pop() else {
            return false;
        };
        debug!(depth = self.stack.len(), elements = elements.len(), "history undo");
        scene.replace_all(elements);
        true
    }

    /// Drop every snapshot (after a fresh load).
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
