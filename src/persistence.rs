//! Persistence adapter: load a container's layout into the editor and save
//! the editor's changes back as a diff.
//!
//! DESIGN
//! ======
//! A save runs in three phases. [`plan_save`] reads the scene and serializes
//! exactly what must change (deletions, upserts for persisted ids, inserts for
//! local ids) with geometry rounded at that moment. [`execute_plan`] issues the
//! store calls without touching the scene: deletes first, then upserts, then
//! inserts. [`finish_save`] clears the saved ids from the deletion set and the
//! dirty flags. [`PersistenceAdapter::save`] composes the three and reloads
//! so local ids are replaced by the store's.
//!
//! ERROR HANDLING
//! ==============
//! The first failing call aborts the save. Calls already issued are not rolled
//! back; the scene is left untouched so the user can save again.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::element::{Attributes, ElementId, ElementKind, LayoutElement};
use crate::engine::EditorCore;
use crate::scene::{SceneStore, reading_order};
use crate::store::{ErrorCode, LayoutStore, SerializedElement, StoreError};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to fetch layout: {0}")]
    Fetch(#[source] StoreError),
    #[error("failed to delete elements: {0}")]
    Delete(#[source] StoreError),
    #[error("failed to update elements: {0}")]
    Upsert(#[source] StoreError),
    #[error("failed to insert elements: {0}")]
    Insert(#[source] StoreError),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "E_FETCH_FAILED",
            Self::Delete(_) => "E_DELETE_FAILED",
            Self::Upsert(_) => "E_UPSERT_FAILED",
            Self::Insert(_) => "E_INSERT_FAILED",
        }
    }
}

// =============================================================================
// SAVE PLAN
// =============================================================================

/// Everything one save sends to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavePlan {
    /// Persisted ids to delete.
    pub deletes: Vec<ElementId>,
    /// Changed elements that already have a persisted id.
    pub updates: Vec<SerializedElement>,
    /// Elements the store has never seen.
    pub inserts: Vec<SerializedElement>,
}

impl SavePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }
}

/// Counts of what a save sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub deleted: usize,
    pub updated: usize,
    pub inserted: usize,
}

/// Dense 1..n seat order for this save: seats that already have an order keep
/// their relative position, unordered seats follow in reading order.
fn seat_ranks(scene: &SceneStore) -> HashMap<ElementId, i64> {
    let mut seats = reading_order(scene.all().iter().filter(|e| e.kind() == ElementKind::Seat));
    seats.sort_by_key(|e| {
        let order = e.seat().and_then(|s| s.global_order);
        (order.is_none(), order)
    });
    seats
        .into_iter()
        .zip(1_i64..)
        .map(|(e, rank)| (e.id.clone(), rank))
        .collect()
}

fn current_order(element: &LayoutElement) -> Option<i64> {
    match &element.attributes {
        Attributes::Seat(seat) => seat.global_order,
        Attributes::Structure(_) => None,
    }
}

/// Diff the scene into a [`SavePlan`] for `container_id`.
///
/// Local ids always go to inserts. Persisted elements go to updates when they
/// are dirty or their dense seat order changed.
#[must_use]
pub fn plan_save(scene: &SceneStore, container_id: &str) -> SavePlan {
    let ranks = seat_ranks(scene);
    let mut plan = SavePlan { deletes: scene.deleted().iter().cloned().collect(), ..SavePlan::default() };

    for element in scene.all() {
        let rank = ranks.get(&element.id).copied();
        let reordered = element.kind() == ElementKind::Seat && current_order(element) != rank;

        let mut row = SerializedElement::from_element(element, container_id);
        if element.kind() == ElementKind::Seat {
            row.global_order = rank;
        }

        if !element.id.is_persisted() {
            plan.inserts.push(row);
        } else if element.dirty || reordered {
            plan.updates.push(row);
        }
    }
    plan
}

/// Issue the plan's store calls: deletes, then upserts, then inserts.
/// Empty batches are skipped.
///
/// # Errors
///
/// Returns the first failing call as a [`PersistError`]; later calls are not
/// attempted.
pub async fn execute_plan<S>(store: &S, plan: &SavePlan) -> Result<SaveReport, PersistError>
where
    S: LayoutStore + ?Sized,
{
    if !plan.deletes.is_empty() {
        let ids: Vec<String> = plan.deletes.iter().map(|id| id.as_str().to_string()).collect();
        store.delete_elements(&ids).await.map_err(|e| {
            error!(error = %e, count = ids.len(), "layout delete failed");
            PersistError::Delete(e)
        })?;
    }
    if !plan.updates.is_empty() {
        store.upsert_elements(&plan.updates).await.map_err(|e| {
            error!(error = %e, count = plan.updates.len(), "layout update failed");
            PersistError::Upsert(e)
        })?;
    }
    if !plan.inserts.is_empty() {
        store.insert_elements(&plan.inserts).await.map_err(|e| {
            error!(error = %e, count = plan.inserts.len(), "layout insert failed");
            PersistError::Insert(e)
        })?;
    }

    Ok(SaveReport { deleted: plan.deletes.len(), updated: plan.updates.len(), inserted: plan.inserts.len() })
}

/// Mark a successfully executed plan as saved.
pub fn finish_save(scene: &mut SceneStore, plan: &SavePlan) {
    scene.clear_deleted(&plan.deletes);
    scene.clear_dirty();
}

// =============================================================================
// ADAPTER
// =============================================================================

/// Loads and saves one container's layout through a [`LayoutStore`].
pub struct PersistenceAdapter<S: LayoutStore + ?Sized> {
    store: Arc<S>,
    container_id: String,
}

impl<S: LayoutStore + ?Sized> PersistenceAdapter<S> {
    #[must_use]
    pub fn new(store: Arc<S>, container_id: impl Into<String>) -> Self {
        Self { store, container_id: container_id.into() }
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Fetch the container's elements, all clean. Rows without an id are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Fetch`] if the store call fails.
    pub async fn fetch(&self) -> Result<Vec<LayoutElement>, PersistError> {
        let rows = self.store.fetch_elements(&self.container_id).await.map_err(|e| {
            error!(error = %e, container = %self.container_id, "layout fetch failed");
            PersistError::Fetch(e)
        })?;
        let total = rows.len();
        let elements: Vec<LayoutElement> = rows.into_iter().filter_map(SerializedElement::into_element).collect();
        if elements.len() < total {
            warn!(skipped = total - elements.len(), container = %self.container_id, "rows without id skipped");
        }
        Ok(elements)
    }

    /// Replace the editor's scene with the stored layout and recenter.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Fetch`] if the store call fails; the editor is
    /// left unchanged.
    pub async fn load(&self, core: &mut EditorCore) -> Result<usize, PersistError> {
        let elements = self.fetch().await?;
        core.load_elements(elements);
        info!(container = %self.container_id, elements = core.scene.len(), "layout loaded");
        Ok(core.scene.len())
    }

    /// Save the editor's changes, then reload to pick up store-assigned ids.
    ///
    /// # Errors
    ///
    /// Returns the first failing store call. The editor's scene, dirty flags
    /// and deletion set are unchanged on failure.
    pub async fn save(&self, core: &mut EditorCore) -> Result<SaveReport, PersistError> {
        let plan = plan_save(&core.scene, &self.container_id);
        let report = execute_plan(self.store.as_ref(), &plan).await?;
        let elements = self.fetch().await?;

        finish_save(&mut core.scene, &plan);
        core.load_elements(elements);
        info!(
            container = %self.container_id,
            deleted = report.deleted,
            updated = report.updated,
            inserted = report.inserted,
            "layout saved"
        );
        Ok(report)
    }
}
