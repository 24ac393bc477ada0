//! Remote store collaborator: the four calls the editor needs, the wire shape
//! of an element, and an in-memory implementation.
//!
//! DESIGN
//! ======
//! The store's own protocol is not the editor's concern. Anything that can
//! fetch, delete, upsert and insert [`SerializedElement`]s for a container
//! implements [`LayoutStore`]. [`MemoryStore`] backs the binary and tests.
//!
//! ERROR HANDLING
//! ==============
//! Store failures are returned as [`StoreError`] and never retried here.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::element::{
    Attributes, ElementId, ElementKind, Geometry, LayoutElement, SeatAttributes, StructureAttributes,
};

// =============================================================================
// ERRORS
// =============================================================================

/// Stable machine-readable code for an error, for hosts that map errors to UI text.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "E_STORE_BACKEND",
            Self::ContainerNotFound(_) => "E_CONTAINER_NOT_FOUND",
            Self::Serialization(_) => "E_SERIALIZATION",
        }
    }
}

// =============================================================================
// WIRE TYPE
// =============================================================================

/// An element as sent to and received from the store. Geometry is whole pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedElement {
    /// Present for persisted elements; absent on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub container_id: String,
    pub kind: ElementKind,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation_degrees: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[allow(clippy::cast_possible_truncation)]
fn px(value: f64) -> i64 {
    value.round() as i64
}

#[allow(clippy::cast_precision_loss)]
fn from_px(value: i64) -> f64 {
    value as f64
}

impl SerializedElement {
    /// Serialize an element for `container_id`, rounding geometry to whole
    /// pixels. Persisted ids are carried; local ids are dropped so the store
    /// assigns one. Only fields of the element's own kind are emitted.
    #[must_use]
    pub fn from_element(element: &LayoutElement, container_id: &str) -> Self {
        let g = &element.geometry;
        let mut out = Self {
            id: element.id.is_persisted().then(|| element.id.as_str().to_string()),
            container_id: container_id.to_string(),
            kind: element.kind(),
            x: px(g.x),
            y: px(g.y),
            width: px(g.width).max(1),
            height: px(g.height).max(1),
            rotation_degrees: px(g.rotation_degrees),
            seat_number: None,
            display_number: None,
            section_name: None,
            section_color: None,
            global_order: None,
            label: None,
        };
        match &element.attributes {
            Attributes::Seat(seat) => {
                out.seat_number = Some(seat.seat_number.clone());
                out.display_number.clone_from(&seat.display_number);
                out.section_name.clone_from(&seat.section_name);
                out.section_color.clone_from(&seat.section_color);
                out.global_order = seat.global_order;
            }
            Attributes::Structure(structure) => {
                out.label = Some(structure.label.clone());
            }
        }
        out
    }

    /// Decode a fetched row into a clean element. Rows without an id are
    /// rejected. Fields that do not belong to the row's kind are ignored.
    #[must_use]
    pub fn into_element(self) -> Option<LayoutElement> {
        let id = ElementId::new(self.id?);
        let geometry = Geometry {
            x: from_px(self.x),
            y: from_px(self.y),
            width: from_px(self.width),
            height: from_px(self.height),
            rotation_degrees: from_px(self.rotation_degrees),
        };
        let attributes = match self.kind {
            ElementKind::Seat => Attributes::Seat(SeatAttributes {
                seat_number: self.seat_number.unwrap_or_default(),
                display_number: self.display_number,
                section_name: self.section_name,
                section_color: self.section_color,
                global_order: self.global_order,
            }),
            ElementKind::Structure => {
                Attributes::Structure(StructureAttributes { label: self.label.unwrap_or_default() })
            }
        };
        Some(LayoutElement { id, geometry, attributes, dirty: false })
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// The remote store as seen by the editor. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LayoutStore: Send + Sync {
    /// Fetch every element stored for a container.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    async fn fetch_elements(&self, container_id: &str) -> Result<Vec<SerializedElement>, StoreError>;

    /// Delete elements by persisted id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    async fn delete_elements(&self, ids: &[String]) -> Result<(), StoreError>;

    /// Insert-or-replace elements that carry a persisted id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    async fn upsert_elements(&self, elements: &[SerializedElement]) -> Result<(), StoreError>;

    /// Insert new elements; the store assigns their ids.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    async fn insert_elements(&self, elements: &[SerializedElement]) -> Result<(), StoreError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Process-local store. Assigns UUIDs on insert, like a database default.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<SerializedElement>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with rows. Rows without an id get one.
    #[must_use]
    pub fn with_rows(rows: Vec<SerializedElement>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.id.is_none() {
                    row.id = Some(Uuid::new_v4().to_string());
                }
                row
            })
            .collect();
        Self { rows: RwLock::new(rows) }
    }

    /// Copy of every stored row.
    pub async fn rows(&self) -> Vec<SerializedElement> {
        self.rows.read().await.clone()
    }
}

#[async_trait::async_trait]
impl LayoutStore for MemoryStore {
    async fn fetch_elements(&self, container_id: &str) -> Result<Vec<SerializedElement>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| r.container_id == container_id).cloned().collect())
    }

    async fn delete_elements(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.retain(|r| r.id.as_ref().is_none_or(|id| !ids.contains(id)));
        Ok(())
    }

    async fn upsert_elements(&self, elements: &[SerializedElement]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        for element in elements {
            let Some(id) = element.id.as_ref() else {
                return Err(StoreError::Backend("upsert requires an id".into()));
            };
            match rows.iter_mut().find(|r| r.id.as_ref() == Some(id)) {
                Some(row) => *row = element.clone(),
                None => rows.push(element.clone()),
            }
        }
        Ok(())
    }

    async fn insert_elements(&self, elements: &[SerializedElement]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        for element in elements {
            let mut row = element.clone();
            row.id = Some(Uuid::new_v4().to_string());
            rows.push(row);
        }
        Ok(())
    }
}
