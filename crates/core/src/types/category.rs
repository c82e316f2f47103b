//! Product categories offered by the catalog.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A selectable category, as listed by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub name: String,
}

impl CategoryOption {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
