//! Category models.

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::RecordId;

/// UI-ready category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCategory {
    pub id: Option<RecordId>,
    #[serde(default)]
    pub attributes: CategoryAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryAttributes {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryListResponse {
    pub data: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    pub data: Option<WireCategory>,
}

impl WireCategory {
    /// Flatten to a UI-ready `Category`. Fails only on a missing identifier.
    pub fn to_category(&self) -> Result<Category, ApiError> {
        let id = self
            .id
            .as_ref()
            .ok_or_else(|| ApiError::MalformedPayload("category record has no id".into()))?;
        Ok(Category {
            id: id.to_string(),
            name: self.attributes.name.clone().unwrap_or_default(),
            slug: self.attributes.slug.clone().unwrap_or_default(),
        })
    }
}

/// Input for the category write path.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}
