//! Data models for the newsroom CMS.
//!
//! Each entity comes in two shapes: the wire record as the CMS sends it
//! (nested `attributes` bag, relations wrapped in `{ "data": ... }`) and the
//! flat record the UI consumes. The `to_*` methods on the wire types are the
//! adapter layer; nothing outside this module needs to know the wire schema.

pub mod article;
pub mod category;
pub mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use article::{
    Article, ArticleAttributes, ArticleListResponse, ArticleQuery, ArticleResponse, ArticleSort,
    NewArticle, WireArticle,
};
pub use category::{Category, CategoryListResponse, CategoryResponse, NewCategory, WireCategory};
pub use user::{AuthSession, UploadedImage, UserIdentity, ValidateResponse};

/// Record identifier as the CMS sends it. Numeric in some deployments,
/// a UUID string in others; normalized to a string for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Nested relation wrapper, `{ "data": { "id", "attributes": {...} } | null }`.
/// An absent relation field and `"data": null` both read as not populated.
#[derive(Debug, Clone, Deserialize)]
pub struct Relation<T> {
    pub data: Option<RelationData<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationData<T> {
    pub id: Option<RecordId>,
    pub attributes: T,
}

impl<T> Relation<T> {
    /// Attributes of the related entity, when the relation is populated.
    pub fn attributes(&self) -> Option<&T> {
        self.data.as_ref().map(|d| &d.attributes)
    }
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Self { data: None }
    }
}
