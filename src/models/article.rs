//! Article models: the CMS wire record and the flat, UI-ready `Article`.

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::{RecordId, Relation};

/// Category name used when the relation is not populated
const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Author name used when the relation is not populated
const DEFAULT_AUTHOR: &str = "Admin";

/// UI-ready article, flattened from the wire record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub category_slug: Option<String>,
    pub author: String,
    /// Publish timestamp, falling back to the creation timestamp.
    pub date: Option<String>,
    pub views: i64,
    pub is_featured: bool,
}

// Wire types

#[derive(Debug, Clone, Deserialize)]
pub struct WireArticle {
    pub id: Option<RecordId>,
    #[serde(default)]
    pub attributes: ArticleAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleAttributes {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub views: Option<i64>,
    pub is_featured: Option<bool>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub category: Relation<CategoryRelation>,
    #[serde(default)]
    pub author: Relation<AuthorRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRelation {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRelation {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleListResponse {
    pub data: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleResponse {
    pub data: Option<WireArticle>,
}

impl WireArticle {
    /// Flatten to a UI-ready `Article`.
    ///
    /// Total over the optional attributes: a missing category or author
    /// relation falls back to a default name, a missing publish timestamp to
    /// the creation timestamp, missing counters to zero. Fails only when the
    /// record has no identifier, which marks the payload as malformed.
    pub fn to_article(&self) -> Result<Article, ApiError> {
        let id = self
            .id
            .as_ref()
            .ok_or_else(|| ApiError::MalformedPayload("article record has no id".into()))?;
        let attrs = &self.attributes;

        Ok(Article {
            id: id.to_string(),
            title: attrs.title.clone().unwrap_or_default(),
            slug: attrs.slug.clone().unwrap_or_default(),
            excerpt: attrs.excerpt.clone().unwrap_or_default(),
            content: attrs.content.clone().unwrap_or_default(),
            image: attrs.featured_image.clone(),
            category: attrs
                .category
                .attributes()
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            category_slug: attrs.category.attributes().and_then(|c| c.slug.clone()),
            author: attrs
                .author
                .attributes()
                .and_then(|a| a.username.clone())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            date: attrs.published_at.clone().or_else(|| attrs.created_at.clone()),
            views: attrs.views.unwrap_or(0),
            is_featured: attrs.is_featured.unwrap_or(false),
        })
    }
}

/// Input for the article write path. The server assigns the id, the author
/// (from the bearer token), the view counter, and the timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub is_featured: bool,
}

/// Filter options for the article list endpoint. Filtering, ordering, and
/// truncation all happen server-side; the adapter never re-sorts.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// Restrict to a single slug (used for slug lookups).
    pub slug: Option<String>,
    /// Restrict to a category slug.
    pub category: Option<String>,
    /// Restrict to featured items.
    pub featured: bool,
    /// Maximum item count.
    pub limit: Option<u32>,
    pub sort: Option<ArticleSort>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSort {
    /// Descending view count.
    Trending,
}

impl ArticleQuery {
    /// Render to the CMS query-string parameters. Relations are always
    /// populated; absent options emit no parameter.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("populate", "*".to_string())];
        if let Some(ref slug) = self.slug {
            pairs.push(("filters_slug", slug.clone()));
        }
        if let Some(ref category) = self.category {
            pairs.push(("filters_category_slug", category.clone()));
        }
        if self.featured {
            pairs.push(("filters_is_featured", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("pagination_limit", limit.to_string()));
        }
        if self.sort == Some(ArticleSort::Trending) {
            pairs.push(("sort", "views:desc".to_string()));
        }
        pairs
    }
}
