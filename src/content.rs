//! Content service: orchestrates the API client and the wire-record
//! adapters behind the verbs the UI consumes.
//!
//! Read paths never fail the caller: a transport error comes back as an
//! empty result and a record that fails adaptation is dropped, with the
//! failure logged for observability. Write and auth paths propagate typed
//! `ApiError`s untouched.

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{
    Article, ArticleQuery, ArticleSort, AuthSession, Category, NewArticle, NewCategory,
    UploadedImage,
};

#[derive(Clone)]
pub struct ContentService {
    api: ApiClient,
}

impl ContentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Attach or clear the bearer credential used for authenticated calls.
    /// The session manager is the only intended caller.
    pub fn set_token(&self, token: Option<String>) {
        self.api.set_token(token);
    }

    pub fn has_token(&self) -> bool {
        self.api.token().is_some()
    }

    // ===== Read paths =====

    /// List articles matching the filter, adapted to UI-ready records.
    /// Records that fail adaptation are dropped rather than failing the
    /// whole list; a transport failure yields an empty list.
    pub async fn list_articles(&self, query: &ArticleQuery) -> Vec<Article> {
        let records = match self.api.fetch_articles(query).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to fetch articles");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| match record.to_article() {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!(error = %e, "dropping article record");
                    None
                }
            })
            .collect()
    }

    /// Featured articles for the hero carousel.
    pub async fn featured_articles(&self, limit: u32) -> Vec<Article> {
        self.list_articles(&ArticleQuery {
            featured: true,
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// Most-viewed articles for the trending sidebar. Ordering is applied
    /// by the server.
    pub async fn trending_articles(&self, limit: u32) -> Vec<Article> {
        self.list_articles(&ArticleQuery {
            sort: Some(ArticleSort::Trending),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    pub async fn articles_by_category(&self, category_slug: &str, limit: u32) -> Vec<Article> {
        self.list_articles(&ArticleQuery {
            category: Some(category_slug.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    pub async fn article_by_slug(&self, slug: &str) -> Option<Article> {
        let query = ArticleQuery {
            slug: Some(slug.to_string()),
            ..Default::default()
        };
        let records = match self.api.fetch_articles(&query).await {
            Ok(records) => records,
            Err(e) => {
                warn!(slug, error = %e, "failed to fetch article");
                return None;
            }
        };

        match records.first().map(|record| record.to_article()) {
            Some(Ok(article)) => Some(article),
            Some(Err(e)) => {
                warn!(slug, error = %e, "dropping article record");
                None
            }
            None => None,
        }
    }

    pub async fn article_by_id(&self, id: &str) -> Option<Article> {
        let record = match self.api.fetch_article(id).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(ApiError::NotFound(_)) => {
                debug!(id, "article not found");
                return None;
            }
            Err(e) => {
                warn!(id, error = %e, "failed to fetch article");
                return None;
            }
        };

        match record.to_article() {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(id, error = %e, "dropping article record");
                None
            }
        }
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        let records = match self.api.fetch_categories().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to fetch categories");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| match record.to_category() {
                Ok(category) => Some(category),
                Err(e) => {
                    warn!(error = %e, "dropping category record");
                    None
                }
            })
            .collect()
    }

    // ===== Write paths =====

    /// Create an article. Requires an attached credential; server-side
    /// rejections (missing required field, expired token) propagate to the
    /// caller unmodified.
    pub async fn create_article(&self, input: &NewArticle) -> Result<Article, ApiError> {
        let record = self.api.create_article(input).await?;
        record.to_article()
    }

    pub async fn create_category(&self, input: &NewCategory) -> Result<Category, ApiError> {
        let record = self.api.create_category(input).await?;
        record.to_category()
    }

    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, ApiError> {
        self.api.upload_image(file_name, content_type, bytes).await
    }

    // ===== Auth paths =====

    /// Exchange credentials for a session. Persistence is the session
    /// manager's job; this only performs the network exchange.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.api.login(identifier, password).await
    }

    /// Lightweight authenticated probe confirming the attached token is
    /// still accepted. Returns `true` only on an explicit server
    /// confirmation; every failure mode, transport included, reads as
    /// invalid. With no token attached, answers without a network call.
    pub async fn validate_session(&self) -> bool {
        if !self.has_token() {
            return false;
        }
        match self.api.validate().await {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "session validation failed");
                false
            }
        }
    }
}
