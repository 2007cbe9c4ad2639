//! HTTP client for the newsroom CMS API.
//!
//! Thin wrapper around `reqwest` that attaches the bearer credential and
//! converts transport and status failures into the `ApiError` taxonomy.
//! Response shaping into UI-ready records lives in `models`; orchestration
//! and error-swallowing policy live in `content`.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{header, multipart, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::models::{
    ArticleListResponse, ArticleQuery, ArticleResponse, AuthSession, CategoryListResponse,
    CategoryResponse, NewArticle, NewCategory, UploadedImage, ValidateResponse, WireArticle,
    WireCategory,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// API client for the newsroom CMS.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the token cell is shared so a credential set on one handle
/// is visible to every clone.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    /// (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Set or clear the bearer token used for authenticated requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    /// The currently attached bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    ApiError::Authentication("stored token is not a valid header value".into())
                })?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning a typed error with the
    /// server's detail message if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("{} in body: {}", e, ApiError::truncate_body(&text)))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response).await
    }

    // ===== Auth endpoints =====

    /// Exchange credentials for a bearer token and the identity it
    /// authorizes. Bad credentials (401) and lockout (429) both surface as
    /// `ApiError::Authentication` carrying the server's message.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, ApiError> {
        let url = format!("{}/auth/local", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { identifier, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 | 429 => ApiError::Authentication(ApiError::error_detail(&body)),
                _ => ApiError::from_status(status, &body),
            });
        }

        Self::parse_json(response).await
    }

    /// Ask the server whether the attached token is still accepted.
    /// `Ok(true)` only on an explicit confirmation.
    pub async fn validate(&self) -> Result<bool, ApiError> {
        let response: ValidateResponse = self.get("/auth/validate", &[]).await?;
        Ok(response.valid)
    }

    // ===== Content endpoints =====

    pub async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<WireArticle>, ApiError> {
        debug!(?query, "fetching articles");
        let response: ArticleListResponse = self.get("/articles", &query.to_query_pairs()).await?;
        Ok(response.data)
    }

    pub async fn fetch_article(&self, id: &str) -> Result<Option<WireArticle>, ApiError> {
        let path = format!("/articles/{}", id);
        let response: ArticleResponse = self.get(&path, &[("populate", "*".to_string())]).await?;
        Ok(response.data)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<WireCategory>, ApiError> {
        let response: CategoryListResponse = self.get("/categories", &[]).await?;
        Ok(response.data)
    }

    pub async fn create_article(&self, input: &NewArticle) -> Result<WireArticle, ApiError> {
        let response: ArticleResponse = self.post("/articles", input).await?;
        response.data.ok_or_else(|| {
            ApiError::InvalidResponse("create response carried no article record".into())
        })
    }

    pub async fn create_category(&self, input: &NewCategory) -> Result<WireCategory, ApiError> {
        let response: CategoryResponse = self.post("/categories", input).await?;
        response.data.ok_or_else(|| {
            ApiError::InvalidResponse("create response carried no category record".into())
        })
    }

    /// Upload an image as multipart form data, returning its served URL.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, ApiError> {
        let url = format!("{}/upload", self.base_url);
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::Validation(format!("unsupported content type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response).await
    }
}
