//! Local fixture CMS for the integration tests.
//!
//! Serves the same wire shapes as the real backend on an ephemeral port and
//! records the query parameters it receives so tests can assert on the
//! request contract. Filtering, ordering, and truncation happen here, like
//! they do server-side in production.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

pub const EMAIL: &str = "editor@example.com";
pub const PASSWORD: &str = "hunter2";

#[derive(Default)]
pub struct FixtureState {
    /// Article records in wire shape, in server order.
    pub articles: Mutex<Vec<Value>>,
    /// Query parameters seen on GET /articles, decoded, one entry per call.
    pub queries: Mutex<Vec<Vec<(String, String)>>>,
    /// Bearer tokens the fixture accepts.
    pub tokens: Mutex<HashSet<String>>,
    /// Artificial latency on GET /auth/validate.
    pub validate_delay: Mutex<Duration>,
}

impl FixtureState {
    pub fn seeded() -> Arc<Self> {
        let state = Self::default();
        *state.articles.lock().unwrap() = seed_articles();
        Arc::new(state)
    }

    pub fn accept_token(&self, token: &str) {
        self.tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn set_validate_delay(&self, delay: Duration) {
        *self.validate_delay.lock().unwrap() = delay;
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

pub async fn spawn(state: Arc<FixtureState>) -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/local", post(login))
        .route("/api/auth/validate", get(validate))
        .route("/api/articles", get(list_articles).post(create_article))
        .route("/api/articles/{id}", get(get_article))
        .route("/api/categories", get(list_categories))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    addr
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}/api", addr)
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

fn article(id: &str, title: &str, slug: &str, category: Option<(&str, &str)>, views: i64, featured: bool) -> Value {
    let mut attributes = json!({
        "title": title,
        "slug": slug,
        "excerpt": format!("{} - ringkasan", title),
        "content": format!("{} - isi lengkap", title),
        "views": views,
        "is_featured": featured,
        "publishedAt": "2026-07-01T08:00:00",
        "createdAt": "2026-06-30T10:00:00",
        "author": {"data": {"id": "u-1", "attributes": {"username": "editor", "email": EMAIL}}}
    });
    if let Some((name, cat_slug)) = category {
        attributes["category"] = json!({
            "data": {"id": format!("cat-{}", cat_slug), "attributes": {"name": name, "slug": cat_slug}}
        });
    }
    json!({"id": id, "attributes": attributes})
}

fn seed_articles() -> Vec<Value> {
    vec![
        article("a-1", "Pertama", "pertama", Some(("Teknologi", "teknologi")), 40, true),
        article("a-2", "Kedua", "kedua", Some(("Olahraga", "olahraga")), 250, false),
        article("a-3", "Ketiga", "ketiga", Some(("Teknologi", "teknologi")), 10, false),
        article("a-4", "Keempat", "keempat", None, 90, true),
        article("a-5", "Kelima", "kelima", Some(("Politik", "politik")), 170, false),
    ]
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Token tidak valid. Silakan login kembali."})),
    )
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

async fn login(
    State(state): State<Arc<FixtureState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body["identifier"] == EMAIL && body["password"] == PASSWORD {
        let token = {
            let mut tokens = state.tokens.lock().unwrap();
            let token = format!("fixture-token-{}", tokens.len());
            tokens.insert(token.clone());
            token
        };
        (
            StatusCode::OK,
            Json(json!({
                "jwt": token,
                "user": {"id": "u-1", "username": "editor", "email": EMAIL, "role": "editor"}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Email atau password salah"})),
        )
    }
}

async fn validate(
    State(state): State<Arc<FixtureState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let delay = *state.validate_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match bearer(&headers) {
        Some(token) if state.tokens.lock().unwrap().contains(&token) => {
            (StatusCode::OK, Json(json!({"valid": true})))
        }
        _ => unauthorized(),
    }
}

async fn list_articles(
    State(state): State<Arc<FixtureState>>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    let params = parse_query(query.as_deref().unwrap_or_default());
    state.queries.lock().unwrap().push(params.clone());
    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let mut records = state.articles.lock().unwrap().clone();
    if let Some(slug) = param("filters_slug") {
        records.retain(|a| a["attributes"]["slug"] == json!(slug));
    }
    if let Some(category) = param("filters_category_slug") {
        records.retain(|a| a["attributes"]["category"]["data"]["attributes"]["slug"] == json!(category));
    }
    if param("filters_is_featured").as_deref() == Some("true") {
        records.retain(|a| a["attributes"]["is_featured"] == json!(true));
    }
    if param("sort").as_deref() == Some("views:desc") {
        records.sort_by_key(|a| std::cmp::Reverse(a["attributes"]["views"].as_i64().unwrap_or(0)));
    }
    if let Some(limit) = param("pagination_limit").and_then(|v| v.parse::<usize>().ok()) {
        records.truncate(limit);
    }

    Json(json!({"data": records}))
}

async fn get_article(
    State(state): State<Arc<FixtureState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let records = state.articles.lock().unwrap();
    match records.iter().find(|a| a["id"] == json!(id)) {
        Some(record) => (StatusCode::OK, Json(json!({"data": record}))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Artikel tidak ditemukan"})),
        ),
    }
}

async fn create_article(
    State(state): State<Arc<FixtureState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = bearer(&headers)
        .map(|token| state.tokens.lock().unwrap().contains(&token))
        .unwrap_or(false);
    if !authorized {
        return unauthorized();
    }

    for field in ["title", "slug", "excerpt", "content"] {
        let present = body
            .get(field)
            .and_then(Value::as_str)
            .map(|s| !s.is_empty())
            .unwrap_or(false);
        if !present {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": format!("field required: {}", field)})),
            );
        }
    }

    let record = json!({
        "id": "a-created-1",
        "attributes": {
            "title": body["title"],
            "slug": body["slug"],
            "excerpt": body["excerpt"],
            "content": body["content"],
            "featured_image": body.get("featured_image").cloned().unwrap_or(Value::Null),
            "views": 0,
            "is_featured": body.get("is_featured").cloned().unwrap_or(json!(false)),
            "publishedAt": "2026-08-06T10:00:00",
            "createdAt": "2026-08-06T10:00:00",
            "author": {"data": {"id": "u-1", "attributes": {"username": "editor", "email": EMAIL}}}
        }
    });
    (StatusCode::OK, Json(json!({"data": record})))
}

async fn list_categories(State(_state): State<Arc<FixtureState>>) -> Json<Value> {
    Json(json!({
        "data": [
            {"id": "cat-teknologi", "attributes": {"name": "Teknologi", "slug": "teknologi"}},
            {"id": "cat-olahraga", "attributes": {"name": "Olahraga", "slug": "olahraga"}},
            {"id": "cat-politik", "attributes": {"name": "Politik", "slug": "politik"}}
        ]
    }))
}
