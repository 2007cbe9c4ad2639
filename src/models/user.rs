//! Identity and auth wire types.

use serde::{Deserialize, Serialize};

/// The identity an authenticated session belongs to. Immutable once fetched;
/// replaced wholesale on a new login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Successful login exchange: the bearer token plus the identity it
/// authorizes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(rename = "jwt")]
    pub token: String,
    pub user: UserIdentity,
}

#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub filename: Option<String>,
    pub original_filename: Option<String>,
}
