// OAuth client configuration read from the user-supplied client secret file

use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;
use crate::error::MoverError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read/write access to Google Tasks
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

/// OAuth client settings for the authorization-code flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Deserialize)]
struct SecretFile {
    installed: Option<SecretEntry>,
    web: Option<SecretEntry>,
}

#[derive(Deserialize)]
struct SecretEntry {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl OAuthClientConfig {
    /// Parse a Google client secret JSON document ("installed" or "web" app)
    pub fn from_json(data: &[u8], scopes: &[&str]) -> Result<Self, MoverError> {
        let file: SecretFile = serde_json::from_slice(data)
            .map_err(|e| MoverError::ClientSecretInvalid(e.to_string()))?;
        let entry = file.installed.or(file.web).ok_or_else(|| {
            MoverError::ClientSecretInvalid("missing \"installed\" or \"web\" section".to_string())
        })?;

        if entry.client_id.trim().is_empty() {
            return Err(MoverError::ClientSecretInvalid("client_id is empty".to_string()));
        }

        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: entry.auth_uri.unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_uri: entry.token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            redirect_uri: entry.redirect_uris.into_iter().next().unwrap_or_default(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Read and parse the client secret file
    pub fn from_file(path: &Path, scopes: &[&str]) -> Result<Self, MoverError> {
        let data = fs::read(path).map_err(|source| MoverError::ClientSecretUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data, scopes)
    }

    /// URL the user opens to grant offline access
    pub fn auth_code_url(&self, state: &str) -> Result<Url, MoverError> {
        let scope = self.scopes.join(" ");
        Url::parse_with_params(
            &self.auth_uri,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("state", state),
            ],
        )
        .map_err(|e| MoverError::ClientSecretInvalid(format!("bad auth_uri '{}': {}", self.auth_uri, e)))
    }
}
