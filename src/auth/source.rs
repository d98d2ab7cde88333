use chrono::{Duration, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::cell::RefCell;
use super::secret::OAuthClientConfig;
use super::token::Credential;
use crate::error::MoverError;

/// Supplies bearer tokens, refreshing the access token when it expires.
/// Refreshed tokens live in memory only.
#[derive(Debug)]
pub struct TokenSource {
    oauth: OAuthClientConfig,
    credential: RefCell<Credential>,
    http: Client,
}

impl TokenSource {
    pub fn new(oauth: OAuthClientConfig, credential: Credential, http: Client) -> Self {
        Self {
            oauth,
            credential: RefCell::new(credential),
            http,
        }
    }

    /// Snapshot of the current credential
    pub fn credential(&self) -> Credential {
        self.credential.borrow().clone()
    }

    /// A usable access token, refreshed first if needed
    pub fn access_token(&self) -> Result<String, MoverError> {
        if self.credential.borrow().is_expired() {
            let refreshed = self.refresh()?;
            *self.credential.borrow_mut() = refreshed;
        }
        Ok(self.credential.borrow().access_token.clone())
    }

    fn refresh(&self) -> Result<Credential, MoverError> {
        let current = self.credential();
        let refresh_token = current.refresh_token.as_deref().ok_or_else(|| {
            MoverError::TokenRefresh("access token expired and no refresh token is cached; rerun with --clear-token".to_string())
        })?;

        log::debug!("Refreshing access token via {}", self.oauth.token_uri);
        let response = token_request(
            &self.http,
            &self.oauth.token_uri,
            &[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ],
        )
        .map_err(MoverError::TokenRefresh)?;

        Ok(response.into_credential(current.refresh_token))
    }
}

/// Successful token endpoint reply
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    /// Keep `previous_refresh` when the server does not rotate the refresh token
    pub(crate) fn into_credential(self, previous_refresh: Option<String>) -> Credential {
        Credential {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| Utc::now() + Duration::seconds(secs)),
            scope: self.scope,
        }
    }
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// POST a form to the token endpoint. Errors come back as a readable summary.
pub(crate) fn token_request(
    http: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, String> {
    let resp = http
        .post(token_uri)
        .form(form)
        .send()
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(format_oauth_error(status.as_u16(), &body));
    }

    resp.json().map_err(|e| e.to_string())
}

fn format_oauth_error(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status);
    }

    let summary = match serde_json::from_str::<TokenErrorResponse>(trimmed) {
        Ok(TokenErrorResponse { error, error_description: Some(desc) }) => format!("{} ({})", desc, error),
        Ok(TokenErrorResponse { error, error_description: None }) => error,
        Err(_) => truncate(trimmed),
    };
    format!("HTTP {}: {}", status, summary)
}

fn truncate(message: &str) -> String {
    let mut out = message.replace(['\n', '\r'], " ");
    if out.len() > 240 {
        let mut cut = 240;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
        out.push_str("...");
    }
    out
}
