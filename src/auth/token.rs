use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use crate::error::MoverError;

/// Access tokens are treated as expired this long before their real expiry
const EXPIRY_DELTA_SECS: i64 = 10;

/// Cached delegated-access credential
///
/// Field names match the token.json written by Google's Go quickstarts so an
/// existing cache keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_expiry")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Go writes its zero time (0001-01-01T00:00:00Z) for tokens that never expire
fn deserialize_expiry<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let expiry = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(expiry.filter(|ts| ts.year() > 1))
}

impl Credential {
    /// True when the access token can no longer be used at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_DELTA_SECS) <= now,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Load a credential from disk
pub fn load_credential(path: &Path) -> Result<Credential, MoverError> {
    let content = fs::read_to_string(path).map_err(|source| MoverError::CredentialIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a credential, creating or truncating the file with owner-only permissions
pub fn save_credential(path: &Path, credential: &Credential) -> Result<(), MoverError> {
    let io_err = |source| MoverError::CredentialIo {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(io_err)?;
    let content = serde_json::to_string(credential)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;
    log::info!("Cached credential at {}", path.display());
    Ok(())
}

/// Delete the cached credential. A missing file is an error.
pub fn clear_credential(path: &Path) -> Result<(), MoverError> {
    fs::remove_file(path).map_err(|source| MoverError::ClearToken {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Removed cached credential {}", path.display());
    Ok(())
}
