use std::fs;
use std::path::{Path, PathBuf};
use crate::error::MoverError;

/// Environment variable that overrides the configuration directory
pub const CONFIG_DIR_ENV: &str = "MOVE_GTASKS_CONFIG_DIR";

/// Name of the per-user subfolder holding credentials
pub const APP_DIR_NAME: &str = "move-gtasks";

/// Task list the tool operates on
pub const DEFAULT_LIST_NAME: &str = "My Tasks";

/// Fixed port for the OAuth callback listener
pub const DEFAULT_CALLBACK_PORT: u16 = 42871;

const CREDENTIALS_FILE: &str = "credentials.json";
const TOKEN_FILE: &str = "token.json";

/// Runtime configuration, built once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_dir: PathBuf,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub list_name: String,
    pub callback_port: u16,
}

impl AppConfig {
    /// Build a configuration rooted at the given directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            credentials_path: config_dir.join(CREDENTIALS_FILE),
            token_path: config_dir.join(TOKEN_FILE),
            config_dir,
            list_name: DEFAULT_LIST_NAME.to_string(),
            callback_port: DEFAULT_CALLBACK_PORT,
        }
    }

    /// Resolve the configuration directory without touching the filesystem
    pub fn resolve_dir() -> Result<PathBuf, MoverError> {
        let override_dir = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        dir_from(override_dir, dirs::config_dir())
    }

    /// Resolve the configuration and create its directory (owner-only) if needed
    pub fn load() -> Result<Self, MoverError> {
        let dir = Self::resolve_dir()?;
        ensure_private_dir(&dir)?;
        log::debug!("Using configuration directory {}", dir.display());
        Ok(Self::with_dir(dir))
    }
}

fn dir_from(override_dir: Option<PathBuf>, user_config: Option<PathBuf>) -> Result<PathBuf, MoverError> {
    match override_dir {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
        _ => user_config
            .map(|base| base.join(APP_DIR_NAME))
            .ok_or(MoverError::ConfigDir),
    }
}

fn ensure_private_dir(dir: &Path) -> Result<(), MoverError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|source| MoverError::CreateConfigDir {
        path: dir.to_path_buf(),
        source,
    })
}
