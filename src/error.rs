// Error taxonomy for move-gtasks
//
// Library code returns MoverError. The binary decides the exit code from the
// variant: user-actionable problems exit 1, remote or I/O failures exit 2.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoverError {
    #[error("unable to parse the value of \"{field}\": '{input}' is not one of [yesterday, today, tomorrow] or a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, input: String },

    #[error("unable to determine a configuration directory for this user")]
    ConfigDir,

    #[error("unable to create configuration directory {}", path.display())]
    CreateConfigDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read client secret file at path {}", path.display())]
    ClientSecretUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse client secret file to config: {0}")]
    ClientSecretInvalid(String),

    #[error("unable to clear token at {}", path.display())]
    ClearToken {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to access credential file {}", path.display())]
    CredentialIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("credential file is malformed")]
    CredentialFormat(#[from] serde_json::Error),

    #[error("callback listener failed: {0}")]
    Callback(String),

    #[error("unable to retrieve token from web: {0}")]
    TokenExchange(String),

    #[error("unable to refresh access token: {0}")]
    TokenRefresh(String),

    #[error("no task lists found")]
    NoTaskLists,

    #[error("there was no task list called \"{0}\"")]
    TaskListNotFound(String),

    #[error("{context}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: HTTP {status}: {body}")]
    ApiStatus {
        context: String,
        status: u16,
        body: String,
    },
}

impl MoverError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MoverError::InvalidDate { .. }
            | MoverError::ConfigDir
            | MoverError::ClientSecretUnreadable { .. }
            | MoverError::ClientSecretInvalid(_)
            | MoverError::ClearToken { .. }
            | MoverError::NoTaskLists
            | MoverError::TaskListNotFound(_) => 1,
            _ => 2,
        }
    }
}
