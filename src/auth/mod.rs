// Delegated authorization: client secret, cached credential, browser handshake

pub mod callback;
pub mod flow;
pub mod secret;
pub mod source;
pub mod token;

pub use flow::{exchange_code, obtain_token_source};
pub use secret::{OAuthClientConfig, TASKS_SCOPE};
pub use source::TokenSource;
pub use token::{clear_credential, load_credential, save_credential, Credential};
