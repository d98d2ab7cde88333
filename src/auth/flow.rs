use reqwest::blocking::Client;
use uuid::Uuid;
use super::callback::CallbackServer;
use super::secret::OAuthClientConfig;
use super::source::{token_request, TokenSource};
use super::token::{load_credential, save_credential, Credential};
use crate::config::AppConfig;
use crate::error::MoverError;

/// Get a token source: the cached credential when it loads, otherwise a fresh
/// browser authorization whose result is cached before returning.
pub fn obtain_token_source(
    config: &AppConfig,
    oauth: OAuthClientConfig,
    http: Client,
) -> Result<TokenSource, MoverError> {
    match load_credential(&config.token_path) {
        Ok(credential) => {
            log::debug!("Using cached credential {}", config.token_path.display());
            return Ok(TokenSource::new(oauth, credential, http));
        }
        Err(e) => log::debug!("No usable cached credential: {}", e),
    }

    let state = Uuid::new_v4().simple().to_string();
    authorize(config, oauth, http, &state)
}

/// Run the browser handshake, exchange the code and cache the credential.
/// `state` must come back unchanged on the callback.
pub(crate) fn authorize(
    config: &AppConfig,
    mut oauth: OAuthClientConfig,
    http: Client,
    state: &str,
) -> Result<TokenSource, MoverError> {
    oauth.redirect_uri = format!("http://localhost:{}", config.callback_port);

    let server = CallbackServer::bind(("127.0.0.1", config.callback_port), state)?;
    let pending = server.spawn();

    let auth_url = oauth.auth_code_url(state)?;
    println!(
        "Go to the following link in your browser. This will kick off the OAuth workflow for move-gtasks.\n\n{}\n\nA callback web server is running waiting to receive the response from Google indicating you've completed the workflow.",
        auth_url
    );

    let code = pending.wait()?;
    let credential = exchange_code(&http, &oauth, &code)?;

    println!("Saving credential file to: {}", config.token_path.display());
    save_credential(&config.token_path, &credential)?;
    Ok(TokenSource::new(oauth, credential, http))
}

/// Trade an authorization code for a credential at the token endpoint
pub fn exchange_code(http: &Client, oauth: &OAuthClientConfig, code: &str) -> Result<Credential, MoverError> {
    log::debug!("Exchanging authorization code at {}", oauth.token_uri);
    token_request(
        http,
        &oauth.token_uri,
        &[
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )
    .map(|response| response.into_credential(None))
    .map_err(MoverError::TokenExchange)
}
