use std::fs;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rspotify::Token;

use crate::config::SpotifyConfig;

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><script>window.close();</script></body>
</html>
"#;

/// Access tokens from the accounts service are valid for one hour.
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Token pair handed to the collaborator at construction.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub token: Token,
    pub refresh_token: Option<String>,
}

impl AuthSession {
    /// Session around an access token obtained elsewhere; it cannot be refreshed.
    pub fn from_access_token(config: &SpotifyConfig, access_token: impl Into<String>) -> Self {
        Self {
            token: rspotify_token(config, access_token.into(), token_expiry()),
            refresh_token: None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.expires_at
    }
}

/// Result of a refresh against the accounts service.
#[derive(Clone, Debug)]
pub struct RefreshedToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

fn token_expiry() -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(TOKEN_LIFETIME_SECS)
}

pub(crate) fn rspotify_token(config: &SpotifyConfig, access_token: String, expires_at: DateTime<Utc>) -> Token {
    Token {
        access_token,
        expires_in: chrono::Duration::seconds(TOKEN_LIFETIME_SECS),
        expires_at: Some(expires_at),
        scopes: config.scope_set(),
        refresh_token: None,
    }
}

fn oauth_builder(config: &SpotifyConfig) -> librespot_oauth::OAuthClientBuilder {
    librespot_oauth::OAuthClientBuilder::new(
        &config.client_id,
        &config.redirect_uri,
        config.oauth_scopes(),
    )
}

fn store_refresh_token(config: &SpotifyConfig, refresh_token: &str) {
    let path = config.refresh_token_path();
    if let Err(e) = fs::create_dir_all(&config.cache_dir).and_then(|_| fs::write(&path, refresh_token)) {
        tracing::warn!(error = %e, path = %path.display(), "Could not persist refresh token");
    } else {
        tracing::debug!("Saved refresh token to disk");
    }
}

async fn perform_browser_auth(config: &SpotifyConfig) -> Result<AuthSession> {
    tracing::info!("Starting browser-based OAuth flow");
    let client = oauth_builder(config)
        .open_in_browser()
        .with_custom_message(RESPONSE)
        .build()?;

    let token = client.get_access_token_async().await?;

    store_refresh_token(config, &token.refresh_token);

    tracing::info!("Browser authentication completed successfully");
    Ok(AuthSession {
        token: rspotify_token(config, token.access_token, token_expiry()),
        refresh_token: Some(token.refresh_token),
    })
}

/// Exchange a refresh token for a fresh access token and persist the new refresh token.
pub async fn refresh_access_token(config: &SpotifyConfig, refresh_token: &str) -> Result<RefreshedToken> {
    let oauth_client = oauth_builder(config).build()?;
    let new_token = oauth_client.refresh_token_async(refresh_token).await?;

    store_refresh_token(config, &new_token.refresh_token);
    tracing::debug!("Token refreshed successfully");

    Ok(RefreshedToken {
        access_token: new_token.access_token,
        refresh_token: new_token.refresh_token,
        expires_at: token_expiry(),
    })
}

/// Reuse the cached refresh token when the accounts service still accepts it,
/// otherwise fall back to the browser flow.
pub async fn perform_oauth_flow(config: &SpotifyConfig) -> Result<AuthSession> {
    let stored_refresh_token = fs::read_to_string(config.refresh_token_path())
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(refresh_token) = stored_refresh_token {
        tracing::info!("Found cached refresh token");

        match refresh_access_token(config, &refresh_token).await {
            Ok(refreshed) => {
                return Ok(AuthSession {
                    token: rspotify_token(config, refreshed.access_token, refreshed.expires_at),
                    refresh_token: Some(refreshed.refresh_token),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached refresh token failed, re-authenticating");
            }
        }
    } else {
        tracing::info!("No cached credentials found, starting browser authentication");
    }

    perform_browser_auth(config).await
}
