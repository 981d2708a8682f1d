//! Connection settings for the Spotify client.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CLIENT_ID: &str = "492e1e45ea814fa3ac555fe1576aaf5b";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8898/login";
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1/";
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Scopes needed by the four facade groups.
pub const SCOPES: &str = "user-read-playback-state user-modify-playback-state user-read-currently-playing playlist-read-private playlist-read-collaborative user-read-private user-top-read user-read-recently-played";

/// Every scope the Spotify accounts service documents.
const KNOWN_SCOPES: &[&str] = &[
    "ugc-image-upload",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "app-remote-control",
    "streaming",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "user-follow-modify",
    "user-follow-read",
    "user-read-playback-position",
    "user-top-read",
    "user-read-recently-played",
    "user-library-modify",
    "user-library-read",
    "user-read-email",
    "user-read-private",
];

const REFRESH_TOKEN_FILE: &str = "refresh_token";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Where the refresh token is kept between runs
    pub cache_dir: PathBuf,
    pub api_base_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: SCOPES.split_whitespace().map(str::to_string).collect(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl SpotifyConfig {
    pub fn refresh_token_path(&self) -> PathBuf {
        self.cache_dir.join(REFRESH_TOKEN_FILE)
    }

    /// Scopes claimed by the access token. Only scopes Spotify knows are kept,
    /// matching what the OAuth flow requests.
    pub fn scope_set(&self) -> HashSet<String> {
        self.known_scopes().map(str::to_string).collect()
    }

    fn known_scopes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scopes
            .iter()
            .filter_map(|scope| KNOWN_SCOPES.iter().copied().find(|k| *k == scope.trim()))
    }

    /// Configured scopes as the static strings the OAuth client takes.
    /// Scopes Spotify does not know are skipped.
    pub(crate) fn oauth_scopes(&self) -> Vec<&'static str> {
        for scope in &self.scopes {
            if !KNOWN_SCOPES.contains(&scope.trim()) {
                tracing::warn!(scope = %scope, "Ignoring unknown OAuth scope");
            }
        }
        self.known_scopes().collect()
    }

    /// Base URL with the trailing slash rspotify joins endpoints onto.
    pub fn normalized_api_base_url(&self) -> String {
        let mut url = self.api_base_url.trim().to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }
}
