//! Spotify Web API collaborator with token refresh support

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rspotify::{
    http::HttpError,
    model::{
        AdditionalType, AlbumId, ArtistId, CurrentPlaybackContext, CursorBasedPage, Device, FullAlbum, FullArtist,
        FullTrack, Market, Page, PlayContextId, PlayHistory, PlayableId, PrivateUser, RepeatState,
        SearchResult, SearchType, SimplifiedPlaylist, TimeLimits, TimeRange, TrackId,
    },
    prelude::*,
    AuthCodeSpotify, ClientError, Config, Credentials, OAuth, Token,
};
use tokio::sync::{Mutex, RwLock};

use super::SpotifyApi;
use crate::auth::{self, AuthSession};
use crate::config::SpotifyConfig;
use crate::error::{ApiError, ApiResult};
use crate::{log_api_request, log_api_result};

/// Refresh when less than this many seconds of validity remain.
const REFRESH_MARGIN_SECS: i64 = 300;

/// `rspotify` client plus the token pair needed to keep it authenticated
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
    config: Arc<SpotifyConfig>,
    refresh_token: Arc<RwLock<Option<String>>>,
    token_expires_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    /// Held for the whole refresh so concurrent calls reuse one new token.
    refresh_lock: Arc<Mutex<()>>,
}

impl SpotifyClient {
    /// Build a client around an already obtained session.
    pub async fn connect(config: &SpotifyConfig, session: AuthSession) -> ApiResult<Self> {
        let client = AuthCodeSpotify::with_config(
            Credentials::new_pkce(&config.client_id),
            OAuth {
                redirect_uri: config.redirect_uri.clone(),
                scopes: config.scope_set(),
                ..Default::default()
            },
            Config {
                api_base_url: config.normalized_api_base_url(),
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );
        tracing::debug!(api_base_url = %config.normalized_api_base_url(), "rspotify client initialized");

        let expires_at = session.expires_at();
        let spotify = Self {
            client: Arc::new(client),
            config: Arc::new(config.clone()),
            refresh_token: Arc::new(RwLock::new(session.refresh_token)),
            token_expires_at: Arc::new(RwLock::new(expires_at)),
            refresh_lock: Arc::new(Mutex::new(())),
        };
        spotify.install_token(session.token).await?;
        Ok(spotify)
    }

    /// Authenticate (cached refresh token or browser flow) and connect.
    pub async fn login(config: &SpotifyConfig) -> anyhow::Result<Self> {
        let session = auth::perform_oauth_flow(config).await?;
        Ok(Self::connect(config, session).await?)
    }

    async fn install_token(&self, token: Token) -> ApiResult<()> {
        let mut guard = self
            .client
            .token
            .lock()
            .await
            .map_err(|_| ApiError::Other("token lock poisoned".to_string()))?;
        *guard = Some(token);
        tracing::debug!("rspotify token set");
        Ok(())
    }

    pub async fn token_needs_refresh(&self) -> bool {
        if self.refresh_token.read().await.is_none() {
            return false;
        }
        match *self.token_expires_at.read().await {
            Some(exp) => (exp - Utc::now()).num_seconds() < REFRESH_MARGIN_SECS,
            None => false,
        }
    }

    pub async fn refresh_token_if_needed(&self) -> ApiResult<bool> {
        if !self.token_needs_refresh().await {
            return Ok(false);
        }
        let _guard = self.refresh_lock.lock().await;
        // another call may have refreshed while this one waited
        if !self.token_needs_refresh().await {
            return Ok(false);
        }
        tracing::info!("Token expiring soon, refreshing...");
        self.refresh_locked().await?;
        Ok(true)
    }

    async fn refresh_now(&self) -> ApiResult<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Caller holds `refresh_lock`.
    async fn refresh_locked(&self) -> ApiResult<()> {
        let Some(refresh_token) = self.refresh_token.read().await.clone() else {
            return Err(ApiError::Reauthentication("no refresh token held".to_string()));
        };

        match auth::refresh_access_token(&self.config, &refresh_token).await {
            Ok(refreshed) => {
                let token = auth::rspotify_token(&self.config, refreshed.access_token, refreshed.expires_at);
                self.install_token(token).await?;

                *self.refresh_token.write().await = Some(refreshed.refresh_token);
                *self.token_expires_at.write().await = Some(refreshed.expires_at);

                tracing::info!("Token refreshed successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh token");
                Err(ApiError::Reauthentication(e.to_string()))
            }
        }
    }

    /// Run one request: refresh the token if due, then await and map the result.
    async fn call<T, F>(&self, operation: &'static str, request: F) -> ApiResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.refresh_token_if_needed().await?;
        let result = match request.await {
            Ok(value) => Ok(value),
            Err(e) => Err(from_client_error(e).await),
        };
        log_api_result!(operation, result);
        result
    }
}

/// Flatten an `rspotify` failure, reading the error body of status responses.
async fn from_client_error(err: ClientError) -> ApiError {
    match err {
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                ApiError::from_status(status, &body)
            }
            HttpError::Client(e) => ApiError::Transport(e.to_string()),
        },
        ClientError::ParseJson(e) => ApiError::Parse(e.to_string()),
        ClientError::Io(e) => ApiError::Transport(e.to_string()),
        other => ApiError::Other(other.to_string()),
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_playback(&self) -> ApiResult<Option<CurrentPlaybackContext>> {
        tracing::trace!("Fetching current playback state");
        let result = self
            .call(
                "current_playback",
                self.client
                    .current_playback(None, Some([&AdditionalType::Track, &AdditionalType::Episode])),
            )
            .await?;
        if let Some(ref playback) = result {
            tracing::trace!(
                is_playing = playback.is_playing,
                device = ?playback.device.name,
                "Got playback state"
            );
        }
        Ok(result)
    }

    async fn devices(&self) -> ApiResult<Vec<Device>> {
        log_api_request!("devices");
        let devices = self.call("devices", self.client.device()).await?;
        tracing::debug!(count = devices.len(), "Found devices");
        Ok(devices)
    }

    async fn resume(&self, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("resume_playback", device_id = ?device);
        self.call("resume_playback", self.client.resume_playback(device, None)).await
    }

    async fn pause(&self, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("pause_playback", device_id = ?device);
        self.call("pause_playback", self.client.pause_playback(device)).await
    }

    async fn next_track(&self, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("next_track", device_id = ?device);
        self.call("next_track", self.client.next_track(device)).await
    }

    async fn previous_track(&self, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("previous_track", device_id = ?device);
        self.call("previous_track", self.client.previous_track(device)).await
    }

    async fn seek(&self, position_ms: u32, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("seek_track", position_ms, device_id = ?device);
        let position = chrono::Duration::milliseconds(i64::from(position_ms));
        self.call("seek_track", self.client.seek_track(position, device)).await
    }

    async fn set_volume(&self, percent: u8, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("volume", percent, device_id = ?device);
        self.call("volume", self.client.volume(percent, device)).await
    }

    async fn set_shuffle(&self, state: bool, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("shuffle", state, device_id = ?device);
        self.call("shuffle", self.client.shuffle(state, device)).await
    }

    async fn set_repeat(&self, state: RepeatState, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("repeat", state = ?state, device_id = ?device);
        self.call("repeat", self.client.repeat(state, device)).await
    }

    async fn add_to_queue(&self, track: TrackId<'static>, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("add_item_to_queue", track_id = track.id(), device_id = ?device);
        self.call(
            "add_item_to_queue",
            self.client.add_item_to_queue(PlayableId::Track(track), device),
        )
        .await
    }

    async fn transfer_playback(&self, device_id: &str, play: bool) -> ApiResult<()> {
        log_api_request!("transfer_playback", device_id, play);
        self.call("transfer_playback", self.client.transfer_playback(device_id, Some(play)))
            .await
    }

    async fn start_context(&self, context: PlayContextId<'static>, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("start_context_playback", context = %context.uri(), device_id = ?device);
        self.call(
            "start_context_playback",
            self.client.start_context_playback(context, device, None, None),
        )
        .await
    }

    async fn start_tracks(&self, tracks: Vec<TrackId<'static>>, device: Option<&str>) -> ApiResult<()> {
        log_api_request!("start_uris_playback", count = tracks.len(), device_id = ?device);
        let uris: Vec<PlayableId<'static>> = tracks.into_iter().map(PlayableId::Track).collect();
        self.call(
            "start_uris_playback",
            self.client.start_uris_playback(uris, device, None, None),
        )
        .await
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> ApiResult<Vec<FullTrack>> {
        log_api_request!("search", query, limit);
        // No market: Spotify falls back to the account's country
        let market: Option<Market> = None;
        let result = self
            .call(
                "search",
                self.client.search(query, SearchType::Track, market, None, Some(limit), None),
            )
            .await?;
        match result {
            SearchResult::Tracks(page) => Ok(page.items),
            _ => {
                tracing::warn!(query, "Track search returned another result kind");
                Ok(Vec::new())
            }
        }
    }

    async fn me(&self) -> ApiResult<PrivateUser> {
        log_api_request!("me");
        self.call("me", self.client.me()).await
    }

    async fn top_artists(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullArtist>> {
        log_api_request!("current_user_top_artists", range = ?range, limit, offset);
        self.call(
            "current_user_top_artists",
            self.client
                .current_user_top_artists_manual(Some(range), Some(limit), Some(offset)),
        )
        .await
    }

    async fn top_tracks(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullTrack>> {
        log_api_request!("current_user_top_tracks", range = ?range, limit, offset);
        self.call(
            "current_user_top_tracks",
            self.client
                .current_user_top_tracks_manual(Some(range), Some(limit), Some(offset)),
        )
        .await
    }

    async fn playlists(&self, limit: u32, offset: u32) -> ApiResult<Page<SimplifiedPlaylist>> {
        log_api_request!("current_user_playlists", limit, offset);
        self.call(
            "current_user_playlists",
            self.client.current_user_playlists_manual(Some(limit), Some(offset)),
        )
        .await
    }

    async fn recently_played(
        &self,
        limit: u32,
        window: Option<TimeLimits>,
    ) -> ApiResult<CursorBasedPage<PlayHistory>> {
        log_api_request!("current_user_recently_played", limit, window = ?window);
        self.call(
            "current_user_recently_played",
            self.client.current_user_recently_played(Some(limit), window),
        )
        .await
    }

    async fn track(&self, id: TrackId<'static>) -> ApiResult<FullTrack> {
        log_api_request!("track", track_id = id.id());
        self.call("track", self.client.track(id, None)).await
    }

    async fn artist(&self, id: ArtistId<'static>) -> ApiResult<FullArtist> {
        log_api_request!("artist", artist_id = id.id());
        self.call("artist", self.client.artist(id)).await
    }

    async fn album(&self, id: AlbumId<'static>) -> ApiResult<FullAlbum> {
        log_api_request!("album", album_id = id.id());
        self.call("album", self.client.album(id, None)).await
    }

    async fn artist_top_tracks(&self, id: ArtistId<'static>) -> ApiResult<Vec<FullTrack>> {
        log_api_request!("artist_top_tracks", artist_id = id.id());
        // FromToken uses the user's account country
        self.call(
            "artist_top_tracks",
            self.client.artist_top_tracks(id, Some(Market::FromToken)),
        )
        .await
    }

    async fn reauthenticate(&self) -> ApiResult<()> {
        tracing::info!("Re-authenticating on request");
        let result = self.refresh_now().await;
        log_api_result!("reauthenticate", result);
        result
    }
}
