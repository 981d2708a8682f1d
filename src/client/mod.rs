//! The authenticated collaborator the facade calls through.
//!
//! `SpotifyApi` is the seam: one method per remote operation, typed ids in,
//! raw `rspotify` models out. `SpotifyClient` is the production
//! implementation over `rspotify::AuthCodeSpotify`.

mod spotify_client;

pub use spotify_client::SpotifyClient;

use async_trait::async_trait;
use rspotify::model::{
    AlbumId, ArtistId, CurrentPlaybackContext, CursorBasedPage, Device, FullAlbum, FullArtist,
    FullTrack, Page, PlayContextId, PlayHistory, PrivateUser, RepeatState, SimplifiedPlaylist,
    TimeLimits, TimeRange, TrackId,
};

use crate::error::ApiResult;

/// Remote operations used by the facade.
///
/// `device` arguments select the target device; `None` means the user's
/// currently active one.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// `None` when the user has no playback session.
    async fn current_playback(&self) -> ApiResult<Option<CurrentPlaybackContext>>;
    async fn devices(&self) -> ApiResult<Vec<Device>>;

    async fn resume(&self, device: Option<&str>) -> ApiResult<()>;
    async fn pause(&self, device: Option<&str>) -> ApiResult<()>;
    async fn next_track(&self, device: Option<&str>) -> ApiResult<()>;
    async fn previous_track(&self, device: Option<&str>) -> ApiResult<()>;
    async fn seek(&self, position_ms: u32, device: Option<&str>) -> ApiResult<()>;
    async fn set_volume(&self, percent: u8, device: Option<&str>) -> ApiResult<()>;
    async fn set_shuffle(&self, state: bool, device: Option<&str>) -> ApiResult<()>;
    async fn set_repeat(&self, state: RepeatState, device: Option<&str>) -> ApiResult<()>;
    async fn add_to_queue(&self, track: TrackId<'static>, device: Option<&str>) -> ApiResult<()>;
    async fn transfer_playback(&self, device_id: &str, play: bool) -> ApiResult<()>;
    async fn start_context(&self, context: PlayContextId<'static>, device: Option<&str>) -> ApiResult<()>;
    async fn start_tracks(&self, tracks: Vec<TrackId<'static>>, device: Option<&str>) -> ApiResult<()>;

    async fn search_tracks(&self, query: &str, limit: u32) -> ApiResult<Vec<FullTrack>>;

    async fn me(&self) -> ApiResult<PrivateUser>;
    async fn top_artists(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullArtist>>;
    async fn top_tracks(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullTrack>>;
    async fn playlists(&self, limit: u32, offset: u32) -> ApiResult<Page<SimplifiedPlaylist>>;
    async fn recently_played(
        &self,
        limit: u32,
        window: Option<TimeLimits>,
    ) -> ApiResult<CursorBasedPage<PlayHistory>>;

    async fn track(&self, id: TrackId<'static>) -> ApiResult<FullTrack>;
    async fn artist(&self, id: ArtistId<'static>) -> ApiResult<FullArtist>;
    async fn album(&self, id: AlbumId<'static>) -> ApiResult<FullAlbum>;
    async fn artist_top_tracks(&self, id: ArtistId<'static>) -> ApiResult<Vec<FullTrack>>;

    /// Obtain a fresh access token now.
    async fn reauthenticate(&self) -> ApiResult<()>;
}
