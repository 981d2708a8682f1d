//! Fixtures and an in-memory collaborator for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rspotify::model::{
    AlbumId, ArtistId, CurrentPlaybackContext, CursorBasedPage, Device, FullAlbum, FullArtist,
    FullTrack, Page, PlayContextId, PlayHistory, PrivateUser, RepeatState, SimplifiedPlaylist,
    TimeLimits, TimeRange, TrackId,
};
use rspotify::prelude::Id;

use crate::client::SpotifyApi;
use crate::error::{ApiError, ApiResult};

pub const PAUSED_TRACK_ID: &str = "4iV5W9uYEdYUVa79Axb7Rh";
pub const ARTIST_ID: &str = "0OdUWJ0sBjDrqHygGUXeCF";
pub const ALBUM_ID: &str = "6akEvsycLGftJxYudPjmqK";
pub const DEVICE_ID: &str = "74ASZWbe4lXaubB36ztrGX";

pub mod fixtures {
    use rspotify::model::{
        CurrentPlaybackContext, CursorBasedPage, Device, FullAlbum, FullArtist, FullTrack, Page,
        PlayHistory, PrivateUser, SimplifiedPlaylist,
    };
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use serde_json::{json, Value};

    use super::{ALBUM_ID, ARTIST_ID, DEVICE_ID, PAUSED_TRACK_ID};

    const COVER_URL: &str = "https://i.scdn.co/image/ab67616d0000b273windowlicker";

    fn parse<T: DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).expect("fixture matches the rspotify model")
    }

    fn urls(kind: &str, id: &str) -> Value {
        json!({ "spotify": format!("https://open.spotify.com/{kind}/{id}") })
    }

    fn simplified_artist_json() -> Value {
        json!({
            "external_urls": urls("artist", ARTIST_ID),
            "href": format!("https://api.spotify.com/v1/artists/{ARTIST_ID}"),
            "id": ARTIST_ID,
            "name": "Aphex Twin",
            "type": "artist",
            "uri": format!("spotify:artist:{ARTIST_ID}"),
        })
    }

    fn image_json() -> Value {
        json!({ "url": COVER_URL, "height": 640, "width": 640 })
    }

    fn simplified_album_json() -> Value {
        json!({
            "album_type": "single",
            "artists": [simplified_artist_json()],
            "available_markets": [],
            "external_urls": urls("album", ALBUM_ID),
            "href": format!("https://api.spotify.com/v1/albums/{ALBUM_ID}"),
            "id": ALBUM_ID,
            "images": [image_json()],
            "name": "Windowlicker",
            "release_date": "1999-03-22",
            "release_date_precision": "day",
            "total_tracks": 2,
            "type": "album",
            "uri": format!("spotify:album:{ALBUM_ID}"),
        })
    }

    pub fn full_track_json(id: &str, name: &str, duration_ms: u32) -> Value {
        json!({
            "album": simplified_album_json(),
            "artists": [simplified_artist_json()],
            "available_markets": [],
            "disc_number": 1,
            "duration_ms": duration_ms,
            "explicit": false,
            "external_ids": { "isrc": "GBBPW9900001" },
            "external_urls": urls("track", id),
            "href": format!("https://api.spotify.com/v1/tracks/{id}"),
            "id": id,
            "is_local": false,
            "name": name,
            "popularity": 61,
            "preview_url": null,
            "track_number": 1,
            "type": "track",
            "uri": format!("spotify:track:{id}"),
        })
    }

    pub fn full_track(id: &str, name: &str, duration_ms: u32) -> FullTrack {
        parse(full_track_json(id, name, duration_ms))
    }

    fn simplified_track_json(id: &str, name: &str, track_number: u32) -> Value {
        json!({
            "artists": [simplified_artist_json()],
            "available_markets": [],
            "disc_number": 1,
            "duration_ms": 366_000,
            "explicit": false,
            "external_urls": urls("track", id),
            "href": format!("https://api.spotify.com/v1/tracks/{id}"),
            "id": id,
            "is_local": false,
            "name": name,
            "preview_url": null,
            "track_number": track_number,
            "type": "track",
            "uri": format!("spotify:track:{id}"),
        })
    }

    pub fn full_album() -> FullAlbum {
        let tracks = vec![
            simplified_track_json(PAUSED_TRACK_ID, "Windowlicker", 1),
            simplified_track_json("6dVGTfBRsFnNnRxlYSLAfy", "Nannou", 2),
        ];
        parse(json!({
            "album_type": "single",
            "artists": [simplified_artist_json()],
            "available_markets": [],
            "copyrights": [],
            "external_ids": { "upc": "5021603064325" },
            "external_urls": urls("album", ALBUM_ID),
            "genres": [],
            "href": format!("https://api.spotify.com/v1/albums/{ALBUM_ID}"),
            "id": ALBUM_ID,
            "images": [image_json()],
            "label": "Warp Records",
            "name": "Windowlicker",
            "popularity": 48,
            "release_date": "1999-03-22",
            "release_date_precision": "day",
            "total_tracks": 2,
            "tracks": page_json(tracks, 0, 2),
            "type": "album",
            "uri": format!("spotify:album:{ALBUM_ID}"),
        }))
    }

    pub fn full_artist(id: &str, name: &str) -> FullArtist {
        parse(json!({
            "external_urls": urls("artist", id),
            "followers": { "href": null, "total": 1_900_000 },
            "genres": ["ambient", "idm"],
            "href": format!("https://api.spotify.com/v1/artists/{id}"),
            "id": id,
            "images": [image_json()],
            "name": name,
            "popularity": 66,
            "type": "artist",
            "uri": format!("spotify:artist:{id}"),
        }))
    }

    pub fn private_user() -> PrivateUser {
        parse(json!({
            "display_name": "JM Wizzler",
            "external_urls": { "spotify": "https://open.spotify.com/user/wizzler" },
            "followers": { "href": null, "total": 3829 },
            "href": "https://api.spotify.com/v1/users/wizzler",
            "id": "wizzler",
            "images": [],
            "type": "user",
            "uri": "spotify:user:wizzler",
        }))
    }

    pub fn simplified_playlist() -> SimplifiedPlaylist {
        parse(json!({
            "collaborative": false,
            "external_urls": urls("playlist", "37i9dQZF1DXcBWIGoYBM5M"),
            "href": "https://api.spotify.com/v1/playlists/37i9dQZF1DXcBWIGoYBM5M",
            "id": "37i9dQZF1DXcBWIGoYBM5M",
            "images": [],
            "name": "Today's Top Hits",
            "owner": {
                "display_name": "Spotify",
                "external_urls": { "spotify": "https://open.spotify.com/user/spotify" },
                "href": "https://api.spotify.com/v1/users/spotify",
                "id": "spotify",
                "images": [],
                "type": "user",
                "uri": "spotify:user:spotify",
            },
            "public": true,
            "snapshot_id": "MTY4NzQ2NjQwMCwwMDAwMDAwMA==",
            "tracks": { "href": "https://api.spotify.com/v1/playlists/37i9dQZF1DXcBWIGoYBM5M/tracks", "total": 50 },
            "type": "playlist",
            "uri": "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
        }))
    }

    pub fn play_history() -> PlayHistory {
        parse(json!({
            "track": full_track_json(PAUSED_TRACK_ID, "Windowlicker", 366_000),
            "played_at": "2026-10-16T21:14:03.000Z",
            "context": null,
        }))
    }

    pub fn device_json(id: &str, name: &str, is_active: bool) -> Value {
        json!({
            "id": id,
            "is_active": is_active,
            "is_private_session": false,
            "is_restricted": false,
            "name": name,
            "type": "Computer",
            "volume_percent": 64,
            "supports_volume": true,
        })
    }

    pub fn device(id: &str, name: &str, is_active: bool) -> Device {
        parse(device_json(id, name, is_active))
    }

    pub fn playback_json(is_playing: bool, progress_ms: u32) -> Value {
        json!({
            "device": device_json(DEVICE_ID, "Living Room", true),
            "repeat_state": "off",
            "shuffle_state": false,
            "context": null,
            "timestamp": 1_792_188_843_000_i64,
            "progress_ms": progress_ms,
            "is_playing": is_playing,
            "item": full_track_json(PAUSED_TRACK_ID, "Windowlicker", 366_000),
            "currently_playing_type": "track",
            "actions": { "disallows": {} },
        })
    }

    pub fn playback(is_playing: bool, progress_ms: u32) -> CurrentPlaybackContext {
        parse(playback_json(is_playing, progress_ms))
    }

    pub fn page_json<T: Serialize>(items: Vec<T>, offset: u32, total: u32) -> Value {
        let limit = items.len();
        json!({
            "href": "https://api.spotify.com/v1/me/top",
            "items": items,
            "limit": limit,
            "next": null,
            "offset": offset,
            "previous": null,
            "total": total,
        })
    }

    pub fn page<T: Serialize + DeserializeOwned>(items: Vec<T>, offset: u32) -> Page<T> {
        let total = offset + items.len() as u32;
        parse(page_json(items, offset, total))
    }

    pub fn cursor_page<T: Serialize + DeserializeOwned>(items: Vec<T>) -> CursorBasedPage<T> {
        let limit = items.len();
        parse(json!({
            "href": "https://api.spotify.com/v1/me/player/recently-played",
            "items": items,
            "limit": limit,
            "next": null,
            "cursors": { "after": "1792188843000", "before": "1792188000000" },
            "total": null,
        }))
    }
}

/// One collaborator call as seen by [`FakeSpotify`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: &'static str,
    pub device: Option<String>,
    pub arg: Option<String>,
}

#[derive(Default)]
struct FakeState {
    playback: Option<CurrentPlaybackContext>,
    devices: Vec<Device>,
    search_results: Vec<FullTrack>,
    tracks: HashMap<String, FullTrack>,
    artists: HashMap<String, FullArtist>,
    albums: HashMap<String, FullAlbum>,
    failures: HashMap<&'static str, ApiError>,
    calls: Vec<RecordedCall>,
}

/// In-memory collaborator with canned responses and a call log.
///
/// Clones share state, so a test can keep one handle while the facade owns another.
#[derive(Clone, Default)]
pub struct FakeSpotify {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with the Windowlicker fixture loaded.
    pub fn with_playback(is_playing: bool, progress_ms: u32) -> Self {
        let fake = Self::new();
        fake.set_playback(Some(fixtures::playback(is_playing, progress_ms)));
        fake
    }

    /// A catalog holding the fixture track, artist and album.
    pub fn with_catalog() -> Self {
        let fake = Self::new();
        fake.add_track(fixtures::full_track(PAUSED_TRACK_ID, "Windowlicker", 366_000));
        fake.add_artist(fixtures::full_artist(ARTIST_ID, "Aphex Twin"));
        fake.add_album(fixtures::full_album());
        fake
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    pub fn set_playback(&self, playback: Option<CurrentPlaybackContext>) {
        self.state().playback = playback;
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        self.state().devices = devices;
    }

    pub fn set_search_results(&self, tracks: Vec<FullTrack>) {
        self.state().search_results = tracks;
    }

    pub fn add_track(&self, track: FullTrack) {
        let id = track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default();
        self.state().tracks.insert(id, track);
    }

    pub fn add_artist(&self, artist: FullArtist) {
        self.state().artists.insert(artist.id.id().to_string(), artist);
    }

    pub fn add_album(&self, album: FullAlbum) {
        self.state().albums.insert(album.id.id().to_string(), album);
    }

    /// Make every later call to `op` fail with `err`.
    pub fn fail_with(&self, op: &'static str, err: ApiError) {
        self.state().failures.insert(op, err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.iter().map(|c| c.op.to_string()).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn last_call(&self, op: &str) -> Option<RecordedCall> {
        self.state().calls.iter().rev().find(|c| c.op == op).cloned()
    }

    fn record(&self, op: &'static str, device: Option<&str>, arg: Option<String>) -> ApiResult<()> {
        let mut state = self.state();
        state.calls.push(RecordedCall { op, device: device.map(str::to_string), arg });
        match state.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn missing(kind: &str) -> ApiError {
    ApiError::from_status(404, &format!(r#"{{"error":{{"status":404,"message":"Non existing {kind} id"}}}}"#))
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_playback(&self) -> ApiResult<Option<CurrentPlaybackContext>> {
        self.record("current_playback", None, None)?;
        Ok(self.state().playback.clone())
    }

    async fn devices(&self) -> ApiResult<Vec<Device>> {
        self.record("devices", None, None)?;
        Ok(self.state().devices.clone())
    }

    async fn resume(&self, device: Option<&str>) -> ApiResult<()> {
        self.record("resume", device, None)
    }

    async fn pause(&self, device: Option<&str>) -> ApiResult<()> {
        self.record("pause", device, None)
    }

    async fn next_track(&self, device: Option<&str>) -> ApiResult<()> {
        self.record("next_track", device, None)
    }

    async fn previous_track(&self, device: Option<&str>) -> ApiResult<()> {
        self.record("previous_track", device, None)
    }

    async fn seek(&self, position_ms: u32, device: Option<&str>) -> ApiResult<()> {
        self.record("seek", device, Some(position_ms.to_string()))
    }

    async fn set_volume(&self, percent: u8, device: Option<&str>) -> ApiResult<()> {
        self.record("set_volume", device, Some(percent.to_string()))
    }

    async fn set_shuffle(&self, state: bool, device: Option<&str>) -> ApiResult<()> {
        self.record("set_shuffle", device, Some(state.to_string()))
    }

    async fn set_repeat(&self, state: RepeatState, device: Option<&str>) -> ApiResult<()> {
        self.record("set_repeat", device, Some(format!("{state:?}")))
    }

    async fn add_to_queue(&self, track: TrackId<'static>, device: Option<&str>) -> ApiResult<()> {
        self.record("add_to_queue", device, Some(track.id().to_string()))
    }

    async fn transfer_playback(&self, device_id: &str, play: bool) -> ApiResult<()> {
        self.record("transfer_playback", Some(device_id), Some(play.to_string()))
    }

    async fn start_context(&self, context: PlayContextId<'static>, device: Option<&str>) -> ApiResult<()> {
        self.record("start_context", device, Some(context.uri()))
    }

    async fn start_tracks(&self, tracks: Vec<TrackId<'static>>, device: Option<&str>) -> ApiResult<()> {
        let ids: Vec<&str> = tracks.iter().map(|t| t.id()).collect();
        self.record("start_tracks", device, Some(ids.join(",")))
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> ApiResult<Vec<FullTrack>> {
        self.record("search_tracks", None, Some(format!("{query}|{limit}")))?;
        let results = self.state().search_results.clone();
        Ok(results.into_iter().take(limit as usize).collect())
    }

    async fn me(&self) -> ApiResult<PrivateUser> {
        self.record("me", None, None)?;
        Ok(fixtures::private_user())
    }

    async fn top_artists(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullArtist>> {
        self.record("top_artists", None, Some(format!("{range:?}|{limit}|{offset}")))?;
        let artists = vec![
            fixtures::full_artist(ARTIST_ID, "Aphex Twin"),
            fixtures::full_artist("4Z8W4fKeB5YxbusRsdQVPb", "Radiohead"),
        ];
        Ok(fixtures::page(artists, offset))
    }

    async fn top_tracks(&self, range: TimeRange, limit: u32, offset: u32) -> ApiResult<Page<FullTrack>> {
        self.record("top_tracks", None, Some(format!("{range:?}|{limit}|{offset}")))?;
        let tracks = vec![fixtures::full_track(PAUSED_TRACK_ID, "Windowlicker", 366_000)];
        Ok(fixtures::page(tracks, offset))
    }

    async fn playlists(&self, limit: u32, offset: u32) -> ApiResult<Page<SimplifiedPlaylist>> {
        self.record("playlists", None, Some(format!("{limit}|{offset}")))?;
        Ok(fixtures::page(vec![fixtures::simplified_playlist()], offset))
    }

    async fn recently_played(
        &self,
        limit: u32,
        window: Option<TimeLimits>,
    ) -> ApiResult<CursorBasedPage<PlayHistory>> {
        self.record("recently_played", None, Some(format!("{limit}|{window:?}")))?;
        Ok(fixtures::cursor_page(vec![fixtures::play_history()]))
    }

    async fn track(&self, id: TrackId<'static>) -> ApiResult<FullTrack> {
        self.record("track", None, Some(id.id().to_string()))?;
        self.state().tracks.get(id.id()).cloned().ok_or_else(|| missing("track"))
    }

    async fn artist(&self, id: ArtistId<'static>) -> ApiResult<FullArtist> {
        self.record("artist", None, Some(id.id().to_string()))?;
        self.state().artists.get(id.id()).cloned().ok_or_else(|| missing("artist"))
    }

    async fn album(&self, id: AlbumId<'static>) -> ApiResult<FullAlbum> {
        self.record("album", None, Some(id.id().to_string()))?;
        self.state().albums.get(id.id()).cloned().ok_or_else(|| missing("album"))
    }

    async fn artist_top_tracks(&self, id: ArtistId<'static>) -> ApiResult<Vec<FullTrack>> {
        self.record("artist_top_tracks", None, Some(id.id().to_string()))?;
        if !self.state().artists.contains_key(id.id()) {
            return Err(missing("artist"));
        }
        Ok(vec![
            fixtures::full_track(PAUSED_TRACK_ID, "Windowlicker", 366_000),
            fixtures::full_track("3aXnLIJ6gXE6Lx9Q7t1Jzr", "Avril 14th", 125_000),
        ])
    }

    async fn reauthenticate(&self) -> ApiResult<()> {
        self.record("reauthenticate", None, None)
    }
}
