//! Playback commands: play, pause, skip, seek, volume, shuffle, repeat, queue.

use rspotify::prelude::Id;

use crate::client::SpotifyApi;
use crate::error::{EntityKind, Error, Result};
use crate::model::{DeviceInfo, PageRequest, PlaybackSettings, RepeatMode, TrackMatch};
use crate::outcome::{EmptyState, Outcome};

use super::{context_id, player_lookup_outcome, player_outcome, track_id};

const MAX_VOLUME: u8 = 100;

/// Search results returned when no count is given.
pub const DEFAULT_SEARCH_COUNT: u32 = 10;

/// Playback command group. Commands go to the active device unless
/// [`Controls::on_device`] names another one.
pub struct Controls<'a, C> {
    api: &'a C,
    device: Option<String>,
}

impl<'a, C: SpotifyApi> Controls<'a, C> {
    pub(crate) fn new(api: &'a C) -> Self {
        Self { api, device: None }
    }

    /// Send the following commands to `device_id`.
    pub fn on_device(mut self, device_id: impl Into<String>) -> Self {
        let id = device_id.into();
        self.device = Some(id.trim().to_string()).filter(|d| !d.is_empty());
        self
    }

    fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub async fn play(&self) -> Result<Outcome<()>> {
        player_outcome(self.api.resume(self.device()).await)
    }

    /// Start playback of a single track given as id, URI or URL.
    pub async fn play_track(&self, track: &str) -> Result<Outcome<()>> {
        let id = track_id(track)?;
        let raw = id.id().to_string();
        let result = self.api.start_tracks(vec![id], self.device()).await;
        player_lookup_outcome(result, EntityKind::Track, &raw)
    }

    pub async fn pause(&self) -> Result<Outcome<()>> {
        player_outcome(self.api.pause(self.device()).await)
    }

    /// Play or pause. `Some(true)` plays, `Some(false)` pauses and `None`
    /// flips whatever the session is doing now. Returns the new playing flag.
    pub async fn toggle(&self, desired: Option<bool>) -> Result<Outcome<bool>> {
        let play = match desired {
            Some(play) => play,
            None => !self.is_playing().await?,
        };

        let result = if play {
            self.api.resume(self.device()).await
        } else {
            self.api.pause(self.device()).await
        };
        Ok(player_outcome(result)?.map(|_| play))
    }

    pub async fn next(&self) -> Result<Outcome<()>> {
        player_outcome(self.api.next_track(self.device()).await)
    }

    pub async fn previous(&self) -> Result<Outcome<()>> {
        player_outcome(self.api.previous_track(self.device()).await)
    }

    pub async fn seek(&self, position_ms: u32) -> Result<Outcome<()>> {
        player_outcome(self.api.seek(position_ms, self.device()).await)
    }

    pub async fn set_volume(&self, percent: u8) -> Result<Outcome<()>> {
        if percent > MAX_VOLUME {
            return Err(Error::validation(
                "volume",
                format!("{percent} is outside 0..={MAX_VOLUME}"),
            ));
        }
        player_outcome(self.api.set_volume(percent, self.device()).await)
    }

    /// Set shuffle, or toggle it when `state` is `None`. Returns the new state.
    pub async fn set_shuffle(&self, state: Option<bool>) -> Result<Outcome<bool>> {
        let shuffle = match state {
            Some(shuffle) => shuffle,
            None => match self.settings().await? {
                Outcome::Ready(settings) => !settings.shuffle,
                Outcome::Empty(empty) => return Ok(Outcome::Empty(empty)),
            },
        };
        Ok(player_outcome(self.api.set_shuffle(shuffle, self.device()).await)?.map(|_| shuffle))
    }

    /// Set the repeat mode, or cycle it one step when `mode` is `None`.
    pub async fn set_repeat(&self, mode: Option<RepeatMode>) -> Result<Outcome<RepeatMode>> {
        let repeat = match mode {
            Some(repeat) => repeat,
            None => match self.settings().await? {
                Outcome::Ready(settings) => settings.repeat.next(),
                Outcome::Empty(empty) => return Ok(Outcome::Empty(empty)),
            },
        };
        Ok(player_outcome(self.api.set_repeat(repeat.into(), self.device()).await)?.map(|_| repeat))
    }

    /// Shuffle, repeat and device of the current session.
    pub async fn settings(&self) -> Result<Outcome<PlaybackSettings>> {
        match self.api.current_playback().await? {
            Some(playback) => Ok(Outcome::Ready(PlaybackSettings::from(&playback))),
            None => Ok(Outcome::Empty(EmptyState::NoActiveDevice)),
        }
    }

    /// `false` when nothing is loaded or the session is paused.
    pub async fn is_playing(&self) -> Result<bool> {
        Ok(self
            .api
            .current_playback()
            .await?
            .is_some_and(|playback| playback.is_playing && playback.item.is_some()))
    }

    pub async fn add_to_queue(&self, track: &str) -> Result<Outcome<()>> {
        let id = track_id(track)?;
        let raw = id.id().to_string();
        let result = self.api.add_to_queue(id, self.device()).await;
        player_lookup_outcome(result, EntityKind::Track, &raw)
    }

    /// Tracks matching `query`, at most `count` of them (clamped to 1..=50).
    pub async fn find_song(&self, query: &str, count: u32) -> Result<Vec<TrackMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("query", "search query is empty"));
        }
        let limit = count.clamp(1, PageRequest::MAX_LIMIT);

        let tracks = self.api.search_tracks(query, limit).await?;
        tracing::debug!(query, count = tracks.len(), "Track search finished");
        Ok(tracks.iter().map(TrackMatch::from).collect())
    }

    pub async fn devices(&self) -> Result<Vec<DeviceInfo>> {
        let devices = self.api.devices().await?;
        Ok(devices.iter().map(DeviceInfo::from).collect())
    }

    /// Move playback to `device_id` and start playing there.
    pub async fn transfer_to(&self, device_id: &str) -> Result<()> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(Error::validation("device", "device id is empty"));
        }
        Ok(self.api.transfer_playback(device_id, true).await?)
    }

    /// Start a playlist, album or artist given as URI or URL.
    pub async fn play_context(&self, uri: &str) -> Result<Outcome<()>> {
        let context = context_id(uri)?;
        let raw = context.id().to_string();
        let result = self.api.start_context(context, self.device()).await;
        player_lookup_outcome(result, EntityKind::Context, &raw)
    }
}
