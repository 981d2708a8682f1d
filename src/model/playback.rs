//! Playback-related records

use rspotify::model::{CurrentPlaybackContext, PlayableItem};
use rspotify::prelude::Id;
use serde::{Deserialize, Serialize};

use super::normalize::{clean_name, clean_names, non_empty, optional_id, Normalize};
use super::types::{DeviceInfo, RepeatMode};

/// Metadata about the currently playing item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub track_id: Option<String>,
    pub track_name: String,
    /// First credited artist (show name for episodes)
    pub artist: String,
    pub artists: Vec<String>,
    pub album: String,
    pub album_art_url: Option<String>,
    pub position_ms: u32,
    pub duration_ms: u32,
    pub is_playing: bool,
}

impl NowPlaying {
    /// `None` when the session has no item loaded or the item is of an unknown type.
    pub fn from_playback(playback: &CurrentPlaybackContext) -> Option<Self> {
        let position_ms = playback
            .progress
            .map(|p| p.num_milliseconds().max(0) as u32)
            .unwrap_or(0);

        let now_playing = match playback.item.as_ref()? {
            PlayableItem::Track(track) => {
                let artists: Vec<String> = track.artists.iter().map(|a| a.name.clone()).collect();
                Self {
                    track_id: track.id.as_ref().map(|id| id.id().to_string()),
                    track_name: track.name.clone(),
                    artist: artists.first().cloned().unwrap_or_default(),
                    artists,
                    album: track.album.name.clone(),
                    album_art_url: track.album.images.first().map(|i| i.url.clone()),
                    position_ms,
                    duration_ms: track.duration.num_milliseconds() as u32,
                    is_playing: playback.is_playing,
                }
            }
            PlayableItem::Episode(episode) => Self {
                track_id: Some(episode.id.id().to_string()),
                track_name: episode.name.clone(),
                artist: episode.show.name.clone(),
                artists: vec![episode.show.name.clone()],
                album: "Podcast".to_string(),
                album_art_url: episode.images.first().map(|i| i.url.clone()),
                position_ms,
                duration_ms: episode.duration.num_milliseconds() as u32,
                is_playing: playback.is_playing,
            },
            PlayableItem::Unknown(_) => return None,
        };

        Some(now_playing.normalize())
    }
}

impl Normalize for NowPlaying {
    fn normalize(self) -> Self {
        let artists = clean_names(self.artists);
        let artist = match clean_name(self.artist) {
            a if a.is_empty() => artists.first().cloned().unwrap_or_default(),
            a => a,
        };
        Self {
            track_id: optional_id(self.track_id),
            track_name: clean_name(self.track_name),
            artist,
            artists,
            album: clean_name(self.album),
            album_art_url: non_empty(self.album_art_url),
            position_ms: if self.duration_ms > 0 {
                self.position_ms.min(self.duration_ms)
            } else {
                self.position_ms
            },
            ..self
        }
    }
}

/// Shuffle, repeat and device of the current session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub device: DeviceInfo,
}

impl From<&CurrentPlaybackContext> for PlaybackSettings {
    fn from(playback: &CurrentPlaybackContext) -> Self {
        Self {
            shuffle: playback.shuffle_state,
            repeat: playback.repeat_state.clone().into(),
            device: DeviceInfo::from(&playback.device),
        }
    }
}

impl Normalize for PlaybackSettings {
    fn normalize(self) -> Self {
        Self { device: self.device.normalize(), ..self }
    }
}

/// Complete snapshot of the user's playback session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub now_playing: Option<NowPlaying>,
    pub device: DeviceInfo,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub is_playing: bool,
}

impl From<&CurrentPlaybackContext> for PlaybackState {
    fn from(playback: &CurrentPlaybackContext) -> Self {
        let settings = PlaybackSettings::from(playback);
        Self {
            now_playing: NowPlaying::from_playback(playback),
            device: settings.device,
            shuffle: settings.shuffle,
            repeat: settings.repeat,
            is_playing: playback.is_playing,
        }
    }
}

impl Normalize for PlaybackState {
    fn normalize(self) -> Self {
        Self {
            now_playing: self.now_playing.normalize(),
            device: self.device.normalize(),
            ..self
        }
    }
}
