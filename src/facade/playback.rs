//! Current playback session, read-only.

use crate::client::SpotifyApi;
use crate::error::Result;
use crate::model::{NowPlaying, PlaybackState};
use crate::outcome::{EmptyState, Outcome};

/// Read-only view of the current playback session.
pub struct Playback<'a, C> {
    api: &'a C,
}

impl<'a, C: SpotifyApi> Playback<'a, C> {
    pub(crate) fn new(api: &'a C) -> Self {
        Self { api }
    }

    /// The item currently loaded, playing or paused.
    pub async fn current(&self) -> Result<Outcome<NowPlaying>> {
        let Some(playback) = self.api.current_playback().await? else {
            tracing::debug!("No playback session");
            return Ok(Outcome::Empty(EmptyState::NothingPlaying));
        };
        Ok(match NowPlaying::from_playback(&playback) {
            Some(now_playing) => Outcome::Ready(now_playing),
            None => Outcome::Empty(EmptyState::NothingPlaying),
        })
    }

    /// Full snapshot: item, device, shuffle and repeat.
    pub async fn state(&self) -> Result<Outcome<PlaybackState>> {
        Ok(match self.api.current_playback().await? {
            Some(playback) => Outcome::Ready(PlaybackState::from(&playback)),
            None => Outcome::Empty(EmptyState::NothingPlaying),
        })
    }
}
