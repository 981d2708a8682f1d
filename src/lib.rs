//! Normalized, sentinel-aware helpers over the Spotify Web API.
//!
//! [`Spotify`] groups the helpers into `controls`, `playback`, `user_data`
//! and `song_data`. Calls that can run into an expected empty state (nothing
//! playing, no active device) return [`Outcome`] instead of an error.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod logging;
pub mod model;
pub mod outcome;

#[cfg(test)]
mod testing;

pub use client::{SpotifyApi, SpotifyClient};
pub use config::SpotifyConfig;
pub use error::{ApiError, EntityKind, Error, Result};
pub use facade::{Controls, Playback, SongData, Spotify, UserData};
pub use model::{
    AlbumInfo, AlbumKind, ArtistInfo, DeviceInfo, NowPlaying, PageRequest, PlaybackSettings,
    PlaybackState, PlayedTrack, PlayedWindow, PlaylistSummary, RepeatMode, TimeRange, TopTrack,
    TrackInfo, TrackMatch, UserProfile,
};
pub use outcome::{EmptyState, Outcome};
