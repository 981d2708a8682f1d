//! Model module - normalized records returned by the facade
//!
//! - `types`: small shared enums and request parameters
//! - `playback`: now playing, playback state and settings
//! - `content`: tracks, artists, albums, playlists and the user profile
//! - `normalize`: the canonicalization every record applies to itself

mod types;
mod playback;
mod content;
mod normalize;

pub use types::{DeviceInfo, PageRequest, PlayedWindow, RepeatMode, TimeRange};
pub(crate) use types::validate_limit;

pub use playback::{NowPlaying, PlaybackSettings, PlaybackState};

pub use content::{
    AlbumInfo, AlbumKind, AlbumRef, ArtistInfo, ArtistRef, PlayedTrack, PlaylistSummary,
    TopTrack, TrackInfo, TrackMatch, UserProfile,
};

pub use normalize::{canonical_id, Normalize};
