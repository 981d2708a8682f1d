//! Catalog and user records: tracks, artists, albums, playlists, profile.

use chrono::{DateTime, Utc};
use rspotify::model::{
    AlbumType, FullAlbum, FullArtist, FullTrack, PlayHistory, PrivateUser, SimplifiedAlbum,
    SimplifiedArtist, SimplifiedPlaylist,
};
use rspotify::prelude::Id;
use serde::{Deserialize, Serialize};

use super::normalize::{
    canonical_id, clean_name, clean_names, dedup_preserving, non_empty, optional_id, spotify_uri,
    Normalize,
};

/// Id and name of a credited artist
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

impl From<&SimplifiedArtist> for ArtistRef {
    fn from(artist: &SimplifiedArtist) -> Self {
        Self {
            id: artist.id.as_ref().map(|id| id.id().to_string()),
            name: artist.name.clone(),
        }
    }
}

impl Normalize for ArtistRef {
    fn normalize(self) -> Self {
        Self { id: optional_id(self.id), name: clean_name(self.name) }
    }
}

/// Id and name of an album a track belongs to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
}

impl From<&SimplifiedAlbum> for AlbumRef {
    fn from(album: &SimplifiedAlbum) -> Self {
        Self {
            id: album.id.as_ref().map(|id| id.id().to_string()),
            name: album.name.clone(),
        }
    }
}

impl Normalize for AlbumRef {
    fn normalize(self) -> Self {
        Self { id: optional_id(self.id), name: clean_name(self.name) }
    }
}

fn artist_refs(artists: Vec<ArtistRef>) -> Vec<ArtistRef> {
    dedup_preserving(artists.normalize())
}

/// A search hit, shaped for handing straight to the queue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMatch {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artist: String,
    pub album: String,
}

impl From<&FullTrack> for TrackMatch {
    fn from(track: &FullTrack) -> Self {
        Self {
            id: track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            uri: String::new(),
            name: track.name.clone(),
            artist: track.artists.first().map(|a| a.name.clone()).unwrap_or_default(),
            album: track.album.name.clone(),
        }
        .normalize()
    }
}

impl Normalize for TrackMatch {
    fn normalize(self) -> Self {
        let id = canonical_id(&self.id);
        Self {
            uri: spotify_uri("track", &id),
            id,
            name: clean_name(self.name),
            artist: clean_name(self.artist),
            album: clean_name(self.album),
        }
    }
}

/// Track metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    pub duration_ms: u32,
    pub popularity: u32,
    pub explicit: bool,
}

impl From<&FullTrack> for TrackInfo {
    fn from(track: &FullTrack) -> Self {
        Self {
            id: track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            uri: String::new(),
            name: track.name.clone(),
            artists: track.artists.iter().map(ArtistRef::from).collect(),
            album: AlbumRef::from(&track.album),
            duration_ms: track.duration.num_milliseconds() as u32,
            popularity: track.popularity,
            explicit: track.explicit,
        }
        .normalize()
    }
}

impl Normalize for TrackInfo {
    fn normalize(self) -> Self {
        let id = canonical_id(&self.id);
        Self {
            uri: spotify_uri("track", &id),
            id,
            name: clean_name(self.name),
            artists: artist_refs(self.artists),
            album: self.album.normalize(),
            popularity: self.popularity.min(100),
            ..self
        }
    }
}

/// Artist metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistInfo {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub followers: u32,
    pub popularity: u32,
}

impl From<&FullArtist> for ArtistInfo {
    fn from(artist: &FullArtist) -> Self {
        Self {
            id: artist.id.id().to_string(),
            name: artist.name.clone(),
            genres: artist.genres.clone(),
            followers: artist.followers.total,
            popularity: artist.popularity,
        }
        .normalize()
    }
}

impl Normalize for ArtistInfo {
    fn normalize(self) -> Self {
        Self {
            id: canonical_id(&self.id),
            name: clean_name(self.name),
            genres: clean_names(self.genres),
            popularity: self.popularity.min(100),
            ..self
        }
    }
}

/// Album release kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumKind {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

impl From<AlbumType> for AlbumKind {
    fn from(kind: AlbumType) -> Self {
        match kind {
            AlbumType::Album => AlbumKind::Album,
            AlbumType::Single => AlbumKind::Single,
            AlbumType::Compilation => AlbumKind::Compilation,
            AlbumType::AppearsOn => AlbumKind::AppearsOn,
        }
    }
}

/// Album metadata with its track list reduced to ids
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub kind: AlbumKind,
    pub release_date: String,
    pub total_tracks: u32,
    pub genres: Vec<String>,
    pub image_urls: Vec<String>,
    pub popularity: u32,
    pub artists: Vec<ArtistRef>,
    /// Track ids in album order; fetch details through `SongData`
    pub tracks: Vec<String>,
}

impl From<&FullAlbum> for AlbumInfo {
    fn from(album: &FullAlbum) -> Self {
        Self {
            id: album.id.id().to_string(),
            name: album.name.clone(),
            kind: album.album_type.clone().into(),
            release_date: album.release_date.clone(),
            total_tracks: album.tracks.total,
            genres: album.genres.clone(),
            image_urls: album.images.iter().map(|i| i.url.clone()).collect(),
            popularity: album.popularity,
            artists: album.artists.iter().map(ArtistRef::from).collect(),
            tracks: album
                .tracks
                .items
                .iter()
                .filter_map(|t| t.id.as_ref().map(|id| id.id().to_string()))
                .collect(),
        }
        .normalize()
    }
}

impl Normalize for AlbumInfo {
    fn normalize(self) -> Self {
        Self {
            id: canonical_id(&self.id),
            name: clean_name(self.name),
            release_date: clean_name(self.release_date),
            genres: clean_names(self.genres),
            image_urls: clean_names(self.image_urls),
            popularity: self.popularity.min(100),
            artists: artist_refs(self.artists),
            tracks: self
                .tracks
                .iter()
                .map(|t| canonical_id(t))
                .filter(|t| !t.is_empty())
                .collect(),
            ..self
        }
    }
}

/// Flattened view of the authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub followers: Option<u32>,
}

impl From<&PrivateUser> for UserProfile {
    fn from(user: &PrivateUser) -> Self {
        Self {
            id: user.id.id().to_string(),
            display_name: user.display_name.clone(),
            followers: user.followers.as_ref().map(|f| f.total),
        }
        .normalize()
    }
}

impl Normalize for UserProfile {
    fn normalize(self) -> Self {
        Self {
            id: canonical_id(&self.id),
            display_name: non_empty(self.display_name),
            ..self
        }
    }
}

/// One of the user's top tracks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    pub id: String,
    pub name: String,
    pub album: String,
    pub artists: Vec<String>,
    pub popularity: u32,
}

impl From<&FullTrack> for TopTrack {
    fn from(track: &FullTrack) -> Self {
        Self {
            id: track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            name: track.name.clone(),
            album: track.album.name.clone(),
            artists: track.artists.iter().map(|a| a.name.clone()).collect(),
            popularity: track.popularity,
        }
        .normalize()
    }
}

impl Normalize for TopTrack {
    fn normalize(self) -> Self {
        Self {
            id: canonical_id(&self.id),
            name: clean_name(self.name),
            album: clean_name(self.album),
            artists: clean_names(self.artists),
            popularity: self.popularity.min(100),
        }
    }
}

/// A playlist in the user's library
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub uri: String,
    pub name: String,
    /// Owner display name, falling back to the owner's user id
    pub owner: String,
    pub total_tracks: u32,
}

impl From<&SimplifiedPlaylist> for PlaylistSummary {
    fn from(playlist: &SimplifiedPlaylist) -> Self {
        Self {
            id: playlist.id.id().to_string(),
            uri: String::new(),
            name: playlist.name.clone(),
            owner: playlist
                .owner
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| playlist.owner.id.id().to_string()),
            total_tracks: playlist.tracks.total,
        }
        .normalize()
    }
}

impl Normalize for PlaylistSummary {
    fn normalize(self) -> Self {
        let id = canonical_id(&self.id);
        Self {
            uri: spotify_uri("playlist", &id),
            id,
            name: clean_name(self.name),
            owner: clean_name(self.owner),
            ..self
        }
    }
}

/// A recently played track with its play time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedTrack {
    pub id: String,
    pub name: String,
    pub album: AlbumRef,
    pub artists: Vec<ArtistRef>,
    pub played_at: DateTime<Utc>,
}

impl From<&PlayHistory> for PlayedTrack {
    fn from(item: &PlayHistory) -> Self {
        let track = &item.track;
        Self {
            id: track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            name: track.name.clone(),
            album: AlbumRef::from(&track.album),
            artists: track.artists.iter().map(ArtistRef::from).collect(),
            played_at: item.played_at,
        }
        .normalize()
    }
}

impl Normalize for PlayedTrack {
    fn normalize(self) -> Self {
        Self {
            id: canonical_id(&self.id),
            name: clean_name(self.name),
            album: self.album.normalize(),
            artists: artist_refs(self.artists),
            ..self
        }
    }
}
