//! Catalog lookups for tracks, artists and albums.

use futures::future::try_join_all;
use rspotify::prelude::Id;

use crate::client::SpotifyApi;
use crate::error::{EntityKind, Result};
use crate::model::{AlbumInfo, ArtistInfo, TrackInfo};

use super::{album_id, artist_id, lookup_error, track_id};

/// Catalog lookups. Ids may be bare, URIs or open.spotify.com URLs.
pub struct SongData<'a, C> {
    api: &'a C,
}

impl<'a, C: SpotifyApi> SongData<'a, C> {
    pub(crate) fn new(api: &'a C) -> Self {
        Self { api }
    }

    pub async fn track(&self, id: &str) -> Result<TrackInfo> {
        let id = track_id(id)?;
        let raw = id.id().to_string();
        let track = self
            .api
            .track(id)
            .await
            .map_err(|e| lookup_error(e, EntityKind::Track, &raw))?;
        Ok(TrackInfo::from(&track))
    }

    /// Look up several tracks, in the order given.
    pub async fn tracks<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<TrackInfo>> {
        try_join_all(ids.iter().map(|id| self.track(id.as_ref()))).await
    }

    pub async fn artist(&self, id: &str) -> Result<ArtistInfo> {
        let id = artist_id(id)?;
        let raw = id.id().to_string();
        let artist = self
            .api
            .artist(id)
            .await
            .map_err(|e| lookup_error(e, EntityKind::Artist, &raw))?;
        Ok(ArtistInfo::from(&artist))
    }

    pub async fn artists<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<ArtistInfo>> {
        try_join_all(ids.iter().map(|id| self.artist(id.as_ref()))).await
    }

    pub async fn album(&self, id: &str) -> Result<AlbumInfo> {
        let id = album_id(id)?;
        let raw = id.id().to_string();
        let album = self
            .api
            .album(id)
            .await
            .map_err(|e| lookup_error(e, EntityKind::Album, &raw))?;
        Ok(AlbumInfo::from(&album))
    }

    pub async fn albums<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<AlbumInfo>> {
        try_join_all(ids.iter().map(|id| self.album(id.as_ref()))).await
    }

    /// The artist's most popular tracks in the user's market.
    pub async fn artist_top_tracks(&self, id: &str) -> Result<Vec<TrackInfo>> {
        let id = artist_id(id)?;
        let raw = id.id().to_string();
        let tracks = self
            .api
            .artist_top_tracks(id)
            .await
            .map_err(|e| lookup_error(e, EntityKind::Artist, &raw))?;
        Ok(tracks.iter().map(TrackInfo::from).collect())
    }
}
