//! Queries about the authenticated user.

use crate::client::SpotifyApi;
use crate::error::Result;
use crate::model::{
    validate_limit, ArtistInfo, PageRequest, PlayedTrack, PlayedWindow, PlaylistSummary, TimeRange,
    TopTrack, UserProfile,
};

/// Profile, listening history and playlists of the signed-in user.
pub struct UserData<'a, C> {
    api: &'a C,
}

impl<'a, C: SpotifyApi> UserData<'a, C> {
    pub(crate) fn new(api: &'a C) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        let user = self.api.me().await?;
        Ok(UserProfile::from(&user))
    }

    pub async fn top_artists(&self, range: TimeRange, page: PageRequest) -> Result<Vec<ArtistInfo>> {
        page.validate()?;
        let artists = self.api.top_artists(range.into(), page.limit, page.offset).await?;
        Ok(artists.items.iter().map(ArtistInfo::from).collect())
    }

    pub async fn top_tracks(&self, range: TimeRange, page: PageRequest) -> Result<Vec<TopTrack>> {
        page.validate()?;
        let tracks = self.api.top_tracks(range.into(), page.limit, page.offset).await?;
        Ok(tracks.items.iter().map(TopTrack::from).collect())
    }

    pub async fn playlists(&self, page: PageRequest) -> Result<Vec<PlaylistSummary>> {
        page.validate()?;
        let playlists = self.api.playlists(page.limit, page.offset).await?;
        Ok(playlists.items.iter().map(PlaylistSummary::from).collect())
    }

    /// Recently played tracks, most recent first.
    pub async fn recently_played(
        &self,
        limit: u32,
        window: Option<PlayedWindow>,
    ) -> Result<Vec<PlayedTrack>> {
        validate_limit(limit)?;
        let history = self.api.recently_played(limit, window.map(Into::into)).await?;

        let mut played: Vec<PlayedTrack> = history.items.iter().map(PlayedTrack::from).collect();
        played.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        Ok(played)
    }
}
