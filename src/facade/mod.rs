//! The facade: four groups of helper operations over one collaborator.
//!
//! Every group borrows the collaborator from [`Spotify`], calls through to
//! it, reshapes the raw response into a normalized record and turns the
//! expected empty states into [`Outcome::Empty`].

mod controls;
mod playback;
mod song_data;
mod user_data;

pub use controls::{Controls, DEFAULT_SEARCH_COUNT};
pub use playback::Playback;
pub use song_data::SongData;
pub use user_data::UserData;

use std::sync::Arc;

use rspotify::model::{AlbumId, ArtistId, PlayContextId, PlaylistId, TrackId};

use crate::client::{SpotifyApi, SpotifyClient};
use crate::error::{ApiResult, EntityKind, Error, Result};
use crate::model::canonical_id;
use crate::outcome::{EmptyState, Outcome};

/// Entry point aggregating the `controls`, `playback`, `user_data` and
/// `song_data` groups.
pub struct Spotify<C = SpotifyClient> {
    api: Arc<C>,
}

impl<C> Clone for Spotify<C> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api) }
    }
}

impl<C: SpotifyApi> Spotify<C> {
    pub fn new(api: C) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_shared(api: Arc<C>) -> Self {
        Self { api }
    }

    pub fn controls(&self) -> Controls<'_, C> {
        Controls::new(&self.api)
    }

    pub fn playback(&self) -> Playback<'_, C> {
        Playback::new(&self.api)
    }

    pub fn user_data(&self) -> UserData<'_, C> {
        UserData::new(&self.api)
    }

    pub fn song_data(&self) -> SongData<'_, C> {
        SongData::new(&self.api)
    }

    /// Ask the collaborator for a fresh access token now.
    pub async fn reauthenticate(&self) -> Result<()> {
        Ok(self.api.reauthenticate().await?)
    }
}

/// Player commands answer "no active device" with an error; report it as a sentinel.
pub(crate) fn player_outcome<T>(result: ApiResult<T>) -> Result<Outcome<T>> {
    match result {
        Ok(value) => Ok(Outcome::Ready(value)),
        Err(e) if e.is_no_active_device() => {
            tracing::debug!(error = %e, "Player command found no active device");
            Ok(Outcome::Empty(EmptyState::NoActiveDevice))
        }
        Err(e) => Err(e.into()),
    }
}

/// Player command naming a catalog entity. A missing device is still a
/// sentinel, but an entity the API does not know is `NotFound`.
pub(crate) fn player_lookup_outcome<T>(
    result: ApiResult<T>,
    kind: EntityKind,
    id: &str,
) -> Result<Outcome<T>> {
    match result {
        Err(e) if !e.is_no_active_device() => Err(lookup_error(e, kind, id)),
        other => player_outcome(other),
    }
}

/// Map a catalog lookup failure, reporting unknown entities as `NotFound`.
pub(crate) fn lookup_error(e: crate::error::ApiError, kind: EntityKind, id: &str) -> Error {
    if e.is_unknown_entity() {
        tracing::debug!(%kind, id, error = %e, "Catalog lookup found nothing");
        Error::not_found(kind, id)
    } else {
        e.into()
    }
}

/// Bare id for `input`, or `NotFound` when it cannot name a `kind` entity.
fn catalog_id(input: &str, kind: EntityKind) -> Result<String> {
    let id = canonical_id(input);
    if id.is_empty() {
        return Err(Error::not_found(kind, input.trim()));
    }
    Ok(id)
}

pub(crate) fn track_id(input: &str) -> Result<TrackId<'static>> {
    let id = catalog_id(input, EntityKind::Track)?;
    TrackId::from_id(id.clone()).map_err(|_| Error::not_found(EntityKind::Track, id))
}

pub(crate) fn artist_id(input: &str) -> Result<ArtistId<'static>> {
    let id = catalog_id(input, EntityKind::Artist)?;
    ArtistId::from_id(id.clone()).map_err(|_| Error::not_found(EntityKind::Artist, id))
}

pub(crate) fn album_id(input: &str) -> Result<AlbumId<'static>> {
    let id = catalog_id(input, EntityKind::Album)?;
    AlbumId::from_id(id.clone()).map_err(|_| Error::not_found(EntityKind::Album, id))
}

/// Split a context URI or URL into its kind and raw id.
fn split_context(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();

    if let Some((_, path)) = input.split_once("open.spotify.com/") {
        let path = path.split(['?', '#']).next()?;
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut kind = segments.next()?;
        // localized links: open.spotify.com/intl-de/album/<id>
        if kind.starts_with("intl-") {
            kind = segments.next()?;
        }
        // legacy playlist links: open.spotify.com/user/<name>/playlist/<id>
        if kind == "user" {
            segments.next()?;
            kind = segments.next()?;
        }
        return Some((kind, segments.next()?));
    }

    let mut parts = input.strip_prefix("spotify:")?.split(':');
    let mut kind = parts.next()?;
    // spotify:user:<name>:playlist:<id>
    if kind == "user" {
        parts.next()?;
        kind = parts.next()?;
    }
    Some((kind, parts.next()?))
}

/// Playlist, album or artist context to start playback from.
pub(crate) fn context_id(input: &str) -> Result<PlayContextId<'static>> {
    let Some((kind, id)) = split_context(input) else {
        return Err(Error::validation(
            "context",
            format!("'{}' is not a playlist, album or artist URI", input.trim()),
        ));
    };
    let id = id.trim().to_string();
    let unknown = |id: String| Error::not_found(EntityKind::Context, id);

    match kind {
        "playlist" => PlaylistId::from_id(id.clone())
            .map(PlayContextId::Playlist)
            .map_err(|_| unknown(id)),
        "album" => AlbumId::from_id(id.clone())
            .map(PlayContextId::Album)
            .map_err(|_| unknown(id)),
        "artist" => ArtistId::from_id(id.clone())
            .map(PlayContextId::Artist)
            .map_err(|_| unknown(id)),
        other => Err(Error::validation(
            "context",
            format!("cannot start playback from a {other}"),
        )),
    }
}
