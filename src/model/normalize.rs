//! Canonicalization shared by every normalized record.

/// Records that can be brought into canonical form.
///
/// Applying `normalize` to an already normalized record returns it unchanged.
pub trait Normalize: Sized {
    fn normalize(self) -> Self;
}

impl<T: Normalize> Normalize for Vec<T> {
    fn normalize(self) -> Self {
        self.into_iter().map(Normalize::normalize).collect()
    }
}

impl<T: Normalize> Normalize for Option<T> {
    fn normalize(self) -> Self {
        self.map(Normalize::normalize)
    }
}

/// Reduce a Spotify id, URI (`spotify:track:<id>`) or open.spotify.com URL to the bare id.
pub fn canonical_id(input: &str) -> String {
    let mut id = input.trim();

    if let Some((_, path)) = id.split_once("open.spotify.com/") {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        id = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path).trim();
    }
    if id.starts_with("spotify:") {
        id = id.rsplit(':').next().unwrap_or(id).trim();
    }

    id.to_string()
}

/// `spotify:<kind>:<id>` for a canonical id.
pub(crate) fn spotify_uri(kind: &str, id: &str) -> String {
    format!("spotify:{kind}:{id}")
}

pub(crate) fn clean_name(name: String) -> String {
    let trimmed = name.trim();
    if trimmed.len() == name.len() {
        name
    } else {
        trimmed.to_string()
    }
}

/// Trimmed value, or `None` when nothing is left.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.map(clean_name).filter(|v| !v.is_empty())
}

pub(crate) fn optional_id(value: Option<String>) -> Option<String> {
    value.map(|v| canonical_id(&v)).filter(|v| !v.is_empty())
}

/// Drops repeated entries, keeping the first occurrence.
pub(crate) fn dedup_preserving<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    kept
}

pub(crate) fn clean_names(names: Vec<String>) -> Vec<String> {
    dedup_preserving(
        names
            .into_iter()
            .map(clean_name)
            .filter(|n| !n.is_empty())
            .collect(),
    )
}
