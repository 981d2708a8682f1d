//! Success-or-sentinel results for calls that can hit an expected empty state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A condition Spotify reports as a failure that is really just "nothing to do".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// No playback session or no item loaded in it
    NothingPlaying,
    /// Player commands have no device to act on
    NoActiveDevice,
}

impl fmt::Display for EmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyState::NothingPlaying => f.write_str("nothing is currently playing"),
            EmptyState::NoActiveDevice => f.write_str("no active playback device"),
        }
    }
}

/// Either the record a call produced or the empty state it ran into.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Ready(T),
    Empty(EmptyState),
}

impl<T> Outcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty(_))
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        match self {
            Outcome::Empty(state) => Some(*state),
            Outcome::Ready(_) => None,
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Empty(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(f(value)),
            Outcome::Empty(state) => Outcome::Empty(state),
        }
    }
}
