//! Core type definitions shared by the facade groups

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rspotify::model::{Device, TimeLimits};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use super::normalize::{clean_name, non_empty, Normalize};

/// Repeat mode state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    Context,
}

impl RepeatMode {
    /// One step forward: off -> track -> context -> off.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Context,
            RepeatMode::Context => RepeatMode::Off,
        }
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(RepeatMode::Off),
            "track" => Ok(RepeatMode::Track),
            "context" => Ok(RepeatMode::Context),
            other => Err(format!("unknown repeat mode '{other}' (expected off, track or context)")),
        }
    }
}

impl From<rspotify::model::RepeatState> for RepeatMode {
    fn from(state: rspotify::model::RepeatState) -> Self {
        match state {
            rspotify::model::RepeatState::Off => RepeatMode::Off,
            rspotify::model::RepeatState::Track => RepeatMode::Track,
            rspotify::model::RepeatState::Context => RepeatMode::Context,
        }
    }
}

impl From<RepeatMode> for rspotify::model::RepeatState {
    fn from(mode: RepeatMode) -> Self {
        match mode {
            RepeatMode::Off => rspotify::model::RepeatState::Off,
            RepeatMode::Track => rspotify::model::RepeatState::Track,
            RepeatMode::Context => rspotify::model::RepeatState::Context,
        }
    }
}

/// Time frame top items are computed over
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// About the last four weeks
    Short,
    /// About the last six months
    #[default]
    Medium,
    /// Several years of history
    Long,
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "short_term" => Ok(TimeRange::Short),
            "medium" | "medium_term" => Ok(TimeRange::Medium),
            "long" | "long_term" => Ok(TimeRange::Long),
            other => Err(format!("unknown time range '{other}' (expected short, medium or long)")),
        }
    }
}

impl From<TimeRange> for rspotify::model::TimeRange {
    fn from(range: TimeRange) -> Self {
        match range {
            TimeRange::Short => rspotify::model::TimeRange::ShortTerm,
            TimeRange::Medium => rspotify::model::TimeRange::MediumTerm,
            TimeRange::Long => rspotify::model::TimeRange::LongTerm,
        }
    }
}

/// Limit/offset pair for paged user queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 50;
    pub const MAX_OFFSET: u32 = 100_000;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn limit(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }

    /// Checks the pair against the Web API's documented bounds.
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.limit)?;
        if self.offset > Self::MAX_OFFSET {
            return Err(Error::validation(
                "offset",
                format!("{} exceeds the maximum of {}", self.offset, Self::MAX_OFFSET),
            ));
        }
        Ok(())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: Self::DEFAULT_LIMIT, offset: 0 }
    }
}

pub(crate) fn validate_limit(limit: u32) -> Result<()> {
    if limit == 0 || limit > PageRequest::MAX_LIMIT {
        return Err(Error::validation(
            "limit",
            format!("{limit} is outside 1..={}", PageRequest::MAX_LIMIT),
        ));
    }
    Ok(())
}

/// Bound for recently played queries. Spotify accepts one side only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayedWindow {
    Before(DateTime<Utc>),
    After(DateTime<Utc>),
}

impl From<PlayedWindow> for TimeLimits {
    fn from(window: PlayedWindow) -> Self {
        match window {
            PlayedWindow::Before(at) => TimeLimits::Before(at),
            PlayedWindow::After(at) => TimeLimits::After(at),
        }
    }
}

/// Information about a Spotify playback device
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: Option<String>,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
    pub volume_percent: Option<u32>,
}

impl From<&Device> for DeviceInfo {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            kind: format!("{:?}", device._type),
            is_active: device.is_active,
            volume_percent: device.volume_percent,
        }
        .normalize()
    }
}

impl Normalize for DeviceInfo {
    fn normalize(self) -> Self {
        Self {
            // device ids are opaque hex strings, not catalog ids
            id: non_empty(self.id),
            name: clean_name(self.name),
            kind: clean_name(self.kind),
            volume_percent: self.volume_percent.map(|v| v.min(100)),
            ..self
        }
    }
}
