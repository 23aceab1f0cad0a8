//! Inbound media requests.
//!
//! The hosting layer hands us a media type and a Stremio-style id such as
//! `tt0903747:1:5`. This module turns that into a [`MediaRequest`] with an
//! explicit, optional episode context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of title being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = MediaIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            other => Err(MediaIdError::UnknownType(other.to_string())),
        }
    }
}

/// Season/episode pair. Both parts are always present and positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeRef {
    /// Build an episode reference, rejecting zero for either part.
    pub fn new(season: u32, episode: u32) -> Option<Self> {
        (season > 0 && episode > 0).then_some(Self { season, episode })
    }

    /// Scene-style tag, e.g. `S01E05`.
    pub fn tag(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }
}

/// Errors produced while interpreting an inbound request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaIdError {
    #[error("Unknown media type: {0}")]
    UnknownType(String),

    #[error("Empty media id")]
    EmptyId,
}

/// A single inbound stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub media_type: MediaType,
    /// Catalog id without the season/episode suffix (e.g. `tt0903747`).
    pub external_id: String,
    /// Present only for series requests carrying both season and episode.
    pub episode: Option<EpisodeRef>,
}

impl MediaRequest {
    pub fn movie(external_id: impl Into<String>) -> Self {
        Self {
            media_type: MediaType::Movie,
            external_id: external_id.into(),
            episode: None,
        }
    }

    pub fn episode(external_id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            media_type: MediaType::Series,
            external_id: external_id.into(),
            episode: EpisodeRef::new(season, episode),
        }
    }

    /// Parse a `<id>[:<season>:<episode>]` string.
    ///
    /// Unparsable or non-positive season/episode parts leave the episode
    /// context empty instead of failing the request. Movies never carry
    /// an episode context.
    pub fn parse(media_type: MediaType, id: &str) -> Result<Self, MediaIdError> {
        let mut parts = id.trim().split(':');
        let external_id = parts.next().unwrap_or_default().trim();
        if external_id.is_empty() {
            return Err(MediaIdError::EmptyId);
        }

        let season = parts.next().and_then(|s| s.trim().parse::<u32>().ok());
        let episode = parts.next().and_then(|e| e.trim().parse::<u32>().ok());

        let episode = match (media_type, season, episode) {
            (MediaType::Series, Some(s), Some(e)) => EpisodeRef::new(s, e),
            _ => None,
        };

        Ok(Self {
            media_type,
            external_id: external_id.to_string(),
            episode,
        })
    }
}
