//! Stremio addon protocol handlers.
//!
//! Only the `stream` resource is served. Stremio requests
//! `/stream/{type}/{id}.json`, where `id` is `tt…` for movies and
//! `tt…:season:episode` for series episodes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use sktorrent_core::{MediaType, ResolvedStream};

use crate::state::AppState;

const ADDON_ID: &str = "org.stremio.sktorrent";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
    pub resources: Vec<String>,
    pub id_prefixes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StremioStream>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StremioStream {
    pub name: String,
    pub title: String,
    pub info_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<BehaviorHints>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub binge_group: String,
}

impl From<ResolvedStream> for StremioStream {
    fn from(stream: ResolvedStream) -> Self {
        Self {
            name: stream.name,
            title: stream.title,
            info_hash: stream.info_hash.into(),
            behavior_hints: stream
                .group_key
                .map(|binge_group| BehaviorHints { binge_group }),
        }
    }
}

pub async fn manifest(State(state): State<Arc<AppState>>) -> Json<Manifest> {
    Json(Manifest {
        id: ADDON_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: state.config().resolver.addon_name.clone(),
        description: "Streams movies and series from SKTorrent.eu".to_string(),
        types: vec![
            MediaType::Movie.as_str().to_string(),
            MediaType::Series.as_str().to_string(),
        ],
        catalogs: Vec::new(),
        resources: vec!["stream".to_string()],
        id_prefixes: vec!["tt".to_string()],
    })
}

pub async fn streams(
    State(state): State<Arc<AppState>>,
    Path((media_type, id)): Path<(String, String)>,
) -> Json<StreamsResponse> {
    let id = id.strip_suffix(".json").unwrap_or(&id);

    let Ok(media_type) = media_type.parse::<MediaType>() else {
        debug!(media_type = %media_type, "Unsupported media type");
        return Json(StreamsResponse {
            streams: Vec::new(),
        });
    };

    let streams = state
        .resolver()
        .resolve_streams(media_type, id)
        .await
        .into_iter()
        .map(StremioStream::from)
        .collect();

    Json(StreamsResponse { streams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sktorrent_core::InfoHash;

    #[test]
    fn test_stream_serialization() {
        let stream = StremioStream::from(ResolvedStream {
            name: "SKTorrent".to_string(),
            title: "Dune\n👤 3  📀 2 GB".to_string(),
            info_hash: InfoHash::parse(&"b".repeat(40)).unwrap(),
            group_key: Some("sktorrent|tt1160419".to_string()),
        });

        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["infoHash"], "b".repeat(40));
        assert_eq!(json["behaviorHints"]["bingeGroup"], "sktorrent|tt1160419");
        assert_eq!(json["title"], "Dune\n👤 3  📀 2 GB");
    }

    #[test]
    fn test_stream_without_group_omits_hints() {
        let stream = StremioStream::from(ResolvedStream {
            name: "SKTorrent".to_string(),
            title: "x".to_string(),
            info_hash: InfoHash::parse(&"c".repeat(40)).unwrap(),
            group_key: None,
        });
        let json = serde_json::to_value(&stream).unwrap();
        assert!(json.get("behaviorHints").is_none());
    }
}
