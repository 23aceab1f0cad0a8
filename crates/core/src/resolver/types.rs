//! Types for the stream resolver.

use crate::filter::ResolvedStream;

/// Terminal state of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// At least one stream survived resolution and filtering.
    Streams(Vec<ResolvedStream>),
    /// The metadata source did not know the title (or failed).
    NoTitle,
    /// Every query came back empty, or no candidate survived.
    NoCandidates,
    /// The tracker asked for a login; remaining queries were skipped.
    AuthRejected,
    /// The total resolution budget ran out.
    TimedOut,
}

impl Resolution {
    /// Label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Streams(_) => "streams",
            Resolution::NoTitle => "no_title",
            Resolution::NoCandidates => "no_candidates",
            Resolution::AuthRejected => "auth_rejected",
            Resolution::TimedOut => "timed_out",
        }
    }

    pub fn streams(&self) -> &[ResolvedStream] {
        match self {
            Resolution::Streams(streams) => streams,
            _ => &[],
        }
    }

    /// Flatten to the stream list returned to clients (empty on any
    /// non-stream outcome).
    pub fn into_streams(self) -> Vec<ResolvedStream> {
        match self {
            Resolution::Streams(streams) => streams,
            _ => Vec::new(),
        }
    }
}
