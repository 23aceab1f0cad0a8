pub mod config;
pub mod descriptor;
pub mod filter;
pub mod media;
pub mod metadata;
pub mod metrics;
pub mod query;
pub mod resolver;
pub mod testing;
pub mod tracker;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, MetadataConfig,
    SanitizedConfig, ServerConfig, TrackerConfig,
};
pub use descriptor::{info_hash, looks_like_markup, DescriptorError, DescriptorResolver, InfoHash};
pub use filter::{CandidateFilter, ResolvedStream};
pub use media::{EpisodeRef, MediaIdError, MediaRequest, MediaType};
pub use metadata::{CinemetaClient, MetadataError, MetadataLookup, TitleInfo};
pub use query::QueryGenerator;
pub use resolver::{Resolution, ResolverConfig, StreamResolver, TitleStrategy};
pub use tracker::{
    Candidate, FetchError, HttpSession, NameStrategy, ResultsParser, SearchPage, TrackerClient,
    TrackerSession,
};
