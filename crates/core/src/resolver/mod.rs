//! Stream resolution for an inbound media request.
//!
//! Two phases:
//! - **Search**: sequential, one query variant at a time, stopping once
//!   enough candidates are collected or the tracker asks for a login
//! - **Resolve**: concurrent (bounded) `.torrent` fetches, re-joined in
//!   candidate order before filtering
//!
//! Failures below request level are logged and absorbed; callers always
//! get a (possibly empty) stream list.

mod config;
mod runner;
mod types;

pub use config::{ResolverConfig, TitleStrategy};
pub use runner::StreamResolver;
pub use types::Resolution;
