//! SKTorrent tracker access: authenticated session, search client and
//! result page parsing.

mod client;
mod parser;
mod session;
mod types;

pub use client::TrackerClient;
pub use parser::{NameStrategy, ResultsParser, UNKNOWN_SIZE};
pub use session::{cookie_header, FetchError, HttpSession, TrackerSession};
pub use types::{Candidate, SearchPage};
