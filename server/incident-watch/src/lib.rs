//! PushLog Incident Watch: cross-region service status aggregation.
//!
//! Polls every registered region's status endpoint, merges the reported incidents
//! into one deduplicated working set keyed by upstream incident id, expires
//! incidents that stop being reported, and notifies exactly once per incident
//! when it first appears.
//!
//! No DB; the working set lives in memory for the life of the process.

pub mod config;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod notify;
pub mod region;
pub mod scheduler;
pub mod tracker;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, FetchCause, FetchError, MalformedIncidentError, NotifyError};
pub use fetch::{HttpStatusSource, StatusSource};
pub use notify::{LogSink, NotifySink, WebhookSink};
pub use region::{Region, RegionRegistry};
pub use scheduler::{CycleSummary, Watcher};
pub use tracker::Tracker;
pub use types::{Incident, IncidentCandidate, PlatformStatus};
