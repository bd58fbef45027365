//! Structured error types for the incident watcher.
//!
//! None of these are fatal once the watch loop is running: fetch, malformed-input
//! and notification failures are logged and the cycle carries on.

use std::time::Duration;

use thiserror::Error;

/// Why a single region poll failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
  #[error("timed out after {}ms", .0.as_millis())]
  Timeout(Duration),

  #[error("status {0}")]
  Status(u16),

  #[error("transport: {0}")]
  Transport(String),

  #[error("decode: {0}")]
  Decode(String),
}

impl From<reqwest::Error> for FetchCause {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Transport(format!("request timed out: {}", e))
    } else if e.is_decode() {
      Self::Decode(e.to_string())
    } else if let Some(status) = e.status() {
      Self::Status(status.as_u16())
    } else {
      Self::Transport(e.to_string())
    }
  }
}

/// A region poll that produced no usable report this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch {region}: {cause}")]
pub struct FetchError {
  pub region: String,
  pub cause: FetchCause,
}

/// An incident record that cannot become a candidate (e.g. no title).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed incident {incident_id} from {region}: {reason}")]
pub struct MalformedIncidentError {
  pub region: String,
  pub incident_id: String,
  pub reason: String,
}

impl MalformedIncidentError {
  pub fn new(region: &str, incident_id: &str, reason: &str) -> Self {
    Self {
      region: region.to_string(),
      incident_id: incident_id.to_string(),
      reason: reason.to_string(),
    }
  }
}

/// A notification the sink did not accept.
#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("http: {0}")]
  Http(#[from] reqwest::Error),

  #[error("rejected with status {status}: {body}")]
  Rejected { status: u16, body: String },

  #[error("no response within {}ms", .0.as_millis())]
  Timeout(Duration),

  #[error("{0}")]
  Other(String),
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {key}: {reason}")]
  Invalid { key: String, reason: String },
}

impl ConfigError {
  pub fn invalid(key: &str, reason: &str) -> Self {
    Self::Invalid {
      key: key.to_string(),
      reason: reason.to_string(),
    }
  }
}
