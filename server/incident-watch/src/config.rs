//! Watcher configuration with sane defaults, overridable from the environment.

use std::time::Duration;

use crate::error::ConfigError;

const ENV_POLL_INTERVAL_SECS: &str = "WATCH_POLL_INTERVAL_SECS";
const ENV_FETCH_TIMEOUT_SECS: &str = "WATCH_FETCH_TIMEOUT_SECS";
const ENV_STATUS_URL: &str = "WATCH_STATUS_URL";
const ENV_API_KEY: &str = "RIOT_API_KEY";
const ENV_LOCALE: &str = "WATCH_LOCALE";
const ENV_WEBHOOK_URL: &str = "WATCH_WEBHOOK_URL";
const ENV_NOTIFY_DISABLED: &str = "WATCH_NOTIFY_DISABLED";
const ENV_NOTIFY_TIMEOUT_SECS: &str = "WATCH_NOTIFY_TIMEOUT_SECS";

/// Placeholder replaced by the region code in `status_url_template`.
pub const REGION_PLACEHOLDER: &str = "{region}";

/// Tunables for polling and notification.
#[derive(Debug, Clone)]
pub struct Config {
  /// Sleep between the end of one cycle and the start of the next.
  pub poll_interval: Duration,
  /// Per-region fetch deadline; exceeding it fails that region for the cycle.
  pub fetch_timeout: Duration,
  /// Status endpoint, with `{region}` standing in for the region code.
  pub status_url_template: String,
  /// Sent as `X-Riot-Token` when present.
  pub api_key: Option<String>,
  /// Preferred title locale (e.g. "en_US"). Falls back to the first title.
  pub preferred_locale: Option<String>,
  /// Notification webhook. Without one, notifications are only logged.
  pub webhook_url: Option<String>,
  pub notify_disabled: bool,
  /// Deadline for one notification send; overrunning it counts as a failed send.
  pub notify_timeout: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      poll_interval: Duration::from_secs(60),
      fetch_timeout: Duration::from_secs(5),
      status_url_template: "https://{region}.api.riotgames.com/lol/status/v4/platform-data".into(),
      api_key: None,
      preferred_locale: None,
      webhook_url: None,
      notify_disabled: false,
      notify_timeout: Duration::from_secs(10),
    }
  }
}

impl Config {
  /// Defaults overlaid with whatever is set in the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Same as [`Config::from_env`] but reads keys through `lookup`.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut config = Self::default();

    if let Some(v) = get(ENV_POLL_INTERVAL_SECS) {
      config.poll_interval = parse_secs(ENV_POLL_INTERVAL_SECS, &v)?;
    }
    if let Some(v) = get(ENV_FETCH_TIMEOUT_SECS) {
      config.fetch_timeout = parse_secs(ENV_FETCH_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = get(ENV_NOTIFY_TIMEOUT_SECS) {
      config.notify_timeout = parse_secs(ENV_NOTIFY_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = get(ENV_STATUS_URL) {
      if !v.contains(REGION_PLACEHOLDER) {
        return Err(ConfigError::invalid(
          ENV_STATUS_URL,
          "must contain the {region} placeholder",
        ));
      }
      config.status_url_template = v;
    }
    config.api_key = get(ENV_API_KEY);
    config.preferred_locale = get(ENV_LOCALE);
    config.webhook_url = get(ENV_WEBHOOK_URL);
    config.notify_disabled = get(ENV_NOTIFY_DISABLED)
      .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
      .unwrap_or(false);

    Ok(config)
  }

  /// Status URL for one region code.
  pub fn status_url(&self, region_code: &str) -> String {
    self.status_url_template.replace(REGION_PLACEHOLDER, region_code)
  }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
  let secs: u64 = value
    .parse()
    .map_err(|_| ConfigError::invalid(key, &format!("expected whole seconds, got {:?}", value)))?;
  if secs == 0 {
    return Err(ConfigError::invalid(key, "must be greater than zero"));
  }
  Ok(Duration::from_secs(secs))
}
