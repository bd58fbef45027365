//! Concurrent per-region status polling.
//!
//! Every region is polled in parallel, each under its own deadline. The fan-out is
//! a join barrier: [`fetch_all`] resolves only once every region has either
//! produced a report or failed, and it never fails as a whole.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{FetchCause, FetchError};
use crate::region::Region;
use crate::types::{PlatformStatus, RawIncidentReport};

/// Where region status documents come from.
#[async_trait]
pub trait StatusSource: Send + Sync {
  async fn fetch(&self, region: &Region) -> Result<PlatformStatus, FetchCause>;
}

/// Status source backed by the regional HTTP status endpoints.
pub struct HttpStatusSource {
  client: reqwest::Client,
  config: Config,
}

impl HttpStatusSource {
  pub fn new(config: &Config) -> Self {
    Self {
      client: reqwest::Client::new(),
      config: config.clone(),
    }
  }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
  async fn fetch(&self, region: &Region) -> Result<PlatformStatus, FetchCause> {
    let mut request = self.client.get(self.config.status_url(&region.code));
    if let Some(key) = &self.config.api_key {
      request = request.header("X-Riot-Token", key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchCause::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| FetchCause::Decode(e.to_string()))
  }
}

/// Outcome of one region's poll.
pub type RegionFetch = (Region, Result<RawIncidentReport, FetchError>);

/// Poll every region concurrently. Output order matches `regions`.
pub async fn fetch_all<S>(source: &S, regions: &[Region], per_request_timeout: Duration) -> Vec<RegionFetch>
where
  S: StatusSource + ?Sized,
{
  let polls = regions.iter().map(|region| async move {
    let result = match tokio::time::timeout(per_request_timeout, source.fetch(region)).await {
      Ok(Ok(status)) => Ok(RawIncidentReport {
        region: region.clone(),
        status,
      }),
      Ok(Err(cause)) => Err(cause),
      Err(_) => Err(FetchCause::Timeout(per_request_timeout)),
    };

    let result = result.map_err(|cause| FetchError {
      region: region.code.clone(),
      cause,
    });

    match &result {
      Ok(report) => debug!(
        region = %region.code,
        incidents = report.status.incidents.len(),
        "Region status fetched"
      ),
      Err(e) => warn!(
        region = %region.code,
        region_name = %region.display_name,
        cause = %e.cause,
        "Error getting data from region status server"
      ),
    }

    (region.clone(), result)
  });

  join_all(polls).await
}
