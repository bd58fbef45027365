//! Fixed-interval watch loop: fetch, normalize, merge/expire, notify, sleep.
//!
//! Cycles never overlap: the next one starts only after the previous one has fully
//! completed (notifications included) and the poll interval has elapsed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fetch::{self, StatusSource};
use crate::normalize;
use crate::notify::{self, NotifySink};
use crate::region::RegionRegistry;
use crate::tracker::Tracker;
use crate::types::RawIncidentReport;

/// Counters describing one finished cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
  pub cycle: u64,
  pub started_at: DateTime<Utc>,
  pub regions_ok: usize,
  pub regions_failed: Vec<String>,
  pub candidates: usize,
  pub rejected: usize,
  pub new_incidents: Vec<String>,
  pub expired_incidents: Vec<String>,
  pub notifications_sent: usize,
  pub notifications_failed: usize,
  pub working_set: usize,
}

/// Drives cycles. Sole owner of the [`Tracker`].
pub struct Watcher {
  config: Config,
  registry: RegionRegistry,
  source: Arc<dyn StatusSource>,
  sink: Arc<dyn NotifySink>,
  tracker: Tracker,
}

impl Watcher {
  pub fn new(
    config: Config,
    registry: RegionRegistry,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn NotifySink>,
  ) -> Self {
    Self {
      config,
      registry,
      source,
      sink,
      tracker: Tracker::new(),
    }
  }

  pub fn tracker(&self) -> &Tracker {
    &self.tracker
  }

  /// Move to the next cycle index.
  pub fn advance(&mut self) -> u64 {
    self.tracker.advance()
  }

  /// Run one full cycle at the tracker's current cycle index.
  pub async fn run_cycle(&mut self) -> CycleSummary {
    let cycle = self.tracker.cycle();
    let started_at = Utc::now();
    info!(cycle, regions = self.registry.len(), "Cycle started");

    let fetched =
      fetch::fetch_all(self.source.as_ref(), self.registry.regions(), self.config.fetch_timeout).await;

    let mut reports: Vec<RawIncidentReport> = Vec::with_capacity(fetched.len());
    let mut regions_failed = Vec::new();
    for (region, result) in fetched {
      match result {
        Ok(report) => reports.push(report),
        Err(_) => regions_failed.push(region.code),
      }
    }

    let normalized = normalize::normalize(&reports, self.config.preferred_locale.as_deref());
    let report = self.tracker.observe(&normalized.candidates);

    for incident in &report.snapshot {
      info!(
        cycle,
        incident_id = %incident.id,
        title = %incident.title,
        regions = ?incident.affected_regions,
        first_seen = incident.first_seen_cycle,
        last_seen = incident.last_seen_cycle,
        "Active incident"
      );
    }

    let fresh = notify::select_new(&report.snapshot, cycle);
    let dispatched =
      notify::dispatch(self.sink.as_ref(), &fresh, self.config.notify_timeout).await;

    let summary = CycleSummary {
      cycle,
      started_at,
      regions_ok: reports.len(),
      regions_failed,
      candidates: normalized.candidates.len(),
      rejected: normalized.rejected.len(),
      new_incidents: report.new_ids,
      expired_incidents: report.expired.into_iter().map(|i| i.id).collect(),
      notifications_sent: dispatched.sent.len(),
      notifications_failed: dispatched.failed.len(),
      working_set: report.snapshot.len(),
    };

    if !summary.regions_failed.is_empty() {
      warn!(cycle, failed = ?summary.regions_failed, "Some regions could not be polled");
    }
    info!(
      cycle,
      regions_ok = summary.regions_ok,
      candidates = summary.candidates,
      new = summary.new_incidents.len(),
      expired = summary.expired_incidents.len(),
      working_set = summary.working_set,
      "Cycle complete"
    );

    summary
  }

  /// Loop forever. Cancellation comes from outside (dropping the future).
  pub async fn run(&mut self) {
    info!(
      interval_secs = self.config.poll_interval.as_secs(),
      regions = self.registry.len(),
      "Incident watch started"
    );

    loop {
      let summary = self.run_cycle().await;
      debug!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "Cycle summary"
      );
      info!(
        current_cycle = self.tracker.cycle(),
        next_update_secs = self.config.poll_interval.as_secs(),
        "Will update again"
      );
      tokio::time::sleep(self.config.poll_interval).await;
      self.advance();
    }
  }
}
