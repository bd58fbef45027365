//! Issue tracker: the running working set of incidents across cycles.
//!
//! Per incident id the only states are absent and active. An id becomes active the
//! first cycle it is observed, stays active while any region keeps reporting it,
//! and is dropped in the first cycle no region does.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::types::{Incident, IncidentCandidate};

/// What one cycle did to the working set.
#[derive(Debug, Clone)]
pub struct CycleReport {
  pub cycle: u64,
  /// Ids first observed this cycle, in candidate order.
  pub new_ids: Vec<String>,
  pub expired: Vec<Incident>,
  /// Post-expiry working set.
  pub snapshot: Vec<Incident>,
}

/// Owns the working set and the cycle counter. Only the scheduler mutates it.
#[derive(Debug, Default)]
pub struct Tracker {
  cycle: u64,
  incidents: BTreeMap<String, Incident>,
}

impl Tracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cycle(&self) -> u64 {
    self.cycle
  }

  pub fn len(&self) -> usize {
    self.incidents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.incidents.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&Incident> {
    self.incidents.get(id)
  }

  /// Fold this cycle's candidates into the working set.
  ///
  /// Returns the ids inserted for the first time. A region reporting the same id
  /// twice is a no-op the second time.
  pub fn merge(&mut self, candidates: &[IncidentCandidate]) -> Vec<String> {
    let cycle = self.cycle;
    let mut new_ids = Vec::new();

    for candidate in candidates {
      match self.incidents.get_mut(&candidate.incident_id) {
        Some(incident) => {
          incident.last_seen_cycle = cycle;
          if incident.add_region(&candidate.region_code, &candidate.region_name) {
            debug!(
              incident_id = %incident.id,
              region = %candidate.region_code,
              "Incident spread to another region"
            );
          }
        }
        None => {
          let incident = Incident::first_observed(candidate, cycle);
          debug!(incident_id = %incident.id, title = %incident.title, cycle, "New incident observed");
          new_ids.push(incident.id.clone());
          self.incidents.insert(incident.id.clone(), incident);
        }
      }
    }

    new_ids
  }

  /// Drop every incident not reconfirmed in the current cycle.
  ///
  /// Stale ids are collected over the whole set first, then removed.
  pub fn expire(&mut self) -> Vec<Incident> {
    let cycle = self.cycle;
    let stale: Vec<String> = self
      .incidents
      .values()
      .filter(|i| i.last_seen_cycle != cycle)
      .map(|i| i.id.clone())
      .collect();

    let expired: Vec<Incident> = stale
      .iter()
      .filter_map(|id| self.incidents.remove(id))
      .collect();

    for incident in &expired {
      info!(
        incident_id = %incident.id,
        title = %incident.title,
        first_seen = incident.first_seen_cycle,
        last_seen = incident.last_seen_cycle,
        "Incident no longer reported, expired"
      );
    }

    expired
  }

  /// Merge then expire for the current cycle.
  pub fn observe(&mut self, candidates: &[IncidentCandidate]) -> CycleReport {
    let new_ids = self.merge(candidates);
    let expired = self.expire();
    CycleReport {
      cycle: self.cycle,
      new_ids,
      expired,
      snapshot: self.snapshot(),
    }
  }

  /// Owned copy of the working set, ordered by id.
  pub fn snapshot(&self) -> Vec<Incident> {
    self.incidents.values().cloned().collect()
  }

  /// Move to the next cycle.
  pub fn advance(&mut self) -> u64 {
    self.cycle += 1;
    self.cycle
  }
}
