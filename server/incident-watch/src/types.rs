//! Core types for the incident watcher (status JSON contract + tracked models).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::region::Region;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what a region's status endpoint returns)
// ---------------------------------------------------------------------------

/// One region's status document. Unknown fields are silently ignored, and
/// explicit `null`s read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformStatus {
  #[serde(default, deserialize_with = "null_as_default")]
  pub id: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub incidents: Vec<InboundIncident>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundIncident {
  /// Upstream ids are numeric on some platforms; kept opaque.
  #[serde(deserialize_with = "id_as_string")]
  pub id: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub titles: Vec<InboundTitle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundTitle {
  #[serde(default)]
  pub locale: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!(
      "incident id must be a string or number, got {}",
      other
    ))),
  }
}

/// Unparsed output of one successful region poll. Discarded after normalization.
#[derive(Debug, Clone)]
pub struct RawIncidentReport {
  pub region: Region,
  pub status: PlatformStatus,
}

// ---------------------------------------------------------------------------
// Normalized candidates
// ---------------------------------------------------------------------------

/// One (incident, region) observation. Not deduplicated across regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentCandidate {
  pub incident_id: String,
  pub title: String,
  pub region_code: String,
  pub region_name: String,
}

// ---------------------------------------------------------------------------
// Tracked incident
// ---------------------------------------------------------------------------

/// A service disruption in the working set.
///
/// `affected_regions` and `affected_region_names` are kept in lockstep; a region
/// code appears at most once and insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
  pub id: String,
  pub title: String,
  pub affected_regions: Vec<String>,
  pub affected_region_names: Vec<String>,
  pub first_seen_cycle: u64,
  pub last_seen_cycle: u64,
}

impl Incident {
  pub fn first_observed(candidate: &IncidentCandidate, cycle: u64) -> Self {
    Self {
      id: candidate.incident_id.clone(),
      title: candidate.title.clone(),
      affected_regions: vec![candidate.region_code.clone()],
      affected_region_names: vec![candidate.region_name.clone()],
      first_seen_cycle: cycle,
      last_seen_cycle: cycle,
    }
  }

  pub fn covers_region(&self, code: &str) -> bool {
    self.affected_regions.iter().any(|c| c == code)
  }

  /// Append a region if it is not already listed. Returns `true` when added.
  pub fn add_region(&mut self, code: &str, name: &str) -> bool {
    if self.covers_region(code) {
      return false;
    }
    self.affected_regions.push(code.to_string());
    self.affected_region_names.push(name.to_string());
    true
  }

  /// Region display names joined for human-readable output.
  pub fn regions_display(&self) -> String {
    self.affected_region_names.join(", ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(id: &str, region: &str) -> IncidentCandidate {
    IncidentCandidate {
      incident_id: id.into(),
      title: "Login issues".into(),
      region_code: region.into(),
      region_name: region.to_uppercase(),
    }
  }

  #[test]
  fn numeric_and_string_ids_parse() {
    let json = r#"{"id":"NA1","name":"North America","incidents":[
      {"id": 42, "titles": [{"locale": "en_US", "content": "Login issues"}]},
      {"id": "abc", "titles": []}
    ], "maintenances": []}"#;
    let status: PlatformStatus = serde_json::from_str(json).unwrap();
    assert_eq!(status.incidents[0].id, "42");
    assert_eq!(status.incidents[1].id, "abc");
    assert_eq!(status.incidents[0].titles[0].locale.as_deref(), Some("en_US"));
  }

  #[test]
  fn boolean_id_is_rejected() {
    let json = r#"{"incidents":[{"id": true, "titles": []}]}"#;
    let err = serde_json::from_str::<PlatformStatus>(json).unwrap_err();
    assert!(err.to_string().contains("incident id"));
  }

  #[test]
  fn missing_incidents_defaults_to_empty() {
    let status: PlatformStatus = serde_json::from_str(r#"{"id":"KR"}"#).unwrap();
    assert!(status.incidents.is_empty());
  }

  #[test]
  fn null_titles_read_as_empty() {
    let json = r#"{"id":"NA1","name":null,"incidents":[
      {"id": 1, "titles": null},
      {"id": 2, "titles": [{"locale": null, "content": "ok"}]},
      {"id": 3, "titles": [{"locale": "en_US", "content": null}]}
    ]}"#;
    let status: PlatformStatus = serde_json::from_str(json).unwrap();
    assert_eq!(status.incidents.len(), 3);
    assert!(status.incidents[0].titles.is_empty());
    assert_eq!(status.incidents[1].titles[0].content, "ok");
    assert_eq!(status.incidents[2].titles[0].content, "");
    assert_eq!(status.name, "");

    let status: PlatformStatus = serde_json::from_str(r#"{"incidents":null}"#).unwrap();
    assert!(status.incidents.is_empty());
  }

  #[test]
  fn add_region_keeps_lists_in_lockstep() {
    let mut incident = Incident::first_observed(&candidate("42", "na1"), 0);
    assert!(incident.add_region("br1", "BR1"));
    assert!(!incident.add_region("na1", "NA1"));
    assert_eq!(incident.affected_regions, vec!["na1", "br1"]);
    assert_eq!(incident.affected_region_names, vec!["NA1", "BR1"]);
    assert_eq!(incident.regions_display(), "NA1, BR1");
  }
}
