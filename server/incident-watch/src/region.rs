//! Static registry of polled regions.

use serde::Serialize;

use crate::error::ConfigError;

/// One independently polled deployment. Identity is `code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
  pub code: String,
  pub display_name: String,
}

impl Region {
  pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      display_name: display_name.into(),
    }
  }
}

const PLATFORM_REGIONS: &[(&str, &str)] = &[
  ("br1", "Brazil"),
  ("eun1", "Europe: North"),
  ("euw1", "Europe: West"),
  ("jp1", "Japan"),
  ("kr", "Korea"),
  ("la1", "Latin America: North"),
  ("la2", "Latin America: South"),
  ("na1", "North America"),
  ("oc1", "Oceania"),
  ("pbe1", "Public Test Environment"),
  ("ph2", "Philippines"),
  ("ru", "Russia"),
  ("sg2", "Singapore, Malaysia, & Indonesia"),
  ("th2", "Thailand"),
  ("tr1", "Turkey"),
  ("vn2", "Vietnam"),
];

/// Ordered, duplicate-free list of regions, fixed at startup.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
  regions: Vec<Region>,
}

impl RegionRegistry {
  pub fn new(regions: Vec<Region>) -> Result<Self, ConfigError> {
    for (i, region) in regions.iter().enumerate() {
      if region.code.trim().is_empty() {
        return Err(ConfigError::invalid("regions", "region code must not be empty"));
      }
      if regions[..i].iter().any(|r| r.code == region.code) {
        return Err(ConfigError::invalid(
          "regions",
          &format!("duplicate region code {}", region.code),
        ));
      }
    }
    Ok(Self { regions })
  }

  /// The live platform regions.
  pub fn platform_defaults() -> Self {
    Self {
      regions: PLATFORM_REGIONS
        .iter()
        .map(|(code, name)| Region::new(*code, *name))
        .collect(),
    }
  }

  pub fn regions(&self) -> &[Region] {
    &self.regions
  }

  pub fn len(&self) -> usize {
    self.regions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.regions.is_empty()
  }
}
