//! Normalize raw region reports into (incident, region) candidates.

use tracing::warn;

use crate::error::MalformedIncidentError;
use crate::types::*;

/// Candidates ready for the tracker plus the incidents that were skipped.
#[derive(Debug, Default)]
pub struct Normalized {
  pub candidates: Vec<IncidentCandidate>,
  pub rejected: Vec<MalformedIncidentError>,
}

/// Flatten every report into one candidate per (incident, region) pair.
///
/// Cross-region duplicates are kept; deduplication is the tracker's job.
pub fn normalize(reports: &[RawIncidentReport], preferred_locale: Option<&str>) -> Normalized {
  let mut out = Normalized::default();

  for report in reports {
    for incident in &report.status.incidents {
      match candidate_from(report, incident, preferred_locale) {
        Ok(candidate) => out.candidates.push(candidate),
        Err(e) => {
          warn!(
            region = %e.region,
            incident_id = %e.incident_id,
            reason = %e.reason,
            "Skipping malformed incident"
          );
          out.rejected.push(e);
        }
      }
    }
  }

  out
}

fn candidate_from(
  report: &RawIncidentReport,
  incident: &InboundIncident,
  preferred_locale: Option<&str>,
) -> Result<IncidentCandidate, MalformedIncidentError> {
  let region = &report.region;

  if incident.id.trim().is_empty() {
    return Err(MalformedIncidentError::new(&region.code, "", "missing incident id"));
  }

  let title = select_title(&incident.titles, preferred_locale)
    .ok_or_else(|| MalformedIncidentError::new(&region.code, &incident.id, "no title entries"))?;

  if title.trim().is_empty() {
    return Err(MalformedIncidentError::new(
      &region.code,
      &incident.id,
      "title content is empty",
    ));
  }

  Ok(IncidentCandidate {
    incident_id: incident.id.clone(),
    title: title.to_string(),
    region_code: region.code.clone(),
    region_name: region.display_name.clone(),
  })
}

/// Title in the preferred locale when offered, otherwise the first entry.
fn select_title<'a>(titles: &'a [InboundTitle], preferred_locale: Option<&str>) -> Option<&'a str> {
  preferred_locale
    .and_then(|want| {
      titles
        .iter()
        .find(|t| t.locale.as_deref().is_some_and(|l| l.eq_ignore_ascii_case(want)))
    })
    .or_else(|| titles.first())
    .map(|t| t.content.as_str())
}
