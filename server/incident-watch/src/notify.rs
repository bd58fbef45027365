//! Notifier dispatcher: one message per newly observed incident.
//!
//! Sinks sit behind [`NotifySink`] so delivery can be swapped (webhook, log-only,
//! or a recorder in tests). Sends for one cycle run concurrently and are joined
//! before the dispatcher reports, so every failure is observable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::NotifyError;
use crate::types::Incident;

/// Accepts one text payload per call.
#[async_trait]
pub trait NotifySink: Send + Sync {
  fn name(&self) -> &'static str;

  async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Posts `{"content": text}` to a webhook URL.
pub struct WebhookSink {
  url: String,
  client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
  content: &'a str,
}

impl WebhookSink {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      client: reqwest::Client::new(),
    }
  }
}

#[async_trait]
impl NotifySink for WebhookSink {
  fn name(&self) -> &'static str {
    "webhook"
  }

  async fn send(&self, text: &str) -> Result<(), NotifyError> {
    let response = self
      .client
      .post(&self.url)
      .json(&WebhookPayload { content: text })
      .send()
      .await?;

    if response.status().is_success() {
      return Ok(());
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(sink = "webhook", status, body = %body, "Webhook request failed");
    Err(NotifyError::Rejected { status, body })
  }
}

/// Writes notifications to the log instead of delivering them.
pub struct LogSink;

#[async_trait]
impl NotifySink for LogSink {
  fn name(&self) -> &'static str {
    "log"
  }

  async fn send(&self, text: &str) -> Result<(), NotifyError> {
    info!(sink = "log", message = %text, "Notification (delivery disabled)");
    Ok(())
  }
}

/// Pick the sink the configuration asks for.
pub fn sink_from_config(config: &Config) -> Arc<dyn NotifySink> {
  match (&config.webhook_url, config.notify_disabled) {
    (Some(url), false) => {
      info!("Webhook notifications enabled");
      Arc::new(WebhookSink::new(url.clone()))
    }
    (_, true) => {
      info!("Notifications disabled, logging only");
      Arc::new(LogSink)
    }
    (None, false) => {
      warn!("No notification webhook configured, logging only");
      Arc::new(LogSink)
    }
  }
}

/// Incidents whose first observation is `cycle`.
pub fn select_new(snapshot: &[Incident], cycle: u64) -> Vec<&Incident> {
  snapshot
    .iter()
    .filter(|i| i.first_seen_cycle == cycle)
    .collect()
}

pub fn format_message(incident: &Incident) -> String {
  format!(
    "⚠ Service Issue: {}. Regions affected: {}",
    incident.title,
    incident.regions_display()
  )
}

/// Per-incident delivery outcome for one cycle.
#[derive(Debug, Default)]
pub struct DispatchReport {
  pub sent: Vec<String>,
  pub failed: Vec<(String, NotifyError)>,
}

impl DispatchReport {
  pub fn attempted(&self) -> usize {
    self.sent.len() + self.failed.len()
  }
}

/// Send one notification per incident concurrently and wait for all of them.
///
/// Each send gets `per_send_timeout`; a send that overruns it counts as failed.
pub async fn dispatch(
  sink: &dyn NotifySink,
  incidents: &[&Incident],
  per_send_timeout: Duration,
) -> DispatchReport {
  let mut report = DispatchReport::default();

  if incidents.is_empty() {
    info!("No notifications to send");
    return report;
  }

  let sends = incidents.iter().map(|incident| async move {
    let text = format_message(incident);
    debug!(sink = sink.name(), incident_id = %incident.id, "Sending notification");
    let result = match tokio::time::timeout(per_send_timeout, sink.send(&text)).await {
      Ok(result) => result,
      Err(_) => Err(NotifyError::Timeout(per_send_timeout)),
    };
    (incident.id.clone(), result)
  });

  for (id, result) in join_all(sends).await {
    match result {
      Ok(()) => report.sent.push(id),
      Err(e) => {
        error!(sink = sink.name(), incident_id = %id, error = %e, "Sending notification failed");
        report.failed.push((id, e));
      }
    }
  }

  info!(
    sink = sink.name(),
    attempted = report.attempted(),
    sent = report.sent.len(),
    failed = report.failed.len(),
    "Notifications dispatched"
  );
  report
}
