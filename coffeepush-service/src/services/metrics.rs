//! Metrics collection for coffeepush-service.
//!
//! HTTP request metrics come from the shared middleware; this module adds the
//! relay outcome counter and the Prometheus exposition.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const NOTIFICATIONS_TOTAL: &str = "coffeepush_notifications_total";

/// Install the global Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    if METRICS_HANDLE.set(handle).is_err() {
        tracing::debug!("Metrics handle already set by a concurrent init; keeping the first");
    }

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record the outcome of one relay attempt.
pub fn record_notification(status: &'static str) {
    counter!(NOTIFICATIONS_TOTAL, "status" => status).increment(1);
}
