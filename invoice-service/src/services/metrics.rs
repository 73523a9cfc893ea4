//! Prometheus metrics for invoice-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    HistogramVec, TextEncoder,
};

/// Successful renders by surface and invoice kind.
pub static RENDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_renders_total",
        "Total number of invoices rendered",
        &["surface", "kind"] // preview/print, gst/non-gst
    )
    .expect("Failed to register renders_total")
});

/// Failed renders by error type.
pub static RENDER_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_render_errors_total",
        "Total number of failed invoice renders by error type",
        &["error_type"]
    )
    .expect("Failed to register render_errors_total")
});

/// End-to-end render duration, fetch included.
pub static RENDER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_render_duration_seconds",
        "Invoice render duration in seconds",
        &["surface"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register render_duration")
});

/// Invoices that recorded both a discount percentage and amount.
pub static DISCOUNT_PRECEDENCE_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "invoice_discount_precedence_total",
        "Invoices where the discount percentage overrode a recorded discount amount"
    )
    .expect("Failed to register discount_precedence_total")
});

/// Record source query duration.
pub static SOURCE_FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_source_fetch_duration_seconds",
        "Record source query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register source_fetch_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&RENDERS_TOTAL);
    Lazy::force(&RENDER_ERRORS_TOTAL);
    Lazy::force(&RENDER_DURATION);
    Lazy::force(&DISCOUNT_PRECEDENCE_TOTAL);
    Lazy::force(&SOURCE_FETCH_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_metrics_are_exported() {
        init_metrics();
        RENDERS_TOTAL.with_label_values(&["preview", "gst"]).inc();
        let text = get_metrics();
        assert!(text.contains("invoice_renders_total"));
    }
}
