//! Domain metrics for dermagen-service.
//!
//! Recorded through the `metrics` facade; the Prometheus recorder installed by
//! `service_core::observability::init_metrics` renders them on `/metrics`.

use crate::models::DiseaseClass;
use metrics::counter;

/// Count images handed back to clients, by disease class.
pub fn record_images_generated(class: DiseaseClass, count: usize) {
    counter!("dermagen_images_generated_total", "class" => class.code()).increment(count as u64);
}
