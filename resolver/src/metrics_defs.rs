//! Metrics definitions for the resolver.

use shared::metrics_defs::{MetricDef, MetricType};

pub const RESOLVE_DURATION: MetricDef = MetricDef {
    name: "index.resolve.duration",
    metric_type: MetricType::Histogram,
    description: "Time to resolve an index document in seconds",
};

pub const RESOLVE_SUCCESS: MetricDef = MetricDef {
    name: "index.resolve.success",
    metric_type: MetricType::Counter,
    description: "Number of index documents resolved",
};

pub const RESOLVE_ERROR: MetricDef = MetricDef {
    name: "index.resolve.error",
    metric_type: MetricType::Counter,
    description: "Number of failed resolutions. Tagged with critical.",
};

pub const ALL_METRICS: &[MetricDef] = &[RESOLVE_DURATION, RESOLVE_SUCCESS, RESOLVE_ERROR];
