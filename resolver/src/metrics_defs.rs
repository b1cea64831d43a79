//! Metrics definitions for the flight resolver.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PROVIDER_REQUESTS: MetricDef = MetricDef {
    name: "provider.requests",
    metric_type: MetricType::Counter,
    description: "Number of provider lookups, tagged by provider and outcome",
};

pub const PROVIDER_DURATION: MetricDef = MetricDef {
    name: "provider.duration",
    metric_type: MetricType::Histogram,
    description: "Time for a provider to answer a lookup in seconds",
};

pub const RESOLUTION_SOURCE: MetricDef = MetricDef {
    name: "resolution.source",
    metric_type: MetricType::Counter,
    description: "Number of resolved flights, tagged by the source of the returned record",
};

pub const ALL_METRICS: &[MetricDef] = &[PROVIDER_REQUESTS, PROVIDER_DURATION, RESOLUTION_SOURCE];
