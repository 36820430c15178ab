// Copyright 2026 Sinkroute Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Metrics instrumentation for event routing.
//!
//! Routing is recorded through the `metrics` crate facade, so any exporter
//! (Prometheus, StatsD, ...) installed by the application picks the values
//! up. Nothing is recorded when no recorder is installed.
//!
//! # Naming Conventions
//!
//! All metrics follow Prometheus naming conventions:
//! - Prefix with application name (sinkroute\_)
//! - Include unit suffix (\_seconds, \_total)
//! - Counter metrics end with \_total
//!
//! # Labels
//!
//! - **handler**: handler name from [`HandlerConfig`](crate::config::HandlerConfig)
//! - **operation**: operation kind (`insert`, `replace`, `update`, `delete`)
//! - **reason**: skip reason (`tombstone`)
//! - **error\_type**: [`ErrorCategory`] label
//!
//! Never use document ids or error messages as labels.
//!
//! # Examples
//!
//! ```rust
//! use sinkroute_core::metrics::{self, ErrorCategory};
//!
//! metrics::init_metrics();
//! metrics::increment_events_routed("orders", "insert");
//! metrics::increment_events_failed("orders", ErrorCategory::Classification);
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::{Duration, Instant};

/// Metric name prefix for all sinkroute metrics.
#[doc(hidden)]
pub const METRIC_PREFIX: &str = "sinkroute";

/// Total number of events turned into a write model.
///
/// Type: Counter
/// Labels: handler, operation
#[doc(hidden)]
pub const EVENTS_ROUTED_TOTAL: &str = "sinkroute_events_routed_total";

/// Total number of events intentionally ignored.
///
/// Type: Counter
/// Labels: handler, reason
#[doc(hidden)]
pub const EVENTS_SKIPPED_TOTAL: &str = "sinkroute_events_skipped_total";

/// Total number of events that failed routing.
///
/// Type: Counter
/// Labels: handler, error_type
#[doc(hidden)]
pub const EVENTS_FAILED_TOTAL: &str = "sinkroute_events_failed_total";

/// Time taken to route a single event.
///
/// Type: Histogram
/// Labels: handler
/// Unit: seconds
#[doc(hidden)]
pub const ROUTE_DURATION_SECONDS: &str = "sinkroute_route_duration_seconds";

/// Initializes metric descriptions for documentation and introspection.
///
/// Call once at application startup, before routing any events.
pub fn init_metrics() {
    describe_counter!(
        EVENTS_ROUTED_TOTAL,
        "Total number of change events translated into a write model"
    );

    describe_counter!(
        EVENTS_SKIPPED_TOTAL,
        "Total number of change events skipped without a write (e.g. tombstones)"
    );

    describe_counter!(
        EVENTS_FAILED_TOTAL,
        "Total number of change events that could not be routed"
    );

    describe_histogram!(
        ROUTE_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time taken to validate, classify and translate a single change event"
    );
}

/// Increments the routed events counter.
///
/// # Arguments
///
/// * `handler` - Handler name
/// * `operation` - Operation kind name
pub fn increment_events_routed(handler: &str, operation: &str) {
    counter!(
        EVENTS_ROUTED_TOTAL,
        "handler" => handler.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Increments the skipped events counter.
pub fn increment_events_skipped(handler: &str, reason: SkipReason) {
    counter!(
        EVENTS_SKIPPED_TOTAL,
        "handler" => handler.to_string(),
        "reason" => reason.as_str()
    )
    .increment(1);
}

/// Increments the failed events counter.
pub fn increment_events_failed(handler: &str, error_category: ErrorCategory) {
    counter!(
        EVENTS_FAILED_TOTAL,
        "handler" => handler.to_string(),
        "error_type" => error_category.as_str()
    )
    .increment(1);
}

/// Records how long routing a single event took.
pub fn record_route_duration(duration: Duration, handler: &str) {
    histogram!(ROUTE_DURATION_SECONDS, "handler" => handler.to_string())
        .record(duration.as_secs_f64());
}

/// Why an event was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Compaction tombstone: identity in the key, empty value.
    Tombstone,
}

impl SkipReason {
    /// Returns the reason as a static string for metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tombstone => "tombstone",
        }
    }
}

/// Error categories for consistent metric labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The event had no key document
    MissingKey,
    /// The value could not be classified
    Classification,
    /// No operation registered for the resolved kind
    Configuration,
    /// The operation rejected the payload
    Operation,
    /// Raw record bytes could not be decoded
    Conversion,
}

impl ErrorCategory {
    /// Returns the error category as a static string for metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key_error",
            Self::Classification => "classification_error",
            Self::Configuration => "configuration_error",
            Self::Operation => "operation_error",
            Self::Conversion => "conversion_error",
        }
    }
}

/// Measures one routing call and hands the elapsed time to `record` on drop.
///
/// The handler name is borrowed, so a timer per event costs no allocation.
///
/// ```rust
/// use sinkroute_core::metrics::{record_route_duration, Timer};
///
/// let _timer = Timer::new("orders", record_route_duration);
/// // route the event; the duration is recorded when `_timer` goes out of scope
/// ```
pub struct Timer<'a, F>
where
    F: FnOnce(Duration, &str),
{
    started: Instant,
    handler: &'a str,
    record: Option<F>,
}

impl<'a, F> Timer<'a, F>
where
    F: FnOnce(Duration, &str),
{
    /// Starts timing on behalf of `handler`.
    pub fn new(handler: &'a str, record: F) -> Self {
        Self {
            started: Instant::now(),
            handler,
            record: Some(record),
        }
    }
}

impl<F> Drop for Timer<'_, F>
where
    F: FnOnce(Duration, &str),
{
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            record(self.started.elapsed(), self.handler);
        }
    }
}
