//! Command telemetry
//!
//! Captures one timed record per operation: name, outcome, duration, and
//! error detail on failure. The collector keeps a flat, append-only log
//! ordered by completion time; nested spans are all recorded, unnested.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of a recorded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryOutcome {
    Success,
    Failure,
}

impl TelemetryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryOutcome::Success => "success",
            TelemetryOutcome::Failure => "failure",
        }
    }
}

/// One timed operation record
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    pub name: String,
    pub outcome: TelemetryOutcome,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub error: Option<String>,
}

/// Capture command timings and failures for one invocation.
#[derive(Default)]
pub struct TelemetryCollector {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn record(
        &self,
        name: impl Into<String>,
        outcome: TelemetryOutcome,
        started_at: DateTime<Utc>,
        duration: Duration,
        error: Option<String>,
    ) {
        let event = TelemetryEvent {
            name: name.into(),
            outcome,
            started_at,
            duration,
            error,
        };
        debug!(
            operation = %event.name,
            outcome = event.outcome.as_str(),
            duration_ms = duration.as_millis() as u64,
            "Telemetry recorded"
        );
        self.events.lock().push(event);
    }

    /// Open a scoped span for a named operation. The span records exactly
    /// one event on every exit path: explicit `fail`, normal drop, or drop
    /// during unwinding.
    pub fn span(&self, name: impl Into<String>) -> TelemetrySpan<'_> {
        TelemetrySpan {
            collector: self,
            name: name.into(),
            started_at: Utc::now(),
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Invoke `operation` and record exactly one event covering the call,
    /// returning its result unchanged.
    pub fn track<T, E, F>(&self, name: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let result = operation();
        match &result {
            Ok(_) => self.record(
                name,
                TelemetryOutcome::Success,
                started_at,
                start.elapsed(),
                None,
            ),
            Err(error) => self.record(
                name,
                TelemetryOutcome::Failure,
                started_at,
                start.elapsed(),
                Some(error.to_string()),
            ),
        }
        result
    }

    /// Snapshot of all recorded events, in completion order.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

/// Scoped telemetry span with guaranteed-release semantics
pub struct TelemetrySpan<'a> {
    collector: &'a TelemetryCollector,
    name: String,
    started_at: DateTime<Utc>,
    start: Instant,
    recorded: bool,
}

impl TelemetrySpan<'_> {
    /// Record a failure outcome with error detail.
    pub fn fail(mut self, error: &dyn std::fmt::Display) {
        self.recorded = true;
        self.collector.record(
            self.name.clone(),
            TelemetryOutcome::Failure,
            self.started_at,
            self.start.elapsed(),
            Some(error.to_string()),
        );
    }

    /// Record a success outcome now instead of at drop.
    pub fn succeed(mut self) {
        self.recorded = true;
        self.collector.record(
            self.name.clone(),
            TelemetryOutcome::Success,
            self.started_at,
            self.start.elapsed(),
            None,
        );
    }
}

impl Drop for TelemetrySpan<'_> {
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        let (outcome, error) = if std::thread::panicking() {
            (TelemetryOutcome::Failure, Some("panicked".to_string()))
        } else {
            (TelemetryOutcome::Success, None)
        };
        self.collector.record(
            self.name.clone(),
            outcome,
            self.started_at,
            self.start.elapsed(),
            error,
        );
    }
}
