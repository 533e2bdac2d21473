//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / settings / http
//!     → logging.rs (tracing events with structured fields)
//!     → metrics.rs (update, reload and error counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape (when observability.metrics_enabled)
//! ```

pub mod logging;
pub mod metrics;
