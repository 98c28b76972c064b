//! # Marketplace Telemetry
//!
//! Structured logging bootstrap for the escrow subsystem.
//!
//! The engine itself only emits `tracing` events with structured fields
//! (`contract_id`, `milestone_seq`, `actor`); this crate installs the
//! subscriber that turns those into console or JSON output.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use marketplace_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//!     // tracing macros now produce structured output
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ESCROW_SERVICE_NAME` | `escrow-engine` | Service name in log fields |
//! | `ESCROW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `ESCROW_JSON_LOGS` | `false` (true in containers) | JSON output |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_telemetry, TelemetryError};
