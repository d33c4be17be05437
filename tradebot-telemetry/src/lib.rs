//! # Tradebot Telemetry
//!
//! `tracing` setup for the `tradebot` binary. The console gets the level
//! from `RUST_LOG` or the config; each run also writes a DEBUG file named
//! after its start time. Both outputs pass through
//! [`masking::SensitiveDataMasker`], so API keys and signatures never reach
//! a terminal or disk in full.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Subscriber setup
pub mod logging;

/// Secret redaction
pub mod masking;

/// Common imports
pub mod prelude {
    pub use crate::logging::{FileOutput, LogConfig, LogFormat, LogHandle, init_logging};
    pub use crate::masking::SensitiveDataMasker;
}
