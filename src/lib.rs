//! Batch compliance auditing of employment-permit records.
//!
//! The library core lives in [`audit`]: a checks library, three named rule
//! flows, and the report aggregation that explains each verdict record by
//! record. [`config`], [`telemetry`], and [`error`] carry the runtime shell
//! used by the CLI runner.

pub mod audit;
pub mod config;
pub mod error;
pub mod telemetry;
