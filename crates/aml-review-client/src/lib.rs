//! HTTP client for the external workflow engine.
//!
//! The engine is the system of record for per-transaction variables and
//! the pending human review task. This crate only reads the variable
//! store and completes review tasks; interpreting the variables is
//! `aml-review-core`'s job.
//!
//! Request/response only: no retry, no backoff. A failed call surfaces
//! as a terminal error to the caller.

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{bag_from_variables, EngineClient, EngineVariable, TRUNCATED_MARKER};
pub use error::ClientError;
