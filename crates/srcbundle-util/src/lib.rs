//! Shared utilities for srcbundle.
//!
//! - Logging setup with tracing
//! - `/`-separated project path helpers
//! - Wildcard matching for path denylists
//! - RAII-based timing of build phases

pub mod log;
pub mod path;
pub mod timing;
pub mod wildcard;

pub use timing::TimingGuard;
