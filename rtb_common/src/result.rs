//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `SampleError`, so helpers can simply return
//! `Result<T>`.
use crate::error::SampleError;

/// Workspace-wide `Result` alias with `SampleError` as the default error.
pub type Result<T, E = SampleError> = std::result::Result<T, E>;
