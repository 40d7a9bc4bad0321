//! Error types for the Nimbus OSR engine
//!
//! This module defines the error types used throughout the engine,
//! covering buffer allocation, GPU image import, and swap-chain state.
//! None of these errors is fatal: the swap chain degrades to "nothing
//! rendered this cycle" and the caller retries on the next bind.

use std::fmt;

/// Result type for Nimbus OSR engine operations
pub type NimbusResult<T> = Result<T, NimbusError>;

/// Nimbus OSR engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NimbusError {
    /// The external memory-buffer allocator refused or failed the request
    AllocationFailed(String),

    /// The GPU image import of an allocated buffer failed
    ImportFailed(String),

    /// A bind was requested but the pool has no surface to offer
    NoSurfaceAvailable,

    /// Backend-specific error (GPU context, allocator transport, etc.)
    BackendError(String),

    /// An operation was issued in a state that does not permit it
    InvalidOperation(String),
}

impl fmt::Display for NimbusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NimbusError::AllocationFailed(msg) => write!(f, "Buffer allocation failed: {}", msg),
            NimbusError::ImportFailed(msg) => write!(f, "GPU image import failed: {}", msg),
            NimbusError::NoSurfaceAvailable => write!(f, "No surface available to bind"),
            NimbusError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            NimbusError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for NimbusError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
