//! Error types for Trellis.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`TrellisError`] - Top-level error type for all framework operations
//! - [`RenderError`] - Errors raised during a render pass
//! - [`BuildError`] - Wiring-time errors from tree and mux construction
//!
//! Addressing errors live in `trellis-core` ([`AddressError`]) and convert
//! into both [`RenderError`] and [`TrellisError`].

use thiserror::Error;
use trellis_core::AddressError;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Trellis operations.
#[derive(Error, Debug)]
pub enum TrellisError {
    /// A tree address supplied by the client could not be resolved.
    #[error("addressing error: {0}")]
    Address(#[from] AddressError),

    /// An error occurred during a render pass.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error occurred while wiring the application.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while rendering a tree node into the sink.
///
/// The buffered response writer guarantees that none of these leave a
/// half-written fragment on the wire: on failure the buffer is reset before
/// the error response is flushed.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The render sink rejected a write.
    #[error("write to render sink failed")]
    Sink(#[from] std::fmt::Error),

    /// A component's data loader failed.
    #[error("loader failed")]
    Loader(#[source] BoxError),

    /// A view or action failed while producing output.
    #[error("view failed")]
    View(#[source] BoxError),

    /// A lookup performed during rendering used a bad address.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// A custom render error.
    #[error(transparent)]
    Custom(BoxError),
}

impl From<BoxError> for RenderError {
    fn from(err: BoxError) -> Self {
        RenderError::Custom(err)
    }
}

impl From<BoxError> for TrellisError {
    fn from(err: BoxError) -> Self {
        TrellisError::Custom(err)
    }
}

/// Errors detected while building the route tree, component tree, or mux.
///
/// These can only occur during application wiring, before any request is
/// served.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Two sibling components were registered with the same identifier.
    #[error("duplicate child component id {0:?}")]
    DuplicateChildId(String),

    /// An explicit component identifier was empty or contained the path
    /// delimiter.
    #[error("invalid component identifier {0:?}")]
    InvalidIdentifier(String),

    /// A route node exceeded the addressable fan-out of one digit per
    /// depth level.
    #[error("route {path:?} has more children than a single digit can address")]
    TooManyChildren {
        /// Full URL path of the overfull route.
        path: String,
    },

    /// Two routes resolved to the same URL pattern.
    #[error("duplicate route pattern {0:?}")]
    DuplicateRoute(String),

    /// The mux rejected a URL pattern.
    #[error("route pattern {pattern:?} could not be registered: {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The mux's explanation.
        reason: String,
    },
}
