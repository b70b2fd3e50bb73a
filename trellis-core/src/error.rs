//! Addressing error taxonomy.
//!
//! Every variant here can be produced by client-supplied input, so the
//! framework treats them as protocol errors: logged, surfaced as a server
//! error response, never retried and never silently remapped to a default
//! tree node.

use thiserror::Error;

/// Errors produced while encoding, parsing, or resolving tree addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A route path contained a character other than an ASCII digit.
    #[error("malformed route path {0:?}")]
    MalformedRoutePath(String),

    /// A route path digit selected a child index past the end of a node's
    /// children list.
    #[error(
        "route path {path:?} selects child {index} at depth {depth}, but only {len} children exist"
    )]
    OutOfRange {
        /// The full digit path being decoded.
        path: String,
        /// Depth at which decoding failed (0 = the root's children).
        depth: usize,
        /// The child index the digit selected.
        index: usize,
        /// How many children actually exist at that depth.
        len: usize,
    },

    /// A child index too large to encode as a single digit.
    #[error("child index {0} cannot be encoded as a single route digit")]
    IndexOverflow(usize),

    /// A component path was empty or contained an empty segment.
    #[error("malformed component path {0:?}")]
    MalformedComponentPath(String),

    /// A component identifier was empty or contained the path delimiter.
    #[error("invalid component identifier {0:?}")]
    InvalidIdentifier(String),

    /// No component matched the supplied path.
    #[error("no component found for path {0:?}")]
    ComponentNotFound(String),

    /// The `action` protocol requires the route id header.
    #[error("request is missing the route id header")]
    MissingRouteId,

    /// The `action` protocol requires the component id header.
    #[error("request is missing the component id header")]
    MissingComponentId,
}
