//! The URL multiplexer seam.
//!
//! Trellis registers one handler per route node and needs only two
//! operations from a multiplexer: register a pattern and dispatch a request
//! path to the node it addresses. [`Mux`] captures that seam; the default
//! implementation is [`MatchitMux`], backed by the `matchit` router.

use crate::error::BuildError;
use crate::route::NodeId;
use std::collections::HashMap;

/// A successful dispatch: the addressed route node plus any path parameters
/// the pattern captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxMatch {
    /// The route node registered for the matched pattern.
    pub node: NodeId,
    /// Captured path parameters, by name.
    pub params: HashMap<String, String>,
}

/// URL pattern registry and request-path dispatcher.
pub trait Mux: Send + Sync {
    /// Register `node` under a URL pattern. Patterns may contain `{name}`
    /// parameter placeholders.
    fn register(&mut self, pattern: &str, node: NodeId) -> Result<(), BuildError>;

    /// Resolve a request path to its registered node.
    fn dispatch(&self, path: &str) -> Option<MuxMatch>;
}

/// The default [`Mux`], backed by [`matchit::Router`].
#[derive(Default)]
pub struct MatchitMux {
    inner: matchit::Router<NodeId>,
}

impl MatchitMux {
    /// Create an empty mux.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Mux for MatchitMux {
    fn register(&mut self, pattern: &str, node: NodeId) -> Result<(), BuildError> {
        self.inner
            .insert(pattern.to_string(), node)
            .map_err(|err| match err {
                matchit::InsertError::Conflict { .. } => {
                    BuildError::DuplicateRoute(pattern.to_string())
                }
                other => BuildError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: other.to_string(),
                },
            })
    }

    fn dispatch(&self, path: &str) -> Option<MuxMatch> {
        let matched = self.inner.at(path).ok()?;
        Some(MuxMatch {
            node: *matched.value,
            params: matched
                .params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }
}
