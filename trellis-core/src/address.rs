//! Compact tree addresses: digit paths for routes, delimited paths for
//! components.

use crate::error::AddressError;
use std::fmt;
use std::str::FromStr;

/// Delimiter between segments of a [`ComponentPath`].
pub const COMPONENT_DELIMITER: char = '_';

/// Maximum number of children a route node may own.
///
/// Route addresses spend exactly one digit per depth level, so a node can
/// address at most ten children. The tree builder enforces this at
/// construction time, which keeps digit-at-a-time decoding unambiguous.
pub const MAX_ROUTE_FANOUT: usize = 10;

/// The digit-path address of a route node.
///
/// One digit per depth level, each equal to the node's index among its
/// parent's children at registration time. The root is the empty path.
///
/// ```
/// use trellis_core::RoutePath;
///
/// let path = RoutePath::root().child(0).unwrap().child(2).unwrap();
/// assert_eq!(path.as_str(), "02");
/// assert_eq!(path.index_at(1), Some(2));
/// assert_eq!(path.parent(), Some(RoutePath::root().child(0).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RoutePath(String);

impl RoutePath {
    /// The address of the route tree root.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a digit path. Fails closed on any non-digit character.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AddressError::MalformedRoutePath(raw.to_string()))
        }
    }

    /// Append one level to the path in place.
    pub fn push(&mut self, index: usize) -> Result<(), AddressError> {
        if index >= MAX_ROUTE_FANOUT {
            return Err(AddressError::IndexOverflow(index));
        }
        self.0.push(char::from(b'0' + index as u8));
        Ok(())
    }

    /// The address of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Result<Self, AddressError> {
        let mut child = self.clone();
        child.push(index)?;
        Ok(child)
    }

    /// The address of this node's parent, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_string()))
        }
    }

    /// The child index selected at the given depth, if the path reaches it.
    ///
    /// Depth 0 selects among the root's children.
    pub fn index_at(&self, depth: usize) -> Option<usize> {
        self.0
            .as_bytes()
            .get(depth)
            .map(|digit| usize::from(digit - b'0'))
    }

    /// Iterate over the child index at each depth, root first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.bytes().map(|digit| usize::from(digit - b'0'))
    }

    /// Tree depth this path addresses. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoutePath {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// The delimited-path address of a component within a route's component tree.
///
/// Segments are component identifiers joined by [`COMPONENT_DELIMITER`],
/// ancestor first. The first segment names the tree's own root component, so
/// a lookup starting at that root must match it before descending.
///
/// ```
/// use trellis_core::ComponentPath;
///
/// let path = ComponentPath::new("form").unwrap().join("submit").unwrap();
/// assert_eq!(path.as_str(), "form_submit");
/// assert_eq!(path.segments().collect::<Vec<_>>(), ["form", "submit"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentPath(String);

impl ComponentPath {
    /// A single-segment path addressing a tree root.
    pub fn new(id: &str) -> Result<Self, AddressError> {
        validate_identifier(id)?;
        Ok(Self(id.to_string()))
    }

    /// Parse a delimited path. Fails closed on empty segments.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.is_empty() || raw.split(COMPONENT_DELIMITER).any(str::is_empty) {
            return Err(AddressError::MalformedComponentPath(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Append one identifier to the path in place.
    pub fn push(&mut self, id: &str) -> Result<(), AddressError> {
        validate_identifier(id)?;
        self.0.push(COMPONENT_DELIMITER);
        self.0.push_str(id);
        Ok(())
    }

    /// The path extended with one more identifier.
    pub fn join(&self, id: &str) -> Result<Self, AddressError> {
        let mut joined = self.clone();
        joined.push(id)?;
        Ok(joined)
    }

    /// Iterate over the identifier segments, ancestor first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(COMPONENT_DELIMITER)
    }

    /// The first segment: the identifier of the searched tree's root.
    pub fn head(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    /// The raw delimited string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ComponentPath {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

fn validate_identifier(id: &str) -> Result<(), AddressError> {
    if id.is_empty() || id.contains(COMPONENT_DELIMITER) {
        return Err(AddressError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}
