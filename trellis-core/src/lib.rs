//! # trellis-core
//!
//! Addressing vocabulary for the Trellis server-side UI framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions that need to speak Trellis addresses without pulling in the
//! full `trellis` implementation.
//!
//! # Two Address Families
//!
//! Trellis gives every node in its two build-time trees a compact,
//! reconstructable identifier that a hypermedia client can echo back inside
//! HTTP headers:
//!
//! ## Route paths ([`RoutePath`])
//!
//! Routes form a shallow tree addressed by the server itself, so compactness
//! wins: one digit per depth level, equal to the child's index among its
//! siblings at registration time, concatenated root-to-leaf. `"02"` means
//! root → child 0 → grandchild 2. The empty string addresses the root.
//!
//! ## Component paths ([`ComponentPath`])
//!
//! Components form per-route trees of arbitrary fan-out whose addresses must
//! survive a round trip through the client verbatim, so the encoding is a
//! human-inspectable chain of identifiers joined by `_`, e.g. `"form_submit"`.
//!
//! # Fail-Closed Decoding
//!
//! A client-supplied address can be stale (server redeploy), tampered with,
//! or simply wrong. Decoding therefore never falls back to a default node:
//! every malformed or out-of-range address is an [`AddressError`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod address;
mod error;

pub use address::{COMPONENT_DELIMITER, ComponentPath, MAX_ROUTE_FANOUT, RoutePath};
pub use error::AddressError;
