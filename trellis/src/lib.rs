//! # trellis
//!
//! A server-side hypermedia UI framework: a tree of components bound to a
//! tree of routes, with three partial-update protocols over HTTP.
//!
//! # Architecture
//!
//! Trellis is built from five layers, each depending only on the ones
//! before it:
//!
//! ## Layer 1: Component Tree ([`Component`])
//!
//! The recursively composed unit of view logic. A component owns a required
//! [`View`] plus optional [`Loader`], [`Action`] and [`Head`] capabilities,
//! and explicitly registered named children. Wired once at startup, frozen
//! for the life of the process.
//!
//! ## Layer 2: Route Tree ([`RouteTree`])
//!
//! Maps URL path segments to components, with ordered children rooted at an
//! implicit index route serving the page shell. Built once, read-only
//! afterwards.
//!
//! ## Layer 3: Addressing ([`RoutePath`], [`ComponentPath`])
//!
//! Every node in both trees gets a stable, compact, reconstructable
//! identifier: digit paths for routes, `_`-delimited identifier chains for
//! components. Decoding client-supplied addresses fails closed - a stale or
//! tampered address is a protocol error, never a silent fallback.
//!
//! ## Layer 4: Dispatch Protocol ([`Server`], [`App`])
//!
//! Classifies each request by the [`HEADER_REQUEST_TYPE`] header into one of
//! three modes and renders exactly the addressed subtree:
//!
//! - **initial** (absent header): full page from the root, default-child
//!   descent unless a digit path says otherwise
//! - **`action`**: one component's action output, located by route digit
//!   path + component path, nothing else
//! - **`link`**: an out-of-band [`Outlet`] swap of the navigated route,
//!   with an idempotence check against the client's current URL
//!
//! ## Layer 5: Render Context ([`RenderContext`])
//!
//! The per-request state threaded through every recursive render call:
//! current position in both trees, descent path, request access, and the
//! buffered response ([`ResponseBuffer`]) that lets any handler discard
//! partial output and redirect instead.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut ids = IdSequence::new();
//! let counter = Component::builder(CounterView)
//!     .id("counter")
//!     .action(CounterAction)
//!     .build(&mut ids)?;
//!
//! let app = Server::new()
//!     .route(RouteBuilder::new("/", counter_page(counter, &mut ids)?))
//!     .build()?;
//!
//! // hand `app.handle(request)` to your HTTP server of choice
//! ```

#![deny(clippy::wildcard_imports)]

pub mod bind;
pub mod component;
pub mod context;
pub mod element;
pub mod error;
pub mod html;
pub mod mux;
pub mod outlet;
pub mod route;
pub mod server;
mod shell;
pub mod view;
pub mod writer;

// Re-exports
pub use bind::{BindError, FormValues, bind_form, bind_json, from_values};
pub use component::{Component, ComponentBuilder, IdSequence};
pub use context::{RenderContext, RequestMode, RequestParts};
pub use element::{Anchor, Button, Element, Form, swap};
pub use error::{BoxError, BuildError, RenderError, TrellisError};
pub use html::Html;
pub use mux::{MatchitMux, Mux, MuxMatch};
pub use outlet::Outlet;
pub use route::{NodeId, RouteBuilder, RouteNode, RouteTree};
#[cfg(feature = "tower")]
pub use server::AppService;
pub use server::{App, ErrorHandler, Server};
pub use trellis_core::{AddressError, COMPONENT_DELIMITER, ComponentPath, MAX_ROUTE_FANOUT, RoutePath};
pub use view::{Action, Head, Loader, LoaderData, RenderResult, StaticLoader, View};
pub use writer::ResponseBuffer;

/// Request header classifying the request: absent, [`REQUEST_TYPE_ACTION`]
/// or [`REQUEST_TYPE_LINK`].
pub const HEADER_REQUEST_TYPE: &str = "trellis-request";

/// Request header carrying the digit path of the currently displayed route.
pub const HEADER_ROUTE_ID: &str = "trellis-route";

/// Request header carrying the delimited path of the target component.
pub const HEADER_COMPONENT_ID: &str = "trellis-component";

/// Request header carrying the client's currently displayed URL, sent by
/// the hypermedia exchange library.
pub const HEADER_CURRENT_URL: &str = "hx-current-url";

/// [`HEADER_REQUEST_TYPE`] value selecting the action protocol.
pub const REQUEST_TYPE_ACTION: &str = "action";

/// [`HEADER_REQUEST_TYPE`] value selecting the link protocol.
pub const REQUEST_TYPE_LINK: &str = "link";
