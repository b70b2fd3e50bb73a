//! Component capability traits.
//!
//! A component is assembled from up to four capabilities, all object-safe
//! async traits so the trees can hold them behind `Arc<dyn _>`:
//!
//! - [`View`] - produce the component's markup (required)
//! - [`Loader`] - fetch per-request data before the view or action runs
//! - [`Action`] - handle a partial-update request and render its fragment
//! - [`Head`] - contribute `<head>` metadata when the component's route is
//!   active on a full page load
//!
//! Capabilities receive a [`RenderContext`] snapshot and write into the
//! shared [`Html`] sink. They are wired once at application startup and are
//! never mutated afterwards; each request sees them through shared
//! references only.

use crate::context::RenderContext;
use crate::error::{BoxError, RenderError};
use crate::html::Html;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Data produced by a [`Loader`], stored type-erased on the render context
/// and recovered with [`RenderContext::loader_data`].
pub type LoaderData = Arc<dyn Any + Send + Sync>;

/// Result of a render-producing capability call.
pub type RenderResult = Result<(), RenderError>;

/// Produces a component's markup.
///
/// This is the one required capability. The view writes its markup into
/// `out` and may render registered children via
/// [`RenderContext::render_child`] or place the active child route with an
/// [`Outlet`](crate::outlet::Outlet).
#[async_trait]
pub trait View: Send + Sync {
    /// Render this view into the sink.
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult;
}

/// Fetches data for a component before its view or action renders.
///
/// The framework awaits the loader when it enters the component and stores
/// the result on the context, so the view can read it synchronously with
/// [`RenderContext::loader_data`]. This is the only point in a render pass
/// expected to touch external I/O.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Load the component's data for this request.
    async fn load(&self, ctx: &RenderContext) -> Result<LoaderData, BoxError>;
}

/// Handles an `action` partial-update request targeted at one component.
///
/// Only the action's output is sent back to the client: no page shell, no
/// ancestor or sibling content. An action commonly performs a side effect
/// and then either re-renders the component's markup or calls
/// [`RenderContext::redirect`].
#[async_trait]
pub trait Action: Send + Sync {
    /// Perform the action and render its fragment into the sink.
    async fn action(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult;
}

/// Contributes `<head>` metadata for full page loads.
#[async_trait]
pub trait Head: Send + Sync {
    /// Render head elements (title, meta, links) into the sink.
    async fn head(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult;
}

/// A [`Loader`] that serves a clone of a fixed value.
///
/// Convenience for components whose data is known at wiring time; usually
/// reached through [`ComponentBuilder::data`](crate::component::ComponentBuilder::data).
pub struct StaticLoader<T> {
    value: T,
}

impl<T: Clone + Send + Sync + 'static> StaticLoader<T> {
    /// Create a loader serving clones of `value`.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Loader for StaticLoader<T> {
    async fn load(&self, _ctx: &RenderContext) -> Result<LoaderData, BoxError> {
        Ok(Arc::new(self.value.clone()))
    }
}
