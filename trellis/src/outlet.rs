//! The outlet composition mechanism.
//!
//! A route that owns children renders an [`Outlet`] at the point in its view
//! where the active child's output belongs. On a normal render the outlet
//! emits its placeholder element and the child's subtree inline, in one
//! document. On a link navigation the framework emits only the replacement:
//! the same element id plus an `hx-swap-oob` marker, so the client swaps the
//! fragment into the already-rendered page without the parent re-rendering.
//!
//! Both sides derive the element id from the owning route's digit path
//! ([`RouteNode::outlet_id`](crate::route::RouteNode::outlet_id)), so
//! placeholder and replacement agree by construction.

use crate::context::RenderContext;
use crate::html::Html;
use crate::route::NodeId;
use crate::view::RenderResult;

/// Placeholder for the active child route's output.
#[derive(Debug, Default)]
pub struct Outlet {
    class: Option<String>,
}

impl Outlet {
    /// Create an outlet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class attribute to the placeholder element.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Render the placeholder and, inline, the active child route's subtree.
    ///
    /// A route without children renders an empty placeholder.
    pub async fn render(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw("<div");
        out.attr("id", &ctx.outlet_id());
        if let Some(class) = &self.class {
            out.attr("class", class);
        }
        out.raw(">");
        if let Some(child) = ctx.active_child_id() {
            ctx.render_route(child, out).await?;
        }
        out.raw("</div>");
        Ok(())
    }

    /// Render the out-of-band replacement for a link navigation: the current
    /// route's outlet element, marked for swap, containing `target`'s
    /// subtree. The current route itself is not re-rendered.
    pub(crate) async fn render_swap(
        ctx: &RenderContext,
        target: NodeId,
        out: &mut Html,
    ) -> RenderResult {
        out.raw("<div");
        out.attr("id", &ctx.outlet_id());
        out.attr("hx-swap-oob", "true");
        out.raw(">");
        ctx.render_route(target, out).await?;
        out.raw("</div>");
        Ok(())
    }
}
