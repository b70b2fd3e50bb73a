//! Shared fixtures for the integration suites: small views, actions and
//! loaders, plus request/response helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use trellis::{
    Action, Anchor, Button, Html, Outlet, RenderContext, RenderResult, View,
};

// ============================================================================
// Views
// ============================================================================

/// A view that writes fixed markup.
pub struct TextView(pub &'static str);

#[async_trait]
impl View for TextView {
    async fn view(&self, _ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw(self.0);
        Ok(())
    }
}

/// A view that writes a marker, then places the active child route in an
/// outlet.
pub struct PageView(pub &'static str);

#[async_trait]
impl View for PageView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw("[");
        out.raw(self.0);
        out.raw("]");
        Outlet::new().render(ctx, out).await
    }
}

/// A view that writes a marker, then renders one registered child component
/// inline.
pub struct ParentView {
    pub marker: &'static str,
    pub child: &'static str,
}

#[async_trait]
impl View for ParentView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw("[");
        out.raw(self.marker);
        out.raw("]");
        ctx.render_child(self.child, out).await
    }
}

/// A view that echoes its component's `String` loader data.
pub struct LoaderView;

#[async_trait]
impl View for LoaderView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        let data = ctx.loader_data::<String>().cloned().unwrap_or_default();
        out.text(&data);
        Ok(())
    }
}

/// A view that renders an action button.
pub struct ButtonView;

#[async_trait]
impl View for ButtonView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        Button::new("go").render(ctx, out)
    }
}

/// A view that renders a navigation link to the given route.
pub struct AnchorView(pub &'static str);

#[async_trait]
impl View for AnchorView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        Anchor::new(self.0).render(ctx, out, "navigate")
    }
}

// ============================================================================
// Actions
// ============================================================================

/// An action that writes fixed markup.
pub struct TextAction(pub &'static str);

#[async_trait]
impl Action for TextAction {
    async fn action(&self, _ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw(self.0);
        Ok(())
    }
}

/// An action that writes output, then decides to redirect, then writes more.
/// Only the redirect must survive.
pub struct RedirectAction(pub &'static str);

#[async_trait]
impl Action for RedirectAction {
    async fn action(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw("written before the redirect");
        ctx.redirect(self.0)?;
        out.raw("written after the redirect");
        Ok(())
    }
}

// ============================================================================
// Request helpers
// ============================================================================

/// A GET request with no protocol headers.
pub fn get(path: &str) -> Request<Bytes> {
    request(path, &[])
}

/// A request with the given headers.
pub fn request(path: &str, headers: &[(&str, &str)]) -> Request<Bytes> {
    let mut builder = Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Bytes::new()).unwrap()
}

/// The response body as UTF-8.
pub fn body_str(response: &Response<Bytes>) -> &str {
    std::str::from_utf8(response.body()).unwrap()
}
