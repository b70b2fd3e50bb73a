//! The server: route registration and the request dispatch protocol.
//!
//! [`Server`] collects route declarations and an optional error handler,
//! then freezes everything into an [`App`]: the built route tree plus a mux
//! with one pattern per route node. [`App::handle`] runs the dispatch state
//! machine - one buffered render pass per request, classified by the
//! request-type header into initial, action, or link handling.
//!
//! The trees are read-only after [`Server::build`]; concurrent requests are
//! independent render passes sharing nothing mutable.

use crate::component::{Component, IdSequence};
use crate::context::{RenderContext, RequestMode, RequestParts};
use crate::error::{BuildError, TrellisError};
use crate::html::Html;
use crate::mux::{MatchitMux, Mux};
use crate::outlet::Outlet;
use crate::route::{NodeId, RouteBuilder, RouteTree};
use crate::shell::ShellView;
use crate::writer::ResponseBuffer;
use crate::{HEADER_COMPONENT_ID, HEADER_CURRENT_URL, HEADER_ROUTE_ID};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Request, Response, StatusCode, Uri};
use parking_lot::Mutex;
use std::sync::Arc;
use trellis_core::{AddressError, ComponentPath, RoutePath};

/// Response header instructing the client to swap nothing.
const RESWAP_HEADER: HeaderName = HeaderName::from_static("hx-reswap");

/// Callback invoked when a render pass fails.
///
/// Runs after the buffer has been reset to a bare 500, so it may rewrite
/// the response (set headers, write a body) before the flush.
pub type ErrorHandler = dyn Fn(&RenderContext, &TrellisError) + Send + Sync;

/// Builder for a Trellis application.
pub struct Server {
    routes: Vec<RouteBuilder>,
    error_handler: Option<Arc<ErrorHandler>>,
}

impl Server {
    /// Create a server with no routes.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            error_handler: None,
        }
    }

    /// Set a custom error handler, called when a render pass fails.
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(&RenderContext, &TrellisError) + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Register a top-level route. Registration order fixes digit ids.
    pub fn route(mut self, route: RouteBuilder) -> Self {
        self.routes.push(route);
        self
    }

    /// Freeze the route and component trees and register every route's URL
    /// pattern with the default mux.
    pub fn build(self) -> Result<App, BuildError> {
        self.build_with_mux(MatchitMux::new())
    }

    /// Like [`build`](Self::build), with a caller-supplied mux.
    pub fn build_with_mux(self, mut mux: impl Mux + 'static) -> Result<App, BuildError> {
        let mut ids = IdSequence::new();
        let shell = Component::builder(ShellView).id("shell").build(&mut ids)?;
        let tree = RouteTree::build(shell, self.routes)?;
        for id in tree.ids() {
            let node = tree.node(id);
            if node.parent().is_none() {
                continue;
            }
            mux.register(node.full_path(), id)?;
            tracing::info!(
                path = node.full_path(),
                route = %node.path_id(),
                "registered route"
            );
        }
        Ok(App {
            tree: Arc::new(tree),
            mux: Box::new(mux),
            error_handler: self.error_handler,
        })
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

/// A built application: frozen trees, a mux, and the dispatch protocol.
pub struct App {
    tree: Arc<RouteTree>,
    mux: Box<dyn Mux>,
    error_handler: Option<Arc<ErrorHandler>>,
}

impl App {
    /// The built route tree.
    pub fn routes(&self) -> &RouteTree {
        &self.tree
    }

    /// Handle one request: classify, resolve the addressed subtree, render
    /// into the buffer, flush once.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let path = request.uri().path().to_string();
        let Some(matched) = self.mux.dispatch(&path) else {
            tracing::debug!(%path, "no route matched");
            let mut buffer = ResponseBuffer::new();
            buffer.set_status(StatusCode::NOT_FOUND);
            return buffer.into_response();
        };

        let mode = RequestMode::classify(request.headers());
        let parts = Arc::new(RequestParts::new(request, matched.params));
        let response = Arc::new(Mutex::new(ResponseBuffer::new()));
        tracing::debug!(%path, ?mode, route = %self.tree.node(matched.node).path_id(), "dispatching");

        if let Err(err) = self
            .dispatch(mode, matched.node, &parts, &response)
            .await
        {
            tracing::error!(error = %err, %path, "render pass failed");
            {
                let mut buffer = response.lock();
                buffer.reset();
                buffer.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
            if let Some(handler) = &self.error_handler {
                let ctx = RenderContext::new(
                    self.tree.clone(),
                    parts.clone(),
                    response.clone(),
                    mode,
                    RoutePath::root(),
                );
                handler(&ctx, &err);
            }
        }

        let buffer = std::mem::take(&mut *response.lock());
        buffer.into_response()
    }

    async fn dispatch(
        &self,
        mode: RequestMode,
        node: NodeId,
        parts: &Arc<RequestParts>,
        response: &Arc<Mutex<ResponseBuffer>>,
    ) -> Result<(), TrellisError> {
        match mode {
            RequestMode::Initial => self.render_full(node, parts, response).await,
            RequestMode::Action => self.render_action(parts, response).await,
            RequestMode::Link => self.render_link(node, parts, response).await,
        }
    }

    /// Full page load: render from the root, descending through the
    /// requested digit path (default child 0 where it runs out).
    async fn render_full(
        &self,
        node: NodeId,
        parts: &Arc<RequestParts>,
        response: &Arc<Mutex<ResponseBuffer>>,
    ) -> Result<(), TrellisError> {
        let requested = match parts.header(HEADER_ROUTE_ID) {
            Some(raw) => RoutePath::parse(raw)?,
            None => self.tree.node(node).path_id().clone(),
        };
        let ctx = RenderContext::new(
            self.tree.clone(),
            parts.clone(),
            response.clone(),
            RequestMode::Initial,
            requested,
        );
        let mut out = Html::new();
        ctx.render_route(self.tree.root(), &mut out).await?;
        response.lock().write(out.as_str().as_bytes());
        Ok(())
    }

    /// Action: decode the displayed route from the root by digit path, find
    /// the target component, render only its action output.
    async fn render_action(
        &self,
        parts: &Arc<RequestParts>,
        response: &Arc<Mutex<ResponseBuffer>>,
    ) -> Result<(), TrellisError> {
        let raw_route = parts
            .header(HEADER_ROUTE_ID)
            .ok_or(AddressError::MissingRouteId)?;
        let route_path = RoutePath::parse(raw_route)?;
        let node = self.tree.decode(&route_path)?;

        let raw_component = parts
            .header(HEADER_COMPONENT_ID)
            .ok_or(AddressError::MissingComponentId)?;
        let component_path = ComponentPath::parse(raw_component)?;
        let component = Component::find(self.tree.node(node).component(), &component_path)?;

        let ctx = RenderContext::new(
            self.tree.clone(),
            parts.clone(),
            response.clone(),
            RequestMode::Action,
            route_path,
        );
        let ctx = ctx.enter_route(node)?.with_component_path(component_path);

        let mut out = Html::new();
        ctx.render_component_action(&component, &mut out).await?;
        response.lock().write(out.as_str().as_bytes());
        Ok(())
    }

    /// Link navigation: no-op if the client is already on the requested
    /// URL, otherwise render only the parent's outlet swap around the
    /// target subtree.
    async fn render_link(
        &self,
        node: NodeId,
        parts: &Arc<RequestParts>,
        response: &Arc<Mutex<ResponseBuffer>>,
    ) -> Result<(), TrellisError> {
        let already_displayed = parts
            .header(HEADER_CURRENT_URL)
            .and_then(|raw| raw.parse::<Uri>().ok())
            .is_some_and(|displayed| displayed.path() == parts.path());
        if already_displayed {
            tracing::debug!(path = parts.path(), "link target already displayed");
            response
                .lock()
                .insert_header(RESWAP_HEADER, HeaderValue::from_static("none"));
            return Ok(());
        }

        let target = self.tree.node(node);
        let parent = target.parent().unwrap_or(self.tree.root());
        let ctx = RenderContext::new(
            self.tree.clone(),
            parts.clone(),
            response.clone(),
            RequestMode::Link,
            target.path_id().clone(),
        );
        let ctx = ctx.enter_route(parent)?;

        let mut out = Html::new();
        Outlet::render_swap(&ctx, node, &mut out).await?;
        response.lock().write(out.as_str().as_bytes());
        Ok(())
    }
}

#[cfg(feature = "tower")]
mod service {
    use super::App;
    use bytes::Bytes;
    use futures::future::BoxFuture;
    use http::{Request, Response};
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    /// A cloneable `tower::Service` wrapper around [`App`].
    #[derive(Clone)]
    pub struct AppService {
        app: Arc<App>,
    }

    impl App {
        /// Wrap the app for use with any tower-compatible server.
        pub fn into_service(self) -> AppService {
            AppService {
                app: Arc::new(self),
            }
        }
    }

    impl tower::Service<Request<Bytes>> for AppService {
        type Response = Response<Bytes>;
        type Error = Infallible;
        type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: Request<Bytes>) -> Self::Future {
            let app = self.app.clone();
            Box::pin(async move { Ok(app.handle(request).await) })
        }
    }
}

#[cfg(feature = "tower")]
pub use service::AppService;
