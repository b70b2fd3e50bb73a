//! Per-request render context.
//!
//! A [`RenderContext`] is created at the start of request handling and
//! threaded through every recursive render call. It carries the resolved
//! position in both trees (current route node, accumulated component path),
//! the digit path driving child-route descent, the request classification,
//! and shared handles to the request and the buffered response.
//!
//! Descent never mutates a caller's context: each tree node receives a
//! cheap clone with its own position written in, so siblings cannot observe
//! one another's mutations. The context is owned by the task handling its
//! request and must not be retained after the response is flushed.

use crate::bind::FormValues;
use crate::component::Component;
use crate::error::RenderError;
use crate::html::Html;
use crate::route::{NodeId, RouteNode, RouteTree};
use crate::view::{LoaderData, RenderResult};
use crate::writer::ResponseBuffer;
use crate::{HEADER_COMPONENT_ID, HEADER_REQUEST_TYPE, HEADER_ROUTE_ID};
use crate::{REQUEST_TYPE_ACTION, REQUEST_TYPE_LINK};
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request, Uri};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use trellis_core::{AddressError, ComponentPath, RoutePath};

/// Classification of an incoming request by the request-type header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Full page load: no request-type header (or an unrecognized value).
    #[default]
    Initial,
    /// Out-of-band re-render of a single component's action output.
    Action,
    /// Client-side navigation swapping an outlet without a full reload.
    Link,
}

impl RequestMode {
    /// Classify a request from its headers.
    pub fn classify(headers: &HeaderMap) -> Self {
        match headers.get(HEADER_REQUEST_TYPE).and_then(|v| v.to_str().ok()) {
            Some(REQUEST_TYPE_ACTION) => Self::Action,
            Some(REQUEST_TYPE_LINK) => Self::Link,
            _ => Self::Initial,
        }
    }

    /// Whether this is an action request.
    pub fn is_action(self) -> bool {
        self == Self::Action
    }

    /// Whether this is a link navigation request.
    pub fn is_link(self) -> bool {
        self == Self::Link
    }
}

/// The decomposed HTTP request a render pass reads from.
#[derive(Debug)]
pub struct RequestParts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl RequestParts {
    /// Decompose a request, attaching the path parameters the mux captured.
    pub fn new(request: Request<Bytes>, params: HashMap<String, String>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params,
        }
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The buffered request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// A path parameter captured by the mux pattern.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Mutable per-request state threaded through the render pass.
#[derive(Clone)]
pub struct RenderContext {
    tree: Arc<RouteTree>,
    request: Arc<RequestParts>,
    response: Arc<Mutex<ResponseBuffer>>,
    mode: RequestMode,
    route: NodeId,
    requested_route: RoutePath,
    active_child: Option<NodeId>,
    component: Option<Arc<Component>>,
    component_path: Option<ComponentPath>,
    loader_data: Option<LoaderData>,
}

impl RenderContext {
    pub(crate) fn new(
        tree: Arc<RouteTree>,
        request: Arc<RequestParts>,
        response: Arc<Mutex<ResponseBuffer>>,
        mode: RequestMode,
        requested_route: RoutePath,
    ) -> Self {
        let root = tree.root();
        Self {
            tree,
            request,
            response,
            mode,
            route: root,
            requested_route,
            active_child: None,
            component: None,
            component_path: None,
            loader_data: None,
        }
    }

    /// How the dispatch protocol classified this request.
    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    /// The underlying HTTP request.
    pub fn request(&self) -> &RequestParts {
        &self.request
    }

    /// The route tree this request renders against.
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// The route node currently being rendered.
    pub fn route(&self) -> &RouteNode {
        self.tree.node(self.route)
    }

    /// The digit path driving child-route descent for this request.
    pub fn requested_route(&self) -> &RoutePath {
        &self.requested_route
    }

    /// The active child route at the current depth, resolved when the
    /// current route was entered.
    pub fn child_route(&self) -> Option<&RouteNode> {
        self.active_child.map(|id| self.tree.node(id))
    }

    pub(crate) fn active_child_id(&self) -> Option<NodeId> {
        self.active_child
    }

    /// The component currently being rendered.
    pub fn component(&self) -> Option<&Arc<Component>> {
        self.component.as_ref()
    }

    /// The accumulated component path, root component first.
    pub fn component_path(&self) -> Option<&ComponentPath> {
        self.component_path.as_ref()
    }

    /// Data produced by the current component's loader, if the loader ran
    /// and produced a value of type `T`.
    pub fn loader_data<T: 'static>(&self) -> Option<&T> {
        self.loader_data.as_ref()?.downcast_ref::<T>()
    }

    /// A path parameter captured by the mux pattern.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    /// The first value for `name` in the query string.
    pub fn query_value(&self, name: &str) -> Option<String> {
        let values = FormValues::parse(self.request.query()?);
        values.get(name).map(str::to_string)
    }

    /// The first value for `name` in the urlencoded request body.
    pub fn form_value(&self, name: &str) -> Option<String> {
        let raw = std::str::from_utf8(self.request.body()).ok()?;
        let values = FormValues::parse(raw);
        values.get(name).map(str::to_string)
    }

    /// Insert a header on the buffered response.
    pub fn insert_header(&self, name: HeaderName, value: HeaderValue) {
        self.response.lock().insert_header(name, value);
    }

    /// Discard everything rendered so far and answer with a `303 See Other`
    /// to `location`. Render output produced after this call is dropped.
    pub fn redirect(&self, location: &str) -> RenderResult {
        self.response
            .lock()
            .redirect(location)
            .map_err(|err| RenderError::Custom(Box::new(err)))
    }

    /// DOM element id of the current route's outlet.
    pub fn outlet_id(&self) -> String {
        self.route().outlet_id()
    }

    /// DOM element id addressing the current component: route digit path
    /// plus component path. Stable across initial renders and action
    /// re-renders of the same component, so an action fragment can target
    /// the markup the initial render produced.
    pub fn dom_id(&self) -> String {
        let mut id = format!("trellis-{}", self.route().path_id());
        if let Some(path) = &self.component_path {
            id.push('-');
            id.push_str(path.as_str());
        }
        id
    }

    /// The `hx-headers` JSON a client must echo to address the current
    /// component with an action request.
    pub fn action_headers(&self) -> String {
        let mut headers = serde_json::Map::new();
        headers.insert(
            HEADER_REQUEST_TYPE.to_string(),
            serde_json::Value::String(REQUEST_TYPE_ACTION.to_string()),
        );
        headers.insert(
            HEADER_ROUTE_ID.to_string(),
            serde_json::Value::String(self.route().path_id().to_string()),
        );
        headers.insert(
            HEADER_COMPONENT_ID.to_string(),
            serde_json::Value::String(
                self.component_path
                    .as_ref()
                    .map(ComponentPath::to_string)
                    .unwrap_or_default(),
            ),
        );
        serde_json::Value::Object(headers).to_string()
    }

    /// The `hx-headers` JSON marking a request as link navigation.
    pub fn link_headers(&self) -> String {
        let mut headers = serde_json::Map::new();
        headers.insert(
            HEADER_REQUEST_TYPE.to_string(),
            serde_json::Value::String(REQUEST_TYPE_LINK.to_string()),
        );
        serde_json::Value::Object(headers).to_string()
    }

    /// Render a registered child of the current component, by identifier.
    pub async fn render_child(&self, id: &str, out: &mut Html) -> RenderResult {
        let Some(component) = &self.component else {
            return Err(RenderError::Address(AddressError::ComponentNotFound(
                id.to_string(),
            )));
        };
        let Some(child) = component.child(id) else {
            let path = match &self.component_path {
                Some(parent) => parent
                    .join(id)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|_| id.to_string()),
                None => id.to_string(),
            };
            return Err(RenderError::Address(AddressError::ComponentNotFound(path)));
        };
        let child = child.clone();
        self.render_component(&child, out).await
    }

    /// Enter `node`: the returned context has the node as its current route
    /// and the active child resolved from the requested digit path (default
    /// child 0 past the path's depth). Out-of-range digits fail closed.
    pub(crate) fn enter_route(&self, node: NodeId) -> Result<Self, AddressError> {
        let mut ctx = self.clone();
        ctx.route = node;
        ctx.component = None;
        ctx.component_path = None;
        ctx.loader_data = None;
        let entered = self.tree.node(node);
        ctx.active_child = if entered.children().is_empty() {
            None
        } else {
            let index = self.requested_route.index_at(entered.depth()).unwrap_or(0);
            match entered.children().get(index) {
                Some(&child) => Some(child),
                None => {
                    return Err(AddressError::OutOfRange {
                        path: self.requested_route.to_string(),
                        depth: entered.depth(),
                        index,
                        len: entered.children().len(),
                    });
                }
            }
        };
        Ok(ctx)
    }

    pub(crate) fn with_component_path(mut self, path: ComponentPath) -> Self {
        self.component_path = Some(path);
        self
    }

    /// Render `node`'s subtree: enter the route, then render its component's
    /// view (which places any active child via an outlet).
    pub(crate) async fn render_route(&self, node: NodeId, out: &mut Html) -> RenderResult {
        let ctx = self.enter_route(node)?;
        let component = ctx.route().component().clone();
        ctx.render_component(&component, out).await
    }

    /// Render a component's view inside a freshly entered component scope:
    /// the path gains the component's identifier and its loader (if any) has
    /// run.
    pub(crate) async fn render_component(
        &self,
        component: &Arc<Component>,
        out: &mut Html,
    ) -> RenderResult {
        let ctx = self.enter_component(component).await?;
        component.view().view(&ctx, out).await
    }

    /// Render a component's action output. A component without an action
    /// capability renders nothing: generic action dispatch may legitimately
    /// reach such a component.
    pub(crate) async fn render_component_action(
        &self,
        component: &Arc<Component>,
        out: &mut Html,
    ) -> RenderResult {
        let Some(action) = component.action().cloned() else {
            tracing::debug!(
                component = component.id(),
                "action request for component without action capability"
            );
            return Ok(());
        };
        let ctx = self.loader_scope(component).await?;
        action.action(&ctx, out).await
    }

    async fn enter_component(&self, component: &Arc<Component>) -> Result<Self, RenderError> {
        let mut ctx = self.clone();
        ctx.component = Some(component.clone());
        ctx.component_path = Some(match &self.component_path {
            None => ComponentPath::new(component.id())?,
            Some(parent) => parent.join(component.id())?,
        });
        ctx.loader_data = None;
        if let Some(loader) = component.loader() {
            ctx.loader_data = Some(loader.load(&ctx).await.map_err(RenderError::Loader)?);
        }
        Ok(ctx)
    }

    /// Like `enter_component`, but keeps the component path already set by
    /// the dispatcher: an action fragment must reproduce the DOM ids of the
    /// initial render it replaces.
    async fn loader_scope(&self, component: &Arc<Component>) -> Result<Self, RenderError> {
        let mut ctx = self.clone();
        ctx.component = Some(component.clone());
        ctx.loader_data = None;
        if let Some(loader) = component.loader() {
            ctx.loader_data = Some(loader.load(&ctx).await.map_err(RenderError::Loader)?);
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestMode;
    use crate::{HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION, REQUEST_TYPE_LINK};
    use http::header::{HeaderMap, HeaderValue};

    fn headers(value: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = value {
            map.insert(HEADER_REQUEST_TYPE, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn classify_known_values() {
        assert_eq!(
            RequestMode::classify(&headers(Some(REQUEST_TYPE_ACTION))),
            RequestMode::Action
        );
        assert_eq!(
            RequestMode::classify(&headers(Some(REQUEST_TYPE_LINK))),
            RequestMode::Link
        );
    }

    #[test]
    fn absent_or_unknown_values_are_initial() {
        assert_eq!(RequestMode::classify(&headers(None)), RequestMode::Initial);
        assert_eq!(
            RequestMode::classify(&headers(Some("teleport"))),
            RequestMode::Initial
        );
    }
}
