//! Integration tests for the three-mode dispatch protocol: full page loads,
//! component action re-renders, and link navigations.

mod common;

use common::{
    AnchorView, ButtonView, LoaderView, PageView, ParentView, RedirectAction, TextAction,
    TextView, body_str, get, request,
};
use http::StatusCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use trellis::{
    App, Component, HEADER_COMPONENT_ID, HEADER_CURRENT_URL, HEADER_REQUEST_TYPE, HEADER_ROUTE_ID,
    IdSequence, REQUEST_TYPE_ACTION, REQUEST_TYPE_LINK, RouteBuilder, Server,
};

/// The route tree from the specification scenarios: `/` serves component
/// `a` (owning child `c` with an action), `/b` serves component `b`.
fn spec_app() -> App {
    let mut ids = IdSequence::new();
    let c = Component::builder(TextView("view-c"))
        .id("c")
        .action(TextAction("action-c"))
        .build(&mut ids)
        .unwrap();
    let a = Component::builder(ParentView {
        marker: "view-a",
        child: "c",
    })
    .id("a")
    .child(c)
    .build(&mut ids)
    .unwrap();
    let b = Component::builder(TextView("view-b"))
        .id("b")
        .build(&mut ids)
        .unwrap();

    Server::new()
        .route(RouteBuilder::new("/", a))
        .route(RouteBuilder::new("/b", b))
        .build()
        .unwrap()
}

/// A nested tree: `/` owns two tab routes, first-registered is the default.
fn tabs_app() -> App {
    let mut ids = IdSequence::new();
    let home = Component::builder(PageView("home")).build(&mut ids).unwrap();
    let tab1 = Component::builder(TextView("view-tab1"))
        .build(&mut ids)
        .unwrap();
    let tab2 = Component::builder(TextView("view-tab2"))
        .build(&mut ids)
        .unwrap();

    Server::new()
        .route(
            RouteBuilder::new("/", home)
                .route(RouteBuilder::new("tab1", tab1))
                .route(RouteBuilder::new("tab2", tab2)),
        )
        .build()
        .unwrap()
}

// ============================================================================
// Initial requests
// ============================================================================

#[tokio::test]
async fn initial_request_renders_shell_and_default_route() {
    let app = spec_app();
    let response = app.handle(get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_str(&response);
    assert!(body.starts_with("<!doctype html>"), "shell missing: {body}");
    assert!(body.contains("[view-a]"));
    assert!(body.contains("view-c"));
    assert!(!body.contains("view-b"), "sibling route leaked: {body}");
}

#[tokio::test]
async fn initial_request_inlines_default_child_at_outlet() {
    let app = tabs_app();
    let response = app.handle(get("/")).await;

    let body = body_str(&response);
    assert!(body.contains("[home]"));
    assert!(
        body.contains("<div id=\"trellis-outlet-0\">view-tab1</div>"),
        "default tab not inlined at outlet: {body}"
    );
    assert!(!body.contains("view-tab2"));
}

#[tokio::test]
async fn explicit_route_header_overrides_default_descent() {
    let app = tabs_app();
    let response = app.handle(request("/", &[(HEADER_ROUTE_ID, "01")])).await;

    let body = body_str(&response);
    assert!(body.contains("view-tab2"), "{body}");
    assert!(!body.contains("view-tab1"));
}

#[tokio::test]
async fn malformed_route_header_fails_closed() {
    let app = tabs_app();
    let response = app.handle(request("/", &[(HEADER_ROUTE_ID, "0x")])).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn out_of_range_route_header_fails_closed() {
    let app = tabs_app();
    let response = app.handle(request("/", &[(HEADER_ROUTE_ID, "05")])).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_str(&response).is_empty(), "no partial tree on failure");
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let app = spec_app();
    let response = app.handle(get("/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Action requests
// ============================================================================

#[tokio::test]
async fn action_renders_only_the_target_component() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "0"),
                (HEADER_COMPONENT_ID, "a_c"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_str(&response), "action-c");
}

#[tokio::test]
async fn action_on_component_without_capability_is_a_noop() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "0"),
                (HEADER_COMPONENT_ID, "a"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_str(&response).is_empty());
}

#[tokio::test]
async fn action_with_unknown_component_fails_closed() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "0"),
                (HEADER_COMPONENT_ID, "a_zzz"),
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn action_without_route_header_fails_closed() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_COMPONENT_ID, "a_c"),
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn action_with_stale_route_id_fails_closed() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "7"),
                (HEADER_COMPONENT_ID, "a_c"),
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn redirect_supersedes_action_output() {
    let mut ids = IdSequence::new();
    let widget = Component::builder(TextView("view-w"))
        .id("w")
        .action(RedirectAction("/after"))
        .build(&mut ids)
        .unwrap();
    let app = Server::new()
        .route(RouteBuilder::new("/", widget))
        .build()
        .unwrap();

    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "0"),
                (HEADER_COMPONENT_ID, "w"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(http::header::LOCATION).unwrap(),
        "/after"
    );
    assert!(body_str(&response).is_empty(), "redirect must stand alone");
}

// ============================================================================
// Link requests
// ============================================================================

#[tokio::test]
async fn link_swaps_the_parent_outlet_out_of_band() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/b",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_LINK),
                (HEADER_CURRENT_URL, "http://localhost/"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_str(&response),
        "<div id=\"trellis-outlet-\" hx-swap-oob=\"true\">view-b</div>"
    );
}

#[tokio::test]
async fn link_into_nested_route_targets_its_parent_outlet() {
    let app = tabs_app();
    let response = app
        .handle(request(
            "/tab2",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_LINK),
                (HEADER_CURRENT_URL, "http://localhost/"),
            ],
        ))
        .await;

    assert_eq!(
        body_str(&response),
        "<div id=\"trellis-outlet-0\" hx-swap-oob=\"true\">view-tab2</div>"
    );
}

#[tokio::test]
async fn link_to_the_displayed_url_is_a_noop() {
    let app = spec_app();
    let response = app
        .handle(request(
            "/b",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_LINK),
                (HEADER_CURRENT_URL, "http://localhost/b"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
    assert!(body_str(&response).is_empty());
}

// ============================================================================
// Loaders, elements, shell, errors
// ============================================================================

#[tokio::test]
async fn loader_data_reaches_the_view() {
    let mut ids = IdSequence::new();
    let greeter = Component::builder(LoaderView)
        .data("hello from the loader".to_string())
        .build(&mut ids)
        .unwrap();
    let app = Server::new()
        .route(RouteBuilder::new("/", greeter))
        .build()
        .unwrap();

    let response = app.handle(get("/")).await;
    assert!(body_str(&response).contains("hello from the loader"));
}

#[tokio::test]
async fn buttons_carry_the_dispatch_attributes() {
    let mut ids = IdSequence::new();
    let widget = Component::builder(ButtonView)
        .id("w")
        .action(TextAction("clicked"))
        .build(&mut ids)
        .unwrap();
    let app = Server::new()
        .route(RouteBuilder::new("/", widget))
        .build()
        .unwrap();

    let response = app.handle(get("/")).await;
    let body = body_str(&response);
    assert!(body.contains("hx-post=\"/\""), "{body}");
    assert!(body.contains("&quot;trellis-request&quot;:&quot;action&quot;"));
    assert!(body.contains("&quot;trellis-route&quot;:&quot;0&quot;"));
    assert!(body.contains("&quot;trellis-component&quot;:&quot;w&quot;"));
    assert!(body.contains("hx-target=\"#trellis-0-w\""), "{body}");
}

#[tokio::test]
async fn anchors_carry_the_link_attributes() {
    let mut ids = IdSequence::new();
    let home = Component::builder(AnchorView("/b")).build(&mut ids).unwrap();
    let b = Component::builder(TextView("view-b")).build(&mut ids).unwrap();
    let app = Server::new()
        .route(RouteBuilder::new("/", home))
        .route(RouteBuilder::new("/b", b))
        .build()
        .unwrap();

    let response = app.handle(get("/")).await;
    let body = body_str(&response);
    assert!(body.contains("href=\"/b\""));
    assert!(body.contains("hx-get=\"/b\""));
    assert!(body.contains("&quot;trellis-request&quot;:&quot;link&quot;"));
    assert!(body.contains("hx-push-url=\"true\""));
}

#[tokio::test]
async fn default_head_loads_the_client_script() {
    let app = spec_app();
    let response = app.handle(get("/")).await;
    assert!(body_str(&response).contains("htmx.org"));
}

#[tokio::test]
async fn error_handler_can_rewrite_the_failure_response() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let mut ids = IdSequence::new();
    let home = Component::builder(TextView("view-home"))
        .build(&mut ids)
        .unwrap();
    let app = Server::new()
        .with_error_handler(move |ctx, _err| {
            seen.fetch_add(1, Ordering::SeqCst);
            ctx.insert_header(
                http::header::HeaderName::from_static("hx-reswap"),
                http::header::HeaderValue::from_static("none"),
            );
        })
        .route(RouteBuilder::new("/", home))
        .build()
        .unwrap();

    let response = app
        .handle(request(
            "/",
            &[
                (HEADER_REQUEST_TYPE, REQUEST_TYPE_ACTION),
                (HEADER_ROUTE_ID, "0"),
                (HEADER_COMPONENT_ID, "nope"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
