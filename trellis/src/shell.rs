//! The built-in page shell.
//!
//! The implicit root route serves this component on full page loads: the
//! document skeleton, a `<head>` delegated to the active top-level route's
//! component (or a minimal default carrying the hypermedia client script),
//! and a `<body>` holding the root outlet. Partial-update responses never
//! include the shell.

use crate::context::RenderContext;
use crate::html::Html;
use crate::outlet::Outlet;
use crate::view::{RenderResult, View};
use async_trait::async_trait;

/// URL of the hypermedia exchange library loaded by the default head.
const CLIENT_SCRIPT_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

pub(crate) struct ShellView;

#[async_trait]
impl View for ShellView {
    async fn view(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        out.raw("<!doctype html>\n<html>\n<head>");
        let head = ctx
            .child_route()
            .and_then(|child| child.component().head().cloned());
        match head {
            Some(head) => head.head(ctx, out).await?,
            None => default_head(out),
        }
        out.raw("</head>\n<body>");
        Outlet::new().render(ctx, out).await?;
        out.raw("</body>\n</html>\n");
        Ok(())
    }
}

fn default_head(out: &mut Html) {
    out.raw("<meta charset=\"utf-8\">");
    out.raw("<script src=\"");
    out.raw(CLIENT_SCRIPT_SRC);
    out.raw("\"></script>");
}
