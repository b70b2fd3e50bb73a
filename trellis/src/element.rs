//! Declarative hypermedia elements.
//!
//! Views emit plain markup through the [`Html`] sink; these builders cover
//! the elements that must carry dispatch metadata - the `hx-*` attributes a
//! hypermedia client interprets to issue action and link requests with the
//! right headers. [`Element`] is the generic attribute builder; [`Button`],
//! [`Form`] and [`Anchor`] wire the protocol headers on top of it.
//!
//! All client behavior lives in the exchange library; nothing here runs in
//! the browser.

use crate::context::RenderContext;
use crate::html::Html;
use crate::view::RenderResult;
use http::Method;

/// Swap strategy values for the `hx-swap` attribute.
pub mod swap {
    /// Do not swap any content.
    pub const NONE: &str = "none";
    /// Replace the target's inner HTML.
    pub const INNER_HTML: &str = "innerHTML";
    /// Replace the target element itself.
    pub const OUTER_HTML: &str = "outerHTML";
    /// Append inside the target.
    pub const BEFORE_END: &str = "beforeend";
    /// Delete the target element.
    pub const DELETE: &str = "delete";
}

/// A generic element builder: tag, id, classes, and arbitrary attributes.
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// Start an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// Set the element id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute. Values are escaped at write time.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Write the opening tag with all accumulated attributes.
    pub fn open(&self, out: &mut Html) {
        out.raw("<");
        out.raw(&self.tag);
        if let Some(id) = &self.id {
            out.attr("id", id);
        }
        if !self.classes.is_empty() {
            out.attr("class", &self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            out.attr(name, value);
        }
        out.raw(">");
    }

    /// Write the closing tag.
    pub fn close(&self, out: &mut Html) {
        out.raw("</");
        out.raw(&self.tag);
        out.raw(">");
    }
}

fn verb_attr(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "hx-get",
        "PUT" => "hx-put",
        "PATCH" => "hx-patch",
        "DELETE" => "hx-delete",
        _ => "hx-post",
    }
}

/// A button that issues an action request against the current component.
pub struct Button {
    label: String,
    method: Method,
    target: Option<String>,
    swap: Option<String>,
    trigger: Option<String>,
    classes: Vec<String>,
}

impl Button {
    /// A POST action button with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method: Method::POST,
            target: None,
            swap: None,
            trigger: None,
            classes: Vec::new(),
        }
    }

    /// Use a different HTTP method for the action request.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Target a specific element id instead of the owning component.
    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target = Some(target_id.into());
        self
    }

    /// Set the swap strategy (see [`swap`]).
    pub fn with_swap(mut self, swap: impl Into<String>) -> Self {
        self.swap = Some(swap.into());
        self
    }

    /// Set the client-side trigger expression.
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Write the button with its dispatch attributes.
    pub fn render(&self, ctx: &RenderContext, out: &mut Html) -> RenderResult {
        let target = match &self.target {
            Some(target) => target.clone(),
            None => ctx.dom_id(),
        };
        let mut element = Element::new("button")
            .with_attr(verb_attr(&self.method), ctx.request().path())
            .with_attr("hx-headers", ctx.action_headers())
            .with_attr("hx-target", format!("#{target}"));
        if let Some(swap) = &self.swap {
            element = element.with_attr("hx-swap", swap);
        }
        if let Some(trigger) = &self.trigger {
            element = element.with_attr("hx-trigger", trigger);
        }
        for class in &self.classes {
            element = element.with_class(class);
        }
        element.open(out);
        out.text(&self.label);
        element.close(out);
        Ok(())
    }
}

/// A form whose submission is dispatched as an action request.
pub struct Form {
    method: Method,
    target: Option<String>,
    swap: String,
    classes: Vec<String>,
}

impl Form {
    /// A POST form with no swap (actions usually re-render via their own
    /// target).
    pub fn new() -> Self {
        Self {
            method: Method::POST,
            target: None,
            swap: swap::NONE.to_string(),
            classes: Vec::new(),
        }
    }

    /// Use a different HTTP method for the submission.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Target a specific element id for the swapped response.
    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target = Some(target_id.into());
        self
    }

    /// Set the swap strategy (see [`swap`]).
    pub fn with_swap(mut self, swap: impl Into<String>) -> Self {
        self.swap = swap.into();
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Write the form, filling its body from the closure.
    pub fn render(
        &self,
        ctx: &RenderContext,
        out: &mut Html,
        body: impl FnOnce(&mut Html) -> RenderResult,
    ) -> RenderResult {
        let mut element = Element::new("form")
            .with_attr(verb_attr(&self.method), ctx.request().path())
            .with_attr("hx-headers", ctx.action_headers())
            .with_attr("hx-swap", &self.swap);
        if let Some(target) = &self.target {
            element = element.with_attr("hx-target", format!("#{target}"));
        }
        for class in &self.classes {
            element = element.with_class(class);
        }
        element.open(out);
        body(out)?;
        element.close(out);
        Ok(())
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// A link that navigates to another route without a full page reload.
///
/// The response is an out-of-band outlet swap, so the element's own swap is
/// `none`; `hx-push-url` keeps the address bar in step.
pub struct Anchor {
    href: String,
    push_url: bool,
    classes: Vec<String>,
}

impl Anchor {
    /// A link to `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            push_url: true,
            classes: Vec::new(),
        }
    }

    /// Control whether the navigation updates the browser URL.
    pub fn with_push_url(mut self, push_url: bool) -> Self {
        self.push_url = push_url;
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Write the anchor with its label.
    pub fn render(&self, ctx: &RenderContext, out: &mut Html, label: &str) -> RenderResult {
        let mut element = Element::new("a")
            .with_attr("href", &self.href)
            .with_attr("hx-get", &self.href)
            .with_attr("hx-headers", ctx.link_headers())
            .with_attr("hx-swap", swap::NONE);
        if self.push_url {
            element = element.with_attr("hx-push-url", "true");
        }
        for class in &self.classes {
            element = element.with_class(class);
        }
        element.open(out);
        out.text(label);
        element.close(out);
        Ok(())
    }
}
