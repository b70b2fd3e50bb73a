//! The render sink.
//!
//! Views produce markup by writing into an [`Html`] buffer. The buffer is the
//! seam between the framework and the escaping engine: [`Html::raw`] trusts
//! its input, [`Html::text`] and [`Html::attr`] route through `html-escape`.
//! One buffer is filled per render pass and handed to the buffered response
//! writer in a single move.

use std::fmt;

/// An in-memory HTML sink with escaped and raw write operations.
#[derive(Debug, Default)]
pub struct Html {
    buf: String,
}

impl Html {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Create an empty sink with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Write trusted markup verbatim.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Write text content, escaping HTML-significant characters.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&html_escape::encode_text(text));
        self
    }

    /// Write a ` name="value"` attribute pair, escaping the value for a
    /// double-quoted attribute position. The name is trusted.
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf
            .push_str(&html_escape::encode_double_quoted_attribute(value));
        self.buf.push('"');
        self
    }

    /// The accumulated markup.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the sink, yielding the accumulated markup.
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for Html {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Html;

    #[test]
    fn text_is_escaped() {
        let mut out = Html::new();
        out.text("<b>&\"</b>");
        assert_eq!(out.as_str(), "&lt;b&gt;&amp;\"&lt;/b&gt;");
    }

    #[test]
    fn attr_escapes_quotes() {
        let mut out = Html::new();
        out.raw("<div");
        out.attr("data-note", "say \"hi\" & leave");
        out.raw(">");
        assert_eq!(
            out.as_str(),
            "<div data-note=\"say &quot;hi&quot; &amp; leave\">"
        );
    }

    #[test]
    fn raw_is_verbatim() {
        let mut out = Html::new();
        out.raw("<span>").text("1 < 2").raw("</span>");
        assert_eq!(out.as_str(), "<span>1 &lt; 2</span>");
    }
}
