//! The buffered response writer.
//!
//! Nothing reaches the client while a render pass runs: status code, headers
//! and body accumulate in a [`ResponseBuffer`] and are flushed exactly once
//! at the end of request handling. This is what lets an action handler
//! discard everything written so far and substitute a redirect mid-render -
//! with a streaming writer the earlier bytes would already be on the wire
//! and the redirect would be invalid.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use http::{Response, StatusCode};

/// In-memory accumulator for one HTTP response.
#[derive(Debug)]
pub struct ResponseBuffer {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    sealed: bool,
}

impl ResponseBuffer {
    /// Create an empty buffer with status `200 OK`.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            sealed: false,
        }
    }

    /// Append body bytes. Writes after [`redirect`](Self::redirect) are
    /// discarded.
    pub fn write(&mut self, chunk: &[u8]) {
        if !self.sealed {
            self.body.extend_from_slice(chunk);
        }
    }

    /// Record the status code to send at flush time.
    pub fn set_status(&mut self, status: StatusCode) {
        if !self.sealed {
            self.status = status;
        }
    }

    /// Insert a response header.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// The header map that will be sent at flush time.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The currently recorded status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Number of buffered body bytes.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Discard the buffered body and restore the default status code.
    ///
    /// Headers are kept: handlers may have set them deliberately before
    /// deciding to start over.
    pub fn reset(&mut self) {
        self.body.clear();
        self.status = StatusCode::OK;
        self.sealed = false;
    }

    /// Replace everything buffered so far with a `303 See Other` redirect
    /// and seal the buffer, so render output produced after the decision is
    /// dropped rather than trailing the redirect.
    pub fn redirect(&mut self, location: &str) -> Result<(), http::header::InvalidHeaderValue> {
        let value = HeaderValue::from_str(location)?;
        self.reset();
        self.status = StatusCode::SEE_OTHER;
        self.headers.insert(LOCATION, value);
        self.sealed = true;
        Ok(())
    }

    /// Whether the buffer has been sealed by a redirect.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Flush: consume the buffer into the response sent to the client.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}
