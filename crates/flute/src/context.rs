// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request context passed explicitly through the pipeline.
//!
//! The transport adapter creates one [`RequestContext`] per request, lets the
//! processor fill its [`ResponseOutput`], and reads the output and session
//! attributes back afterwards.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::messages::ActionMessages;
use crate::request::ActionRequest;

/// The HTTP response being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutput {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    location: Option<String>,
    committed: bool,
}

impl Default for ResponseOutput {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            location: None,
            committed: false,
        }
    }
}

impl ResponseOutput {
    /// Sets the status code.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Status code (200 until set).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Appends a header value.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First value of a header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Writes the body and marks the output committed.
    pub fn write_body(&mut self, content_type: &str, body: Vec<u8>) {
        if self.header("Content-Type").is_none() {
            self.add_header("Content-Type", content_type);
        }
        self.body = body;
        self.committed = true;
    }

    /// Sends a 302 redirect unless another 3xx status was set.
    pub fn redirect(&mut self, location: impl Into<String>) {
        let location = location.into();
        if !(300..400).contains(&self.status) {
            self.status = 302;
        }
        self.add_header("Location", location.clone());
        self.location = Some(location);
        self.committed = true;
    }

    /// Body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Redirect target, if redirected.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns true once a body or redirect was written.
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

/// Request-scoped cache, initialized by the outermost [`RequestScope`].
#[derive(Debug, Default)]
pub struct RequestCache {
    entries: Option<HashMap<String, JsonValue>>,
}

impl RequestCache {
    /// Returns true while a scope owns the cache.
    pub fn is_initialized(&self) -> bool {
        self.entries.is_some()
    }

    /// Stores a value; ignored when no scope is active.
    pub fn put(&mut self, key: impl Into<String>, value: JsonValue) {
        if let Some(entries) = &mut self.entries {
            entries.insert(key.into(), value);
        }
    }

    /// Reads a value.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.as_ref().and_then(|e| e.get(key))
    }

    fn initialize(&mut self) {
        self.entries = Some(HashMap::new());
    }

    fn clear(&mut self) {
        self.entries = None;
    }
}

/// Everything the pipeline knows about one request.
#[derive(Debug)]
pub struct RequestContext {
    /// The incoming request.
    pub request: ActionRequest,
    /// The response being written.
    pub output: ResponseOutput,
    /// Session attributes supplied and persisted by the transport.
    pub session: HashMap<String, String>,
    /// Request-scoped cache.
    pub cache: RequestCache,
    error_messages: Option<ActionMessages>,
}

impl RequestContext {
    /// Creates a context for a request with an empty session.
    pub fn new(request: ActionRequest) -> Self {
        Self {
            request,
            output: ResponseOutput::default(),
            session: HashMap::new(),
            cache: RequestCache::default(),
            error_messages: None,
        }
    }

    /// Attaches session attributes.
    pub fn with_session(mut self, session: HashMap<String, String>) -> Self {
        self.session = session;
        self
    }

    /// A session attribute.
    pub fn session_attribute(&self, name: &str) -> Option<&str> {
        self.session.get(name).map(String::as_str)
    }

    /// Sets a session attribute.
    pub fn set_session_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.session.insert(name.into(), value.into());
    }

    /// Removes a session attribute.
    pub fn remove_session_attribute(&mut self, name: &str) -> Option<String> {
        self.session.remove(name)
    }

    /// Saves error messages for the view; repeated saves are merged.
    pub fn save_errors(&mut self, messages: &ActionMessages) {
        match &mut self.error_messages {
            Some(saved) => saved.merge(messages),
            None => self.error_messages = Some(messages.clone()),
        }
    }

    /// Saved error messages.
    pub fn error_messages(&self) -> Option<&ActionMessages> {
        self.error_messages.as_ref()
    }
}

/// Guard owning the request-scoped cache for one processor run.
///
/// The cache is initialized on acquire if no outer scope did it and cleared
/// on release or drop, whichever comes first.
pub struct RequestScope<'a> {
    ctx: &'a mut RequestContext,
    owner: bool,
    released: bool,
}

impl<'a> RequestScope<'a> {
    /// Enters the scope.
    pub fn acquire(ctx: &'a mut RequestContext) -> Self {
        let owner = !ctx.cache.is_initialized();
        if owner {
            ctx.cache.initialize();
            debug!("Request cache initialized for {}", ctx.request.path);
        }
        Self {
            ctx,
            owner,
            released: false,
        }
    }

    /// Leaves the scope. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.owner {
            self.ctx.cache.clear();
            debug!("Request cache cleared for {}", self.ctx.request.path);
        }
    }
}

impl Deref for RequestScope<'_> {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for RequestScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for RequestScope<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
