// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action response variants.
//!
//! A handler method returns an [`ActionResponse`] describing how the HTTP
//! response should look: forward to an HTML template, redirect, write a JSON,
//! XML or binary body, or answer with an empty body. Hooks return
//! [`ActionResponse::Undefined`] to mean "no decision, go on with the next
//! stage"; a handler must never return it.
//!
//! # Example
//!
//! ```rust
//! use flute::ActionResponse;
//!
//! let response = ActionResponse::json(serde_json::json!({ "id": 3 }))
//!     .header("X-Trace", ["abc"])
//!     .unwrap()
//!     .http_status(201)
//!     .unwrap();
//! assert_eq!(response.meta().and_then(|m| m.http_status()), Some(201));
//! ```

mod body;
mod html;

pub use body::{EmptyResponse, JsonResponse, StreamResponse, XmlResponse};
pub use html::HtmlResponse;

use std::fmt;

use crate::error::{FluteError, Result};

/// Zero-argument callback run after the enclosing transaction commits.
pub type ResponseHook = Box<dyn FnOnce() + Send + Sync>;

/// Headers, status and after-commit hook shared by every defined variant.
#[derive(Default)]
pub struct ResponseMeta {
    headers: Vec<(String, Vec<String>)>,
    http_status: Option<u16>,
    after_tx_commit: Option<ResponseHook>,
}

impl ResponseMeta {
    /// Adds a header; a name can be written only once (case-insensitive).
    pub fn add_header<I, S>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.header(name).is_some() {
            return Err(FluteError::contract(format!(
                "header '{}' is already registered on the response",
                name
            )));
        }
        self.headers
            .push((name.to_string(), values.into_iter().map(Into::into).collect()));
        Ok(())
    }

    /// Returns the values of a header.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// All headers in registration order.
    pub fn headers(&self) -> &[(String, Vec<String>)] {
        &self.headers
    }

    /// Sets the HTTP status.
    pub fn set_http_status(&mut self, status: u16) {
        self.http_status = Some(status);
    }

    /// The explicit HTTP status, if one was set.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Registers the after-commit hook, replacing an earlier one.
    pub fn set_after_tx_commit(&mut self, hook: ResponseHook) {
        self.after_tx_commit = Some(hook);
    }

    /// Returns true if an after-commit hook is registered.
    pub fn has_after_tx_commit(&self) -> bool {
        self.after_tx_commit.is_some()
    }

    pub(crate) fn take_after_tx_commit(&mut self) -> Option<ResponseHook> {
        self.after_tx_commit.take()
    }
}

impl fmt::Debug for ResponseMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseMeta")
            .field("headers", &self.headers)
            .field("http_status", &self.http_status)
            .field("after_tx_commit", &self.after_tx_commit.is_some())
            .finish()
    }
}

/// The closed set of results a handler (or hook) can produce.
#[derive(Debug, Default)]
pub enum ActionResponse {
    /// No decision made yet; the pipeline proceeds to the next stage.
    #[default]
    Undefined,
    /// Respond now with an empty body.
    Empty(EmptyResponse),
    /// Forward to an HTML template or redirect.
    Html(HtmlResponse),
    /// JSON body.
    Json(JsonResponse),
    /// XML body.
    Xml(XmlResponse),
    /// Binary body, optionally as an attachment.
    Stream(StreamResponse),
}

impl ActionResponse {
    /// The "no decision" sentinel.
    pub fn undefined() -> Self {
        Self::Undefined
    }

    /// An empty-body response.
    pub fn empty() -> Self {
        Self::Empty(EmptyResponse::new())
    }

    /// Forward to the given HTML template path.
    pub fn html(path: impl Into<String>) -> Self {
        Self::Html(HtmlResponse::forward(path))
    }

    /// Redirect to the given URL.
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Html(HtmlResponse::redirect(url))
    }

    /// JSON body with the given payload.
    pub fn json(payload: serde_json::Value) -> Self {
        Self::Json(JsonResponse::new(payload))
    }

    /// XML body.
    pub fn xml(xml: impl Into<String>) -> Self {
        Self::Xml(XmlResponse::new(xml))
    }

    /// Binary body with the given content type.
    pub fn stream(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Stream(StreamResponse::new(content_type, data))
    }

    /// Returns true for the "no decision" sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true for anything but the sentinel.
    pub fn is_defined(&self) -> bool {
        !self.is_undefined()
    }

    /// Returns true for a valid empty-body response.
    pub fn is_return_as_empty_body(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Empty(_) => "empty",
            Self::Html(html) if html.is_redirect() => "redirect",
            Self::Html(_) => "html",
            Self::Json(_) => "json",
            Self::Xml(_) => "xml",
            Self::Stream(_) => "stream",
        }
    }

    /// Shared headers/status/hook of a defined variant.
    pub fn meta(&self) -> Option<&ResponseMeta> {
        match self {
            Self::Undefined => None,
            Self::Empty(r) => Some(&r.meta),
            Self::Html(r) => Some(&r.meta),
            Self::Json(r) => Some(&r.meta),
            Self::Xml(r) => Some(&r.meta),
            Self::Stream(r) => Some(&r.meta),
        }
    }

    fn meta_mut(&mut self, operation: &str) -> Result<&mut ResponseMeta> {
        match self {
            Self::Undefined => Err(FluteError::contract(format!(
                "cannot call {}() on an undefined response",
                operation
            ))),
            Self::Empty(r) => Ok(&mut r.meta),
            Self::Html(r) => Ok(&mut r.meta),
            Self::Json(r) => Ok(&mut r.meta),
            Self::Xml(r) => Ok(&mut r.meta),
            Self::Stream(r) => Ok(&mut r.meta),
        }
    }

    /// Adds a header. Fails on the sentinel and on a repeated name.
    pub fn header<I, S>(mut self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta_mut("header")?.add_header(name, values)?;
        Ok(self)
    }

    /// Sets the HTTP status. Fails on the sentinel.
    pub fn http_status(mut self, status: u16) -> Result<Self> {
        self.meta_mut("http_status")?.set_http_status(status);
        Ok(self)
    }

    /// Registers a hook to run after the transaction commits. Fails on the sentinel.
    pub fn after_tx_commit<F>(mut self, hook: F) -> Result<Self>
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.meta_mut("after_tx_commit")?
            .set_after_tx_commit(Box::new(hook));
        Ok(self)
    }

    /// Returns true if an after-commit hook is registered.
    pub fn has_after_tx_commit(&self) -> bool {
        self.meta().map(|m| m.has_after_tx_commit()).unwrap_or(false)
    }

    pub(crate) fn take_after_tx_commit(&mut self) -> Option<ResponseHook> {
        match self.meta_mut("after_tx_commit") {
            Ok(meta) => meta.take_after_tx_commit(),
            Err(_) => None,
        }
    }
}

impl From<HtmlResponse> for ActionResponse {
    fn from(response: HtmlResponse) -> Self {
        Self::Html(response)
    }
}

impl From<JsonResponse> for ActionResponse {
    fn from(response: JsonResponse) -> Self {
        Self::Json(response)
    }
}

impl From<XmlResponse> for ActionResponse {
    fn from(response: XmlResponse) -> Self {
        Self::Xml(response)
    }
}

impl From<StreamResponse> for ActionResponse {
    fn from(response: StreamResponse) -> Self {
        Self::Stream(response)
    }
}

impl From<EmptyResponse> for ActionResponse {
    fn from(response: EmptyResponse) -> Self {
        Self::Empty(response)
    }
}
