// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTML forward / redirect response.

use serde_json::Value as JsonValue;

use super::ResponseMeta;
use crate::error::Result;

/// Forward to an HTML template, or redirect to another URL.
///
/// Render data attached here is copied into the runtime's display data when
/// the response is reflected, so the template sees it next to anything the
/// handler registered directly.
#[derive(Debug)]
pub struct HtmlResponse {
    routing_path: String,
    redirect: bool,
    render_data: Vec<(String, JsonValue)>,
    pub(super) meta: ResponseMeta,
}

impl HtmlResponse {
    /// Forward to the template at `path` (e.g. `member/member_list.html`).
    pub fn forward(path: impl Into<String>) -> Self {
        Self {
            routing_path: path.into(),
            redirect: false,
            render_data: Vec::new(),
            meta: ResponseMeta::default(),
        }
    }

    /// Redirect to `url` (usually built by reverse mapping).
    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            routing_path: url.into(),
            redirect: true,
            render_data: Vec::new(),
            meta: ResponseMeta::default(),
        }
    }

    /// Attaches a value for the template.
    pub fn render_with(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.render_data.push((key.into(), value));
        self
    }

    /// Adds a header (write-once per name).
    pub fn header<I, S>(mut self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.add_header(name, values)?;
        Ok(self)
    }

    /// Sets the HTTP status.
    pub fn http_status(mut self, status: u16) -> Self {
        self.meta.set_http_status(status);
        self
    }

    /// Registers a hook to run after the transaction commits.
    pub fn after_tx_commit<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.meta.set_after_tx_commit(Box::new(hook));
        self
    }

    /// Template path or redirect URL.
    pub fn routing_path(&self) -> &str {
        &self.routing_path
    }

    /// Returns true for a redirect.
    pub fn is_redirect(&self) -> bool {
        self.redirect
    }

    /// Values attached for the template.
    pub fn render_data(&self) -> &[(String, JsonValue)] {
        &self.render_data
    }

    /// Headers, status and hook.
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward() {
        let html = HtmlResponse::forward("member/member_list.html")
            .render_with("members", serde_json::json!([]));
        assert!(!html.is_redirect());
        assert_eq!(html.routing_path(), "member/member_list.html");
        assert_eq!(html.render_data().len(), 1);
    }

    #[test]
    fn test_redirect_with_status() {
        let html = HtmlResponse::redirect("/member/list/").http_status(303);
        assert!(html.is_redirect());
        assert_eq!(html.meta().http_status(), Some(303));
    }
}
