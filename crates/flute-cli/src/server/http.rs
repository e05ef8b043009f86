// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use flute::{ActionRequest, ActionRequestProcessor, ProcessOutcome, RequestContext, ResponseOutput};
use tower_http::services::ServeDir;

use super::session::{parse_cookies, SessionAttributes, SessionStore, SESSION_COOKIE};

const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared application state for the development server.
pub struct AppState {
    /// Request processor of the served application.
    pub processor: Arc<ActionRequestProcessor>,
    /// Session attributes by session cookie.
    pub sessions: SessionStore,
}

impl AppState {
    /// Wraps a processor with an empty session store.
    pub fn new(processor: ActionRequestProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            sessions: SessionStore::default(),
        }
    }

    /// Replaces the session store.
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}

/// Builds the router: static files under `/public`, everything else
/// through the action processor.
pub fn create_router(state: Arc<AppState>, public_dir: &Path) -> Router {
    Router::new()
        .nest_service("/public", ServeDir::new(public_dir))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let body_bytes = if parts.method != Method::GET && parts.method != Method::HEAD {
        match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(_) => return (StatusCode::PAYLOAD_TOO_LARGE, "Body too large").into_response(),
        }
    } else {
        None
    };

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect();
    let cookies = headers
        .get("cookie")
        .map(|c| parse_cookies(c))
        .unwrap_or_default();
    let query: HashMap<String, String> = parts
        .uri
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let mut action_request = ActionRequest::new(&path, parts.method.as_str())
        .with_headers(headers)
        .with_query(query)
        .with_cookies(cookies);
    if let Some(body) = body_bytes.filter(|b| !b.is_empty()) {
        action_request = action_request.with_body(body);
    }

    let known_session = action_request
        .cookie(SESSION_COOKIE)
        .and_then(|id| state.sessions.load(id).map(|s| (id.to_string(), s)));
    let (session_id, session, is_new_session) = match known_session {
        Some((id, session)) => (id, session, false),
        None => (state.sessions.next_id(), SessionAttributes::new(), true),
    };

    // handlers are synchronous and may block on their data layer
    let processor = Arc::clone(&state.processor);
    let joined = tokio::task::spawn_blocking(move || {
        let mut ctx = RequestContext::new(action_request).with_session(session);
        let outcome = processor.process(&mut ctx);
        (ctx, outcome)
    })
    .await;
    let (mut ctx, outcome) = match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Request worker for {} failed: {}", path, e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Request worker failed");
        }
    };

    let mut response = match outcome {
        Ok(ProcessOutcome::Handled(report)) => {
            tracing::debug!(
                "{} handled by {} -> {:?}",
                path,
                report.action_name,
                report.journey
            );
            output_to_response(std::mem::take(&mut ctx.output))
        }
        Ok(ProcessOutcome::NotHandled) => {
            error_page(StatusCode::NOT_FOUND, &format!("No action for {}", path))
        }
        Err(e) => {
            tracing::error!("Request {} failed: {}", path, e);
            error_page(StatusCode::INTERNAL_SERVER_ERROR, &format!("Error: {}", e))
        }
    };

    let session = std::mem::take(&mut ctx.session);
    if is_new_session && session.is_empty() {
        return response;
    }
    state.sessions.store(&session_id, session);
    if is_new_session {
        let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session_id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Invalid session cookie: {}", e),
        }
    }
    response
}

fn output_to_response(output: ResponseOutput) -> Response {
    let status = StatusCode::from_u16(output.status()).unwrap_or(StatusCode::OK);
    let mut builder = Response::builder().status(status);
    for (name, value) in output.headers() {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match builder.body(Body::from(output.body().to_vec())) {
        Ok(response) => response,
        Err(e) => error_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Invalid response: {}", e),
        ),
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let page = Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{} - flute</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; }}
        pre {{ background: #f4f4f4; padding: 1rem; border-left: 4px solid #c0392b; }}
    </style>
</head>
<body>
    <h1>{}</h1>
    <pre>{}</pre>
</body>
</html>"#,
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
        html_escape(message)
    ));
    (status, page).into_response()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_to_response_copies_status_and_headers() {
        let mut output = ResponseOutput::default();
        output.redirect("/signin/");
        let response = output_to_response(output);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/signin/")
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }
}
