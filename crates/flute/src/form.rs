// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Form population from query parameters and request bodies.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::context::RequestContext;
use crate::error::{FluteError, Result};
use crate::messages::{ActionMessage, ActionMessages};
use crate::request::ActionRequest;
use crate::runtime::ActionRuntime;

/// Message key added when the request body cannot be parsed.
pub const BODY_INVALID_KEY: &str = "errors.request.body.invalid";

/// Errors that can occur while parsing a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Body is not an object")]
    NotAnObject,
}

/// Request parameters collected for the handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionForm {
    values: Map<String, JsonValue>,
    populate_failures: ActionMessages,
}

impl ActionForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value; later sources override earlier ones.
    pub fn set(&mut self, name: impl Into<String>, value: JsonValue) {
        self.values.insert(name.into(), value);
    }

    /// Raw value of a property.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    /// String value of a property, if it is a non-empty string.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// All values.
    pub fn values(&self) -> &Map<String, JsonValue> {
        &self.values
    }

    /// Problems found while populating; merged into validation messages.
    pub fn populate_failures(&self) -> &ActionMessages {
        &self.populate_failures
    }

    /// Records a population problem.
    pub fn add_populate_failure(&mut self, property: &str, message: ActionMessage) {
        self.populate_failures.add(property, message);
    }

    /// Deserializes the values into a typed bean.
    ///
    /// Query strings and url-encoded bodies only carry text, so a failed
    /// attempt is retried once with numeric and boolean text coerced.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T> {
        let strict = JsonValue::Object(self.values.clone());
        match serde_json::from_value::<T>(strict) {
            Ok(bean) => Ok(bean),
            Err(first) => {
                let lenient = JsonValue::Object(
                    self.values
                        .iter()
                        .map(|(k, v)| (k.clone(), coerce_text(v)))
                        .collect(),
                );
                serde_json::from_value::<T>(lenient)
                    .map_err(|_| FluteError::FormConversion(first.to_string()))
            }
        }
    }
}

fn coerce_text(value: &JsonValue) -> JsonValue {
    let JsonValue::String(text) = value else {
        return value.clone();
    };
    if text.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(number) = text.parse::<i64>() {
        return JsonValue::from(number);
    }
    if let Ok(number) = text.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(number) {
            return JsonValue::Number(number);
        }
    }
    match text.as_str() {
        "true" | "on" => JsonValue::Bool(true),
        "false" | "off" => JsonValue::Bool(false),
        _ => value.clone(),
    }
}

/// Fills the runtime's form from the request.
pub trait FormBinder: Send + Sync {
    /// Populates the form; body problems become populate failures, not errors.
    fn populate(&self, runtime: &mut ActionRuntime, ctx: &RequestContext) -> Result<()>;
}

/// Binds query parameters, then the JSON or url-encoded body.
#[derive(Debug, Clone, Default)]
pub struct RequestFormBinder;

impl RequestFormBinder {
    /// Creates the binder.
    pub fn new() -> Self {
        Self
    }

    /// Builds a form from a request without touching a runtime.
    pub fn build_form(&self, ctx: &RequestContext) -> ActionForm {
        let request = &ctx.request;
        let mut form = ActionForm::new();
        let mut query: Vec<(&String, &String)> = request.query.iter().collect();
        query.sort();
        for (name, value) in query {
            form.set(name.clone(), JsonValue::String(value.clone()));
        }
        let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) else {
            return form;
        };
        match parse_form_body(request, body) {
            Ok(fields) => {
                for (name, value) in fields {
                    form.set(name, value);
                }
            }
            Err(err) => {
                debug!("Form body rejected for {}: {}", request.path, err);
                form.add_populate_failure(
                    crate::messages::GLOBAL_PROPERTY,
                    ActionMessage::with_values(BODY_INVALID_KEY, [err.to_string()]),
                );
            }
        }
        form
    }
}

impl FormBinder for RequestFormBinder {
    fn populate(&self, runtime: &mut ActionRuntime, ctx: &RequestContext) -> Result<()> {
        runtime.set_form(self.build_form(ctx))
    }
}

/// Parses a form body into fields; anything but a urlencoded form is read
/// as a JSON object.
pub fn parse_form_body(
    request: &ActionRequest,
    body: &[u8],
) -> std::result::Result<Map<String, JsonValue>, BodyParseError> {
    if request.is_form_submission() {
        return Ok(parse_form_urlencoded(body));
    }

    match parse_json(body)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(BodyParseError::NotAnObject),
    }
}

fn parse_json(bytes: &[u8]) -> std::result::Result<JsonValue, BodyParseError> {
    serde_json::from_slice(bytes).map_err(|e| BodyParseError::InvalidJson(e.to_string()))
}

fn parse_form_urlencoded(bytes: &[u8]) -> Map<String, JsonValue> {
    form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::GLOBAL_PROPERTY;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct MemberForm {
        name: String,
        age: Option<u32>,
        active: bool,
    }

    fn context(request: ActionRequest) -> RequestContext {
        RequestContext::new(request)
    }

    #[test]
    fn test_query_and_urlencoded_body() {
        let request = ActionRequest::new("/member/edit/", "POST")
            .with_query(HashMap::from([("name".to_string(), "query".to_string())]))
            .with_headers(HashMap::from([(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )]))
            .with_body(b"name=Ada&age=36&active=on".to_vec());
        let form = RequestFormBinder::new().build_form(&context(request));
        assert!(form.populate_failures().is_empty());
        assert_eq!(form.text("name"), Some("Ada"));

        let bean: MemberForm = form.bind().unwrap();
        assert_eq!(
            bean,
            MemberForm {
                name: "Ada".to_string(),
                age: Some(36),
                active: true
            }
        );
    }

    #[test]
    fn test_json_body() {
        let request = ActionRequest::new("/member/edit/", "POST")
            .with_headers(HashMap::from([(
                "content-type".to_string(),
                "application/json".to_string(),
            )]))
            .with_body(br#"{"name": "Grace", "age": null, "active": false}"#.to_vec());
        let form = RequestFormBinder::new().build_form(&context(request));
        let bean: MemberForm = form.bind().unwrap();
        assert_eq!(bean.name, "Grace");
        assert_eq!(bean.age, None);
    }

    #[test]
    fn test_invalid_body_becomes_populate_failure() {
        let request = ActionRequest::new("/member/edit/", "POST")
            .with_headers(HashMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]))
            .with_body(b"{not json".to_vec());
        let form = RequestFormBinder::new().build_form(&context(request));
        let failures = form.populate_failures().get(GLOBAL_PROPERTY);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key, BODY_INVALID_KEY);
    }

    #[test]
    fn test_body_format_follows_content_type() {
        let urlencoded = ActionRequest::new("/member/edit/", "POST").with_headers(HashMap::from([(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
        )]));
        let fields = parse_form_body(&urlencoded, b"name=Ada+Lovelace").unwrap();
        assert_eq!(fields.get("name"), Some(&JsonValue::String("Ada Lovelace".to_string())));

        let untyped = ActionRequest::new("/member/edit/", "POST");
        let fields = parse_form_body(&untyped, br#"{"name": "Grace"}"#).unwrap();
        assert_eq!(fields.get("name"), Some(&JsonValue::String("Grace".to_string())));
        assert!(matches!(
            parse_form_body(&untyped, b"name=Grace"),
            Err(BodyParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_form_body(&untyped, b"[1, 2]"),
            Err(BodyParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_bind_failure() {
        let mut form = ActionForm::new();
        form.set("age", JsonValue::String("old".to_string()));
        let result: Result<MemberForm> = form.bind();
        assert!(matches!(result, Err(FluteError::FormConversion(_))));
    }
}
