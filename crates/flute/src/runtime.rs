// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Per-request state carried through the pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;

use crate::error::{FluteError, Result};
use crate::execute::ActionExecute;
use crate::form::ActionForm;
use crate::messages::ActionMessages;
use crate::response::{ActionResponse, ResponseHook};

/// Mutable state of one request.
///
/// `form`, `response`, `failure_cause` and `validation_errors` are set once
/// by the stage that owns them. Everything else is read through the derived
/// queries.
#[derive(Debug)]
pub struct ActionRuntime {
    action_name: String,
    execute: Arc<ActionExecute>,
    request_path: String,
    path_params: Vec<String>,
    form: Option<ActionForm>,
    response: ActionResponse,
    failure_cause: Option<FluteError>,
    validation_errors: Option<ActionMessages>,
    display_data: Vec<(String, JsonValue)>,
    display_data_cleared: bool,
    begin_time: Instant,
}

impl ActionRuntime {
    /// Creates the runtime for a resolved action.
    pub fn new(
        action_name: impl Into<String>,
        execute: Arc<ActionExecute>,
        request_path: impl Into<String>,
        path_params: Vec<String>,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            execute,
            request_path: request_path.into(),
            path_params,
            form: None,
            response: ActionResponse::Undefined,
            failure_cause: None,
            validation_errors: None,
            display_data: Vec::new(),
            display_data_cleared: false,
            begin_time: Instant::now(),
        }
    }

    /// Registry key of the running action.
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// The execute method being run.
    pub fn execute(&self) -> &Arc<ActionExecute> {
        &self.execute
    }

    /// The raw request path.
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// Path parameter segments.
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    /// The populated form, if the method declares one.
    pub fn form(&self) -> Option<&ActionForm> {
        self.form.as_ref()
    }

    /// Sets the populated form.
    pub fn set_form(&mut self, form: ActionForm) -> Result<()> {
        if self.form.is_some() {
            return Err(FluteError::contract("form is already populated"));
        }
        self.form = Some(form);
        Ok(())
    }

    /// The decided response, `Undefined` until one is set.
    pub fn response(&self) -> &ActionResponse {
        &self.response
    }

    /// Sets the response. It can be decided only once.
    pub fn set_response(&mut self, response: ActionResponse) -> Result<()> {
        if self.response.is_defined() {
            return Err(FluteError::contract(format!(
                "response is already decided as {}",
                self.response.kind()
            )));
        }
        self.response = response;
        Ok(())
    }

    /// Replaces the response after a failure translated by a hook.
    pub(crate) fn replace_response(&mut self, response: ActionResponse) {
        self.response = response;
    }

    pub(crate) fn take_after_tx_commit(&mut self) -> Option<ResponseHook> {
        self.response.take_after_tx_commit()
    }

    /// The failure being handled, if any.
    pub fn failure_cause(&self) -> Option<&FluteError> {
        self.failure_cause.as_ref()
    }

    pub(crate) fn set_failure_cause(&mut self, cause: FluteError) -> Result<()> {
        if let Some(existing) = &self.failure_cause {
            return Err(FluteError::contract(format!(
                "failure cause is already set: {}",
                existing
            )));
        }
        self.failure_cause = Some(cause);
        Ok(())
    }

    pub(crate) fn take_failure_cause(&mut self) -> Option<FluteError> {
        self.failure_cause.take()
    }

    /// Messages of a failed validation.
    pub fn validation_errors(&self) -> Option<&ActionMessages> {
        self.validation_errors.as_ref()
    }

    pub(crate) fn set_validation_errors(&mut self, messages: ActionMessages) -> Result<()> {
        if self.validation_errors.is_some() {
            return Err(FluteError::contract("validation errors are already set"));
        }
        self.validation_errors = Some(messages);
        Ok(())
    }

    /// Returns true if the response forwards to an HTML view.
    pub fn is_forward_to_html(&self) -> bool {
        matches!(&self.response, ActionResponse::Html(html) if !html.is_redirect())
    }

    /// Returns true if the response redirects.
    pub fn is_redirect_to(&self) -> bool {
        matches!(&self.response, ActionResponse::Html(html) if html.is_redirect())
    }

    /// Returns true if a failure is being handled.
    pub fn has_failure_cause(&self) -> bool {
        self.failure_cause.is_some()
    }

    /// Returns true if validation failed.
    pub fn has_validation_error(&self) -> bool {
        self.validation_errors
            .as_ref()
            .map(|m| !m.is_empty())
            .unwrap_or(false)
    }

    /// Stages a value for the rendered view; a later value for the same key
    /// wins but keeps the first position.
    pub fn register_data(&mut self, key: impl Into<String>, value: JsonValue) {
        let key = key.into();
        match self.display_data.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.display_data.push((key, value)),
        }
    }

    /// Drops all staged display data. Calling it again does nothing.
    pub fn clear_display_data(&mut self) {
        if self.display_data_cleared {
            return;
        }
        self.display_data.clear();
        self.display_data_cleared = true;
    }

    /// Staged display data in registration order.
    pub fn display_data(&self) -> &[(String, JsonValue)] {
        &self.display_data
    }

    /// Looks up one staged value.
    pub fn find_data(&self, key: &str) -> Option<&JsonValue> {
        self.display_data
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Time since the runtime was created.
    pub fn elapsed(&self) -> Duration {
        self.begin_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ActionMessage;
    use serde_json::json;

    fn runtime() -> ActionRuntime {
        let execute = Arc::new(ActionExecute::index(|_| Ok(ActionResponse::empty())));
        ActionRuntime::new("memberAction", execute, "/member/3/", vec!["3".to_string()])
    }

    #[test]
    fn test_initial_state() {
        let runtime = runtime();
        assert!(runtime.response().is_undefined());
        assert!(!runtime.has_failure_cause());
        assert!(!runtime.has_validation_error());
        assert!(!runtime.is_forward_to_html());
        assert!(!runtime.is_redirect_to());
        assert_eq!(runtime.path_params(), ["3".to_string()]);
    }

    #[test]
    fn test_response_is_write_once() {
        let mut runtime = runtime();
        runtime.set_response(ActionResponse::html("member/detail.html")).unwrap();
        assert!(runtime.is_forward_to_html());
        let second = runtime.set_response(ActionResponse::redirect("/"));
        assert!(matches!(second, Err(FluteError::ContractViolation(_))));
        assert!(!runtime.is_redirect_to());
    }

    #[test]
    fn test_display_data_order_and_clear() {
        let mut runtime = runtime();
        runtime.register_data("member", json!({"id": 3}));
        runtime.register_data("tab", json!("orders"));
        runtime.register_data("member", json!({"id": 4}));
        let keys: Vec<&str> = runtime.display_data().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["member", "tab"]);
        assert_eq!(runtime.find_data("member"), Some(&json!({"id": 4})));

        runtime.clear_display_data();
        assert!(runtime.display_data().is_empty());
        runtime.register_data("error", json!(true));
        runtime.clear_display_data();
        assert_eq!(runtime.display_data().len(), 1);
    }

    #[test]
    fn test_validation_errors() {
        let mut runtime = runtime();
        let mut messages = ActionMessages::new();
        messages.add("name", ActionMessage::new("constraints.Required.message"));
        runtime.set_validation_errors(messages).unwrap();
        assert!(runtime.has_validation_error());
        assert!(runtime.set_validation_errors(ActionMessages::new()).is_err());
    }

    #[test]
    fn test_failure_cause_is_write_once() {
        let mut runtime = runtime();
        runtime
            .set_failure_cause(FluteError::contract("first"))
            .unwrap();
        assert!(runtime.has_failure_cause());
        assert!(runtime.set_failure_cause(FluteError::contract("second")).is_err());
        let taken = runtime.take_failure_cause().unwrap();
        assert_eq!(taken.to_string(), "Contract violation: first");
    }
}
