// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Execute methods of an action and the arguments handed to them.
//!
//! An [`ActionExecute`] is the static description of one handler method:
//! its name (or none for the index method), the path parameters it takes,
//! whether it binds a form, its transaction genre and token policy. The
//! handler itself is a plain function value invoked with [`ActionArgs`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::context::RequestContext;
use crate::error::{FluteError, Result};
use crate::form::ActionForm;
use crate::messages::ActionMessages;
use crate::request::ActionRequest;
use crate::response::ActionResponse;
use crate::routing::{ActionPathResolver, UrlChain};
use crate::runtime::ActionRuntime;
use crate::token::TokenPolicy;
use crate::transaction::TransactionGenre;
use crate::validation::ValidationFailure;

/// Kind of value a path parameter segment must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathParamKind {
    /// Any segment.
    Text,
    /// A segment that parses as a signed 64-bit integer.
    Integer,
}

impl PathParamKind {
    /// Returns true if the segment is acceptable for this kind.
    pub fn accepts(&self, segment: &str) -> bool {
        match self {
            Self::Text => !segment.is_empty(),
            Self::Integer => segment.parse::<i64>().is_ok(),
        }
    }
}

/// One declared path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParamSpec {
    /// Expected kind.
    pub kind: PathParamKind,
    /// Optional parameters may be missing from the end of the path.
    pub optional: bool,
}

/// Handler function of an execute method.
pub type ActionFn = Arc<dyn Fn(&mut ActionArgs<'_>) -> Result<ActionResponse> + Send + Sync>;

/// Static metadata of a handler method.
pub struct ActionExecute {
    method_name: Option<String>,
    path_params: Vec<PathParamSpec>,
    form: bool,
    tx_genre: TransactionGenre,
    token: TokenPolicy,
    allow_anyone_access: bool,
    function: ActionFn,
}

impl fmt::Debug for ActionExecute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionExecute")
            .field("method_name", &self.method_name)
            .field("path_params", &self.path_params)
            .field("form", &self.form)
            .field("tx_genre", &self.tx_genre)
            .field("token", &self.token)
            .field("allow_anyone_access", &self.allow_anyone_access)
            .finish()
    }
}

impl ActionExecute {
    /// The index method, reached without a method segment.
    pub fn index<F>(function: F) -> Self
    where
        F: Fn(&mut ActionArgs<'_>) -> Result<ActionResponse> + Send + Sync + 'static,
    {
        Self::build(None, Arc::new(function))
    }

    /// A named method, reached when the first parameter segment equals `method`.
    pub fn named<F>(method: impl Into<String>, function: F) -> Self
    where
        F: Fn(&mut ActionArgs<'_>) -> Result<ActionResponse> + Send + Sync + 'static,
    {
        Self::build(Some(method.into()), Arc::new(function))
    }

    fn build(method_name: Option<String>, function: ActionFn) -> Self {
        Self {
            method_name,
            path_params: Vec::new(),
            form: false,
            tx_genre: TransactionGenre::Default,
            token: TokenPolicy::None,
            allow_anyone_access: false,
            function,
        }
    }

    /// Declares a required path parameter.
    pub fn path_param(mut self, kind: PathParamKind) -> Self {
        self.path_params.push(PathParamSpec {
            kind,
            optional: false,
        });
        self
    }

    /// Declares an optional path parameter; optional ones must come last.
    pub fn optional_path_param(mut self, kind: PathParamKind) -> Self {
        self.path_params.push(PathParamSpec {
            kind,
            optional: true,
        });
        self
    }

    /// Binds a form from request parameters before invocation.
    pub fn with_form(mut self) -> Self {
        self.form = true;
        self
    }

    /// Sets the transaction genre.
    pub fn tx_genre(mut self, genre: TransactionGenre) -> Self {
        self.tx_genre = genre;
        self
    }

    /// Sets the double-submit token policy.
    pub fn token(mut self, policy: TokenPolicy) -> Self {
        self.token = policy;
        self
    }

    /// Skips the login check.
    pub fn allow_anyone_access(mut self) -> Self {
        self.allow_anyone_access = true;
        self
    }

    /// Method name, `None` for the index method.
    pub fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    /// Returns true for the index method.
    pub fn is_index(&self) -> bool {
        self.method_name.is_none()
    }

    /// Declared path parameters.
    pub fn path_params(&self) -> &[PathParamSpec] {
        &self.path_params
    }

    /// Number of parameters that must be present.
    pub fn required_param_count(&self) -> usize {
        self.path_params.iter().filter(|p| !p.optional).count()
    }

    /// Returns true if the segments fit the declared parameters.
    pub fn accepts<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        if segments.len() < self.required_param_count() || segments.len() > self.path_params.len()
        {
            return false;
        }
        segments
            .iter()
            .zip(&self.path_params)
            .all(|(segment, param)| param.kind.accepts(segment.as_ref()))
    }

    /// Returns true if a form is bound before invocation.
    pub fn needs_form(&self) -> bool {
        self.form
    }

    /// The transaction genre.
    pub fn genre(&self) -> TransactionGenre {
        self.tx_genre
    }

    /// The double-submit token policy.
    pub fn token_policy(&self) -> TokenPolicy {
        self.token
    }

    /// Returns true if the login check is skipped.
    pub fn is_allow_anyone_access(&self) -> bool {
        self.allow_anyone_access
    }

    pub(crate) fn invoke(&self, args: &mut ActionArgs<'_>) -> Result<ActionResponse> {
        (self.function)(args)
    }
}

/// What a handler sees of the request.
pub struct ActionArgs<'a> {
    runtime: &'a mut ActionRuntime,
    ctx: &'a mut RequestContext,
    resolver: &'a ActionPathResolver,
}

impl<'a> ActionArgs<'a> {
    pub(crate) fn new(
        runtime: &'a mut ActionRuntime,
        ctx: &'a mut RequestContext,
        resolver: &'a ActionPathResolver,
    ) -> Self {
        Self {
            runtime,
            ctx,
            resolver,
        }
    }

    /// Raw path parameter segment.
    pub fn path_param_raw(&self, index: usize) -> Option<&str> {
        self.runtime.path_params().get(index).map(String::as_str)
    }

    /// Converts a required path parameter.
    pub fn path_param<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional_path_param(index)? {
            Some(value) => Ok(value),
            None => Err(FluteError::PathParameter {
                index,
                value: String::new(),
                reason: "missing".to_string(),
            }),
        }
    }

    /// Converts an optional path parameter.
    pub fn optional_path_param<T>(&self, index: usize) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.path_param_raw(index) {
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| FluteError::PathParameter {
                index,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// The populated form.
    pub fn form(&self) -> Result<&ActionForm> {
        self.runtime.form().ok_or_else(|| {
            FluteError::contract("the execute method does not declare a form (use with_form())")
        })
    }

    /// Deserializes the populated form into a typed bean.
    pub fn bind_form<T: DeserializeOwned>(&self) -> Result<T> {
        self.form()?.bind()
    }

    /// Stages a value for the rendered view.
    pub fn register_data(&mut self, key: impl Into<String>, value: JsonValue) {
        self.runtime.register_data(key, value);
    }

    /// Runs `check` against the form and fails with a validation error if it
    /// (or form population) produced messages.
    ///
    /// The `error_hook` decides the response shown with the errors; the
    /// transaction is always rolled back.
    pub fn validate<C, H>(&mut self, check: C, error_hook: H) -> Result<()>
    where
        C: FnOnce(&ActionForm, &mut ActionMessages),
        H: FnOnce() -> ActionResponse + Send + Sync + 'static,
    {
        let empty = ActionForm::default();
        let form = self.runtime.form().unwrap_or(&empty);
        let mut messages = form.populate_failures().clone();
        check(form, &mut messages);
        if messages.is_empty() {
            return Ok(());
        }
        Err(FluteError::Validation(ValidationFailure::new(
            messages, error_hook,
        )))
    }

    /// The incoming request.
    pub fn request(&self) -> &ActionRequest {
        &self.ctx.request
    }

    /// The runtime state of this request.
    pub fn runtime(&self) -> &ActionRuntime {
        &*self.runtime
    }

    /// The request context (session attributes, output).
    pub fn context(&self) -> &RequestContext {
        &*self.ctx
    }

    /// The request context, mutably.
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut *self.ctx
    }

    /// URL of another action.
    pub fn url_of(&self, action_name: &str, chain: &UrlChain) -> Result<String> {
        self.resolver.to_action_url(action_name, chain)
    }

    /// Redirect response to another action.
    pub fn redirect_to(&self, action_name: &str, chain: &UrlChain) -> Result<ActionResponse> {
        Ok(ActionResponse::redirect(self.url_of(action_name, chain)?))
    }
}
