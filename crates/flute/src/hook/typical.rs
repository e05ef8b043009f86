// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The framework hooks most applications use.
//!
//! - prologue: login check, skipped for `allow_anyone_access` methods
//! - monologue: login failures redirect to the login action, other
//!   application errors forward to the error page with their message
//! - epilogue: one summary log line per request

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FluteConfig;
use crate::context::RequestContext;
use crate::error::{ApplicationError, FluteError, PersistenceError, Result};
use crate::hook::GodHand;
use crate::messages::{ActionMessage, ActionMessages};
use crate::response::ActionResponse;
use crate::routing::ActionPathResolver;
use crate::runtime::ActionRuntime;

/// Session attribute that [`AttributeLoginManager`] checks by default.
pub const LOGIN_USER_ATTRIBUTE: &str = "flute.login.user";

/// Decides whether the request needs a login first.
pub trait LoginManager: Send + Sync {
    /// Returns the redirect target if the user must log in.
    fn check_login_required(&self, runtime: &ActionRuntime, ctx: &RequestContext)
        -> Option<String>;
}

/// Treats a request as logged in when a session attribute is present.
#[derive(Debug, Clone)]
pub struct AttributeLoginManager {
    attribute: String,
    login_url: String,
}

impl AttributeLoginManager {
    /// Creates a manager that redirects to `login_url`.
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            attribute: LOGIN_USER_ATTRIBUTE.to_string(),
            login_url: login_url.into(),
        }
    }

    /// Checks another session attribute.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }
}

impl LoginManager for AttributeLoginManager {
    fn check_login_required(
        &self,
        _runtime: &ActionRuntime,
        ctx: &RequestContext,
    ) -> Option<String> {
        match ctx.session_attribute(&self.attribute) {
            Some(_) => None,
            None => Some(self.login_url.clone()),
        }
    }
}

/// Maps low-level failures to application errors.
pub trait ExceptionTranslator: Send + Sync {
    /// Returns the translated failure (or the cause unchanged).
    fn translate(&self, cause: FluteError) -> FluteError;
}

/// Translates the usual persistence failures:
/// optimistic lock to already-updated, missing row to already-deleted,
/// duplicate key to already-exists.
#[derive(Debug, Clone, Default)]
pub struct TypicalExceptionTranslator;

impl ExceptionTranslator for TypicalExceptionTranslator {
    fn translate(&self, cause: FluteError) -> FluteError {
        match cause {
            FluteError::Persistence(PersistenceError::OptimisticLock) => {
                ApplicationError::EntityAlreadyUpdated.into()
            }
            FluteError::Persistence(PersistenceError::NoRowFound) => {
                ApplicationError::EntityAlreadyDeleted.into()
            }
            FluteError::Persistence(PersistenceError::DuplicateKey) => {
                ApplicationError::EntityAlreadyExists.into()
            }
            other => other,
        }
    }
}

/// Builder for the typical framework hooks.
pub struct TypicalGodHand {
    config: FluteConfig,
    resolver: Arc<ActionPathResolver>,
    login_manager: Option<Arc<dyn LoginManager>>,
}

impl TypicalGodHand {
    /// Creates the hooks without a login check.
    pub fn new(config: FluteConfig, resolver: Arc<ActionPathResolver>) -> Self {
        Self {
            config,
            resolver,
            login_manager: None,
        }
    }

    /// Enables the login check in the prologue.
    pub fn with_login_manager(mut self, manager: Arc<dyn LoginManager>) -> Self {
        self.login_manager = Some(manager);
        self
    }

    /// Prologue: redirects to login when required.
    pub fn prologue(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        let Some(manager) = &self.login_manager else {
            return Ok(ActionResponse::Undefined);
        };
        if runtime.execute().is_allow_anyone_access()
            || runtime.action_name() == self.config.error.login_action
        {
            return Ok(ActionResponse::Undefined);
        }
        match manager.check_login_required(runtime, ctx) {
            Some(target) => {
                debug!("Login required for {}", runtime.request_path());
                Ok(ActionResponse::redirect(target))
            }
            None => Ok(ActionResponse::Undefined),
        }
    }

    /// Monologue: turns application errors into responses.
    pub fn monologue(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        let Some(app) = runtime.failure_cause().and_then(FluteError::as_application) else {
            return Ok(ActionResponse::Undefined);
        };
        if app.is_login_failure() {
            debug!("{} -> redirect to login", app);
            let login_url = self
                .resolver
                .resolve_action_path(&self.config.error.login_action)?;
            return Ok(ActionResponse::redirect(login_url));
        }
        let mut messages = ActionMessages::new();
        messages.add_global(ActionMessage::new(app.message_key()));
        info!("Application error on {}: {}", runtime.request_path(), app);
        ctx.save_errors(&messages);
        runtime.clear_display_data();
        Ok(ActionResponse::html(self.config.error.error_page.clone()))
    }

    /// Epilogue: logs a summary of the request.
    pub fn epilogue(&self, runtime: &mut ActionRuntime, _ctx: &mut RequestContext) -> Result<()> {
        let outcome = match runtime.failure_cause() {
            Some(cause) => format!("failed: {}", cause),
            None if runtime.has_validation_error() => "validation error".to_string(),
            None => runtime.response().kind().to_string(),
        };
        info!(
            "{} {} ({}) in {:?}",
            runtime.action_name(),
            runtime.request_path(),
            outcome,
            runtime.elapsed()
        );
        Ok(())
    }

    /// Packs the hooks for the processor.
    pub fn into_god_hand(self) -> GodHand {
        let hand = Arc::new(self);
        let prologue = Arc::clone(&hand);
        let monologue = Arc::clone(&hand);
        let epilogue = hand;
        GodHand {
            prologue: Some(Arc::new(
                move |runtime: &mut ActionRuntime, ctx: &mut RequestContext| {
                    prologue.prologue(runtime, ctx)
                },
            )),
            before: None,
            monologue: Some(Arc::new(
                move |runtime: &mut ActionRuntime, ctx: &mut RequestContext| {
                    monologue.monologue(runtime, ctx)
                },
            )),
            epilogue: Some(Arc::new(
                move |runtime: &mut ActionRuntime, ctx: &mut RequestContext| {
                    epilogue.epilogue(runtime, ctx)
                },
            )),
        }
    }
}
