// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Execution of one action request.
//!
//! [`GodHandableAction`] runs the hooks, the handler inside its transaction
//! and the failure translation in a fixed order:
//!
//! ```text
//! Created -> BeforeHooked -> Executing -> Committed | RolledBack
//!         -> Monologued (on failure) -> FinallyHooked -> Done
//! ```
//!
//! Every path, including short-circuits and failures, ends with the
//! action's finally hook followed by the framework epilogue.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, trace, warn};

use crate::context::{RequestContext, ResponseOutput};
use crate::error::{FluteError, Result};
use crate::execute::{ActionArgs, ActionExecute};
use crate::hook::typical::ExceptionTranslator;
use crate::hook::{ActionHookChain, GodHand, HookStage};
use crate::reflect::{NextJourney, ResponseReflector};
use crate::registry::ActionInstance;
use crate::response::{ActionResponse, ResponseHook};
use crate::routing::ActionPathResolver;
use crate::runtime::ActionRuntime;
use crate::token::{DoubleSubmitManager, TokenPolicy};
use crate::transaction::TransactionStage;
use crate::validation::ValidationFailure;

/// Where an execution currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    /// Nothing ran yet.
    Created,
    /// Prologue and before hooks ran.
    BeforeHooked,
    /// The handler is running inside its transaction.
    Executing,
    /// The transaction committed.
    Committed,
    /// The transaction rolled back.
    RolledBack,
    /// A failure was translated into a response. Failures of the prologue
    /// reach the monologue too, not only those of before hooks and handler.
    Monologued,
    /// Finally and epilogue ran.
    FinallyHooked,
    /// Terminal state.
    Done,
}

/// Result of the handler inside its transaction.
pub struct ExecuteTransactionResult {
    /// Routing decision of the response.
    pub journey: NextJourney,
    /// True when validation failed; the transaction must not commit.
    pub rollback_only: bool,
    /// Hook to fire after a successful commit.
    pub after_commit: Option<ResponseHook>,
}

impl fmt::Debug for ExecuteTransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteTransactionResult")
            .field("journey", &self.journey)
            .field("rollback_only", &self.rollback_only)
            .field("after_commit", &self.after_commit.is_some())
            .finish()
    }
}

/// Collaborators shared by every execution.
pub struct ActionAssistant {
    resolver: Arc<ActionPathResolver>,
    transaction_stage: Arc<dyn TransactionStage>,
    reflector: Arc<dyn ResponseReflector>,
    translator: Arc<dyn ExceptionTranslator>,
    token_manager: Arc<DoubleSubmitManager>,
}

impl ActionAssistant {
    /// Bundles the collaborators.
    pub fn new(
        resolver: Arc<ActionPathResolver>,
        transaction_stage: Arc<dyn TransactionStage>,
        reflector: Arc<dyn ResponseReflector>,
        translator: Arc<dyn ExceptionTranslator>,
        token_manager: Arc<DoubleSubmitManager>,
    ) -> Self {
        Self {
            resolver,
            transaction_stage,
            reflector,
            translator,
            token_manager,
        }
    }

    /// The resolver handed to handlers for URL building.
    pub fn resolver(&self) -> &Arc<ActionPathResolver> {
        &self.resolver
    }
}

enum Outcome {
    Journey(NextJourney),
    Rethrow,
    Failed(FluteError),
}

/// The execution state machine of one request.
pub struct GodHandableAction<'a> {
    assistant: &'a ActionAssistant,
    execute: Arc<ActionExecute>,
    hooks: ActionHookChain,
    history: Vec<ActionState>,
}

impl<'a> GodHandableAction<'a> {
    /// Prepares the execution of a handler instance.
    pub fn new(assistant: &'a ActionAssistant, instance: ActionInstance, god_hand: Arc<GodHand>) -> Self {
        Self {
            assistant,
            execute: instance.execute,
            hooks: ActionHookChain::new(god_hand, instance.callback),
            history: vec![ActionState::Created],
        }
    }

    /// The current state.
    pub fn state(&self) -> ActionState {
        self.history
            .last()
            .copied()
            .unwrap_or(ActionState::Created)
    }

    /// Every state passed through, in order.
    pub fn history(&self) -> &[ActionState] {
        &self.history
    }

    /// Runs the request to completion.
    ///
    /// A failure that the monologue does not translate is returned after
    /// the finally hooks ran. An error from the finally hooks is returned
    /// only when nothing else failed; otherwise it is logged.
    pub fn execute(
        &mut self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<NextJourney> {
        let outcome = match self.run(runtime, ctx) {
            Ok(journey) => Outcome::Journey(journey),
            Err(cause) => self.handle_failure(cause, runtime, ctx),
        };

        let finally_result = self.hooks.finally(runtime, ctx);
        self.transition(ActionState::FinallyHooked);

        let result = match outcome {
            Outcome::Journey(journey) => finally_result.map(|()| journey),
            Outcome::Rethrow => {
                log_suppressed(finally_result);
                Err(runtime.take_failure_cause().unwrap_or_else(|| {
                    FluteError::contract("failure cause was lost before rethrow")
                }))
            }
            Outcome::Failed(err) => {
                log_suppressed(finally_result);
                Err(err)
            }
        };
        self.transition(ActionState::Done);
        result
    }

    fn run(&mut self, runtime: &mut ActionRuntime, ctx: &mut RequestContext) -> Result<NextJourney> {
        let prologue = self.hooks.prologue(runtime, ctx)?;
        if prologue.is_defined() {
            return self.reflect_hook_response(HookStage::Prologue, prologue, runtime, ctx);
        }
        let before = self.hooks.before(runtime, ctx)?;
        self.transition(ActionState::BeforeHooked);
        if before.is_defined() {
            return self.reflect_hook_response(HookStage::Before, before, runtime, ctx);
        }
        let result = self.transactional_execute(runtime, ctx)?;
        Ok(result.journey)
    }

    fn reflect_hook_response(
        &self,
        stage: HookStage,
        response: ActionResponse,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<NextJourney> {
        if response.has_after_tx_commit() {
            return Err(FluteError::contract(format!(
                "after_tx_commit() is only for handler responses, found on the {:?} hook response",
                stage
            )));
        }
        debug!("{:?} hook decided the response: {}", stage, response.kind());
        if stage == HookStage::Monologue {
            ctx.output = ResponseOutput::default();
            runtime.replace_response(response);
        } else {
            runtime.set_response(response)?;
        }
        self.assistant.reflector.reflect(runtime, ctx)
    }

    fn transactional_execute(
        &mut self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ExecuteTransactionResult> {
        let scope = self
            .assistant
            .transaction_stage
            .begin(self.execute.genre())?;
        self.transition(ActionState::Executing);
        match self.execute_in_transaction(runtime, ctx) {
            Ok(mut result) => {
                if result.rollback_only {
                    scope.rollback()?;
                    self.transition(ActionState::RolledBack);
                } else {
                    scope.commit()?;
                    self.transition(ActionState::Committed);
                    if let Some(hook) = result.after_commit.take() {
                        debug!("Firing after-commit hook of {}", runtime.action_name());
                        hook();
                    }
                }
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = scope.rollback() {
                    warn!("Rollback failed after {}: {}", err, rollback_err);
                }
                self.transition(ActionState::RolledBack);
                Err(err)
            }
        }
    }

    fn execute_in_transaction(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ExecuteTransactionResult> {
        let response = self.invoke_action(runtime, ctx)?;
        runtime.set_response(response)?;
        let journey = self.assistant.reflector.reflect(runtime, ctx)?;
        let rollback_only = runtime.has_validation_error();
        let after_commit = if rollback_only {
            None
        } else {
            runtime.take_after_tx_commit()
        };
        Ok(ExecuteTransactionResult {
            journey,
            rollback_only,
            after_commit,
        })
    }

    fn invoke_action(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        let assistant = self.assistant;
        let execute = Arc::clone(&self.execute);
        self.verify_token(runtime, ctx)?;

        let invoked = {
            let mut args = ActionArgs::new(runtime, ctx, &assistant.resolver);
            execute.invoke(&mut args)
        };
        let response = match invoked {
            Ok(response) => response,
            Err(FluteError::Validation(failure)) => {
                return self.handle_validation_failure(failure, runtime, ctx)
            }
            Err(err) => return Err(err),
        };
        if response.is_undefined() {
            return Err(FluteError::contract(format!(
                "{} returned an undefined response; handlers must decide one",
                runtime.action_name()
            )));
        }
        if execute.token_policy() == TokenPolicy::Save {
            let token = assistant
                .token_manager
                .save_token(ctx, runtime.action_name());
            runtime.register_data(assistant.token_manager.parameter(), JsonValue::String(token));
        }
        Ok(response)
    }

    fn verify_token(&self, runtime: &ActionRuntime, ctx: &mut RequestContext) -> Result<()> {
        let keep = match self.execute.token_policy() {
            TokenPolicy::Validate => false,
            TokenPolicy::ValidateKeep => true,
            TokenPolicy::None | TokenPolicy::Save => return Ok(()),
        };
        let manager = &self.assistant.token_manager;
        let submitted = runtime
            .form()
            .and_then(|f| f.text(manager.parameter()))
            .or_else(|| ctx.request.query_param(manager.parameter()))
            .map(str::to_string);
        manager.verify_token(ctx, runtime.action_name(), submitted.as_deref(), keep)
    }

    fn handle_validation_failure(
        &self,
        failure: ValidationFailure,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        let (messages, error_hook) = failure.into_parts();
        debug!(
            "Validation failed on {}: {} message(s)",
            runtime.action_name(),
            messages.len()
        );
        ctx.save_errors(&messages);
        runtime.set_validation_errors(messages)?;
        let response = error_hook();
        if response.is_undefined() {
            return Err(FluteError::contract(format!(
                "validation error hook of {} returned an undefined response",
                runtime.action_name()
            )));
        }
        if response.has_after_tx_commit() {
            return Err(FluteError::contract(format!(
                "after_tx_commit() on the validation error response of {} can never fire: \
                 validation errors always roll back",
                runtime.action_name()
            )));
        }
        Ok(response)
    }

    fn handle_failure(
        &mut self,
        cause: FluteError,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Outcome {
        let cause = self.assistant.translator.translate(cause);
        debug!("Action {} failed: {}", runtime.action_name(), cause);
        if let Err(err) = runtime.set_failure_cause(cause) {
            return Outcome::Failed(err);
        }
        match self.hooks.monologue(runtime, ctx) {
            Ok(response) if response.is_defined() => {
                self.transition(ActionState::Monologued);
                match self.reflect_hook_response(HookStage::Monologue, response, runtime, ctx) {
                    Ok(journey) => Outcome::Journey(journey),
                    Err(err) => Outcome::Failed(err),
                }
            }
            Ok(_) => Outcome::Rethrow,
            Err(err) => Outcome::Failed(err),
        }
    }

    fn transition(&mut self, state: ActionState) {
        trace!("Action state {:?} -> {:?}", self.state(), state);
        self.history.push(state);
    }
}

fn log_suppressed(result: Result<()>) {
    if let Err(err) = result {
        warn!("Finally hook failed while another failure propagates: {}", err);
    }
}
