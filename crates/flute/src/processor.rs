// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Top-level request processing.
//!
//! ```text
//! path -> resolver -> execute method -> runtime -> form -> GodHandableAction
//!      -> redirect | render | nothing
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::action::{ActionAssistant, ActionState, GodHandableAction};
use crate::config::FluteConfig;
use crate::context::{RequestContext, RequestScope};
use crate::error::{FluteError, Result};
use crate::form::{FormBinder, RequestFormBinder};
use crate::hook::typical::{
    AttributeLoginManager, ExceptionTranslator, LoginManager, TypicalExceptionTranslator,
    TypicalGodHand,
};
use crate::hook::GodHand;
use crate::reflect::{ActionResponseReflector, HtmlRenderer, NextJourney, ResponseReflector};
use crate::registry::HandlerRegistry;
use crate::routing::{ActionFoundPath, ActionMappingFilter, ActionPathResolver};
use crate::runtime::ActionRuntime;
use crate::token::DoubleSubmitManager;
use crate::transaction::{NoTransactionStage, TransactionStage};

/// What became of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// An action handled the request.
    Handled(ActionReport),
    /// No action matched; the transport decides between 404 and passing on.
    NotHandled,
}

impl ProcessOutcome {
    /// Returns true if an action handled the request.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Summary of a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Registry key of the action.
    pub action_name: String,
    /// Routing decision that was carried out.
    pub journey: NextJourney,
    /// Execution states in order.
    pub states: Vec<ActionState>,
    /// True if validation failed.
    pub has_validation_error: bool,
}

/// Builder for [`ActionRequestProcessor`].
#[derive(Default)]
pub struct ActionRequestProcessorBuilder {
    registry: Option<Arc<dyn HandlerRegistry>>,
    config: FluteConfig,
    mapping_filter: Option<ActionMappingFilter>,
    renderer: Option<Arc<dyn HtmlRenderer>>,
    transaction_stage: Option<Arc<dyn TransactionStage>>,
    login_manager: Option<Arc<dyn LoginManager>>,
    login_required: bool,
    god_hand: Option<GodHand>,
    binder: Option<Arc<dyn FormBinder>>,
    reflector: Option<Arc<dyn ResponseReflector>>,
    translator: Option<Arc<dyn ExceptionTranslator>>,
}

impl ActionRequestProcessorBuilder {
    /// Sets the action registry (required).
    pub fn registry(mut self, registry: Arc<dyn HandlerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the framework configuration.
    pub fn config(mut self, config: FluteConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a mapping filter.
    pub fn mapping_filter(mut self, filter: ActionMappingFilter) -> Self {
        self.mapping_filter = Some(filter);
        self
    }

    /// Sets the HTML renderer (required).
    pub fn renderer(mut self, renderer: Arc<dyn HtmlRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Sets the transaction stage; defaults to no transactions.
    pub fn transaction_stage(mut self, stage: Arc<dyn TransactionStage>) -> Self {
        self.transaction_stage = Some(stage);
        self
    }

    /// Uses a custom login manager in the typical prologue.
    pub fn login_manager(mut self, manager: Arc<dyn LoginManager>) -> Self {
        self.login_manager = Some(manager);
        self
    }

    /// Requires login through the session attribute check, redirecting to
    /// the configured login action.
    pub fn require_login(mut self) -> Self {
        self.login_required = true;
        self
    }

    /// Replaces the typical framework hooks.
    pub fn god_hand(mut self, god_hand: GodHand) -> Self {
        self.god_hand = Some(god_hand);
        self
    }

    /// Replaces the request form binder.
    pub fn form_binder(mut self, binder: Arc<dyn FormBinder>) -> Self {
        self.binder = Some(binder);
        self
    }

    /// Replaces the response reflector.
    pub fn reflector(mut self, reflector: Arc<dyn ResponseReflector>) -> Self {
        self.reflector = Some(reflector);
        self
    }

    /// Replaces the exception translator.
    pub fn exception_translator(mut self, translator: Arc<dyn ExceptionTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Builds the processor.
    pub fn build(self) -> Result<ActionRequestProcessor> {
        let registry = self
            .registry
            .ok_or_else(|| FluteError::Configuration("processor needs a registry".to_string()))?;
        let renderer = self.renderer.ok_or_else(|| {
            FluteError::Configuration("processor needs an HTML renderer".to_string())
        })?;

        let mut resolver = ActionPathResolver::new(registry, self.config.mapping.clone());
        if let Some(filter) = self.mapping_filter {
            resolver = resolver.with_mapping_filter(filter);
        }
        let resolver = Arc::new(resolver);

        let god_hand = match self.god_hand {
            Some(god_hand) => god_hand,
            None => {
                let mut typical = TypicalGodHand::new(self.config.clone(), Arc::clone(&resolver));
                let login_manager = match self.login_manager {
                    Some(manager) => Some(manager),
                    None if self.login_required => {
                        let login_url =
                            resolver.resolve_action_path(&self.config.error.login_action)?;
                        Some(Arc::new(AttributeLoginManager::new(login_url)) as Arc<dyn LoginManager>)
                    }
                    None => None,
                };
                if let Some(manager) = login_manager {
                    typical = typical.with_login_manager(manager);
                }
                typical.into_god_hand()
            }
        };

        let assistant = ActionAssistant::new(
            Arc::clone(&resolver),
            self.transaction_stage
                .unwrap_or_else(|| Arc::new(NoTransactionStage)),
            self.reflector
                .unwrap_or_else(|| Arc::new(ActionResponseReflector::new())),
            self.translator
                .unwrap_or_else(|| Arc::new(TypicalExceptionTranslator)),
            Arc::new(DoubleSubmitManager::new(self.config.token.parameter.clone())),
        );

        Ok(ActionRequestProcessor {
            resolver,
            assistant,
            god_hand: Arc::new(god_hand),
            binder: self
                .binder
                .unwrap_or_else(|| Arc::new(RequestFormBinder::new())),
            renderer,
        })
    }
}

/// Resolves, executes and routes action requests.
pub struct ActionRequestProcessor {
    resolver: Arc<ActionPathResolver>,
    assistant: ActionAssistant,
    god_hand: Arc<GodHand>,
    binder: Arc<dyn FormBinder>,
    renderer: Arc<dyn HtmlRenderer>,
}

impl ActionRequestProcessor {
    /// Starts a builder.
    pub fn builder() -> ActionRequestProcessorBuilder {
        ActionRequestProcessorBuilder::default()
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &Arc<ActionPathResolver> {
        &self.resolver
    }

    /// Processes one request.
    ///
    /// The request cache in `ctx` is initialized for the duration of the
    /// call and cleared on every exit path.
    pub fn process(&self, ctx: &mut RequestContext) -> Result<ProcessOutcome> {
        let mut scope = RequestScope::acquire(ctx);
        let path = scope.request.path_only().to_string();
        let result = self
            .resolver
            .handle_action_path(&path, |found| self.run_action(found, &mut scope));
        scope.release();
        Ok(result?.unwrap_or(ProcessOutcome::NotHandled))
    }

    fn run_action(
        &self,
        mut found: ActionFoundPath,
        ctx: &mut RequestContext,
    ) -> Result<ProcessOutcome> {
        let registry = self.resolver.registry();
        let Some(matched) = registry
            .find_handler_method(&found.action_name, found.param_path.request_param_path())?
        else {
            debug!(
                "{} has no execute method for '{}'",
                found.action_name,
                found.param_path.request_param_path()
            );
            return Ok(ProcessOutcome::NotHandled);
        };
        if let Some(mapping_param_path) = matched.mapping_param_path {
            found.param_path.accept_mapping_param_path(mapping_param_path)?;
        }

        let instance = registry.instantiate_handler(&found.action_name, &matched.execute)?;
        let mut runtime = ActionRuntime::new(
            found.action_name.clone(),
            Arc::clone(&matched.execute),
            found.resource.request_path(),
            found.param_path.segments(),
        );
        if matched.execute.needs_form() {
            self.binder.populate(&mut runtime, ctx)?;
        }

        let mut action =
            GodHandableAction::new(&self.assistant, instance, Arc::clone(&self.god_hand));
        let journey = action.execute(&mut runtime, ctx)?;
        self.route(&journey, &runtime, ctx)?;
        debug!(
            "{} handled {} in {:?}",
            found.action_name,
            found.resource.request_path(),
            runtime.elapsed()
        );
        Ok(ProcessOutcome::Handled(ActionReport {
            action_name: found.action_name,
            journey,
            states: action.history().to_vec(),
            has_validation_error: runtime.has_validation_error(),
        }))
    }

    fn route(
        &self,
        journey: &NextJourney,
        runtime: &ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<()> {
        match journey {
            NextJourney::Redirect(url) => {
                ctx.output.redirect(url.clone());
                Ok(())
            }
            NextJourney::Forward(path) => self.renderer.render(path, runtime, ctx),
            NextJourney::Undefined => Ok(()),
        }
    }
}
