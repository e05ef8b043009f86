// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Lifecycle hooks around handler execution.
//!
//! Hooks come from two layers. The framework layer ([`GodHand`]) is shared
//! by every action; the application layer ([`ActionCallback`]) belongs to
//! one action. They run in a fixed order:
//!
//! 1. prologue (framework)
//! 2. before (framework, then the action's own)
//! 3. handler
//! 4. monologue (framework, only on failure)
//! 5. finally (the action's own), then epilogue (framework), always
//!
//! A defined response from prologue or before skips the handler.

pub mod typical;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::context::RequestContext;
use crate::error::Result;
use crate::response::ActionResponse;
use crate::runtime::ActionRuntime;

/// The lifecycle stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HookStage {
    /// Framework pre-hook.
    Prologue,
    /// Framework and action before hooks.
    Before,
    /// Failure translation.
    Monologue,
    /// Action finally hook.
    Finally,
    /// Framework post-hook.
    Epilogue,
}

/// Hook that may decide the response; `Undefined` means carry on.
pub type ResponseHookFn =
    Arc<dyn Fn(&mut ActionRuntime, &mut RequestContext) -> Result<ActionResponse> + Send + Sync>;

/// Hook that runs for its side effects.
pub type FinallyHookFn =
    Arc<dyn Fn(&mut ActionRuntime, &mut RequestContext) -> Result<()> + Send + Sync>;

/// Hooks of one action.
#[derive(Clone, Default)]
pub struct ActionCallback {
    before: Option<ResponseHookFn>,
    finally: Option<FinallyHookFn>,
}

impl fmt::Debug for ActionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCallback")
            .field("before", &self.before.is_some())
            .field("finally", &self.finally.is_some())
            .finish()
    }
}

impl ActionCallback {
    /// Creates a callback without hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the before hook.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionRuntime, &mut RequestContext) -> Result<ActionResponse>
            + Send
            + Sync
            + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Sets the finally hook.
    pub fn finally<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionRuntime, &mut RequestContext) -> Result<()> + Send + Sync + 'static,
    {
        self.finally = Some(Arc::new(hook));
        self
    }
}

/// Framework-level hooks shared by every action.
#[derive(Clone, Default)]
pub struct GodHand {
    /// Runs first; a defined response skips everything up to finally.
    pub prologue: Option<ResponseHookFn>,
    /// Runs before the action's own before hook.
    pub before: Option<ResponseHookFn>,
    /// Translates the failure cause stored on the runtime into a response.
    pub monologue: Option<ResponseHookFn>,
    /// Runs last, after the action's finally hook.
    pub epilogue: Option<FinallyHookFn>,
}

impl fmt::Debug for GodHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GodHand")
            .field("prologue", &self.prologue.is_some())
            .field("before", &self.before.is_some())
            .field("monologue", &self.monologue.is_some())
            .field("epilogue", &self.epilogue.is_some())
            .finish()
    }
}

/// Framework and action hooks of one request, invoked in pipeline order.
#[derive(Debug, Clone)]
pub struct ActionHookChain {
    god_hand: Arc<GodHand>,
    callback: ActionCallback,
}

impl ActionHookChain {
    /// Combines the shared framework hooks with an action's own hooks.
    pub fn new(god_hand: Arc<GodHand>, callback: ActionCallback) -> Self {
        Self { god_hand, callback }
    }

    /// Runs the prologue.
    pub fn prologue(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        invoke(&self.god_hand.prologue, runtime, ctx)
    }

    /// Runs the framework before hook and, if it stays undefined, the
    /// action's before hook.
    pub fn before(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        let response = invoke(&self.god_hand.before, runtime, ctx)?;
        if response.is_defined() {
            return Ok(response);
        }
        invoke(&self.callback.before, runtime, ctx)
    }

    /// Runs the monologue.
    pub fn monologue(
        &self,
        runtime: &mut ActionRuntime,
        ctx: &mut RequestContext,
    ) -> Result<ActionResponse> {
        invoke(&self.god_hand.monologue, runtime, ctx)
    }

    /// Runs the action's finally hook, then the epilogue.
    ///
    /// The epilogue runs even if the finally hook fails; the first error is
    /// returned.
    pub fn finally(&self, runtime: &mut ActionRuntime, ctx: &mut RequestContext) -> Result<()> {
        let finally_result = match &self.callback.finally {
            Some(hook) => hook(runtime, ctx),
            None => Ok(()),
        };
        let epilogue_result = match &self.god_hand.epilogue {
            Some(hook) => hook(runtime, ctx),
            None => Ok(()),
        };
        match (finally_result, epilogue_result) {
            (Err(err), Err(epilogue_err)) => {
                warn!("Epilogue failed after finally failure: {}", epilogue_err);
                Err(err)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Ok(()), Ok(())) => Ok(()),
        }
    }
}

fn invoke(
    hook: &Option<ResponseHookFn>,
    runtime: &mut ActionRuntime,
    ctx: &mut RequestContext,
) -> Result<ActionResponse> {
    match hook {
        Some(hook) => hook(runtime, ctx),
        None => Ok(ActionResponse::Undefined),
    }
}
