// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action registry: the lookup tables consulted by the resolver and the
//! processor.
//!
//! The tables are built once at startup and only read afterwards, so a
//! registry can be shared behind an `Arc` by concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::MappingConfig;
use crate::context::RequestContext;
use crate::error::{FluteError, Result};
use crate::execute::ActionExecute;
use crate::hook::ActionCallback;
use crate::response::ActionResponse;
use crate::routing::mapping::split_segments;
use crate::routing::naming::{action_name_of_type, naming_suggestions};
use crate::runtime::ActionRuntime;

/// Lookup interface used by the resolver and the processor.
pub trait HandlerRegistry: Send + Sync {
    /// Returns true if an action is registered under the key.
    ///
    /// Fails with [`FluteError::ActionNaming`] when the registered type name
    /// implies a different key.
    fn has_handler(&self, action_name: &str) -> Result<bool>;

    /// Finds the execute method accepting the parameter path.
    fn find_handler_method(&self, action_name: &str, param_path: &str)
        -> Result<Option<ExecuteMatch>>;

    /// Creates the per-request handler instance for an execute method.
    fn instantiate_handler(
        &self,
        action_name: &str,
        execute: &Arc<ActionExecute>,
    ) -> Result<ActionInstance>;
}

/// An execute method selected for a parameter path.
#[derive(Debug, Clone)]
pub struct ExecuteMatch {
    /// The selected method.
    pub execute: Arc<ActionExecute>,
    /// Parameter path after a method-name segment was consumed.
    pub mapping_param_path: Option<String>,
}

/// Per-request handler instance.
#[derive(Debug, Clone)]
pub struct ActionInstance {
    /// Registry key.
    pub action_name: String,
    /// The action's own hooks.
    pub callback: ActionCallback,
    /// The selected execute method.
    pub execute: Arc<ActionExecute>,
}

/// Registration of one action.
#[derive(Debug, Clone)]
pub struct ActionDefinition {
    name: String,
    type_name: Option<String>,
    callback: ActionCallback,
    executes: Vec<Arc<ActionExecute>>,
}

impl ActionDefinition {
    /// Starts a definition for a registry key such as `member_memberEditAction`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            callback: ActionCallback::default(),
            executes: Vec::new(),
        }
    }

    /// Records the declared type name (`member::MemberEditAction`); it must
    /// imply the registry key.
    pub fn declared_as(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets the action's before hook.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionRuntime, &mut RequestContext) -> Result<ActionResponse>
            + Send
            + Sync
            + 'static,
    {
        self.callback = self.callback.before(hook);
        self
    }

    /// Sets the action's finally hook.
    pub fn finally<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ActionRuntime, &mut RequestContext) -> Result<()> + Send + Sync + 'static,
    {
        self.callback = self.callback.finally(hook);
        self
    }

    /// Adds an execute method.
    pub fn execute(mut self, execute: ActionExecute) -> Self {
        self.executes.push(Arc::new(execute));
        self
    }

    /// Registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Execute methods in declaration order.
    pub fn executes(&self) -> &[Arc<ActionExecute>] {
        &self.executes
    }

    /// Selects the execute method for a parameter path.
    ///
    /// An empty path selects an index method that needs no parameters.
    /// Otherwise a named method whose name equals the first segment and
    /// which accepts the rest wins over the index methods.
    pub fn find_execute(&self, param_path: &str) -> Option<ExecuteMatch> {
        let segments = split_segments(param_path);
        if segments.is_empty() {
            return self.find_index(&segments);
        }
        let named = self.executes.iter().find(|e| {
            e.method_name() == Some(segments[0]) && e.accepts(&segments[1..])
        });
        if let Some(execute) = named {
            return Some(ExecuteMatch {
                execute: Arc::clone(execute),
                mapping_param_path: Some(segments[1..].join("/")),
            });
        }
        self.find_index(&segments)
    }

    fn find_index(&self, segments: &[&str]) -> Option<ExecuteMatch> {
        self.executes
            .iter()
            .find(|e| e.is_index() && e.accepts(segments))
            .map(|e| ExecuteMatch {
                execute: Arc::clone(e),
                mapping_param_path: None,
            })
    }
}

/// In-memory registry filled at startup.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    config: MappingConfig,
    actions: HashMap<String, ActionDefinition>,
}

impl ActionRegistry {
    /// Creates an empty registry for a naming convention.
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            actions: HashMap::new(),
        }
    }

    /// Registers an action. Keys must end with the action suffix and be unique.
    pub fn register(&mut self, definition: ActionDefinition) -> Result<()> {
        if !definition.name.ends_with(self.config.action_suffix.as_str()) {
            return Err(FluteError::Configuration(format!(
                "action name '{}' must end with '{}'",
                definition.name, self.config.action_suffix
            )));
        }
        if definition.executes.is_empty() {
            return Err(FluteError::Configuration(format!(
                "action '{}' has no execute method",
                definition.name
            )));
        }
        if self.actions.contains_key(&definition.name) {
            return Err(FluteError::Configuration(format!(
                "action '{}' is already registered",
                definition.name
            )));
        }
        self.actions.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Looks up a definition without the naming check.
    pub fn find_definition(&self, action_name: &str) -> Option<&ActionDefinition> {
        self.actions.get(action_name)
    }

    /// All definitions, sorted by key.
    pub fn definitions(&self) -> Vec<&ActionDefinition> {
        let mut definitions: Vec<&ActionDefinition> = self.actions.values().collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn definition(&self, action_name: &str) -> Result<Option<&ActionDefinition>> {
        let Some(definition) = self.actions.get(action_name) else {
            return Ok(None);
        };
        if let Some(type_name) = &definition.type_name {
            let implied = action_name_of_type(type_name, &self.config);
            if implied.as_deref() != Some(action_name) {
                return Err(FluteError::ActionNaming {
                    action_name: action_name.to_string(),
                    type_name: type_name.clone(),
                    suggestions: naming_suggestions(action_name, type_name, &self.config),
                });
            }
        }
        Ok(Some(definition))
    }
}

impl HandlerRegistry for ActionRegistry {
    fn has_handler(&self, action_name: &str) -> Result<bool> {
        Ok(self.definition(action_name)?.is_some())
    }

    fn find_handler_method(
        &self,
        action_name: &str,
        param_path: &str,
    ) -> Result<Option<ExecuteMatch>> {
        Ok(self
            .definition(action_name)?
            .and_then(|d| d.find_execute(param_path)))
    }

    fn instantiate_handler(
        &self,
        action_name: &str,
        execute: &Arc<ActionExecute>,
    ) -> Result<ActionInstance> {
        let definition = self.definition(action_name)?.ok_or_else(|| {
            FluteError::Configuration(format!("action '{}' is not registered", action_name))
        })?;
        Ok(ActionInstance {
            action_name: definition.name.clone(),
            callback: definition.callback.clone(),
            execute: Arc::clone(execute),
        })
    }
}
