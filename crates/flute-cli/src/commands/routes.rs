// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action listing command.

use std::fmt::Write as _;
use std::sync::Arc;

use flute::{
    ActionDefinition, ActionExecute, ActionPathResolver, FluteConfig, PathParamKind, TokenPolicy,
};

use crate::config::Config;
use crate::demo::{demo_registry, MemberStore};

/// Prints every registered action with its canonical URL.
pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    print!("{}", render(&config.flute)?);
    Ok(())
}

/// Formats the action table.
pub fn render(config: &FluteConfig) -> anyhow::Result<String> {
    let registry = demo_registry(config, Arc::new(MemberStore::with_samples()))?;
    let resolver = ActionPathResolver::new(Arc::new(registry.clone()), config.mapping.clone());

    let mut out = String::new();
    for definition in registry.definitions() {
        let url = resolver.resolve_action_path(definition.name())?;
        writeln!(out, "{:<28} {:<16} {}", definition.name(), url, describe(definition))?;
    }
    Ok(out)
}

fn describe(definition: &ActionDefinition) -> String {
    definition
        .executes()
        .iter()
        .map(|execute| describe_execute(execute))
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_execute(execute: &ActionExecute) -> String {
    let params: Vec<String> = execute
        .path_params()
        .iter()
        .map(|param| {
            let kind = match param.kind {
                PathParamKind::Text => "text",
                PathParamKind::Integer => "integer",
            };
            if param.optional {
                format!("{}?", kind)
            } else {
                kind.to_string()
            }
        })
        .collect();

    let mut flags = Vec::new();
    if execute.needs_form() {
        flags.push("form".to_string());
    }
    if execute.token_policy() != TokenPolicy::None {
        flags.push(format!("token:{:?}", execute.token_policy()));
    }
    if execute.is_allow_anyone_access() {
        flags.push("public".to_string());
    }

    let mut text = format!(
        "{}({})",
        execute.method_name().unwrap_or("index"),
        params.join(", ")
    );
    if !flags.is_empty() {
        text.push_str(&format!("[{}]", flags.join(",")));
    }
    text
}
