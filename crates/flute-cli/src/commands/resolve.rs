// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action path explanation command.

use std::fmt::Write as _;
use std::sync::Arc;

use flute::{ActionPathResolver, FluteConfig, HandlerRegistry};

use crate::config::Config;
use crate::demo::{demo_registry, MemberStore};

/// Prints the candidates tried for `path` and the action it maps to.
pub async fn run(path: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    print!("{}", explain(&config.flute, path)?);
    Ok(())
}

/// Formats the resolution of `path` against the demo registry.
pub fn explain(config: &FluteConfig, path: &str) -> anyhow::Result<String> {
    let registry = Arc::new(demo_registry(config, Arc::new(MemberStore::with_samples()))?);
    let resolver = ActionPathResolver::new(registry.clone(), config.mapping.clone());

    let mut out = String::new();
    writeln!(out, "Path: {}", path)?;
    let resource = resolver.customize_action_mapping(path);
    if resource.is_filtered() {
        writeln!(out, "Mapped as: {}", resource.mapping_path())?;
    }

    writeln!(out, "Candidates:")?;
    for (i, candidate) in resolver.candidates(&resource).iter().enumerate() {
        let registered = registry.has_handler(&candidate.action_name)?;
        writeln!(
            out,
            "  {:>2}. {:<32} {:<14} params: '{}'{}",
            i + 1,
            candidate.action_name,
            format!("{:?}", candidate.kind),
            candidate.param_path,
            if registered { "  (registered)" } else { "" }
        )?;
    }

    match resolver.resolve(path) {
        Ok(Some(found)) => {
            let params = found.param_path.request_param_path();
            writeln!(out, "Resolved: {}", found.action_name)?;
            writeln!(out, "  parameter path: '{}'", params)?;
            if let Some(matched) = registry.find_handler_method(&found.action_name, params)? {
                writeln!(
                    out,
                    "  execute method: {}",
                    matched.execute.method_name().unwrap_or("index")
                )?;
            }
        }
        Ok(None) => writeln!(out, "Not handled")?,
        Err(e) => writeln!(out, "Configuration error: {}", e)?,
    }
    Ok(out)
}
