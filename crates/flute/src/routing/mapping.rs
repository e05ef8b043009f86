// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Value objects describing a mapping attempt and its result.

use std::sync::Arc;

use crate::error::{FluteError, Result};

/// Application hook that rewrites the request path before resolution.
///
/// Typical uses: strip a language prefix, add an action-name suffix for a
/// device variant, or switch on restful (hyphenated) segment naming.
pub type ActionMappingFilter =
    Arc<dyn Fn(MappingPathResource) -> MappingPathResource + Send + Sync>;

/// The request path and the path actually used for mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPathResource {
    request_path: String,
    mapping_path: String,
    action_name_suffix: Option<String>,
    restful_mapping: bool,
}

impl MappingPathResource {
    /// Creates an unfiltered resource; the mapping path equals the request path.
    pub fn new(request_path: impl Into<String>) -> Self {
        let request_path = request_path.into();
        Self {
            mapping_path: request_path.clone(),
            request_path,
            action_name_suffix: None,
            restful_mapping: false,
        }
    }

    /// Replaces the mapping path.
    pub fn with_mapping_path(mut self, mapping_path: impl Into<String>) -> Self {
        self.mapping_path = mapping_path.into();
        self
    }

    /// Sets a suffix inserted before `Action` in every candidate name
    /// (`productList` + `Sp` gives `productListSpAction`).
    pub fn with_action_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.action_name_suffix = Some(suffix.into());
        self
    }

    /// Treats hyphenated segments as camel-case name parts.
    pub fn as_restful(mut self) -> Self {
        self.restful_mapping = true;
        self
    }

    /// The raw incoming path.
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// The path used for resolution.
    pub fn mapping_path(&self) -> &str {
        &self.mapping_path
    }

    /// Suffix inserted before `Action`, if any.
    pub fn action_name_suffix(&self) -> Option<&str> {
        self.action_name_suffix.as_deref()
    }

    /// Returns true if hyphenated segments are camel-cased.
    pub fn is_restful_mapping(&self) -> bool {
        self.restful_mapping
    }

    /// Returns true if a filter changed the mapping path.
    pub fn is_filtered(&self) -> bool {
        self.request_path != self.mapping_path
    }

    /// Non-empty path segments of the mapping path.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.mapping_path)
    }
}

/// Splits a path on `/`, collapsing empty segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Segments left over after the action name matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingParamPath {
    request_param_path: String,
    mapping_param_path: Option<String>,
}

impl RoutingParamPath {
    /// Creates a parameter path (`"list/3"`, or empty).
    pub fn new(request_param_path: impl Into<String>) -> Self {
        Self {
            request_param_path: request_param_path.into(),
            mapping_param_path: None,
        }
    }

    /// The leftover path as resolved.
    pub fn request_param_path(&self) -> &str {
        &self.request_param_path
    }

    /// The leftover path after the execute method consumed its name, if it did.
    pub fn mapping_param_path(&self) -> Option<&str> {
        self.mapping_param_path.as_deref()
    }

    /// Sets the mapping parameter path; it can be set only once.
    pub fn accept_mapping_param_path(&mut self, path: impl Into<String>) -> Result<()> {
        if let Some(existing) = &self.mapping_param_path {
            return Err(FluteError::contract(format!(
                "mapping param path is already set to '{}'",
                existing
            )));
        }
        self.mapping_param_path = Some(path.into());
        Ok(())
    }

    /// The path that method arguments are parsed from.
    pub fn effective(&self) -> &str {
        self.mapping_param_path
            .as_deref()
            .unwrap_or(&self.request_param_path)
    }

    /// Returns true if no segments are left for the request.
    pub fn is_empty(&self) -> bool {
        self.request_param_path.is_empty()
    }

    /// Segments of the effective path.
    pub fn segments(&self) -> Vec<String> {
        split_segments(self.effective())
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// A successful forward mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFoundPath {
    /// The (possibly filtered) resource the mapping ran on.
    pub resource: MappingPathResource,
    /// Registry key of the matched action.
    pub action_name: String,
    /// Leftover parameter path.
    pub param_path: RoutingParamPath,
}
