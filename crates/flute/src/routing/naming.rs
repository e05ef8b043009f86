// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Naming convention between URL segments, registry keys and type names.
//!
//! A registry key is `<package>_<package>_<class>Action`, where the class part
//! is camel-cased (`sea_landPiariAction`). A declared type name is a `::`
//! path relative to the application's action root
//! (`sea::SeaLandPiariAction`).

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::MappingConfig;

lazy_static! {
    static ref LOWER_UPPER: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref ACRONYM_END: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
}

/// Returns true if the segment contains an upper-case character.
pub fn has_upper_case(segment: &str) -> bool {
    segment.chars().any(|c| c.is_uppercase())
}

/// Upper-cases the first character.
pub fn init_cap(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
pub fn init_uncap(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a hyphenated segment (`ballet-dancers`) into `balletDancers`.
pub fn camelize_hyphens(segment: &str) -> String {
    let mut parts = segment.split('-').filter(|p| !p.is_empty());
    let mut result = parts.next().unwrap_or("").to_string();
    for part in parts {
        result.push_str(&init_cap(part));
    }
    result
}

/// Camel-case concatenation: `["sea", "land"]` becomes `seaLand`.
pub fn camel_concat<S: AsRef<str>>(segments: &[S]) -> String {
    let mut result = String::new();
    for (index, segment) in segments.iter().enumerate() {
        if index == 0 {
            result.push_str(segment.as_ref());
        } else {
            result.push_str(&init_cap(segment.as_ref()));
        }
    }
    result
}

/// Splits a camel-case name into lower-case words: `seaLandPiari` becomes
/// `["sea", "land", "piari"]`, `loadCSVFile` becomes `["load", "csv", "file"]`.
pub fn decamelize(name: &str) -> Vec<String> {
    let spaced = ACRONYM_END.replace_all(name, "$1/$2");
    let spaced = LOWER_UPPER.replace_all(&spaced, "$1/$2");
    spaced
        .split('/')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// A registry key split into package segments and class part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentName {
    /// Package segments (may be empty).
    pub packages: Vec<String>,
    /// Camel-case class part without the suffix (e.g. `landPiari`).
    pub class_part: String,
}

impl ComponentName {
    /// Parses `sea_landPiariAction`; returns `None` when the suffix is missing.
    pub fn parse(action_name: &str, config: &MappingConfig) -> Option<Self> {
        let base = action_name.strip_suffix(config.action_suffix.as_str())?;
        if base.is_empty() {
            return None;
        }
        let mut parts: Vec<String> = base
            .split(config.package_delimiter.as_str())
            .map(|s| s.to_string())
            .collect();
        let class_part = parts.pop().filter(|c| !c.is_empty())?;
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self {
            packages: parts,
            class_part,
        })
    }

    /// Builds the registry key back.
    pub fn to_action_name(&self, config: &MappingConfig) -> String {
        let mut name = String::new();
        for package in &self.packages {
            name.push_str(package);
            name.push_str(&config.package_delimiter);
        }
        name.push_str(&self.class_part);
        name.push_str(&config.action_suffix);
        name
    }

    /// URL segments for this component, merging package segments that the
    /// class part repeats (`sea` + `seaLand` gives `sea/land`).
    pub fn url_segments(&self) -> Vec<String> {
        let class_words = decamelize(&self.class_part);
        let max_overlap = self.packages.len().min(class_words.len());
        let overlap = (0..=max_overlap)
            .rev()
            .find(|&n| self.packages[self.packages.len() - n..] == class_words[..n])
            .unwrap_or(0);
        let mut segments = self.packages.clone();
        segments.extend(class_words.into_iter().skip(overlap));
        segments
    }
}

/// Derives the registry key implied by a declared type name:
/// `sea::SeaLandAction` becomes `sea_seaLandAction`.
pub fn action_name_of_type(type_name: &str, config: &MappingConfig) -> Option<String> {
    let mut parts: Vec<&str> = type_name.split("::").filter(|p| !p.is_empty()).collect();
    let class = parts.pop()?;
    if !class.ends_with(config.action_suffix.as_str()) {
        return None;
    }
    let mut name = String::new();
    for package in parts {
        name.push_str(package);
        name.push_str(&config.package_delimiter);
    }
    name.push_str(&init_uncap(class));
    Some(name)
}

/// Best-effort list of registry keys the developer probably meant.
///
/// Used only for the configuration error message, never for control flow.
pub fn naming_suggestions(action_name: &str, type_name: &str, config: &MappingConfig) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(implied) = action_name_of_type(type_name, config) {
        suggestions.push(implied);
    }
    let class = type_name.rsplit("::").next().unwrap_or(type_name);
    if class.ends_with(config.action_suffix.as_str()) {
        suggestions.push(init_uncap(class));
    }
    if let Some(component) = ComponentName::parse(action_name, config) {
        let segments = component.url_segments();
        if let Some(last) = segments.last() {
            let whole = ComponentName {
                packages: segments.clone(),
                class_part: last.clone(),
            };
            suggestions.push(whole.to_action_name(config));
            let flat = ComponentName {
                packages: Vec::new(),
                class_part: camel_concat(&segments),
            };
            suggestions.push(flat.to_action_name(config));
        }
    }
    let mut unique: Vec<String> = Vec::new();
    for suggestion in suggestions {
        if suggestion != action_name && !unique.contains(&suggestion) {
            unique.push(suggestion);
        }
    }
    unique
}
