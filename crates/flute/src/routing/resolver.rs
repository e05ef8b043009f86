// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Forward (URL to registry key) and reverse (key to URL) action mapping.
//!
//! Forward mapping walks the path segments left to right and, at every
//! segment, tries a fixed list of registry keys built from the segments seen
//! so far. The first candidate that exists in the registry and accepts the
//! leftover parameter path wins.
//!
//! For `/sea/land/piari/` the candidates are, in order:
//!
//! | index | candidate                          | parameter path   |
//! |-------|------------------------------------|------------------|
//! | 0     | `seaAction`                        | `land/piari`     |
//! | 0     | `sea_seaAction`                    | `land/piari`     |
//! | 1     | `seaLandAction`                    | `piari`          |
//! | 1     | `sea_seaLandAction`                | `piari`          |
//! | 1     | `sea_landAction`                   | `piari`          |
//! | 1     | `sea_land_seaLandAction`           | `piari`          |
//! | 1     | `sea_land_landAction`              | `piari`          |
//! | 2     | `seaLandPiariAction`               |                  |
//! | 2     | `sea_seaLandPiariAction`           |                  |
//! | 2     | `sea_landPiariAction`              |                  |
//! | 2     | `sea_land_seaLandPiariAction`      |                  |
//! | 2     | `sea_land_piariAction`             |                  |
//! | 2     | `sea_land_piari_seaLandPiariAction`|                  |
//! | 2     | `sea_land_piari_piariAction`       |                  |
//! | -     | `rootAction`                       | `sea/land/piari` |
//!
//! Every package level is tried with the full class prefix first
//! (`sea::SeaLandPiariAction` style) and then with the short class part.
//!
//! A segment containing an upper-case character ends the search at that
//! index: upper case never names an action, so it can only be a parameter.
//! The root fallback is then skipped too.
//!
//! A name is tried again when it comes up with another parameter path:
//! `/sea/sea/` tries `sea_seaAction` with `sea` at index 0 and with an empty
//! parameter path at index 1.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::MappingConfig;
use crate::error::{FluteError, Result};
use crate::registry::HandlerRegistry;
use crate::routing::mapping::{
    split_segments, ActionFoundPath, ActionMappingFilter, MappingPathResource, RoutingParamPath,
};
use crate::routing::naming::{
    action_name_of_type, camel_concat, camelize_hyphens, has_upper_case, ComponentName,
};
use crate::routing::url::UrlChain;

/// How a candidate name was built from the segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// The root action for an empty path.
    Root,
    /// `s0Action`.
    Direct,
    /// All segments so far as package, the current one as class.
    WholePackage,
    /// Camel-case concatenation of all segments so far.
    ClassPrefix,
    /// A remembered package plus the camel-cased rest as class.
    MorePackage,
    /// The root action with the whole path as parameter path.
    RootFallback,
}

/// One registry key to try, with the parameter path it would leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCandidate {
    /// Registry key.
    pub action_name: String,
    /// Segments after the matched ones, joined with `/`.
    pub param_path: String,
    /// How the name was built.
    pub kind: CandidateKind,
}

/// Maps request paths to registry keys and back.
pub struct ActionPathResolver {
    registry: Arc<dyn HandlerRegistry>,
    config: MappingConfig,
    mapping_filter: Option<ActionMappingFilter>,
}

impl std::fmt::Debug for ActionPathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionPathResolver")
            .field("config", &self.config)
            .field("mapping_filter", &self.mapping_filter.is_some())
            .finish()
    }
}

impl ActionPathResolver {
    /// Creates a resolver over a read-only registry.
    pub fn new(registry: Arc<dyn HandlerRegistry>, config: MappingConfig) -> Self {
        Self {
            registry,
            config,
            mapping_filter: None,
        }
    }

    /// Installs the application's mapping filter.
    pub fn with_mapping_filter(mut self, filter: ActionMappingFilter) -> Self {
        self.mapping_filter = Some(filter);
        self
    }

    /// The registry consulted for candidates.
    pub fn registry(&self) -> &Arc<dyn HandlerRegistry> {
        &self.registry
    }

    /// The naming convention.
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Runs the mapping filter, if any, over the request path.
    pub fn customize_action_mapping(&self, request_path: &str) -> MappingPathResource {
        let resource = MappingPathResource::new(request_path);
        match &self.mapping_filter {
            Some(filter) => {
                let customized = filter(resource);
                if customized.is_filtered() {
                    debug!(
                        "Mapping path customized: {} -> {}",
                        customized.request_path(),
                        customized.mapping_path()
                    );
                }
                customized
            }
            None => resource,
        }
    }

    /// Lists the candidates for a resource in the order they are tried.
    pub fn candidates(&self, resource: &MappingPathResource) -> Vec<ActionCandidate> {
        let raw = resource.segments();
        let suffix = resource.action_name_suffix().unwrap_or("");
        let mut candidates = Vec::new();

        if raw.is_empty() {
            candidates.push(ActionCandidate {
                action_name: self.root_name(suffix),
                param_path: String::new(),
                kind: CandidateKind::Root,
            });
            return candidates;
        }

        let names: Vec<String> = raw
            .iter()
            .map(|s| {
                if resource.is_restful_mapping() {
                    camelize_hyphens(s)
                } else {
                    s.to_string()
                }
            })
            .collect();

        // (segment index, package key) in the order packages were seen
        let mut packages: Vec<(usize, String)> = Vec::new();

        for (index, segment) in raw.iter().enumerate() {
            if has_upper_case(segment) {
                debug!("Upper-case segment '{}' ends action search", segment);
                return candidates;
            }
            let param_path = raw[index + 1..].join("/");
            let mut push = |base: String, kind: CandidateKind| {
                let action_name = self.action_name(&base, suffix);
                if candidates
                    .iter()
                    .any(|c| c.action_name == action_name && c.param_path == param_path)
                {
                    return;
                }
                candidates.push(ActionCandidate {
                    action_name,
                    param_path: param_path.clone(),
                    kind,
                });
            };

            let current = &names[index];
            let delimiter = &self.config.package_delimiter;
            if index == 0 {
                push(current.clone(), CandidateKind::Direct);
                push(
                    format!("{}{}{}", current, delimiter, current),
                    CandidateKind::WholePackage,
                );
                packages.push((0, current.clone()));
                continue;
            }

            let class_prefix = camel_concat(&names[..=index]);
            push(class_prefix.clone(), CandidateKind::ClassPrefix);
            for (package_index, package) in &packages {
                push(
                    format!("{}{}{}", package, delimiter, class_prefix),
                    CandidateKind::MorePackage,
                );
                push(
                    format!(
                        "{}{}{}",
                        package,
                        delimiter,
                        camel_concat(&names[package_index + 1..=index])
                    ),
                    CandidateKind::MorePackage,
                );
            }
            let whole_package = names[..=index].join(delimiter);
            push(
                format!("{}{}{}", whole_package, delimiter, class_prefix),
                CandidateKind::WholePackage,
            );
            push(
                format!("{}{}{}", whole_package, delimiter, current),
                CandidateKind::WholePackage,
            );
            packages.push((index, whole_package));
        }

        candidates.push(ActionCandidate {
            action_name: self.root_name(suffix),
            param_path: raw.join("/"),
            kind: CandidateKind::RootFallback,
        });
        candidates
    }

    /// Resolves a request path to the first matching action.
    ///
    /// Returns `Ok(None)` when nothing matches; the caller decides between a
    /// 404 and passing the request on. A registry key whose declared type
    /// disagrees with the naming convention is an error.
    pub fn resolve(&self, request_path: &str) -> Result<Option<ActionFoundPath>> {
        let resource = self.customize_action_mapping(request_path);
        for candidate in self.candidates(&resource) {
            if self.is_hit(&candidate)? {
                debug!(
                    "Action found: {} -> {} (param path '{}', {:?})",
                    resource.mapping_path(),
                    candidate.action_name,
                    candidate.param_path,
                    candidate.kind
                );
                return Ok(Some(ActionFoundPath {
                    resource,
                    action_name: candidate.action_name,
                    param_path: RoutingParamPath::new(candidate.param_path),
                }));
            }
        }
        debug!("No action for {}", resource.mapping_path());
        Ok(None)
    }

    /// Resolves a request path and hands the result to `handler`.
    pub fn handle_action_path<T, F>(&self, request_path: &str, handler: F) -> Result<Option<T>>
    where
        F: FnOnce(ActionFoundPath) -> Result<T>,
    {
        match self.resolve(request_path)? {
            Some(found) => handler(found).map(Some),
            None => Ok(None),
        }
    }

    /// Canonical URL of an action: `sea_landPiariAction` gives
    /// `/sea/land/piari/`.
    pub fn resolve_action_path(&self, action_name: &str) -> Result<String> {
        if action_name == self.config.root_action {
            return Ok("/".to_string());
        }
        let component = ComponentName::parse(action_name, &self.config).ok_or_else(|| {
            FluteError::Configuration(format!(
                "'{}' is not an action name (expected suffix '{}')",
                action_name, self.config.action_suffix
            ))
        })?;
        let segments = component.url_segments();
        Ok(format!("/{}/", segments.join("/")))
    }

    /// Canonical URL of a declared type: `sea::SeaLandAction` gives
    /// `/sea/land/`.
    pub fn resolve_type_path(&self, type_name: &str) -> Result<String> {
        let action_name = action_name_of_type(type_name, &self.config).ok_or_else(|| {
            FluteError::Configuration(format!(
                "'{}' is not an action type (expected suffix '{}')",
                type_name, self.config.action_suffix
            ))
        })?;
        self.resolve_action_path(&action_name)
    }

    /// Canonical URL plus path parts, query and fragment.
    pub fn to_action_url(&self, action_name: &str, chain: &UrlChain) -> Result<String> {
        Ok(chain.append_to(&self.resolve_action_path(action_name)?))
    }

    fn is_hit(&self, candidate: &ActionCandidate) -> Result<bool> {
        let exists = match self.registry.has_handler(&candidate.action_name) {
            Ok(exists) => exists,
            Err(err) => {
                warn!("Action lookup failed for {}: {}", candidate.action_name, err);
                return Err(err);
            }
        };
        if !exists {
            return Ok(false);
        }
        if split_segments(&candidate.param_path).is_empty() {
            return Ok(true);
        }
        Ok(self
            .registry
            .find_handler_method(&candidate.action_name, &candidate.param_path)?
            .is_some())
    }

    fn action_name(&self, base: &str, suffix: &str) -> String {
        format!("{}{}{}", base, suffix, self.config.action_suffix)
    }

    fn root_name(&self, suffix: &str) -> String {
        let root = &self.config.root_action;
        let base = root
            .strip_suffix(self.config.action_suffix.as_str())
            .unwrap_or(root);
        self.action_name(base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::{ActionExecute, PathParamKind};
    use crate::registry::{ActionDefinition, ActionRegistry};
    use crate::response::ActionResponse;

    fn index() -> ActionExecute {
        ActionExecute::index(|_| Ok(ActionResponse::empty()))
    }

    fn index_with_param() -> ActionExecute {
        index().path_param(PathParamKind::Text)
    }

    fn resolver_with(definitions: Vec<ActionDefinition>) -> ActionPathResolver {
        let mut registry = ActionRegistry::new(MappingConfig::default());
        for definition in definitions {
            registry.register(definition).unwrap();
        }
        ActionPathResolver::new(Arc::new(registry), MappingConfig::default())
    }

    fn found(resolver: &ActionPathResolver, path: &str) -> Option<(String, String)> {
        resolver.resolve(path).unwrap().map(|f| {
            (
                f.action_name,
                f.param_path.request_param_path().to_string(),
            )
        })
    }

    fn names(resolver: &ActionPathResolver, path: &str) -> Vec<String> {
        resolver
            .candidates(&MappingPathResource::new(path))
            .into_iter()
            .map(|c| c.action_name)
            .collect()
    }

    #[test]
    fn test_candidates_zero_segments() {
        let resolver = resolver_with(vec![]);
        assert_eq!(names(&resolver, "/"), vec!["rootAction"]);
        assert_eq!(names(&resolver, ""), vec!["rootAction"]);
    }

    #[test]
    fn test_candidates_one_segment() {
        let resolver = resolver_with(vec![]);
        assert_eq!(
            names(&resolver, "/member/"),
            vec!["memberAction", "member_memberAction", "rootAction"]
        );
    }

    #[test]
    fn test_candidates_two_segments() {
        let resolver = resolver_with(vec![]);
        assert_eq!(
            names(&resolver, "/sea/land/"),
            vec![
                "seaAction",
                "sea_seaAction",
                "seaLandAction",
                "sea_seaLandAction",
                "sea_landAction",
                "sea_land_seaLandAction",
                "sea_land_landAction",
                "rootAction",
            ]
        );
    }

    #[test]
    fn test_candidates_three_segments() {
        let resolver = resolver_with(vec![]);
        let candidates = resolver.candidates(&MappingPathResource::new("/sea/land/piari/"));
        let table: Vec<(&str, &str, CandidateKind)> = candidates
            .iter()
            .map(|c| (c.action_name.as_str(), c.param_path.as_str(), c.kind))
            .collect();
        assert_eq!(
            table,
            vec![
                ("seaAction", "land/piari", CandidateKind::Direct),
                ("sea_seaAction", "land/piari", CandidateKind::WholePackage),
                ("seaLandAction", "piari", CandidateKind::ClassPrefix),
                ("sea_seaLandAction", "piari", CandidateKind::MorePackage),
                ("sea_landAction", "piari", CandidateKind::MorePackage),
                ("sea_land_seaLandAction", "piari", CandidateKind::WholePackage),
                ("sea_land_landAction", "piari", CandidateKind::WholePackage),
                ("seaLandPiariAction", "", CandidateKind::ClassPrefix),
                ("sea_seaLandPiariAction", "", CandidateKind::MorePackage),
                ("sea_landPiariAction", "", CandidateKind::MorePackage),
                ("sea_land_seaLandPiariAction", "", CandidateKind::MorePackage),
                ("sea_land_piariAction", "", CandidateKind::MorePackage),
                ("sea_land_piari_seaLandPiariAction", "", CandidateKind::WholePackage),
                ("sea_land_piari_piariAction", "", CandidateKind::WholePackage),
                ("rootAction", "sea/land/piari", CandidateKind::RootFallback),
            ]
        );
    }

    #[test]
    fn test_candidates_repeated_segment() {
        let resolver = resolver_with(vec![]);
        let candidates = resolver.candidates(&MappingPathResource::new("/sea/sea/"));
        let table: Vec<(&str, &str)> = candidates
            .iter()
            .map(|c| (c.action_name.as_str(), c.param_path.as_str()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("seaAction", "sea"),
                ("sea_seaAction", "sea"),
                ("seaSeaAction", ""),
                ("sea_seaSeaAction", ""),
                ("sea_seaAction", ""),
                ("sea_sea_seaSeaAction", ""),
                ("sea_sea_seaAction", ""),
                ("rootAction", "sea/sea"),
            ]
        );
    }

    #[test]
    fn test_repeated_name_with_shorter_param_path_resolves() {
        let resolver = resolver_with(vec![ActionDefinition::new("sea_seaAction").execute(index())]);
        assert_eq!(
            found(&resolver, "/sea/sea/"),
            Some(("sea_seaAction".to_string(), String::new()))
        );
    }

    #[test]
    fn test_candidates_four_segments_count() {
        let resolver = resolver_with(vec![]);
        let all = names(&resolver, "/a/b/c/d/");
        // 2 + 5 + 7 + 9 + root
        assert_eq!(all.len(), 24);
        assert_eq!(all[14], "aBCDAction");
        assert_eq!(all[15], "a_aBCDAction");
        assert_eq!(all[16], "a_bCDAction");
        assert_eq!(all[17], "a_b_aBCDAction");
        assert_eq!(all[18], "a_b_cDAction");
        assert_eq!(all[21], "a_b_c_d_aBCDAction");
        assert_eq!(all[22], "a_b_c_d_dAction");
        assert_eq!(all[23], "rootAction");
    }

    #[test]
    fn test_full_class_prefix_before_short_class() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("member_editAction").execute(index()),
            ActionDefinition::new("member_memberEditAction")
                .declared_as("member::MemberEditAction")
                .execute(index()),
        ]);
        assert_eq!(
            found(&resolver, "/member/edit/").map(|f| f.0),
            Some("member_memberEditAction".to_string())
        );
    }

    #[test]
    fn test_root_scenario() {
        let resolver = resolver_with(vec![ActionDefinition::new("rootAction").execute(index())]);
        assert_eq!(
            found(&resolver, "/"),
            Some(("rootAction".to_string(), String::new()))
        );
    }

    #[test]
    fn test_member_with_param_scenario() {
        let resolver = resolver_with(vec![ActionDefinition::new("memberAction")
            .execute(index().path_param(PathParamKind::Integer))]);
        assert_eq!(
            found(&resolver, "/member/3/"),
            Some(("memberAction".to_string(), "3".to_string()))
        );
    }

    #[test]
    fn test_shorter_candidate_wins() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("sea_landAction").execute(index()),
            ActionDefinition::new("seaLandAction").execute(index()),
        ]);
        assert_eq!(
            found(&resolver, "/sea/land/"),
            Some(("seaLandAction".to_string(), String::new()))
        );
    }

    #[test]
    fn test_more_package_before_whole_package() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("sea_land_landAction").execute(index()),
            ActionDefinition::new("sea_landAction").execute(index()),
        ]);
        assert_eq!(
            found(&resolver, "/sea/land/").map(|f| f.0),
            Some("sea_landAction".to_string())
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("seaAction").execute(index_with_param()),
            ActionDefinition::new("seaLandAction").execute(index()),
            ActionDefinition::new("rootAction").execute(index()),
        ]);
        let first = found(&resolver, "/sea/land/");
        for _ in 0..10 {
            assert_eq!(found(&resolver, "/sea/land/"), first);
        }
        // seaAction accepts one parameter, so it wins at index 0
        assert_eq!(first, Some(("seaAction".to_string(), "land".to_string())));
    }

    #[test]
    fn test_upper_case_segment_never_resolves() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("SeaAction").execute(index_with_param()),
            ActionDefinition::new("seaAction").execute(index_with_param()),
            ActionDefinition::new("seaLandAction").execute(index()),
            ActionDefinition::new("rootAction").execute(index().path_param(PathParamKind::Text).path_param(PathParamKind::Text)),
        ]);
        assert_eq!(found(&resolver, "/Sea/land/"), None);
        assert!(names(&resolver, "/Sea/land/").is_empty());
    }

    #[test]
    fn test_upper_case_segment_after_index_zero_suppresses_root_fallback() {
        let two_text_params = index()
            .path_param(PathParamKind::Text)
            .path_param(PathParamKind::Text);
        let resolver = resolver_with(vec![
            ActionDefinition::new("seaAction").execute(index()),
            ActionDefinition::new("rootAction").execute(two_text_params),
        ]);
        assert_eq!(
            names(&resolver, "/sea/Land/"),
            vec!["seaAction", "sea_seaAction"]
        );
        assert_eq!(found(&resolver, "/sea/Land/"), None);

        let resolver = resolver_with(vec![
            ActionDefinition::new("seaAction").execute(index_with_param()),
            ActionDefinition::new("rootAction").execute(
                index()
                    .path_param(PathParamKind::Text)
                    .path_param(PathParamKind::Text),
            ),
        ]);
        assert_eq!(
            found(&resolver, "/sea/Land/"),
            Some(("seaAction".to_string(), "Land".to_string()))
        );
    }

    #[test]
    fn test_upper_case_parameter_after_match() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("productAction").execute(index_with_param()),
        ]);
        assert_eq!(
            found(&resolver, "/product/ABC-1/"),
            Some(("productAction".to_string(), "ABC-1".to_string()))
        );
    }

    #[test]
    fn test_registered_name_without_accepting_method_is_skipped() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("memberAction").execute(index()),
            ActionDefinition::new("member_memberAction").execute(index_with_param()),
        ]);
        assert_eq!(
            found(&resolver, "/member/3/"),
            Some(("member_memberAction".to_string(), "3".to_string()))
        );
    }

    #[test]
    fn test_root_fallback_is_last() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("rootAction").execute(
                ActionExecute::named("list", |_| Ok(ActionResponse::empty())),
            ),
            ActionDefinition::new("memberListAction").execute(index()),
        ]);
        assert_eq!(
            found(&resolver, "/member/list/"),
            Some(("memberListAction".to_string(), String::new()))
        );

        let resolver = resolver_with(vec![ActionDefinition::new("rootAction").execute(
            ActionExecute::named("member", |_| Ok(ActionResponse::empty()))
                .path_param(PathParamKind::Text),
        )]);
        let candidates = names(&resolver, "/member/list/");
        assert_eq!(candidates.last().map(String::as_str), Some("rootAction"));
        assert_eq!(
            found(&resolver, "/member/list/"),
            Some(("rootAction".to_string(), "member/list".to_string()))
        );
    }

    #[test]
    fn test_no_candidate_hits() {
        let resolver = resolver_with(vec![ActionDefinition::new("productAction").execute(index())]);
        assert_eq!(found(&resolver, "/member/"), None);
        // productAction takes no parameters
        assert_eq!(found(&resolver, "/product/3/"), None);
    }

    #[test]
    fn test_naming_mismatch_is_configuration_error() {
        let resolver = resolver_with(vec![ActionDefinition::new("sea_landAction")
            .declared_as("sea::SeaLandAction")
            .execute(index())]);
        let err = resolver.resolve("/sea/land/").unwrap_err();
        match err {
            FluteError::ActionNaming { suggestions, .. } => {
                assert!(suggestions.contains(&"sea_seaLandAction".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_action_name_suffix_filter() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("productListAction").execute(index()),
            ActionDefinition::new("productListSpAction").execute(index()),
        ])
        .with_mapping_filter(Arc::new(|resource: MappingPathResource| {
            let rest = resource.request_path().strip_prefix("/sp").map(str::to_string);
            match rest {
                Some(rest) => resource.with_mapping_path(rest).with_action_name_suffix("Sp"),
                None => resource,
            }
        }));
        assert_eq!(
            found(&resolver, "/sp/product/list/").map(|f| f.0),
            Some("productListSpAction".to_string())
        );
        assert_eq!(
            found(&resolver, "/product/list/").map(|f| f.0),
            Some("productListAction".to_string())
        );
    }

    #[test]
    fn test_restful_mapping() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("balletDancersAction").execute(index_with_param()),
        ])
        .with_mapping_filter(Arc::new(|resource: MappingPathResource| resource.as_restful()));
        assert_eq!(
            found(&resolver, "/ballet-dancers/7/"),
            Some(("balletDancersAction".to_string(), "7".to_string()))
        );
    }

    #[test]
    fn test_reverse_mapping() {
        let resolver = resolver_with(vec![]);
        assert_eq!(resolver.resolve_action_path("rootAction").unwrap(), "/");
        assert_eq!(
            resolver.resolve_action_path("productListAction").unwrap(),
            "/product/list/"
        );
        assert_eq!(
            resolver.resolve_action_path("sea_landPiariAction").unwrap(),
            "/sea/land/piari/"
        );
        assert_eq!(
            resolver.resolve_action_path("sea_seaLandAction").unwrap(),
            "/sea/land/"
        );
        assert_eq!(
            resolver.resolve_type_path("member::MemberEditAction").unwrap(),
            "/member/edit/"
        );
        assert!(resolver.resolve_action_path("productList").is_err());
    }

    #[test]
    fn test_round_trip() {
        let resolver = resolver_with(vec![
            ActionDefinition::new("productListAction").execute(index()),
            ActionDefinition::new("sea_landPiariAction").execute(index()),
            ActionDefinition::new("member_memberEditAction").execute(index()),
        ]);
        for path in ["/product/list/", "/sea/land/piari/", "/member/edit/"] {
            let (action_name, _) = found(&resolver, path).unwrap();
            let reversed = resolver.resolve_action_path(&action_name).unwrap();
            assert_eq!(found(&resolver, &reversed).map(|f| f.0), Some(action_name));
        }
    }

    #[test]
    fn test_to_action_url() {
        let resolver = resolver_with(vec![]);
        let chain = UrlChain::new().more_url([3]).param("tab", "orders").hash("top");
        assert_eq!(
            resolver.to_action_url("memberAction", &chain).unwrap(),
            "/member/3/?tab=orders#top"
        );
    }

    #[test]
    fn test_handle_action_path() {
        let resolver = resolver_with(vec![ActionDefinition::new("memberAction").execute(index())]);
        let handled = resolver
            .handle_action_path("/member/", |found| Ok(found.action_name.len()))
            .unwrap();
        assert_eq!(handled, Some("memberAction".len()));
        let missed = resolver
            .handle_action_path("/nothing/", |_| Ok(1))
            .unwrap();
        assert_eq!(missed, None);
    }
}
