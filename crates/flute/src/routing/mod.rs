// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! URL to action mapping.

pub mod mapping;
pub mod naming;
pub mod resolver;
pub mod url;

pub use mapping::{ActionFoundPath, ActionMappingFilter, MappingPathResource, RoutingParamPath};
pub use resolver::{ActionCandidate, ActionPathResolver, CandidateKind};
pub use url::UrlChain;
