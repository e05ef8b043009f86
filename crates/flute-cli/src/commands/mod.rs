// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `serve`: Run the development server
//! - `routes`: List registered actions with their URLs
//! - `resolve`: Explain how a request path maps to an action

/// Action path explanation command.
pub mod resolve;
/// Action listing command.
pub mod routes;
/// Development server command.
pub mod serve;
