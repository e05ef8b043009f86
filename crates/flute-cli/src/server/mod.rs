// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server components.
//!
//! - `http`: axum adapter around [`flute::ActionRequestProcessor`]
//! - `session`: cookie-keyed in-memory session attributes

/// HTTP server implementation using Axum.
pub mod http;
/// In-memory session store.
pub mod session;
