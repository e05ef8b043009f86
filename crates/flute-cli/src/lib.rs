// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! flute CLI library.
//!
//! This crate provides the `flute` binary: a development server that drives
//! [`flute::ActionRequestProcessor`] behind axum, plus commands that explain
//! how request paths map to actions.
//!
//! # Usage
//!
//! ```bash
//! flute serve                      # Start the development server
//! flute routes                     # List actions and their URLs
//! flute resolve /member/edit/3/    # Explain one request path
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `flute.toml` at the project root.

/// CLI commands (serve, routes, resolve).
pub mod commands;
/// Project configuration from `flute.toml`.
pub mod config;
/// Demo application wired into the commands.
pub mod demo;
/// Development server.
pub mod server;
