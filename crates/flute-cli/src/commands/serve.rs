// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server command.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::demo::demo_processor;
use crate::server::http::{create_router, AppState};
use crate::server::session::SessionStore;

/// Runs the development server for the demo application.
///
/// `host` and `port` override the `[server]` table of `flute.toml`.
pub async fn run(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let processor = demo_processor(&config.flute)?;
    let sessions = SessionStore::new(
        Duration::from_secs(config.server.session_idle_minutes * 60),
        config.server.max_sessions,
    );
    let state = Arc::new(AppState::new(processor).with_sessions(sessions));
    let public_dir = std::env::current_dir()?.join(&config.server.public_dir);
    let app = create_router(state, &public_dir);

    let addr = format!("{}:{}", host, port);
    println!("flute server running at http://{}", addr);
    println!("Serving static files from {}", public_dir.display());
    println!("Press Ctrl+C to stop");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
