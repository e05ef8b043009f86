// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Reflecting a decided response onto the HTTP output.
//!
//! Body responses (JSON, XML, stream, empty) are written here and leave
//! nothing for the processor to do. HTML responses become a
//! [`NextJourney`]: a redirect the processor sends, or a forward the
//! [`HtmlRenderer`] renders.

use tracing::debug;

use crate::context::{RequestContext, ResponseOutput};
use crate::error::{FluteError, Result};
use crate::response::{ActionResponse, ResponseMeta};
use crate::runtime::ActionRuntime;

/// Routing decision computed from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextJourney {
    /// Render an HTML view.
    Forward(String),
    /// Redirect to a URL.
    Redirect(String),
    /// Already written (or nothing to do).
    Undefined,
}

impl NextJourney {
    /// Returns true unless undefined.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

/// Computes the routing decision for the runtime's response.
pub trait ResponseReflector: Send + Sync {
    /// Applies the response to the output and returns what is left to do.
    fn reflect(&self, runtime: &mut ActionRuntime, ctx: &mut RequestContext) -> Result<NextJourney>;
}

/// Renders forwarded HTML views; template engines plug in here.
pub trait HtmlRenderer: Send + Sync {
    /// Renders the view at `path` with the runtime's display data.
    fn render(&self, path: &str, runtime: &ActionRuntime, ctx: &mut RequestContext) -> Result<()>;
}

/// The standard reflector.
#[derive(Debug, Clone, Default)]
pub struct ActionResponseReflector;

impl ActionResponseReflector {
    /// Creates the reflector.
    pub fn new() -> Self {
        Self
    }
}

impl ResponseReflector for ActionResponseReflector {
    fn reflect(&self, runtime: &mut ActionRuntime, ctx: &mut RequestContext) -> Result<NextJourney> {
        let output = &mut ctx.output;
        if let Some(meta) = runtime.response().meta() {
            apply_meta(meta, output);
        }
        let mut render_data = Vec::new();
        let journey = match runtime.response() {
            ActionResponse::Undefined => {
                return Err(FluteError::contract(format!(
                    "cannot reflect an undefined response for {}",
                    runtime.action_name()
                )))
            }
            ActionResponse::Empty(_) => {
                output.write_body("text/plain; charset=UTF-8", Vec::new());
                NextJourney::Undefined
            }
            ActionResponse::Html(html) => {
                render_data.extend(html.render_data().iter().cloned());
                if html.is_redirect() {
                    NextJourney::Redirect(html.routing_path().to_string())
                } else {
                    NextJourney::Forward(html.routing_path().to_string())
                }
            }
            ActionResponse::Json(json) => {
                let body = serde_json::to_vec(json.payload())
                    .map_err(|e| FluteError::Render(e.to_string()))?;
                output.write_body("application/json; charset=UTF-8", body);
                NextJourney::Undefined
            }
            ActionResponse::Xml(xml) => {
                let content_type = format!("application/xml; charset={}", xml.charset());
                output.write_body(&content_type, xml.xml().as_bytes().to_vec());
                NextJourney::Undefined
            }
            ActionResponse::Stream(stream) => {
                if let Some(file_name) = stream.file_name() {
                    output.add_header(
                        "Content-Disposition",
                        format!("attachment; filename=\"{}\"", file_name),
                    );
                }
                output.write_body(stream.content_type(), stream.data().to_vec());
                NextJourney::Undefined
            }
        };
        for (key, value) in render_data {
            runtime.register_data(key, value);
        }
        debug!("Reflected {} -> {:?}", runtime.response().kind(), journey);
        Ok(journey)
    }
}

fn apply_meta(meta: &ResponseMeta, output: &mut ResponseOutput) {
    if let Some(status) = meta.http_status() {
        output.set_status(status);
    }
    for (name, values) in meta.headers() {
        for value in values {
            output.add_header(name.clone(), value.clone());
        }
    }
}
