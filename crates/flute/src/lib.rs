// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]
// FluteError carries naming suggestions and validation hooks
#![allow(clippy::result_large_err)]

//! # Flute
//!
//! Request dispatch core of a server-side MVC web framework.
//!
//! Flute maps request paths to registered actions by naming convention,
//! runs the selected handler inside a fixed lifecycle (hooks, transaction,
//! validation, failure translation) and reflects the handler's response
//! onto the HTTP output.
//!
//! ## Features
//!
//! - Convention-based URL mapping (`/member/edit/3/` to
//!   `member_memberEditAction`) and reverse mapping with [`UrlChain`]
//! - Prologue, before, monologue, finally and epilogue hooks
//! - Validation failures that always roll back
//! - HTML, redirect, JSON, XML, stream and empty responses
//! - Double-submit tokens and typical login/error handling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flute::*;
//!
//! let mut registry = ActionRegistry::new(MappingConfig::default());
//! registry.register(
//!     ActionDefinition::new("memberAction").execute(
//!         ActionExecute::index(|args| {
//!             let id: i64 = args.path_param(0)?;
//!             Ok(ActionResponse::json(serde_json::json!({ "id": id })))
//!         })
//!         .path_param(PathParamKind::Integer),
//!     ),
//! )?;
//!
//! let processor = ActionRequestProcessor::builder()
//!     .registry(Arc::new(registry))
//!     .renderer(Arc::new(my_renderer))
//!     .build()?;
//!
//! let mut ctx = RequestContext::new(ActionRequest::new("/member/3/", "GET"));
//! processor.process(&mut ctx)?;
//! ```

/// Request execution state machine.
pub mod action;
/// Framework configuration.
pub mod config;
/// Request context and response output.
pub mod context;
/// Error types.
pub mod error;
/// Execute methods and handler arguments.
pub mod execute;
/// Form population.
pub mod form;
/// Lifecycle hooks.
pub mod hook;
/// Ordered user messages.
pub mod messages;
/// Top-level request processing.
pub mod processor;
/// Response reflection and rendering.
pub mod reflect;
/// Action registry.
pub mod registry;
/// HTTP request abstraction.
pub mod request;
/// Response variants.
pub mod response;
/// URL mapping.
pub mod routing;
/// Per-request runtime state.
pub mod runtime;
/// Double-submit tokens.
pub mod token;
/// Transaction boundary.
pub mod transaction;
/// Validation failures.
pub mod validation;

pub use action::{ActionAssistant, ActionState, ExecuteTransactionResult, GodHandableAction};
pub use config::{ErrorConfig, FluteConfig, MappingConfig, TokenConfig};
pub use context::{RequestCache, RequestContext, RequestScope, ResponseOutput};
pub use error::{ApplicationError, FluteError, PersistenceError, Result};
pub use execute::{ActionArgs, ActionExecute, ActionFn, PathParamKind, PathParamSpec};
pub use form::{ActionForm, FormBinder, RequestFormBinder};
pub use hook::typical::{
    AttributeLoginManager, ExceptionTranslator, LoginManager, TypicalExceptionTranslator,
    TypicalGodHand, LOGIN_USER_ATTRIBUTE,
};
pub use hook::{ActionCallback, ActionHookChain, GodHand, HookStage};
pub use messages::{ActionMessage, ActionMessages};
pub use processor::{ActionReport, ActionRequestProcessor, ActionRequestProcessorBuilder, ProcessOutcome};
pub use reflect::{ActionResponseReflector, HtmlRenderer, NextJourney, ResponseReflector};
pub use registry::{ActionDefinition, ActionInstance, ActionRegistry, ExecuteMatch, HandlerRegistry};
pub use request::ActionRequest;
pub use response::{
    ActionResponse, EmptyResponse, HtmlResponse, JsonResponse, ResponseMeta, StreamResponse,
    XmlResponse,
};
pub use routing::{
    ActionCandidate, ActionFoundPath, ActionMappingFilter, ActionPathResolver, CandidateKind,
    MappingPathResource, RoutingParamPath, UrlChain,
};
pub use runtime::ActionRuntime;
pub use token::{DoubleSubmitManager, TokenPolicy};
pub use transaction::{
    InMemoryTransactionStage, NoTransactionStage, TransactionEvent, TransactionGenre,
    TransactionScope, TransactionStage,
};
pub use validation::ValidationFailure;
