// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the flute action pipeline.
//!
//! This module defines [`FluteError`], the main error enum, together with the
//! application-level and persistence-level error kinds that the monologue
//! hook knows how to translate.
//!
//! # Error Categories
//!
//! - **Configuration errors**: action naming does not match the registered type
//! - **Validation errors**: expected, always roll back, answered by an error hook
//! - **Application errors**: business-rule failures translated by the monologue
//! - **Contract violations**: handler or hook code broke a pipeline rule
//! - **Unexpected errors**: everything else, propagated after the finally hooks
//!
//! A routing miss is not an error: resolution reports "not handled" instead.

use std::fmt;
use thiserror::Error;

use crate::validation::ValidationFailure;

/// Business-rule failures raised by handler code.
///
/// These are expected outcomes: the typical monologue hook turns each of them
/// into a normal response (a redirect to the login action or a forward to the
/// error page) instead of letting them surface as a server fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The action requires a logged-in user and there is none.
    #[error("Login required")]
    LoginRequired,

    /// The login session expired between requests.
    #[error("Login session timed out")]
    LoginTimeout,

    /// The entity was deleted by someone else.
    #[error("Entity already deleted")]
    EntityAlreadyDeleted,

    /// The entity was updated by someone else (optimistic lock).
    #[error("Entity already updated")]
    EntityAlreadyUpdated,

    /// An entity with the same unique key already exists.
    #[error("Entity already exists")]
    EntityAlreadyExists,

    /// The double-submit token did not match.
    #[error("Double submitted request")]
    DoubleSubmitted,

    /// Any other business rule, identified by its message key.
    #[error("Business rule violated: {message_key}")]
    Business {
        /// Message key shown on the error page.
        message_key: String,
    },
}

impl ApplicationError {
    /// Returns the message key shown to the user for this error.
    pub fn message_key(&self) -> &str {
        match self {
            Self::LoginRequired => "errors.login.required",
            Self::LoginTimeout => "errors.login.timeout",
            Self::EntityAlreadyDeleted => "errors.app.already.deleted",
            Self::EntityAlreadyUpdated => "errors.app.already.updated",
            Self::EntityAlreadyExists => "errors.app.already.exists",
            Self::DoubleSubmitted => "errors.app.double.submit.request",
            Self::Business { message_key } => message_key,
        }
    }

    /// Returns true for the login-related kinds.
    pub fn is_login_failure(&self) -> bool {
        matches!(self, Self::LoginRequired | Self::LoginTimeout)
    }
}

/// Low-level persistence failures, mapped onto [`ApplicationError`] by the
/// exception translator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Update count was zero for a versioned update.
    #[error("Optimistic lock failure")]
    OptimisticLock,

    /// A row selected for update was not found.
    #[error("No row found")]
    NoRowFound,

    /// A unique constraint was violated.
    #[error("Duplicate key")]
    DuplicateKey,

    /// Anything else the data layer reported.
    #[error("Persistence failure: {0}")]
    Other(String),
}

/// The main error type for flute operations.
#[derive(Error, Debug)]
pub enum FluteError {
    /// The registry key does not agree with the registered type name.
    #[error("Action naming mismatch: '{action_name}' is registered for type '{type_name}'{}", SuggestionDisplay(suggestions))]
    ActionNaming {
        /// The registry key that was looked up.
        action_name: String,
        /// The declared type name of the registered action.
        type_name: String,
        /// Plausible corrected registry keys, for the developer console only.
        suggestions: Vec<String>,
    },

    /// Any other invalid setup of actions, hooks or mapping.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation failed inside the handler or its form.
    #[error("Validation error: {0}")]
    Validation(ValidationFailure),

    /// Expected business-rule failure.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Raw persistence failure, not yet translated.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Handler or hook code broke a pipeline contract.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// A path parameter could not be converted.
    #[error("Invalid path parameter #{index} '{value}': {reason}")]
    PathParameter {
        /// Zero-based parameter index.
        index: usize,
        /// The raw segment.
        value: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// The populated form could not be bound into the requested type.
    #[error("Form conversion error: {0}")]
    FormConversion(String),

    /// The transaction stage failed to begin, commit or roll back.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// The renderer failed to produce the forwarded view.
    #[error("Render error: {0}")]
    Render(String),

    /// Anything else raised by handler code.
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FluteError {
    /// Creates a contract violation with the given description.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    /// Wraps an arbitrary error as unexpected.
    pub fn unexpected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unexpected(Box::new(error))
    }

    /// Returns true if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an application error.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Returns the application error, if this is one.
    pub fn as_application(&self) -> Option<&ApplicationError> {
        match self {
            Self::Application(app) => Some(app),
            _ => None,
        }
    }
}

struct SuggestionDisplay<'a>(&'a [String]);

impl fmt::Display for SuggestionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " (did you mean: {}?)", self.0.join(", "))
    }
}

/// Convenience type alias for Results with [`FluteError`].
pub type Result<T> = std::result::Result<T, FluteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_error_lists_suggestions() {
        let err = FluteError::ActionNaming {
            action_name: "sea_landAction".to_string(),
            type_name: "sea.SeaLandAction".to_string(),
            suggestions: vec!["sea_seaLandAction".to_string(), "seaLandAction".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("sea.SeaLandAction"));
        assert!(message.contains("did you mean: sea_seaLandAction, seaLandAction?"));
    }

    #[test]
    fn test_naming_error_without_suggestions() {
        let err = FluteError::ActionNaming {
            action_name: "seaAction".to_string(),
            type_name: "Sea".to_string(),
            suggestions: Vec::new(),
        };
        assert!(!err.to_string().contains("did you mean"));
    }

    #[test]
    fn test_application_conversion() {
        let err: FluteError = ApplicationError::EntityAlreadyUpdated.into();
        assert!(err.is_application());
        assert_eq!(
            err.as_application().map(|a| a.message_key()),
            Some("errors.app.already.updated")
        );
    }

    #[test]
    fn test_login_failure_kinds() {
        assert!(ApplicationError::LoginRequired.is_login_failure());
        assert!(ApplicationError::LoginTimeout.is_login_failure());
        assert!(!ApplicationError::DoubleSubmitted.is_login_failure());
    }
}
