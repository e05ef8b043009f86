// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Double-submit tokens.
//!
//! A form page saves a token in the session and renders it; the submitting
//! request must echo it back. A missing or stale token raises
//! [`ApplicationError::DoubleSubmitted`], which the typical monologue turns
//! into the error page.

use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{ApplicationError, Result};

const SESSION_KEY_PREFIX: &str = "flute.token.";

/// Token handling of an execute method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPolicy {
    /// No token handling.
    #[default]
    None,
    /// Save a fresh token after the handler ran.
    Save,
    /// Verify the submitted token and discard it.
    Validate,
    /// Verify the submitted token and keep it for another submit.
    ValidateKeep,
}

/// Saves and verifies tokens grouped by action.
#[derive(Debug)]
pub struct DoubleSubmitManager {
    parameter: String,
    sequence: AtomicU64,
}

impl DoubleSubmitManager {
    /// Creates a manager reading tokens from the given request parameter.
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Request parameter that carries the submitted token.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Generates a token, stores it in the session and returns it.
    pub fn save_token(&self, ctx: &mut RequestContext, group: &str) -> String {
        let token = self.generate(group);
        ctx.set_session_attribute(session_key(group), token.clone());
        debug!("Saved double-submit token for {}", group);
        token
    }

    /// The token currently saved for the group.
    pub fn saved_token<'c>(&self, ctx: &'c RequestContext, group: &str) -> Option<&'c str> {
        ctx.session_attribute(&session_key(group))
    }

    /// Verifies the submitted token against the saved one.
    pub fn verify_token(
        &self,
        ctx: &mut RequestContext,
        group: &str,
        submitted: Option<&str>,
        keep: bool,
    ) -> Result<()> {
        let key = session_key(group);
        let matched = match (ctx.session_attribute(&key), submitted) {
            (Some(saved), Some(submitted)) => saved == submitted,
            _ => false,
        };
        if !matched {
            debug!("Double-submit token mismatch for {}", group);
            return Err(ApplicationError::DoubleSubmitted.into());
        }
        if !keep {
            ctx.remove_session_attribute(&key);
        }
        Ok(())
    }

    fn generate(&self, group: &str) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(group.as_bytes());
        hasher.update(sequence.to_le_bytes());
        hasher.update(Uuid::new_v4().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn session_key(group: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FluteError;
    use crate::request::ActionRequest;

    fn context() -> RequestContext {
        RequestContext::new(ActionRequest::new("/member/edit/", "POST"))
    }

    #[test]
    fn test_tokens_are_unique() {
        let manager = DoubleSubmitManager::new("flute.token");
        let mut ctx = context();
        let first = manager.save_token(&mut ctx, "member_memberEditAction");
        let second = manager.save_token(&mut ctx, "member_memberEditAction");
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(
            manager.saved_token(&ctx, "member_memberEditAction"),
            Some(second.as_str())
        );
    }

    #[test]
    fn test_fresh_managers_do_not_repeat_tokens() {
        let mut ctx = context();
        let first = DoubleSubmitManager::new("flute.token").save_token(&mut ctx, "memberAction");
        let second = DoubleSubmitManager::new("flute.token").save_token(&mut ctx, "memberAction");
        assert_ne!(first, second);
    }

    #[test]
    fn test_validate_discards_token() {
        let manager = DoubleSubmitManager::new("flute.token");
        let mut ctx = context();
        let token = manager.save_token(&mut ctx, "memberAction");
        manager
            .verify_token(&mut ctx, "memberAction", Some(&token), false)
            .unwrap();
        let again = manager.verify_token(&mut ctx, "memberAction", Some(&token), false);
        assert!(matches!(
            again,
            Err(FluteError::Application(ApplicationError::DoubleSubmitted))
        ));
    }

    #[test]
    fn test_validate_keep() {
        let manager = DoubleSubmitManager::new("flute.token");
        let mut ctx = context();
        let token = manager.save_token(&mut ctx, "memberAction");
        for _ in 0..2 {
            manager
                .verify_token(&mut ctx, "memberAction", Some(&token), true)
                .unwrap();
        }
        assert!(manager
            .verify_token(&mut ctx, "memberAction", None, true)
            .is_err());
    }
}
