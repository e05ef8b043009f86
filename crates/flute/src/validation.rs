// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Validation failures raised from handlers.

use std::fmt;

use crate::messages::ActionMessages;
use crate::response::ActionResponse;

/// Produces the response shown together with validation errors.
pub type ValidationErrorHook = Box<dyn FnOnce() -> ActionResponse + Send + Sync>;

/// Messages of a failed validation plus the hook deciding the error response.
///
/// Raised as [`FluteError::Validation`](crate::FluteError::Validation) and
/// intercepted where the handler is invoked: the messages are saved, the
/// transaction is rolled back and the hook's response is used.
pub struct ValidationFailure {
    messages: ActionMessages,
    error_hook: ValidationErrorHook,
}

impl ValidationFailure {
    /// Creates a failure.
    pub fn new<H>(messages: ActionMessages, error_hook: H) -> Self
    where
        H: FnOnce() -> ActionResponse + Send + Sync + 'static,
    {
        Self {
            messages,
            error_hook: Box::new(error_hook),
        }
    }

    /// The failed messages.
    pub fn messages(&self) -> &ActionMessages {
        &self.messages
    }

    /// Splits the failure into its messages and hook.
    pub fn into_parts(self) -> (ActionMessages, ValidationErrorHook) {
        (self.messages, self.error_hook)
    }
}

impl fmt::Debug for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationFailure")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let properties: Vec<&str> = self.messages.properties().collect();
        write!(
            f,
            "{} message(s) on [{}]",
            self.messages.len(),
            properties.join(", ")
        )
    }
}
