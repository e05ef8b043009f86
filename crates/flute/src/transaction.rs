// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Transaction boundary around handler execution.
//!
//! The data layer is outside the pipeline; it plugs in as a
//! [`TransactionStage`] that begins one scope per request. Exactly one of
//! `commit` or `rollback` is called on every scope.

use std::sync::{Arc, Mutex};

use crate::error::{FluteError, Result};

/// How the handler's transaction is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionGenre {
    /// Join or open the default transaction.
    #[default]
    Default,
    /// Always open a new transaction.
    RequiresNew,
    /// Run without a transaction.
    Suppressed,
}

/// An open transaction.
pub trait TransactionScope: Send {
    /// Commits the transaction.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Rolls the transaction back.
    fn rollback(self: Box<Self>) -> Result<()>;
}

/// Opens transaction scopes.
pub trait TransactionStage: Send + Sync {
    /// Begins a scope for the genre.
    fn begin(&self, genre: TransactionGenre) -> Result<Box<dyn TransactionScope>>;
}

/// Stage for applications without a data layer.
#[derive(Debug, Clone, Default)]
pub struct NoTransactionStage;

struct NoTransactionScope;

impl TransactionScope for NoTransactionScope {
    fn commit(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

impl TransactionStage for NoTransactionStage {
    fn begin(&self, _genre: TransactionGenre) -> Result<Box<dyn TransactionScope>> {
        Ok(Box::new(NoTransactionScope))
    }
}

/// What happened to a transaction, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    /// A scope was opened.
    Begin(TransactionGenre),
    /// The scope committed.
    Commit,
    /// The scope rolled back.
    Rollback,
}

/// Records transaction events; used by the dev server and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionStage {
    events: Arc<Mutex<Vec<TransactionEvent>>>,
}

impl InMemoryTransactionStage {
    /// Creates an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<TransactionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(events: &Mutex<Vec<TransactionEvent>>, event: TransactionEvent) -> Result<()> {
        events
            .lock()
            .map_err(|e| FluteError::Transaction(e.to_string()))?
            .push(event);
        Ok(())
    }
}

struct InMemoryScope {
    events: Arc<Mutex<Vec<TransactionEvent>>>,
}

impl TransactionScope for InMemoryScope {
    fn commit(self: Box<Self>) -> Result<()> {
        InMemoryTransactionStage::record(&self.events, TransactionEvent::Commit)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        InMemoryTransactionStage::record(&self.events, TransactionEvent::Rollback)
    }
}

impl TransactionStage for InMemoryTransactionStage {
    fn begin(&self, genre: TransactionGenre) -> Result<Box<dyn TransactionScope>> {
        if genre == TransactionGenre::Suppressed {
            return Ok(Box::new(NoTransactionScope));
        }
        Self::record(&self.events, TransactionEvent::Begin(genre))?;
        Ok(Box::new(InMemoryScope {
            events: Arc::clone(&self.events),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_events() {
        let stage = InMemoryTransactionStage::new();
        stage.begin(TransactionGenre::Default).unwrap().commit().unwrap();
        stage
            .begin(TransactionGenre::RequiresNew)
            .unwrap()
            .rollback()
            .unwrap();
        assert_eq!(
            stage.events(),
            vec![
                TransactionEvent::Begin(TransactionGenre::Default),
                TransactionEvent::Commit,
                TransactionEvent::Begin(TransactionGenre::RequiresNew),
                TransactionEvent::Rollback,
            ]
        );
    }

    #[test]
    fn test_suppressed_records_nothing() {
        let stage = InMemoryTransactionStage::new();
        stage
            .begin(TransactionGenre::Suppressed)
            .unwrap()
            .commit()
            .unwrap();
        assert!(stage.events().is_empty());
    }
}
