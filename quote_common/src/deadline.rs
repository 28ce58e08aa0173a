//! Explicit deadlines passed down the call chain.
//!
//! A `Deadline` is an absolute point in time (or none at all). Stages derive
//! their own budget from the caller's deadline with [`Deadline::child`], which
//! never extends past the parent: `min(parent, now + budget)`. An already
//! expired parent therefore yields an already expired child, and the stage
//! fails before doing any I/O.
//!
//! Time is measured with `std::time::Instant`, which is monotonic and immune to
//! system clock changes.
use std::time::{Duration, Instant};

use crate::error::QuoteError;
use crate::result::Result;

/// Absolute time limit for an operation. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline that never expires. Used as the root for inbound requests,
    /// which live as long as the connection does.
    pub fn unbounded() -> Self {
        Self { at: None }
    }

    /// Deadline `budget` from now, independent of any parent.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// Deadline for a sub-stage: `budget` from now, capped by `self`.
    pub fn child(&self, budget: Duration) -> Self {
        let local = Instant::now().checked_add(budget);
        let at = match (self.at, local) {
            (Some(parent), Some(local)) => Some(parent.min(local)),
            (parent, None) => parent,
            (None, local) => local,
        };
        Self { at }
    }

    /// The absolute instant, if bounded.
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// True once the deadline has passed. Unbounded deadlines never expire.
    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left before the deadline, `None` when unbounded.
    ///
    /// Fails with `QuoteError::Timeout` once the deadline has passed, so callers
    /// can use `?` right before starting the next step.
    pub fn remaining(&self) -> Result<Option<Duration>> {
        match self.at {
            None => Ok(None),
            Some(at) => {
                let now = Instant::now();
                if now >= at {
                    Err(QuoteError::Timeout("context deadline exceeded".to_string()))
                } else {
                    Ok(Some(at - now))
                }
            }
        }
    }

    /// Fails with a timeout naming `stage` if the deadline has passed.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_expired() {
            return Err(QuoteError::Timeout(format!("{stage}: context deadline exceeded")));
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
