//! Per-item outcomes and the policies that decide whether a batch keeps going after a failure.

use std::fmt::Display;

use log::{error, warn};

/// What happened to a single item of a batch.
#[derive(Debug)]
pub(crate) enum Outcome<T, E> {
    Completed(T),
    /// Nothing was done for this item, but that's not a failure.
    Skipped { reason: String },
    Failed(E),
}

/// How a batch reacts to a failed item.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Policy {
    /// Stop at the first failure and return it, nothing after it is attempted.
    AbortOnFirst,
    /// Log the failure, remember it, and move on to the next item.
    ContinueOnFailure,
}

/// Drives the outcomes of a batch according to its [`Policy`].
#[derive(Debug)]
pub(crate) struct Batch<E> {
    policy: Policy,
    completed: usize,
    skipped: usize,
    failures: Vec<E>,
}

impl<E: Display> Batch<E> {
    pub(crate) fn new(policy: Policy) -> Self {
        Self {
            policy,
            completed: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    /// Account for one item's outcome.
    ///
    /// Returns the completed value, `None` if the item was skipped or its failure was retained,
    /// or the error itself if the policy says the batch must stop.
    pub(crate) fn record<T>(
        &mut self,
        item: impl Display,
        outcome: Outcome<T, E>,
    ) -> Result<Option<T>, E> {
        match outcome {
            Outcome::Completed(value) => {
                self.completed += 1;
                Ok(Some(value))
            }
            Outcome::Skipped { reason } => {
                warn!("{item}: skipped, {reason}");
                self.skipped += 1;
                Ok(None)
            }
            Outcome::Failed(err) => match self.policy {
                Policy::AbortOnFirst => Err(err),
                Policy::ContinueOnFailure => {
                    error!("{item}: {err}");
                    self.failures.push(err);
                    Ok(None)
                }
            },
        }
    }

    /// Counts so far. Under [`Policy::AbortOnFirst`] no failure is ever retained, so this is all
    /// there is to report once the last item has been recorded.
    pub(crate) fn summary(&self) -> Summary {
        Summary {
            completed: self.completed,
            skipped: self.skipped,
        }
    }

    /// Close out the batch, returning every retained failure if there were any.
    pub(crate) fn finish(self) -> Result<Summary, Vec<E>> {
        if self.failures.is_empty() {
            Ok(self.summary())
        } else {
            Err(self.failures)
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Summary {
    pub(crate) completed: usize,
    pub(crate) skipped: usize,
}
