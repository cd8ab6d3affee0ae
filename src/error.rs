//! The cancellation/failure classification carried by completion actions.

use thiserror::Error;

/// Wraps a load's failure with the cancellation case the reducer treats
/// specially: a cancelled load must never drive the loadable into `Failed`.
#[derive(Debug, Error)]
pub enum LoadError<E> {
    /// The load ran to completion and produced an error.
    #[error("load failed: {0:?}")]
    Failure(E),
    /// The load was superseded before it completed, typically because a
    /// newer load for the same path started. Not a failure: the loadable
    /// this load was running for is left exactly as the newer load left it.
    #[error("load cancelled")]
    Cancelled,
}

impl<E> LoadError<E> {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, LoadError::Cancelled)
    }

    /// The wrapped application error, if this isn't a cancellation.
    pub fn failure(&self) -> Option<&E> {
        match self {
            LoadError::Failure(e) => Some(e),
            LoadError::Cancelled => None,
        }
    }
}
