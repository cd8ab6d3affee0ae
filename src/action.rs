//! The completion action a load's result is redispatched through, and the
//! merge strategy paginated loads use when inserting a new slice.

use crate::error::LoadError;

/// What the host's action type embeds to carry a load's eventual outcome
/// back through the reducer. Extracted from / embedded into the host
/// action via a [`crate::lens::Prism`].
///
/// `LoadRequestCancelled` is kept distinct from
/// `LoadRequestCompleted(Err(LoadError::Cancelled))` even though both carry
/// the same information: the former is what the reducer itself emits when
/// it cancels in-flight work synchronously (no task body ever ran); the
/// latter is what a task dispatches when it discovers mid-flight that it
/// was cancelled. Both are handled identically by `LoadableReducer`.
#[derive(Debug)]
pub enum LoadableAction<V, E> {
    LoadRequestCompleted(Result<Option<V>, LoadError<E>>),
    LoadRequestCancelled,
}

impl<V, E> LoadableAction<V, E> {
    pub fn succeeded(value: Option<V>) -> Self {
        LoadableAction::LoadRequestCompleted(Ok(value))
    }

    pub fn failed(error: E) -> Self {
        LoadableAction::LoadRequestCompleted(Err(LoadError::Failure(error)))
    }

    pub fn completed_with_error(error: LoadError<E>) -> Self {
        LoadableAction::LoadRequestCompleted(Err(error))
    }

    pub fn cancelled() -> Self {
        LoadableAction::LoadRequestCancelled
    }
}

/// How a newly loaded page slice is merged into an existing paginated
/// collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingMode {
    /// Append the new slice after the existing items, the default, used
    /// for "load more" / infinite scroll.
    #[default]
    UpsertNext,
    /// Insert the new slice before the existing items, preserving the
    /// existing `next_page`, used for "load newer" feeds.
    UpsertFirst,
    /// Discard the existing collection and replace it with the new slice,
    /// used for pull-to-refresh.
    Reload,
}
