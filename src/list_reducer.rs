//! Opinionated preset combining [`PaginatedLoadableReducer`] with the
//! handful of named actions most list UIs need.

use futures::future::BoxFuture;

use crate::action::{LoadableAction, LoadingMode};
use crate::collection::{Identifiable, IdentifiedPaginatedCollection, PaginatedCollection};
use crate::effect::{Effect, PathId};
use crate::error::LoadError;
use crate::lens::{Lens, Prism};
use crate::loadable::LoadableValue;
use crate::page::PageSlice;
use crate::paginated_reducer::PaginatedLoadableReducer;
use crate::reducer::{LoadableReducerOptions, Reducer};

/// The named, opinionated actions [`PaginatedListReducer`] reacts to,
/// beyond the [`LoadableAction`] it forwards to its wrapped reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListAction {
    /// The list UI appeared for the first time (or after being torn down).
    OnFirstAppear,
    /// The user pulled to refresh; keeps the current items visible.
    PullToRefresh,
    /// The UI scrolled to the last loaded item and wants the next page.
    ReachedEndOfPage,
    /// The user asked to retry after a failure.
    Retry,
}

/// Builds the preset reducer for a list UI: a [`LoadingMode`] cell plus the
/// four named actions above, layered on [`PaginatedLoadableReducer`].
///
/// `mode_path` is a lens to wherever the host keeps the current
/// `LoadingMode` for this list. `PaginatedListReducer` sets it as part of
/// handling `ListAction`, and `PaginatedLoadableReducer::build`'s `mode`
/// accessor reads it back.
pub struct PaginatedListReducer;

impl PaginatedListReducer {
    #[allow(clippy::too_many_arguments)]
    pub fn build<S, A, V, P, E, R>(
        path_id: PathId,
        child: R,
        path: Lens<S, LoadableValue<IdentifiedPaginatedCollection<V, P>>>,
        action: Prism<A, LoadableAction<IdentifiedPaginatedCollection<V, P>, E>>,
        list_action: Prism<A, ListAction>,
        mode_path: Lens<S, LoadingMode>,
        first_page: impl Fn() -> P + Send + Sync + 'static,
        load_page: impl Fn(P, S) -> BoxFuture<'static, Result<PageSlice<V, P>, LoadError<E>>> + Send + Sync + 'static,
        options: LoadableReducerOptions<S, A>,
    ) -> PaginatedListReducerWrapping<S, A, V, P, E, R>
    where
        S: Clone + Send + Sync + 'static,
        A: Send + 'static,
        V: Identifiable + Clone + Send + Sync + 'static,
        V::Id: Send + Sync + 'static,
        P: Clone + Send + Sync + 'static,
        E: Send + 'static,
    {
        let mode_path_for_reader = mode_path.clone();
        let paginated = PaginatedLoadableReducer::build(
            path_id,
            child,
            path.clone(),
            action,
            first_page,
            move |state: &S| *mode_path_for_reader.get(state),
            load_page,
            options,
        );

        PaginatedListReducerWrapping { inner: paginated, path, mode_path, list_action }
    }
}

/// The concrete reducer [`PaginatedListReducer::build`] returns: a
/// [`LoadableReducer`]-backed pagination engine plus handling for the four
/// named [`ListAction`]s.
pub struct PaginatedListReducerWrapping<S, A, V, P, E, R> {
    inner: crate::reducer::LoadableReducer<S, A, IdentifiedPaginatedCollection<V, P>, E, R>,
    path: Lens<S, LoadableValue<IdentifiedPaginatedCollection<V, P>>>,
    mode_path: Lens<S, LoadingMode>,
    list_action: Prism<A, ListAction>,
}

impl<S, A, V, P, E, R> PaginatedListReducerWrapping<S, A, V, P, E, R>
where
    V: Identifiable + Clone,
{
    /// The underlying task registry, exposed for the same reason
    /// [`crate::reducer::LoadableReducer::registry`] exposes its own.
    pub fn registry(&self) -> &crate::effect::TaskRegistry {
        self.inner.registry()
    }

    /// Removes items by id from the identified collection in place,
    /// without touching load state.
    pub fn remove(&self, state: &mut S, ids: &[V::Id]) {
        if let LoadableValue::Loaded { value: Some(collection), .. } = self.path.get_mut(state) {
            let mut updated = (**collection).clone();
            for id in ids {
                updated.remove(id);
            }
            *collection = std::sync::Arc::new(updated);
        }
    }

    /// Updates (or inserts) a single item in the identified collection in
    /// place, without touching load state.
    pub fn update(&self, state: &mut S, item: V) {
        if let LoadableValue::Loaded { value: Some(collection), .. } = self.path.get_mut(state) {
            let mut updated = (**collection).clone();
            updated.insert(item);
            *collection = std::sync::Arc::new(updated);
        }
    }
}

impl<S, A, V, P, E, R> Reducer for PaginatedListReducerWrapping<S, A, V, P, E, R>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    V: Identifiable + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    E: Send + 'static,
    R: Reducer<State = S, Action = A>,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut S, action: &A) -> Effect<A> {
        if let Some(list_action) = self.list_action.extract(action) {
            match list_action {
                ListAction::OnFirstAppear | ListAction::Retry => {
                    *self.mode_path.get_mut(state) = LoadingMode::Reload;
                    self.path.get_mut(state).ready_to_load();
                }
                ListAction::PullToRefresh => {
                    *self.mode_path.get_mut(state) = LoadingMode::Reload;
                    self.path.get_mut(state).mark_as_stale();
                }
                ListAction::ReachedEndOfPage => {
                    *self.mode_path.get_mut(state) = LoadingMode::UpsertNext;
                    self.path.get_mut(state).mark_as_stale();
                }
            }
        }

        self.inner.reduce(state, action)
    }
}

impl<V, P> IdentifiedPaginatedCollection<V, P>
where
    V: Identifiable,
{
    fn remove(&mut self, id: &V::Id) {
        self.items_mut().shift_remove(id);
    }

    fn insert(&mut self, item: V) {
        self.items_mut().insert(item.id(), item);
    }
}
