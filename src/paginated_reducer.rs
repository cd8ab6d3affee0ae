//! Adapter that derives a page-aware `load` closure for [`LoadableReducer`]
//! from a page-keyed loader and a [`LoadingMode`].

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::action::{LoadableAction, LoadingMode};
use crate::collection::PaginatedCollection;
use crate::effect::PathId;
use crate::error::LoadError;
use crate::lens::{Lens, Prism};
use crate::loadable::LoadableValue;
use crate::page::PageSlice;
use crate::reducer::{LoadableReducer, LoadableReducerOptions, Reducer};

type LoadPageFn<S, Coll, E> = Arc<
    dyn Fn(
            <Coll as PaginatedCollection>::Page,
            S,
        ) -> BoxFuture<'static, Result<PageSlice<<Coll as PaginatedCollection>::Item, <Coll as PaginatedCollection>::Page>, LoadError<E>>>
        + Send
        + Sync,
>;

/// Builds a [`LoadableReducer`] whose `load` closure aggregates page
/// responses into a [`PaginatedCollection`], per §4.3: no current value
/// loads the first page from scratch; otherwise the configured
/// [`LoadingMode`] picks which page to load and how to fold it in.
pub struct PaginatedLoadableReducer;

impl PaginatedLoadableReducer {
    /// `first_page` is nullary so the first page key may be time-dependent
    /// (e.g. `TimestampedPage { end_date: Utc::now(), .. }`).
    #[allow(clippy::too_many_arguments)]
    pub fn build<S, A, Coll, E, R>(
        path_id: PathId,
        child: R,
        path: Lens<S, LoadableValue<Coll>>,
        action: Prism<A, LoadableAction<Coll, E>>,
        first_page: impl Fn() -> Coll::Page + Send + Sync + 'static,
        mode: impl Fn(&S) -> LoadingMode + Send + Sync + 'static,
        load_page: impl Fn(Coll::Page, S) -> BoxFuture<'static, Result<PageSlice<Coll::Item, Coll::Page>, LoadError<E>>>
            + Send
            + Sync
            + 'static,
        mut options: LoadableReducerOptions<S, A>,
    ) -> LoadableReducer<S, A, Coll, E, R>
    where
        S: Clone + Send + Sync + 'static,
        A: Send + 'static,
        Coll: PaginatedCollection + Clone + Send + Sync + 'static,
        Coll::Page: Clone + Send + Sync + 'static,
        Coll::Item: Send + 'static,
        E: Send + 'static,
    {
        let first_page = Arc::new(first_page);
        let mode = Arc::new(mode);
        let load_page: LoadPageFn<S, Coll, E> = Arc::new(load_page);
        let user_precondition = options.take_precondition();

        let precondition_path = path.clone();
        let precondition_mode = mode.clone();
        options = options.precondition(Arc::new(move |state: &S| {
            let no_next_page_to_append = matches!(precondition_mode(state), LoadingMode::UpsertNext)
                && precondition_path
                    .get(state)
                    .current_value()
                    .is_some_and(|collection| !collection.has_next_page());
            !no_next_page_to_append && user_precondition.as_ref().is_none_or(|p| p(state))
        }));

        let load_path = path.clone();
        let load = move |state: S| -> BoxFuture<'static, Result<Option<Coll>, LoadError<E>>> {
            let current = load_path.get(&state).current_value().cloned();
            let mode = mode(&state);
            let load_page = load_page.clone();

            match (current, mode) {
                (None, _) => {
                    let page = first_page();
                    async move { Ok(Some(Coll::from_initial(load_page(page, state).await?))) }.boxed()
                }
                (Some(collection), LoadingMode::UpsertNext) => match collection.next_page().cloned() {
                    Some(next_page) => async move {
                        let slice = load_page(next_page, state).await?;
                        Ok(Some((*collection).clone().upsert_appending(slice)))
                    }
                    .boxed(),
                    // The precondition already skips this case; reachable
                    // only if `mode` raced between the two reads.
                    None => async { Err(LoadError::Cancelled) }.boxed(),
                },
                (Some(collection), LoadingMode::UpsertFirst) => {
                    let page = first_page();
                    async move {
                        let slice = load_page(page, state).await?;
                        Ok(Some((*collection).clone().upsert_prepending(slice)))
                    }
                    .boxed()
                }
                (Some(_), LoadingMode::Reload) => {
                    let page = first_page();
                    async move { Ok(Some(Coll::from_initial(load_page(page, state).await?))) }.boxed()
                }
            }
        };

        LoadableReducer::new(path_id, child, path, action, load, options)
    }
}
