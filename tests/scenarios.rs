//! End-to-end scenarios driving `LoadableReducer`/`PaginatedListReducer`
//! through a small host store, exercising them the way a real application
//! loop would: dispatch an action, run the returned effect, feed whatever
//! it dispatches back in.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;

use loadable_reducer::{
    Effect, Identifiable, IdentifiedPaginatedCollection, LoadError, Lens, ListAction,
    LoadableAction, LoadableReducer, LoadableReducerOptions, LoadableValue, LoadingMode,
    NumberedPage, PageSlice, PaginatedListReducer, PathId, Prism, Reducer, TaskRegistry,
};

/// A no-op child reducer for scenarios that don't need the host to react to
/// anything beyond what `LoadableReducer` itself handles.
#[derive(Default)]
struct NoopChild;

impl<S, A> Reducer for NoopChild
where
    A: Clone,
{
    type State = S;
    type Action = A;

    fn reduce(&self, _state: &mut S, _action: &A) -> Effect<A> {
        Effect::none()
    }
}

// --- Scenario 1-4: a single scalar loadable --------------------------------

#[derive(Clone, Default)]
struct ProfileState {
    profile: LoadableValue<String>,
}

#[derive(Clone, Debug)]
enum ProfileAction {
    Load(LoadableAction<String, String>),
    Reload,
    CancelRequested,
}

fn profile_path() -> Lens<ProfileState, LoadableValue<String>> {
    Lens::new(|s: &ProfileState| &s.profile, |s: &mut ProfileState| &mut s.profile)
}

fn profile_action() -> Prism<ProfileAction, LoadableAction<String, String>> {
    Prism::new(
        |a| match a {
            ProfileAction::Load(inner) => Some(inner),
            _ => None,
        },
        |a| match a {
            ProfileAction::Load(inner) => Ok(inner),
            other => Err(other),
        },
        ProfileAction::Load,
    )
}

/// Reducer that unloads the profile whenever `CancelRequested` is seen,
/// standing in for a host screen that tore itself down mid-load.
#[derive(Default)]
struct ProfileChild;

impl Reducer for ProfileChild {
    type State = ProfileState;
    type Action = ProfileAction;

    fn reduce(&self, state: &mut ProfileState, action: &ProfileAction) -> Effect<ProfileAction> {
        if matches!(action, ProfileAction::CancelRequested) {
            state.profile.unload();
        }
        Effect::none()
    }
}

fn build_profile_reducer(
    load: impl Fn(ProfileState) -> BoxFuture<'static, Result<Option<String>, LoadError<String>>>
        + Send
        + Sync
        + 'static,
) -> LoadableReducer<ProfileState, ProfileAction, String, String, ProfileChild> {
    LoadableReducer::new(
        PathId("profile"),
        ProfileChild,
        profile_path(),
        profile_action(),
        load,
        LoadableReducerOptions::default()
            .trigger(Arc::new(|a: &ProfileAction| matches!(a, ProfileAction::Reload))),
    )
}

/// Runs `effect`, waiting for the next dispatched action (if any) rather
/// than polling. The reducer's tasks complete almost immediately in these
/// tests, so a single `recv` is enough to observe the result.
async fn run_and_recv(
    effect: Effect<ProfileAction>,
    registry: &TaskRegistry,
    tx: &mpsc::UnboundedSender<ProfileAction>,
    rx: &mut mpsc::UnboundedReceiver<ProfileAction>,
) -> Option<ProfileAction> {
    let tx = tx.clone();
    effect.run(registry, move |a| {
        let _ = tx.send(a);
    });
    rx.recv().await
}

#[tokio::test]
async fn basic_load_then_reload_lands_in_loaded() {
    let reducer = build_profile_reducer(|_state| {
        async { Ok(Some("first".to_string())) }.boxed()
    });
    let mut state = ProfileState::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    assert!(state.profile.is_performing_initial_load());
    let completion = run_and_recv(effect, reducer.registry(), &tx, &mut rx).await.unwrap();

    let effect2 = reducer.reduce(&mut state, &completion);
    assert!(matches!(effect2, Effect::None));
    assert_eq!(state.profile.current_value().map(|v| v.as_str()), Some("first"));
    assert!(!state.profile.is_stale());

    // A second, independent reload with a different result.
    let reducer = build_profile_reducer(|_state| {
        async { Ok(Some("second".to_string())) }.boxed()
    });
    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    assert!(state.profile.is_reloading());
    assert_eq!(state.profile.current_value().map(|v| v.as_str()), Some("first"));
    let completion = run_and_recv(effect, reducer.registry(), &tx, &mut rx).await.unwrap();
    reducer.reduce(&mut state, &completion);
    assert_eq!(state.profile.current_value().map(|v| v.as_str()), Some("second"));
}

#[tokio::test]
async fn failed_load_lands_in_failed_and_retry_recovers() {
    let reducer =
        build_profile_reducer(|_state| async { Err(LoadError::Failure("boom".to_string())) }.boxed());
    let mut state = ProfileState::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    let completion = run_and_recv(effect, reducer.registry(), &tx, &mut rx).await.unwrap();
    reducer.reduce(&mut state, &completion);
    assert!(state.profile.has_failed());

    let reducer = build_profile_reducer(|_state| async { Ok(Some("recovered".to_string())) }.boxed());
    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    let completion = run_and_recv(effect, reducer.registry(), &tx, &mut rx).await.unwrap();
    reducer.reduce(&mut state, &completion);
    assert_eq!(state.profile.current_value().map(|v| v.as_str()), Some("recovered"));
}

#[tokio::test]
async fn tearing_down_mid_load_emits_a_cancelled_action() {
    // A load that never completes on its own within the test's lifetime;
    // what matters is that nothing has polled it to completion yet, since
    // the single-threaded test runtime only runs spawned tasks once this
    // task itself awaits.
    let reducer = build_profile_reducer(|_state| {
        async {
            std::future::pending::<()>().await;
            unreachable!()
        }
        .boxed()
    });
    let mut state = ProfileState::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    effect.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });
    assert!(state.profile.is_performing_initial_load());

    let effect2 = reducer.reduce(&mut state, &ProfileAction::CancelRequested);
    effect2.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });

    let cancelled = rx.recv().await.unwrap();
    assert!(matches!(cancelled, ProfileAction::Load(LoadableAction::LoadRequestCancelled)));
    assert!(state.profile.is_not_loaded());
}

#[tokio::test]
async fn cancellation_discovered_inside_the_load_does_not_fail() {
    let reducer = build_profile_reducer(|_state| async { Err(LoadError::Cancelled) }.boxed());
    let mut state = ProfileState::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let effect = reducer.reduce(&mut state, &ProfileAction::Reload);
    let completion = run_and_recv(effect, reducer.registry(), &tx, &mut rx).await.unwrap();
    assert!(matches!(completion, ProfileAction::Load(LoadableAction::LoadRequestCancelled)));

    reducer.reduce(&mut state, &completion);
    assert!(!state.profile.has_failed());
}

// --- Scenario 5-6: a paginated list --------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
struct Item {
    id: u32,
    label: String,
}

impl Identifiable for Item {
    type Id = u32;
    fn id(&self) -> u32 {
        self.id
    }
}

type Collection = IdentifiedPaginatedCollection<Item, NumberedPage>;

#[derive(Clone, Default)]
struct FeedState {
    items: LoadableValue<Collection>,
    mode: LoadingMode,
}

#[derive(Clone, Debug)]
enum FeedAction {
    Load(LoadableAction<Collection, String>),
    List(ListAction),
}

fn feed_path() -> Lens<FeedState, LoadableValue<Collection>> {
    Lens::new(|s: &FeedState| &s.items, |s: &mut FeedState| &mut s.items)
}

fn feed_action() -> Prism<FeedAction, LoadableAction<Collection, String>> {
    Prism::new(
        |a| match a {
            FeedAction::Load(inner) => Some(inner),
            _ => None,
        },
        |a| match a {
            FeedAction::Load(inner) => Ok(inner),
            other => Err(other),
        },
        FeedAction::Load,
    )
}

fn feed_list_action() -> Prism<FeedAction, ListAction> {
    Prism::new(
        |a| match a {
            FeedAction::List(inner) => Some(inner),
            _ => None,
        },
        |a| match a {
            FeedAction::List(inner) => Ok(inner),
            other => Err(other),
        },
        FeedAction::List,
    )
}

fn feed_mode_path() -> Lens<FeedState, LoadingMode> {
    Lens::new(|s: &FeedState| &s.mode, |s: &mut FeedState| &mut s.mode)
}

#[tokio::test]
async fn paginating_to_the_end_stops_the_loader_from_being_called_again() {
    let reducer = PaginatedListReducer::build(
        PathId("feed"),
        NoopChild,
        feed_path(),
        feed_action(),
        feed_list_action(),
        feed_mode_path(),
        || NumberedPage::new(1, 2),
        |page: NumberedPage, _state: FeedState| -> BoxFuture<'static, Result<PageSlice<Item, NumberedPage>, LoadError<String>>> {
            async move {
                match page.number {
                    1 => Ok(PageSlice::new(
                        vec![
                            Item { id: 1, label: "a".into() },
                            Item { id: 2, label: "b".into() },
                        ],
                        page,
                        Some(NumberedPage::new(2, 2)),
                    )),
                    2 => Ok(PageSlice::last(vec![Item { id: 3, label: "c".into() }], page)),
                    other => panic!("load_page called for unexpected page {other}"),
                }
            }
            .boxed()
        },
        LoadableReducerOptions::default(),
    );

    let mut state = FeedState::default();
    let (tx, mut rx) = mpsc::unbounded_channel::<FeedAction>();

    // First appearance: loads page 1.
    let effect = reducer.reduce(&mut state, &FeedAction::List(ListAction::OnFirstAppear));
    effect.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });
    let completion = rx.recv().await.unwrap();
    reducer.reduce(&mut state, &completion);

    let collection = state.items.current_value().expect("page 1 loaded");
    assert_eq!(collection.len(), 2);
    assert!(collection.has_next_page());

    // Scrolling to the end loads page 2.
    let effect = reducer.reduce(&mut state, &FeedAction::List(ListAction::ReachedEndOfPage));
    effect.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });
    let completion = rx.recv().await.unwrap();
    reducer.reduce(&mut state, &completion);

    let collection = state.items.current_value().expect("page 2 loaded");
    assert_eq!(collection.len(), 3);
    assert!(!collection.has_next_page());

    // Reaching the end again is a no-op: the precondition rejects the
    // launch before `load_page` is ever called (which would panic on an
    // unexpected page number).
    let effect = reducer.reduce(&mut state, &FeedAction::List(ListAction::ReachedEndOfPage));
    effect.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });
    assert!(rx.try_recv().is_err());
    assert_eq!(state.items.current_value().expect("still loaded").len(), 3);
}

/// `UpsertFirst` is not one of the four named [`ListAction`]s (those only
/// ever select `Reload` or `UpsertNext`); it is meant for a host-specific
/// "load newer" action wired straight to [`loadable_reducer::PaginatedLoadableReducer`],
/// so this scenario builds one directly instead of going through the preset.
#[tokio::test]
async fn upsert_first_updates_duplicates_in_place_and_keeps_the_old_next_page() {
    use loadable_reducer::PaginatedLoadableReducer;

    let reducer = PaginatedLoadableReducer::build(
        PathId("feed"),
        NoopChild,
        feed_path(),
        feed_action(),
        || NumberedPage::new(1, 2),
        |state: &FeedState| state.mode,
        |page: NumberedPage, _state: FeedState| -> BoxFuture<'static, Result<PageSlice<Item, NumberedPage>, LoadError<String>>> {
            async move {
                assert_eq!(page.number, 1, "UpsertFirst always reloads the first page");
                Ok(PageSlice::new(
                    vec![
                        Item { id: 3, label: "second".into() },
                        Item { id: 4, label: "r4".into() },
                        Item { id: 5, label: "r5".into() },
                    ],
                    page,
                    None,
                ))
            }
            .boxed()
        },
        LoadableReducerOptions::default()
            .trigger(Arc::new(|a: &FeedAction| matches!(a, FeedAction::List(ListAction::Retry)))),
    );

    // Existing collection has two untouched items (1, 2) ahead of the id the
    // incoming slice will match (3), so a buggy merge that relocates matched
    // ids to the absolute front would be caught here.
    let mut state = FeedState::default();
    state.items = LoadableValue::with_value(Collection::from_initial(PageSlice::new(
        vec![
            Item { id: 1, label: "r1".into() },
            Item { id: 2, label: "r2".into() },
            Item { id: 3, label: "first".into() },
        ],
        NumberedPage::new(1, 2),
        Some(NumberedPage::new(2, 2)),
    )));
    state.mode = LoadingMode::UpsertFirst;

    let (tx, mut rx) = mpsc::unbounded_channel::<FeedAction>();
    let effect = reducer.reduce(&mut state, &FeedAction::List(ListAction::Retry));
    effect.run(reducer.registry(), {
        let tx = tx.clone();
        move |a| {
            let _ = tx.send(a);
        }
    });
    let completion = rx.recv().await.unwrap();
    reducer.reduce(&mut state, &completion);

    let collection = state.items.current_value().expect("upsert-first completed");
    let ids: Vec<u32> = collection.iter().map(|i| i.id).collect();
    assert_eq!(
        ids,
        vec![1, 2, 3, 4, 5],
        "r1/r2 keep their position, r3 is updated in place, r4/r5 follow it"
    );
    assert_eq!(collection.get(&3).unwrap().label, "second");
    assert_eq!(
        collection.next_page(),
        Some(&NumberedPage::new(2, 2)),
        "the slice's own next_page (None) must not overwrite the preserved tail-page pointer"
    );
}
