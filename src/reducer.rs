//! The higher-order reducer that drives a single loadable's lifecycle.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::action::LoadableAction;
use crate::effect::{Effect, PathId, TaskRegistry};
use crate::error::LoadError;
use crate::lens::{Lens, Prism};
use crate::loadable::LoadableValue;

/// The generic contract this crate requires from the host store: reduce
/// one action against state, producing whatever further work is needed.
pub trait Reducer {
    type State;
    type Action;

    fn reduce(&self, state: &mut Self::State, action: &Self::Action) -> Effect<Self::Action>;
}

/// An opaque UI hint passed through untouched; the core never inspects
/// it. Intended for e.g. a "was this an interactive refresh" flag a UI
/// layer attaches to completion actions for its own transition animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationHint(pub String);

impl AnimationHint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type LoadFn<S, V, E> =
    Arc<dyn Fn(S) -> BoxFuture<'static, Result<Option<V>, LoadError<E>>> + Send + Sync>;

/// Optional configuration for a [`LoadableReducer`]: every field has a
/// sensible default, and callers chain setter calls onto
/// `LoadableReducerOptions::default()`.
///
/// Hand-written rather than derived: the fields here hold `Arc<dyn Fn>`
/// trait objects rather than `Into`-convertible scalars, which isn't the
/// shape a builder-derive macro is for.
pub struct LoadableReducerOptions<S, A> {
    /// Actions (beyond the projected completion action) that should force
    /// a load regardless of `requires_loading`.
    trigger: Option<Predicate<A>>,
    /// Consulted before every load task launch; `false` skips the launch
    /// silently (logged at `log::trace!`).
    precondition: Option<Predicate<S>>,
    /// Forwarded verbatim for a host UI layer to attach to its own
    /// transition; never interpreted by this crate.
    animation: Option<AnimationHint>,
}

impl<S, A> Default for LoadableReducerOptions<S, A> {
    fn default() -> Self {
        Self { trigger: None, precondition: None, animation: None }
    }
}

impl<S, A> LoadableReducerOptions<S, A> {
    pub fn trigger(mut self, trigger: Predicate<A>) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn precondition(mut self, precondition: Predicate<S>) -> Self {
        self.precondition = Some(precondition);
        self
    }

    pub fn animation(mut self, animation: AnimationHint) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Removes and returns the configured precondition, leaving `None` in
    /// its place. Used by [`crate::paginated_reducer`] to compose its own
    /// next-page guard with whatever the caller supplied.
    pub fn take_precondition(&mut self) -> Option<Predicate<S>> {
        self.precondition.take()
    }
}

/// Wraps a child [`Reducer`] and drives the async load lifecycle of one
/// `LoadableValue<V>` field within its state.
///
/// Intercepts every action dispatched to the child: applies the loadable's
/// own pure state transition if the action carries one, runs the child
/// reducer, then re-inspects state to decide whether a load must now be
/// launched or an in-flight one cancelled.
pub struct LoadableReducer<S, A, V, E, R> {
    child: R,
    path: Lens<S, LoadableValue<V>>,
    action: Prism<A, LoadableAction<V, E>>,
    load: LoadFn<S, V, E>,
    trigger: Predicate<A>,
    precondition: Predicate<S>,
    #[allow(dead_code)]
    animation: Option<AnimationHint>,
    path_id: PathId,
    registry: TaskRegistry,
}

impl<S, A, V, E, R> LoadableReducer<S, A, V, E, R> {
    pub fn new(
        path_id: PathId,
        child: R,
        path: Lens<S, LoadableValue<V>>,
        action: Prism<A, LoadableAction<V, E>>,
        load: impl Fn(S) -> BoxFuture<'static, Result<Option<V>, LoadError<E>>> + Send + Sync + 'static,
        options: LoadableReducerOptions<S, A>,
    ) -> Self {
        Self {
            child,
            path,
            action,
            load: Arc::new(load),
            trigger: options.trigger.unwrap_or_else(|| Arc::new(|_| false)),
            precondition: options.precondition.unwrap_or_else(|| Arc::new(|_| true)),
            animation: options.animation,
            path_id,
            registry: TaskRegistry::new(),
        }
    }

    /// The task registry backing this loadable's cancel-in-flight
    /// bookkeeping, exposed so a paired UI layer can check
    /// [`TaskRegistry::is_current`] itself if it needs to.
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn path_id(&self) -> PathId {
        self.path_id
    }

    fn launch(&self, state: &mut S) -> Effect<A>
    where
        S: Clone + Send + 'static,
        A: Send + 'static,
        V: Send + 'static,
        E: Send + 'static,
    {
        if !(self.precondition)(state) {
            log::trace!("precondition false for {:?}; skipping load", self.path_id);
            return Effect::none();
        }

        self.path.get_mut(state).loading(true);

        let snapshot = state.clone();
        let load = self.load.clone();
        let action = self.action.clone();

        Effect::task(self.path_id, async move {
            match (load)(snapshot).await {
                Err(LoadError::Cancelled) => action.embed(LoadableAction::LoadRequestCancelled),
                other => action.embed(LoadableAction::LoadRequestCompleted(other)),
            }
        })
    }
}

impl<S, A, V, E, R> Reducer for LoadableReducer<S, A, V, E, R>
where
    S: Clone + Send + 'static,
    A: Clone + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
    R: Reducer<State = S, Action = A>,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut S, action: &A) -> Effect<A> {
        // Step 1: apply the loadable's own pure transition, if this action
        // carries one.
        if let Ok(loadable_action) = self.action.extract_owned(action.clone()) {
            match loadable_action {
                LoadableAction::LoadRequestCompleted(Ok(v)) => {
                    self.path.get_mut(state).loaded(v);
                }
                LoadableAction::LoadRequestCompleted(Err(e)) => {
                    if !e.is_cancellation() {
                        self.path.get_mut(state).failed();
                    }
                }
                LoadableAction::LoadRequestCancelled => {
                    // Cleanup already happened synchronously when the
                    // cancellation was issued; nothing further to do.
                }
            }
        }

        // Step 2: remember whether we were loading before the child runs.
        let was_loading_before = self.path.get(state).is_loading();

        // Step 3: run the child reducer.
        let child_effect = self.child.reduce(state, action);

        // Step 4: decide whether to launch a new load or cancel in flight.
        let launch_or_cancel = if self.path.get(state).requires_loading() || (self.trigger)(action) {
            self.launch(state)
        } else if was_loading_before && matches!(self.path.get(state), LoadableValue::NotLoaded { ready_to_load: false }) {
            let cancelled = self.action.embed(LoadableAction::LoadRequestCancelled);
            Effect::cancel(self.path_id).merge(Effect::send(cancelled))
        } else {
            Effect::none()
        };

        // Step 5: merge in order (the pure transition above never itself
        // produces an effect).
        child_effect.merge(launch_or_cancel)
    }
}
