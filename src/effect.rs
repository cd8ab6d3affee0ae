//! A cancellable, mergeable description of the async work a reducer pass
//! wants performed, plus the cancel-in-flight bookkeeping that keyed
//! loadables use to make "start a new load cancels the old one" true.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Identifies one loadable path within a host state tree. Reducers are
/// expected to use a fixed string per `LoadableValue` field they own, e.g.
/// `PathId("profile")`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub &'static str);

/// Identifies one in-flight task registered under a [`PathId`]. Only the
/// most recently registered task for a given path is considered current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskId(u64);

/// A description of work a reducer pass wants carried out: sending an
/// action straight back in, running a cancellable async task whose result
/// becomes an action, cancelling a path's current task, or some
/// combination of the above.
///
/// Building an `Effect` never runs anything; it is inert data until handed
/// to [`Effect::run`].
pub enum Effect<A> {
    /// No work.
    None,
    /// Dispatch `action` immediately, with no async step.
    Send(A),
    /// Run `future` to completion unless the task registered under `path`
    /// is superseded first, then dispatch its result.
    Task { path: PathId, future: BoxFuture<'static, A> },
    /// Cancel whatever task is currently registered under `path`, if any.
    Cancel(PathId),
    /// Run every effect in `effects`, independently.
    Merge(Vec<Effect<A>>),
}

impl<A> Effect<A> {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn send(action: A) -> Self {
        Effect::Send(action)
    }

    pub fn task(path: PathId, future: impl std::future::Future<Output = A> + Send + 'static) -> Self {
        Effect::Task { path, future: Box::pin(future) }
    }

    pub fn cancel(path: PathId) -> Self {
        Effect::Cancel(path)
    }

    /// Combines `self` and `other` into a single effect that runs both.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Effect::None, other) => other,
            (this, Effect::None) => this,
            (Effect::Merge(mut a), Effect::Merge(b)) => {
                a.extend(b);
                Effect::Merge(a)
            }
            (Effect::Merge(mut a), other) => {
                a.push(other);
                Effect::Merge(a)
            }
            (this, Effect::Merge(mut b)) => {
                b.insert(0, this);
                Effect::Merge(b)
            }
            (a, b) => Effect::Merge(vec![a, b]),
        }
    }

    pub fn merge_many(effects: impl IntoIterator<Item = Self>) -> Self {
        effects.into_iter().fold(Effect::None, Effect::merge)
    }
}

impl<A: Send + 'static> Effect<A> {
    /// Executes this effect. Immediate actions are dispatched synchronously
    /// through `dispatch`; tasks are spawned onto the current tokio runtime
    /// and dispatch their result asynchronously, unless cancelled first.
    pub fn run(self, registry: &TaskRegistry, dispatch: impl Fn(A) + Send + Sync + Clone + 'static) {
        match self {
            Effect::None => {}
            Effect::Send(action) => dispatch(action),
            Effect::Cancel(path) => registry.cancel(path),
            Effect::Task { path, future } => {
                let (task_id, token) = registry.register(path);
                let registry = registry.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            log::trace!("task for {path:?} cancelled before completion");
                        }
                        action = future => {
                            if registry.is_current(path, task_id) {
                                dispatch(action);
                            } else {
                                log::trace!("task for {path:?} completed after being superseded");
                            }
                        }
                    }
                });
            }
            Effect::Merge(effects) => {
                for effect in effects {
                    effect.run(registry, dispatch.clone());
                }
            }
        }
    }
}

/// Tracks, per [`PathId`], the single task that is allowed to complete.
/// Registering a new task for a path cancels whatever was registered
/// before it, which is how "starting a new load supersedes the old one"
/// is enforced.
#[derive(Clone)]
pub struct TaskRegistry {
    next_id: std::sync::Arc<AtomicU64>,
    inner: std::sync::Arc<Mutex<HashMap<PathId, (TaskId, CancellationToken)>>>,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self { next_id: Default::default(), inner: Default::default() }
    }

    /// Registers a new task for `path`, cancelling and evicting whatever
    /// task was previously registered for it. Returns the new task's id and
    /// the token it should select against.
    pub fn register(&self, path: PathId) -> (TaskId, CancellationToken) {
        let task_id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, old_token)) = guard.insert(path, (task_id, token.clone())) {
            old_token.cancel();
        }
        (task_id, token)
    }

    /// Cancels and evicts whatever task is currently registered for `path`.
    pub fn cancel(&self, path: PathId) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, token)) = guard.remove(&path) {
            token.cancel();
        }
    }

    /// Whether `task_id` is still the task most recently registered for
    /// `path`. A completed task should check this before dispatching its
    /// result if it wants to guard against the late-completion race itself.
    pub fn is_current(&self, path: PathId, task_id: TaskId) -> bool {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        matches!(guard.get(&path), Some((current, _)) if *current == task_id)
    }
}

impl std::fmt::Debug for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PathId({:?})", self.0)
    }
}
