//! The four-state lifecycle of a value produced by an asynchronous load.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A value whose lifecycle is driven by an asynchronous load.
///
/// Every method here is total: whatever variant `self` is in, the method
/// produces a well-defined result. There is no reachable panic in this type.
///
/// Loaded values are held behind `Arc` rather than by value, so carrying a
/// value across a reload (`Loading.prior`) or into a completion action is a
/// pointer clone regardless of whether `V` itself is `Clone`.
///
/// ```text
/// NotLoaded{f=false} --ready_to_load/trigger--> NotLoaded{true} --reducer pass--> Loading{none}
/// Loaded{v,stale=false} --mark_as_stale/trigger--> Loaded{v,stale=true} --reducer pass--> Loading{v}
/// Loading{v?} --task.ok(v')--> Loaded{v',false}
/// Loading{v?} --task.err(non-cancel)--> Failed
/// Loading{v?} --task.cancel--> (variant set by inner reducer or unchanged)
/// Loaded{v,_} --unload--> NotLoaded{false}
/// any --unload--> NotLoaded{false}
/// Failed --ready_to_load--> NotLoaded{true}
/// ```
#[derive(Serialize, Deserialize)]
pub enum LoadableValue<V> {
    /// Not loaded yet. `ready_to_load` is the resting-state flag the
    /// reducer watches to decide whether a load is due.
    NotLoaded {
        /// When true, the reducer starts a load on its next pass.
        ready_to_load: bool,
    },
    /// A load is in flight. `prior` preserves the previously loaded value
    /// so a UI may keep displaying it while the reload runs.
    Loading {
        /// The value that was loaded before this reload started, if any.
        prior: Option<Arc<V>>,
    },
    /// A load completed. `value` is optional because a successful load may
    /// legitimately yield no data. `is_stale` requests a reload without
    /// discarding `value`.
    Loaded {
        /// The most recently loaded value, or `None` if the load succeeded
        /// with no data.
        value: Option<Arc<V>>,
        /// When true, the reducer starts a reload on its next pass while
        /// keeping `value` displayed in the meantime.
        is_stale: bool,
    },
    /// The most recent load failed with a non-cancellation error.
    ///
    /// No error payload is carried here (see [`crate::error::LoadError`]).
    /// Consumers that need the error must
    /// capture it from the completion action in their own reducer before
    /// the engine settles into this variant.
    Failed,
}

impl<V> Clone for LoadableValue<V> {
    fn clone(&self) -> Self {
        match self {
            LoadableValue::NotLoaded { ready_to_load } => {
                LoadableValue::NotLoaded { ready_to_load: *ready_to_load }
            }
            LoadableValue::Loading { prior } => LoadableValue::Loading { prior: prior.clone() },
            LoadableValue::Loaded { value, is_stale } => {
                LoadableValue::Loaded { value: value.clone(), is_stale: *is_stale }
            }
            LoadableValue::Failed => LoadableValue::Failed,
        }
    }
}

impl<V> std::fmt::Debug for LoadableValue<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadableValue::NotLoaded { ready_to_load } => {
                write!(f, "NotLoaded {{ ready_to_load: {ready_to_load} }}")
            }
            LoadableValue::Loading { prior } => {
                write!(f, "Loading {{ prior: {} }}", if prior.is_some() { "Some(_)" } else { "None" })
            }
            LoadableValue::Loaded { value, is_stale } => write!(
                f,
                "Loaded {{ value: {}, is_stale: {is_stale} }}",
                if value.is_some() { "Some(_)" } else { "None" }
            ),
            LoadableValue::Failed => write!(f, "Failed"),
        }
    }
}

impl<V> Default for LoadableValue<V> {
    fn default() -> Self {
        LoadableValue::NotLoaded { ready_to_load: false }
    }
}

impl<V: PartialEq> PartialEq for LoadableValue<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                LoadableValue::NotLoaded { ready_to_load: a },
                LoadableValue::NotLoaded { ready_to_load: b },
            ) => a == b,
            (LoadableValue::Loading { prior: a }, LoadableValue::Loading { prior: b }) => a == b,
            (
                LoadableValue::Loaded { value: av, is_stale: asr },
                LoadableValue::Loaded { value: bv, is_stale: bsr },
            ) => av == bv && asr == bsr,
            (LoadableValue::Failed, LoadableValue::Failed) => true,
            _ => false,
        }
    }
}

impl<V> LoadableValue<V> {
    /// Creates a loaded value, the non-default constructor used when a
    /// loadable is seeded with data up front.
    pub fn with_value(value: V) -> Self {
        LoadableValue::Loaded { value: Some(Arc::new(value)), is_stale: false }
    }

    // --- Derived views -------------------------------------------------

    /// The most recently known value, from either `Loaded` or a reloading
    /// `Loading`. `None` in `NotLoaded`, `Failed`, or an initial `Loading`.
    pub fn current_value(&self) -> Option<&Arc<V>> {
        match self {
            LoadableValue::Loaded { value: Some(v), .. } => Some(v),
            LoadableValue::Loading { prior: Some(v) } => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadableValue::Loading { .. })
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadableValue::Loaded { .. })
    }

    #[inline]
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, LoadableValue::NotLoaded { .. })
    }

    #[inline]
    pub fn has_failed(&self) -> bool {
        matches!(self, LoadableValue::Failed)
    }

    /// A reload is in flight and there is already a value to show for it.
    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.is_loading() && self.current_value().is_some()
    }

    /// A load is in flight and there is nothing to show for it yet.
    #[inline]
    pub fn is_performing_initial_load(&self) -> bool {
        self.is_loading() && self.current_value().is_none()
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        matches!(self, LoadableValue::Loaded { is_stale: true, .. })
    }

    #[inline]
    pub fn is_ready_to_load(&self) -> bool {
        matches!(self, LoadableValue::NotLoaded { ready_to_load: true })
    }

    /// The sole predicate the reducer inspects to decide whether a
    /// state-driven load is due.
    #[inline]
    pub fn requires_loading(&self) -> bool {
        self.is_stale() || self.is_ready_to_load()
    }

    // --- Pure transitions ------------------------------------------------

    /// Moves the current value out of `self`, leaving `self` momentarily in
    /// the default `NotLoaded{false}` placeholder. Every call site
    /// overwrites `self` with the real target variant immediately after, so
    /// the placeholder is never observable.
    fn take_value(&mut self) -> Option<Arc<V>> {
        match std::mem::replace(self, LoadableValue::NotLoaded { ready_to_load: false }) {
            LoadableValue::Loaded { value, .. } => value,
            LoadableValue::Loading { prior } => prior,
            _ => None,
        }
    }

    /// Unconditionally resets to the resting state, discarding any value.
    pub fn unload(&mut self) {
        *self = LoadableValue::NotLoaded { ready_to_load: false };
    }

    /// Unconditionally arms a load on the next reducer pass, discarding any
    /// value. To refresh without discarding, use [`Self::mark_as_stale`].
    pub fn ready_to_load(&mut self) {
        *self = LoadableValue::NotLoaded { ready_to_load: true };
    }

    /// Requests a reload that keeps the current value visible in the
    /// meantime. Idempotent when already stale. Outside `Loaded`/`Loading`
    /// this falls back to arming a fresh load, since there is no value to
    /// preserve.
    pub fn mark_as_stale(&mut self) {
        let preserves_value =
            matches!(self, LoadableValue::Loaded { .. } | LoadableValue::Loading { .. });
        let value = self.take_value();
        *self = if preserves_value {
            LoadableValue::Loaded { value, is_stale: true }
        } else {
            LoadableValue::NotLoaded { ready_to_load: true }
        };
    }

    /// Enters the in-flight state. When `with_current_value` is true the
    /// existing value (from `Loaded` or a prior `Loading`) is preserved as
    /// `prior`; otherwise the load starts "from nothing".
    pub fn loading(&mut self, with_current_value: bool) {
        let prior = if with_current_value { self.take_value() } else { None };
        *self = LoadableValue::Loading { prior };
    }

    /// Records a successful completion.
    pub fn loaded(&mut self, value: Option<V>) {
        *self = LoadableValue::Loaded { value: value.map(Arc::new), is_stale: false };
    }

    /// Records a non-cancellation failure. No payload is stored; see the
    /// module docs.
    pub fn failed(&mut self) {
        *self = LoadableValue::Failed;
    }
}
