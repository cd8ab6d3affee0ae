//! A loadable-state coordinator for unidirectional-dataflow applications.
//!
//! This crate is a reusable higher-order reducer for the common shape of
//! "fetch this asynchronously, track where it's at, and redraw when it
//! changes". It plugs into any store/reducer framework that dispatches
//! actions through a pure `reduce(state, action)` function (see
//! [`Reducer`]), and adds:
//!
//! - [`LoadableValue<V>`]: a four-state lifecycle (`NotLoaded`, `Loading`,
//!   `Loaded`, `Failed`) with pure transition methods and derived views
//!   (`is_loading`, `requires_loading`, ...).
//! - [`LoadableReducer`]: wraps a child reducer, inspects state after every
//!   action, and launches, cancels, or ignores an async load accordingly,
//!   at most one task in flight per loadable, cancel-in-flight on every new
//!   attempt.
//! - [`PaginatedLoadableReducer`] and [`PaginatedCollection`] /
//!   [`IdentifiedPaginatedCollection`]: the same machinery specialized to
//!   paginated loads, aggregating a stream of page responses into one
//!   growing, deduplicated collection.
//! - [`PaginatedListReducer`]: an opinionated preset for list UIs,
//!   first-appearance, retry, pull-to-refresh, reached-end-of-page.
//!
//! ## Wiring a loadable
//!
//! You provide a [`Lens`] from your state to a `LoadableValue<V>` field, a
//! [`Prism`] from your action enum to [`LoadableAction`], and an async
//! `load` closure; [`LoadableReducer::new`] does the rest.
//! [`PaginatedLoadableReducer::build`] and [`PaginatedListReducer::build`]
//! are thin layers on top for pagination.
//!
//! ## Cancellation
//!
//! Cancellation is cooperative, via [`TaskRegistry`] and
//! `tokio_util::sync::CancellationToken`. The `load` closure must itself
//! observe the token at its own suspension points. See [`effect`] for
//! details and the documented limitation around externally-aborted tasks.

pub mod action;
pub mod collection;
pub mod effect;
pub mod error;
pub mod field;
pub mod lens;
pub mod list_reducer;
pub mod loadable;
pub mod observation;
pub mod page;
pub mod paginated_reducer;
pub mod reducer;

pub use action::{LoadableAction, LoadingMode};
pub use collection::{Identifiable, IdentifiedPaginatedCollection, PaginatedCollection};
pub use effect::{Effect, PathId, TaskRegistry};
pub use error::LoadError;
pub use field::LoadableField;
pub use lens::{Lens, Prism};
pub use list_reducer::{ListAction, PaginatedListReducer};
pub use loadable::LoadableValue;
pub use observation::Observable;
pub use page::{NumberedPage, OffsetPage, PageSlice, TimestampedPage};
pub use paginated_reducer::PaginatedLoadableReducer;
pub use reducer::{AnimationHint, LoadableReducer, LoadableReducerOptions, Reducer};
