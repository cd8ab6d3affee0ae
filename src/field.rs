//! A small property-wrapper convenience over [`LoadableValue`], generalizing
//! the source design's property wrapper: reading yields the current value,
//! a sibling accessor yields the full state union.

use crate::loadable::LoadableValue;

/// Wraps a `LoadableValue<V>` so call sites that only care about "what's
/// the value right now" don't need to match on the lifecycle state
/// themselves.
#[derive(Clone, Debug, Default)]
pub struct LoadableField<V> {
    state: LoadableValue<V>,
}

impl<V> LoadableField<V> {
    pub fn new(state: LoadableValue<V>) -> Self {
        Self { state }
    }

    /// The current value, if any (from `Loaded` or a reloading `Loading`).
    pub fn value(&self) -> Option<&V> {
        self.state.current_value().map(std::ops::Deref::deref)
    }

    /// The full lifecycle state.
    pub fn state(&self) -> &LoadableValue<V> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LoadableValue<V> {
        &mut self.state
    }

    /// Forces `Loaded { value: Some(v), is_stale: false }`, discarding
    /// whatever the prior state was.
    pub fn set_value(&mut self, value: V) {
        self.state.loaded(Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_forces_loaded_not_stale() {
        let mut field = LoadableField::default();
        field.state_mut().ready_to_load();
        field.set_value(5);
        assert_eq!(field.value(), Some(&5));
        assert!(!field.state().is_stale());
    }
}
