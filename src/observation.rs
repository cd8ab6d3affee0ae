//! An abstract "notify on mutation" hook, so a UI layer can bridge a
//! loadable into whatever reactive/signal system it uses without this
//! crate depending on one itself.

use std::sync::{Mutex, RwLock};

/// A value paired with a registry of callbacks invoked after every
/// mutation, generalizing the teacher's pause/resume callback pair
/// (`Callback<()>`) into a framework-neutral observer list.
pub struct Observable<V> {
    value: RwLock<V>,
    listeners: Mutex<Vec<Box<dyn Fn(&V) + Send + Sync>>>,
}

impl<V> Observable<V> {
    pub fn new(value: V) -> Self {
        Self { value: RwLock::new(value), listeners: Mutex::new(Vec::new()) }
    }

    /// Registers `callback` to run, with the new value, after every
    /// subsequent `mutate`/`set`. Does not run for the current value.
    pub fn on_mutate(&self, callback: impl Fn(&V) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(callback));
    }

    pub fn get(&self) -> std::sync::RwLockReadGuard<'_, V> {
        self.value.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the value and notifies every registered listener.
    pub fn set(&self, value: V) {
        {
            let mut guard = self.value.write().unwrap_or_else(|e| e.into_inner());
            *guard = value;
        }
        self.notify();
    }

    /// Mutates the value in place via `f`, then notifies every listener.
    pub fn mutate(&self, f: impl FnOnce(&mut V)) {
        {
            let mut guard = self.value.write().unwrap_or_else(|e| e.into_inner());
            f(&mut guard);
        }
        self.notify();
    }

    fn notify(&self) {
        let guard = self.value.read().unwrap_or_else(|e| e.into_inner());
        for listener in self.listeners.lock().unwrap_or_else(|e| e.into_inner()).iter() {
            listener(&guard);
        }
    }
}
