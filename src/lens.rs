//! Explicit getter/setter and construct/match pairs used to project a
//! host's state/action types down to the types this crate operates on.
//!
//! These are plain closures rather than a derive-macro lens/prism, per the
//! crate's host-framework-agnostic design: a host wires its own state shape
//! in by providing these functions. Both are backed by `Arc` rather than
//! `Box` so they can be cheaply cloned into the `'static` futures that
//! carry load results back to the reducer.

use std::sync::Arc;

/// A getter/setter pair focusing on one field of a larger state type `S`.
#[derive(Clone)]
pub struct Lens<S, F> {
    get: Arc<dyn Fn(&S) -> &F + Send + Sync>,
    get_mut: Arc<dyn Fn(&mut S) -> &mut F + Send + Sync>,
}

impl<S, F> Lens<S, F> {
    pub fn new(
        get: impl Fn(&S) -> &F + Send + Sync + 'static,
        get_mut: impl Fn(&mut S) -> &mut F + Send + Sync + 'static,
    ) -> Self {
        Self { get: Arc::new(get), get_mut: Arc::new(get_mut) }
    }

    pub fn get<'s>(&self, state: &'s S) -> &'s F {
        (self.get)(state)
    }

    pub fn get_mut<'s>(&self, state: &'s mut S) -> &'s mut F {
        (self.get_mut)(state)
    }
}

/// A construct/match pair projecting one case of a larger sum type `A` down
/// to a narrower case type `C`, the action-side analogue of [`Lens`].
pub struct Prism<A, C> {
    extract: Arc<dyn Fn(&A) -> Option<&C> + Send + Sync>,
    extract_owned: Arc<dyn Fn(A) -> Result<C, A> + Send + Sync>,
    embed: Arc<dyn Fn(C) -> A + Send + Sync>,
}

impl<A, C> Clone for Prism<A, C> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            extract_owned: self.extract_owned.clone(),
            embed: self.embed.clone(),
        }
    }
}

impl<A, C> Prism<A, C> {
    pub fn new(
        extract: impl Fn(&A) -> Option<&C> + Send + Sync + 'static,
        extract_owned: impl Fn(A) -> Result<C, A> + Send + Sync + 'static,
        embed: impl Fn(C) -> A + Send + Sync + 'static,
    ) -> Self {
        Self {
            extract: Arc::new(extract),
            extract_owned: Arc::new(extract_owned),
            embed: Arc::new(embed),
        }
    }

    /// Attempts to view `action` as the narrower case, by reference.
    pub fn extract<'a>(&self, action: &'a A) -> Option<&'a C> {
        (self.extract)(action)
    }

    /// Attempts to move `action` into the narrower case, returning it
    /// unchanged on mismatch.
    pub fn extract_owned(&self, action: A) -> Result<C, A> {
        (self.extract_owned)(action)
    }

    /// Builds the wider action from the narrower case.
    pub fn embed(&self, case: C) -> A {
        (self.embed)(case)
    }
}
