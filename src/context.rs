//! Tree-scoped values.
//!
//! A [`Context`] carries a typed value down a subtree without threading it
//! through every component's arguments. A provider stores the value on its
//! scope for the duration of the render; [`use_context`] walks up the parent
//! chain and returns the nearest provided value, or the context's default.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::node::Node;
use crate::scope::Scope;

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A typed channel through the component tree.
///
/// Create one per concern (theme, session, ...) and share it between the
/// providing and consuming components. Identity is per `Context` value, not
/// per type: two contexts over the same `T` are independent.
pub struct Context<T> {
    key: String,
    default: T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Context<T>
where
    T: Clone + Send + 'static,
{
    /// Create a context that yields `default` where no provider is mounted.
    pub fn new(default: T) -> Self {
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            key: format!("ctx#{id}"),
            default,
            _marker: PhantomData,
        }
    }

    /// Provide `value` to everything rendered inside `children`.
    ///
    /// The value is stored on `scope` for this render only (provider scopes
    /// re-provide on every render), so `children` is a closure: descendants
    /// must build *after* the value is in place.
    pub fn provide(&self, scope: &Scope, value: T, children: impl FnOnce() -> Node) -> Node {
        scope.tree.with_record(scope.id, |record| {
            record.context_values.insert(self.key.clone(), Box::new(value));
        });
        children()
    }
}

/// The nearest provided value for `context` above (or on) this scope, or the
/// context's default.
pub fn use_context<T>(scope: &Scope, context: &Context<T>) -> T
where
    T: Clone + Send + 'static,
{
    scope
        .tree
        .lookup_context(scope.id, &context.key, |any| any.downcast_ref::<T>().cloned())
        .unwrap_or_else(|| context.default.clone())
}

// ===========================================================================
// Tests
// ===========================================================================
