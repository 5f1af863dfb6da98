//! The hooks API.
//!
//! Component functions receive a [`Scope`] and call these free functions to
//! get persistent memory across renders:
//!
//! - [`use_state`] — a typed cell addressed by an explicit string key, so it
//!   is safe inside conditionals and loops
//! - [`use_effect`] — a side effect gated on a deps value, with an optional
//!   cleanup that runs before the next execution
//! - [`use_memo`] — a cached computation gated on a deps value
//! - [`use_ref`] — a mutable slot whose writes never trigger a redraw
//! - [`use_key`], [`use_mouse`] — per-component input handlers, replaced
//!   wholesale every render
//!
//! Effects, memos and refs are addressed by call order within a render, so
//! they must not be called conditionally. Deps are compared by `PartialEq`
//! through a type-erased box; a deps *type* change between renders counts as
//! changed.

use std::sync::{Arc, Mutex, PoisonError};

use crate::scope::{Cleanup, EffectSlot, MemoSlot, Scope};

// ---------------------------------------------------------------------------
// use_state
// ---------------------------------------------------------------------------

/// A handle to one state cell.
///
/// Holds a snapshot of the value as of the `use_state` call plus enough to
/// write back later. Cloneable and sendable, so it can move into effect
/// bodies, input handlers and background tasks.
#[derive(Clone)]
pub struct State<T> {
    value: T,
    scope: Scope,
    key: String,
}

impl<T> State<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// The snapshot taken when `use_state` ran, by value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// The snapshot taken when `use_state` ran, by reference.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Write a new value and request a redraw.
    ///
    /// Compares against the value *currently stored* in the cell (not this
    /// handle's snapshot); writing an equal value is a no-op and does not
    /// schedule a render.
    pub fn set(&self, value: T) {
        let changed = self.scope.tree.with_record(self.scope.id, |record| {
            match record.states.get(&self.key).and_then(|c| c.downcast_ref::<T>()) {
                Some(current) if *current == value => false,
                _ => {
                    record.states.insert(self.key.clone(), Box::new(value));
                    true
                }
            }
        });
        if changed {
            self.scope.refresh();
        }
    }

    /// Write a value derived from the currently stored one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.scope.tree.with_record(self.scope.id, |record| {
            record
                .states
                .get(&self.key)
                .and_then(|c| c.downcast_ref::<T>())
                .cloned()
        });
        let base = current.unwrap_or_else(|| self.value.clone());
        self.set(f(&base));
    }
}

/// A state cell addressed by `key` within this scope.
///
/// The first render stores `initial`; later renders return the stored value
/// and ignore `initial`. If the type under `key` changes between renders the
/// cell is reinitialized.
pub fn use_state<T>(scope: &Scope, key: &str, initial: T) -> State<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    let value = scope.tree.with_record(scope.id, |record| {
        if let Some(current) = record.states.get(key).and_then(|c| c.downcast_ref::<T>()) {
            return current.clone();
        }
        record.states.insert(key.to_string(), Box::new(initial.clone()));
        initial
    });
    State {
        value,
        scope: scope.clone(),
        key: key.to_string(),
    }
}

// ---------------------------------------------------------------------------
// use_effect
// ---------------------------------------------------------------------------

/// Run `f` when `deps` differ from the previous render (always on the first).
///
/// `f` may return a cleanup that runs before the effect's next execution,
/// or at runtime teardown if the effect never runs again. The previous
/// cleanup and the body both execute outside the tree lock, so they may call
/// any hooks API.
pub fn use_effect<D, F>(scope: &Scope, f: F, deps: D)
where
    D: PartialEq + Send + 'static,
    F: FnOnce() -> Option<Cleanup>,
{
    let (index, run, previous_cleanup) = scope.tree.with_record(scope.id, |record| {
        let index = record.effect_cursor;
        record.effect_cursor += 1;
        if record.effects.len() <= index {
            record.effects.push(EffectSlot { deps: None, cleanup: None, ran: false });
        }
        let slot = &mut record.effects[index];
        let unchanged = slot.ran
            && slot
                .deps
                .as_ref()
                .and_then(|d| d.downcast_ref::<D>())
                .is_some_and(|d| *d == deps);
        if unchanged {
            return (index, false, None);
        }
        slot.deps = Some(Box::new(deps));
        slot.ran = true;
        (index, true, slot.cleanup.take())
    });

    if !run {
        return;
    }
    if let Some(cleanup) = previous_cleanup {
        cleanup();
    }
    let next_cleanup = f();
    scope.tree.with_record(scope.id, |record| {
        record.effects[index].cleanup = next_cleanup;
    });
}

// ---------------------------------------------------------------------------
// use_memo
// ---------------------------------------------------------------------------

/// A cached computation, recomputed only when `deps` differ from the
/// previous render.
pub fn use_memo<T, D, F>(scope: &Scope, f: F, deps: D) -> T
where
    T: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce() -> T,
{
    let (index, cached) = scope.tree.with_record(scope.id, |record| {
        let index = record.memo_cursor;
        record.memo_cursor += 1;
        if record.memos.len() <= index {
            record.memos.push(None);
        }
        let cached = record.memos[index].as_ref().and_then(|slot| {
            let hit = slot.deps.downcast_ref::<D>().is_some_and(|d| *d == deps);
            if hit {
                slot.value.downcast_ref::<T>().cloned()
            } else {
                None
            }
        });
        (index, cached)
    });

    if let Some(value) = cached {
        return value;
    }
    let value = f();
    scope.tree.with_record(scope.id, |record| {
        record.memos[index] = Some(MemoSlot {
            deps: Box::new(deps),
            value: Box::new(value.clone()),
        });
    });
    value
}

// ---------------------------------------------------------------------------
// use_ref
// ---------------------------------------------------------------------------

/// A shared mutable slot. Unlike [`State`], writes never request a redraw.
pub struct Ref<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Send + 'static> Ref<T> {
    /// Read the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the value. Does not request a redraw.
    pub fn set(&self, value: T) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Run `f` with mutable access to the value.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A mutable slot that keeps its identity across renders.
///
/// The same [`Ref`] (same backing allocation) is returned on every render.
pub fn use_ref<T>(scope: &Scope, initial: T) -> Ref<T>
where
    T: Send + 'static,
{
    scope.tree.with_record(scope.id, |record| {
        let index = record.ref_cursor;
        record.ref_cursor += 1;
        if index < record.refs.len() {
            if let Some(inner) = record.refs[index].downcast_ref::<Arc<Mutex<T>>>() {
                return Ref { inner: Arc::clone(inner) };
            }
        }
        // Missing slot, or its type changed; (re)initialize.
        let inner = Arc::new(Mutex::new(initial));
        if index < record.refs.len() {
            record.refs[index] = Box::new(Arc::clone(&inner));
        } else {
            record.refs.push(Box::new(Arc::clone(&inner)));
        }
        Ref { inner }
    })
}

// ---------------------------------------------------------------------------
// use_key / use_mouse
// ---------------------------------------------------------------------------

/// Install this component's keyboard handler for the current render.
///
/// Handlers are dropped at the start of every render, so each render installs
/// a fresh closure over current values. At most one handler per scope; a
/// second call in the same render replaces the first.
pub fn use_key(scope: &Scope, handler: impl FnMut(&crate::event::KeyEvent) + Send + 'static) {
    scope.tree.with_record(scope.id, |record| {
        record.key_handler = Some(Box::new(handler));
    });
}

/// Install this component's pointer handler for the current render.
///
/// Pointer events are broadcast; handlers test containment against
/// [`Scope::rect`] themselves.
pub fn use_mouse(scope: &Scope, handler: impl FnMut(&crate::event::MouseEvent) + Send + 'static) {
    scope.tree.with_record(scope.id, |record| {
        record.mouse_handler = Some(Box::new(handler));
    });
}

// ===========================================================================
// Tests
// ===========================================================================
