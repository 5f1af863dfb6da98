//! Focus traversal.
//!
//! Focusable components register themselves during every render, in render
//! order, under their stable scope path. The [`FocusManager`] keeps the
//! ordered ring and the currently focused key; Tab/BackTab walk the ring
//! circularly. Because registrations are wiped and rebuilt each render, a
//! component that stops rendering simply drops out of the ring, and
//! [`FocusManager::finish_rebuild`] re-seats focus if the focused component
//! disappeared.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::event::{MouseButton, MouseKind};
use crate::hooks::use_mouse;
use crate::scope::{Scope, ScopeId};

// ---------------------------------------------------------------------------
// FocusManager
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FocusInner {
    /// Registration order of the current render.
    order: Vec<String>,
    owners: HashMap<String, ScopeId>,
    current: Option<String>,
}

/// Ordered ring of focusable components.
pub struct FocusManager {
    inner: Mutex<FocusInner>,
}

impl FocusManager {
    pub(crate) fn new() -> Self {
        Self { inner: Mutex::new(FocusInner::default()) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FocusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `key` for this render. First registration with no focused
    /// component grabs focus.
    pub(crate) fn register(&self, key: &str, owner: ScopeId) {
        let mut inner = self.lock();
        if !inner.owners.contains_key(key) {
            inner.order.push(key.to_string());
            inner.owners.insert(key.to_string(), owner);
        }
        if inner.current.is_none() {
            inner.current = Some(key.to_string());
        }
    }

    /// Move focus to the next registered component, wrapping at the end.
    pub fn next(&self) {
        self.step(1);
    }

    /// Move focus to the previous registered component, wrapping at the
    /// start.
    pub fn prev(&self) {
        self.step(-1);
    }

    fn step(&self, delta: i32) {
        let mut inner = self.lock();
        if inner.order.is_empty() {
            return;
        }
        let len = inner.order.len() as i32;
        let position = inner
            .current
            .as_ref()
            .and_then(|key| inner.order.iter().position(|k| k == key));
        let next = match position {
            Some(i) => (i as i32 + delta).rem_euclid(len) as usize,
            None => {
                if delta > 0 {
                    0
                } else {
                    (len - 1) as usize
                }
            }
        };
        inner.current = Some(inner.order[next].clone());
        tracing::trace!(focused = %inner.order[next], "focus moved");
    }

    /// Focus `key` directly. Ignored if `key` is not registered.
    pub fn focus(&self, key: &str) {
        let mut inner = self.lock();
        if inner.owners.contains_key(key) {
            inner.current = Some(key.to_string());
        }
    }

    /// Drop focus from `key` if it is the focused component.
    pub fn blur(&self, key: &str) {
        let mut inner = self.lock();
        if inner.current.as_deref() == Some(key) {
            inner.current = None;
        }
    }

    /// Whether `key` is the focused component.
    pub fn is_focused(&self, key: &str) -> bool {
        self.lock().current.as_deref() == Some(key)
    }

    /// The focused key, if any.
    pub fn current(&self) -> Option<String> {
        self.lock().current.clone()
    }

    /// Start a render pass: wipe registrations, keep the focused key so it
    /// can be re-seated once the pass has re-registered everything.
    pub(crate) fn begin_rebuild(&self) {
        let mut inner = self.lock();
        inner.order.clear();
        inner.owners.clear();
    }

    /// End a render pass: if the focused component did not re-register,
    /// fall back to the first registered one (or none).
    pub(crate) fn finish_rebuild(&self) {
        let mut inner = self.lock();
        let still_there = inner
            .current
            .as_ref()
            .is_some_and(|key| inner.owners.contains_key(key));
        if !still_there {
            inner.current = inner.order.first().cloned();
        }
    }
}

// ---------------------------------------------------------------------------
// use_focus
// ---------------------------------------------------------------------------

/// Focus handle returned by [`use_focus`].
#[derive(Clone)]
pub struct FocusState {
    focused: bool,
    key: String,
    scope: Scope,
}

impl FocusState {
    /// Whether this component is focused in the current render.
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// This component's focus key (its scope path).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Grab focus and request a redraw.
    pub fn focus(&self) {
        self.scope.tree.shared.focus.focus(&self.key);
        self.scope.refresh();
    }

    /// Release focus (if held) and request a redraw.
    pub fn blur(&self) {
        self.scope.tree.shared.focus.blur(&self.key);
        self.scope.refresh();
    }
}

/// Make this component focusable.
///
/// Registers the scope in render order and installs a pointer handler so a
/// primary-button click inside the component's last-rendered rectangle moves
/// focus here. Call it every render; traversal order follows render order.
///
/// Installs the scope's pointer handler, so a later [`use_mouse`] on the same
/// scope replaces click-to-focus.
pub fn use_focus(scope: &Scope) -> FocusState {
    let key = scope.path();
    scope.tree.shared.focus.register(&key, scope.id);
    let focused = scope.tree.shared.focus.is_focused(&key);

    let click_scope = scope.clone();
    let click_key = key.clone();
    use_mouse(scope, move |event| {
        if event.kind == MouseKind::Click
            && event.button == MouseButton::Left
            && click_scope.rect().contains(event.x, event.y)
        {
            click_scope.tree.shared.focus.focus(&click_key);
            click_scope.refresh();
        }
    });

    FocusState { focused, key, scope: scope.clone() }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseEvent;
    use crate::geometry::Rect;
    use crate::scope::ScopeTree;

    fn root_scope() -> Scope {
        let (tree, root) = ScopeTree::new();
        Scope::new(root, tree)
    }

    fn manager_with(keys: &[&str]) -> FocusManager {
        let (_tree, id) = ScopeTree::new();
        let manager = FocusManager::new();
        for key in keys {
            manager.register(key, id);
        }
        manager
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn first_registration_grabs_focus() {
        let manager = manager_with(&["a", "b"]);
        assert!(manager.is_focused("a"));
        assert!(!manager.is_focused("b"));
    }

    #[test]
    fn duplicate_registration_keeps_order() {
        let manager = manager_with(&["a", "b", "a"]);
        manager.next();
        assert!(manager.is_focused("b"));
        manager.next();
        assert!(manager.is_focused("a"));
    }

    // ── Traversal ────────────────────────────────────────────────────

    #[test]
    fn next_cycles_circularly() {
        let manager = manager_with(&["a", "b", "c"]);
        manager.next();
        assert!(manager.is_focused("b"));
        manager.next();
        assert!(manager.is_focused("c"));
        manager.next();
        assert!(manager.is_focused("a"));
    }

    #[test]
    fn prev_cycles_circularly() {
        let manager = manager_with(&["a", "b", "c"]);
        manager.prev();
        assert!(manager.is_focused("c"));
        manager.prev();
        assert!(manager.is_focused("b"));
    }

    #[test]
    fn traversal_on_empty_ring_is_a_noop() {
        let manager = FocusManager::new();
        manager.next();
        manager.prev();
        assert_eq!(manager.current(), None);
    }

    #[test]
    fn focus_ignores_unregistered_key() {
        let manager = manager_with(&["a"]);
        manager.focus("ghost");
        assert!(manager.is_focused("a"));
    }

    #[test]
    fn blur_clears_only_when_focused() {
        let manager = manager_with(&["a", "b"]);
        manager.blur("b");
        assert!(manager.is_focused("a"));
        manager.blur("a");
        assert_eq!(manager.current(), None);
    }

    // ── Rebuild ──────────────────────────────────────────────────────

    #[test]
    fn rebuild_keeps_current_when_reregistered() {
        let (tree, root) = ScopeTree::new();
        let manager = FocusManager::new();
        manager.register("a", root);
        manager.register("b", root);
        manager.next();
        assert!(manager.is_focused("b"));

        manager.begin_rebuild();
        manager.register("a", root);
        manager.register("b", root);
        manager.finish_rebuild();
        assert!(manager.is_focused("b"));
        drop(tree);
    }

    #[test]
    fn rebuild_reseats_when_current_disappears() {
        let (tree, root) = ScopeTree::new();
        let manager = FocusManager::new();
        manager.register("a", root);
        manager.register("b", root);
        manager.next();
        assert!(manager.is_focused("b"));

        manager.begin_rebuild();
        manager.register("a", root);
        manager.finish_rebuild();
        assert!(manager.is_focused("a"));
        drop(tree);
    }

    #[test]
    fn rebuild_to_empty_clears_focus() {
        let manager = manager_with(&["a"]);
        manager.begin_rebuild();
        manager.finish_rebuild();
        assert_eq!(manager.current(), None);
    }

    // ── use_focus ────────────────────────────────────────────────────

    #[test]
    fn use_focus_registers_in_render_order() {
        let root = root_scope();
        let first = use_focus(&root.child("first"));
        let second = use_focus(&root.child("second"));
        assert!(first.focused());
        assert!(!second.focused());

        root.tree.shared.focus.next();
        assert!(root.tree.shared.focus.is_focused(second.key()));
    }

    #[test]
    fn click_inside_rect_moves_focus() {
        let root = root_scope();
        let a = root.child("a");
        let b = root.child("b");
        let _fa = use_focus(&a);
        let _fb = use_focus(&b);
        a.record_rect(Rect::new(0, 0, 10, 2));
        b.record_rect(Rect::new(0, 2, 10, 2));

        let click = MouseEvent {
            x: 3,
            y: 3,
            button: MouseButton::Left,
            kind: MouseKind::Click,
        };
        root.tree.dispatch_mouse(root.id, &click);
        assert!(root.tree.shared.focus.is_focused(&b.path()));
    }

    #[test]
    fn click_outside_rect_leaves_focus() {
        let root = root_scope();
        let a = root.child("a");
        let b = root.child("b");
        let _fa = use_focus(&a);
        let _fb = use_focus(&b);
        a.record_rect(Rect::new(0, 0, 10, 2));
        b.record_rect(Rect::new(0, 2, 10, 2));

        let click = MouseEvent {
            x: 50,
            y: 50,
            button: MouseButton::Left,
            kind: MouseKind::Click,
        };
        root.tree.dispatch_mouse(root.id, &click);
        assert!(root.tree.shared.focus.is_focused(&a.path()));
    }

    #[test]
    fn focus_state_focus_and_blur() {
        let root = root_scope();
        let a = use_focus(&root.child("a"));
        let b = use_focus(&root.child("b"));
        b.focus();
        assert!(root.tree.shared.focus.is_focused(b.key()));
        b.blur();
        assert_eq!(root.tree.shared.focus.current(), None);
        drop(a);
    }
}
