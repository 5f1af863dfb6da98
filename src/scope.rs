//! Component identity tree.
//!
//! Every mounted component owns a [`ScopeRecord`] in a slotmap arena: its
//! state cells, effect/memo/ref slots, context values, input handlers and
//! the rectangle it last rendered into. A [`Scope`] is a cheap cloneable
//! handle (arena key plus `Arc` to the tree) that component functions and
//! hooks operate through.
//!
//! Records are addressed by a stable key path: each child is reached through
//! an explicit string key under its parent, so identity survives re-renders,
//! conditionals and reordering. Records are created lazily and never pruned;
//! a component that stops rendering keeps its record (and state) and picks it
//! back up if it renders again.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slotmap::SlotMap;
use tokio::sync::Notify;

use crate::event::{KeyEvent, MouseEvent};
use crate::focus::FocusManager;
use crate::geometry::Rect;
use crate::node::Node;

slotmap::new_key_type! {
    /// Arena key of one component record.
    pub struct ScopeId;
}

/// A deferred effect cleanup.
pub type Cleanup = Box<dyn FnOnce() + Send>;

pub(crate) type KeyHandler = Box<dyn FnMut(&KeyEvent) + Send>;
pub(crate) type MouseHandler = Box<dyn FnMut(&MouseEvent) + Send>;

// ---------------------------------------------------------------------------
// Record storage
// ---------------------------------------------------------------------------

/// One effect slot, addressed by call order within a render.
pub(crate) struct EffectSlot {
    /// Deps of the last run, boxed for comparison against the next render's.
    pub(crate) deps: Option<Box<dyn Any + Send>>,
    pub(crate) cleanup: Option<Cleanup>,
    /// Whether the effect has ever run (first render always runs it).
    pub(crate) ran: bool,
}

/// One memo slot: cached value plus the deps that produced it.
pub(crate) struct MemoSlot {
    pub(crate) deps: Box<dyn Any + Send>,
    pub(crate) value: Box<dyn Any + Send>,
}

/// Per-component storage.
pub(crate) struct ScopeRecord {
    pub(crate) key: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: HashMap<String, ScopeId>,

    /// State cells, addressed by explicit string key.
    pub(crate) states: HashMap<String, Box<dyn Any + Send>>,

    /// Order-addressed slots, with cursors reset at the start of each render.
    pub(crate) effects: Vec<EffectSlot>,
    pub(crate) memos: Vec<Option<MemoSlot>>,
    pub(crate) refs: Vec<Box<dyn Any + Send>>,
    pub(crate) effect_cursor: usize,
    pub(crate) memo_cursor: usize,
    pub(crate) ref_cursor: usize,

    /// Values provided to this subtree, keyed by context identity.
    pub(crate) context_values: HashMap<String, Box<dyn Any + Send>>,

    /// Where this component last rendered. Drives pointer hit testing.
    pub(crate) rect: Rect,

    pub(crate) key_handler: Option<KeyHandler>,
    pub(crate) mouse_handler: Option<MouseHandler>,
}

impl ScopeRecord {
    fn new(key: String, parent: Option<ScopeId>) -> Self {
        Self {
            key,
            parent,
            children: HashMap::new(),
            states: HashMap::new(),
            effects: Vec::new(),
            memos: Vec::new(),
            refs: Vec::new(),
            effect_cursor: 0,
            memo_cursor: 0,
            ref_cursor: 0,
            context_values: HashMap::new(),
            rect: Rect::EMPTY,
            key_handler: None,
            mouse_handler: None,
        }
    }

    /// Prepare the record for a fresh render: rewind the order-addressed
    /// cursors and drop the handlers registered last render. State cells,
    /// effect/memo/ref slots and children all persist.
    pub(crate) fn reset(&mut self) {
        self.effect_cursor = 0;
        self.memo_cursor = 0;
        self.ref_cursor = 0;
        self.key_handler = None;
        self.mouse_handler = None;
        self.context_values.clear();
    }
}

// ---------------------------------------------------------------------------
// Shared runtime signals
// ---------------------------------------------------------------------------

/// Signals and cross-cutting state shared between scopes and the main loop.
pub(crate) struct RuntimeShared {
    /// Coalesced redraw request: `Notify` stores at most one permit, so any
    /// number of refreshes between frames collapses into a single render.
    pub(crate) refresh: Notify,
    pub(crate) quit: Notify,
    pub(crate) quitting: AtomicBool,
    /// Cursor placement requested during the current render pass.
    pub(crate) cursor: Mutex<Option<(i32, i32)>>,
    pub(crate) focus: FocusManager,
}

impl RuntimeShared {
    fn new() -> Self {
        Self {
            refresh: Notify::new(),
            quit: Notify::new(),
            quitting: AtomicBool::new(false),
            cursor: Mutex::new(None),
            focus: FocusManager::new(),
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// ScopeTree
// ---------------------------------------------------------------------------

/// The arena of all component records plus the shared runtime signals.
pub struct ScopeTree {
    // A Mutex rather than an RwLock: record payloads are `Send` but not
    // `Sync`, and exclusive access is what every accessor needs anyway.
    records: Mutex<SlotMap<ScopeId, ScopeRecord>>,
    pub(crate) shared: RuntimeShared,
}

impl ScopeTree {
    /// Create a tree with a root record, returning the tree and the root id.
    pub(crate) fn new() -> (Arc<ScopeTree>, ScopeId) {
        let mut records = SlotMap::with_key();
        let root = records.insert(ScopeRecord::new(String::from("root"), None));
        let tree = Arc::new(ScopeTree {
            records: Mutex::new(records),
            shared: RuntimeShared::new(),
        });
        (tree, root)
    }

    // A render panic can poison the lock while the storage is still
    // perfectly usable, so recover the guard instead of propagating.
    fn lock(&self) -> MutexGuard<'_, SlotMap<ScopeId, ScopeRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with mutable access to one record.
    pub(crate) fn with_record<R>(&self, id: ScopeId, f: impl FnOnce(&mut ScopeRecord) -> R) -> R {
        let mut records = self.lock();
        let record = records
            .get_mut(id)
            .unwrap_or_else(|| unreachable!("scope record never removed"));
        f(record)
    }

    /// Child of `parent` under `key`, created on first use.
    pub(crate) fn child_of(&self, parent: ScopeId, key: &str) -> ScopeId {
        let mut records = self.lock();
        if let Some(&existing) = records[parent].children.get(key) {
            return existing;
        }
        let child = records.insert(ScopeRecord::new(key.to_string(), Some(parent)));
        records[parent].children.insert(key.to_string(), child);
        child
    }

    /// The '/'-joined key path from the root to `id`.
    pub(crate) fn path_of(&self, id: ScopeId) -> String {
        let records = self.lock();
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let record = &records[current];
            parts.push(record.key.clone());
            cursor = record.parent;
        }
        parts.reverse();
        parts.join("/")
    }

    /// Walk up from `id` looking for a context value under `context_key`,
    /// cloning it out via `extract`.
    pub(crate) fn lookup_context<T>(
        &self,
        id: ScopeId,
        context_key: &str,
        extract: impl Fn(&(dyn Any + Send)) -> Option<T>,
    ) -> Option<T> {
        let records = self.lock();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let record = &records[current];
            if let Some(value) = record.context_values.get(context_key) {
                return extract(value.as_ref());
            }
            cursor = record.parent;
        }
        None
    }

    /// Ids of the subtree rooted at `id`, parents before children.
    ///
    /// Children are visited in key order so dispatch is deterministic.
    fn subtree_ids(&self, id: ScopeId) -> Vec<ScopeId> {
        let records = self.lock();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let record = &records[current];
            let mut keys: Vec<&String> = record.children.keys().collect();
            keys.sort();
            // Reverse so the stack pops children in key order.
            for key in keys.into_iter().rev() {
                stack.push(record.children[key]);
            }
        }
        out
    }

    /// Deliver a key event to every registered handler, parents first.
    ///
    /// Handlers are taken out of the record before invocation so they run
    /// without the tree lock held; a handler may freely call hooks APIs.
    pub(crate) fn dispatch_key(&self, root: ScopeId, event: &KeyEvent) {
        for id in self.subtree_ids(root) {
            let handler = self.with_record(id, |r| r.key_handler.take());
            if let Some(mut handler) = handler {
                handler(event);
                self.with_record(id, |r| {
                    if r.key_handler.is_none() {
                        r.key_handler = Some(handler);
                    }
                });
            }
        }
    }

    /// Deliver a pointer event to every registered handler, parents first.
    pub(crate) fn dispatch_mouse(&self, root: ScopeId, event: &MouseEvent) {
        for id in self.subtree_ids(root) {
            let handler = self.with_record(id, |r| r.mouse_handler.take());
            if let Some(mut handler) = handler {
                handler(event);
                self.with_record(id, |r| {
                    if r.mouse_handler.is_none() {
                        r.mouse_handler = Some(handler);
                    }
                });
            }
        }
    }

    /// Run every stored effect cleanup in the subtree, children first.
    /// Called once at runtime teardown.
    pub(crate) fn cleanup_all(&self, root: ScopeId) {
        let mut ids = self.subtree_ids(root);
        ids.reverse();
        for id in ids {
            let cleanups: Vec<Cleanup> = self.with_record(id, |r| {
                r.effects.iter_mut().filter_map(|slot| slot.cleanup.take()).collect()
            });
            for cleanup in cleanups {
                cleanup();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Handle to one component's record.
///
/// Cloning is cheap and handles stay valid for the life of the runtime, so
/// they can be moved into effect bodies, input handlers and background tasks.
#[derive(Clone)]
pub struct Scope {
    pub(crate) id: ScopeId,
    pub(crate) tree: Arc<ScopeTree>,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, tree: Arc<ScopeTree>) -> Self {
        Self { id, tree }
    }

    /// The child scope under `key`, created on first use and reused on every
    /// later render with the same key.
    pub fn child(&self, key: &str) -> Scope {
        let id = self.tree.child_of(self.id, key);
        self.tree.with_record(id, ScopeRecord::reset);
        Scope::new(id, Arc::clone(&self.tree))
    }

    /// A child scope for the `index`-th item of a keyed list.
    pub fn child_indexed(&self, key: &str, index: usize) -> Scope {
        self.child(&format!("{key}[{index}]"))
    }

    /// The '/'-joined key path from the root to this scope. Stable across
    /// renders; used as the focus registration key.
    pub fn path(&self) -> String {
        self.tree.path_of(self.id)
    }

    /// Request a redraw. Safe from any thread; multiple requests between
    /// frames coalesce into one render pass.
    pub fn refresh(&self) {
        self.tree.shared.refresh.notify_one();
    }

    /// Ask the runtime to shut down after the current iteration.
    pub fn quit(&self) {
        self.tree.shared.quitting.store(true, Ordering::SeqCst);
        self.tree.shared.quit.notify_one();
    }

    /// The rectangle this component last rendered into.
    pub fn rect(&self) -> Rect {
        self.tree.with_record(self.id, |r| r.rect)
    }

    /// Request the terminal cursor at an absolute position. The last request
    /// of a render pass wins.
    pub fn set_cursor(&self, x: i32, y: i32) {
        if let Ok(mut slot) = self.tree.shared.cursor.lock() {
            *slot = Some((x, y));
        }
    }

    /// Wrap a node so that rendering it records the drawn rectangle into
    /// this scope, making the component hit-testable.
    pub fn wrap(&self, node: impl Into<Node>) -> Node {
        Node::component(self.clone(), node.into())
    }

    pub(crate) fn record_rect(&self, rect: Rect) {
        self.tree.with_record(self.id, |r| r.rect = rect);
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope").field("path", &self.path()).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, Modifiers};
    use std::sync::atomic::AtomicUsize;

    fn root_scope() -> Scope {
        let (tree, root) = ScopeTree::new();
        Scope::new(root, tree)
    }

    // ── Identity ─────────────────────────────────────────────────────

    #[test]
    fn child_is_reused_across_renders() {
        let root = root_scope();
        let a = root.child("sidebar");
        let b = root.child("sidebar");
        assert_eq!(a.id, b.id);
        let c = root.child("main");
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn indexed_children_are_distinct() {
        let root = root_scope();
        let a = root.child_indexed("row", 0);
        let b = root.child_indexed("row", 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id, root.child_indexed("row", 0).id);
    }

    #[test]
    fn path_joins_keys() {
        let root = root_scope();
        let leaf = root.child("app").child("list").child_indexed("row", 2);
        assert_eq!(leaf.path(), "root/app/list/row[2]");
    }

    // ── Reset ────────────────────────────────────────────────────────

    #[test]
    fn reset_drops_handlers_keeps_state() {
        let root = root_scope();
        let child = root.child("c");
        child.tree.with_record(child.id, |r| {
            r.states.insert("n".into(), Box::new(7i32));
            r.key_handler = Some(Box::new(|_| {}));
            r.effect_cursor = 3;
        });

        // Re-rendering the parent reaches the child through child(), which
        // resets it.
        let child2 = root.child("c");
        child2.tree.with_record(child2.id, |r| {
            assert!(r.key_handler.is_none());
            assert_eq!(r.effect_cursor, 0);
            assert!(r.states.contains_key("n"));
        });
    }

    // ── Rect ─────────────────────────────────────────────────────────

    #[test]
    fn rect_round_trips() {
        let root = root_scope();
        assert_eq!(root.rect(), Rect::EMPTY);
        root.record_rect(Rect::new(1, 2, 3, 4));
        assert_eq!(root.rect(), Rect::new(1, 2, 3, 4));
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    #[test]
    fn key_dispatch_visits_parents_first() {
        let root = root_scope();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        root.tree.with_record(root.id, |r| {
            r.key_handler = Some(Box::new(move |_| o.lock().unwrap().push("root")));
        });
        let child = root.child("a");
        let o = Arc::clone(&order);
        child.tree.with_record(child.id, |r| {
            r.key_handler = Some(Box::new(move |_| o.lock().unwrap().push("a")));
        });

        let event = KeyEvent::new(Key::Enter, Modifiers::NONE);
        root.tree.dispatch_key(root.id, &event);
        assert_eq!(*order.lock().unwrap(), vec!["root", "a"]);
    }

    #[test]
    fn dispatch_orders_siblings_by_key() {
        let root = root_scope();
        let order = Arc::new(Mutex::new(Vec::new()));
        for key in ["b", "a", "c"] {
            let child = root.child(key);
            let o = Arc::clone(&order);
            child.tree.with_record(child.id, |r| {
                r.key_handler = Some(Box::new(move |_| o.lock().unwrap().push(key)));
            });
        }
        let event = KeyEvent::new(Key::Enter, Modifiers::NONE);
        root.tree.dispatch_key(root.id, &event);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn handler_put_back_after_dispatch() {
        let root = root_scope();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        root.tree.with_record(root.id, |r| {
            r.key_handler = Some(Box::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        });
        let event = KeyEvent::new(Key::Enter, Modifiers::NONE);
        root.tree.dispatch_key(root.id, &event);
        root.tree.dispatch_key(root.id, &event);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    // ── Teardown ─────────────────────────────────────────────────────

    #[test]
    fn cleanup_all_runs_children_first() {
        let root = root_scope();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        root.tree.with_record(root.id, |r| {
            r.effects.push(EffectSlot {
                deps: None,
                cleanup: Some(Box::new(move || o.lock().unwrap().push("root"))),
                ran: true,
            });
        });
        let child = root.child("a");
        let o = Arc::clone(&order);
        child.tree.with_record(child.id, |r| {
            r.effects.push(EffectSlot {
                deps: None,
                cleanup: Some(Box::new(move || o.lock().unwrap().push("a"))),
                ran: true,
            });
        });

        root.tree.cleanup_all(root.id);
        assert_eq!(*order.lock().unwrap(), vec!["a", "root"]);
        // Cleanups run at most once.
        root.tree.cleanup_all(root.id);
        assert_eq!(order.lock().unwrap().len(), 2);
    }

    // ── Signals ──────────────────────────────────────────────────────

    #[test]
    fn quit_sets_flag() {
        let root = root_scope();
        assert!(!root.tree.shared.is_quitting());
        root.quit();
        assert!(root.tree.shared.is_quitting());
    }

    #[test]
    fn cursor_request_last_wins() {
        let root = root_scope();
        root.set_cursor(1, 1);
        root.set_cursor(9, 3);
        assert_eq!(*root.tree.shared.cursor.lock().unwrap(), Some((9, 3)));
    }
}
