//! Cross-task rendezvous between the UI and background work.
//!
//! A background task holds a [`Handle`]: it can [`push`](Handle::push) state
//! snapshots into the UI at any time, and it can [`ask`](Handle::ask) a
//! question and *block* until a component answers. The component side reads
//! the pushed state and the pending question out of ordinary hooks, renders
//! a prompt, and calls [`Bridge::submit`] with the answer, which wakes the
//! blocked task.
//!
//! The rendezvous is a bounded channel of size one: an answer is deliverable
//! exactly once, and a second submit is a no-op.

use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};

use crate::hooks::{use_state, State};
use crate::scope::Scope;

// ---------------------------------------------------------------------------
// Pending
// ---------------------------------------------------------------------------

struct PendingInner<Q, A> {
    question: Q,
    /// Taken on first submit so the answer is delivered at most once.
    tx: Mutex<Option<SyncSender<A>>>,
}

/// An outstanding question from a background task.
///
/// Clones share the same rendezvous; equality is identity, so storing a
/// `Pending` in a state cell only counts as a change when a *new* question
/// arrives.
pub struct Pending<Q, A> {
    inner: Arc<PendingInner<Q, A>>,
}

impl<Q, A> Clone for Pending<Q, A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<Q, A> PartialEq for Pending<Q, A> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<Q, A> Pending<Q, A> {
    /// The question being asked.
    pub fn question(&self) -> &Q {
        &self.inner.question
    }

    /// Deliver the answer, waking the blocked asker. Only the first submit
    /// on a question delivers; later ones are no-ops.
    pub fn submit(&self, answer: A) {
        let tx = self
            .inner
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = tx {
            // The asker may have given up waiting; nothing to do then.
            let _ = tx.send(answer);
        }
    }
}

impl<Q: std::fmt::Debug, A> std::fmt::Debug for Pending<Q, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending").field("question", &self.inner.question).finish()
    }
}

// ---------------------------------------------------------------------------
// Bridge / Handle
// ---------------------------------------------------------------------------

/// The component side of the rendezvous. Returned by [`use_bridge`].
pub struct Bridge<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    state: State<S>,
    interaction: State<Option<Pending<Q, A>>>,
}

impl<S, Q, A> Bridge<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    /// The latest pushed state snapshot.
    pub fn state(&self) -> S {
        self.state.get()
    }

    /// The outstanding question, if a task is blocked waiting.
    pub fn pending(&self) -> Option<Pending<Q, A>> {
        self.interaction.get()
    }

    /// Answer the outstanding question (if any), waking the asker and
    /// clearing the pending slot.
    pub fn submit(&self, answer: A) {
        if let Some(pending) = self.interaction.get() {
            pending.submit(answer);
            self.interaction.set(None);
        }
    }

    /// A cloneable handle for the background side.
    pub fn handle(&self) -> Handle<S, Q, A> {
        Handle {
            state: self.state.clone(),
            interaction: self.interaction.clone(),
        }
    }
}

/// The background-task side of the rendezvous.
///
/// Cheap to clone and sendable across threads and tasks.
pub struct Handle<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    state: State<S>,
    interaction: State<Option<Pending<Q, A>>>,
}

impl<S, Q, A> Clone for Handle<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            interaction: self.interaction.clone(),
        }
    }
}

impl<S, Q, A> Handle<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Push a state snapshot into the UI and request a redraw. Pushing an
    /// unchanged snapshot is a no-op.
    pub fn push(&self, state: S) {
        self.state.set(state);
    }

    /// Ask a question and block until a component answers.
    ///
    /// Returns `None` if the UI goes away without answering. Must be called
    /// from a background thread or blocking task, never from the render
    /// thread, which is the only thing that can answer.
    pub fn ask(&self, question: Q) -> Option<A> {
        let (tx, rx) = sync_channel(1);
        let pending = Pending {
            inner: Arc::new(PendingInner { question, tx: Mutex::new(Some(tx)) }),
        };
        self.interaction.set(Some(pending));
        rx.recv().ok()
    }
}

/// A bridge anchored on this scope.
///
/// Backed by two state cells under fixed keys, so one scope hosts at most
/// one bridge; mount several child scopes for several bridges.
pub fn use_bridge<S, Q, A>(scope: &Scope, initial: S) -> Bridge<S, Q, A>
where
    S: Clone + PartialEq + Send + 'static,
    Q: Send + Sync + 'static,
    A: Send + 'static,
{
    let state = use_state(scope, "bridge_state", initial);
    let interaction = use_state(scope, "bridge_interaction", None::<Pending<Q, A>>);
    Bridge { state, interaction }
}

// ===========================================================================
// Tests
// ===========================================================================
