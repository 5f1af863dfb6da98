//! The main loop.
//!
//! [`run`] owns the terminal: it renders the root component, then sits in a
//! `select!` over the quit signal, the coalesced refresh signal and the
//! input channel. Input is read by a dedicated blocking thread (crossterm's
//! `read` has no async form) and forwarded over an unbounded channel.
//!
//! A panic anywhere in a component function or the layout pass is contained
//! at the render boundary: the runtime captures the message and backtrace,
//! switches to a diagnostic screen, and keeps running so the terminal is
//! restored cleanly and Ctrl+C still quits.

use std::backtrace::Backtrace;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Error;
use crate::event::{self, InputEvent, Key, KeyEvent, Modifiers};
use crate::node::Node;
use crate::scope::{Scope, ScopeId, ScopeRecord, ScopeTree};
use crate::style::{Color, Style};
use crate::surface::{CursorTrap, Surface, TermSurface};

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// A contained render-pass fault.
struct Failure {
    message: String,
    backtrace: String,
}

/// The application runtime: root component, identity tree, surface.
///
/// [`run`] drives a `Runtime` over the real terminal. Tests drive one over a
/// [`Buffer`](crate::surface::Buffer) with [`render_once`](Runtime::render_once)
/// and [`dispatch_input`](Runtime::dispatch_input).
pub struct Runtime<S: Surface> {
    root: Box<dyn FnMut(&Scope) -> Node + Send>,
    tree: Arc<ScopeTree>,
    root_id: ScopeId,
    surface: S,
    failure: Option<Failure>,
}

impl<S: Surface> Runtime<S> {
    /// Create a runtime over an arbitrary surface.
    pub fn new(root: impl FnMut(&Scope) -> Node + Send + 'static, surface: S) -> Self {
        let (tree, root_id) = ScopeTree::new();
        Self {
            root: Box::new(root),
            tree,
            root_id,
            surface,
            failure: None,
        }
    }

    /// A handle to the root scope.
    pub fn scope(&self) -> Scope {
        Scope::new(self.root_id, Arc::clone(&self.tree))
    }

    /// The surface, for inspection after [`render_once`](Runtime::render_once).
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a render-pass fault has switched the runtime to its
    /// diagnostic screen.
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// False once the app has asked to quit.
    pub fn is_running(&self) -> bool {
        !self.tree.shared.is_quitting()
    }

    /// Run one full render pass.
    pub fn render_once(&mut self) -> Result<(), Error> {
        self.render_pass()?;
        Ok(())
    }

    fn render_pass(&mut self) -> io::Result<()> {
        self.surface.begin_frame();

        if self.failure.is_some() {
            self.draw_failure();
            return self.surface.end_frame();
        }

        // Cursor requests accumulate during the pass; the last one wins.
        *self
            .tree
            .shared
            .cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        self.tree.shared.focus.begin_rebuild();
        self.tree.with_record(self.root_id, ScopeRecord::reset);

        let tree = Arc::clone(&self.tree);
        let scope = Scope::new(self.root_id, Arc::clone(&tree));
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let node = (self.root)(&scope);
            let (width, height) = self.surface.size();
            let mut trap = CursorTrap::new(&mut self.surface, &tree.shared.cursor);
            node.render(&mut trap, 0, 0, width, height);
        }));

        self.tree.shared.focus.finish_rebuild();

        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            debug!(%message, "render pass panicked; showing diagnostic screen");
            self.failure = Some(Failure {
                message,
                backtrace: Backtrace::force_capture().to_string(),
            });
            self.surface.begin_frame();
            self.draw_failure();
            return self.surface.end_frame();
        }

        let cursor = *self
            .tree
            .shared
            .cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match cursor {
            Some((x, y)) => self.surface.show_cursor(x, y),
            None => self.surface.hide_cursor(),
        }

        trace!("render pass complete");
        self.surface.end_frame()
    }

    /// Feed one input event through the runtime's dispatch rules.
    ///
    /// Ctrl+C quits. Tab and BackTab move focus and schedule a render.
    /// Everything else is broadcast to the component handlers; a resize also
    /// resizes the surface and schedules a render.
    pub fn dispatch_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.dispatch_key(key),
            InputEvent::Mouse(mouse) => self.tree.dispatch_mouse(self.root_id, &mouse),
            InputEvent::Resize { width, height } => {
                self.surface.resize(width, height);
                self.tree.shared.refresh.notify_one();
            }
            InputEvent::Paste(_) => {}
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) {
        if key.code == Key::Char('c') && key.modifiers.contains(Modifiers::CTRL) {
            self.scope().quit();
            return;
        }
        match key.code {
            Key::Tab if key.modifiers.contains(Modifiers::SHIFT) => {
                self.tree.shared.focus.prev();
                self.tree.shared.refresh.notify_one();
            }
            Key::Tab => {
                self.tree.shared.focus.next();
                self.tree.shared.refresh.notify_one();
            }
            Key::BackTab => {
                self.tree.shared.focus.prev();
                self.tree.shared.refresh.notify_one();
            }
            _ => self.tree.dispatch_key(self.root_id, &key),
        }
    }

    /// Drive the main loop until quit. Renders once up front, then reacts
    /// to refreshes and input; runs every effect cleanup on the way out.
    fn run_loop(
        &mut self,
        mut events: tokio::sync::mpsc::UnboundedReceiver<InputEvent>,
    ) -> Result<(), Error> {
        let rt = tokio::runtime::Builder::new_current_thread().build()?;
        let tree = Arc::clone(&self.tree);

        debug!("runtime started");
        let result: Result<(), Error> = rt.block_on(async {
            self.render_pass()?;
            loop {
                tokio::select! {
                    _ = tree.shared.quit.notified() => break,
                    _ = tree.shared.refresh.notified() => self.render_pass()?,
                    maybe = events.recv() => match maybe {
                        Some(event) => self.dispatch_input(event),
                        None => break,
                    },
                }
                if tree.shared.is_quitting() {
                    break;
                }
            }
            Ok(())
        });

        self.tree.cleanup_all(self.root_id);
        debug!("runtime stopped");
        result
    }
}

// ---------------------------------------------------------------------------
// Diagnostic screen
// ---------------------------------------------------------------------------

impl<S: Surface> Runtime<S> {
    fn draw_failure(&mut self) {
        let Some(failure) = &self.failure else {
            return;
        };
        let (width, height) = self.surface.size();
        let base = Style::new().foreground(Color::White).background(Color::Red);

        for y in 0..height {
            for x in 0..width {
                self.surface.set_cell(x, y, ' ', base);
            }
        }

        let title = "  RUNTIME PANIC  ";
        draw_line(
            &mut self.surface,
            (width - title.len() as i32) / 2,
            2,
            title,
            base.bold(),
        );
        let message = format!("Error: {}", failure.message);
        draw_line(&mut self.surface, 2, 4, &message, base);
        draw_line(&mut self.surface, 2, 6, "Stack Trace:", base.underline());
        for (i, line) in failure.backtrace.lines().enumerate() {
            let y = 7 + i as i32;
            if y > height - 3 {
                break;
            }
            draw_line(&mut self.surface, 2, y, line, base);
        }
        let footer = "Press Ctrl+C to quit";
        draw_line(
            &mut self.surface,
            (width - footer.len() as i32) / 2,
            height - 2,
            footer,
            base.dim(),
        );
    }
}

fn draw_line(surface: &mut dyn Surface, x: i32, y: i32, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        surface.set_cell(x + i as i32, y, ch, style);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Run `root` over the real terminal until the app quits.
///
/// Enters the alternate screen with raw mode and mouse capture; both are
/// restored on exit, including exits through a contained panic. The default
/// panic hook is silenced for the duration so a contained panic does not
/// scribble over the alternate screen.
pub fn run<F>(root: F) -> Result<(), Error>
where
    F: FnMut(&Scope) -> Node + Send + 'static,
{
    let mut surface = TermSurface::new()?;
    surface.enter()?;
    let mut runtime = Runtime::new(root, surface);

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(raw) = crossterm::event::read() {
            if let Some(event) = event::from_crossterm(raw) {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });

    let result = runtime.run_loop(rx);
    std::panic::set_hook(previous_hook);
    result
}

// ===========================================================================
// Tests
// ===========================================================================
