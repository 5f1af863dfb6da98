//! Drawing-surface abstraction.
//!
//! Every node renders against the [`Surface`] trait, never a concrete
//! terminal. The crossterm backend lives in [`term`], a headless grid for
//! tests in [`buffer`]. [`ClipSurface`] restricts writes to a viewport (used
//! by scrolling) and [`CursorTrap`] captures cursor placement requests so the
//! runtime can apply the winning one after the whole tree has rendered.

use std::io;
use std::sync::Mutex;

use crate::geometry::Rect;
use crate::style::Style;

pub mod buffer;
pub mod term;

pub use buffer::Buffer;
pub use term::TermSurface;

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A grid of styled cells that nodes draw into.
pub trait Surface {
    /// Current size as (width, height) in cells.
    fn size(&self) -> (i32, i32);

    /// Adopt a new size after a terminal resize.
    fn resize(&mut self, _width: i32, _height: i32) {}

    /// Write one cell. Out-of-bounds writes are silently dropped.
    fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style);

    /// Request the hardware cursor at (x, y).
    fn show_cursor(&mut self, x: i32, y: i32);

    /// Hide the hardware cursor.
    fn hide_cursor(&mut self);

    /// Called before a frame's cells are written.
    fn begin_frame(&mut self) {}

    /// Called after a frame's cells are written; flushes to the output.
    fn end_frame(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ClipSurface
// ---------------------------------------------------------------------------

/// A proxy that drops writes outside a viewport rectangle.
///
/// Coordinates are not translated: callers keep drawing in the parent
/// surface's coordinate space, and scrolling is expressed by rendering
/// content at `y - offset` so only the visible band survives the clip.
pub struct ClipSurface<'a> {
    inner: &'a mut dyn Surface,
    clip: Rect,
}

impl<'a> ClipSurface<'a> {
    /// Wrap `inner`, keeping only writes inside `clip`.
    pub fn new(inner: &'a mut dyn Surface, clip: Rect) -> Self {
        Self { inner, clip }
    }
}

impl Surface for ClipSurface<'_> {
    fn size(&self) -> (i32, i32) {
        self.inner.size()
    }

    fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.clip.contains(x, y) {
            self.inner.set_cell(x, y, ch, style);
        }
    }

    fn show_cursor(&mut self, x: i32, y: i32) {
        // A cursor scrolled out of the viewport stays hidden.
        if self.clip.contains(x, y) {
            self.inner.show_cursor(x, y);
        }
    }

    fn hide_cursor(&mut self) {
        self.inner.hide_cursor();
    }
}

// ---------------------------------------------------------------------------
// CursorTrap
// ---------------------------------------------------------------------------

/// A proxy that intercepts cursor requests instead of forwarding them.
///
/// The render pass wraps the real surface in a trap so that whichever
/// component asks for the cursor last wins, and the single winning position
/// is applied once the frame is complete.
pub struct CursorTrap<'a> {
    inner: &'a mut dyn Surface,
    request: &'a Mutex<Option<(i32, i32)>>,
}

impl<'a> CursorTrap<'a> {
    pub fn new(inner: &'a mut dyn Surface, request: &'a Mutex<Option<(i32, i32)>>) -> Self {
        Self { inner, request }
    }
}

impl Surface for CursorTrap<'_> {
    fn size(&self) -> (i32, i32) {
        self.inner.size()
    }

    fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style) {
        self.inner.set_cell(x, y, ch, style);
    }

    fn show_cursor(&mut self, x: i32, y: i32) {
        if let Ok(mut slot) = self.request.lock() {
            *slot = Some((x, y));
        }
    }

    fn hide_cursor(&mut self) {
        if let Ok(mut slot) = self.request.lock() {
            *slot = None;
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
