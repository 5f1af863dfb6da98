//! Scroll containers.
//!
//! A [`Scroll`] gives its child unlimited virtual height and shows a
//! viewport-sized band of it, chosen by a `scroll_top` state cell on the
//! owning scope. The rightmost column is a scrollbar. With auto-tail on,
//! the viewport snaps to the bottom on every render until the user scrolls
//! up, and re-engages when they scroll back to the bottom.

use crate::geometry::Rect;
use crate::hooks::{use_mouse, use_ref, use_state, Ref, State};
use crate::scope::Scope;
use crate::style::{Color, Style};
use crate::surface::{ClipSurface, Surface};

use super::Node;

/// A scrolling viewport over one child.
pub struct Scroll {
    child: Box<Node>,
    offset: i32,
    auto_tail: bool,
    flex: i32,
    scroll_top: State<i32>,
    /// Content height from the last render, shared with the wheel handler.
    content_height: Ref<i32>,
}

impl Scroll {
    /// Flex weight inside an enclosing stack (defaults to 1: a scroll
    /// container soaks up leftover space).
    pub fn flex(mut self, f: i32) -> Self {
        self.flex = f;
        self
    }

    pub(super) fn flex_weight(&self) -> i32 {
        if self.flex > 0 {
            self.flex
        } else {
            1
        }
    }

    pub(super) fn render(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        if width <= 1 || height <= 0 {
            return 0;
        }
        // The rightmost column belongs to the scrollbar.
        let content_width = width - 1;
        let content_height = self.child.measure_height(content_width);
        self.content_height.set(content_height);

        let mut offset = self.offset;
        if self.auto_tail && content_height > height {
            offset = content_height - height;
            // Write back so manual scrolling starts from the tail.
            self.scroll_top.set(offset);
        }

        {
            let mut clip = ClipSurface::new(surface, Rect::new(x, y, content_width, height));
            self.child.render(&mut clip, x, y - offset, content_width, content_height);
        }

        // Track.
        let bar_x = x + width - 1;
        let track = Style::new().foreground(Color::Gray);
        for i in 0..height {
            surface.set_cell(bar_x, y + i, '│', track);
        }

        // Thumb, proportional to the visible share of the content.
        if content_height > height {
            let thumb_height = (height * height / content_height).max(1);
            let mut thumb_pos = offset * height / content_height;
            if thumb_pos + thumb_height > height {
                thumb_pos = height - thumb_height;
            }
            let thumb = Style::new().foreground(Color::Cyan);
            for i in 0..thumb_height {
                surface.set_cell(bar_x, y + thumb_pos + i, '┃', thumb);
            }
        }

        height
    }
}

/// A scrolling viewport around `child`, stateful on `scope`.
///
/// Installs a wheel handler: scrolling up disengages auto-tail and moves the
/// viewport one row; scrolling down past the end re-engages it. Wrapped via
/// [`Scope::wrap`] so the handler can hit-test against the rendered
/// rectangle.
pub fn scroll_box(scope: &Scope, child: impl Into<Node>) -> Node {
    let scroll_top = use_state(scope, "scroll_top", 0);
    let auto_tail = use_state(scope, "auto_tail", false);
    let content_height = use_ref(scope, 0);

    let wheel_scope = scope.clone();
    let wheel_top = scroll_top.clone();
    let wheel_tail = auto_tail.clone();
    let wheel_content = content_height.clone();
    use_mouse(scope, move |event| {
        let rect = wheel_scope.rect();
        if !rect.contains(event.x, event.y) {
            return;
        }
        match event.kind {
            crate::event::MouseKind::ScrollUp => {
                wheel_tail.set(false);
                wheel_top.update(|v| (v - 1).max(0));
            }
            crate::event::MouseKind::ScrollDown => {
                let max_scroll = (wheel_content.get() - rect.height).max(0);
                wheel_top.update(|v| {
                    if *v < max_scroll {
                        v + 1
                    } else {
                        // Already at the bottom; re-engage auto-tail.
                        wheel_tail.set(true);
                        *v
                    }
                });
            }
            _ => {}
        }
    });

    scope.wrap(Node::Scroll(Scroll {
        child: Box::new(child.into()),
        offset: scroll_top.get(),
        auto_tail: auto_tail.get(),
        flex: 0,
        scroll_top,
        content_height,
    }))
}

/// A [`scroll_box`] that starts with auto-tail engaged. Suited to logs and
/// chat transcripts that should follow new content.
pub fn tail_box(scope: &Scope, child: impl Into<Node>) -> Node {
    // Seed the cell before scroll_box reads it; later renders keep whatever
    // the user's scrolling decided.
    use_state(scope, "auto_tail", true);
    scroll_box(scope, child)
}

// ===========================================================================
// Tests
// ===========================================================================
