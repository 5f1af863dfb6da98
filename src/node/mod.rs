//! Layout and render engine.
//!
//! A [`Node`] tree is rebuilt from scratch every render pass and drawn with a
//! two-pass protocol:
//!
//! 1. **measure** — [`Node::measure_height`] under a width budget (and
//!    [`Node::measure_width`] for horizontal layout) report intrinsic size;
//!    a node with a positive [`Node::flex`] weight reports no intrinsic size
//!    along the stack axis and instead shares the leftover space
//! 2. **render** — [`Node::render`] draws into a rectangle and returns the
//!    height actually used, which is what stacking advances by and what a
//!    wrapping component records as its hit-test rectangle
//!
//! Flex distribution is deterministic integer math: leftover space divides
//! by the total weight and the remainder is simply not distributed.

use crate::geometry::Rect;
use crate::scope::Scope;
use crate::style::{Color, Style};
use crate::surface::Surface;

mod container;
mod scroll;
mod stack;
mod text;

pub use container::{frame, Frame};
pub use scroll::{scroll_box, tail_box, Scroll};
pub use stack::{hstack, vstack, Axis, Stack};
pub use text::{text, Text};

/// Width assumed for nodes whose intrinsic width is unknowable.
const FALLBACK_WIDTH: i32 = 10;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of the view tree.
pub enum Node {
    Text(Text),
    Frame(Frame),
    Stack(Stack),
    Scroll(Scroll),
    Spacer,
    Divider(Divider),
    /// Renders its child only when the condition held at build time.
    When {
        condition: bool,
        child: Box<Node>,
    },
    WhenElse {
        condition: bool,
        then: Box<Node>,
        otherwise: Box<Node>,
    },
    Empty,
    /// Requests the terminal cursor at the node's render position.
    CursorMarker,
    /// Records the rendered rectangle into a scope. See [`Scope::wrap`].
    Component {
        scope: Scope,
        child: Box<Node>,
    },
}

impl Node {
    pub(crate) fn component(scope: Scope, child: Node) -> Node {
        Node::Component { scope, child: Box::new(child) }
    }

    /// The flex weight this node competes with inside a stack.
    ///
    /// `Spacer` is weight 1, scroll containers default to 1, everything else
    /// reports its style weight (0 unless set). A component wrapper defers
    /// to what it wraps; a conditional never flexes.
    pub fn flex(&self) -> i32 {
        match self {
            Node::Text(t) => t.style.flex,
            Node::Frame(f) => f.style.flex,
            Node::Stack(s) => s.style.flex,
            Node::Scroll(s) => s.flex_weight(),
            Node::Spacer => 1,
            Node::Component { child, .. } => child.flex(),
            _ => 0,
        }
    }

    /// Intrinsic height under a width budget.
    ///
    /// Flexible nodes (spacers, scroll containers) report 0: they take
    /// whatever a stack gives them instead of asking for space.
    pub fn measure_height(&self, width: i32) -> i32 {
        match self {
            Node::Text(t) => t.measure_height(width),
            Node::Frame(f) => f.measure_height(width),
            Node::Stack(s) => s.measure_height(width),
            Node::Scroll(_) | Node::Spacer | Node::Empty | Node::CursorMarker => 0,
            Node::Divider(_) => 1,
            Node::When { condition, child } => {
                if *condition {
                    child.measure_height(width)
                } else {
                    0
                }
            }
            Node::WhenElse { condition, then, otherwise } => {
                if *condition {
                    then.measure_height(width)
                } else {
                    otherwise.measure_height(width)
                }
            }
            Node::Component { child, .. } => child.measure_height(width),
        }
    }

    /// Intrinsic width, used by horizontal stacking.
    ///
    /// Nodes that stretch to whatever they are given (dividers, scroll
    /// containers) report a fixed fallback width.
    pub fn measure_width(&self) -> i32 {
        match self {
            Node::Text(t) => t.measure_width(),
            Node::Frame(f) => f.measure_width(),
            Node::Stack(s) => s.measure_width(),
            Node::Spacer | Node::Empty | Node::CursorMarker => 0,
            Node::When { condition, child } => {
                if *condition {
                    child.measure_width()
                } else {
                    0
                }
            }
            Node::WhenElse { condition, then, otherwise } => {
                if *condition {
                    then.measure_width()
                } else {
                    otherwise.measure_width()
                }
            }
            Node::Component { child, .. } => child.measure_width(),
            Node::Scroll(_) | Node::Divider(_) => FALLBACK_WIDTH,
        }
    }

    /// Draw into the rectangle and return the height actually used.
    pub fn render(&self, surface: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32) -> i32 {
        match self {
            Node::Text(t) => t.render(surface, x, y, width, height),
            Node::Frame(f) => f.render(surface, x, y, width, height),
            Node::Stack(s) => s.render(surface, x, y, width, height),
            Node::Scroll(s) => s.render(surface, x, y, width, height),
            Node::Spacer => height,
            Node::Divider(d) => d.render(surface, x, y, width, height),
            Node::When { condition, child } => {
                if *condition {
                    child.render(surface, x, y, width, height)
                } else {
                    0
                }
            }
            Node::WhenElse { condition, then, otherwise } => {
                if *condition {
                    then.render(surface, x, y, width, height)
                } else {
                    otherwise.render(surface, x, y, width, height)
                }
            }
            Node::Empty => 0,
            Node::CursorMarker => {
                surface.show_cursor(x, y);
                0
            }
            Node::Component { scope, child } => {
                let used = child.render(surface, x, y, width, height);
                scope.record_rect(Rect::new(x, y, width, used));
                used
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Divider
// ---------------------------------------------------------------------------

/// A horizontal rule spanning the full given width.
pub struct Divider {
    ch: char,
    style: Style,
}

impl Divider {
    pub fn ch(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    pub fn color(mut self, c: Color) -> Self {
        self.style.fg = c;
        self
    }

    fn render(&self, surface: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32) -> i32 {
        if height <= 0 || width <= 0 {
            return 0;
        }
        for i in 0..width {
            surface.set_cell(x + i, y, self.ch, self.style);
        }
        1
    }
}

/// A horizontal rule.
pub fn divider() -> Divider {
    Divider { ch: '─', style: Style::default() }
}

impl From<Divider> for Node {
    fn from(d: Divider) -> Node {
        Node::Divider(d)
    }
}

// ---------------------------------------------------------------------------
// Small builders
// ---------------------------------------------------------------------------

/// Flexible blank space (flex weight 1).
pub fn spacer() -> Node {
    Node::Spacer
}

/// A node that draws nothing and takes no space.
pub fn empty() -> Node {
    Node::Empty
}

/// Render `child` only when `condition` holds.
pub fn when(condition: bool, child: impl Into<Node>) -> Node {
    Node::When { condition, child: Box::new(child.into()) }
}

/// Render `then` when `condition` holds, `otherwise` when it does not.
pub fn when_else(condition: bool, then: impl Into<Node>, otherwise: impl Into<Node>) -> Node {
    Node::WhenElse {
        condition,
        then: Box::new(then.into()),
        otherwise: Box::new(otherwise.into()),
    }
}

/// Render one node per item, stacked vertically.
pub fn for_each<T>(items: impl IntoIterator<Item = T>, f: impl Fn(T, usize) -> Node) -> Node {
    let children = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| f(item, i))
        .collect();
    vstack(children).into()
}

/// Center `child` both horizontally and vertically by surrounding it with
/// spacers.
pub fn center(child: impl Into<Node>) -> Node {
    vstack(vec![
        spacer(),
        hstack(vec![spacer(), child.into(), spacer()]).into(),
        spacer(),
    ])
    .into()
}

/// Mark the terminal cursor position (for IME placement). Takes no space.
pub fn cursor_marker() -> Node {
    Node::CursorMarker
}

// ===========================================================================
// Tests
// ===========================================================================
