//! Bordered boxes.
//!
//! A [`Frame`] wraps one child with optional border, padding, background and
//! vertical alignment. Fixed width/height constrain the drawn area; without
//! them the frame sizes to its child.

use crate::style::{Align, Border, Color, Style};
use crate::surface::Surface;

use super::Node;

/// A box around one child.
pub struct Frame {
    child: Box<Node>,
    pub(super) style: Style,
}

/// Wrap `child` in a box.
pub fn frame(child: impl Into<Node>) -> Frame {
    Frame {
        child: Box::new(child.into()),
        style: Style::default(),
    }
}

impl Frame {
    /// Replace the whole style.
    pub fn apply(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn width(mut self, w: i32) -> Self {
        self.style.width = w;
        self
    }

    pub fn height(mut self, h: i32) -> Self {
        self.style.height = h;
        self
    }

    pub fn flex(mut self, f: i32) -> Self {
        self.style.flex = f;
        self
    }

    /// Symmetric padding: `vertical` for top/bottom, `horizontal` for
    /// left/right.
    pub fn padding(mut self, vertical: i32, horizontal: i32) -> Self {
        self.style = self.style.padding(vertical, horizontal);
        self
    }

    /// Explicit padding for each side.
    pub fn padding_all(mut self, top: i32, right: i32, bottom: i32, left: i32) -> Self {
        self.style = self.style.padding_all(top, right, bottom, left);
        self
    }

    pub fn border(mut self, b: Border) -> Self {
        self.style.border = b;
        self
    }

    pub fn border_color(mut self, c: Color) -> Self {
        self.style.border_color = c;
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.style.bg = c;
        self
    }

    /// Vertical alignment of the child inside a taller frame.
    pub fn valign(mut self, a: Align) -> Self {
        self.style.valign = a;
        self
    }

    fn border_size(&self) -> i32 {
        if self.style.border == Border::None {
            0
        } else {
            1
        }
    }

    pub(super) fn measure_height(&self, width: i32) -> i32 {
        if self.style.height > 0 {
            return self.style.height;
        }
        let inner_width = width - self.border_size() * 2 - self.style.padding_width();
        let inner = self.child.measure_height(inner_width);
        // A flexible child makes the whole frame flexible.
        if inner == 0 {
            return 0;
        }
        inner + self.border_size() * 2 + self.style.padding_height()
    }

    pub(super) fn measure_width(&self) -> i32 {
        if self.style.width > 0 {
            return self.style.width;
        }
        self.child.measure_width() + self.style.padding_width() + self.border_size() * 2
    }

    pub(super) fn render(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        if height <= 0 || width <= 0 {
            return 0;
        }

        let actual_width = if self.style.width > 0 && self.style.width < width {
            self.style.width
        } else {
            width
        };
        let actual_height = if self.style.height > 0 && self.style.height < height {
            self.style.height
        } else {
            height
        };

        let border = self.border_size();
        let content_width = actual_width - border * 2 - self.style.padding_width();
        let content_height = actual_height - border * 2 - self.style.padding_height();

        if content_width <= 0 || content_height <= 0 {
            // No room for content; chrome still draws.
            self.draw_background(surface, x, y, actual_width, actual_height);
            self.draw_border(surface, x, y, actual_width, actual_height);
            return actual_height;
        }

        let child_height = self.child.measure_height(content_width);

        // Vertical alignment applies when the frame is taller than its
        // content (fixed height or a generous budget).
        let mut content_y = y + border + self.style.padding_top;
        if (self.style.height > 0 || height > child_height) && child_height < content_height {
            match self.style.valign {
                Align::Center => content_y += (content_height - child_height) / 2,
                Align::End => content_y += content_height - child_height,
                Align::Start => {}
            }
        }
        let content_x = x + border + self.style.padding_left;

        self.draw_background(surface, x, y, actual_width, actual_height);
        self.draw_border(surface, x, y, actual_width, actual_height);

        let used = self
            .child
            .render(surface, content_x, content_y, content_width, content_height);

        if self.style.height > 0 {
            return self.style.height;
        }
        used + border * 2 + self.style.padding_height()
    }

    fn draw_background(&self, surface: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32) {
        if self.style.bg == Color::Default {
            return;
        }
        let bg = Style::new().background(self.style.bg);
        for row in y..y + height {
            for col in x..x + width {
                surface.set_cell(col, row, ' ', bg);
            }
        }
    }

    fn draw_border(&self, surface: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32) {
        if self.style.border == Border::None {
            return;
        }
        let chars = self.style.border.chars();
        let style = Style::new().foreground(self.style.border_color);

        surface.set_cell(x, y, chars.top_left, style);
        surface.set_cell(x + width - 1, y, chars.top_right, style);
        surface.set_cell(x, y + height - 1, chars.bottom_left, style);
        surface.set_cell(x + width - 1, y + height - 1, chars.bottom_right, style);

        for col in x + 1..x + width - 1 {
            surface.set_cell(col, y, chars.horizontal, style);
            surface.set_cell(col, y + height - 1, chars.horizontal, style);
        }
        for row in y + 1..y + height - 1 {
            surface.set_cell(x, row, chars.vertical, style);
            surface.set_cell(x + width - 1, row, chars.vertical, style);
        }
    }
}

impl From<Frame> for Node {
    fn from(f: Frame) -> Node {
        Node::Frame(f)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
