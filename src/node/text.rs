//! Text nodes.
//!
//! Single-line by default (clipped at the right edge, with optional
//! alignment inside the given width); [`Text::wrap`] switches to greedy
//! display-width wrapping that honors embedded newlines. All width math is
//! in terminal columns via `unicode-width`, so CJK and other wide characters
//! occupy two cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::style::{Align, Color, Style};
use crate::surface::Surface;

use super::Node;

/// A text node.
pub struct Text {
    content: String,
    pub(super) style: Style,
    wrap: bool,
}

/// Create a text node.
pub fn text(content: impl Into<String>) -> Text {
    Text {
        content: content.into(),
        style: Style::default(),
        wrap: false,
    }
}

impl Text {
    /// Enable greedy wrapping at the given render width.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Replace the whole style.
    pub fn apply(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, c: Color) -> Self {
        self.style.fg = c;
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.style.bg = c;
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.style.underline = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.style.dim = true;
        self
    }

    pub fn blink(mut self) -> Self {
        self.style.blink = true;
        self
    }

    /// Fixed width in columns; content is clipped or aligned inside it.
    pub fn width(mut self, w: i32) -> Self {
        self.style.width = w;
        self
    }

    pub fn flex(mut self, f: i32) -> Self {
        self.style.flex = f;
        self
    }

    /// Alignment inside the render width (single-line only).
    pub fn align(mut self, a: Align) -> Self {
        self.style.align = a;
        self
    }

    pub(super) fn measure_height(&self, width: i32) -> i32 {
        if !self.wrap || width <= 0 {
            return 1;
        }
        let mut column = 0;
        let mut lines = 1;
        for ch in self.content.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
            if column + w > width {
                column = 0;
                lines += 1;
            }
            if ch == '\n' {
                column = 0;
                lines += 1;
                continue;
            }
            column += w;
        }
        lines
    }

    pub(super) fn measure_width(&self) -> i32 {
        if self.style.width > 0 {
            return self.style.width;
        }
        UnicodeWidthStr::width(self.content.as_str()) as i32
    }

    pub(super) fn render(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        if height <= 0 {
            return 0;
        }

        if !self.wrap {
            let actual_width = if self.style.width > 0 && self.style.width < width {
                self.style.width
            } else {
                width
            };
            let text_width = UnicodeWidthStr::width(self.content.as_str()) as i32;
            let start_x = match self.style.align {
                Align::Center if text_width < actual_width => {
                    x + (actual_width - text_width) / 2
                }
                Align::End if text_width < actual_width => x + actual_width - text_width,
                _ => x,
            };

            let mut column = start_x;
            for ch in self.content.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
                if column + w > x + actual_width {
                    break;
                }
                surface.set_cell(column, y, ch, self.style);
                column += w;
            }
            return 1;
        }

        // Greedy wrap. Wide characters that would straddle the right edge
        // move to the next line whole.
        let mut column = x;
        let mut row = y;
        let mut lines = 1;
        for ch in self.content.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
            if column + w > x + width {
                column = x;
                row += 1;
                lines += 1;
                if lines > height {
                    break;
                }
            }
            if ch == '\n' {
                column = x;
                row += 1;
                lines += 1;
                if lines > height {
                    break;
                }
                continue;
            }
            surface.set_cell(column, row, ch, self.style);
            column += w;
        }
        lines
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Node {
        Node::Text(t)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Buffer;

    // ── single line ──────────────────────────────────────────────────

    #[test]
    fn renders_single_line() {
        let mut buf = Buffer::new(10, 1);
        let used = text("hello").render(&mut buf, 0, 0, 10, 1);
        assert_eq!(used, 1);
        assert_eq!(buf.row_text(0), "hello");
    }

    #[test]
    fn clips_at_right_edge() {
        let mut buf = Buffer::new(10, 1);
        text("overflowing").render(&mut buf, 0, 0, 5, 1);
        assert_eq!(buf.row_text(0), "overf");
    }

    #[test]
    fn align_center_and_end() {
        let mut buf = Buffer::new(10, 1);
        text("ab").align(Align::Center).render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.row_text(0), "    ab");

        let mut buf = Buffer::new(10, 1);
        text("ab").align(Align::End).render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.row_text(0), "        ab");
    }

    #[test]
    fn fixed_width_narrows_the_line() {
        let mut buf = Buffer::new(20, 1);
        text("abcdef").width(4).render(&mut buf, 0, 0, 20, 1);
        assert_eq!(buf.row_text(0), "abcd");
    }

    #[test]
    fn no_wrap_always_measures_one_row() {
        assert_eq!(text("a\nb\nc").measure_height(10), 1);
    }

    // ── wrapping ─────────────────────────────────────────────────────

    #[test]
    fn wraps_at_width() {
        let mut buf = Buffer::new(5, 3);
        let used = text("aaaabbbbcc").wrap(true).render(&mut buf, 0, 0, 5, 3);
        assert_eq!(used, 2);
        assert_eq!(buf.row_text(0), "aaaab");
        assert_eq!(buf.row_text(1), "bbbcc");
    }

    #[test]
    fn wrap_honors_newlines() {
        let mut buf = Buffer::new(10, 3);
        let used = text("one\ntwo").wrap(true).render(&mut buf, 0, 0, 10, 3);
        assert_eq!(used, 2);
        assert_eq!(buf.row_text(0), "one");
        assert_eq!(buf.row_text(1), "two");
    }

    #[test]
    fn wrap_measure_matches_render() {
        let t = text("aaaabbbbcc").wrap(true);
        assert_eq!(t.measure_height(5), 2);
        let t = text("one\ntwo\nthree").wrap(true);
        assert_eq!(t.measure_height(10), 3);
    }

    #[test]
    fn wrap_stops_at_height_budget() {
        let mut buf = Buffer::new(3, 2);
        text("abcdefghij").wrap(true).render(&mut buf, 0, 0, 3, 2);
        assert_eq!(buf.row_text(0), "abc");
        assert_eq!(buf.row_text(1), "def");
        // Third line never drawn.
        assert!(!buf.contains_text("g"));
    }

    // ── wide characters ──────────────────────────────────────────────

    #[test]
    fn cjk_occupies_two_columns() {
        let mut buf = Buffer::new(10, 1);
        text("你好").render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.char_at(0, 0), Some('你'));
        assert_eq!(buf.char_at(2, 0), Some('好'));
        assert_eq!(text("你好").measure_width(), 4);
    }

    #[test]
    fn wide_char_wraps_whole() {
        // Width 3: "a" leaves 2 columns, the next wide char fits; after it
        // the line is full, so the second wide char wraps.
        let t = text("a你好").wrap(true);
        assert_eq!(t.measure_height(3), 2);
    }

    // ── measure_width ────────────────────────────────────────────────

    #[test]
    fn measure_width_prefers_fixed_width() {
        assert_eq!(text("abcdef").width(3).measure_width(), 3);
        assert_eq!(text("abcdef").measure_width(), 6);
    }
}
