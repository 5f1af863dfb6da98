//! Headless cell grid for tests.
//!
//! [`Buffer`] implements [`Surface`](super::Surface) over an in-memory grid
//! so an app tree can be rendered and asserted on without a terminal.

use crate::style::Style;

use super::Surface;

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', style: Style::default() }
    }
}

/// An in-memory drawing surface.
#[derive(Debug, Clone)]
pub struct Buffer {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    cursor: Option<(i32, i32)>,
}

impl Buffer {
    /// Create a buffer filled with blank cells.
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
            cursor: None,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// The character at (x, y), or `None` out of bounds.
    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.index(x, y).map(|i| self.cells[i].ch)
    }

    /// The cell at (x, y), or `None` out of bounds.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Row `y` as a string with trailing blanks trimmed.
    pub fn row_text(&self, y: i32) -> String {
        if y < 0 || y >= self.height {
            return String::new();
        }
        let start = (y * self.width) as usize;
        let row: String = self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Whether any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    /// The whole grid as newline-joined rows, trailing blanks trimmed.
    pub fn text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The recorded cursor position, if one was shown.
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }
}

impl Surface for Buffer {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: i32, height: i32) {
        *self = Buffer::new(width, height);
    }

    fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, style };
        }
    }

    fn show_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn begin_frame(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn blank_on_creation() {
        let buf = Buffer::new(4, 2);
        assert_eq!(buf.size(), (4, 2));
        assert_eq!(buf.row_text(0), "");
        assert_eq!(buf.char_at(3, 1), Some(' '));
    }

    #[test]
    fn set_and_read_cells() {
        let mut buf = Buffer::new(10, 3);
        for (i, ch) in "hello".chars().enumerate() {
            buf.set_cell(i as i32, 1, ch, Style::default());
        }
        assert_eq!(buf.row_text(1), "hello");
        assert!(buf.contains_text("hell"));
        assert!(!buf.contains_text("world"));
    }

    #[test]
    fn out_of_bounds_writes_dropped() {
        let mut buf = Buffer::new(4, 2);
        buf.set_cell(-1, 0, 'x', Style::default());
        buf.set_cell(4, 0, 'x', Style::default());
        buf.set_cell(0, 2, 'x', Style::default());
        assert!(!buf.contains_text("x"));
    }

    #[test]
    fn style_is_stored() {
        let mut buf = Buffer::new(4, 2);
        buf.set_cell(0, 0, 'a', Style::new().foreground(Color::Red).bold());
        let cell = buf.cell_at(0, 0).unwrap();
        assert_eq!(cell.style.fg, Color::Red);
        assert!(cell.style.bold);
    }

    #[test]
    fn begin_frame_clears() {
        let mut buf = Buffer::new(4, 2);
        buf.set_cell(0, 0, 'a', Style::default());
        buf.begin_frame();
        assert_eq!(buf.char_at(0, 0), Some(' '));
    }

    #[test]
    fn resize_resets_grid() {
        let mut buf = Buffer::new(4, 2);
        buf.set_cell(0, 0, 'a', Style::default());
        buf.resize(8, 4);
        assert_eq!(buf.size(), (8, 4));
        assert_eq!(buf.char_at(0, 0), Some(' '));
    }

    #[test]
    fn cursor_recorded() {
        let mut buf = Buffer::new(4, 2);
        assert_eq!(buf.cursor(), None);
        buf.show_cursor(2, 1);
        assert_eq!(buf.cursor(), Some((2, 1)));
        buf.hide_cursor();
        assert_eq!(buf.cursor(), None);
    }

    #[test]
    fn text_joins_rows() {
        let mut buf = Buffer::new(4, 2);
        buf.set_cell(0, 0, 'a', Style::default());
        buf.set_cell(0, 1, 'b', Style::default());
        assert_eq!(buf.text(), "a\nb");
    }
}
