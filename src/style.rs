//! Colors, text styles, borders, alignment.
//!
//! [`Style`] carries both text attributes (color, bold, ...) and the layout
//! fields the node engine reads (width, height, flex weight, padding,
//! border, alignment). Builder methods consume and return `Style` so styles
//! compose in a single expression.

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Named terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

// ---------------------------------------------------------------------------
// Align
// ---------------------------------------------------------------------------

/// Alignment along an axis.
///
/// Used for text alignment, stack justification (where `Start` means
/// top/left and `End` means bottom/right) and box `valign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

// ---------------------------------------------------------------------------
// Border
// ---------------------------------------------------------------------------

/// Border kind for a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Border {
    #[default]
    None,
    Single,
    Double,
    Rounded,
    Thick,
}

/// The box-drawing characters for one border kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl Border {
    /// The character set for this border kind.
    ///
    /// `Border::None` returns spaces; callers skip drawing in that case.
    pub fn chars(self) -> BorderChars {
        match self {
            Border::Single => BorderChars {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
            Border::Double => BorderChars {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
            Border::Rounded => BorderChars {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
            Border::Thick => BorderChars {
                top_left: '┏',
                top_right: '┓',
                bottom_left: '┗',
                bottom_right: '┛',
                horizontal: '━',
                vertical: '┃',
            },
            Border::None => BorderChars {
                top_left: ' ',
                top_right: ' ',
                bottom_left: ' ',
                bottom_right: ' ',
                horizontal: ' ',
                vertical: ' ',
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Text attributes plus the layout fields consumed by the node engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
    pub blink: bool,

    // Layout fields.
    pub width: i32,
    pub height: i32,
    pub flex: i32,

    pub padding_top: i32,
    pub padding_bottom: i32,
    pub padding_left: i32,
    pub padding_right: i32,

    pub border: Border,
    pub border_color: Color,

    pub align: Align,
    pub valign: Align,
}

impl Style {
    /// Create a default style.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foreground(mut self, c: Color) -> Self {
        self.fg = c;
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.bg = c;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn blink(mut self) -> Self {
        self.blink = true;
        self
    }

    pub fn width(mut self, w: i32) -> Self {
        self.width = w;
        self
    }

    pub fn height(mut self, h: i32) -> Self {
        self.height = h;
        self
    }

    pub fn flex(mut self, f: i32) -> Self {
        self.flex = f;
        self
    }

    /// Symmetric padding: `vertical` for top/bottom, `horizontal` for
    /// left/right.
    pub fn padding(mut self, vertical: i32, horizontal: i32) -> Self {
        self.padding_top = vertical;
        self.padding_bottom = vertical;
        self.padding_left = horizontal;
        self.padding_right = horizontal;
        self
    }

    /// Explicit padding for each side.
    pub fn padding_all(mut self, top: i32, right: i32, bottom: i32, left: i32) -> Self {
        self.padding_top = top;
        self.padding_right = right;
        self.padding_bottom = bottom;
        self.padding_left = left;
        self
    }

    pub fn border(mut self, b: Border) -> Self {
        self.border = b;
        self
    }

    pub fn border_color(mut self, c: Color) -> Self {
        self.border_color = c;
        self
    }

    pub fn align(mut self, a: Align) -> Self {
        self.align = a;
        self
    }

    pub fn valign(mut self, a: Align) -> Self {
        self.valign = a;
        self
    }

    /// Total horizontal padding: `left + right`.
    #[inline]
    pub const fn padding_width(&self) -> i32 {
        self.padding_left + self.padding_right
    }

    /// Total vertical padding: `top + bottom`.
    #[inline]
    pub const fn padding_height(&self) -> i32 {
        self.padding_top + self.padding_bottom
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style() {
        let s = Style::new();
        assert_eq!(s.fg, Color::Default);
        assert_eq!(s.bg, Color::Default);
        assert_eq!(s.border, Border::None);
        assert_eq!(s.flex, 0);
        assert!(!s.bold);
    }

    #[test]
    fn builder_chain() {
        let s = Style::new()
            .foreground(Color::Cyan)
            .background(Color::Black)
            .bold()
            .flex(2)
            .padding(1, 3)
            .border(Border::Rounded)
            .align(Align::Center);
        assert_eq!(s.fg, Color::Cyan);
        assert_eq!(s.bg, Color::Black);
        assert!(s.bold);
        assert_eq!(s.flex, 2);
        assert_eq!(s.padding_top, 1);
        assert_eq!(s.padding_left, 3);
        assert_eq!(s.border, Border::Rounded);
        assert_eq!(s.align, Align::Center);
    }

    #[test]
    fn padding_all_sides() {
        let s = Style::new().padding_all(1, 2, 3, 4);
        assert_eq!(s.padding_top, 1);
        assert_eq!(s.padding_right, 2);
        assert_eq!(s.padding_bottom, 3);
        assert_eq!(s.padding_left, 4);
        assert_eq!(s.padding_width(), 6);
        assert_eq!(s.padding_height(), 4);
    }

    #[test]
    fn border_charsets_distinct() {
        let single = Border::Single.chars();
        let double = Border::Double.chars();
        let rounded = Border::Rounded.chars();
        let thick = Border::Thick.chars();
        assert_eq!(single.top_left, '┌');
        assert_eq!(double.top_left, '╔');
        assert_eq!(rounded.top_left, '╭');
        assert_eq!(thick.top_left, '┏');
        // Rounded shares edges with single.
        assert_eq!(rounded.horizontal, single.horizontal);
    }
}
