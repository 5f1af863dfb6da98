//! Crossterm terminal backend.
//!
//! [`TermSurface`] wraps a buffered stdout writer: cell writes are queued and
//! flushed once per frame. Entering the surface switches to the alternate
//! screen, enables raw mode and mouse capture; leaving restores everything.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::style::{Color, Style};

use super::Surface;

// ---------------------------------------------------------------------------
// TermSurface
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// Created by [`TermSurface::new`] in a *detached* state; call
/// [`enter`](TermSurface::enter) before drawing. `Drop` calls
/// [`leave`](TermSurface::leave) so a panic unwinding through the runtime
/// still restores the terminal.
pub struct TermSurface {
    writer: BufWriter<Stdout>,
    width: i32,
    height: i32,
    entered: bool,
}

impl TermSurface {
    /// Create a surface wrapping stdout, sized from the terminal.
    pub fn new() -> io::Result<Self> {
        let (w, h) = terminal::size()?;
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            width: i32::from(w),
            height: i32::from(h),
            entered: false,
        })
    }

    /// Enter the alternate screen, enable raw mode and mouse capture.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            EnterAlternateScreen,
            crossterm::event::EnableMouseCapture,
            cursor::Hide
        )?;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal: disable mouse capture and raw mode, leave the
    /// alternate screen.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(
            self.writer,
            cursor::Show,
            crossterm::event::DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn queue_style(&mut self, style: Style) -> io::Result<()> {
        if style.fg != Color::Default {
            queue!(self.writer, SetForegroundColor(convert_color(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(self.writer, SetBackgroundColor(convert_color(style.bg)))?;
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        if style.italic {
            queue!(self.writer, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if style.blink {
            queue!(self.writer, SetAttribute(Attribute::SlowBlink))?;
        }
        Ok(())
    }
}

impl Surface for TermSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        // Queueing can only fail on I/O, which end_frame will surface.
        let _ = queue!(self.writer, cursor::MoveTo(x as u16, y as u16));
        let _ = self.queue_style(style);
        let _ = queue!(self.writer, Print(ch), ResetColor);
    }

    fn show_cursor(&mut self, x: i32, y: i32) {
        let _ = queue!(self.writer, cursor::MoveTo(x as u16, y as u16), cursor::Show);
    }

    fn hide_cursor(&mut self) {
        let _ = queue!(self.writer, cursor::Hide);
    }

    fn begin_frame(&mut self) {
        let _ = queue!(self.writer, Clear(ClearType::All));
    }

    fn end_frame(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let _ = self.leave();
        let _ = self.writer.flush();
    }
}

// ---------------------------------------------------------------------------
// Color mapping
// ---------------------------------------------------------------------------

/// Map a named color onto crossterm's palette.
fn convert_color(c: Color) -> crossterm::style::Color {
    use crossterm::style::Color as Ct;
    match c {
        Color::Default => Ct::Reset,
        Color::Black => Ct::Black,
        Color::Red => Ct::Red,
        Color::Green => Ct::Green,
        Color::Yellow => Ct::Yellow,
        Color::Blue => Ct::Blue,
        Color::Magenta => Ct::Magenta,
        Color::Cyan => Ct::Cyan,
        Color::White => Ct::White,
        Color::Gray => Ct::Grey,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
