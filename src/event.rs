//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Crossterm events are converted via `From` impls so the rest of the
//! runtime never depends on crossterm directly.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// The character for plain character keys, if any.
    pub fn char(&self) -> Option<char> {
        match self.code {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MouseButton / MouseKind / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
}

/// Pointer event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Press,
    Release,
    Click,
    Move,
    ScrollUp,
    ScrollDown,
}

/// A pointer event with position, button, and kind.
///
/// Pointer events are broadcast to every registered handler; each handler
/// tests containment against its component's last-rendered
/// [`Rect`](crate::geometry::Rect) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    pub kind: MouseKind,
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: i32, height: i32 },
    Paste(String),
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let code = match ct.code {
            crossterm::event::KeyCode::Char(c) => Key::Char(c),
            crossterm::event::KeyCode::Enter => Key::Enter,
            crossterm::event::KeyCode::Esc => Key::Escape,
            crossterm::event::KeyCode::Tab => Key::Tab,
            crossterm::event::KeyCode::BackTab => Key::BackTab,
            crossterm::event::KeyCode::Backspace => Key::Backspace,
            crossterm::event::KeyCode::Delete => Key::Delete,
            crossterm::event::KeyCode::Insert => Key::Insert,
            crossterm::event::KeyCode::Left => Key::Left,
            crossterm::event::KeyCode::Right => Key::Right,
            crossterm::event::KeyCode::Up => Key::Up,
            crossterm::event::KeyCode::Down => Key::Down,
            crossterm::event::KeyCode::Home => Key::Home,
            crossterm::event::KeyCode::End => Key::End,
            crossterm::event::KeyCode::PageUp => Key::PageUp,
            crossterm::event::KeyCode::PageDown => Key::PageDown,
            crossterm::event::KeyCode::F(n) => Key::F(n),
            // Map unsupported key codes to Escape as a fallback.
            _ => Key::Escape,
        };
        let modifiers = convert_modifiers(ct.modifiers);
        KeyEvent { code, modifiers }
    }
}

/// Convert a crossterm mouse button to our `MouseButton`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseButton {
    match b {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        // Terminals report a button press as the actionable event, so a
        // button-down arrives as Click; Up is delivered as Release for
        // handlers that track drag state.
        let (button, kind) = match me.kind {
            crossterm::event::MouseEventKind::Down(b) => {
                (convert_mouse_button(b), MouseKind::Click)
            }
            crossterm::event::MouseEventKind::Up(b) => {
                (convert_mouse_button(b), MouseKind::Release)
            }
            crossterm::event::MouseEventKind::Drag(b) => {
                (convert_mouse_button(b), MouseKind::Move)
            }
            crossterm::event::MouseEventKind::Moved => (MouseButton::None, MouseKind::Move),
            crossterm::event::MouseEventKind::ScrollUp => (MouseButton::None, MouseKind::ScrollUp),
            _ => (MouseButton::None, MouseKind::ScrollDown),
        };
        MouseEvent {
            x: i32::from(me.column),
            y: i32::from(me.row),
            button,
            kind,
        }
    }
}

/// Convert a crossterm `Event` into our `InputEvent`.
///
/// Returns `None` for events the runtime does not handle (terminal focus
/// gained/lost, key releases).
pub fn from_crossterm(event: crossterm::event::Event) -> Option<InputEvent> {
    match event {
        // Some terminals report key releases too; handlers only want presses.
        crossterm::event::Event::Key(ke)
            if ke.kind == crossterm::event::KeyEventKind::Release =>
        {
            None
        }
        crossterm::event::Event::Key(ke) => Some(InputEvent::Key(KeyEvent::from(ke))),
        crossterm::event::Event::Mouse(me) => Some(InputEvent::Mouse(MouseEvent::from(me))),
        crossterm::event::Event::Resize(w, h) => Some(InputEvent::Resize {
            width: i32::from(w),
            height: i32::from(h),
        }),
        crossterm::event::Event::Paste(s) => Some(InputEvent::Paste(s)),
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_single_flag() {
        assert!(Modifiers::CTRL.contains(Modifiers::CTRL));
        assert!(!Modifiers::CTRL.contains(Modifiers::SHIFT));
        assert!(!Modifiers::CTRL.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn modifiers_bitand() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── KeyEvent ─────────────────────────────────────────────────────

    #[test]
    fn key_event_char() {
        let ke = KeyEvent::new(Key::Char('a'), Modifiers::NONE);
        assert_eq!(ke.char(), Some('a'));
        let ke = KeyEvent::new(Key::Enter, Modifiers::NONE);
        assert_eq!(ke.char(), None);
    }

    // ── From<crossterm> — keys ───────────────────────────────────────

    #[test]
    fn from_crossterm_key_char() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            crossterm::event::KeyModifiers::NONE,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::Char('x'));
        assert!(ke.modifiers.is_empty());
    }

    #[test]
    fn from_crossterm_key_with_ctrl() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::Char('c'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_key_navigation() {
        for (ct_code, expected) in [
            (crossterm::event::KeyCode::Left, Key::Left),
            (crossterm::event::KeyCode::Right, Key::Right),
            (crossterm::event::KeyCode::Up, Key::Up),
            (crossterm::event::KeyCode::Down, Key::Down),
            (crossterm::event::KeyCode::Home, Key::Home),
            (crossterm::event::KeyCode::End, Key::End),
            (crossterm::event::KeyCode::PageUp, Key::PageUp),
            (crossterm::event::KeyCode::PageDown, Key::PageDown),
            (crossterm::event::KeyCode::Delete, Key::Delete),
            (crossterm::event::KeyCode::Backspace, Key::Backspace),
            (crossterm::event::KeyCode::Esc, Key::Escape),
            (crossterm::event::KeyCode::Tab, Key::Tab),
            (crossterm::event::KeyCode::BackTab, Key::BackTab),
        ] {
            let ct =
                crossterm::event::KeyEvent::new(ct_code, crossterm::event::KeyModifiers::NONE);
            assert_eq!(KeyEvent::from(ct).code, expected);
        }
    }

    // ── From<crossterm> — mouse ──────────────────────────────────────

    #[test]
    fn mouse_down_arrives_as_click() {
        let me = crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        let ev = MouseEvent::from(me);
        assert_eq!(ev.kind, MouseKind::Click);
        assert_eq!(ev.button, MouseButton::Left);
        assert_eq!((ev.x, ev.y), (10, 5));
    }

    #[test]
    fn mouse_up_arrives_as_release() {
        let me = crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Up(crossterm::event::MouseButton::Middle),
            column: 0,
            row: 0,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        let ev = MouseEvent::from(me);
        assert_eq!(ev.kind, MouseKind::Release);
        assert_eq!(ev.button, MouseButton::Middle);
    }

    #[test]
    fn mouse_scroll_kinds() {
        let up = crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::ScrollUp,
            column: 1,
            row: 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert_eq!(MouseEvent::from(up).kind, MouseKind::ScrollUp);
        let down = crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::ScrollDown,
            column: 1,
            row: 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert_eq!(MouseEvent::from(down).kind, MouseKind::ScrollDown);
    }

    // ── from_crossterm — top level ───────────────────────────────────

    #[test]
    fn from_crossterm_resize() {
        let ev = from_crossterm(crossterm::event::Event::Resize(120, 40));
        assert_eq!(
            ev,
            Some(InputEvent::Resize {
                width: 120,
                height: 40
            })
        );
    }

    #[test]
    fn from_crossterm_focus_ignored() {
        assert_eq!(from_crossterm(crossterm::event::Event::FocusGained), None);
        assert_eq!(from_crossterm(crossterm::event::Event::FocusLost), None);
    }

    #[test]
    fn from_crossterm_key_release_ignored() {
        let mut ke = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            crossterm::event::KeyModifiers::NONE,
        );
        ke.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(from_crossterm(crossterm::event::Event::Key(ke)), None);
    }

    #[test]
    fn from_crossterm_paste() {
        let ev = from_crossterm(crossterm::event::Event::Paste("hello".into()));
        assert_eq!(ev, Some(InputEvent::Paste("hello".into())));
    }
}
