//! Runtime error type.

use thiserror::Error;

/// Errors surfaced by the runtime.
///
/// Render-pass faults are deliberately *not* represented here: a panic inside
/// a component is contained at the main-loop boundary and switches the
/// runtime into its diagnostic screen instead of propagating as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal I/O failed (raw mode, alternate screen, or a frame flush).
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
