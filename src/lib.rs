//! # weft
//!
//! A hooks-style, declarative terminal UI runtime.
//!
//! weft lets you describe screens as plain functions that return a tree of
//! layout nodes, while the runtime gives those functions persistent memory
//! across renders through explicit-key hooks. State is addressed by a string
//! key (safe inside conditionals and loops); effects, memos and refs are
//! addressed by call-order index within a render. There is no retained diff
//! tree: every pass re-runs the root component and redraws.
//!
//! ## Core Systems
//!
//! - **[`scope`]** — Component identity tree: one record per mounted
//!   component, addressed by a stable key path, holding its state cells,
//!   effect/memo/ref slots and last-rendered rectangle
//! - **[`hooks`]** — `use_state`, `use_effect`, `use_memo`, `use_ref`,
//!   `use_key`, `use_mouse`
//! - **[`node`]** — Layout/render engine: two-pass measure/render protocol,
//!   flex stacks, boxes, text wrapping, scrolling with clipping
//! - **[`focus`]** — Ordered focus traversal rebuilt every render
//! - **[`bridge`]** — Blocking rendezvous between the UI and a background task
//! - **[`runtime`]** — The main loop: coalesced refreshes, input dispatch,
//!   panic containment
//! - **[`surface`]** — Drawing-surface abstraction with a crossterm backend
//!   and a headless test buffer
//! - **[`event`]** — Input events, decoupled from crossterm
//! - **[`geometry`]**, **[`style`]** — Cells, rectangles, colors, borders
//!
//! ## A minimal app
//!
//! ```no_run
//! use weft::{hooks::use_state, node::{text, vstack}, Node, Scope};
//!
//! fn app(scope: &Scope) -> Node {
//!     let count = use_state(scope, "count", 0u32);
//!     vstack(vec![
//!         text(format!("count: {}", count.get())).into(),
//!     ])
//!     .into()
//! }
//!
//! fn main() -> Result<(), weft::Error> {
//!     weft::run(app)
//! }
//! ```

// Foundation
pub mod error;
pub mod event;
pub mod geometry;
pub mod style;

// Drawing surface
pub mod surface;

// Identity tree and hooks
pub mod context;
pub mod hooks;
pub mod scope;

// Focus and cross-task plumbing
pub mod bridge;
pub mod focus;

// Layout/render engine
pub mod node;

// Main loop
pub mod runtime;

pub use error::Error;
pub use event::{InputEvent, Key, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseKind};
pub use geometry::Rect;
pub use node::Node;
pub use runtime::{run, Runtime};
pub use scope::Scope;
pub use style::{Align, Border, Color, Style};
