//! Flex stacks.
//!
//! [`vstack`] and [`hstack`] share one implementation parameterized on the
//! axis. Layout is two passes over the children: measure the fixed ones and
//! sum the flex weights, then divide the leftover space by the total weight
//! (integer division; the remainder is not distributed) and walk the axis
//! rendering each child into its slot. Justification only shifts content
//! when nothing flexes, since flex consumers already absorb all leftover
//! space.

use crate::style::{Align, Color, Style};
use crate::surface::Surface;

use super::Node;

/// Stacking axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// A vertical or horizontal flex stack.
pub struct Stack {
    axis: Axis,
    children: Vec<Node>,
    pub(super) style: Style,
    gap: i32,
    justify: Align,
}

/// Stack children top to bottom.
pub fn vstack(children: Vec<Node>) -> Stack {
    Stack {
        axis: Axis::Vertical,
        children,
        style: Style::default(),
        gap: 0,
        justify: Align::Start,
    }
}

/// Stack children left to right.
pub fn hstack(children: Vec<Node>) -> Stack {
    Stack {
        axis: Axis::Horizontal,
        children,
        style: Style::default(),
        gap: 0,
        justify: Align::Start,
    }
}

impl Stack {
    /// Replace the whole style.
    pub fn apply(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Blank cells between adjacent children.
    pub fn gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    /// Main-axis alignment when the content does not fill the stack.
    /// `Start` is top/left, `End` is bottom/right.
    pub fn justify(mut self, justify: Align) -> Self {
        self.justify = justify;
        self
    }

    /// Flex weight of the stack itself inside an enclosing stack.
    pub fn flex(mut self, f: i32) -> Self {
        self.style.flex = f;
        self
    }

    /// Fixed height, overriding measurement.
    pub fn height(mut self, h: i32) -> Self {
        self.style.height = h;
        self
    }

    /// Symmetric padding: `vertical` for top/bottom, `horizontal` for
    /// left/right.
    pub fn padding(mut self, vertical: i32, horizontal: i32) -> Self {
        self.style = self.style.padding(vertical, horizontal);
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.style.bg = c;
        self
    }

    // -----------------------------------------------------------------------
    // Measure
    // -----------------------------------------------------------------------

    pub(super) fn measure_height(&self, width: i32) -> i32 {
        if self.style.height > 0 {
            return self.style.height;
        }
        let inner_width = width - self.style.padding_width();
        if inner_width <= 0 {
            return self.style.padding_height();
        }
        match self.axis {
            Axis::Vertical => {
                let mut total = 0;
                for child in &self.children {
                    total += child.measure_height(inner_width);
                }
                if self.children.len() > 1 {
                    total += (self.children.len() as i32 - 1) * self.gap;
                }
                total + self.style.padding_height()
            }
            Axis::Horizontal => {
                // Exact per-child widths are not known without laying out,
                // so estimate with an even split.
                let share = inner_width / (self.children.len().max(1) as i32);
                let tallest = self
                    .children
                    .iter()
                    .map(|c| c.measure_height(share))
                    .max()
                    .unwrap_or(0);
                tallest + self.style.padding_height()
            }
        }
    }

    pub(super) fn measure_width(&self) -> i32 {
        let content = match self.axis {
            Axis::Horizontal => {
                let mut total: i32 = self.children.iter().map(Node::measure_width).sum();
                if self.children.len() > 1 {
                    total += (self.children.len() as i32 - 1) * self.gap;
                }
                total
            }
            Axis::Vertical => self
                .children
                .iter()
                .map(Node::measure_width)
                .max()
                .unwrap_or(0),
        };
        content + self.style.padding_width()
    }

    // -----------------------------------------------------------------------
    // Render
    // -----------------------------------------------------------------------

    pub(super) fn render(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        if self.children.is_empty() {
            return 0;
        }
        let x = x + self.style.padding_left;
        let y = y + self.style.padding_top;
        let width = width - self.style.padding_width();
        let height = height - self.style.padding_height();
        if width <= 0 || height <= 0 {
            return 0;
        }
        match self.axis {
            Axis::Vertical => self.render_vertical(surface, x, y, width, height),
            Axis::Horizontal => self.render_horizontal(surface, x, y, width, height),
        }
    }

    fn render_vertical(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        // First pass: fixed heights and total flex weight.
        let mut fixed = (self.children.len() as i32 - 1).max(0) * self.gap;
        let mut total_flex = 0;
        for child in &self.children {
            let flex = child.flex();
            if flex > 0 {
                total_flex += flex;
            } else {
                fixed += child.measure_height(width);
            }
        }

        let remaining = (height - fixed).max(0);
        let flex_unit = if total_flex > 0 { remaining / total_flex } else { 0 };

        // Justification shifts only when nothing flexes: flex consumers
        // already own the leftover space.
        let total_content = fixed + if total_flex > 0 { remaining } else { 0 };
        let mut current_y = y;
        if total_content < height {
            match self.justify {
                Align::Center => current_y = y + (height - total_content) / 2,
                Align::End => current_y = y + (height - total_content),
                Align::Start => {}
            }
        }

        let mut used_total = 0;
        let last = self.children.len() - 1;
        for (i, child) in self.children.iter().enumerate() {
            if current_y >= y + height {
                break;
            }
            let flex = child.flex();
            let mut child_height = if flex > 0 {
                flex_unit * flex
            } else {
                child.measure_height(width)
            };
            child_height = child_height.min(y + height - current_y);

            let mut used = child.render(surface, x, current_y, width, child_height);
            if used == 0 && child_height > 0 {
                used = child_height;
            }
            current_y += used;
            used_total += used;
            if i < last {
                current_y += self.gap;
                used_total += self.gap;
            }
        }
        used_total + self.style.padding_height()
    }

    fn render_horizontal(
        &self,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> i32 {
        let mut fixed = (self.children.len() as i32 - 1).max(0) * self.gap;
        let mut total_flex = 0;
        for child in &self.children {
            let flex = child.flex();
            if flex > 0 {
                total_flex += flex;
            } else {
                fixed += child.measure_width();
            }
        }

        let remaining = (width - fixed).max(0);
        let flex_unit = if total_flex > 0 { remaining / total_flex } else { 0 };

        let total_content = fixed + if total_flex > 0 { remaining } else { 0 };
        let mut current_x = x;
        if total_content < width {
            match self.justify {
                Align::Center => current_x = x + (width - total_content) / 2,
                Align::End => current_x = x + (width - total_content),
                Align::Start => {}
            }
        }

        let mut max_height = 0;
        let last = self.children.len() - 1;
        for (i, child) in self.children.iter().enumerate() {
            if current_x >= x + width {
                break;
            }
            let flex = child.flex();
            let mut child_width = if flex > 0 {
                flex_unit * flex
            } else {
                child.measure_width()
            };
            child_width = child_width.min(x + width - current_x);

            // A flexible child with no intrinsic height (spacer, scroll
            // container) fills the row.
            let mut child_height = child.measure_height(child_width).min(height);
            if child_height == 0 && height > 0 && flex > 0 {
                child_height = height;
            }

            let used = child.render(surface, current_x, y, child_width, child_height);
            max_height = max_height.max(used);
            current_x += child_width;
            if i < last {
                current_x += self.gap;
            }
        }
        max_height.max(1) + self.style.padding_height()
    }
}

impl From<Stack> for Node {
    fn from(s: Stack) -> Node {
        Node::Stack(s)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{divider, spacer, text};
    use crate::surface::Buffer;

    // ── vertical stacking ────────────────────────────────────────────

    #[test]
    fn vstack_stacks_in_order() {
        let mut buf = Buffer::new(10, 5);
        let used = vstack(vec![text("one").into(), text("two").into()])
            .render(&mut buf, 0, 0, 10, 5);
        assert_eq!(used, 2);
        assert_eq!(buf.row_text(0), "one");
        assert_eq!(buf.row_text(1), "two");
    }

    #[test]
    fn vstack_gap_separates_children() {
        let mut buf = Buffer::new(10, 5);
        let used = vstack(vec![text("a").into(), text("b").into()])
            .gap(2)
            .render(&mut buf, 0, 0, 10, 5);
        assert_eq!(used, 4);
        assert_eq!(buf.row_text(0), "a");
        assert_eq!(buf.row_text(3), "b");
    }

    #[test]
    fn vstack_flex_splits_leftover_evenly() {
        // Fixed: 1 row divider. Leftover 10 splits 5/5 across the spacers.
        let mut buf = Buffer::new(10, 11);
        vstack(vec![spacer(), divider().into(), spacer()]).render(&mut buf, 0, 0, 10, 11);
        assert_eq!(buf.row_text(5), "──────────");
    }

    #[test]
    fn vstack_flex_remainder_is_dropped() {
        // Leftover 9 over weight 2: unit 4, remainder 1 undistributed.
        let mut buf = Buffer::new(10, 10);
        vstack(vec![spacer(), divider().into(), spacer()]).render(&mut buf, 0, 0, 10, 10);
        assert_eq!(buf.row_text(4), "──────────");
    }

    #[test]
    fn vstack_flex_weights_are_proportional() {
        // Weights 1 and 3 over leftover 8: rows 2 and 6.
        let mut buf = Buffer::new(4, 10);
        vstack(vec![
            vstack(vec![]).flex(1).into(),
            divider().into(),
            vstack(vec![]).flex(3).into(),
            divider().into(),
        ])
        .render(&mut buf, 0, 0, 4, 10);
        assert_eq!(buf.row_text(2), "────");
        assert_eq!(buf.row_text(9), "────");
    }

    #[test]
    fn vstack_justify_center() {
        // Fixed content of 4 rows inside 10: content starts at row 3.
        let mut buf = Buffer::new(4, 10);
        vstack(vec![
            divider().into(),
            divider().into(),
            divider().into(),
            divider().into(),
        ])
        .justify(Align::Center)
        .render(&mut buf, 0, 0, 4, 10);
        assert_eq!(buf.row_text(2), "");
        assert_eq!(buf.row_text(3), "────");
        assert_eq!(buf.row_text(6), "────");
    }

    #[test]
    fn vstack_justify_end() {
        let mut buf = Buffer::new(4, 5);
        vstack(vec![divider().into()])
            .justify(Align::End)
            .render(&mut buf, 0, 0, 4, 5);
        assert_eq!(buf.row_text(4), "────");
    }

    #[test]
    fn vstack_justify_ignored_when_flexing() {
        let mut buf = Buffer::new(4, 5);
        vstack(vec![divider().into(), spacer()])
            .justify(Align::End)
            .render(&mut buf, 0, 0, 4, 5);
        // The spacer consumes the leftover, so content starts at the top.
        assert_eq!(buf.row_text(0), "────");
    }

    #[test]
    fn vstack_padding_insets_children() {
        let mut buf = Buffer::new(10, 5);
        vstack(vec![text("x").into()])
            .padding(1, 2)
            .render(&mut buf, 0, 0, 10, 5);
        assert_eq!(buf.char_at(2, 1), Some('x'));
    }

    #[test]
    fn vstack_clamps_children_to_budget() {
        let mut buf = Buffer::new(10, 2);
        let used = vstack(vec![
            text("a").into(),
            text("b").into(),
            text("c").into(),
        ])
        .render(&mut buf, 0, 0, 10, 2);
        assert_eq!(used, 2);
        assert!(!buf.contains_text("c"));
    }

    #[test]
    fn empty_stack_renders_nothing() {
        let mut buf = Buffer::new(10, 5);
        assert_eq!(vstack(vec![]).render(&mut buf, 0, 0, 10, 5), 0);
    }

    // ── vertical measurement ─────────────────────────────────────────

    #[test]
    fn vstack_measures_children_gaps_and_padding() {
        let stack = vstack(vec![text("a").into(), text("b").into()])
            .gap(1)
            .padding(1, 0);
        assert_eq!(stack.measure_height(10), 5);
    }

    #[test]
    fn vstack_fixed_height_overrides_measure() {
        let stack = vstack(vec![text("a").into()]).height(7);
        assert_eq!(stack.measure_height(10), 7);
    }

    // ── horizontal stacking ──────────────────────────────────────────

    #[test]
    fn hstack_places_left_to_right() {
        let mut buf = Buffer::new(10, 1);
        hstack(vec![text("ab").into(), text("cd").into()]).render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.row_text(0), "abcd");
    }

    #[test]
    fn hstack_gap_separates_children() {
        let mut buf = Buffer::new(10, 1);
        hstack(vec![text("a").into(), text("b").into()])
            .gap(3)
            .render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.char_at(0, 0), Some('a'));
        assert_eq!(buf.char_at(4, 0), Some('b'));
    }

    #[test]
    fn hstack_spacer_pushes_content_apart() {
        let mut buf = Buffer::new(10, 1);
        hstack(vec![text("L").into(), spacer(), text("R").into()])
            .render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.char_at(0, 0), Some('L'));
        assert_eq!(buf.char_at(9, 0), Some('R'));
    }

    #[test]
    fn hstack_equal_weights_split_evenly() {
        // Width 10, two weight-1 children: columns 0 and 5.
        let mut buf = Buffer::new(10, 1);
        hstack(vec![
            text("a").flex(1).into(),
            text("b").flex(1).into(),
        ])
        .render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.char_at(0, 0), Some('a'));
        assert_eq!(buf.char_at(5, 0), Some('b'));
    }

    #[test]
    fn hstack_weighted_split() {
        // Width 8, weights 1/1/2: slots of 2, 2 and 4 columns.
        let mut buf = Buffer::new(8, 1);
        hstack(vec![
            text("a").flex(1).into(),
            text("b").flex(1).into(),
            text("c").flex(2).into(),
        ])
        .render(&mut buf, 0, 0, 8, 1);
        assert_eq!(buf.char_at(0, 0), Some('a'));
        assert_eq!(buf.char_at(2, 0), Some('b'));
        assert_eq!(buf.char_at(4, 0), Some('c'));
    }

    #[test]
    fn hstack_justify_center() {
        let mut buf = Buffer::new(10, 1);
        hstack(vec![text("ab").into()])
            .justify(Align::Center)
            .render(&mut buf, 0, 0, 10, 1);
        assert_eq!(buf.char_at(4, 0), Some('a'));
    }

    #[test]
    fn hstack_height_is_tallest_child() {
        let mut buf = Buffer::new(12, 4);
        let used = hstack(vec![
            text("one").into(),
            text("four lines\nhere").wrap(true).width(5).into(),
        ])
        .render(&mut buf, 0, 0, 12, 4);
        assert!(used >= 2);
    }

    #[test]
    fn hstack_flexible_child_fills_the_row() {
        // A spacer has no intrinsic height; the row hands it its full
        // height and reports that as the row height.
        let mut buf = Buffer::new(10, 3);
        let used = hstack(vec![spacer()]).render(&mut buf, 0, 0, 10, 3);
        assert_eq!(used, 3);
    }

    #[test]
    fn hstack_uses_at_least_one_row() {
        let mut buf = Buffer::new(10, 3);
        let used = hstack(vec![super::super::empty()]).render(&mut buf, 0, 0, 10, 3);
        assert_eq!(used, 1);
    }

    // ── horizontal measurement ───────────────────────────────────────

    #[test]
    fn hstack_measure_width_sums_children_and_gaps() {
        let stack = hstack(vec![text("ab").into(), text("cde").into()]).gap(2);
        assert_eq!(stack.measure_width(), 7);
    }

    #[test]
    fn vstack_measure_width_takes_widest_child() {
        let stack = vstack(vec![text("ab").into(), text("cdef").into()]);
        assert_eq!(stack.measure_width(), 4);
    }
}
