//! Pane layout: a binary split tree whose leaves are pane ids.
//!
//! Internal nodes carry an orientation and a ratio in (0, 1); geometry is
//! produced by recursive descent over a screen rectangle, partitioning the
//! primary axis at `floor(total * ratio)` clamped so each side keeps at least
//! one cell. Every leaf id is distinct and every live pane appears in exactly
//! one leaf.

/// Index of a pane slot in the workspace. Ids are stable for the lifetime of
/// the pane and never reused for a different split position.
pub type PaneId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub row: u16,
    pub col: u16,
    pub height: u16,
    pub width: u16,
}

impl Rect {
    pub fn new(row: u16, col: u16, height: u16, width: u16) -> Self {
        Self { row, col, height, width }
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        row >= self.row
            && row < self.row + self.height
            && col >= self.col
            && col < self.col + self.width
    }

    fn center(&self) -> (i32, i32) {
        (
            i32::from(self.row) + i32::from(self.height) / 2,
            i32::from(self.col) + i32::from(self.width) / 2,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Side by side; the split partitions columns.
    Vertical,
    /// Stacked; the split partitions rows.
    Horizontal,
}

#[derive(Debug, Clone)]
pub enum LayoutNode {
    Leaf(PaneId),
    Split {
        orient: Orientation,
        /// Share of the primary axis given to `a`.
        ratio: f32,
        a: Box<LayoutNode>,
        b: Box<LayoutNode>,
    },
}

fn clamp_split(total: u16, ratio: f32) -> u16 {
    if total <= 1 {
        return total;
    }
    let primary = (f32::from(total) * ratio) as u16;
    primary.clamp(1, total - 1)
}

/// Flatten the tree into `(pane, rect)` pairs in traversal order. Degenerate
/// rectangles (zero area) are skipped along with their subtrees.
pub fn collect_layout(node: &LayoutNode, area: Rect, out: &mut Vec<(PaneId, Rect)>) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    match node {
        LayoutNode::Leaf(pane) => out.push((*pane, area)),
        LayoutNode::Split { orient, ratio, a, b } => match orient {
            Orientation::Vertical => {
                let left_w = clamp_split(area.width, *ratio);
                let left = Rect::new(area.row, area.col, area.height, left_w);
                let right = Rect::new(area.row, area.col + left_w, area.height, area.width - left_w);
                collect_layout(a, left, out);
                collect_layout(b, right, out);
            }
            Orientation::Horizontal => {
                let top_h = clamp_split(area.height, *ratio);
                let top = Rect::new(area.row, area.col, top_h, area.width);
                let bottom = Rect::new(area.row + top_h, area.col, area.height - top_h, area.width);
                collect_layout(a, top, out);
                collect_layout(b, bottom, out);
            }
        },
    }
}

/// Replace the leaf holding `target` with a split whose `a` side is the old
/// leaf and whose `b` side is a new leaf over `new_pane`.
pub fn split_leaf(
    node: &mut LayoutNode,
    target: PaneId,
    new_pane: PaneId,
    orient: Orientation,
    ratio: f32,
) -> bool {
    match node {
        LayoutNode::Leaf(pane) if *pane == target => {
            let old = std::mem::replace(node, LayoutNode::Leaf(new_pane));
            *node = LayoutNode::Split {
                orient,
                ratio,
                a: Box::new(old),
                b: Box::new(LayoutNode::Leaf(new_pane)),
            };
            true
        }
        LayoutNode::Leaf(_) => false,
        LayoutNode::Split { a, b, .. } => {
            split_leaf(a, target, new_pane, orient, ratio)
                || split_leaf(b, target, new_pane, orient, ratio)
        }
    }
}

fn remove_leaf_inner(node: LayoutNode, target: PaneId) -> (Option<LayoutNode>, bool) {
    match node {
        LayoutNode::Leaf(pane) if pane == target => (None, true),
        leaf @ LayoutNode::Leaf(_) => (Some(leaf), false),
        LayoutNode::Split { orient, ratio, a, b } => {
            let (a, removed_a) = remove_leaf_inner(*a, target);
            let (b, removed_b) = if removed_a {
                (Some(*b), false)
            } else {
                remove_leaf_inner(*b, target)
            };
            let removed = removed_a || removed_b;
            match (a, b) {
                (Some(a), Some(b)) => (
                    Some(LayoutNode::Split {
                        orient,
                        ratio,
                        a: Box::new(a),
                        b: Box::new(b),
                    }),
                    removed,
                ),
                // A split left with one child collapses into that child.
                (Some(only), None) | (None, Some(only)) => (Some(only), removed),
                (None, None) => (None, removed),
            }
        }
    }
}

/// Remove the leaf holding `target`, collapsing its parent split. Refuses
/// when the root itself is the only leaf.
pub fn remove_leaf(root: &mut LayoutNode, target: PaneId) -> bool {
    if matches!(root, LayoutNode::Leaf(_)) {
        return false;
    }
    let taken = std::mem::replace(root, LayoutNode::Leaf(PaneId::MAX));
    let (rebuilt, removed) = remove_leaf_inner(taken, target);
    match rebuilt {
        Some(node) => {
            *root = node;
            removed
        }
        None => {
            debug_assert!(false, "split root cannot lose both children");
            false
        }
    }
}

/// Direction for Ctrl-W h/j/k/l pane focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDir {
    Left,
    Down,
    Up,
    Right,
}

/// Pick the pane whose center lies on the `dir` side of the active pane's
/// center, minimizing squared center distance. `None` when no pane qualifies.
pub fn focus_target(
    rects: &[(PaneId, Rect)],
    active: PaneId,
    dir: FocusDir,
) -> Option<PaneId> {
    let (_, cur) = rects.iter().find(|(pane, _)| *pane == active)?;
    let (cr, cc) = cur.center();
    let mut best: Option<(i32, PaneId)> = None;
    for (pane, rect) in rects {
        if *pane == active {
            continue;
        }
        let (rr, rc) = rect.center();
        let (dr, dc) = (rr - cr, rc - cc);
        let ok = match dir {
            FocusDir::Left => dc < 0,
            FocusDir::Right => dc > 0,
            FocusDir::Up => dr < 0,
            FocusDir::Down => dr > 0,
        };
        if !ok {
            continue;
        }
        let score = dr * dr + dc * dc;
        if best.map_or(true, |(s, _)| score < s) {
            best = Some((score, *pane));
        }
    }
    best.map(|(_, pane)| pane)
}
