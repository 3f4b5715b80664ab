//! Rope backend: a self-balancing binary tree whose leaves hold up to 128
//! lines. Mutations are structural splits and concatenations; AVL rotations
//! keep the height logarithmic, and a normalize pass after each structural
//! operation merges adjacent small leaves back together so leaf utilization
//! does not decay under churn.

use crate::LineStore;

const LEAF_MAX_LINES: usize = 128;
const PARALLEL_BUILD_MIN: usize = 4096;

#[derive(Debug, Clone)]
struct Node {
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
    /// Non-empty only for leaves.
    lines: Vec<String>,
    line_count: usize,
    height: i32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            lines: Vec::new(),
            line_count: 0,
            height: 1,
        }
    }
}

fn count(n: &Option<Box<Node>>) -> usize {
    n.as_ref().map_or(0, |n| n.line_count)
}

fn height(n: &Option<Box<Node>>) -> i32 {
    n.as_ref().map_or(0, |n| n.height)
}

fn balance_factor(n: &Node) -> i32 {
    height(&n.left) - height(&n.right)
}

fn recalc(n: &mut Node) {
    n.line_count = count(&n.left) + count(&n.right) + n.lines.len();
    n.height = 1 + height(&n.left).max(height(&n.right));
}

fn make_leaf(lines: Vec<String>) -> Box<Node> {
    let mut n = Box::new(Node {
        lines,
        ..Node::default()
    });
    recalc(&mut n);
    n
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let mut y = x.right.take().expect("rotate_left requires a right child");
    x.right = y.left.take();
    recalc(&mut x);
    y.left = Some(x);
    recalc(&mut y);
    y
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let mut x = y.left.take().expect("rotate_right requires a left child");
    y.left = x.right.take();
    recalc(&mut y);
    x.right = Some(y);
    recalc(&mut x);
    x
}

fn balance(mut n: Box<Node>) -> Box<Node> {
    recalc(&mut n);
    let bf = balance_factor(&n);
    if bf > 1 {
        if n.left.as_ref().is_some_and(|l| balance_factor(l) < 0) {
            n.left = n.left.take().map(rotate_left);
            recalc(&mut n);
        }
        rotate_right(n)
    } else if bf < -1 {
        if n.right.as_ref().is_some_and(|r| balance_factor(r) > 0) {
            n.right = n.right.take().map(rotate_right);
            recalc(&mut n);
        }
        rotate_left(n)
    } else {
        n
    }
}

fn concat(a: Option<Box<Node>>, b: Option<Box<Node>>) -> Option<Box<Node>> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => {
            let mut p = Box::new(Node::default());
            p.left = Some(a);
            p.right = Some(b);
            recalc(&mut p);
            Some(balance(p))
        }
    }
}

/// Split into (first `k` lines, rest), descending by cumulative line count and
/// subdividing the leaf `k` lands inside.
fn split(n: Option<Box<Node>>, k: usize) -> (Option<Box<Node>>, Option<Box<Node>>) {
    let Some(mut n) = n else {
        return (None, None);
    };
    let left_count = count(&n.left);
    if k < left_count {
        let (a, b) = split(n.left.take(), k);
        n.left = b;
        recalc(&mut n);
        return (a, Some(balance(n)));
    }
    let mut k = k - left_count;
    if k < n.lines.len() {
        // Interior of a leaf (internal nodes carry no lines of their own).
        let right_lines = n.lines.split_off(k);
        let left_lines = std::mem::take(&mut n.lines);
        let mut rest = Box::new(Node::default());
        rest.left = Some(make_leaf(right_lines));
        rest.right = n.right.take();
        recalc(&mut rest);
        return (Some(make_leaf(left_lines)), Some(balance(rest)));
    }
    k -= n.lines.len();
    let (a, b) = split(n.right.take(), k);
    n.right = a;
    recalc(&mut n);
    (Some(balance(n)), b)
}

fn build_balanced(lines: &[String]) -> Option<Box<Node>> {
    if lines.is_empty() {
        return None;
    }
    if lines.len() <= LEAF_MAX_LINES {
        return Some(make_leaf(lines.to_vec()));
    }
    let mid = lines.len() / 2;
    concat(build_balanced(&lines[..mid]), build_balanced(&lines[mid..]))
}

/// Bottom-up balanced build; halves run on two threads when the input is
/// large. Pure fork-join, both halves joined before this returns.
fn build_balanced_parallel(lines: &[String]) -> Option<Box<Node>> {
    if lines.len() <= PARALLEL_BUILD_MIN {
        return build_balanced(lines);
    }
    let mid = lines.len() / 2;
    let (left_half, right_half) = lines.split_at(mid);
    let (left, right) = std::thread::scope(|scope| {
        let handle = scope.spawn(|| build_balanced(left_half));
        let right = build_balanced(right_half);
        (handle.join().expect("rope build worker panicked"), right)
    });
    concat(left, right)
}

fn line_at(root: &Option<Box<Node>>, r: usize) -> String {
    let mut cur = root.as_deref();
    let mut idx = r;
    while let Some(n) = cur {
        let lc = count(&n.left);
        if idx < lc {
            cur = n.left.as_deref();
            continue;
        }
        idx -= lc;
        if idx < n.lines.len() {
            return n.lines[idx].clone();
        }
        idx -= n.lines.len();
        cur = n.right.as_deref();
    }
    String::new()
}

/// Merge adjacent small leaves (combined size within the leaf cap) and
/// re-split oversized ones, rebalancing along the way.
fn normalize(n: Option<Box<Node>>) -> Option<Box<Node>> {
    let mut n = n?;
    if n.left.is_none() && n.right.is_none() {
        if n.lines.len() <= LEAF_MAX_LINES {
            recalc(&mut n);
            return Some(n);
        }
        let mid = n.lines.len() / 2;
        let right_lines = n.lines.split_off(mid);
        let left_lines = std::mem::take(&mut n.lines);
        return concat(Some(make_leaf(left_lines)), Some(make_leaf(right_lines)))
            .map(balance);
    }
    n.left = normalize(n.left.take());
    n.right = normalize(n.right.take());
    if let (Some(l), Some(r)) = (&n.left, &n.right) {
        let both_leaves =
            l.left.is_none() && l.right.is_none() && r.left.is_none() && r.right.is_none();
        if both_leaves && l.lines.len() + r.lines.len() <= LEAF_MAX_LINES {
            let mut merged = n.left.take().map(|l| l.lines).unwrap_or_default();
            if let Some(r) = n.right.take() {
                merged.extend(r.lines);
            }
            return Some(make_leaf(merged));
        }
    }
    recalc(&mut n);
    Some(balance(n))
}

#[derive(Debug, Default, Clone)]
pub struct RopeStore {
    root: Option<Box<Node>>,
}

impl LineStore for RopeStore {
    fn init(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            self.root = None;
            return;
        }
        self.root = normalize(build_balanced_parallel(&lines));
    }

    fn count(&self) -> usize {
        count(&self.root)
    }

    fn get(&self, r: usize) -> String {
        if r >= self.count() {
            return String::new();
        }
        line_at(&self.root, r)
    }

    fn insert_line(&mut self, r: usize, s: &str) {
        let r = r.min(self.count());
        let (a, b) = split(self.root.take(), r);
        let m = make_leaf(vec![s.to_string()]);
        self.root = normalize(concat(concat(a, Some(m)), b));
    }

    fn insert_lines(&mut self, r: usize, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let r = r.min(self.count());
        let (a, b) = split(self.root.take(), r);
        let m = if lines.len() >= PARALLEL_BUILD_MIN {
            build_balanced_parallel(lines)
        } else {
            build_balanced(lines)
        };
        self.root = normalize(concat(concat(a, m), b));
    }

    fn erase_line(&mut self, r: usize) {
        self.erase_lines(r, r + 1);
    }

    fn erase_lines(&mut self, start: usize, end: usize) {
        let total = self.count();
        let end = end.max(start).min(total);
        if start >= total || start == end {
            return;
        }
        let (a, b) = split(self.root.take(), start);
        let (_, c) = split(b, end - start);
        self.root = normalize(concat(a, c));
    }

    fn replace_line(&mut self, r: usize, s: &str) {
        if r >= self.count() {
            return;
        }
        let (a, b) = split(self.root.take(), r);
        let (_, c) = split(b, 1);
        let m = make_leaf(vec![s.to_string()]);
        self.root = normalize(concat(concat(a, Some(m)), c));
    }

    fn name(&self) -> &'static str {
        "rope"
    }
}
