//! View model: panes over shared documents, the split-tree layout, and the
//! table that dedupes documents by canonical path.
//!
//! Ownership is deliberately one-directional: the layout tree holds pane ids,
//! panes hold strong references to documents, and documents hold nothing
//! back. The document table keeps only weak references, so a document lives
//! exactly as long as its longest-holding pane and is reclaimed when the last
//! pane over it closes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::rc::{Rc, Weak};

use core_state::Document;
use core_text::Position;
use tracing::trace;

pub mod layout;

pub use layout::{
    collect_layout, focus_target, remove_leaf, split_leaf, FocusDir, LayoutNode, Orientation,
    PaneId, Rect,
};

/// Shared handle to one document.
pub type DocHandle = Rc<RefCell<Document>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    pub top_line: usize,
    pub left_col: usize,
}

/// A view onto a document: cursor and viewport are per pane, the text and its
/// undo history are shared through the handle.
pub struct Pane {
    pub doc: DocHandle,
    pub cursor: Position,
    pub vp: Viewport,
}

impl Pane {
    pub fn new(doc: DocHandle) -> Self {
        Self {
            doc,
            cursor: Position::origin(),
            vp: Viewport::default(),
        }
    }
}

/// Absolute, lexically normalized path used as the document table key. Purely
/// lexical: `.` and `..` components are resolved, symlinks are not.
pub fn canonical_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut out = PathBuf::new();
    for comp in absolute.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Weak document registry keyed by canonical path. Opening an already-open
/// path shares the live document; dead entries are pruned on lookup.
#[derive(Default)]
pub struct DocTable {
    map: HashMap<PathBuf, Weak<RefCell<Document>>>,
}

impl DocTable {
    pub fn lookup(&mut self, path: &Path) -> Option<DocHandle> {
        let key = canonical_key(path);
        match self.map.get(&key) {
            Some(weak) => match weak.upgrade() {
                Some(doc) => Some(doc),
                None => {
                    self.map.remove(&key);
                    None
                }
            },
            None => None,
        }
    }

    pub fn register(&mut self, path: &Path, doc: &DocHandle) {
        let key = canonical_key(path);
        trace!(target: "model.docs", key = %key.display(), "register_document");
        self.map.insert(key, Rc::downgrade(doc));
    }
}

/// Panes, their layout, and the active-pane pointer.
///
/// Pane slots are never reused: closing a pane clears its slot (dropping the
/// document handle) while the id stays burned. The layout tree only ever
/// references live slots.
pub struct Workspace {
    panes: Vec<Option<Pane>>,
    pub layout: LayoutNode,
    active: PaneId,
    pub docs: DocTable,
}

impl Workspace {
    pub fn new(first: Pane) -> Self {
        Self {
            panes: vec![Some(first)],
            layout: LayoutNode::Leaf(0),
            active: 0,
            docs: DocTable::default(),
        }
    }

    pub fn active_id(&self) -> PaneId {
        self.active
    }

    /// Make `id` the active pane if its slot is alive. Returns whether the
    /// switch happened.
    pub fn set_active(&mut self, id: PaneId) -> bool {
        if self.panes.get(id).map_or(false, Option::is_some) {
            self.active = id;
            true
        } else {
            false
        }
    }

    pub fn pane(&self) -> &Pane {
        self.panes[self.active]
            .as_ref()
            .expect("active pane slot is always live")
    }

    pub fn pane_mut(&mut self) -> &mut Pane {
        self.panes[self.active]
            .as_mut()
            .expect("active pane slot is always live")
    }

    pub fn pane_by_id(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id).and_then(Option::as_ref)
    }

    pub fn pane_by_id_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(id).and_then(Option::as_mut)
    }

    pub fn doc(&self) -> DocHandle {
        Rc::clone(&self.pane().doc)
    }

    /// Register a new pane slot without touching the layout.
    pub fn add_pane(&mut self, pane: Pane) -> PaneId {
        self.panes.push(Some(pane));
        self.panes.len() - 1
    }

    /// Split the active pane's leaf, giving half the space to `pane`.
    /// Returns the new pane id; the caller decides whether to focus it.
    pub fn split_active(&mut self, orient: Orientation, pane: Pane) -> Option<PaneId> {
        let new_id = self.add_pane(pane);
        if split_leaf(&mut self.layout, self.active, new_id, orient, 0.5) {
            Some(new_id)
        } else {
            // Layout had no leaf for the active pane; roll the slot back.
            self.panes.pop();
            None
        }
    }

    /// Close the active pane. Fails when it is the only one. The new active
    /// pane is the first leaf in traversal order.
    pub fn close_active(&mut self) -> bool {
        let closing = self.active;
        if !remove_leaf(&mut self.layout, closing) {
            return false;
        }
        self.panes[closing] = None;
        if let Some(first) = self.leaf_order().first().copied() {
            self.active = first;
        }
        trace!(target: "model.panes", closed = closing, active = self.active, "pane_closed");
        true
    }

    /// Live pane ids in layout traversal order.
    pub fn leaf_order(&self) -> Vec<PaneId> {
        // Geometry does not matter for ordering; use a nominal area large
        // enough that no leaf degenerates to zero size and gets skipped.
        let mut rects = Vec::new();
        collect_layout(&self.layout, Rect::new(0, 0, 4096, 4096), &mut rects);
        rects.into_iter().map(|(pane, _)| pane).collect()
    }

    pub fn pane_count(&self) -> usize {
        self.leaf_order().len()
    }

    pub fn collect(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        let mut rects = Vec::new();
        collect_layout(&self.layout, area, &mut rects);
        rects
    }

    /// Ctrl-W w: cycle to the next pane in traversal order.
    pub fn next_pane(&self) -> PaneId {
        let order = self.leaf_order();
        if order.len() <= 1 {
            return self.active;
        }
        let idx = order.iter().position(|p| *p == self.active).unwrap_or(0);
        order[(idx + 1) % order.len()]
    }
}
