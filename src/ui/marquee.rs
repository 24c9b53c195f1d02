// Marquee (rubber-band) selection
//
// Hit testing only: the engine knows item rectangles and pointer positions,
// not galleries. The controller feeds its output into GalleryStore.

use crate::models::{Point, Rect};
use crate::state::SelectionMode;
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerDown<K> {
    /// An item was clicked; no marquee is started
    Item(K),
    /// Empty space was pressed; a drag is now in progress
    MarqueeStarted,
}

/// A selection produced by a marquee drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeSelection<K: Hash + Eq> {
    /// Items whose rectangles intersect the marquee
    pub items: IndexSet<K>,
    /// How the items combine with the current selection
    pub mode: SelectionMode,
}

#[derive(Debug, Clone, Copy)]
struct MarqueeState {
    start: Point,
    current: Point,
}

/// Rubber-band hit tester over registered item rectangles.
///
/// All coordinates are content coordinates; convert pointer positions with
/// [`Viewport::to_content`](crate::models::Viewport::to_content) first.
#[derive(Debug, Clone)]
pub struct SelectionEngine<K: Hash + Eq> {
    registry: IndexMap<K, Rect>,
    drag: Option<MarqueeState>,
    last_emitted: IndexSet<K>,
}

impl<K: Clone + Hash + Eq> SelectionEngine<K> {
    pub fn new() -> Self {
        Self {
            registry: IndexMap::new(),
            drag: None,
            last_emitted: IndexSet::new(),
        }
    }

    /// Register (or move) an item's bounding rectangle.
    pub fn register(&mut self, key: K, rect: Rect) {
        self.registry.insert(key, rect);
    }

    pub fn unregister(&mut self, key: &K) -> Option<Rect> {
        self.registry.shift_remove(key)
    }

    pub fn clear_registry(&mut self) {
        self.registry.clear();
    }

    pub fn registered_len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a gesture at `point`.
    ///
    /// When items overlap, the one registered last wins, matching paint order.
    pub fn pointer_down(&mut self, point: Point) -> PointerDown<K> {
        self.last_emitted.clear();

        if let Some(key) = self
            .registry
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(point))
            .map(|(key, _)| key.clone())
        {
            self.drag = None;
            return PointerDown::Item(key);
        }

        self.drag = Some(MarqueeState {
            start: point,
            current: point,
        });
        PointerDown::MarqueeStarted
    }

    /// Extend the drag to `point`.
    ///
    /// Returns a selection only when the intersecting set differs from the
    /// one last returned during this gesture. A marquee with zero width or
    /// height selects nothing and returns `None`. `mode` comes from the
    /// modifier keys held during the move; a `bool` means additive or not.
    pub fn pointer_move(
        &mut self,
        point: Point,
        mode: impl Into<SelectionMode>,
    ) -> Option<MarqueeSelection<K>> {
        let drag = self.drag.as_mut()?;
        drag.current = point;

        let rect = Rect::from_points(drag.start, drag.current);
        if rect.is_empty() {
            return None;
        }

        let hits = self.hit_test(&rect);
        if hits == self.last_emitted {
            return None;
        }

        self.last_emitted = hits.clone();
        Some(MarqueeSelection {
            items: hits,
            mode: mode.into(),
        })
    }

    /// End the gesture. Returns whether a marquee was in progress.
    pub fn pointer_up(&mut self) -> bool {
        self.last_emitted.clear();
        self.drag.take().is_some()
    }

    /// The rubber band to draw, if a drag is in progress.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.drag
            .map(|drag| Rect::from_points(drag.start, drag.current))
    }

    /// Registered items whose rectangles intersect `rect`, in registration order.
    pub fn hit_test(&self, rect: &Rect) -> IndexSet<K> {
        self.registry
            .iter()
            .filter(|(_, item)| item.intersects(rect))
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl<K: Clone + Hash + Eq> Default for SelectionEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}
