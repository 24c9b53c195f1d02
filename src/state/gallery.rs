use super::filter::SearchFilter;
use super::pagination::{PageInfo, Pagination};
use crate::models::{GalleryItem, ThumbnailState};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Which of the two galleries in a tab a store backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryRole {
    /// Everything the last scan found
    Found,
    /// Items the user has collected from the found gallery
    Selected,
}

impl fmt::Display for GalleryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryRole::Found => write!(f, "found"),
            GalleryRole::Selected => write!(f, "selected"),
        }
    }
}

/// Change notifications produced by [`GalleryStore`] mutations.
///
/// Rendering code applies these incrementally instead of re-reading the
/// whole store.
#[derive(Clone, Debug, PartialEq)]
pub enum GalleryChange {
    /// The item list (or its filtered view) was replaced wholesale
    ItemsReplaced { total: usize, visible: usize },

    /// A pending thumbnail resolved
    ThumbnailReady { path: Utf8PathBuf, loaded: bool },

    /// Selection diff; only ever carries actual differences
    SelectionChanged {
        added: Vec<Utf8PathBuf>,
        removed: Vec<Utf8PathBuf>,
    },

    /// Page index, page size, or page count changed
    PageChanged(PageInfo),
}

/// How a batch of paths combines with the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// The batch becomes the selection
    #[default]
    Replace,
    /// Union into the selection (Shift)
    Additive,
    /// Remove the batch from the selection (Ctrl)
    Subtractive,
}

impl From<bool> for SelectionMode {
    fn from(additive: bool) -> Self {
        if additive {
            SelectionMode::Additive
        } else {
            SelectionMode::Replace
        }
    }
}

/// Thumbnail progress across a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThumbnailCounts {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

/// Ordered item collection with selection, paging, and an optional filter.
///
/// Invariants kept by every mutation:
/// - item paths are unique, order is insertion order
/// - the selection is a subset of the item paths
/// - the page index stays within the page count of the visible list
///
/// Mutations return the [`GalleryChange`]s they caused. An operation that
/// changes nothing returns an empty vector.
#[derive(Debug, Clone)]
pub struct GalleryStore {
    role: GalleryRole,
    items: IndexMap<Utf8PathBuf, GalleryItem>,
    /// Indices into `items` that pass the filter, in item order
    visible: Vec<usize>,
    selection: IndexSet<Utf8PathBuf>,
    pagination: Pagination,
    filter: Option<SearchFilter>,
}

impl GalleryStore {
    pub fn new(role: GalleryRole, page_size: usize) -> Self {
        Self {
            role,
            items: IndexMap::new(),
            visible: Vec::new(),
            selection: IndexSet::new(),
            pagination: Pagination::new(page_size),
            filter: None,
        }
    }

    pub fn role(&self) -> GalleryRole {
        self.role
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.items.contains_key(path)
    }

    pub fn get(&self, path: &Utf8Path) -> Option<&GalleryItem> {
        self.items.get(path)
    }

    /// All items in order, ignoring the filter.
    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.values()
    }

    pub fn item_paths(&self) -> Vec<Utf8PathBuf> {
        self.items.keys().cloned().collect()
    }

    /// Items passing the filter, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.visible
            .iter()
            .filter_map(|&index| self.items.get_index(index).map(|(_, item)| item))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The slice of visible items on the current page.
    pub fn current_page_items(&self) -> Vec<&GalleryItem> {
        let range = self.pagination.range(self.visible.len());
        self.visible[range]
            .iter()
            .filter_map(|&index| self.items.get_index(index).map(|(_, item)| item))
            .collect()
    }

    /// Selected paths in selection order.
    pub fn selected_paths(&self) -> Vec<Utf8PathBuf> {
        self.selection.iter().cloned().collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, path: &Utf8Path) -> bool {
        self.selection.contains(path)
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info(self.visible.len())
    }

    pub fn filter_query(&self) -> Option<&str> {
        self.filter.as_ref().map(SearchFilter::query)
    }

    pub fn thumbnail_counts(&self) -> ThumbnailCounts {
        self.items
            .values()
            .fold(ThumbnailCounts::default(), |mut counts, item| {
                match item.thumbnail {
                    ThumbnailState::Pending => counts.pending += 1,
                    ThumbnailState::Loaded(_) => counts.loaded += 1,
                    ThumbnailState::Failed => counts.failed += 1,
                }
                counts
            })
    }

    /// Replace the item list.
    ///
    /// Duplicate paths keep their first occurrence. Selected paths that are
    /// gone from the new list are dropped from the selection, and paging
    /// returns to the first page.
    pub fn set_items(&mut self, items: Vec<GalleryItem>) -> Vec<GalleryChange> {
        let mut map = IndexMap::with_capacity(items.len());
        for item in items {
            map.entry(item.path.clone()).or_insert(item);
        }
        self.items = map;

        let mut changes = Vec::new();
        let removed = self.prune_selection();

        self.rebuild_view();
        self.pagination.reset();

        changes.push(self.items_replaced());
        if !removed.is_empty() {
            changes.push(GalleryChange::SelectionChanged {
                added: Vec::new(),
                removed,
            });
        }
        changes.push(GalleryChange::PageChanged(self.page_info()));

        tracing::debug!("{} gallery now holds {} items", self.role, self.items.len());
        changes
    }

    /// Empty the store. The filter is kept.
    pub fn clear(&mut self) -> Vec<GalleryChange> {
        self.set_items(Vec::new())
    }

    /// Append items not already present, keeping their thumbnail state.
    pub fn append_items<I>(&mut self, items: I) -> Vec<GalleryChange>
    where
        I: IntoIterator<Item = GalleryItem>,
    {
        let before = self.items.len();
        for item in items {
            if !self.items.contains_key(&item.path) {
                self.items.insert(item.path.clone(), item);
            }
        }

        if self.items.len() == before {
            return Vec::new();
        }

        let old_page = self.page_info();
        self.rebuild_view();
        self.pagination.clamp(self.visible.len());

        let mut changes = vec![self.items_replaced()];
        self.push_page_change(old_page, &mut changes);
        changes
    }

    /// Resolve a pending thumbnail.
    ///
    /// Only `Pending` items are updated; a path that is absent or already
    /// resolved is ignored, as is a `Pending` state.
    pub fn apply_thumbnail(
        &mut self,
        path: &Utf8Path,
        state: ThumbnailState,
    ) -> Option<GalleryChange> {
        if state.is_pending() {
            return None;
        }

        let item = self.items.get_mut(path)?;
        if !item.thumbnail.is_pending() {
            return None;
        }

        let loaded = state.is_loaded();
        item.thumbnail = state;
        Some(GalleryChange::ThumbnailReady {
            path: path.to_path_buf(),
            loaded,
        })
    }

    /// Flip selection for one item. Unknown paths are ignored.
    pub fn toggle_selection(&mut self, path: &Utf8Path) -> Vec<GalleryChange> {
        if !self.items.contains_key(path) {
            return Vec::new();
        }

        let change = if self.selection.shift_remove(path) {
            GalleryChange::SelectionChanged {
                added: Vec::new(),
                removed: vec![path.to_path_buf()],
            }
        } else {
            self.selection.insert(path.to_path_buf());
            GalleryChange::SelectionChanged {
                added: vec![path.to_path_buf()],
                removed: Vec::new(),
            }
        };
        vec![change]
    }

    /// Apply a batch selection (usually from a marquee drag).
    ///
    /// `Replace` makes the batch the new selection, `Additive` unions it into
    /// the current one and `Subtractive` removes it. A plain `bool` converts
    /// to `Additive` or `Replace`. Paths not in the store are ignored.
    pub fn select_batch<I, M>(&mut self, paths: I, mode: M) -> Vec<GalleryChange>
    where
        I: IntoIterator<Item = Utf8PathBuf>,
        M: Into<SelectionMode>,
    {
        let incoming: IndexSet<Utf8PathBuf> = paths
            .into_iter()
            .filter(|path| self.items.contains_key(path))
            .collect();

        match mode.into() {
            SelectionMode::Replace => {
                let added = self.unselected(&incoming);
                let removed: Vec<Utf8PathBuf> = self
                    .selection
                    .iter()
                    .filter(|path| !incoming.contains(*path))
                    .cloned()
                    .collect();
                self.selection = incoming;
                selection_change(added, removed)
            }
            SelectionMode::Additive => {
                let added = self.unselected(&incoming);
                self.selection.extend(added.iter().cloned());
                selection_change(added, Vec::new())
            }
            SelectionMode::Subtractive => {
                let removed: Vec<Utf8PathBuf> = incoming
                    .into_iter()
                    .filter(|path| self.selection.shift_remove(path))
                    .collect();
                selection_change(Vec::new(), removed)
            }
        }
    }

    /// Items still waiting for a thumbnail, in order.
    pub fn pending_items(&self) -> Vec<GalleryItem> {
        self.items
            .values()
            .filter(|item| item.thumbnail.is_pending())
            .cloned()
            .collect()
    }

    /// Add every item on the current page to the selection.
    pub fn select_all_on_current_page(&mut self) -> Vec<GalleryChange> {
        let page: Vec<Utf8PathBuf> = self
            .current_page_items()
            .into_iter()
            .map(|item| item.path.clone())
            .collect();
        self.select_batch(page, true)
    }

    pub fn deselect_all(&mut self) -> Vec<GalleryChange> {
        let removed: Vec<Utf8PathBuf> = self.selection.drain(..).collect();
        selection_change(Vec::new(), removed)
    }

    /// Copy this store's selected items into `target`, then clear the
    /// selection here.
    ///
    /// Items are appended in selection order, paths already in `target` are
    /// skipped, and thumbnail state travels with the item. Returns the changes
    /// for this store and for `target`, in that order.
    pub fn move_selected_to(
        &mut self,
        target: &mut GalleryStore,
    ) -> (Vec<GalleryChange>, Vec<GalleryChange>) {
        let moving: Vec<GalleryItem> = self
            .selection
            .iter()
            .filter_map(|path| self.items.get(path).cloned())
            .collect();

        let target_changes = target.append_items(moving);
        let source_changes = self.deselect_all();
        (source_changes, target_changes)
    }

    /// Drop the selected items from the store.
    pub fn remove_selected(&mut self) -> Vec<GalleryChange> {
        if self.selection.is_empty() {
            return Vec::new();
        }

        let old_page = self.page_info();
        for path in &self.selection {
            self.items.shift_remove(path);
        }
        let mut changes = self.deselect_all();

        self.rebuild_view();
        self.pagination.clamp(self.visible.len());

        changes.push(self.items_replaced());
        self.push_page_change(old_page, &mut changes);
        changes
    }

    /// Change the page size. Zero is treated as one; the current page is
    /// clamped to the new page count.
    pub fn set_items_per_page(&mut self, page_size: usize) -> Vec<GalleryChange> {
        let old_page = self.page_info();
        self.pagination
            .set_page_size(page_size, self.visible.len());

        let mut changes = Vec::new();
        self.push_page_change(old_page, &mut changes);
        changes
    }

    pub fn next_page(&mut self) -> Vec<GalleryChange> {
        if self.pagination.next(self.visible.len()) {
            vec![GalleryChange::PageChanged(self.page_info())]
        } else {
            Vec::new()
        }
    }

    pub fn prev_page(&mut self) -> Vec<GalleryChange> {
        if self.pagination.prev() {
            vec![GalleryChange::PageChanged(self.page_info())]
        } else {
            Vec::new()
        }
    }

    /// Jump to a page, clamped to the valid range.
    pub fn jump_to_page(&mut self, page_index: usize) -> Vec<GalleryChange> {
        if self.pagination.jump(page_index, self.visible.len()) {
            vec![GalleryChange::PageChanged(self.page_info())]
        } else {
            Vec::new()
        }
    }

    /// Filter visible items by a case-insensitive substring of their path.
    ///
    /// A blank query removes the filter. The selection is left alone; paging
    /// returns to the first page.
    pub fn set_filter(&mut self, query: &str) -> Result<Vec<GalleryChange>, regex::Error> {
        let filter = SearchFilter::new(query)?;
        if filter.as_ref().map(SearchFilter::query) == self.filter_query() {
            return Ok(Vec::new());
        }

        self.filter = filter;
        self.rebuild_view();
        self.pagination.reset();

        Ok(vec![
            self.items_replaced(),
            GalleryChange::PageChanged(self.page_info()),
        ])
    }

    fn rebuild_view(&mut self) {
        let filter = self.filter.as_ref();
        self.visible = self
            .items
            .values()
            .enumerate()
            .filter(|(_, item)| filter.is_none_or(|f| f.matches(item.path.as_str())))
            .map(|(index, _)| index)
            .collect();
    }

    fn unselected(&self, paths: &IndexSet<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
        paths
            .iter()
            .filter(|path| !self.selection.contains(*path))
            .cloned()
            .collect()
    }

    fn prune_selection(&mut self) -> Vec<Utf8PathBuf> {
        let removed: Vec<Utf8PathBuf> = self
            .selection
            .iter()
            .filter(|path| !self.items.contains_key(*path))
            .cloned()
            .collect();
        self.selection.retain(|path| self.items.contains_key(path));
        removed
    }

    fn items_replaced(&self) -> GalleryChange {
        GalleryChange::ItemsReplaced {
            total: self.items.len(),
            visible: self.visible.len(),
        }
    }

    fn push_page_change(&self, old: PageInfo, changes: &mut Vec<GalleryChange>) {
        let new = self.page_info();
        if new != old {
            changes.push(GalleryChange::PageChanged(new));
        }
    }
}

fn selection_change(added: Vec<Utf8PathBuf>, removed: Vec<Utf8PathBuf>) -> Vec<GalleryChange> {
    if added.is_empty() && removed.is_empty() {
        Vec::new()
    } else {
        vec![GalleryChange::SelectionChanged { added, removed }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, Thumbnail};
    use std::sync::Arc;

    fn item(path: &str) -> GalleryItem {
        GalleryItem::pending(Utf8PathBuf::from(path), MediaKind::Image)
    }

    fn store_with(paths: &[&str], page_size: usize) -> GalleryStore {
        let mut store = GalleryStore::new(GalleryRole::Found, page_size);
        store.set_items(paths.iter().map(|p| item(p)).collect());
        store
    }

    fn loaded() -> ThumbnailState {
        ThumbnailState::Loaded(Arc::new(Thumbnail::new(1, 1, vec![0, 0, 0, 255])))
    }

    #[test]
    fn test_set_items_dedupes_first_wins() {
        let mut store = GalleryStore::new(GalleryRole::Found, 10);
        let mut first = item("/a.png");
        first.thumbnail = ThumbnailState::Failed;

        store.set_items(vec![first, item("/b.png"), item("/a.png")]);

        assert_eq!(store.len(), 2);
        assert!(store.get(Utf8Path::new("/a.png")).unwrap().thumbnail.is_failed());
        assert_eq!(
            store.item_paths(),
            vec![Utf8PathBuf::from("/a.png"), Utf8PathBuf::from("/b.png")]
        );
    }

    #[test]
    fn test_set_items_prunes_selection() {
        let mut store = store_with(&["/a.png", "/b.png"], 10);
        store.toggle_selection(Utf8Path::new("/a.png"));
        store.toggle_selection(Utf8Path::new("/b.png"));

        let changes = store.set_items(vec![item("/b.png"), item("/c.png")]);

        assert!(changes.contains(&GalleryChange::SelectionChanged {
            added: vec![],
            removed: vec![Utf8PathBuf::from("/a.png")],
        }));
        assert_eq!(store.selected_paths(), vec![Utf8PathBuf::from("/b.png")]);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = store_with(&["/a.png"], 10);
        let path = Utf8Path::new("/a.png");

        store.toggle_selection(path);
        assert!(store.is_selected(path));
        let changes = store.toggle_selection(path);
        assert!(!store.is_selected(path));
        assert_eq!(
            changes,
            vec![GalleryChange::SelectionChanged {
                added: vec![],
                removed: vec![path.to_path_buf()],
            }]
        );
    }

    #[test]
    fn test_toggle_unknown_path_ignored() {
        let mut store = store_with(&["/a.png"], 10);
        assert!(store.toggle_selection(Utf8Path::new("/zzz.png")).is_empty());
        assert_eq!(store.selection_len(), 0);
    }

    #[test]
    fn test_select_batch_replace_diff() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 10);
        store.select_batch(vec![Utf8PathBuf::from("/a.png"), Utf8PathBuf::from("/b.png")], false);

        let changes = store.select_batch(
            vec![Utf8PathBuf::from("/b.png"), Utf8PathBuf::from("/c.png")],
            false,
        );

        assert_eq!(
            changes,
            vec![GalleryChange::SelectionChanged {
                added: vec![Utf8PathBuf::from("/c.png")],
                removed: vec![Utf8PathBuf::from("/a.png")],
            }]
        );
    }

    #[test]
    fn test_select_batch_additive_keeps_existing() {
        let mut store = store_with(&["/a.png", "/b.png"], 10);
        store.toggle_selection(Utf8Path::new("/a.png"));

        store.select_batch(vec![Utf8PathBuf::from("/b.png")], true);

        assert_eq!(store.selection_len(), 2);
    }

    #[test]
    fn test_select_batch_subtractive_removes_only_selected() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 10);
        store.select_batch(
            vec![Utf8PathBuf::from("/a.png"), Utf8PathBuf::from("/b.png")],
            SelectionMode::Replace,
        );

        let changes = store.select_batch(
            vec![Utf8PathBuf::from("/b.png"), Utf8PathBuf::from("/c.png")],
            SelectionMode::Subtractive,
        );

        assert_eq!(
            changes,
            vec![GalleryChange::SelectionChanged {
                added: vec![],
                removed: vec![Utf8PathBuf::from("/b.png")],
            }]
        );
        assert_eq!(store.selected_paths(), vec![Utf8PathBuf::from("/a.png")]);

        // Nothing left to remove
        assert!(store
            .select_batch(vec![Utf8PathBuf::from("/c.png")], SelectionMode::Subtractive)
            .is_empty());
    }

    #[test]
    fn test_selection_mode_from_bool() {
        assert_eq!(SelectionMode::from(true), SelectionMode::Additive);
        assert_eq!(SelectionMode::from(false), SelectionMode::Replace);
    }

    #[test]
    fn test_pending_items() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 10);
        store.apply_thumbnail(Utf8Path::new("/b.png"), ThumbnailState::Failed);

        let pending: Vec<_> = store.pending_items().into_iter().map(|i| i.path).collect();
        assert_eq!(
            pending,
            vec![Utf8PathBuf::from("/a.png"), Utf8PathBuf::from("/c.png")]
        );
    }

    #[test]
    fn test_select_batch_same_set_is_silent() {
        let mut store = store_with(&["/a.png"], 10);
        store.select_batch(vec![Utf8PathBuf::from("/a.png")], false);
        assert!(store
            .select_batch(vec![Utf8PathBuf::from("/a.png")], false)
            .is_empty());
    }

    #[test]
    fn test_apply_thumbnail_only_when_pending() {
        let mut store = store_with(&["/a.png"], 10);
        let path = Utf8Path::new("/a.png");

        assert!(store.apply_thumbnail(path, ThumbnailState::Pending).is_none());
        assert_eq!(
            store.apply_thumbnail(path, ThumbnailState::Failed),
            Some(GalleryChange::ThumbnailReady {
                path: path.to_path_buf(),
                loaded: false,
            })
        );
        assert!(store.apply_thumbnail(path, loaded()).is_none());
        assert!(store.get(path).unwrap().thumbnail.is_failed());
        assert!(store.apply_thumbnail(Utf8Path::new("/x.png"), loaded()).is_none());
    }

    #[test]
    fn test_pagination_45_items() {
        let paths: Vec<String> = (0..45).map(|i| format!("/img{i:02}.png")).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let mut store = store_with(&refs, 20);

        assert_eq!(store.page_info().page_count, 3);
        store.next_page();
        let page = store.current_page_items();
        assert_eq!(page.len(), 20);
        assert_eq!(page[0].path, Utf8PathBuf::from("/img20.png"));

        store.next_page();
        assert_eq!(store.current_page_items().len(), 5);
        assert!(store.next_page().is_empty());
        assert_eq!(store.page_info().page_index, 2);
    }

    #[test]
    fn test_set_items_per_page_clamps() {
        let paths: Vec<String> = (0..45).map(|i| format!("/img{i:02}.png")).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let mut store = store_with(&refs, 10);
        store.jump_to_page(4);

        let changes = store.set_items_per_page(50);
        assert_eq!(store.page_info().page_index, 0);
        assert_eq!(store.page_info().page_count, 1);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_select_all_on_current_page() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 2);
        store.next_page();
        store.select_all_on_current_page();
        assert_eq!(store.selected_paths(), vec![Utf8PathBuf::from("/c.png")]);
    }

    #[test]
    fn test_move_selected_to_target() {
        let mut found = store_with(&["/a.png", "/b.png", "/c.png"], 10);
        let mut selected = GalleryStore::new(GalleryRole::Selected, 10);
        selected.set_items(vec![item("/c.png")]);

        found.apply_thumbnail(Utf8Path::new("/b.png"), loaded());
        found.toggle_selection(Utf8Path::new("/c.png"));
        found.toggle_selection(Utf8Path::new("/b.png"));

        let (source_changes, target_changes) = found.move_selected_to(&mut selected);

        assert_eq!(
            selected.item_paths(),
            vec![Utf8PathBuf::from("/c.png"), Utf8PathBuf::from("/b.png")]
        );
        assert!(selected
            .get(Utf8Path::new("/b.png"))
            .unwrap()
            .thumbnail
            .is_loaded());
        assert_eq!(found.len(), 3);
        assert_eq!(found.selection_len(), 0);
        assert_eq!(source_changes.len(), 1);
        assert!(matches!(
            target_changes[0],
            GalleryChange::ItemsReplaced { total: 2, .. }
        ));
    }

    #[test]
    fn test_remove_selected() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 2);
        store.next_page();
        store.toggle_selection(Utf8Path::new("/c.png"));

        store.remove_selected();

        assert_eq!(store.len(), 2);
        assert_eq!(store.selection_len(), 0);
        assert_eq!(store.page_info().page_index, 0);
    }

    #[test]
    fn test_filter_keeps_selection() {
        let mut store = store_with(&["/x/Apple.png", "/x/Banana.png", "/x/apricot.png"], 10);
        store.toggle_selection(Utf8Path::new("/x/Banana.png"));

        store.set_filter("AP").unwrap();

        let visible: Vec<&str> = store.visible_items().map(|i| i.path.as_str()).collect();
        assert_eq!(visible, vec!["/x/Apple.png", "/x/apricot.png"]);
        assert!(store.is_selected(Utf8Path::new("/x/Banana.png")));
        assert_eq!(store.page_info().total, 2);

        store.set_filter("").unwrap();
        assert_eq!(store.visible_len(), 3);
    }

    #[test]
    fn test_thumbnail_counts() {
        let mut store = store_with(&["/a.png", "/b.png", "/c.png"], 10);
        store.apply_thumbnail(Utf8Path::new("/a.png"), loaded());
        store.apply_thumbnail(Utf8Path::new("/b.png"), ThumbnailState::Failed);

        assert_eq!(
            store.thumbnail_counts(),
            ThumbnailCounts {
                pending: 1,
                loaded: 1,
                failed: 1
            }
        );
    }
}
