use std::collections::BTreeSet;

/// Selection and viewer state for one grid view.
///
/// Indices are positional, so everything here is meaningless after a filter
/// reset and is cleared by [`super::GridSession::reset_and_load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
    viewer: Option<usize>,
}

impl Selection {
    /// Replace the selection with `index` and focus it.
    pub fn select(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
        self.anchor = Some(index);
    }

    /// Ctrl/Cmd-click: flip one index, focus moves to it either way.
    pub fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.anchor = Some(index);
    }

    /// Shift-click: select everything between the anchor and `index`.
    ///
    /// The anchor stays where it was so repeated extends pivot around it.
    pub fn extend_to(&mut self, index: usize) {
        let Some(anchor) = self.anchor else {
            self.select(index);
            return;
        };
        let (lo, hi) = if anchor <= index {
            (anchor, index)
        } else {
            (index, anchor)
        };
        self.selected.clear();
        self.selected.extend(lo..=hi);
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn open_viewer(&mut self, index: usize) {
        self.viewer = Some(index);
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    pub fn viewer(&self) -> Option<usize> {
        self.viewer
    }

    /// Drop the selection, the anchor and any open viewer.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.viewer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = Selection::default();
        selection.select(3);
        selection.toggle(5);
        selection.toggle(3);
        assert_eq!(selection.selected().collect::<Vec<_>>(), vec![5]);
        assert_eq!(selection.anchor(), Some(3));
    }

    #[test]
    fn extend_pivots_around_anchor() {
        let mut selection = Selection::default();
        selection.select(10);
        selection.extend_to(13);
        assert_eq!(selection.len(), 4);
        selection.extend_to(8);
        assert_eq!(selection.selected().collect::<Vec<_>>(), vec![8, 9, 10]);
        assert_eq!(selection.anchor(), Some(10));
    }

    #[test]
    fn extend_without_anchor_selects_single() {
        let mut selection = Selection::default();
        selection.extend_to(4);
        assert_eq!(selection.selected().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn clear_closes_viewer() {
        let mut selection = Selection::default();
        selection.select(1);
        selection.open_viewer(1);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.viewer(), None);
        assert_eq!(selection.anchor(), None);
    }
}
