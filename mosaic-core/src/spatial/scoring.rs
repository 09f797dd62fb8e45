use std::collections::BTreeMap;

use super::{Direction, SpatialEntry};
use crate::constants::spatial::CROSS_AXIS_WEIGHT;

/// Closest entry to `from_index` in `direction`.
///
/// A candidate must sit more than `tolerance` pixels past the anchor's center
/// along the travel axis; anything within the band counts as the same
/// row/column. Distance along the travel axis counts once, drift on the cross
/// axis counts double, so straight moves beat diagonal ones. Equal scores go
/// to the smaller index.
///
/// `None` when the anchor is not in `entries` or nothing qualifies.
pub fn nearest_in_direction(
    entries: &BTreeMap<usize, SpatialEntry>,
    from_index: usize,
    direction: Direction,
    tolerance: f32,
) -> Option<usize> {
    let from = entries.get(&from_index)?;
    let mut best: Option<(usize, f32)> = None;

    for (&index, entry) in entries {
        if index == from_index {
            continue;
        }
        let dx = entry.center_x - from.center_x;
        let dy = entry.center_y - from.center_y;
        let (along, across) = match direction {
            Direction::Right => (dx, dy),
            Direction::Left => (-dx, dy),
            Direction::Down => (dy, dx),
            Direction::Up => (-dy, dx),
        };
        if along <= tolerance {
            continue;
        }

        let score = along + CROSS_AXIS_WEIGHT * across.abs();
        // Ascending iteration + strict comparison keeps the smaller index on
        // ties.
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Rect;

    const TOLERANCE: f32 = 6.0;

    fn nearest(
        entries: &BTreeMap<usize, SpatialEntry>,
        from: usize,
        direction: Direction,
    ) -> Option<usize> {
        nearest_in_direction(entries, from, direction, TOLERANCE)
    }

    fn layout(cells: &[(usize, Rect)]) -> BTreeMap<usize, SpatialEntry> {
        cells
            .iter()
            .map(|&(index, rect)| (index, SpatialEntry::from_rect(rect)))
            .collect()
    }

    fn grid(
        cols: usize,
        rows: usize,
        cell: f32,
    ) -> BTreeMap<usize, SpatialEntry> {
        let mut entries = BTreeMap::new();
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = (col as f32 * cell, row as f32 * cell);
                let rect = Rect::new(x, y, cell - 8.0, cell - 8.0);
                entries.insert(row * cols + col, SpatialEntry::from_rect(rect));
            }
        }
        entries
    }

    #[test]
    fn three_by_three_moves_are_orthogonal() {
        let entries = grid(3, 3, 100.0);
        assert_eq!(nearest(&entries, 4, Direction::Right), Some(5));
        assert_eq!(nearest(&entries, 4, Direction::Down), Some(7));
        assert_eq!(nearest(&entries, 4, Direction::Left), Some(3));
        assert_eq!(nearest(&entries, 4, Direction::Up), Some(1));
    }

    #[test]
    fn edges_have_no_neighbor() {
        let entries = grid(3, 3, 100.0);
        assert_eq!(nearest(&entries, 2, Direction::Right), None);
        assert_eq!(nearest(&entries, 0, Direction::Up), None);
    }

    #[test]
    fn missing_anchor_yields_none() {
        let entries = grid(3, 3, 100.0);
        assert_eq!(nearest(&entries, 42, Direction::Down), None);
    }

    #[test]
    fn slightly_misaligned_cells_share_a_row() {
        // Baseline jitter of 4px on index 1: same row, so not "down".
        let entries = layout(&[
            (0, Rect::new(0.0, 0.0, 90.0, 90.0)),
            (1, Rect::new(100.0, 4.0, 90.0, 90.0)),
            (2, Rect::new(0.0, 100.0, 90.0, 90.0)),
        ]);

        assert_eq!(nearest(&entries, 0, Direction::Down), Some(2));
        assert_eq!(nearest(&entries, 0, Direction::Right), Some(1));
    }

    #[test]
    fn layout_order_not_index_order_drives_moves() {
        // Masonry-ish: index 1 is rendered below index 0, index 2 to its
        // right.
        let entries = layout(&[
            (0, Rect::new(0.0, 0.0, 100.0, 100.0)),
            (1, Rect::new(0.0, 110.0, 100.0, 60.0)),
            (2, Rect::new(110.0, 0.0, 100.0, 180.0)),
        ]);

        assert_eq!(nearest(&entries, 0, Direction::Down), Some(1));
        assert_eq!(nearest(&entries, 1, Direction::Up), Some(0));
    }

    #[test]
    fn ties_prefer_the_smaller_index() {
        let entries = layout(&[
            (5, Rect::new(100.0, 100.0, 10.0, 10.0)),
            (9, Rect::new(200.0, 50.0, 10.0, 10.0)),
            (7, Rect::new(200.0, 150.0, 10.0, 10.0)),
        ]);

        assert_eq!(nearest(&entries, 5, Direction::Right), Some(7));
    }
}
