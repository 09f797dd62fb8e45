//! Arrow-key navigation and selection through a [`GridSession`].

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use mosaic_core::{
    CellGeometry, Direction, GridSession, InMemoryAssetStore, MosaicConfig,
    Rect,
};
use mosaic_model::AssetFilter;
use support::make_assets;

/// `rows` x `cols` uniform grid, row-major indices, 100px pitch.
fn grid(rows: usize, cols: usize) -> Vec<CellGeometry> {
    (0..rows * cols)
        .map(|index| CellGeometry {
            index,
            rect: Rect::new(
                (index % cols) as f32 * 100.0,
                (index / cols) as f32 * 100.0,
                90.0,
                90.0,
            ),
        })
        .collect()
}

async fn loaded_session(n: usize) -> GridSession {
    let store = Arc::new(InMemoryAssetStore::new(make_assets(n)));
    let mut session = GridSession::new(store, MosaicConfig::default()).unwrap();
    session.reset_and_load(AssetFilter::all()).await;
    session
}

#[tokio::test]
async fn arrows_walk_the_grid() {
    let mut session = loaded_session(9).await;
    let cells = grid(3, 3);
    session.selection_mut().select(4);

    assert_eq!(session.navigate(Direction::Right, &cells), Some(5));
    assert_eq!(session.navigate(Direction::Down, &cells), Some(8));
    assert_eq!(session.navigate(Direction::Left, &cells), Some(7));
    assert_eq!(session.navigate(Direction::Up, &cells), Some(4));
    assert_eq!(session.navigate(Direction::Up, &cells), Some(1));

    assert_eq!(session.selection().anchor(), Some(1));
    assert_eq!(session.selection().selected().collect::<Vec<_>>(), vec![1]);
}

#[tokio::test]
async fn edge_of_grid_leaves_selection_alone() {
    let mut session = loaded_session(9).await;
    let cells = grid(3, 3);
    session.selection_mut().select(8);

    assert_eq!(session.navigate(Direction::Right, &cells), None);
    assert_eq!(session.navigate(Direction::Down, &cells), None);
    assert_eq!(session.selection().anchor(), Some(8));
    assert!(session.selection().is_selected(8));
}

#[tokio::test]
async fn nothing_focused_means_no_move() {
    let mut session = loaded_session(9).await;
    assert_eq!(session.navigate(Direction::Down, &grid(3, 3)), None);
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn open_viewer_follows_navigation() {
    let mut session = loaded_session(9).await;
    let cells = grid(3, 3);
    session.selection_mut().select(0);
    session.selection_mut().open_viewer(0);

    session.navigate(Direction::Right, &cells);
    assert_eq!(session.selection().viewer(), Some(1));

    session.selection_mut().close_viewer();
    session.navigate(Direction::Down, &cells);
    assert_eq!(session.selection().viewer(), None);
    assert_eq!(session.selection().anchor(), Some(4));
}

#[tokio::test]
async fn justified_rows_resolve_by_geometry() {
    let mut session = loaded_session(5).await;
    // Row 0: a wide panorama and a portrait. Row 1: three squares.
    let cells = vec![
        CellGeometry {
            index: 0,
            rect: Rect::new(0.0, 0.0, 300.0, 100.0),
        },
        CellGeometry {
            index: 1,
            rect: Rect::new(310.0, 0.0, 80.0, 100.0),
        },
        CellGeometry {
            index: 2,
            rect: Rect::new(0.0, 110.0, 120.0, 100.0),
        },
        CellGeometry {
            index: 3,
            rect: Rect::new(130.0, 110.0, 120.0, 100.0),
        },
        CellGeometry {
            index: 4,
            rect: Rect::new(260.0, 110.0, 120.0, 100.0),
        },
    ];

    session.selection_mut().select(1);
    assert_eq!(session.navigate(Direction::Down, &cells), Some(4));
    assert_eq!(session.navigate(Direction::Left, &cells), Some(3));
    assert_eq!(session.navigate(Direction::Up, &cells), Some(0));
}

#[tokio::test]
async fn filter_change_clears_selection_and_viewer() {
    let mut session = loaded_session(9).await;
    let cells = grid(3, 3);
    session.selection_mut().select(2);
    session.selection_mut().extend_to(5);
    session.selection_mut().open_viewer(5);
    assert_eq!(session.selected_assets().len(), 4);

    session
        .reset_and_load(AssetFilter::all().with_volume("main"))
        .await;

    assert!(session.selection().is_empty());
    assert_eq!(session.selection().viewer(), None);
    assert!(session.selected_assets().is_empty());
    assert_eq!(session.navigate(Direction::Right, &cells), None);
}

#[tokio::test]
async fn layout_refresh_is_debounced() {
    let mut session = loaded_session(9).await;
    let cells = grid(3, 3);
    let t0 = Instant::now();

    assert!(session.refresh_layout(&cells, t0));
    assert!(!session.refresh_layout(&cells, t0));

    session.notify_layout_changed(t0);
    assert!(!session.refresh_layout(&cells, t0 + Duration::from_millis(40)));
    assert!(session.refresh_layout(&cells, t0 + Duration::from_millis(150)));
    assert!(!session.refresh_layout(&cells, t0 + Duration::from_millis(400)));
}
