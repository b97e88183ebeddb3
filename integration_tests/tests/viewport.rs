mod common;

use std::collections::BTreeSet;

use core_world::{
    build_headless_app, GameConfig, InputQueue, SnapshotHistory, ViewBounds, ViewportLedger,
};

fn snapshot_cells(app: &bevy::app::App) -> BTreeSet<(i64, i64)> {
    let history = app.world.resource::<SnapshotHistory>();
    history
        .last_snapshot
        .as_ref()
        .expect("snapshot available")
        .cells
        .iter()
        .map(|cell| (cell.i, cell.j))
        .collect()
}

fn rect_cells(app: &bevy::app::App, bounds: ViewBounds) -> BTreeSet<(i64, i64)> {
    let cell_size = app.world.resource::<GameConfig>().cell_size;
    bounds
        .to_cell_rect(cell_size)
        .cells()
        .map(|cell| (cell.i, cell.j))
        .collect()
}

/// The materialized set always equals the quantized viewport rectangle:
/// no stale cells, no missing cells, across overlapping retargets.
#[test]
fn materialized_set_tracks_the_viewport_exactly() {
    common::ensure_test_config();
    let mut app = build_headless_app();

    let first = ViewBounds::from_f64(0.0, 0.0, 5.0, 4.0);
    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(first);
    app.update();
    assert_eq!(snapshot_cells(&app), rect_cells(&app, first));

    // Overlapping shift: only the border delta is created/destroyed.
    let second = ViewBounds::from_f64(2.0, 1.0, 7.0, 5.0);
    let expected_first = rect_cells(&app, first);
    let expected_second = rect_cells(&app, second);
    let entered_before = app.world.resource::<ViewportLedger>().entered_total();
    let evicted_before = app.world.resource::<ViewportLedger>().evicted_total();

    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(second);
    app.update();

    assert_eq!(snapshot_cells(&app), expected_second);

    let ledger = app.world.resource::<ViewportLedger>();
    let entered = ledger.entered_total() - entered_before;
    let evicted = ledger.evicted_total() - evicted_before;
    assert_eq!(
        entered as usize,
        expected_second.difference(&expected_first).count()
    );
    assert_eq!(
        evicted as usize,
        expected_first.difference(&expected_second).count()
    );
}

/// Retargeting to the same bounds is a no-op.
#[test]
fn identical_bounds_change_nothing() {
    common::ensure_test_config();
    let mut app = build_headless_app();

    let bounds = ViewBounds::from_f64(-3.0, -3.0, 3.0, 3.0);
    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(bounds);
    app.update();

    let entered_before = app.world.resource::<ViewportLedger>().entered_total();
    let before = snapshot_cells(&app);

    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(bounds);
    app.update();

    let ledger = app.world.resource::<ViewportLedger>();
    assert_eq!(ledger.entered_total(), entered_before);
    assert_eq!(ledger.evicted_total(), 0);
    assert_eq!(snapshot_cells(&app), before);
}

/// A disjoint retarget swaps the whole materialized set.
#[test]
fn disjoint_retarget_replaces_everything() {
    common::ensure_test_config();
    let mut app = build_headless_app();

    let near = ViewBounds::from_f64(0.0, 0.0, 4.0, 4.0);
    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(near);
    app.update();
    let near_count = app.world.resource::<ViewportLedger>().materialized_count();

    let far = ViewBounds::from_f64(50.0, 50.0, 54.0, 54.0);
    app.world
        .resource_mut::<InputQueue>()
        .report_viewport_bounds(far);
    app.update();

    let ledger = app.world.resource::<ViewportLedger>();
    assert_eq!(ledger.evicted_total() as usize, near_count);
    assert_eq!(snapshot_cells(&app), rect_cells(&app, far));
}
