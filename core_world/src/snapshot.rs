//! Per-frame authoritative snapshot for the presentation layer.
//!
//! Cells are emitted sorted by identity and content is re-resolved at
//! capture time, so a snapshot never reflects stale visual state. The
//! `interactable` flag is derived here, on demand, from the player's current
//! cell and carry state.

use bevy::prelude::{Query, Res, ResMut, Resource};
use world_proto::{CarryView, CellView, SnapshotHeader, VictoryView, WorldSnapshot};

use crate::{
    components::MaterializedCell,
    config::GameConfig,
    interaction::{interactable, CarryBag},
    overlay::MutationOverlay,
    resolver::resolve,
    resources::{EngineTick, PlayerState},
    victory::WinState,
};

#[derive(Resource, Debug, Default)]
pub struct SnapshotHistory {
    pub last_snapshot: Option<WorldSnapshot>,
    pub encoded_snapshot: Option<Vec<u8>>,
}

pub fn capture_snapshot(
    config: Res<GameConfig>,
    tick: Res<EngineTick>,
    player: Res<PlayerState>,
    overlay: Res<MutationOverlay>,
    carry: Res<CarryBag>,
    win: Res<WinState>,
    cells: Query<&MaterializedCell>,
    mut history: ResMut<SnapshotHistory>,
) {
    let mut cell_views: Vec<CellView> = cells
        .iter()
        .map(|record| {
            let content = resolve(&config, &overlay, record.cell);
            CellView {
                i: record.cell.i,
                j: record.cell.j,
                has_cache: content.has_cache(),
                value: content.value(),
                interactable: interactable(&config, player.cell, record.cell, content, &carry),
            }
        })
        .collect();
    cell_views.sort_unstable_by_key(|view| (view.i, view.j));

    let header = SnapshotHeader::new(tick.0, cell_views.len());
    let snapshot = WorldSnapshot {
        header,
        cells: cell_views,
        carry: CarryView {
            tokens: carry.tokens().to_vec(),
            capacity_slots: carry.capacity().slot_limit(),
        },
        victory: VictoryView {
            won: win.won,
            achieved_value: win.achieved.map(|record| record.value),
            achieved_tick: win.achieved.map(|record| record.tick),
        },
    }
    .finalize();

    history.encoded_snapshot = world_proto::encode_snapshot(&snapshot).ok();
    history.last_snapshot = Some(snapshot);
}
