use bevy::prelude::{Res, ResMut, Resource};

use crate::{
    interaction::{CarryBag, CraftTelemetry, InteractionLog},
    overlay::MutationOverlay,
    viewport::ViewportLedger,
};

/// Rolling engine counters for diagnostics and the headless driver.
#[derive(Resource, Default, Debug, Clone)]
pub struct EngineMetrics {
    pub frame: u64,
    pub materialized_cells: usize,
    pub overlay_entries: usize,
    pub carried_tokens: usize,
    pub entered_total: u64,
    pub evicted_total: u64,
    pub accepted_total: u64,
    pub rejected_total: u64,
    pub max_crafted_value: u64,
}

pub fn collect_metrics(
    mut metrics: ResMut<EngineMetrics>,
    ledger: Res<ViewportLedger>,
    overlay: Res<MutationOverlay>,
    carry: Res<CarryBag>,
    log: Res<InteractionLog>,
    crafts: Res<CraftTelemetry>,
) {
    metrics.frame += 1;
    metrics.materialized_cells = ledger.materialized_count();
    metrics.overlay_entries = overlay.len();
    metrics.carried_tokens = carry.tokens().len();
    metrics.entered_total = ledger.entered_total();
    metrics.evicted_total = ledger.evicted_total();
    metrics.accepted_total = log.accepted_total;
    metrics.rejected_total = log.rejected_total;
    for craft in &crafts.crafted_this_frame {
        if craft.value > metrics.max_crafted_value {
            metrics.max_crafted_value = craft.value;
        }
    }
}
