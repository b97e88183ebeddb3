//! Frame pipeline.
//!
//! One `app.update()` drains the queued external events and processes them
//! to completion in arrival order: a move queued before a pickup is applied
//! before that pickup is authorized. All engine state mutation happens on
//! this single path.

use bevy::prelude::*;

use crate::{
    components::MaterializedCell,
    config::GameConfig,
    coords::ViewBounds,
    input::{EngineEvent, EventInbox, InputQueue},
    interaction::{apply_interaction, CarryBag, CraftRecord, CraftTelemetry, InteractionLog},
    overlay::MutationOverlay,
    resolver::resolve,
    resources::{EngineTick, PlayerState},
    viewport::ViewportLedger,
};

pub fn announce_world(config: Res<GameConfig>) {
    tracing::info!(
        target: "waymark::worldgen",
        seed = config.seed,
        cell_size = %config.cell_size,
        spawn_probability = config.spawn_probability,
        proximity_radius = config.proximity_radius,
        win_threshold = config.win_threshold,
        "world.ready"
    );
}

/// Clear per-frame reporting state before new events are processed.
pub fn begin_frame(mut log: ResMut<InteractionLog>, mut crafts: ResMut<CraftTelemetry>) {
    log.reset_frame();
    crafts.reset_frame();
}

/// Pull events queued by other threads into the frame queue. The bridge is
/// optional: embedders that drive [`InputQueue`] directly never install it.
pub fn ingest_bridge(inbox: Option<Res<EventInbox>>, mut queue: ResMut<InputQueue>) {
    if let Some(inbox) = inbox {
        let drained = inbox.drain_into(&mut queue);
        if drained > 0 {
            tracing::trace!(
                target: "waymark::input",
                drained,
                "input.bridge_drained"
            );
        }
    }
}

/// Drain the frame queue and dispatch each event in arrival order.
pub fn pump_events(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut queue: ResMut<InputQueue>,
    mut player: ResMut<PlayerState>,
    mut ledger: ResMut<ViewportLedger>,
    mut overlay: ResMut<MutationOverlay>,
    mut carry: ResMut<CarryBag>,
    mut log: ResMut<InteractionLog>,
    mut crafts: ResMut<CraftTelemetry>,
) {
    let events: Vec<EngineEvent> = queue.drain().collect();
    for event in events {
        match event {
            EngineEvent::PlayerMoved(position) => {
                player.relocate(position, config.cell_size);
                tracing::trace!(
                    target: "waymark::input",
                    cell = %player.cell,
                    "player.moved"
                );
            }
            EngineEvent::ViewportChanged(bounds) => {
                retarget_viewport(&mut commands, &config, &overlay, &mut ledger, bounds);
            }
            EngineEvent::Interaction(request) => {
                let result =
                    apply_interaction(&config, player.cell, &mut overlay, &mut carry, request);
                match &result {
                    Ok(receipt) => {
                        if let Some(value) = receipt.crafted {
                            crafts.crafted_this_frame.push(CraftRecord {
                                cell: receipt.cell,
                                value,
                            });
                        }
                        tracing::info!(
                            target: "waymark::interaction",
                            kind = ?receipt.kind,
                            cell = %receipt.cell,
                            token = receipt.token,
                            crafted = ?receipt.crafted,
                            "interaction.accepted"
                        );
                    }
                    Err(err) => {
                        tracing::debug!(
                            target: "waymark::interaction",
                            kind = ?request.kind,
                            cell = %request.cell,
                            error = %err,
                            "interaction.rejected"
                        );
                    }
                }
                log.record(request, result);
            }
        }
    }
}

fn retarget_viewport(
    commands: &mut Commands,
    config: &GameConfig,
    overlay: &MutationOverlay,
    ledger: &mut ViewportLedger,
    bounds: ViewBounds,
) {
    let next = bounds.to_cell_rect(config.cell_size);
    let delta = ledger.plan_retarget(next);

    for cell in &delta.left {
        if let Some(entity) = ledger.release(*cell) {
            commands.entity(entity).despawn();
        }
    }

    let mut caches_entered = 0u32;
    for cell in &delta.entered {
        if resolve(config, overlay, *cell).has_cache() {
            caches_entered += 1;
        }
        let entity = commands.spawn(MaterializedCell { cell: *cell }).id();
        ledger.record_materialized(*cell, entity);
    }
    ledger.set_rect(next);

    tracing::debug!(
        target: "waymark::viewport",
        entered = delta.entered.len(),
        left = delta.left.len(),
        caches_entered,
        materialized = ledger.materialized_count(),
        "viewport.retargeted"
    );
}

pub fn advance_tick(mut tick: ResMut<EngineTick>) {
    tick.0 = tick.0.wrapping_add(1);
}
