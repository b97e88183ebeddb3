//! Core engine for the Waymark sparse-grid prototype.
//!
//! An effectively infinite, deterministically-generated grid of token
//! caches: baseline content is a pure function of the seed and cell
//! coordinates, player mutations live in a sparse overlay that survives
//! visibility churn, and only the cells inside the reported viewport are
//! ever materialized. [`build_headless_app`] wires the resources and the
//! frame pipeline; each [`run_frame`] drains queued external events
//! (player moves, viewport bounds, pickup/place requests), processes them
//! to completion in arrival order, and captures an authoritative snapshot
//! for the presentation layer.

mod components;
pub mod config;
mod coords;
mod hashing;
pub mod input;
pub mod interaction;
pub mod metrics;
mod overlay;
mod resolver;
mod resources;
mod scalar;
mod snapshot;
mod systems;
mod victory;
mod viewport;
mod worldgen;

use bevy::prelude::*;

pub use components::MaterializedCell;
pub use config::{load_game_config_from_env, CarryCapacity, ConfigError, GameConfig, ValueTier};
pub use coords::{CellId, CellRect, ViewBounds, WorldPos};
pub use input::{event_bridge, EngineEvent, EventInbox, EventSender, InputQueue};
pub use interaction::{
    apply_interaction, interactable, CarryBag, CraftRecord, CraftTelemetry, InteractionError,
    InteractionKind, InteractionLog, InteractionReceipt, InteractionRequest,
};
pub use overlay::{MutationOverlay, OverlayEntry};
pub use resolver::{resolve, CellContent};
pub use resources::{EngineTick, PlayerState};
pub use scalar::{scalar_from_f64, scalar_one, scalar_zero, Scalar};
pub use snapshot::SnapshotHistory;
pub use victory::{WinRecord, WinState};
pub use viewport::{ViewportDelta, ViewportLedger};
pub use worldgen::baseline;

/// Construct a Bevy [`App`] configured with the Waymark frame pipeline.
pub fn build_headless_app() -> App {
    let mut app = App::new();

    let config = config::load_game_config_from_env();
    let carry = CarryBag::with_capacity(config.carry_capacity);

    app.insert_resource(config)
        .insert_resource(EngineTick::default())
        .insert_resource(PlayerState::default())
        .insert_resource(InputQueue::default())
        .insert_resource(MutationOverlay::default())
        .insert_resource(ViewportLedger::default())
        .insert_resource(carry)
        .insert_resource(InteractionLog::default())
        .insert_resource(CraftTelemetry::default())
        .insert_resource(WinState::default())
        .insert_resource(SnapshotHistory::default())
        .add_plugins(MinimalPlugins)
        .add_systems(Startup, systems::announce_world)
        .add_systems(
            Update,
            (
                systems::begin_frame,
                systems::ingest_bridge,
                systems::pump_events,
                victory::check_victory,
                systems::advance_tick,
                snapshot::capture_snapshot,
            )
                .chain(),
        );

    app
}

/// Execute a single engine frame.
///
/// Each call processes the chained systems configured in
/// [`build_headless_app`] (frame reset → bridge ingest → event pump →
/// victory check → tick increment → snapshot). Callers are responsible for
/// reading outcomes from [`InteractionLog`] and [`SnapshotHistory`].
pub fn run_frame(app: &mut App) {
    app.update();
}
