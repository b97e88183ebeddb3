use bevy::prelude::{Res, ResMut, Resource};

use crate::{
    config::GameConfig,
    coords::CellId,
    interaction::CraftTelemetry,
    resources::EngineTick,
};

/// One-shot win flag. Once set it never resets, even if later merges stay
/// below the threshold.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct WinState {
    pub won: bool,
    pub achieved: Option<WinRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRecord {
    pub value: u64,
    pub cell: CellId,
    pub tick: u64,
}

/// Flip the win flag on the first crafted value reaching the configured
/// threshold. Runs after interaction resolution each frame.
pub fn check_victory(
    config: Res<GameConfig>,
    crafts: Res<CraftTelemetry>,
    tick: Res<EngineTick>,
    mut state: ResMut<WinState>,
) {
    if state.won {
        return;
    }
    for craft in &crafts.crafted_this_frame {
        if craft.value >= config.win_threshold {
            state.won = true;
            state.achieved = Some(WinRecord {
                value: craft.value,
                cell: craft.cell,
                tick: tick.0,
            });
            tracing::info!(
                target: "waymark::victory",
                value = craft.value,
                threshold = config.win_threshold,
                cell = %craft.cell,
                tick = tick.0,
                "victory.threshold_reached"
            );
            return;
        }
    }
}
