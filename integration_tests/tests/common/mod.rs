use std::path::PathBuf;
use std::sync::Once;

use bevy::app::App;
use core_world::{resolve, CellContent, CellId, CellRect, GameConfig, MutationOverlay};

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_game_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test game config at {}",
            config_path.display()
        );

        std::env::set_var("WAYMARK_CONFIG_PATH", &config_path);
    });
}

/// Resolve a cell's authoritative content through the app's live resources.
#[allow(dead_code)]
pub fn resolved(app: &App, cell: CellId) -> CellContent {
    let config = app.world.resource::<GameConfig>();
    let overlay = app.world.resource::<MutationOverlay>();
    resolve(config, overlay, cell)
}

/// First cell in `rect` (scanning in `CellId` order) whose baseline spawns a
/// cache. The fixture's spawn probability makes an empty scan of any
/// non-trivial rectangle effectively impossible.
#[allow(dead_code)]
pub fn find_cache_cell(app: &App, rect: CellRect) -> CellId {
    rect.cells()
        .find(|cell| resolved(app, *cell).has_cache())
        .expect("no baseline cache in scanned rectangle")
}
