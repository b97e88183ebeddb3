use bevy::prelude::*;

use crate::coords::CellId;

/// Transient record for a cell currently inside the viewport.
///
/// Holds only the cell identity: content is re-resolved on every read, so a
/// cell that leaves and re-enters the viewport always reflects the overlay
/// rather than any cached visual state. Despawning the entity never touches
/// baseline or overlay.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializedCell {
    pub cell: CellId,
}
