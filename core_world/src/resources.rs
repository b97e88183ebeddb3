use bevy::prelude::Resource;

use crate::{
    coords::{CellId, WorldPos},
    scalar::Scalar,
};

/// Tracks total engine frames elapsed.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTick(pub u64);

/// Continuous player position plus its quantized cell.
///
/// The cell is re-derived on every move; interaction authorization always
/// reads the cell current at request time, never the cell a target was
/// materialized under.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub position: WorldPos,
    pub cell: CellId,
}

impl PlayerState {
    pub fn relocate(&mut self, position: WorldPos, cell_size: Scalar) {
        self.position = position;
        self.cell = position.cell(cell_size);
    }
}
