//! Viewport materialization ledger.
//!
//! Tracks which cells currently have a materialized (entity-backed)
//! representation and plans the add/remove set when the visible rectangle
//! changes. The ledger never touches the mutation overlay: materialize and
//! evict are purely presentational lifecycle events.

use std::collections::HashMap;

use bevy::prelude::{Entity, Resource};

use crate::coords::{CellId, CellRect};

/// Cells entering and leaving the viewport, both sorted by `CellId` and
/// disjoint by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportDelta {
    pub entered: Vec<CellId>,
    pub left: Vec<CellId>,
}

/// Index of materialized cell entities plus the rectangle they cover.
#[derive(Resource, Debug, Clone, Default)]
pub struct ViewportLedger {
    rect: Option<CellRect>,
    materialized: HashMap<CellId, Entity>,
    entered_total: u64,
    evicted_total: u64,
}

impl ViewportLedger {
    pub fn rect(&self) -> Option<CellRect> {
        self.rect
    }

    /// Symmetric difference between the current rectangle and `next`.
    /// Cost is proportional to the changed cells, not the full region.
    pub fn plan_retarget(&self, next: CellRect) -> ViewportDelta {
        let entered = next.cells_outside(self.rect.as_ref());
        let left = match &self.rect {
            Some(current) => current.cells_outside(Some(&next)),
            None => Vec::new(),
        };
        ViewportDelta { entered, left }
    }

    pub fn set_rect(&mut self, rect: CellRect) {
        self.rect = Some(rect);
    }

    /// Record a freshly spawned representation. A duplicate record is a
    /// materialize/evict accounting bug.
    pub fn record_materialized(&mut self, cell: CellId, entity: Entity) {
        let previous = self.materialized.insert(cell, entity);
        debug_assert!(
            previous.is_none(),
            "cell {cell} materialized twice without an eviction"
        );
        self.entered_total += 1;
    }

    /// Release a representation. Idempotent: releasing an absent cell is a
    /// no-op and returns `None`.
    pub fn release(&mut self, cell: CellId) -> Option<Entity> {
        let entity = self.materialized.remove(&cell);
        if entity.is_some() {
            self.evicted_total += 1;
        }
        entity
    }

    pub fn entity(&self, cell: CellId) -> Option<Entity> {
        self.materialized.get(&cell).copied()
    }

    pub fn is_materialized(&self, cell: CellId) -> bool {
        self.materialized.contains_key(&cell)
    }

    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    pub fn entered_total(&self) -> u64 {
        self.entered_total
    }

    pub fn evicted_total(&self) -> u64 {
        self.evicted_total
    }
}
