//! Carry and crafting engine.
//!
//! Pickup and place requests are validated against the player's cell at
//! request time. Every precondition is checked before any effect is applied,
//! so a rejection never leaves partial state behind. A place onto an
//! equal-valued resident cache merges into a doubled token; placing onto an
//! empty cell is never valid: pickup creates emptiness, placement never
//! creates a cache from nothing.

use bevy::prelude::Resource;
use thiserror::Error;

use crate::{
    config::{CarryCapacity, GameConfig},
    coords::CellId,
    overlay::MutationOverlay,
    resolver::{resolve, CellContent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Pickup,
    Place,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionRequest {
    pub kind: InteractionKind,
    pub cell: CellId,
}

/// Successful interaction effect, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionReceipt {
    pub kind: InteractionKind,
    pub cell: CellId,
    /// The token picked up, or the carried token consumed by a merge.
    pub token: u64,
    /// Merged cache value, present for accepted place requests.
    pub crafted: Option<u64>,
}

/// Rejected-operation outcomes. These are report values, not faults: state
/// is untouched whenever one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("target cell is {distance} cells away (limit {limit})")]
    TooFar { distance: u64, limit: u32 },
    #[error("already carrying a full load")]
    AlreadyCarrying,
    #[error("nothing is being carried")]
    NothingCarried,
    #[error("carried token {carried} does not match resident cache {resident}")]
    ValueMismatch { carried: u64, resident: u64 },
    #[error("no cache at the target cell")]
    NoCacheHere,
}

/// Tokens currently carried by the player.
#[derive(Resource, Debug, Clone)]
pub struct CarryBag {
    tokens: Vec<u64>,
    capacity: CarryCapacity,
}

impl Default for CarryBag {
    fn default() -> Self {
        Self::with_capacity(CarryCapacity::Single)
    }
}

impl CarryBag {
    pub fn with_capacity(capacity: CarryCapacity) -> Self {
        Self {
            tokens: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> CarryCapacity {
        self.capacity
    }

    pub fn tokens(&self) -> &[u64] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_room(&self) -> bool {
        match self.capacity.slot_limit() {
            Some(limit) => (self.tokens.len() as u64) < limit as u64,
            None => true,
        }
    }

    pub fn contains(&self, value: u64) -> bool {
        self.tokens.contains(&value)
    }

    fn store(&mut self, value: u64) {
        debug_assert!(self.has_room(), "store called on a full carry bag");
        self.tokens.push(value);
    }

    /// Remove and return one carried token equal to `value`.
    fn withdraw(&mut self, value: u64) -> Option<u64> {
        let index = self.tokens.iter().position(|token| *token == value)?;
        Some(self.tokens.swap_remove(index))
    }
}

/// Ordered per-frame record of interaction outcomes for the presentation
/// layer, plus running totals.
#[derive(Resource, Debug, Clone, Default)]
pub struct InteractionLog {
    pub receipts: Vec<(InteractionRequest, Result<InteractionReceipt, InteractionError>)>,
    pub accepted_total: u64,
    pub rejected_total: u64,
}

impl InteractionLog {
    pub fn reset_frame(&mut self) {
        self.receipts.clear();
    }

    pub fn record(
        &mut self,
        request: InteractionRequest,
        result: Result<InteractionReceipt, InteractionError>,
    ) {
        match &result {
            Ok(_) => self.accepted_total += 1,
            Err(_) => self.rejected_total += 1,
        }
        self.receipts.push((request, result));
    }
}

/// Values crafted by merges this frame, consumed by the victory check.
#[derive(Resource, Debug, Clone, Default)]
pub struct CraftTelemetry {
    pub crafted_this_frame: Vec<CraftRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftRecord {
    pub cell: CellId,
    pub value: u64,
}

impl CraftTelemetry {
    pub fn reset_frame(&mut self) {
        self.crafted_this_frame.clear();
    }
}

/// Validate and apply one request. All preconditions are checked before any
/// state is mutated.
pub fn apply_interaction(
    config: &GameConfig,
    player_cell: CellId,
    overlay: &mut MutationOverlay,
    carry: &mut CarryBag,
    request: InteractionRequest,
) -> Result<InteractionReceipt, InteractionError> {
    let distance = player_cell.chebyshev_distance(request.cell);
    let limit = config.proximity_radius;
    if distance > limit as u64 {
        return Err(InteractionError::TooFar { distance, limit });
    }

    match request.kind {
        InteractionKind::Pickup => {
            if !carry.has_room() {
                return Err(InteractionError::AlreadyCarrying);
            }
            let value = match resolve(config, overlay, request.cell) {
                CellContent::Cache(value) => value,
                CellContent::NoCache => return Err(InteractionError::NoCacheHere),
            };
            overlay.set_empty(request.cell);
            carry.store(value);
            Ok(InteractionReceipt {
                kind: InteractionKind::Pickup,
                cell: request.cell,
                token: value,
                crafted: None,
            })
        }
        InteractionKind::Place => {
            if carry.is_empty() {
                return Err(InteractionError::NothingCarried);
            }
            let resident = match resolve(config, overlay, request.cell) {
                CellContent::Cache(value) => value,
                CellContent::NoCache => return Err(InteractionError::NoCacheHere),
            };
            let token = match carry.withdraw(resident) {
                Some(token) => token,
                None => {
                    let carried = carry.tokens().first().copied().unwrap_or_default();
                    return Err(InteractionError::ValueMismatch { carried, resident });
                }
            };
            let crafted = resident.saturating_mul(2);
            overlay.set_token(request.cell, crafted);
            Ok(InteractionReceipt {
                kind: InteractionKind::Place,
                cell: request.cell,
                token,
                crafted: Some(crafted),
            })
        }
    }
}

/// Derived view: may the player act on this cell right now? Folds proximity
/// and carry authorization together so the presentation layer can gate its
/// controls without re-deriving distance.
pub fn interactable(
    config: &GameConfig,
    player_cell: CellId,
    cell: CellId,
    content: CellContent,
    carry: &CarryBag,
) -> bool {
    if player_cell.chebyshev_distance(cell) > config.proximity_radius as u64 {
        return false;
    }
    match content {
        CellContent::NoCache => false,
        CellContent::Cache(value) => carry.has_room() || carry.contains(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barren_config() -> GameConfig {
        GameConfig {
            spawn_probability: 0.0,
            ..GameConfig::default()
        }
    }

    fn pickup(cell: CellId) -> InteractionRequest {
        InteractionRequest {
            kind: InteractionKind::Pickup,
            cell,
        }
    }

    fn place(cell: CellId) -> InteractionRequest {
        InteractionRequest {
            kind: InteractionKind::Place,
            cell,
        }
    }

    #[test]
    fn proximity_boundary_is_inclusive() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        let player = CellId::new(0, 0);
        let radius = config.proximity_radius as i64;

        let at_limit = CellId::new(radius, -radius);
        overlay.set_token(at_limit, 2);
        let receipt =
            apply_interaction(&config, player, &mut overlay, &mut carry, pickup(at_limit))
                .expect("distance exactly at the radius is allowed");
        assert_eq!(receipt.token, 2);

        let beyond = CellId::new(radius + 1, 0);
        overlay.set_token(beyond, 2);
        let mut empty_carry = CarryBag::default();
        let err = apply_interaction(&config, player, &mut overlay, &mut empty_carry, pickup(beyond))
            .expect_err("one past the radius is rejected");
        assert_eq!(
            err,
            InteractionError::TooFar {
                distance: (radius + 1) as u64,
                limit: config.proximity_radius
            }
        );
    }

    #[test]
    fn single_slot_rejects_second_pickup() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        let player = CellId::new(0, 0);

        overlay.set_token(CellId::new(1, 0), 1);
        overlay.set_token(CellId::new(0, 1), 3);

        apply_interaction(&config, player, &mut overlay, &mut carry, pickup(CellId::new(1, 0)))
            .expect("first pickup");
        let err = apply_interaction(
            &config,
            player,
            &mut overlay,
            &mut carry,
            pickup(CellId::new(0, 1)),
        )
        .expect_err("second pickup with a full slot");
        assert_eq!(err, InteractionError::AlreadyCarrying);

        // The rejected target keeps its cache; the carried token is intact.
        assert_eq!(
            resolve(&config, &overlay, CellId::new(0, 1)),
            CellContent::Cache(3)
        );
        assert_eq!(carry.tokens(), &[1]);
    }

    #[test]
    fn pickup_records_explicit_emptiness() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        let cell = CellId::new(2, 2);
        overlay.set_token(cell, 4);

        apply_interaction(&config, CellId::new(0, 0), &mut overlay, &mut carry, pickup(cell))
            .expect("pickup");

        assert_eq!(resolve(&config, &overlay, cell), CellContent::NoCache);
        let err =
            apply_interaction(&config, CellId::new(0, 0), &mut overlay, &mut carry, place(cell))
                .expect_err("place onto an emptied cell");
        assert_eq!(err, InteractionError::NoCacheHere);
    }

    #[test]
    fn merge_doubles_and_empties_the_carry() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        let player = CellId::new(0, 0);

        overlay.set_token(CellId::new(1, 0), 2);
        overlay.set_token(CellId::new(0, 1), 2);

        apply_interaction(&config, player, &mut overlay, &mut carry, pickup(CellId::new(1, 0)))
            .expect("pickup");
        let receipt = apply_interaction(
            &config,
            player,
            &mut overlay,
            &mut carry,
            place(CellId::new(0, 1)),
        )
        .expect("merge");

        assert_eq!(receipt.crafted, Some(4));
        assert!(carry.is_empty());
        assert_eq!(
            resolve(&config, &overlay, CellId::new(0, 1)),
            CellContent::Cache(4)
        );
    }

    #[test]
    fn mismatched_place_changes_nothing() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        let player = CellId::new(0, 0);

        overlay.set_token(CellId::new(1, 0), 2);
        overlay.set_token(CellId::new(0, 1), 3);

        apply_interaction(&config, player, &mut overlay, &mut carry, pickup(CellId::new(1, 0)))
            .expect("pickup");
        let err = apply_interaction(
            &config,
            player,
            &mut overlay,
            &mut carry,
            place(CellId::new(0, 1)),
        )
        .expect_err("mismatched merge");
        assert_eq!(
            err,
            InteractionError::ValueMismatch {
                carried: 2,
                resident: 3
            }
        );
        assert_eq!(carry.tokens(), &[2]);
        assert_eq!(
            resolve(&config, &overlay, CellId::new(0, 1)),
            CellContent::Cache(3)
        );
    }

    #[test]
    fn place_with_empty_carry_is_rejected() {
        let config = barren_config();
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::default();
        overlay.set_token(CellId::new(1, 1), 1);

        let err = apply_interaction(
            &config,
            CellId::new(0, 0),
            &mut overlay,
            &mut carry,
            place(CellId::new(1, 1)),
        )
        .expect_err("nothing carried");
        assert_eq!(err, InteractionError::NothingCarried);
    }

    #[test]
    fn unbounded_capacity_allows_grouped_carrying() {
        let config = GameConfig {
            carry_capacity: CarryCapacity::Unbounded,
            ..barren_config()
        };
        let mut overlay = MutationOverlay::default();
        let mut carry = CarryBag::with_capacity(CarryCapacity::Unbounded);
        let player = CellId::new(0, 0);

        overlay.set_token(CellId::new(1, 0), 1);
        overlay.set_token(CellId::new(0, 1), 5);
        apply_interaction(&config, player, &mut overlay, &mut carry, pickup(CellId::new(1, 0)))
            .expect("first pickup");
        apply_interaction(&config, player, &mut overlay, &mut carry, pickup(CellId::new(0, 1)))
            .expect("second pickup");
        assert_eq!(carry.tokens().len(), 2);

        // A merge consumes the matching token, not the first one.
        overlay.set_token(CellId::new(2, 0), 5);
        let receipt = apply_interaction(
            &config,
            player,
            &mut overlay,
            &mut carry,
            place(CellId::new(2, 0)),
        )
        .expect("merge");
        assert_eq!(receipt.token, 5);
        assert_eq!(carry.tokens(), &[1]);
    }

    #[test]
    fn interactable_folds_distance_and_carry_state() {
        let config = barren_config();
        let player = CellId::new(0, 0);
        let near = CellId::new(1, 1);
        let far = CellId::new(10, 0);
        let empty_carry = CarryBag::default();

        assert!(interactable(
            &config,
            player,
            near,
            CellContent::Cache(2),
            &empty_carry
        ));
        assert!(!interactable(
            &config,
            player,
            near,
            CellContent::NoCache,
            &empty_carry
        ));
        assert!(!interactable(
            &config,
            player,
            far,
            CellContent::Cache(2),
            &empty_carry
        ));

        // Full single-slot bag: only an equal-valued resident is actionable.
        let mut overlay = MutationOverlay::default();
        let mut full_carry = CarryBag::default();
        overlay.set_token(near, 2);
        apply_interaction(
            &config,
            player,
            &mut overlay,
            &mut full_carry,
            pickup(near),
        )
        .expect("pickup");
        assert!(interactable(
            &config,
            player,
            near,
            CellContent::Cache(2),
            &full_carry
        ));
        assert!(!interactable(
            &config,
            player,
            near,
            CellContent::Cache(3),
            &full_carry
        ));
    }
}
