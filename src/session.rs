//! The puzzle session: both boards, the slot registry and the drag entry
//! points, built once from an injected configuration.

use std::rc::Rc;

use tracing::{debug, info};

use crate::board::{Board, BoardMode};
use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::{GridPosition, ImageResource, PixelCoordinate};
use crate::shuffle::IndexSource;
use crate::slot::{SlotId, SlotPair, SlotRegistry};
use crate::tile::{DropOutcome, TileController, TileState};

pub struct PuzzleSession {
    config: PuzzleConfig,
    image: Rc<ImageResource>,
    destination: Board,
    source: Board,
    registry: SlotRegistry,
}

impl PuzzleSession {
    /// Validates `config`, builds the ordered destination board and the
    /// shuffled source board, and pairs every tile with its slot.
    pub fn new(config: PuzzleConfig, rng: &mut dyn IndexSource) -> PuzzleResult<Self> {
        let (spec, image) = config.validate()?;
        let image = Rc::new(image);

        let destination = Board::build(spec, Some(image.clone()), BoardMode::Destination, config.snap_tolerance);
        let mut source = Board::build(spec, Some(image.clone()), BoardMode::Source, config.snap_tolerance);
        source.shuffle(rng);

        let mut registry = SlotRegistry::new();
        destination.register_into(&mut registry)?;
        source.register_into(&mut registry)?;
        registry.ensure_complete()?;
        debug!(slots = registry.len(), "slot registry filled");

        Ok(Self {
            config,
            image,
            destination,
            source,
            registry,
        })
    }

    /// Session seeded from `config.seed`, or from the environment when unset.
    pub fn from_config(config: PuzzleConfig) -> PuzzleResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self::new(config, &mut rng)
    }

    pub const fn config(&self) -> &PuzzleConfig {
        &self.config
    }
    pub fn image(&self) -> &ImageResource {
        &self.image
    }
    pub const fn destination(&self) -> &Board {
        &self.destination
    }
    pub const fn source(&self) -> &Board {
        &self.source
    }
    pub const fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn pair(&self, slot: &SlotId) -> PuzzleResult<SlotPair> {
        self.registry.pair(slot)
    }

    pub fn tile(&self, slot: &SlotId) -> PuzzleResult<&TileController> {
        let pair = self.registry.pair(slot)?;
        self.source
            .tile_at(pair.tile)
            .ok_or_else(|| PuzzleError::invalid(format!("no tile at registered slot {slot}")))
    }

    fn tile_mut(&mut self, slot: &SlotId) -> PuzzleResult<&mut TileController> {
        let pair = self.registry.pair(slot)?;
        self.source
            .tile_at_mut(pair.tile)
            .ok_or_else(|| PuzzleError::invalid(format!("no tile at registered slot {slot}")))
    }

    pub fn tile_state(&self, slot: &SlotId) -> PuzzleResult<TileState> {
        self.tile(slot).map(TileController::state)
    }

    /// Returns whether the tile may be dragged.
    pub fn begin_drag(&mut self, slot: &SlotId) -> PuzzleResult<bool> {
        Ok(self.tile_mut(slot)?.begin_drag())
    }

    /// One drag-move event: `tile_position` is where the tile is on screen,
    /// `target_position` where its destination cell is.
    pub fn drag(
        &mut self,
        slot: &SlotId,
        tile_position: PixelCoordinate,
        target_position: PixelCoordinate,
    ) -> PuzzleResult<TileState> {
        let tile = self.tile_mut(slot)?;
        let was_locked = tile.is_locked();
        let state = tile.drag(tile_position, target_position);
        if !was_locked && state == TileState::Locked {
            info!(%slot, locked = self.locked_count(), total = self.tile_count(), "tile locked");
            if self.is_solved() {
                info!("puzzle solved");
            }
        }
        Ok(state)
    }

    pub fn end_drag(&mut self, slot: &SlotId) -> PuzzleResult<DropOutcome> {
        Ok(self.tile_mut(slot)?.end_drag())
    }

    /// Destination position a slot resolves to.
    pub fn destination_of(&self, slot: &SlotId) -> PuzzleResult<GridPosition> {
        self.registry.destination_of(slot)
    }

    pub fn tile_count(&self) -> usize {
        self.source.tiles().count()
    }

    pub fn locked_count(&self) -> usize {
        self.source.tiles().filter(|(_, tile)| tile.is_locked()).count()
    }

    pub fn is_solved(&self) -> bool {
        self.source.tiles().all(|(_, tile)| tile.is_locked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::tests::Scripted;

    fn session() -> PuzzleSession {
        let config = PuzzleConfig {
            rows: 2,
            columns: 2,
            ..PuzzleConfig::default()
        };
        PuzzleSession::new(config, &mut Scripted::new(&[0, 1, 0, 0, 0, 1, 0])).unwrap()
    }

    #[test]
    fn test_new_session_pairs_every_slot() {
        let s = session();
        assert_eq!(s.tile_count(), 4);
        assert_eq!(s.registry().len(), 4);
        for (key, tile) in s.source().tiles() {
            let pair = s.pair(tile.slot()).unwrap();
            assert_eq!(pair.tile, key);
            assert_eq!(pair.destination, tile.home());
        }
        assert_eq!(s.locked_count(), 0);
        assert!(!s.is_solved());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PuzzleConfig {
            rows: 0,
            ..PuzzleConfig::default()
        };
        assert!(matches!(
            PuzzleSession::new(config, &mut Scripted::new(&[])),
            Err(PuzzleError::InvalidBoardSpec { .. })
        ));
    }

    #[test]
    fn test_unknown_slot_errors() {
        let mut s = session();
        let stray = SlotId::for_position(GridPosition::new(9, 9));
        assert!(s.begin_drag(&stray).is_err());
        assert!(s.drag(&stray, PixelCoordinate::ORIGIN, PixelCoordinate::ORIGIN).is_err());
        assert!(s.end_drag(&stray).is_err());
        assert!(s.tile_state(&stray).is_err());
    }

    #[test]
    fn test_solving_every_tile() {
        let mut s = session();
        let slots: Vec<SlotId> = s.source().tiles().map(|(_, t)| t.slot().clone()).collect();
        let target = PixelCoordinate::new(300.0, 200.0);
        for (i, slot) in slots.iter().enumerate() {
            assert!(s.begin_drag(slot).unwrap());
            assert_eq!(
                s.drag(slot, PixelCoordinate::ORIGIN, target).unwrap(),
                TileState::Dragging
            );
            assert_eq!(s.drag(slot, target, target).unwrap(), TileState::Locked);
            assert_eq!(s.end_drag(slot).unwrap(), DropOutcome::Stay);
            assert_eq!(s.locked_count(), i + 1);
        }
        assert!(s.is_solved());
        // locked tiles refuse new drags
        assert!(!s.begin_drag(&slots[0]).unwrap());
    }

    #[test]
    fn test_seeded_sessions_share_layout() {
        let config = PuzzleConfig {
            seed: Some(11),
            ..PuzzleConfig::default()
        };
        let a = PuzzleSession::from_config(config.clone()).unwrap();
        let b = PuzzleSession::from_config(config).unwrap();
        let homes = |s: &PuzzleSession| s.source().tiles().map(|(_, t)| t.home()).collect::<Vec<_>>();
        assert_eq!(homes(&a), homes(&b));
    }
}
