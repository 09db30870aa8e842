//! Slot identifiers and the registry pairing destination cells with tiles.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::GridPosition;

const SLOT_PREFIX: &str = "box--";

/// Tag shared by a destination cell and the tile that belongs there.
/// Doubles as the CSS class used by the drag layer to find the snap target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(String);

impl SlotId {
    pub fn for_position(pos: GridPosition) -> Self {
        Self(format!("{SLOT_PREFIX}{}_{}", pos.column, pos.row))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// CSS class selector matching every element tagged with this slot.
    pub fn selector(&self) -> String {
        format!(".{}", self.0)
    }

    /// Recovers the position the id was derived from.
    pub fn position(&self) -> PuzzleResult<GridPosition> {
        parse_position(&self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GridPosition> for SlotId {
    fn from(pos: GridPosition) -> Self {
        Self::for_position(pos)
    }
}

impl FromStr for SlotId {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_position(s).map(Self::for_position)
    }
}

fn parse_position(s: &str) -> PuzzleResult<GridPosition> {
    let bad = || PuzzleError::invalid(format!("malformed slot id '{s}'"));
    let rest = s.strip_prefix(SLOT_PREFIX).ok_or_else(bad)?;
    let (column, row) = rest.split_once('_').ok_or_else(bad)?;
    let column = column.parse::<u32>().map_err(|_| bad())?;
    let row = row.parse::<u32>().map_err(|_| bad())?;
    Ok(GridPosition::new(column, row))
}

/// Where a tile currently sits in the source board's `[column][row]` layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub column: usize,
    pub row: usize,
}

/// Both members of a matched pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotPair {
    pub destination: GridPosition,
    pub tile: TileKey,
}

#[derive(Clone, Copy, Debug, Default)]
struct Entry {
    destination: Option<GridPosition>,
    tile: Option<TileKey>,
}

/// Explicit `SlotId -> {destination, tile}` map filled by the board composer.
#[derive(Clone, Debug, Default)]
pub struct SlotRegistry {
    entries: HashMap<SlotId, Entry>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_destination(&mut self, slot: SlotId, pos: GridPosition) -> PuzzleResult<()> {
        let entry = self.entries.entry(slot.clone()).or_default();
        if entry.destination.is_some() {
            return Err(PuzzleError::invalid(format!("slot {slot} has two destinations")));
        }
        entry.destination = Some(pos);
        Ok(())
    }

    pub fn register_tile(&mut self, slot: SlotId, key: TileKey) -> PuzzleResult<()> {
        let entry = self.entries.entry(slot.clone()).or_default();
        if entry.tile.is_some() {
            return Err(PuzzleError::invalid(format!("slot {slot} has two tiles")));
        }
        entry.tile = Some(key);
        Ok(())
    }

    /// Resolves a slot to exactly one destination and exactly one tile.
    pub fn pair(&self, slot: &SlotId) -> PuzzleResult<SlotPair> {
        match self.entries.get(slot) {
            Some(Entry {
                destination: Some(destination),
                tile: Some(tile),
            }) => Ok(SlotPair {
                destination: *destination,
                tile: *tile,
            }),
            Some(_) => Err(PuzzleError::invalid(format!("slot {slot} is only half registered"))),
            None => Err(PuzzleError::invalid(format!("unknown slot {slot}"))),
        }
    }

    pub fn destination_of(&self, slot: &SlotId) -> PuzzleResult<GridPosition> {
        self.pair(slot).map(|p| p.destination)
    }

    /// Fails unless every registered slot has both members.
    pub fn ensure_complete(&self) -> PuzzleResult<()> {
        self.entries.keys().try_for_each(|slot| self.pair(slot).map(|_| ()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
