//! Board composer: builds destination and source boards and lays them out.
//!
//! A board stores its cells `[column][row]`. The destination board keeps that
//! order; the source board is shuffled, so the cell found at a visual slot of
//! the source board generally belongs somewhere else.

use std::rc::Rc;

use tracing::debug;

use crate::error::PuzzleResult;
use crate::geometry::{
    BoardSpec, GridPosition, ImageResource, PixelCoordinate, cell_offset, centering_padding,
};
use crate::shuffle::{IndexSource, Shuffle, shuffle};
use crate::slot::{SlotId, SlotRegistry, TileKey};
use crate::tile::TileController;

/// Width units of the responsive layout grid a board row is split into.
pub const LAYOUT_UNITS: u32 = 12;
const LAYOUT_BREAKPOINTS: [&str; 4] = ["xs", "sm", "md", "lg"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardMode {
    /// Empty, ordered target slots.
    Destination,
    /// Draggable tiles.
    Source,
}

/// Empty target slot.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationCell {
    pub position: GridPosition,
    pub slot: SlotId,
    pub offset: PixelCoordinate,
}

#[derive(Clone, Debug)]
pub enum Cell {
    Slot(DestinationCell),
    Tile(TileController),
}

impl Cell {
    /// Position the cell belongs to (for a tile: its home).
    pub fn home(&self) -> GridPosition {
        match self {
            Self::Slot(cell) => cell.position,
            Self::Tile(tile) => tile.home(),
        }
    }

    pub fn slot(&self) -> &SlotId {
        match self {
            Self::Slot(cell) => &cell.slot,
            Self::Tile(tile) => tile.slot(),
        }
    }

    pub fn as_tile(&self) -> Option<&TileController> {
        match self {
            Self::Tile(tile) => Some(tile),
            Self::Slot(_) => None,
        }
    }

    pub fn as_tile_mut(&mut self) -> Option<&mut TileController> {
        match self {
            Self::Tile(tile) => Some(tile),
            Self::Slot(_) => None,
        }
    }
}

impl Shuffle for Cell {}

#[derive(Clone, Debug)]
pub struct Board {
    spec: BoardSpec,
    image: Option<Rc<ImageResource>>,
    padding: PixelCoordinate,
    mode: BoardMode,
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates one cell per position. When an image is set the cells are
    /// shifted by the centering padding.
    pub fn build(
        spec: BoardSpec,
        image: Option<Rc<ImageResource>>,
        mode: BoardMode,
        snap_tolerance: u32,
    ) -> Self {
        let padding = image
            .as_deref()
            .map_or(PixelCoordinate::ORIGIN, |img| centering_padding(&spec, img));
        let cells = (0..spec.column_count())
            .map(|column| {
                (0..spec.row_count())
                    .map(|row| {
                        let position = GridPosition::new(column, row);
                        let offset = cell_offset(&spec, position, padding);
                        match mode {
                            BoardMode::Destination => Cell::Slot(DestinationCell {
                                position,
                                slot: SlotId::for_position(position),
                                offset,
                            }),
                            BoardMode::Source => Cell::Tile(TileController::new(
                                position,
                                offset,
                                spec.cell_size(),
                                image.clone(),
                                snap_tolerance,
                            )),
                        }
                    })
                    .collect()
            })
            .collect();
        debug!(?mode, columns = spec.column_count(), rows = spec.row_count(), ?padding, "board built");
        Self {
            spec,
            image,
            padding,
            mode,
            cells,
        }
    }

    pub const fn spec(&self) -> &BoardSpec {
        &self.spec
    }
    pub fn image(&self) -> Option<&ImageResource> {
        self.image.as_deref()
    }
    pub const fn padding(&self) -> PixelCoordinate {
        self.padding
    }
    pub const fn mode(&self) -> BoardMode {
        self.mode
    }
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Reorders which cell sits at which visual slot.
    pub fn shuffle(&mut self, rng: &mut dyn IndexSource) {
        shuffle(&mut self.cells, rng);
        debug!(mode = ?self.mode, "board shuffled");
    }

    /// Cell currently shown at the visual slot `(column, row)`.
    pub fn cell_at(&self, column: usize, row: usize) -> Option<&Cell> {
        self.cells.get(column).and_then(|col| col.get(row))
    }

    pub fn cell_at_mut(&mut self, column: usize, row: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column).and_then(|col| col.get_mut(row))
    }

    pub fn tile_at_mut(&mut self, key: TileKey) -> Option<&mut TileController> {
        self.cell_at_mut(key.column, key.row).and_then(Cell::as_tile_mut)
    }

    pub fn tile_at(&self, key: TileKey) -> Option<&TileController> {
        self.cell_at(key.column, key.row).and_then(Cell::as_tile)
    }

    /// Every tile with the visual slot it occupies.
    pub fn tiles(&self) -> impl Iterator<Item = (TileKey, &TileController)> {
        self.cells.iter().enumerate().flat_map(|(column, cells)| {
            cells.iter().enumerate().filter_map(move |(row, cell)| {
                cell.as_tile().map(|tile| (TileKey { column, row }, tile))
            })
        })
    }

    pub fn find_tile(&self, slot: &SlotId) -> Option<(TileKey, &TileController)> {
        self.tiles().find(|(_, tile)| tile.slot() == slot)
    }

    /// Records this board's cells in `registry`: destination slots by their
    /// position, tiles by the visual slot they currently occupy.
    pub fn register_into(&self, registry: &mut SlotRegistry) -> PuzzleResult<()> {
        for (column, cells) in self.cells.iter().enumerate() {
            for (row, cell) in cells.iter().enumerate() {
                match cell {
                    Cell::Slot(dest) => registry.register_destination(dest.slot.clone(), dest.position)?,
                    Cell::Tile(tile) => registry.register_tile(tile.slot().clone(), TileKey { column, row })?,
                }
            }
        }
        Ok(())
    }

    /// Responsive column width: the layout units split evenly over the columns.
    pub fn column_width(&self) -> u32 {
        LAYOUT_UNITS / self.spec.column_count().max(1)
    }

    /// Row-major layout of the board, free of any rendering library.
    pub fn render_plan(&self, wrapper_classes: &[&str]) -> RenderPlan {
        let width = self.column_width();
        let column_classes: Vec<String> = LAYOUT_BREAKPOINTS
            .iter()
            .map(|bp| format!("col-{bp}-{width}"))
            .collect();
        let rows = (0..self.spec.row_count() as usize)
            .map(|row| RenderRow {
                columns: (0..self.spec.column_count() as usize)
                    .map(|column| RenderColumn {
                        classes: column_classes.clone(),
                        column,
                        row,
                    })
                    .collect(),
            })
            .collect();
        RenderPlan {
            wrapper_classes: wrapper_classes.iter().map(|c| (*c).to_owned()).collect(),
            cell_size: self.spec.cell_size(),
            gap: self.spec.gap(),
            rows,
        }
    }
}

/// Layout handed to a rendering adapter: rows top to bottom, each holding one
/// column per grid column that wraps the cell at that visual slot.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    pub wrapper_classes: Vec<String>,
    pub cell_size: f64,
    pub gap: f64,
    pub rows: Vec<RenderRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderRow {
    pub columns: Vec<RenderColumn>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderColumn {
    pub classes: Vec<String>,
    /// Visual slot of the wrapped cell in the board's `[column][row]` storage.
    pub column: usize,
    pub row: usize,
}
