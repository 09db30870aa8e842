//! Snap Puzzle core crate.
//!
//! An image is cut into a grid of tiles. The tiles are shuffled onto a source
//! board next to an empty destination board, and each tile locks once it is
//! dragged onto the slot it came from. Geometry, shuffling, slot pairing and the
//! lock state machine are plain Rust and run natively; the browser adapter
//! (`dom`) is only built for `wasm32`.

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod session;
pub mod shuffle;
pub mod slot;
pub mod tile;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use board::{Board, BoardMode, Cell, DestinationCell, RenderColumn, RenderPlan, RenderRow};
pub use config::PuzzleConfig;
pub use error::{PuzzleError, PuzzleResult};
pub use geometry::{
    BoardSpec, GridPosition, ImageResource, PixelCoordinate, background_offset, board_extent,
    cell_offset, centering_padding,
};
pub use session::PuzzleSession;
pub use shuffle::{IndexSource, Shuffle, shuffle};
pub use slot::{SlotId, SlotPair, SlotRegistry, TileKey};
pub use tile::{DragOptions, DragProvider, DropOutcome, SnapMode, TileController, TileState};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Optional small allocator for size (feature gated)
#[cfg(all(target_arch = "wasm32", feature = "wee_alloc"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
