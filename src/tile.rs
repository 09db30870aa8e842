//! One draggable tile: its image slice and its drag / lock lifecycle.

use std::rc::Rc;

use crate::geometry::{GridPosition, ImageResource, PixelCoordinate, background_offset};
use crate::slot::SlotId;

/// Default lock threshold in whole pixels: `floor(distance) == 0`.
pub const DEFAULT_SNAP_TOLERANCE: u32 = 0;
/// Distance (px) within which the drag layer pulls a tile onto its target.
pub const DEFAULT_SNAP_RADIUS: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    AtRest,
    Dragging,
    Locked,
}

/// What the drag provider should do with the tile on drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Move back to where the drag started.
    Revert,
    /// Leave the tile where it is (locked on its slot).
    Stay,
}

/// Which edges of the snap target the drag layer aligns to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapMode {
    #[default]
    Inner,
    Outer,
    Both,
}

/// Options handed to the drag provider when a tile is made draggable.
#[derive(Clone, Debug, PartialEq)]
pub struct DragOptions {
    pub revert_on_failed_drop: bool,
    pub snap_to: String,
    pub snap_mode: SnapMode,
    pub snap_radius: f64,
}

/// Axis-aligned box in page pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
    pub const fn origin(&self) -> PixelCoordinate {
        PixelCoordinate::new(self.left, self.top)
    }
}

/// Translation that pulls `dragged` onto the edges of `target` it is within
/// `radius` of. Each axis snaps on its own; nothing happens unless `dragged`
/// touches `target` grown by `radius`.
pub fn snap_adjustment(mode: SnapMode, dragged: Bounds, target: Bounds, radius: f64) -> PixelCoordinate {
    let near = dragged.right() >= target.left - radius
        && dragged.left <= target.right() + radius
        && dragged.bottom() >= target.top - radius
        && dragged.top <= target.bottom() + radius;
    if !near {
        return PixelCoordinate::ORIGIN;
    }
    let axis = |start: f64, size: f64, t_start: f64, t_end: f64| -> f64 {
        let end = start + size;
        let mut candidates: Vec<f64> = Vec::with_capacity(4);
        if matches!(mode, SnapMode::Inner | SnapMode::Both) {
            candidates.push(t_start - start);
            candidates.push(t_end - end);
        }
        if matches!(mode, SnapMode::Outer | SnapMode::Both) {
            candidates.push(t_end - start);
            candidates.push(t_start - end);
        }
        candidates
            .into_iter()
            .filter(|delta| delta.abs() <= radius)
            .min_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0)
    };
    PixelCoordinate::new(
        axis(dragged.left, dragged.width, target.left, target.right()),
        axis(dragged.top, dragged.height, target.top, target.bottom()),
    )
}

/// Hooks a drag provider calls over one tile's lifetime.
pub struct DragCallbacks {
    /// Pointer went down on the tile; `false` refuses the drag.
    pub on_start: Box<dyn FnMut() -> bool>,
    /// Pointer moved: the tile's and its target's page positions. Returns
    /// `true` once the tile has locked; the provider then stops moving it and
    /// never reverts it.
    pub on_drag: Box<dyn FnMut(PixelCoordinate, PixelCoordinate) -> bool>,
    /// Pointer released.
    pub on_stop: Box<dyn FnMut() -> DropOutcome>,
}

/// Capability to turn a rendered element into a draggable one.
pub trait DragProvider {
    type Element;
    type Error;

    fn make_draggable(
        &self,
        element: &Self::Element,
        options: DragOptions,
        callbacks: DragCallbacks,
    ) -> Result<(), Self::Error>;
}

/// Drag lifecycle of one tile. `Locked` is terminal.
#[derive(Clone, Debug)]
pub struct TileController {
    home: GridPosition,
    slot: SlotId,
    destination: PixelCoordinate,
    size: f64,
    image: Option<Rc<ImageResource>>,
    snap_tolerance: u32,
    state: TileState,
    drag_offset: PixelCoordinate,
    revert_on_failed_drop: bool,
    drag_enabled: bool,
}

impl TileController {
    pub fn new(
        home: GridPosition,
        destination: PixelCoordinate,
        size: f64,
        image: Option<Rc<ImageResource>>,
        snap_tolerance: u32,
    ) -> Self {
        Self {
            home,
            slot: SlotId::for_position(home),
            destination,
            size,
            image,
            snap_tolerance,
            state: TileState::AtRest,
            drag_offset: PixelCoordinate::ORIGIN,
            revert_on_failed_drop: true,
            drag_enabled: true,
        }
    }

    pub const fn home(&self) -> GridPosition {
        self.home
    }
    pub const fn slot(&self) -> &SlotId {
        &self.slot
    }
    pub const fn size(&self) -> f64 {
        self.size
    }
    pub const fn state(&self) -> TileState {
        self.state
    }
    pub fn is_locked(&self) -> bool {
        self.state == TileState::Locked
    }
    pub const fn drag_offset(&self) -> PixelCoordinate {
        self.drag_offset
    }
    pub const fn revert_on_failed_drop(&self) -> bool {
        self.revert_on_failed_drop
    }
    pub const fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }
    pub fn image(&self) -> Option<&ImageResource> {
        self.image.as_deref()
    }

    /// Background position aligning this tile's slice with its destination.
    pub fn background_position(&self) -> Option<PixelCoordinate> {
        self.image
            .as_deref()
            .map(|image| background_offset(image, self.destination))
    }

    /// Options the drag provider is configured with for this tile.
    pub fn drag_options(&self, snap_radius: f64) -> DragOptions {
        DragOptions {
            revert_on_failed_drop: self.revert_on_failed_drop,
            snap_to: self.slot.selector(),
            snap_mode: SnapMode::Inner,
            snap_radius,
        }
    }

    /// Returns whether a drag was started.
    pub fn begin_drag(&mut self) -> bool {
        if !self.drag_enabled {
            return false;
        }
        self.state = TileState::Dragging;
        true
    }

    /// Handles one drag-move: compares the tile's on-screen position with the
    /// matching destination cell's and locks when they coincide. The distance
    /// is counted in whole pixels, so a tolerance of `n` accepts anything
    /// below `n + 1`.
    pub fn drag(&mut self, tile_position: PixelCoordinate, target_position: PixelCoordinate) -> TileState {
        if self.state == TileState::Locked {
            return self.state;
        }
        self.state = TileState::Dragging;
        self.drag_offset = tile_position;
        let distance = tile_position.distance_to(target_position);
        if distance.floor() <= f64::from(self.snap_tolerance) {
            self.lock();
        }
        self.state
    }

    pub fn end_drag(&mut self) -> DropOutcome {
        match self.state {
            TileState::Locked => DropOutcome::Stay,
            TileState::AtRest | TileState::Dragging => {
                self.state = TileState::AtRest;
                self.drag_offset = PixelCoordinate::ORIGIN;
                if self.revert_on_failed_drop {
                    DropOutcome::Revert
                } else {
                    DropOutcome::Stay
                }
            }
        }
    }

    fn lock(&mut self) {
        self.state = TileState::Locked;
        self.revert_on_failed_drop = false;
        self.drag_enabled = false;
    }
}
