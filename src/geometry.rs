//! Grid geometry: logical cell addresses and their pixel placement.
//!
//! Everything here is pure arithmetic over `f64` CSS pixels. Validation of the
//! inputs lives in [`crate::config`]; a `BoardSpec` can only be obtained through
//! it (or the crate-internal constructor used by tests), so the functions below
//! assume well-formed positive numbers.

use std::fmt;

/// Zero-based logical address of a cell: `column` advances along x, `row` along y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    pub column: u32,
    pub row: u32,
}

impl GridPosition {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// On-screen offset in CSS pixels. Also used for paddings and extents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PixelCoordinate {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rectangular arrangement parameters. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardSpec {
    row_count: u32,
    column_count: u32,
    cell_size: f64,
    gap: f64,
}

impl BoardSpec {
    // Callers outside the crate go through `PuzzleConfig::validate`.
    pub(crate) const fn new_unchecked(
        row_count: u32,
        column_count: u32,
        cell_size: f64,
        gap: f64,
    ) -> Self {
        Self {
            row_count,
            column_count,
            cell_size,
            gap,
        }
    }

    pub const fn row_count(&self) -> u32 {
        self.row_count
    }
    pub const fn column_count(&self) -> u32 {
        self.column_count
    }
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }
    pub const fn gap(&self) -> f64 {
        self.gap
    }

    /// Distance between the origins of two neighbouring cells.
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    pub fn cell_count(&self) -> usize {
        self.row_count as usize * self.column_count as usize
    }

    pub const fn contains(&self, pos: GridPosition) -> bool {
        pos.column < self.column_count && pos.row < self.row_count
    }

    /// Every in-range position, column-major (matching the `[column][row]`
    /// storage order of a board).
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + use<> {
        let rows = self.row_count;
        (0..self.column_count)
            .flat_map(move |column| (0..rows).map(move |row| GridPosition::new(column, row)))
    }
}

/// Source image shared read-only by every tile.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageResource {
    url: String,
    pixel_width: f64,
    pixel_height: f64,
}

impl ImageResource {
    pub(crate) fn new_unchecked(url: impl Into<String>, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            url: url.into(),
            pixel_width,
            pixel_height,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
    pub const fn pixel_width(&self) -> f64 {
        self.pixel_width
    }
    pub const fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    /// Value for the CSS `background-image` property.
    pub fn css_url(&self) -> String {
        format!("url({})", self.url)
    }
}

/// Total pixel size of the grid: `n * cell + (n - 1) * gap` per axis, with
/// the row count on x and the column count on y. Centering and the tile
/// background slices are computed from this extent.
pub fn board_extent(spec: &BoardSpec) -> PixelCoordinate {
    let axis = |count: u32| {
        let count = f64::from(count);
        count * spec.cell_size + (count - 1.0) * spec.gap
    };
    PixelCoordinate::new(axis(spec.row_count), axis(spec.column_count))
}

/// Pixel offset of the cell at `pos`, shifted by `padding`.
pub fn cell_offset(spec: &BoardSpec, pos: GridPosition, padding: PixelCoordinate) -> PixelCoordinate {
    PixelCoordinate::new(
        padding.x + f64::from(pos.column) * spec.pitch(),
        padding.y + f64::from(pos.row) * spec.pitch(),
    )
}

/// Half the difference between image and board size on each axis. Negative
/// when the board is larger than the image.
pub fn centering_padding(spec: &BoardSpec, image: &ImageResource) -> PixelCoordinate {
    let extent = board_extent(spec);
    PixelCoordinate::new(
        0.5 * (image.pixel_width - extent.x),
        0.5 * (image.pixel_height - extent.y),
    )
}

/// CSS `background-position` for a tile whose destination cell sits at
/// `destination`, so the right slice of the image shows through the tile.
pub fn background_offset(image: &ImageResource, destination: PixelCoordinate) -> PixelCoordinate {
    PixelCoordinate::new(
        image.pixel_width - destination.x,
        image.pixel_height - destination.y,
    )
}
