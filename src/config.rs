//! Puzzle configuration as supplied by the host page.

use serde::{Deserialize, Serialize};

use crate::board::LAYOUT_UNITS;
use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::{BoardSpec, ImageResource};
use crate::tile::{DEFAULT_SNAP_RADIUS, DEFAULT_SNAP_TOLERANCE};

pub const DEFAULT_IMAGE_URL: &str = "img/20160901_223715.jpg";
pub const DEFAULT_SOURCE_CONTAINER: &str = "puzzle--source";
pub const DEFAULT_DESTINATION_CONTAINER: &str = "puzzle--destination";
pub const DEFAULT_PLAY_FIELD: &str = "puzzle-playfield";

/// Field names are camelCase so a plain JS object can be passed in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleConfig {
    pub image_url: String,
    pub image_width: f64,
    pub image_height: f64,
    pub rows: u32,
    pub columns: u32,
    pub cell_size: f64,
    pub gap: f64,
    /// Lock when `floor(distance) <= snap_tolerance`, in whole pixels.
    pub snap_tolerance: u32,
    /// Distance within which the drag layer pulls a tile onto its slot.
    pub snap_radius: f64,
    pub source_container: String,
    pub destination_container: String,
    pub play_field: String,
    /// Fixed shuffle seed; `None` draws one from the environment.
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            image_url: DEFAULT_IMAGE_URL.to_owned(),
            image_width: 640.0,
            image_height: 360.0,
            rows: 3,
            columns: 4,
            cell_size: 80.0,
            gap: 15.0,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            snap_radius: DEFAULT_SNAP_RADIUS,
            source_container: DEFAULT_SOURCE_CONTAINER.to_owned(),
            destination_container: DEFAULT_DESTINATION_CONTAINER.to_owned(),
            play_field: DEFAULT_PLAY_FIELD.to_owned(),
            seed: None,
        }
    }
}

fn positive(name: &str, value: f64) -> PuzzleResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PuzzleError::invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> PuzzleResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PuzzleError::invalid(format!("{name} must be zero or more, got {value}")))
    }
}

fn non_empty(name: &str, value: &str) -> PuzzleResult<()> {
    if value.trim().is_empty() {
        Err(PuzzleError::invalid(format!("{name} must not be empty")))
    } else {
        Ok(())
    }
}

impl PuzzleConfig {
    /// Checks every field and produces the immutable board and image records.
    pub fn validate(&self) -> PuzzleResult<(BoardSpec, ImageResource)> {
        if self.rows == 0 || self.columns == 0 {
            return Err(PuzzleError::invalid(format!(
                "grid must have at least one row and column, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns > LAYOUT_UNITS {
            return Err(PuzzleError::invalid(format!(
                "at most {LAYOUT_UNITS} columns fit the layout grid, got {}",
                self.columns
            )));
        }
        positive("cellSize", self.cell_size)?;
        non_negative("gap", self.gap)?;
        non_negative("snapRadius", self.snap_radius)?;
        non_empty("imageUrl", &self.image_url)?;
        positive("imageWidth", self.image_width)?;
        positive("imageHeight", self.image_height)?;
        non_empty("sourceContainer", &self.source_container)?;
        non_empty("destinationContainer", &self.destination_container)?;
        non_empty("playField", &self.play_field)?;

        Ok((
            BoardSpec::new_unchecked(self.rows, self.columns, self.cell_size, self.gap),
            ImageResource::new_unchecked(self.image_url.clone(), self.image_width, self.image_height),
        ))
    }
}
