//! Grid layout of schema tables and connector side selection.

mod anchors;
mod engine;
mod placement;
mod types;

pub use anchors::{choose_sides, handle_point};
pub use engine::LayoutEngine;
pub use placement::{diagram_bounds, place_tables};
pub use types::{Position, PositionMap, Rect, Side, SidePair};

use crate::schema::Table;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid layout config: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutEngine {
    /// Parse a layout config; missing keys keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Grid positions with the default layout constants.
pub fn calculate_positions(tables: &[Table], initial_x: f64, initial_y: f64) -> Vec<Position> {
    LayoutEngine::default().calculate_positions(tables, initial_x, initial_y)
}
