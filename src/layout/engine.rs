//! Layout engine configuration.

use crate::schema::Table;
use serde::{Deserialize, Serialize};

use super::anchors::choose_sides;
use super::placement::{diagram_bounds, place_tables};
use super::types::{Position, PositionMap, Rect, SidePair};

/// Grid layout constants shared by placement, side selection and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutEngine {
    pub columns_per_row: usize,
    pub x_spacing: f64,
    pub initial_x: f64,
    pub initial_y: f64,
    pub row_gap: f64,
    pub header_height: f64,
    pub field_height: f64,
    pub table_width: f64,
    /// Vertical offset from a table's top used when centering the view on it.
    pub center_offset_y: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            columns_per_row: 4,
            x_spacing: 450.0,
            initial_x: 50.0,
            initial_y: 50.0,
            row_gap: 100.0,
            header_height: 41.0,
            field_height: 33.0,
            table_width: 300.0,
            center_offset_y: 100.0,
        }
    }
}

impl LayoutEngine {
    /// Grid positions for `tables`, starting at the engine's own origin.
    pub fn default_positions(&self, tables: &[Table]) -> Vec<Position> {
        self.calculate_positions(tables, self.initial_x, self.initial_y)
    }

    /// Grid positions for `tables` starting at `(initial_x, initial_y)`.
    ///
    /// Output has the same length and order as the input.
    pub fn calculate_positions(
        &self,
        tables: &[Table],
        initial_x: f64,
        initial_y: f64,
    ) -> Vec<Position> {
        place_tables(tables, initial_x, initial_y, self)
    }

    /// Default layout keyed by table name.
    pub fn position_map(&self, tables: &[Table]) -> PositionMap {
        tables
            .iter()
            .zip(self.default_positions(tables))
            .map(|(t, p)| (t.name.clone(), p))
            .collect()
    }

    pub fn choose_sides(&self, source: Position, target: Position) -> SidePair {
        choose_sides(source, target, self.table_width)
    }

    /// Rendered `(width, height)` of a table node.
    pub fn node_size(&self, table: &Table) -> (f64, f64) {
        (
            self.table_width,
            self.header_height + table.fields.len() as f64 * self.field_height,
        )
    }

    pub fn bounds<'a>(
        &self,
        placed: impl IntoIterator<Item = (Position, &'a Table)>,
    ) -> Option<Rect> {
        diagram_bounds(placed, self)
    }
}
