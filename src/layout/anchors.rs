//! Connector side selection and handle anchor points.

use crate::schema::Table;

use super::engine::LayoutEngine;
use super::types::{Position, Side, SidePair};

/// Pick the facing sides of two tables by comparing horizontal centers.
///
/// Equal centers resolve to source-left / target-right.
pub fn choose_sides(source: Position, target: Position, table_width: f64) -> SidePair {
    let source_center = source.x + table_width / 2.0;
    let target_center = target.x + table_width / 2.0;

    if source_center < target_center {
        SidePair {
            source: Side::Right,
            target: Side::Left,
        }
    } else {
        SidePair {
            source: Side::Left,
            target: Side::Right,
        }
    }
}

/// Canvas point of a column handle on `side`.
///
/// Unknown columns anchor to the middle of the header.
pub fn handle_point(
    position: Position,
    table: &Table,
    column: &str,
    side: Side,
    engine: &LayoutEngine,
) -> (f64, f64) {
    let x = match side {
        Side::Left => position.x,
        Side::Right => position.x + engine.table_width,
    };
    let y = match table.column_index(column) {
        Some(row) => {
            position.y + engine.header_height + (row as f64 + 0.5) * engine.field_height
        }
        None => position.y + engine.header_height / 2.0,
    };
    (x, y)
}
