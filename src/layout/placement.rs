//! Grid placement of tables.

use crate::schema::Table;

use super::engine::LayoutEngine;
use super::types::{Position, Rect};

/// Place tables left-to-right in rows of `columns_per_row`.
///
/// Every table in a row shares the row's top Y. The next row starts below the
/// tallest table of the current row plus `row_gap`.
pub fn place_tables(
    tables: &[Table],
    initial_x: f64,
    initial_y: f64,
    engine: &LayoutEngine,
) -> Vec<Position> {
    let per_row = engine.columns_per_row.max(1);
    let mut positions = Vec::with_capacity(tables.len());
    let mut y = initial_y;

    for row in tables.chunks(per_row) {
        let max_fields = row.iter().map(|t| t.fields.len()).max().unwrap_or(0);
        let row_height = engine.header_height + max_fields as f64 * engine.field_height;

        for j in 0..row.len() {
            positions.push(Position::new(initial_x + j as f64 * engine.x_spacing, y));
        }

        y += row_height + engine.row_gap;
    }

    positions
}

/// Bounding box of placed tables, `None` when nothing is placed.
pub fn diagram_bounds<'a>(
    placed: impl IntoIterator<Item = (Position, &'a Table)>,
    engine: &LayoutEngine,
) -> Option<Rect> {
    placed
        .into_iter()
        .map(|(pos, table)| {
            let (width, height) = engine.node_size(table);
            Rect {
                x: pos.x,
                y: pos.y,
                width,
                height,
            }
        })
        .reduce(|acc, r| acc.union(&r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use proptest::prelude::*;

    fn table_with_fields(name: &str, count: usize) -> Table {
        (0..count).fold(Table::new(name), |t, i| {
            t.column(Column::new(format!("c{}", i), "int"))
        })
    }

    #[test]
    fn test_empty() {
        let engine = LayoutEngine::default();
        assert!(engine.calculate_positions(&[], 50.0, 50.0).is_empty());
    }

    #[test]
    fn test_single_table() {
        let engine = LayoutEngine::default();
        let positions = engine.calculate_positions(&[table_with_fields("a", 3)], 10.0, 20.0);
        assert_eq!(positions, vec![Position::new(10.0, 20.0)]);
    }

    #[test]
    fn test_row_height_uses_tallest_table() {
        let engine = LayoutEngine::default();
        let tables: Vec<Table> = [2, 5, 1, 3, 0]
            .iter()
            .enumerate()
            .map(|(i, &n)| table_with_fields(&format!("t{}", i), n))
            .collect();

        let positions = engine.calculate_positions(&tables, 50.0, 50.0);

        assert_eq!(positions.len(), 5);
        for (j, pos) in positions[..4].iter().enumerate() {
            assert_eq!(pos.x, 50.0 + j as f64 * 450.0);
            assert_eq!(pos.y, 50.0);
        }
        // 41 + 5 * 33 + 100
        assert_eq!(positions[4], Position::new(50.0, 50.0 + 206.0 + 100.0));
    }

    #[test]
    fn test_zero_columns_per_row_is_one() {
        let engine = LayoutEngine {
            columns_per_row: 0,
            ..LayoutEngine::default()
        };
        let tables = vec![table_with_fields("a", 0), table_with_fields("b", 0)];
        let positions = engine.calculate_positions(&tables, 0.0, 0.0);

        assert_eq!(positions[0], Position::new(0.0, 0.0));
        assert_eq!(positions[1], Position::new(0.0, 141.0));
    }

    #[test]
    fn test_bounds() {
        let engine = LayoutEngine::default();
        let a = table_with_fields("a", 1);
        let b = table_with_fields("b", 2);
        let rect = engine
            .bounds([(Position::new(0.0, 0.0), &a), (Position::new(450.0, 10.0), &b)])
            .unwrap();

        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 750.0);
        assert_eq!(rect.height, 10.0 + 41.0 + 66.0);
        assert!(engine.bounds(std::iter::empty()).is_none());
    }

    proptest! {
        #[test]
        fn prop_positions_deterministic(
            counts in prop::collection::vec(0usize..12, 0..20),
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
        ) {
            let tables: Vec<Table> = counts
                .iter()
                .enumerate()
                .map(|(i, &n)| table_with_fields(&format!("t{}", i), n))
                .collect();
            let engine = LayoutEngine::default();

            let first = engine.calculate_positions(&tables, x, y);
            let second = engine.calculate_positions(&tables, x, y);

            prop_assert_eq!(first.len(), tables.len());
            prop_assert_eq!(first, second);
        }
    }
}
