//! Foreign-key edge derivation from inline column refs and standalone refs.

use crate::ir::{DiagramEdge, edge_id};
use crate::layout::{LayoutEngine, PositionMap, SidePair};
use crate::schema::{Endpoint, Ref, Relation, Table};
use std::collections::HashSet;
use tracing::debug;

/// Derive the de-duplicated edge set for a schema snapshot.
///
/// `positions` drives side selection; without it the default grid layout is
/// used. Inline foreign keys always emit an edge. Standalone refs with a
/// missing endpoint table, or one that is not in `tables`, are dropped.
pub fn resolve_edges(
    tables: &[Table],
    refs: &[Ref],
    positions: Option<&PositionMap>,
    engine: &LayoutEngine,
) -> Vec<DiagramEdge> {
    let fallback;
    let positions = match positions {
        Some(p) => p,
        None => {
            fallback = engine.position_map(tables);
            &fallback
        }
    };

    let mut set = EdgeSet::new(tables, positions, engine);

    for table in tables {
        for column in &table.fields {
            if let Some(fk) = column.foreign_key() {
                set.insert(&table.name, &column.name, &fk.table, &fk.column, false);
            }
        }
    }

    for (idx, r) in refs.iter().enumerate() {
        let Some((from, to)) = orient(r) else {
            debug!(ref_index = idx, "skipping ref without two endpoints");
            continue;
        };
        let (Some(from_table), Some(to_table)) = (from.table(), to.table()) else {
            debug!(ref_index = idx, "skipping ref with missing endpoint table");
            continue;
        };
        set.insert(from_table, from.field(), to_table, to.field(), true);
    }

    set.edges
}

/// Split a ref into `(from, to)`: the many (`*`) side is the source.
///
/// A many second endpoint always wins, so many-to-many refs run second to
/// first. With no many side the first endpoint is the source.
pub fn orient(r: &Ref) -> Option<(&Endpoint, &Endpoint)> {
    let [first, second] = r.endpoints.as_slice() else {
        return None;
    };
    if second.relation == Relation::Many {
        Some((second, first))
    } else {
        Some((first, second))
    }
}

struct EdgeSet<'a> {
    known: HashSet<&'a str>,
    positions: &'a PositionMap,
    engine: &'a LayoutEngine,
    seen: HashSet<String>,
    edges: Vec<DiagramEdge>,
}

impl<'a> EdgeSet<'a> {
    fn new(tables: &'a [Table], positions: &'a PositionMap, engine: &'a LayoutEngine) -> Self {
        Self {
            known: tables.iter().map(|t| t.name.as_str()).collect(),
            positions,
            engine,
            seen: HashSet::new(),
            edges: Vec::new(),
        }
    }

    fn insert(
        &mut self,
        source: &str,
        source_column: &str,
        target: &str,
        target_column: &str,
        require_known: bool,
    ) {
        let id = edge_id(source, source_column, target, target_column);
        if self.seen.contains(&id) {
            return;
        }
        if require_known && !(self.known.contains(source) && self.known.contains(target)) {
            debug!(edge = %id, "skipping edge to unknown table");
            return;
        }

        let sides = match (self.positions.get(source), self.positions.get(target)) {
            (Some(&s), Some(&t)) => self.engine.choose_sides(s, t),
            _ => SidePair::default(),
        };

        self.seen.insert(id);
        self.edges
            .push(DiagramEdge::new(source, source_column, target, target_column, sides));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Position, Side};
    use crate::schema::Column;

    fn users() -> Table {
        Table::new("users")
            .column(Column::new("id", "int").primary_key())
            .column(Column::new("email", "varchar"))
    }

    fn orders() -> Table {
        Table::new("orders")
            .column(Column::new("id", "int").primary_key())
            .column(Column::new("user_id", "int").references("users", "id"))
    }

    fn order_user_ref() -> Ref {
        Ref::new(
            Endpoint::new("orders", "user_id", Relation::Many),
            Endpoint::new("users", "id", Relation::One),
        )
    }

    #[test]
    fn test_empty() {
        let engine = LayoutEngine::default();
        assert!(resolve_edges(&[], &[], None, &engine).is_empty());
    }

    #[test]
    fn test_inline_ref() {
        let engine = LayoutEngine::default();
        let edges = resolve_edges(&[users(), orders()], &[], None, &engine);

        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.id, "orders-user_id-users-id");
        assert_eq!(edge.source, "orders");
        assert_eq!(edge.target, "users");
        // orders sits right of users in the default grid
        assert_eq!(edge.source_side, Side::Left);
        assert_eq!(edge.target_side, Side::Right);
    }

    #[test]
    fn test_inline_and_standalone_deduplicated() {
        let engine = LayoutEngine::default();
        let edges = resolve_edges(&[users(), orders()], &[order_user_ref()], None, &engine);

        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_many_side_is_source_regardless_of_order() {
        let engine = LayoutEngine::default();
        let tables = vec![users(), Table::new("orders").column(Column::new("user_id", "int"))];
        let reversed = Ref::new(
            Endpoint::new("users", "id", Relation::One),
            Endpoint::new("orders", "user_id", Relation::Many),
        );

        let edges = resolve_edges(&tables, &[reversed], None, &engine);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "orders-user_id-users-id");
    }

    #[test]
    fn test_one_to_one_uses_first_endpoint() {
        let engine = LayoutEngine::default();
        let tables = vec![Table::new("a"), Table::new("b")];
        let r = Ref::new(
            Endpoint::new("b", "a_id", Relation::One),
            Endpoint::new("a", "id", Relation::One),
        );

        let edges = resolve_edges(&tables, &[r], None, &engine);
        assert_eq!(edges[0].source, "b");
        assert_eq!(edges[0].target, "a");
    }

    #[test]
    fn test_missing_endpoint_table_is_dropped() {
        let engine = LayoutEngine::default();
        let mut r = order_user_ref();
        r.endpoints[1].table_name = None;
        let tables = vec![users(), Table::new("orders")];

        let edges = resolve_edges(&tables, &[r], None, &engine);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_wrong_endpoint_count_is_dropped() {
        let engine = LayoutEngine::default();
        let single = Ref {
            endpoints: vec![Endpoint::new("users", "id", Relation::One)],
        };

        let edges = resolve_edges(&[users()], &[single, Ref::default()], None, &engine);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_both_many_uses_second_endpoint() {
        let engine = LayoutEngine::default();
        let tables = vec![Table::new("a"), Table::new("b")];
        let r = Ref::new(
            Endpoint::new("a", "b_id", Relation::Many),
            Endpoint::new("b", "a_id", Relation::Many),
        );

        let edges = resolve_edges(&tables, &[r], None, &engine);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "b-a_id-a-b_id");
        assert_eq!(edges[0].source, "b");
    }

    #[test]
    fn test_inline_ref_to_unknown_table_is_kept() {
        let engine = LayoutEngine::default();
        let orders = Table::new("orders")
            .column(Column::new("user_id", "int").references("users", "id"));

        let edges = resolve_edges(&[orders], &[], None, &engine);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "orders-user_id-users-id");
        // no position for users
        assert_eq!(edges[0].source_side, Side::Right);
        assert_eq!(edges[0].target_side, Side::Left);
    }

    #[test]
    fn test_standalone_ref_to_unknown_table_is_dropped() {
        let engine = LayoutEngine::default();
        let edges = resolve_edges(&[Table::new("orders")], &[order_user_ref()], None, &engine);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_missing_field_names_use_empty_column() {
        let engine = LayoutEngine::default();
        let r = Ref::new(
            Endpoint {
                table_name: Some("orders".to_string()),
                field_names: vec![],
                relation: Relation::Many,
            },
            Endpoint::new("users", "id", Relation::One),
        );

        let edges = resolve_edges(&[users(), Table::new("orders")], &[r], None, &engine);
        assert_eq!(edges[0].id, "orders--users-id");
    }

    #[test]
    fn test_live_positions_drive_sides() {
        let engine = LayoutEngine::default();
        let mut positions = PositionMap::new();
        positions.insert("users".to_string(), Position::new(900.0, 0.0));
        positions.insert("orders".to_string(), Position::new(0.0, 0.0));

        let edges = resolve_edges(&[users(), orders()], &[], Some(&positions), &engine);

        assert_eq!(edges[0].source_side, Side::Right);
        assert_eq!(edges[0].source_handle, "user_id-source-right");
        assert_eq!(edges[0].target_handle, "id-target-left");
    }

    #[test]
    fn test_partial_positions_default_sides() {
        let engine = LayoutEngine::default();
        let mut positions = PositionMap::new();
        positions.insert("users".to_string(), Position::new(900.0, 0.0));

        let edges = resolve_edges(&[users(), orders()], &[], Some(&positions), &engine);

        assert_eq!(edges[0].source_side, Side::Right);
        assert_eq!(edges[0].target_side, Side::Left);
    }

    #[test]
    fn test_self_reference() {
        let engine = LayoutEngine::default();
        let employees = Table::new("employees")
            .column(Column::new("id", "int").primary_key())
            .column(Column::new("manager_id", "int").references("employees", "id"));

        let edges = resolve_edges(&[employees], &[], None, &engine);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, edges[0].target);
    }
}
