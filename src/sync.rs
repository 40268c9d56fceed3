//! Live graph synchronization.
//!
//! `SchemaCanvas` owns the live position map and the current nodes and edges.
//! Every schema snapshot, click and drag end is applied inside one `&mut self`
//! call, so callers never observe nodes and edges from different snapshots.

use crate::ir::{Diagram, DiagramEdge, DiagramNode};
use crate::layout::{LayoutEngine, Position, PositionMap, Rect};
use crate::resolve::resolve_edges;
use crate::schema::{Ref, Schema, Table, TableSummary};
use crate::selection::Selection;
use crate::viewport::{FIT_VIEW_PADDING, Viewport, ViewportControl};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Imperative handle exposed to parent views.
pub trait CanvasHandle {
    fn fit_view(&mut self);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn get_zoom(&self) -> f64;
    /// Unknown ids are ignored.
    fn center_on_node(&mut self, id: &str);
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasOptions {
    /// Grid origin for seeded tables; falls back to the engine's origin.
    pub initial_x: Option<f64>,
    pub initial_y: Option<f64>,
    pub nodes_draggable: bool,
    pub show_minimap: bool,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            initial_x: None,
            initial_y: None,
            nodes_draggable: true,
            show_minimap: false,
        }
    }
}

/// Build nodes for `tables`, keeping live positions of tables already shown.
///
/// Tables absent from `live` get their grid position. A repeated table name
/// only yields its first node.
pub fn sync_nodes(
    live: &PositionMap,
    tables: &[Table],
    selected_table: Option<&str>,
    engine: &LayoutEngine,
    initial_x: f64,
    initial_y: f64,
) -> Vec<DiagramNode> {
    let grid = engine.calculate_positions(tables, initial_x, initial_y);
    let mut emitted: HashSet<&str> = HashSet::new();

    tables
        .iter()
        .zip(grid)
        .filter(|&(table, _)| emitted.insert(table.name.as_str()))
        .map(|(table, seeded)| {
            let position = match live.get(&table.name) {
                Some(&p) => p,
                None => {
                    debug!(
                        table = %table.name,
                        x = seeded.x,
                        y = seeded.y,
                        "seeding table position"
                    );
                    seeded
                }
            };
            let selected = selected_table == Some(table.name.as_str());
            DiagramNode::new(table.clone(), position, selected)
        })
        .collect()
}

/// Recompute every edge and style it against `selected_edge`.
pub fn sync_edges(
    tables: &[Table],
    refs: &[Ref],
    selected_edge: Option<&str>,
    live_positions: &PositionMap,
    engine: &LayoutEngine,
) -> Vec<DiagramEdge> {
    let mut edges = resolve_edges(tables, refs, Some(live_positions), engine);
    for edge in &mut edges {
        edge.apply_selection(selected_edge);
    }
    edges
}

pub struct SchemaCanvas<V = Viewport> {
    engine: LayoutEngine,
    options: CanvasOptions,
    tables: Vec<Table>,
    refs: Vec<Ref>,
    positions: PositionMap,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    selection: Selection,
    viewport: V,
}

impl SchemaCanvas<Viewport> {
    pub fn new(engine: LayoutEngine, options: CanvasOptions) -> Self {
        Self::with_viewport(engine, options, Viewport::default())
    }
}

impl<V: ViewportControl> SchemaCanvas<V> {
    pub fn with_viewport(engine: LayoutEngine, options: CanvasOptions, viewport: V) -> Self {
        Self {
            engine,
            options,
            tables: Vec::new(),
            refs: Vec::new(),
            positions: PositionMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            selection: Selection::default(),
            viewport,
        }
    }

    /// Apply a new `(tables, refs)` snapshot.
    pub fn set_schema(&mut self, tables: Vec<Table>, refs: Vec<Ref>) {
        trace!(tables = tables.len(), refs = refs.len(), "applying schema snapshot");
        self.tables = tables;
        self.refs = refs;
        self.refresh_nodes();
        self.refresh_edges();
    }

    pub fn apply(&mut self, schema: Schema) {
        self.set_schema(schema.tables, schema.refs);
    }

    /// Node selection owned by the parent view.
    pub fn set_selected_table(&mut self, name: Option<String>) {
        self.selection.set_node(name);
        self.refresh_nodes();
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn summaries(&self) -> Vec<TableSummary> {
        self.tables.iter().map(Table::summary).collect()
    }

    pub fn diagram(&self) -> Diagram {
        Diagram {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.engine
            .bounds(self.nodes.iter().map(|n| (n.position, n.table())))
    }

    /// Select a table; returns its name for the parent's selection callback.
    pub fn on_node_click(&mut self, id: &str) -> Option<&str> {
        self.node(id)?;
        self.selection.click_node(id);
        self.refresh_nodes();
        self.refresh_edges();
        self.node(id).map(|n| n.id.as_str())
    }

    /// Toggle edge selection; returns whether the edge is now selected.
    pub fn on_edge_click(&mut self, id: &str) -> bool {
        if !self.edges.iter().any(|e| e.id == id) {
            debug!(edge = id, "ignoring click on unknown edge");
            return false;
        }
        let selected = self.selection.click_edge(id);
        self.refresh_edges();
        selected
    }

    pub fn on_pane_click(&mut self) {
        self.selection.click_pane();
        self.refresh_edges();
    }

    /// Record a drag result; returns false when the drag was not applied.
    pub fn on_node_drag_end(&mut self, id: &str, position: Position) -> bool {
        if !self.options.nodes_draggable {
            return false;
        }
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            debug!(node = id, "ignoring drag of unknown node");
            return false;
        };
        node.position = position;
        self.positions.insert(id.to_string(), position);
        self.refresh_edges();
        true
    }

    /// Sidebar selection: select the table and bring it into view.
    pub fn select_table(&mut self, name: &str) {
        if self.on_node_click(name).is_some() {
            self.center_on_node(name);
        }
    }

    fn origin(&self) -> (f64, f64) {
        (
            self.options.initial_x.unwrap_or(self.engine.initial_x),
            self.options.initial_y.unwrap_or(self.engine.initial_y),
        )
    }

    fn refresh_nodes(&mut self) {
        let (x, y) = self.origin();
        self.nodes = sync_nodes(
            &self.positions,
            &self.tables,
            self.selection.node(),
            &self.engine,
            x,
            y,
        );
        // Removed tables fall out here and are re-seeded if they come back.
        self.positions = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect();
    }

    fn refresh_edges(&mut self) {
        self.edges = sync_edges(
            &self.tables,
            &self.refs,
            self.selection.edge(),
            &self.positions,
            &self.engine,
        );
    }
}

impl<V: ViewportControl> CanvasHandle for SchemaCanvas<V> {
    fn fit_view(&mut self) {
        let bounds = self.bounds();
        self.viewport.fit_bounds(bounds, FIT_VIEW_PADDING);
    }

    fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    fn get_zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    fn center_on_node(&mut self, id: &str) {
        let Some(node) = self.node(id) else {
            debug!(node = id, "center on unknown node");
            return;
        };
        let x = node.position.x + self.engine.table_width / 2.0;
        let y = node.position.y + self.engine.center_offset_y;
        self.viewport.set_center(x, y, 1.0);
    }
}
