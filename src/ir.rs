//! Library-agnostic diagram records handed to the rendering engine.

use crate::layout::{Position, Side, SidePair};
use crate::schema::{Column, Table};
use serde::Serialize;

/// Bezier connector, the engine's `"default"` edge type.
pub const EDGE_TYPE: &str = "default";

pub const PRIMARY_COLOR: &str = "var(--primary)";
pub const SECONDARY_COLOR: &str = "var(--secondary)";
pub const CONNECTION_COLOR: &str = "var(--connection)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Incoming connections, on primary-key columns.
    Target,
    /// Outgoing connections, on every other column.
    Source,
}

impl HandleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HandleKind::Target => "target",
            HandleKind::Source => "source",
        }
    }
}

/// `"{column}-{source|target}-{left|right}"`
pub fn handle_id(column: &str, kind: HandleKind, side: Side) -> String {
    format!("{}-{}-{}", column, kind.as_str(), side.as_str())
}

/// Handles a column row exposes, both sides of one kind.
pub fn column_handles(column: &Column) -> [String; 2] {
    let kind = if column.pk {
        HandleKind::Target
    } else {
        HandleKind::Source
    };
    [
        handle_id(&column.name, kind, Side::Left),
        handle_id(&column.name, kind, Side::Right),
    ]
}

/// `"{sourceTable}-{sourceColumn}-{targetTable}-{targetColumn}"`
pub fn edge_id(source: &str, source_column: &str, target: &str, target_column: &str) -> String {
    format!("{}-{}-{}-{}", source, source_column, target, target_column)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub table: Table,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

impl DiagramNode {
    pub fn new(table: Table, position: Position, is_selected: bool) -> Self {
        Self {
            id: table.name.clone(),
            position,
            data: NodeData { table, is_selected },
        }
    }

    pub fn table(&self) -> &Table {
        &self.data.table
    }

    pub fn is_selected(&self) -> bool {
        self.data.is_selected
    }

    pub fn minimap_color(&self) -> &'static str {
        if self.data.is_selected {
            PRIMARY_COLOR
        } else {
            SECONDARY_COLOR
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
}

impl EdgeStyle {
    pub fn connection() -> Self {
        Self {
            stroke: CONNECTION_COLOR.to_string(),
            stroke_width: 2.0,
            stroke_dasharray: Some("4 2".to_string()),
        }
    }

    pub fn highlighted() -> Self {
        Self {
            stroke: PRIMARY_COLOR.to_string(),
            stroke_width: 4.0,
            stroke_dasharray: None,
        }
    }
}

/// Foreign-key edge from the many side to the one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_column: String,
    pub target_column: String,
    pub source_handle: String,
    pub target_handle: String,
    pub source_side: Side,
    pub target_side: Side,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub style: EdgeStyle,
    pub selected: bool,
    pub animated: bool,
}

impl DiagramEdge {
    pub fn new(
        source: &str,
        source_column: &str,
        target: &str,
        target_column: &str,
        sides: SidePair,
    ) -> Self {
        Self {
            id: edge_id(source, source_column, target, target_column),
            source: source.to_string(),
            target: target.to_string(),
            source_column: source_column.to_string(),
            target_column: target_column.to_string(),
            source_handle: handle_id(source_column, HandleKind::Source, sides.source),
            target_handle: handle_id(target_column, HandleKind::Target, sides.target),
            source_side: sides.source,
            target_side: sides.target,
            kind: EDGE_TYPE,
            style: EdgeStyle::connection(),
            selected: false,
            animated: false,
        }
    }

    /// Set `selected`, `animated` and `style` from the selected edge id.
    pub fn apply_selection(&mut self, selected_edge: Option<&str>) {
        let selected = selected_edge == Some(self.id.as_str());
        self.selected = selected;
        self.animated = selected;
        self.style = if selected {
            EdgeStyle::highlighted()
        } else {
            EdgeStyle::connection()
        };
    }
}

/// Nodes and edges for one applied snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}
