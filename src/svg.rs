use crate::ir::{DiagramEdge, DiagramNode, EdgeStyle};
use crate::layout::{LayoutEngine, Side, handle_point};
use crate::measure::TextMetrics;
use std::collections::HashMap;
use std::fmt::{self, Write};

const MARGIN: f64 = 40.0;

/// Static SVG snapshot of a laid-out diagram.
pub struct SvgRenderer {
    metrics: TextMetrics,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
        }
    }
}

impl SvgRenderer {
    pub fn render(
        &self,
        nodes: &[DiagramNode],
        edges: &[DiagramEdge],
        engine: &LayoutEngine,
    ) -> String {
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_document(&mut svg, nodes, edges, engine);
        svg
    }

    fn write_document(
        &self,
        svg: &mut String,
        nodes: &[DiagramNode],
        edges: &[DiagramEdge],
        engine: &LayoutEngine,
    ) -> fmt::Result {
        let bounds = engine.bounds(nodes.iter().map(|n| (n.position, n.table())));
        let (min_x, min_y, width, height) = match bounds {
            Some(b) => (
                b.x - MARGIN,
                b.y - MARGIN,
                b.width + MARGIN * 2.0,
                b.height + MARGIN * 2.0,
            ),
            None => (0.0, 0.0, MARGIN * 2.0, MARGIN * 2.0),
        };

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            width, height, min_x, min_y, width, height
        )?;

        writeln!(
            svg,
            r#"<style>
  .table-bg {{ fill: #14141c; }}
  .table-header {{ fill: #23232f; }}
  .table-border {{ fill: none; stroke: #3a3a4a; stroke-width: 1; }}
  .table-border.selected {{ stroke: #7c5cff; stroke-width: 2; }}
  .table-name {{ font-family: monospace; font-size: 14px; font-weight: bold; fill: #e6e6f0; }}
  .column-name {{ font-family: monospace; font-size: 12px; fill: #e6e6f0; }}
  .column-name.pk {{ fill: #f5b942; font-weight: bold; }}
  .column-name.fk {{ fill: #4fc3f7; }}
  .column-type {{ font-family: monospace; font-size: 10px; fill: #8a8aa0; text-transform: uppercase; }}
  .row-divider {{ stroke: #2a2a38; stroke-width: 1; }}
</style>"#
        )?;

        let node_map: HashMap<&str, &DiagramNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        // Edges first (behind tables)
        for edge in edges {
            if let (Some(source), Some(target)) = (
                node_map.get(edge.source.as_str()),
                node_map.get(edge.target.as_str()),
            ) {
                self.write_edge(svg, edge, source, target, engine)?;
            }
        }

        for node in nodes {
            self.write_node(svg, node, engine)?;
        }

        writeln!(svg, "</svg>")
    }

    fn write_node(
        &self,
        svg: &mut String,
        node: &DiagramNode,
        engine: &LayoutEngine,
    ) -> fmt::Result {
        let table = node.table();
        let (w, h) = engine.node_size(table);
        let x = node.position.x;
        let y = node.position.y;
        let header_h = engine.header_height;
        let text_width = w - self.metrics.padding_x * 2.0;

        writeln!(
            svg,
            r#"<rect class="table-bg" x="{}" y="{}" width="{}" height="{}" rx="8" />"#,
            x, y, w, h
        )?;
        writeln!(
            svg,
            r#"<rect class="table-header" x="{}" y="{}" width="{}" height="{}" rx="8" />"#,
            x, y, w, header_h
        )?;
        writeln!(
            svg,
            r#"<text class="table-name" x="{}" y="{}">{}</text>"#,
            x + self.metrics.padding_x,
            y + header_h / 2.0 + 5.0,
            escape_xml(&self.metrics.fit(&table.name, text_width))
        )?;

        for (row, column) in table.fields.iter().enumerate() {
            let row_y = y + header_h + row as f64 * engine.field_height;
            writeln!(
                svg,
                r#"<line class="row-divider" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
                x,
                row_y,
                x + w,
                row_y
            )?;

            let mut class = "column-name".to_string();
            if column.pk {
                class.push_str(" pk");
            } else if column.is_foreign_key() {
                class.push_str(" fk");
            }

            let type_name = if column.typ.type_name.is_empty() {
                "unknown"
            } else {
                column.typ.type_name.as_str()
            };
            let type_width = self.metrics.text_width(type_name);
            let name_width = (text_width - type_width - self.metrics.char_width * 2.0).max(0.0);
            let text_y = row_y + engine.field_height / 2.0 + 4.0;

            writeln!(
                svg,
                r#"<text class="{}" x="{}" y="{}">{}</text>"#,
                class,
                x + self.metrics.padding_x,
                text_y,
                escape_xml(&self.metrics.fit(&column.name, name_width))
            )?;
            writeln!(
                svg,
                r#"<text class="column-type" x="{}" y="{}" text-anchor="end">{}</text>"#,
                x + w - self.metrics.padding_x,
                text_y,
                escape_xml(type_name)
            )?;
        }

        let border_class = if node.is_selected() {
            "table-border selected"
        } else {
            "table-border"
        };
        writeln!(
            svg,
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="8" />"#,
            border_class, x, y, w, h
        )
    }

    fn write_edge(
        &self,
        svg: &mut String,
        edge: &DiagramEdge,
        source: &DiagramNode,
        target: &DiagramNode,
        engine: &LayoutEngine,
    ) -> fmt::Result {
        let (x1, y1) = handle_point(
            source.position,
            source.table(),
            &edge.source_column,
            edge.source_side,
            engine,
        );
        let (x2, y2) = handle_point(
            target.position,
            target.table(),
            &edge.target_column,
            edge.target_side,
            engine,
        );

        let offset = ((x2 - x1).abs() / 2.0).max(50.0);
        let c1 = x1 + direction(edge.source_side) * offset;
        let c2 = x2 + direction(edge.target_side) * offset;

        writeln!(
            svg,
            r#"<path d="M {} {} C {} {} {} {} {} {}" fill="none" {} />"#,
            x1,
            y1,
            c1,
            y1,
            c2,
            y2,
            x2,
            y2,
            stroke_attrs(&edge.style)
        )
    }
}

fn direction(side: Side) -> f64 {
    match side {
        Side::Left => -1.0,
        Side::Right => 1.0,
    }
}

/// CSS custom properties cannot be resolved outside the page.
fn resolve_color(stroke: &str) -> &str {
    match stroke {
        "var(--primary)" => "#7c5cff",
        "var(--connection)" => "#6b6b80",
        other => other,
    }
}

fn stroke_attrs(style: &EdgeStyle) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        escape_xml(resolve_color(&style.stroke)),
        style.stroke_width
    );
    if let Some(dash) = &style.stroke_dasharray {
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, escape_xml(dash)));
    }
    attrs
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
