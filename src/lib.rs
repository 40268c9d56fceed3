pub mod bindings;
pub mod ir;
pub mod layout;
pub mod measure;
pub mod resolve;
pub mod schema;
pub mod selection;
pub mod svg;
pub mod sync;
pub mod viewport;

use wasm_bindgen::prelude::*;

use ir::Diagram;
use layout::LayoutEngine;
use schema::Schema;
use svg::SvgRenderer;
use sync::{CanvasOptions, SchemaCanvas};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Lay out a schema snapshot with a fresh canvas.
pub fn build_diagram(
    schema: Schema,
    engine: LayoutEngine,
    selected_table: Option<String>,
) -> Diagram {
    let mut canvas = SchemaCanvas::new(engine, CanvasOptions::default());
    canvas.set_selected_table(selected_table);
    canvas.apply(schema);
    canvas.diagram()
}

fn engine_from(config: Option<&str>) -> Result<LayoutEngine, String> {
    match config {
        Some(json) => LayoutEngine::from_json(json).map_err(|e| e.to_string()),
        None => Ok(LayoutEngine::default()),
    }
}

/// Schema JSON to `{ nodes, edges }` JSON
#[wasm_bindgen(js_name = "layoutSchema")]
pub fn layout_schema(source: &str, config: Option<String>) -> Result<String, String> {
    let schema = Schema::from_json(source).map_err(|e| e.to_string())?;
    let engine = engine_from(config.as_deref())?;

    let diagram = build_diagram(schema, engine, None);
    serde_json::to_string(&diagram).map_err(|e| e.to_string())
}

/// Schema JSON to a JSON array of grid positions, one per table
#[wasm_bindgen(js_name = "calculatePositions")]
pub fn calculate_positions(
    source: &str,
    initial_x: Option<f64>,
    initial_y: Option<f64>,
) -> Result<String, String> {
    let schema = Schema::from_json(source).map_err(|e| e.to_string())?;
    let engine = LayoutEngine::default();

    let positions = engine.calculate_positions(
        &schema.tables,
        initial_x.unwrap_or(engine.initial_x),
        initial_y.unwrap_or(engine.initial_y),
    );
    serde_json::to_string(&positions).map_err(|e| e.to_string())
}

/// Schema JSON to an SVG snapshot
#[wasm_bindgen(js_name = "schemaToSvg")]
pub fn render_svg(source: &str, config: Option<String>) -> Result<String, String> {
    let schema = Schema::from_json(source).map_err(|e| e.to_string())?;
    let engine = engine_from(config.as_deref())?;

    let diagram = build_diagram(schema, engine.clone(), None);
    Ok(SvgRenderer::default().render(&diagram.nodes, &diagram.edges, &engine))
}
