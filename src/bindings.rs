//! `SchemaCanvas` class for JavaScript callers.

use wasm_bindgen::prelude::*;

use crate::ir::column_handles;
use crate::layout::{LayoutEngine, Position};
use crate::schema::Schema;
use crate::svg::SvgRenderer;
use crate::sync::{CanvasHandle, CanvasOptions, SchemaCanvas};
use crate::viewport::Viewport;

#[wasm_bindgen(js_name = "SchemaCanvas")]
pub struct JsSchemaCanvas {
    inner: SchemaCanvas<Viewport>,
    on_table_select: Option<js_sys::Function>,
}

#[wasm_bindgen(js_class = "SchemaCanvas")]
impl JsSchemaCanvas {
    /// `config` is a layout config JSON, `options` a canvas options JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        config: Option<String>,
        options: Option<String>,
    ) -> Result<JsSchemaCanvas, String> {
        let engine = match config.as_deref() {
            Some(json) => LayoutEngine::from_json(json).map_err(|e| e.to_string())?,
            None => LayoutEngine::default(),
        };
        let options: CanvasOptions = match options.as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| format!("Invalid canvas options: {}", e))?,
            None => CanvasOptions::default(),
        };
        Ok(Self {
            inner: SchemaCanvas::with_viewport(engine, options, Viewport::new(width, height)),
            on_table_select: None,
        })
    }

    #[wasm_bindgen(js_name = "setSchema")]
    pub fn set_schema(&mut self, source: &str) -> Result<(), String> {
        let schema = Schema::from_json(source).map_err(|e| e.to_string())?;
        self.inner.apply(schema);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setSelectedTable")]
    pub fn set_selected_table(&mut self, name: Option<String>) {
        self.inner.set_selected_table(name);
    }

    #[wasm_bindgen(js_name = "setOnTableSelect")]
    pub fn set_on_table_select(&mut self, callback: Option<js_sys::Function>) {
        self.on_table_select = callback;
    }

    #[wasm_bindgen(js_name = "nodeClick")]
    pub fn node_click(&mut self, id: &str) -> Result<(), JsValue> {
        let Some(name) = self.inner.on_node_click(id).map(str::to_owned) else {
            return Ok(());
        };
        if let Some(callback) = &self.on_table_select {
            callback.call1(&JsValue::NULL, &JsValue::from_str(&name))?;
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = "edgeClick")]
    pub fn edge_click(&mut self, id: &str) -> bool {
        self.inner.on_edge_click(id)
    }

    #[wasm_bindgen(js_name = "paneClick")]
    pub fn pane_click(&mut self) {
        self.inner.on_pane_click();
    }

    #[wasm_bindgen(js_name = "nodeDragEnd")]
    pub fn node_drag_end(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.inner.on_node_drag_end(id, Position::new(x, y))
    }

    #[wasm_bindgen(js_name = "selectTable")]
    pub fn select_table(&mut self, name: &str) {
        self.inner.select_table(name);
    }

    pub fn nodes(&self) -> Result<String, String> {
        serde_json::to_string(self.inner.nodes()).map_err(|e| e.to_string())
    }

    pub fn edges(&self) -> Result<String, String> {
        serde_json::to_string(self.inner.edges()).map_err(|e| e.to_string())
    }

    pub fn summaries(&self) -> Result<String, String> {
        serde_json::to_string(&self.inner.summaries()).map_err(|e| e.to_string())
    }

    pub fn viewport(&self) -> Result<String, String> {
        serde_json::to_string(self.inner.viewport()).map_err(|e| e.to_string())
    }

    /// Handle ids per column row of a node, as a JSON array of `[left, right]`.
    #[wasm_bindgen(js_name = "columnHandles")]
    pub fn column_handles(&self, id: &str) -> Result<String, String> {
        let handles: Vec<[String; 2]> = self
            .inner
            .node(id)
            .map(|n| n.table().fields.iter().map(column_handles).collect())
            .unwrap_or_default();
        serde_json::to_string(&handles).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "minimapColor")]
    pub fn minimap_color(&self, id: &str) -> Option<String> {
        if !self.inner.options().show_minimap {
            return None;
        }
        self.inner.node(id).map(|n| n.minimap_color().to_string())
    }

    #[wasm_bindgen(js_name = "toSvg")]
    pub fn to_svg(&self) -> String {
        SvgRenderer::default().render(self.inner.nodes(), self.inner.edges(), self.inner.engine())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.viewport_mut().resize(width, height);
    }

    #[wasm_bindgen(js_name = "fitView")]
    pub fn fit_view(&mut self) {
        self.inner.fit_view();
    }

    #[wasm_bindgen(js_name = "zoomIn")]
    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen(js_name = "zoomOut")]
    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    #[wasm_bindgen(js_name = "getZoom")]
    pub fn get_zoom(&self) -> f64 {
        self.inner.get_zoom()
    }

    #[wasm_bindgen(js_name = "centerOnNode")]
    pub fn center_on_node(&mut self, id: &str) {
        self.inner.center_on_node(id);
    }
}
