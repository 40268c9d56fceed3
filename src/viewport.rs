//! Viewport (pan/zoom) control.
//!
//! `ViewportControl` is the imperative surface of the rendering engine.
//! `Viewport` is a headless camera implementing it: a `width x height`
//! container showing the canvas translated by `(x, y)` and scaled by `zoom`.

use crate::layout::Rect;
use serde::Serialize;

pub const FIT_VIEW_PADDING: f64 = 0.2;

pub trait ViewportControl {
    /// Frame `bounds` with `padding` (fraction of the bounds). `None` is a no-op.
    fn fit_bounds(&mut self, bounds: Option<Rect>, padding: f64);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn zoom(&self) -> f64;
    /// Put canvas point `(x, y)` at the container center.
    fn set_center(&mut self, x: f64, y: f64, zoom: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            width,
            height,
            min_zoom: 0.1,
            max_zoom: 2.0,
            zoom_step: 1.2,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Canvas point shown at the container center.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.width / 2.0 - self.x) / self.zoom,
            (self.height / 2.0 - self.y) / self.zoom,
        )
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    fn scale_about_center(&mut self, factor: f64) {
        let (cx, cy) = self.center();
        let zoom = self.clamp_zoom(self.zoom * factor);
        self.set_center(cx, cy, zoom);
    }
}

impl ViewportControl for Viewport {
    fn fit_bounds(&mut self, bounds: Option<Rect>, padding: f64) {
        let Some(bounds) = bounds else {
            return;
        };
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        let x_zoom = self.width / (bounds.width * (1.0 + padding));
        let y_zoom = self.height / (bounds.height * (1.0 + padding));
        let (cx, cy) = bounds.center();
        self.set_center(cx, cy, x_zoom.min(y_zoom));
    }

    fn zoom_in(&mut self) {
        self.scale_about_center(self.zoom_step);
    }

    fn zoom_out(&mut self) {
        self.scale_about_center(1.0 / self.zoom_step);
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_center(&mut self, x: f64, y: f64, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
        self.x = self.width / 2.0 - x * self.zoom;
        self.y = self.height / 2.0 - y * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_set_center() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_center(200.0, 150.0, 1.0);

        assert_eq!(vp.x, 200.0);
        assert_eq!(vp.y, 150.0);
        let (cx, cy) = vp.center();
        assert!(close(cx, 200.0) && close(cy, 150.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::new(800.0, 600.0);
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), 2.0);
        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), 0.1);
    }

    #[test]
    fn test_zoom_keeps_center() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_center(1000.0, 500.0, 1.0);
        vp.zoom_in();

        assert!(close(vp.zoom(), 1.2));
        let (cx, cy) = vp.center();
        assert!(close(cx, 1000.0) && close(cy, 500.0));
    }

    #[test]
    fn test_fit_bounds() {
        let mut vp = Viewport::new(1200.0, 600.0);
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            width: 1000.0,
            height: 250.0,
        };
        vp.fit_bounds(Some(bounds), FIT_VIEW_PADDING);

        assert!(close(vp.zoom(), 1.0));
        let (cx, cy) = vp.center();
        assert!(close(cx, 500.0) && close(cy, 125.0));
    }

    #[test]
    fn test_fit_nothing_is_noop() {
        let mut vp = Viewport::new(800.0, 600.0);
        let before = vp.clone();
        vp.fit_bounds(None, FIT_VIEW_PADDING);
        assert_eq!(vp, before);
    }
}
