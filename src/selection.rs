//! Canvas selection state.
//!
//! Node and edge selection are separate axes with one coupling: clicking a
//! node clears the selected edge.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    node: Option<String>,
    edge: Option<String>,
}

impl Selection {
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn edge(&self) -> Option<&str> {
        self.edge.as_deref()
    }

    /// Select a node and drop any selected edge.
    pub fn click_node(&mut self, id: &str) {
        self.node = Some(id.to_string());
        self.edge = None;
    }

    /// Toggle an edge; returns whether it is selected afterwards.
    pub fn click_edge(&mut self, id: &str) -> bool {
        if self.edge.as_deref() == Some(id) {
            self.edge = None;
            false
        } else {
            self.edge = Some(id.to_string());
            true
        }
    }

    /// Empty canvas click: the selected node stays.
    pub fn click_pane(&mut self) {
        self.edge = None;
    }

    /// Node selection driven by the parent view.
    pub fn set_node(&mut self, id: Option<String>) {
        self.node = id;
    }
}
