//! Render surface capability
//!
//! Screens never talk to a rendering backend directly. They compute a
//! [`StyleProps`] snapshot per node and hand it to a [`RenderSurface`], which
//! decides how (and whether) to repaint. [`RecordingSurface`] keeps the latest
//! style for each node and is what tests and the headless CLI use.

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;

use crate::color::Color;
use crate::geometry::Polygon;

/// Identifies a node in a screen's view tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub name: &'static str,
    pub index: Option<u32>,
}

impl NodeKey {
    pub const fn new(name: &'static str) -> Self {
        Self { name, index: None }
    }

    /// Node repeated in a list (carousel dots, picker items, menu entries)
    pub const fn indexed(name: &'static str, index: u32) -> Self {
        Self {
            name,
            index: Some(index),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]", self.name, i),
            None => f.write_str(self.name),
        }
    }
}

/// Interpolated visual properties for one node
///
/// Only the properties a screen animates are set; `None` means "leave as laid out".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProps {
    pub opacity: Option<f32>,
    pub scale: Option<f32>,
    pub translate_x: Option<f32>,
    pub translate_y: Option<f32>,
    pub rotate_deg: Option<f32>,
    pub width: Option<f32>,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub text: Option<String>,
    pub clip: Option<Polygon>,
    pub strike_through: bool,
}

impl StyleProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn translate_x(mut self, x: f32) -> Self {
        self.translate_x = Some(x);
        self
    }

    pub fn translate_y(mut self, y: f32) -> Self {
        self.translate_y = Some(y);
        self
    }

    pub fn rotate_deg(mut self, deg: f32) -> Self {
        self.rotate_deg = Some(deg);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn clip(mut self, clip: Polygon) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn strike_through(mut self, strike: bool) -> Self {
        self.strike_through = strike;
        self
    }
}

impl fmt::Display for StyleProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(v) = self.opacity {
            parts.push(format!("opacity={v:.3}"));
        }
        if let Some(v) = self.scale {
            parts.push(format!("scale={v:.3}"));
        }
        if let Some(v) = self.translate_x {
            parts.push(format!("tx={v:.1}"));
        }
        if let Some(v) = self.translate_y {
            parts.push(format!("ty={v:.1}"));
        }
        if let Some(v) = self.rotate_deg {
            parts.push(format!("rotate={v:.1}deg"));
        }
        if let Some(v) = self.width {
            parts.push(format!("width={v:.1}"));
        }
        if let Some(c) = self.background {
            parts.push(format!("bg={c}"));
        }
        if let Some(c) = self.foreground {
            parts.push(format!("fg={c}"));
        }
        if let Some(t) = &self.text {
            parts.push(format!("text={t:?}"));
        }
        if let Some(clip) = &self.clip {
            parts.push(format!("clip=[{}]", clip.to_svg_points()));
        }
        if self.strike_through {
            parts.push("strike".to_string());
        }
        f.write_str(&parts.join(" "))
    }
}

/// Capability for pushing new style values to whatever draws the screen
pub trait RenderSurface {
    /// Mark `node` dirty with its new interpolated style
    fn mark_dirty(&self, node: NodeKey, style: StyleProps);
}

/// Surface that records the latest style of every node
#[derive(Debug, Default)]
pub struct RecordingSurface {
    nodes: RefCell<IndexMap<NodeKey, StyleProps>>,
    updates: Cell<u64>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest style pushed for `node`
    pub fn style(&self, node: NodeKey) -> Option<StyleProps> {
        self.nodes.borrow().get(&node).cloned()
    }

    /// Total number of `mark_dirty` calls
    pub fn update_count(&self) -> u64 {
        self.updates.get()
    }

    /// Number of distinct nodes painted so far
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Snapshot of every node in first-painted order
    pub fn snapshot(&self) -> Vec<(NodeKey, StyleProps)> {
        self.nodes
            .borrow()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    pub fn clear(&self) {
        self.nodes.borrow_mut().clear();
        self.updates.set(0);
    }
}

impl RenderSurface for RecordingSurface {
    fn mark_dirty(&self, node: NodeKey, style: StyleProps) {
        tracing::trace!("mark_dirty {} {}", node, style);
        self.nodes.borrow_mut().insert(node, style);
        self.updates.set(self.updates.get() + 1);
    }
}
