//! In-memory vector document for the SVG export path.
//!
//! The code modules are kept in module units and scaled into pixel space at
//! serialization time, while background, padding and logo nodes are placed in
//! pixels. The emitted string always uses Unix newlines (\n).

use std::fmt::Write as _;

use crate::style::Rgb;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorNode {
    /// Solid rectangle in pixels.
    Rect { rect: Rect, fill: Rgb },
    /// Path data `d` in module units, scaled by `scale` pixels per module.
    Modules { d: String, scale: f64, fill: Rgb },
    /// Embedded raster image fitted into `frame` without cropping.
    Image { frame: Rect, href: String },
}

/// Square SVG document of `side` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    side: u32,
    nodes: Vec<VectorNode>,
}

impl VectorDocument {
    pub fn new(side: u32) -> Self {
        Self { side, nodes: Vec::new() }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn nodes(&self) -> &[VectorNode] {
        &self.nodes
    }

    pub fn push(&mut self, node: VectorNode) {
        self.nodes.push(node);
    }

    /// Rescales every node onto a `side × side` canvas.
    pub fn resized(self, side: u32) -> Self {
        if side == self.side || self.side == 0 {
            return Self { side, ..self };
        }
        let f = side as f64 / self.side as f64;
        let scale_rect = |r: Rect| Rect::new(r.x * f, r.y * f, r.width * f, r.height * f);
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| match node {
                VectorNode::Rect { rect, fill } => VectorNode::Rect { rect: scale_rect(rect), fill },
                VectorNode::Modules { d, scale, fill } => VectorNode::Modules { d, scale: scale * f, fill },
                VectorNode::Image { frame, href } => VectorNode::Image { frame: scale_rect(frame), href },
            })
            .collect();
        Self { side, nodes }
    }

    /// Serializes the document as a standalone SVG file.
    pub fn to_svg_string(&self) -> String {
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        let _ = writeln!(
            result,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">",
            self.side
        );
        for node in &self.nodes {
            match node {
                VectorNode::Rect { rect, fill } => {
                    let _ = writeln!(
                        result,
                        "\t<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                        num(rect.x),
                        num(rect.y),
                        num(rect.width),
                        num(rect.height),
                        fill
                    );
                }
                VectorNode::Modules { d, scale, fill } => {
                    if d.is_empty() {
                        continue;
                    }
                    let _ = writeln!(
                        result,
                        "\t<path transform=\"scale({})\" d=\"{}\" fill=\"{}\"/>",
                        num(*scale),
                        d,
                        fill
                    );
                }
                VectorNode::Image { frame, href } => {
                    let _ = writeln!(
                        result,
                        "\t<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" href=\"{}\"/>",
                        num(frame.x),
                        num(frame.y),
                        num(frame.width),
                        num(frame.height),
                        href
                    );
                }
            }
        }
        result += "</svg>\n";
        result
    }
}

/// Formats a coordinate with at most four decimals and no trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
