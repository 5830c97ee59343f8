//! Immediate-mode SVG canvas used by the chart rasterizer.
//!
//! Coordinates are in abstract pixels with the origin at the top left.
//! The canvas accumulates SVG fragments and emits the complete document
//! via [`Canvas::finish_svg`]; rasterization to PNG happens separately in
//! [`crate::chart::png`].

use std::fmt::Write as _;

/// Horizontal anchoring for text placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the given x position.
    #[default]
    Start,
    /// Text is centered on the given x position.
    Middle,
    /// Text ends at the given x position.
    End,
}

impl TextAnchor {
    fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// SVG scene under construction.
pub struct Canvas {
    width: f64,
    height: f64,
    body: String,
}

impl Canvas {
    /// Creates a blank canvas with a white background.
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0.0, 0.0, width, height, "#ffffff", 1.0);
        canvas
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Filled rectangle.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" fill-opacity="{opacity}"/>"#,
        );
    }

    /// Straight stroked line.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = write!(
            self.body,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-width="{width}"/>"#,
        );
    }

    /// Open polyline through the given points.
    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        if points.len() < 2 {
            return;
        }
        let _ = write!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width}" stroke-linejoin="round"/>"#,
            encode_points(points),
        );
    }

    /// Filled polygon.
    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str, opacity: f64) {
        if points.len() < 3 {
            return;
        }
        let _ = write!(
            self.body,
            r#"<polygon points="{}" fill="{fill}" fill-opacity="{opacity}" stroke="none"/>"#,
            encode_points(points),
        );
    }

    /// Text with its baseline at `y`.
    pub fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: TextAnchor) {
        let _ = write!(
            self.body,
            r##"<text x="{x:.2}" y="{y:.2}" font-family="sans-serif" font-size="{size}" fill="#222222" text-anchor="{}">{}</text>"##,
            anchor.as_svg(),
            escape_text(content),
        );
    }

    /// Text rotated by `angle` degrees around its anchor point.
    pub fn text_rotated(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        size: f64,
        anchor: TextAnchor,
        angle: f64,
    ) {
        let _ = write!(
            self.body,
            r##"<text x="{x:.2}" y="{y:.2}" font-family="sans-serif" font-size="{size}" fill="#222222" text-anchor="{}" transform="rotate({angle:.1} {x:.2} {y:.2})">{}</text>"##,
            anchor.as_svg(),
            escape_text(content),
        );
    }

    /// Approximate rendered width of `content` at `size`.
    ///
    /// A fixed average advance is close enough for margin sizing and the
    /// density check that triggers tick-label rotation.
    pub fn measure_text(&self, content: &str, size: f64) -> f64 {
        content.chars().count() as f64 * size * 0.6
    }

    /// Serializes the scene to a complete SVG document.
    pub fn finish_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

fn encode_points(points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(points.len() * 12);
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x:.2},{y:.2}");
    }
    out
}

fn escape_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_svg_wraps_body() {
        let mut canvas = Canvas::new(100.0, 50.0);
        canvas.line(0.0, 0.0, 10.0, 10.0, "#000000", 1.0);
        let svg = canvas.finish_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<line"));
    }

    #[test]
    fn text_is_escaped() {
        let mut canvas = Canvas::new(10.0, 10.0);
        canvas.text(0.0, 5.0, "a < b & c", 10.0, TextAnchor::Start);
        assert!(canvas.finish_svg().contains("a &lt; b &amp; c"));
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let mut canvas = Canvas::new(10.0, 10.0);
        let before = canvas.finish_svg();
        canvas.polyline(&[(1.0, 1.0)], "#000", 1.0);
        canvas.polygon(&[(1.0, 1.0), (2.0, 2.0)], "#000", 1.0);
        assert_eq!(canvas.finish_svg(), before);
    }
}
