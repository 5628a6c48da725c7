//! Minimal SVG document builder.

use std::path::Path;

use crate::error::TeleportResult;

/// Default font stack for all text.
const FONT: &str = "Helvetica, Arial, sans-serif";

/// Text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Stroke settings for lines and outlines.
#[derive(Debug, Clone, Copy)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub dashed: bool,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }

    fn attrs(&self) -> String {
        let dash = if self.dashed {
            r#" stroke-dasharray="5,4""#
        } else {
            ""
        };
        format!(
            r#"stroke="{}" stroke-width="{:.2}"{dash}"#,
            self.color, self.width
        )
    }
}

/// An SVG image under construction.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: Vec<String>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgDocument {
    /// A blank white canvas.
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            body: vec![],
        };
        doc.rect(0.0, 0.0, width, height, "white", None);
        doc
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke<'_>) {
        self.body.push(format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" {}/>"#,
            stroke.attrs()
        ));
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<Stroke<'_>>) {
        let stroke = stroke.map(|s| s.attrs()).unwrap_or_default();
        self.body.push(format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" {stroke}/>"#
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: Option<Stroke<'_>>) {
        let stroke = stroke.map(|s| s.attrs()).unwrap_or_default();
        self.body.push(format!(
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}" {stroke}/>"#
        ));
    }

    /// Open polyline through `points`.
    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>) {
        if points.len() < 2 {
            return;
        }
        let pts: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect();
        self.body.push(format!(
            r#"<polyline points="{}" fill="none" {}/>"#,
            pts.join(" "),
            stroke.attrs()
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: Anchor) {
        self.styled_text(x, y, content, size, anchor, "black", false);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn styled_text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        size: f64,
        anchor: Anchor,
        color: &str,
        bold: bool,
    ) {
        let weight = if bold { "bold" } else { "normal" };
        self.body.push(format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT}" font-size="{size:.1}" font-weight="{weight}" fill="{color}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
            anchor.as_str(),
            escape(content)
        ));
    }

    /// Text rotated 90° counter-clockwise about its anchor point.
    pub fn vertical_text(&mut self, x: f64, y: f64, content: &str, size: f64) {
        self.body.push(format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT}" font-size="{size:.1}" text-anchor="middle" dominant-baseline="middle" transform="rotate(-90 {x:.2} {y:.2})">{}</text>"#,
            escape(content)
        ));
    }

    /// Centered bold title across the top.
    pub fn title(&mut self, content: &str) {
        self.styled_text(self.width / 2.0, 20.0, content, 16.0, Anchor::Middle, "black", true);
    }

    /// Serialise the document.
    pub fn render(&self) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = self.width,
            h = self.height
        );
        out.push('\n');
        for element in &self.body {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> TeleportResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_elements() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.line(0.0, 0.0, 10.0, 10.0, Stroke::dashed("red", 1.0));
        doc.text(5.0, 5.0, "a<b", 10.0, Anchor::Start);

        let svg = doc.render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("a&lt;b"));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        let before = doc.render().len();
        doc.polyline(&[(1.0, 1.0)], Stroke::solid("black", 1.0));
        assert_eq!(doc.render().len(), before);
    }
}
