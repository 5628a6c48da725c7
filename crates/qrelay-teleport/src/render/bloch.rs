//! Bloch-sphere drawings.
//!
//! The sphere is drawn in an oblique projection: Y points right, Z points
//! up and X comes out of the page towards the lower left.

use std::f64::consts::TAU;

use super::svg::{Anchor, Stroke, SvgDocument};
use crate::density::BlochVector;

const SIZE: f64 = 360.0;
const RADIUS: f64 = 120.0;
const VECTOR_COLOR: &str = "#d62728";

/// Screen coordinates of a Bloch-ball point.
fn project(cx: f64, cy: f64, x: f64, y: f64, z: f64) -> (f64, f64) {
    (cx + RADIUS * (y - 0.45 * x), cy - RADIUS * (z - 0.3 * x))
}

fn great_circle(
    cx: f64,
    cy: f64,
    point: impl Fn(f64) -> (f64, f64, f64),
) -> Vec<(f64, f64)> {
    (0..=72)
        .map(|i| {
            let (x, y, z) = point(TAU * i as f64 / 72.0);
            project(cx, cy, x, y, z)
        })
        .collect()
}

/// Draw a Bloch sphere with `r` as an arrow from the centre.
pub fn bloch_sphere(r: BlochVector, title: &str) -> SvgDocument {
    let mut doc = SvgDocument::new(SIZE, SIZE + 40.0);
    doc.title(title);
    let (cx, cy) = (SIZE / 2.0, SIZE / 2.0 + 15.0);

    doc.circle(cx, cy, RADIUS, "#f7f9fc", Some(Stroke::solid("#999999", 1.0)));
    doc.polyline(
        &great_circle(cx, cy, |t| (t.cos(), t.sin(), 0.0)),
        Stroke::solid("#bbbbbb", 1.0),
    );
    doc.polyline(
        &great_circle(cx, cy, |t| (t.cos(), 0.0, t.sin())),
        Stroke::dashed("#cccccc", 1.0),
    );

    let axes = [
        ((1.0, 0.0, 0.0), "x"),
        ((0.0, 1.0, 0.0), "y"),
        ((0.0, 0.0, 1.0), "|0⟩"),
        ((0.0, 0.0, -1.0), "|1⟩"),
    ];
    for ((x, y, z), label) in axes {
        let (ex, ey) = project(cx, cy, x, y, z);
        doc.line(cx, cy, ex, ey, Stroke::dashed("#666666", 0.8));
        let (lx, ly) = project(cx, cy, x * 1.18, y * 1.18, z * 1.15);
        doc.text(lx, ly, label, 13.0, Anchor::Middle);
    }

    let (tx, ty) = project(cx, cy, r.x, r.y, r.z);
    doc.line(cx, cy, tx, ty, Stroke::solid(VECTOR_COLOR, 3.0));
    doc.circle(tx, ty, 5.0, VECTOR_COLOR, None);
    doc.circle(cx, cy, 2.5, "#444444", None);

    doc.text(
        SIZE / 2.0,
        SIZE + 25.0,
        &format!("r = {r}   |r| = {:.4}", r.norm()),
        12.0,
        Anchor::Middle,
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_axes() {
        let (cx, cy) = (0.0, 0.0);
        assert_eq!(project(cx, cy, 0.0, 0.0, 1.0), (0.0, -RADIUS));
        assert_eq!(project(cx, cy, 0.0, 1.0, 0.0), (RADIUS, 0.0));
        let (x, y) = project(cx, cy, 1.0, 0.0, 0.0);
        assert!(x < 0.0 && y > 0.0);
    }

    #[test]
    fn test_sphere_shows_vector() {
        let svg = bloch_sphere(BlochVector::new(0.0, 0.0, 1.0), "zero").render();
        assert!(svg.contains(VECTOR_COLOR));
        assert!(svg.contains("|r| = 1.0000"));
    }
}
