//! Histograms and line plots.

use qrelay_hal::Counts;

use super::svg::{Anchor, Stroke, SvgDocument};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 45.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

/// A named series of `(x, y)` points.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl PlotSeries {
    /// Pair `xs` with `ys`, truncating to the shorter one.
    pub fn new(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        Self {
            label: label.into(),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        }
    }
}

/// Axis labels and limits.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed y range; derived from the data when `None`.
    pub y_range: Option<(f64, f64)>,
    pub legend: bool,
}

struct Frame {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl Frame {
    fn left() -> f64 {
        MARGIN_LEFT
    }

    fn right() -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    fn top() -> f64 {
        MARGIN_TOP
    }

    fn bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    fn sx(&self, x: f64) -> f64 {
        Self::left() + (x - self.x0) / (self.x1 - self.x0) * (Self::right() - Self::left())
    }

    fn sy(&self, y: f64) -> f64 {
        Self::bottom() - (y - self.y0) / (self.y1 - self.y0) * (Self::bottom() - Self::top())
    }
}

fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn tick_label(v: f64) -> String {
    if v.fract().abs() < 1e-9 && v.abs() < 1e6 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn axes(doc: &mut SvgDocument, frame: &Frame, x_ticks: bool, x_label: &str, y_label: &str) {
    let grid = Stroke::solid("#e5e5e5", 1.0);
    for i in 0..=TICKS {
        let v = frame.y0 + (frame.y1 - frame.y0) * i as f64 / TICKS as f64;
        let y = frame.sy(v);
        doc.line(Frame::left(), y, Frame::right(), y, grid);
        doc.text(Frame::left() - 8.0, y, &tick_label(v), 11.0, Anchor::End);
    }
    if x_ticks {
        for i in 0..=TICKS {
            let v = frame.x0 + (frame.x1 - frame.x0) * i as f64 / TICKS as f64;
            let x = frame.sx(v);
            doc.line(x, Frame::top(), x, Frame::bottom(), grid);
            doc.text(x, Frame::bottom() + 15.0, &tick_label(v), 11.0, Anchor::Middle);
        }
    }

    let axis = Stroke::solid("#333333", 1.2);
    doc.line(Frame::left(), Frame::bottom(), Frame::right(), Frame::bottom(), axis);
    doc.line(Frame::left(), Frame::top(), Frame::left(), Frame::bottom(), axis);

    doc.text(
        (Frame::left() + Frame::right()) / 2.0,
        HEIGHT - 18.0,
        x_label,
        13.0,
        Anchor::Middle,
    );
    doc.vertical_text(18.0, (Frame::top() + Frame::bottom()) / 2.0, y_label, 13.0);
}

/// Bar chart of `counts`, one bar per outcome in key order.
pub fn histogram(counts: &Counts, title: &str) -> SvgDocument {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.title(title);

    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let total = counts.total_shots().max(1) as f64;
    let max = entries.iter().map(|(_, n)| **n).max().unwrap_or(0) as f64;

    let frame = Frame {
        x0: 0.0,
        x1: entries.len().max(1) as f64,
        y0: 0.0,
        y1: (max * 1.15).max(1.0),
    };
    axes(&mut doc, &frame, false, "Outcome", "Count");

    for (i, &(key, &n)) in entries.iter().enumerate() {
        let left = frame.sx(i as f64 + 0.15);
        let right = frame.sx(i as f64 + 0.85);
        let top = frame.sy(n as f64);
        doc.rect(left, top, right - left, Frame::bottom() - top, PALETTE[0], None);
        doc.text(
            (left + right) / 2.0,
            top - 10.0,
            &format!("{n} ({:.3})", n as f64 / total),
            10.0,
            Anchor::Middle,
        );
        doc.text(
            (left + right) / 2.0,
            Frame::bottom() + 15.0,
            key,
            12.0,
            Anchor::Middle,
        );
    }
    doc
}

/// Line plot with circle markers.
pub fn line_plot(series: &[PlotSeries], options: &PlotOptions) -> SvgDocument {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.title(&options.title);

    let all = series.iter().flat_map(|s| s.points.iter());
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in all {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if !x0.is_finite() {
        (x0, x1, y0, y1) = (0.0, 1.0, 0.0, 1.0);
    }
    let (x0, x1) = widen(x0, x1);
    let (y0, y1) = widen(y0, y1);
    let (y0, y1) = options.y_range.unwrap_or((y0, y1));
    let frame = Frame { x0, x1, y0, y1 };

    axes(&mut doc, &frame, true, &options.x_label, &options.y_label);

    for (i, s) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let pts: Vec<(f64, f64)> =
            s.points.iter().map(|&(x, y)| (frame.sx(x), frame.sy(y))).collect();
        doc.polyline(&pts, Stroke::solid(color, 2.0));
        for &(x, y) in &pts {
            doc.circle(x, y, 4.0, color, None);
        }
    }

    if options.legend {
        for (i, s) in series.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let y = Frame::top() + 15.0 + 18.0 * i as f64;
            let x = Frame::right() - 160.0;
            doc.line(x, y, x + 24.0, y, Stroke::solid(color, 2.0));
            doc.circle(x + 12.0, y, 4.0, color, None);
            doc.text(x + 32.0, y, &s.label, 12.0, Anchor::Start);
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_labels_every_outcome() {
        let counts: Counts = [("00", 60), ("11", 40)].into_iter().collect();
        let svg = histogram(&counts, "Bell").render();
        assert!(svg.contains(">00<"));
        assert!(svg.contains(">11<"));
        assert!(svg.contains("60 (0.600)"));
    }

    #[test]
    fn test_histogram_bars_in_key_order() {
        let counts: Counts = [("11", 5), ("00", 7), ("01", 3)].into_iter().collect();
        let svg = histogram(&counts, "order").render();
        let pos = |label: &str| svg.find(&format!(">{label}<")).unwrap();
        assert!(pos("00") < pos("01"));
        assert!(pos("01") < pos("11"));
        assert!(svg.contains("7 (0.467)"));
    }

    #[test]
    fn test_line_plot_fixed_range_and_legend() {
        let series = vec![
            PlotSeries::new("depolarizing", &[0.0, 0.5, 1.0], &[1.0, 0.8, 0.6]),
            PlotSeries::new("amplitude_damping", &[0.0, 0.5, 1.0], &[1.0, 0.9, 0.7]),
        ];
        let options = PlotOptions {
            title: "Fidelity".into(),
            y_range: Some((0.0, 1.05)),
            legend: true,
            ..Default::default()
        };
        let svg = line_plot(&series, &options).render();
        assert!(svg.contains("amplitude_damping"));
        assert!(svg.contains(">1.05<"));
    }

    #[test]
    fn test_empty_plot_does_not_panic() {
        let svg = line_plot(&[], &PlotOptions::default()).render();
        assert!(svg.contains("<svg"));
    }
}
