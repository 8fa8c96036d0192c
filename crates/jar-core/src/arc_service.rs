//! Ring chart geometry: turns percentage segments into SVG arc paths.
//!
//! Angles are clock angles: 0° points to 12 o'clock and grow clockwise.
//! Nothing here returns an error; degenerate input always maps to a
//! drawable fallback (at worst the bare background ring).

use std::fmt::Write as _;

use jar_domain::{ArcPath, ArcSegment, BackgroundRing, ChartGeometry, Point, RingChart};

/// Jar colours in canonical order.
pub const DEFAULT_JAR_COLORS: [&str; 6] = [
    "#1A75FF", "#FF8C00", "#4CAF50", "#FF4081", "#FFD600", "#9C27B0",
];

pub const DEFAULT_BACKGROUND_COLOR: &str = "#eee";

/// Segments spanning less than this many degrees are not drawn.
pub const MIN_VISIBLE_SPAN: f64 = 0.5;

/// Spans below this are treated as zero-length by [`ArcGeometryRenderer::describe_arc`].
pub const DEGENERATE_SPAN: f64 = 0.01;

/// Trim applied to the end of a full-circle arc so start and end differ.
pub const FULL_CIRCLE_TRIM: f64 = 0.01;

pub struct ArcGeometryRenderer;

impl ArcGeometryRenderer {
    /// Point on the circle at `angle_degrees` (clock angle).
    pub fn polar_to_cartesian(center_x: f64, center_y: f64, radius: f64, angle_degrees: f64) -> Point {
        let radians = (angle_degrees - 90.0).to_radians();
        Point {
            x: center_x + radius * radians.cos(),
            y: center_y + radius * radians.sin(),
        }
    }

    /// SVG path data for an arc from `start_angle` to `end_angle`, or `None`
    /// for a zero-length arc. A span of 360° or more is drawn as two half
    /// circles with the end pulled back by [`FULL_CIRCLE_TRIM`].
    pub fn describe_arc(
        center_x: f64,
        center_y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Option<String> {
        let span = end_angle - start_angle;
        if span.abs() < DEGENERATE_SPAN {
            return None;
        }

        let mut d = String::new();
        if span >= 360.0 {
            let start = Self::polar_to_cartesian(center_x, center_y, radius, start_angle);
            let mid = Self::polar_to_cartesian(center_x, center_y, radius, start_angle + 180.0);
            let end =
                Self::polar_to_cartesian(center_x, center_y, radius, end_angle - FULL_CIRCLE_TRIM);
            let r = format_number(radius);
            let _ = write!(
                d,
                "M {} {} A {r} {r} 0 0 1 {} {} A {r} {r} 0 0 1 {} {}",
                format_number(start.x),
                format_number(start.y),
                format_number(mid.x),
                format_number(mid.y),
                format_number(end.x),
                format_number(end.y),
            );
            return Some(d);
        }

        // Drawn from the end point back to the start (sweep flag 0).
        let from = Self::polar_to_cartesian(center_x, center_y, radius, end_angle);
        let to = Self::polar_to_cartesian(center_x, center_y, radius, start_angle);
        let large_arc = if span <= 180.0 { 0 } else { 1 };
        let r = format_number(radius);
        let _ = write!(
            d,
            "M {} {} A {r} {r} 0 {large_arc} 0 {} {}",
            format_number(from.x),
            format_number(from.y),
            format_number(to.x),
            format_number(to.y),
        );
        Some(d)
    }

    /// Lays the segments out clockwise from 12 o'clock in input order.
    ///
    /// Segments with a non-positive (or non-finite) percent are dropped
    /// first. The remaining ones share `360 - n * gap` degrees in proportion
    /// to their percent, each inset by half a gap on both ends. Segments left
    /// too thin to draw after the inset are skipped but still advance the
    /// angle cursor.
    pub fn build_arc_paths(segments: &[ArcSegment], geometry: ChartGeometry) -> RingChart {
        let center = geometry.center();
        let radius = geometry.radius();
        let gap = if geometry.gap_degree.is_finite() {
            geometry.gap_degree.max(0.0)
        } else {
            0.0
        };
        let mut chart = RingChart {
            size: geometry.size,
            background: BackgroundRing {
                center,
                radius,
                stroke_width: geometry.stroke_width,
            },
            arcs: Vec::new(),
        };

        let visible: Vec<(usize, &ArcSegment)> = segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.percent.is_finite() && segment.percent > 0.0)
            .collect();
        let total: f64 = visible.iter().map(|(_, segment)| segment.percent).sum();
        if visible.is_empty() || total <= 0.0 {
            return chart;
        }

        let available = 360.0 - visible.len() as f64 * gap;
        let mut cursor = 0.0;
        for (index, segment) in visible {
            let angle = segment.percent / total * available;
            let end = cursor + angle;
            let start_angle = cursor + gap / 2.0;
            let end_angle = end - gap / 2.0;
            if end_angle - start_angle >= MIN_VISIBLE_SPAN {
                if let Some(d) = Self::describe_arc(center, center, radius, start_angle, end_angle) {
                    let drawn_end = if end_angle - start_angle >= 360.0 {
                        end_angle - FULL_CIRCLE_TRIM
                    } else {
                        end_angle
                    };
                    chart.arcs.push(ArcPath {
                        segment_index: index,
                        color: segment.color.clone(),
                        start_angle,
                        end_angle: drawn_end,
                        d,
                    });
                }
            }
            cursor = end + gap;
        }
        chart
    }

    /// Standalone SVG document: the background ring plus one round-capped
    /// path per arc.
    pub fn render_svg(chart: &RingChart, background_color: &str) -> String {
        let size = format_number(chart.size);
        let ring = chart.background;
        let stroke = format_number(ring.stroke_width);
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">"
        );
        svg.push_str("<g>");
        let _ = write!(
            svg,
            "<circle cx=\"{c}\" cy=\"{c}\" r=\"{r}\" stroke=\"{color}\" stroke-width=\"{stroke}\" fill=\"none\"/>",
            c = format_number(ring.center),
            r = format_number(ring.radius),
            color = escape_attribute(background_color),
        );
        for arc in &chart.arcs {
            let _ = write!(
                svg,
                "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{stroke}\" fill=\"none\" stroke-linecap=\"round\"/>",
                arc.d,
                escape_attribute(&arc.color),
            );
        }
        svg.push_str("</g></svg>");
        svg
    }
}

/// At most three decimals, trailing zeros trimmed, no negative zero.
pub fn format_number(value: f64) -> String {
    let mut text = format!("{value:.3}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
