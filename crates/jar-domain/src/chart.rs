//! Ring chart primitives shared by the renderer and its consumers.

use serde::{Deserialize, Serialize};

/// One coloured wedge of the ring chart. Built fresh for every render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArcSegment {
    pub percent: f64,
    pub color: String,
}

impl ArcSegment {
    pub fn new(percent: f64, color: impl Into<String>) -> Self {
        Self {
            percent,
            color: color.into(),
        }
    }
}

/// Pixel dimensions of the chart and the angular gap between wedges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartGeometry {
    pub size: f64,
    pub stroke_width: f64,
    pub gap_degree: f64,
}

impl ChartGeometry {
    pub fn new(size: f64, stroke_width: f64, gap_degree: f64) -> Self {
        Self {
            size,
            stroke_width,
            gap_degree,
        }
    }

    pub fn center(&self) -> f64 {
        self.size / 2.0
    }

    /// Radius of the stroke's centre line.
    pub fn radius(&self) -> f64 {
        self.size / 2.0 - self.stroke_width / 2.0
    }
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            size: 120.0,
            stroke_width: 24.0,
            gap_degree: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A drawable arc for one segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArcPath {
    /// Index of the source segment in the caller's input.
    pub segment_index: usize,
    pub color: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path data.
    pub d: String,
}

impl ArcPath {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// The uncoloured full ring drawn underneath the arcs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BackgroundRing {
    pub center: f64,
    pub radius: f64,
    pub stroke_width: f64,
}

/// Complete render description of a ring chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RingChart {
    pub size: f64,
    pub background: BackgroundRing,
    pub arcs: Vec<ArcPath>,
}

impl RingChart {
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn total_span(&self) -> f64 {
        self.arcs.iter().map(ArcPath::span).sum()
    }
}
