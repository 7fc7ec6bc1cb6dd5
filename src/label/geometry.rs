use std::f64::consts::{FRAC_PI_2, PI};

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn on_circle(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }
}

/// Band of a circle reserved for its label: the segment cut off by a
/// horizontal chord `label_size` above the bottom of the circle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelGeometry {
    pub radius: f64,
    pub label_size: f64,
    pub half_angle: f64,
}

impl LabelGeometry {
    /// Returns `None` for a non-positive radius or band, a band at least as
    /// tall as the circle, or non-finite input.
    pub fn new(radius: f64, label_size: f64) -> Option<Self> {
        if !radius.is_finite() || !label_size.is_finite() {
            return None;
        }
        if radius <= 0.0 || label_size <= 0.0 || label_size >= 2.0 * radius {
            return None;
        }

        let top = radius - label_size;
        Some(Self {
            radius,
            label_size,
            half_angle: (top / radius).acos(),
        })
    }

    pub fn start_angle(&self) -> f64 {
        FRAC_PI_2 + self.half_angle
    }

    pub fn end_angle(&self) -> f64 {
        FRAC_PI_2 - self.half_angle
    }

    pub fn arc_angle(&self) -> f64 {
        self.start_angle() - self.end_angle()
    }

    /// Chord length across the top of the band.
    pub fn available_width(&self) -> f64 {
        2.0 * self.radius * (self.arc_angle() / 2.0).sin()
    }

    /// Vertical offset of the text baseline, centred in the band.
    pub fn baseline_y(&self) -> f64 {
        self.radius - self.label_size / 2.0
    }

    pub fn mask(&self) -> LabelMask {
        LabelMask {
            radius: self.radius,
            start: Point::on_circle(self.radius, self.start_angle()),
            end: Point::on_circle(self.radius, self.end_angle()),
            large_arc: self.arc_angle() >= PI,
        }
    }
}

/// Closed shape of the label band, centred on the node origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelMask {
    pub radius: f64,
    pub start: Point,
    pub end: Point,
    pub large_arc: bool,
}

impl LabelMask {
    /// SVG path data: an anticlockwise arc from `start` to `end` through the
    /// bottom of the circle, closed by the chord.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M{},{}A{},{},0,{},0,{},{}Z",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            self.end.x,
            self.end.y
        )
    }
}
