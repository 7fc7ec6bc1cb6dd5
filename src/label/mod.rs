mod fit;
mod geometry;

use serde::{Deserialize, Serialize};

pub use fit::{
    ELLIPSIS, FittedLabel, FixedAdvanceMeasurer, TextBox, TextMeasurer, UNSCALED, fit_label,
};
pub use geometry::{LabelGeometry, LabelMask, Point};

/// One circle as returned by the external packing layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutNode {
    pub radius: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub depth: usize,
    pub height: usize,
    #[serde(default)]
    pub label_size: f64,
    #[serde(default)]
    pub field_value: String,
}

/// Font size basis, in percent, derived from the radius of the leaf circles.
pub fn base_font_scale(leaf_radius: f64) -> f64 {
    ((2.0 * leaf_radius) / 16.0) * 100.0
}

/// Initial font size of a node's label; taller subtrees get larger text.
pub fn initial_font_scale(height: usize, base_font_scale: f64) -> f64 {
    3.0 * height as f64 * base_font_scale
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLabel {
    pub mask: LabelMask,
    pub mask_path: String,
    pub available_width: f64,
    pub baseline_y: f64,
    #[serde(flatten)]
    pub fitted: FittedLabel,
}

/// Mask and fitted text for `node`, or `None` when it has no usable band.
pub fn render_label<M: TextMeasurer + ?Sized>(
    node: &LaidOutNode,
    base_font_scale: f64,
    measurer: &M,
) -> Option<RenderedLabel> {
    let geometry = LabelGeometry::new(node.radius, node.label_size)?;
    let mask = geometry.mask();
    let fitted = fit_label(
        &node.field_value,
        &geometry,
        initial_font_scale(node.height, base_font_scale),
        measurer,
    );

    Some(RenderedLabel {
        mask_path: mask.to_svg_path(),
        mask,
        available_width: geometry.available_width(),
        baseline_y: geometry.baseline_y(),
        fitted,
    })
}
