use serde::Serialize;

use super::geometry::LabelGeometry;

pub const ELLIPSIS: &str = "...";

/// Share of the band's width and height text may occupy.
const FILL_RATIO: f64 = 0.8;
const MIN_FONT_SCALE: f64 = 10.0;
const MAX_FONT_SCALE: f64 = 75.0;
/// Font scale of a label left at its initial size.
pub const UNSCALED: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

/// Measures the bounding box of `text` rendered at `font_size_percent`.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size_percent: f64) -> TextBox;
}

/// Headless measurer: every character advances by the same width, and both
/// dimensions scale linearly with the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character at 100%.
    pub advance: f64,
    /// Line height at 100%.
    pub line_height: f64,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self {
            advance: 9.6,
            line_height: 16.0,
        }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size_percent: f64) -> TextBox {
        let scale = font_size_percent / 100.0;
        TextBox {
            width: text.chars().count() as f64 * self.advance * scale,
            height: if text.is_empty() {
                0.0
            } else {
                self.line_height * scale
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedLabel {
    pub text: String,
    /// 100 when the label kept its initial size, otherwise the shrunken scale.
    pub font_scale: f64,
    /// Font size actually applied, in percent.
    pub font_size_percent: f64,
    pub truncated: bool,
}

/// Shrinks and trims `text` to fit the label band.
///
/// Text taller than the height budget is shrunk once, by the smaller of its
/// height and width overshoot, clamped to 10..=75. Text still wider than
/// the width budget is cut to a prefix plus [`ELLIPSIS`]. Height is not
/// re-checked after trimming.
pub fn fit_label<M: TextMeasurer + ?Sized>(
    text: &str,
    geometry: &LabelGeometry,
    initial_font_scale: f64,
    measurer: &M,
) -> FittedLabel {
    let max_width = FILL_RATIO * geometry.available_width();
    let max_height = FILL_RATIO * geometry.label_size;

    let mut font_scale = UNSCALED;
    let mut font_size_percent = initial_font_scale;
    let mut bounds = measurer.measure(text, font_size_percent);

    if bounds.height > max_height {
        let height_ratio = ((bounds.height - max_height) / max_height).abs();
        let width_ratio = ((bounds.width - max_width) / max_width).abs();
        font_scale = (height_ratio.min(width_ratio) * initial_font_scale)
            .clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
        font_size_percent = font_scale;
        bounds = measurer.measure(text, font_size_percent);
    }

    if bounds.width <= max_width {
        return FittedLabel {
            text: text.to_owned(),
            font_scale,
            font_size_percent,
            truncated: false,
        };
    }

    let length = text.chars().count() as f64;
    let keep = (((bounds.width - max_width) / max_width) * length).trunc() - 3.0;
    let mut trimmed = if keep > 0.0 {
        let prefix = text.chars().take(keep as usize).collect::<String>();
        format!("{prefix}{ELLIPSIS}")
    } else {
        ELLIPSIS.to_owned()
    };

    // The overshoot-based prefix can still be too wide for long overshoots.
    if trimmed != ELLIPSIS && measurer.measure(&trimmed, font_size_percent).width > max_width {
        trimmed = ELLIPSIS.to_owned();
    }

    FittedLabel {
        text: trimmed,
        font_scale,
        font_size_percent,
        truncated: true,
    }
}
