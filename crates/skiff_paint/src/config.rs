//! Drawing context configuration.

use skiff_tess::StrokeConfig;

/// Tuning knobs for a [`PaintContext`](crate::PaintContext).
#[derive(Clone, Copy, Debug)]
pub struct PaintConfig {
    /// Extrusion engine settings (cap resolution, miter clamp, dash
    /// clamps).
    pub stroke: StrokeConfig,
    /// Corner radius of the rounded rectangle filled behind text when a
    /// non-transparent text background is set.
    pub text_background_radius: f32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            stroke: StrokeConfig::default(),
            // Small enough to read as a highlight, not a button.
            text_background_radius: 3.0,
        }
    }
}
