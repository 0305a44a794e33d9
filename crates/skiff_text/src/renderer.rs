//! Text preparation and measurement.

use skiff_core::{Color, FontId, FontService, PixelFormat, Size, TextureHandle, TextureService};

use crate::pow2::next_pow2;

/// Measurement results above these are treated as garbage and clamped.
const MAX_TEXT_WIDTH: f32 = 2000.0;
const MAX_TEXT_HEIGHT: f32 = 500.0;

/// A text run ready to draw as one textured quad.
#[derive(Clone, Copy, Debug)]
pub struct PreparedText {
    pub texture: TextureHandle,
    /// Quad extent in device units.
    pub size: Size,
    /// UV bounds within the texture: `[u0, v0, u1, v1]`.
    pub uv: [f32; 4],
    /// Whether the texture was uploaded for this call and should be
    /// released after the quad is submitted.
    pub transient: bool,
}

/// Stateless text renderer front-end.
///
/// Owns no caches; glyph and texture lifetimes belong to the services.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute 100×100 for empty extents and clamp oversized ones.
    /// Measurement services occasionally report uninitialized garbage;
    /// the clamps keep it off the screen.
    pub fn sanitize(size: Size) -> Size {
        let w = if size.width > 0.0 { size.width } else { 100.0 };
        let h = if size.height > 0.0 { size.height } else { 100.0 };
        Size::new(w.min(MAX_TEXT_WIDTH), h.min(MAX_TEXT_HEIGHT))
    }

    /// Measure `text` through the service, sanitized.
    pub fn measure(&self, font: &mut dyn FontService, id: FontId, text: &str) -> Size {
        Self::sanitize(font.measure(text, id))
    }

    /// Resolve `text` into a drawable quad, preferring the glyph-run path
    /// and falling back to software rasterization when a texture service
    /// is available. Returns `None` when there is nothing to draw.
    pub fn prepare(
        &self,
        font: &mut dyn FontService,
        textures: Option<&mut (dyn TextureService + '_)>,
        id: FontId,
        text: &str,
        foreground: Color,
    ) -> Option<PreparedText> {
        if text.is_empty() {
            return None;
        }

        if let Some(run) = font.glyph_run(text, id) {
            if run.size.is_empty() {
                return None;
            }
            return Some(PreparedText {
                texture: run.texture,
                size: run.size,
                uv: run.uv,
                transient: false,
            });
        }

        let textures = textures?;
        let mask = font.rasterize(text, id);
        if mask.is_empty() {
            return None;
        }
        let (w, h) = (mask.width, mask.height);
        let pot_w = next_pow2(w);
        let pot_h = next_pow2(h);

        // Expand the coverage mask to RGBA in the foreground color inside
        // a power-of-two canvas; the quad samples only the used corner.
        let [r, g, b, _] = foreground.to_rgba8();
        let mut data = vec![0u8; (pot_w * pot_h * 4) as usize];
        for row in 0..h {
            for col in 0..w {
                let src = (row * w + col) as usize;
                let dst = ((row * pot_w + col) * 4) as usize;
                data[dst] = r;
                data[dst + 1] = g;
                data[dst + 2] = b;
                data[dst + 3] = *mask.pixels.get(src).unwrap_or(&0);
            }
        }

        let texture = textures.upload(&data, pot_w, pot_h, PixelFormat::Rgba8);
        Some(PreparedText {
            texture,
            size: Size::new(w as f32, h as f32),
            uv: [0.0, 0.0, w as f32 / pot_w as f32, h as f32 / pot_h as f32],
            transient: true,
        })
    }
}
