//! Skiff text rendering
//!
//! Text is measured and rasterized by an external [`FontService`]; this
//! crate turns the service's output into a single textured quad per draw
//! call. Two code paths:
//!
//! 1. **Glyph-run path** — the service has pre-rendered the run into a
//!    texture; the quad references it directly and is tinted with the
//!    text foreground color.
//! 2. **Software path** — the run is rasterized once to an alpha mask,
//!    expanded to RGBA with the foreground color, packed into a
//!    power-of-two texture, and drawn with fractional UVs. The texture is
//!    transient and released after the draw.
//!
//! Glyph shaping and font parsing stay behind the service boundary.

mod pow2;
mod renderer;

pub use pow2::next_pow2;
pub use renderer::{PreparedText, TextRenderer};
