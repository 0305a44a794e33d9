//! Pen and brush state
//!
//! Pens and brushes are plain value types owned by the drawing context.
//! A pen whose style is `NotSet` and a brush whose style is `Transparent`
//! are the two "nothing to draw" signals: the context skips the
//! corresponding geometry generation instead of raising an error.

use crate::color::Color;

/// Line end cap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Pen line style
///
/// The named dash styles are stipple presets; on backends without native
/// stippling they resolve to the two-element dash patterns returned by
/// [`PenStyle::dash_pattern`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PenStyle {
    /// Sentinel: no pen has been set. Stroking is skipped.
    NotSet,
    #[default]
    Solid,
    Dot,
    LongDash,
    ShortDash,
    DotDash,
    /// Explicit (draw, space) pattern in pen-width multiples.
    Dash(f32, f32),
    /// Stroking is skipped, same as `NotSet`.
    Transparent,
}

impl PenStyle {
    /// Resolved (draw, space) dash pattern in pen-width multiples, or
    /// `None` for solid rendering. Degenerate custom patterns (either
    /// element ≤ 0) fall back to solid.
    pub fn dash_pattern(&self) -> Option<[f32; 2]> {
        match *self {
            PenStyle::Dot => Some([1.0, 2.0]),
            PenStyle::LongDash => Some([6.0, 3.0]),
            PenStyle::ShortDash => Some([3.0, 3.0]),
            PenStyle::DotDash => Some([4.0, 4.0]),
            PenStyle::Dash(draw, space) => {
                if draw > 0.0 && space > 0.0 {
                    Some([draw, space])
                } else {
                    None
                }
            }
            PenStyle::NotSet | PenStyle::Solid | PenStyle::Transparent => None,
        }
    }
}

/// Stroking pen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    /// Width in device units; 0 means hairline (narrowest native line).
    pub width: f32,
    pub style: PenStyle,
    pub cap: LineCap,
}

impl Pen {
    pub const fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: PenStyle::Solid,
            cap: LineCap::Butt,
        }
    }

    /// The not-set sentinel.
    pub const fn none() -> Self {
        Self {
            color: Color::TRANSPARENT,
            width: 0.0,
            style: PenStyle::NotSet,
            cap: LineCap::Butt,
        }
    }

    pub fn with_style(mut self, style: PenStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Whether this pen produces any stroke at all.
    pub fn is_ok(&self) -> bool {
        !matches!(self.style, PenStyle::NotSet | PenStyle::Transparent)
    }

    /// Dash pattern scaled to device units (pattern × pen width).
    pub fn scaled_dashes(&self) -> Option<[f32; 2]> {
        let w = if self.width > 0.0 { self.width } else { 1.0 };
        self.style
            .dash_pattern()
            .map(|[draw, space]| [draw * w, space * w])
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen::none()
    }
}

/// Brush fill style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrushStyle {
    #[default]
    Solid,
    /// Filling is skipped entirely; no tessellation work is performed.
    Transparent,
    /// Fill with the drawing context's bound pattern texture when one is
    /// set; behaves as solid otherwise.
    Pattern,
}

/// Filling brush
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    pub color: Color,
    pub style: BrushStyle,
}

impl Brush {
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            style: BrushStyle::Solid,
        }
    }

    pub const fn transparent() -> Self {
        Self {
            color: Color::TRANSPARENT,
            style: BrushStyle::Transparent,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.style != BrushStyle::Transparent
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::transparent()
    }
}
