//! Skiff GPU capability tiers
//!
//! The drawing context never talks to a GPU directly; it talks to a
//! [`GpuTier`], of which there are three:
//!
//! - [`FixedFunctionTier`] — begin/vertex/end immediate submission against
//!   an [`ImmediateQueue`](skiff_core::ImmediateQueue)
//! - [`ProgrammableTier`] — whole-array batched submission against a
//!   [`ShaderQueue`](skiff_core::ShaderQueue), with an analytic
//!   filled-circle program
//! - [`EmulationTier`] — a last-resort tier over a
//!   [`BasicSurface`](skiff_core::BasicSurface) that approximates circles
//!   and rectangles natively and skips what it cannot express
//!
//! All three expose the same capability surface, so the dispatcher holds a
//! `Box<dyn GpuTier>` and never inspects which tier it got.

mod emulation;
mod fixed;
mod programmable;
mod tier;

pub use emulation::EmulationTier;
pub use fixed::FixedFunctionTier;
pub use programmable::ProgrammableTier;
pub use tier::GpuTier;
