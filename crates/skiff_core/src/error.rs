//! Error type
//!
//! Almost nothing in Skiff fails: empty input, transparent brushes and
//! unset pens are silent no-ops, and capability gaps take fallback paths.
//! The only hard failure is scratch-buffer exhaustion, which fails the
//! draw call that needed the space and leaves prior submissions intact.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The scratch buffer could not grow to hold the requested geometry.
    #[error("scratch buffer exhausted: could not reserve {needed} floats")]
    ScratchExhausted { needed: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
