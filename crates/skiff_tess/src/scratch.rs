//! Scratch buffer manager
//!
//! A drawing context generates a lot of transient vertex data per call.
//! `ScratchBuffer` is the single growable float array reused across calls:
//! it grows by power-of-two doubling, is reset (capacity retained) between
//! frames, and never shrinks mid-frame. Growth failure is the one hard
//! error in the engine and fails only the call that needed the space.

use skiff_core::{Error, Point, Result};

/// Reusable growable `f32` buffer for interleaved vertex data.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    data: Vec<f32>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(floats: usize) -> Self {
        Self {
            data: Vec::with_capacity(floats),
        }
    }

    /// Logically truncate, keeping the backing allocation.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Ensure room for `additional` more floats, growing to the next power
    /// of two when needed.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self.data.len() + additional;
        if needed <= self.data.capacity() {
            return Ok(());
        }
        let target = needed.next_power_of_two().max(64);
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| Error::ScratchExhausted { needed })
    }

    #[inline]
    pub fn push(&mut self, v: f32) -> Result<()> {
        self.reserve(1)?;
        self.data.push(v);
        Ok(())
    }

    #[inline]
    pub fn push_point(&mut self, p: Point) -> Result<()> {
        self.reserve(2)?;
        self.data.push(p.x);
        self.data.push(p.y);
        Ok(())
    }

    pub fn extend_points(&mut self, points: &[Point]) -> Result<()> {
        self.reserve(points.len() * 2)?;
        for p in points {
            self.data.push(p.x);
            self.data.push(p.y);
        }
        Ok(())
    }

    pub fn extend(&mut self, values: &[f32]) -> Result<()> {
        self.reserve(values.len())?;
        self.data.extend_from_slice(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_capacity() {
        let mut buf = ScratchBuffer::new();
        buf.extend_points(&[Point::new(1.0, 2.0); 100]).unwrap();
        let cap = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn grows_in_powers_of_two() {
        let mut buf = ScratchBuffer::new();
        buf.push(1.0).unwrap();
        assert_eq!(buf.capacity(), 64);
        buf.extend(&[0.0; 70]).unwrap();
        assert_eq!(buf.capacity(), 128);
    }

    #[test]
    fn points_interleave() {
        let mut buf = ScratchBuffer::new();
        buf.push_point(Point::new(3.0, 4.0)).unwrap();
        buf.push_point(Point::new(5.0, 6.0)).unwrap();
        assert_eq!(buf.as_slice(), &[3.0, 4.0, 5.0, 6.0]);
    }
}
