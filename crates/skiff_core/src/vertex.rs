//! POD vertex types and primitive topologies
//!
//! These are the tuples a vertex batch carries. Layouts are `#[repr(C)]`
//! and `bytemuck`-castable so queues can upload them without copying.

use bytemuck::{Pod, Zeroable};

/// Primitive topology of a vertex batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    LineList,
    LineStrip,
    LineLoop,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

/// Position + color vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Position + texture coordinate vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layouts_are_tight() {
        assert_eq!(std::mem::size_of::<ColorVertex>(), 24);
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 16);
    }
}
