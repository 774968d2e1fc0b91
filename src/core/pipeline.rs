use crate::core::color::ShadedColor;
use crate::core::geometry::Vertex;
use nalgebra::Vector4;
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

/// Output of the vertex stage for one vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexOutput<V> {
    /// Homogeneous clip-space position.
    pub clip: Vector4<f32>,
    /// Attributes handed to the rasterizer for interpolation.
    pub varying: V,
}

/// Shader represents the programmable stages of the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) because shading is invoked
/// concurrently across vertices and fragments. A shader holds its uniforms by
/// value and is only ever borrowed immutably during a draw, so uniform state
/// cannot change while invocations are in flight.
pub trait Shader: Send + Sync {
    /// Per-vertex varying data to be interpolated and provided to the fragment shader.
    type Varying: Interpolatable;

    /// Vertex shader stage.
    ///
    /// Returns `None` when the vertex must not be rasterized. Any primitive
    /// containing such a vertex is dropped by the renderer.
    fn vertex(&self, vertex: &Vertex) -> Option<VertexOutput<Self::Varying>>;

    /// Fragment shader stage.
    ///
    /// Computes the colour for the current fragment from the interpolated
    /// varying. The result is not clamped; that is the job of the output stage.
    fn fragment(&self, varying: Self::Varying) -> ShadedColor;
}
