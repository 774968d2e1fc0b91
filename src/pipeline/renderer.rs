use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::mode::RenderMode;
use crate::scene::mesh::Mesh;
use log::trace;
use nalgebra::Vector3;
use std::ops::AddAssign;

/// Per-draw counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles submitted.
    pub triangles: usize,
    /// Triangles dropped because a vertex stage rejected one of their vertices.
    pub culled: usize,
    /// Fragments that passed the depth test and were shaded.
    pub fragments: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.triangles += other.triangles;
        self.culled += other.culled;
        self.fragments += other.fragments;
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// `sample_count` is the SSAA factor per axis: 1 for no AA, 2 for 2x2, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color, f32::INFINITY);
    }

    /// Draws a mesh with the shader selected by `mode`.
    pub fn draw(&mut self, mesh: &Mesh, mode: &RenderMode) -> DrawStats {
        let stats = match mode {
            RenderMode::Shade(shader) => self.draw_mesh(mesh, shader),
            RenderMode::ShadowProject(shader) => self.draw_mesh(mesh, shader),
        };
        trace!("{} draw: {:?}", mode.name(), stats);
        stats
    }

    /// Runs the vertex stage on every triangle of `mesh` and rasterizes the
    /// ones whose three vertices were all accepted.
    pub fn draw_mesh<S: Shader>(&mut self, mesh: &Mesh, shader: &S) -> DrawStats {
        let mut stats = DrawStats::default();

        for tri in mesh.triangles() {
            stats.triangles += 1;

            let outputs = [
                shader.vertex(tri[0]),
                shader.vertex(tri[1]),
                shader.vertex(tri[2]),
            ];
            let [Some(a), Some(b), Some(c)] = outputs else {
                stats.culled += 1;
                continue;
            };

            stats.fragments += self.rasterizer.rasterize_triangle(
                &self.framebuffer,
                shader,
                &[a.clip, b.clip, c.clip],
                &[a.varying, b.varying, c.varying],
            );
        }

        stats
    }
}
