use crate::core::color::{apply_gamma, to_rgb8};
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::CullMode;
use crate::io::config::RenderConfig;
use crate::pipeline::mode::RenderMode;
use crate::pipeline::renderer::{DrawStats, Renderer};
use crate::pipeline::shaders::phong::{LightUniforms, PhongShader};
use crate::pipeline::shaders::shadow::PlanarShadowShader;
use crate::scene::context::RenderContext;
use crate::scene::mesh::Mesh;
use log::debug;
use nalgebra::{Matrix4, Vector3};
use rayon::prelude::*;

/// The draw calls of one frame, in submission order.
///
/// Ground and model are lit with Phong; then the model is flattened onto the
/// plane. The ground sits slightly behind the plane, so the shadow wins the
/// depth test against it.
pub fn build_draw_list(context: &RenderContext, shadows: bool) -> Vec<(&Mesh, RenderMode)> {
    let mvp = context.camera.mvp(&Matrix4::identity());
    let uniforms = LightUniforms {
        light: context.light.position,
        eye: context.camera.position,
    };

    let shade = RenderMode::from(PhongShader::new(mvp, uniforms, context.phong));
    let mut draws = Vec::with_capacity(3);
    if let Some(ground) = &context.ground {
        draws.push((ground, shade.clone()));
    }
    draws.push((&context.model, shade));
    if shadows {
        draws.push((
            &context.model,
            RenderMode::from(PlanarShadowShader::new(
                mvp,
                context.light.position,
                context.plane,
                context.shadow_color,
            )),
        ));
    }
    draws
}

/// Clears the target and draws the whole frame.
pub fn render_frame(
    config: &RenderConfig,
    context: &RenderContext,
    renderer: &mut Renderer,
) -> DrawStats {
    renderer.clear(Vector3::from(config.background_color));
    renderer.rasterizer.wireframe = config.wireframe;

    let shade_cull = CullMode::from_name(&config.cull_mode);
    let mut total = DrawStats::default();
    for (mesh, mode) in build_draw_list(context, config.shadows) {
        // The flattened shadow is a mix of both windings, so it is never culled.
        renderer.rasterizer.cull_mode = match mode {
            RenderMode::Shade(_) => shade_cull,
            RenderMode::ShadowProject(_) => CullMode::None,
        };

        let stats = renderer.draw(mesh, &mode);
        debug!(
            "{} pass ({} triangles): {:?}",
            mode.name(),
            mesh.triangle_count(),
            stats
        );
        total += stats;
    }
    total
}

/// Output stage: resolves samples, applies gamma, clamps and packs 0RGB u32s.
pub fn post_process_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32], gamma: f32) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = match framebuffer.get_pixel(x, y) {
                    Some(color) => {
                        let [r, g, b] = to_rgb8(apply_gamma(color, gamma));
                        (255 << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
                    }
                    None => 0,
                };
            }
        });
}
