use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::shaders::shadow::PlanarShadowShader;

/// The shader configuration of one draw call.
///
/// Normal shading and shadow projection never run in the same draw; the host
/// picks one per call and the renderer dispatches on it.
#[derive(Debug, Clone)]
pub enum RenderMode {
    /// Per-fragment Phong lighting of the surface itself.
    Shade(PhongShader),
    /// Projection of the surface onto the shadow plane, drawn flat.
    ShadowProject(PlanarShadowShader),
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Shade(_) => "shade",
            RenderMode::ShadowProject(_) => "shadow",
        }
    }
}

impl From<PhongShader> for RenderMode {
    fn from(shader: PhongShader) -> Self {
        RenderMode::Shade(shader)
    }
}

impl From<PlanarShadowShader> for RenderMode {
    fn from(shader: PlanarShadowShader) -> Self {
        RenderMode::ShadowProject(shader)
    }
}
