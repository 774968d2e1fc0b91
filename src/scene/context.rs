use crate::pipeline::shaders::phong::PhongParams;
use crate::pipeline::shaders::shadow::ShadowPlane;
use crate::scene::camera::Camera;
use crate::scene::light::PointLight;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

/// Everything one frame needs. Read-only while a frame is being drawn.
pub struct RenderContext {
    pub camera: Camera,
    pub light: PointLight,
    pub phong: PhongParams,
    pub plane: ShadowPlane,
    pub shadow_color: Vector3<f32>,
    /// The shadow caster, already in world space.
    pub model: Mesh,
    /// The receiving surface, already in world space.
    pub ground: Option<Mesh>,
}
