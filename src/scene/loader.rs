use crate::core::math::transform::TransformFactory;
use crate::io::config::{CameraConfig, Config, LightConfig};
use crate::io::error::Result;
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::PointLight;
use crate::scene::mesh::Mesh;
use crate::scene::utils::normalize_and_center_mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};

/// Builds the point light from config.
pub fn build_light(config: &LightConfig) -> PointLight {
    match &config.orbit {
        Some(orbit) => PointLight::orbiting(
            Point3::from(orbit.target),
            orbit.azimuth,
            orbit.elevation,
            orbit.distance,
        ),
        None => PointLight::new(Point3::from(config.position)),
    }
}

/// Builds the camera. `scene_radius` sizes the "fit" projection.
pub fn build_camera(config: &CameraConfig, aspect_ratio: f32, scene_radius: f32) -> Camera {
    let position = Point3::from(config.position);
    let target = Point3::from(config.target);
    let up = Vector3::from(config.up);

    match config.projection.as_str() {
        "orthographic" => Camera::new_orthographic(
            position,
            target,
            up,
            config.ortho_height,
            aspect_ratio,
            config.near,
            config.far,
        ),
        "fit" => Camera::fit_radius(position, target, up, scene_radius, aspect_ratio),
        _ => Camera::new_perspective(
            position,
            target,
            up,
            config.fov.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        ),
    }
}

/// Loads the model and assembles everything a frame needs.
///
/// A model that fails to load is replaced by the built-in cube so a frame can
/// still be produced; an invalid plane is an error.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    let color = Vector3::from(config.model.color);
    let mut model = match &config.model.path {
        Some(path) => load_obj(path, color).unwrap_or_else(|e| {
            warn!("{}. Using the built-in cube instead.", e);
            Mesh::create_cube(Point3::origin(), 0.5, color)
        }),
        None => Mesh::create_cube(Point3::origin(), 0.5, color),
    };

    let levels = config.model.subdivisions;
    if levels > 0 {
        info!("Subdividing {} times.", levels);
        model = model.subdivide_loop(levels);
    }

    if let Some(size) = config.model.normalize {
        let (center, scale) = normalize_and_center_mesh(&mut model, size);
        info!("Model normalized. Center: {:?}, Scale: {:.4}", center, scale);
    }

    // The shaders take object space as world space, so the model transform
    // is baked into the vertices once here.
    let model_transform = TransformFactory::model(
        &Vector3::from(config.model.position),
        &Vector3::from(config.model.rotation),
        &Vector3::from(config.model.scale),
    );
    model.transform(&model_transform);

    let plane = config.plane.shadow_plane()?;
    let ground = config.plane.ground.then(|| {
        Mesh::create_ground(
            &plane,
            config.plane.ground_extent,
            config.plane.ground_offset,
            Vector3::from(config.plane.ground_color),
        )
    });

    let aspect_ratio = config.render.aspect_ratio();
    let scene_radius = model.bounding_radius().max(1e-3);
    let camera = build_camera(&config.camera, aspect_ratio, scene_radius);
    let light = build_light(&config.light);

    info!(
        "Scene ready: {} triangles, light at {:?}, eye at {:?}",
        model.triangle_count(),
        light.position,
        camera.position
    );

    Ok(RenderContext {
        camera,
        light,
        phong: config.shading.phong_params(),
        plane,
        shadow_color: Vector3::from(config.plane.shadow_color),
        model,
        ground,
    })
}
