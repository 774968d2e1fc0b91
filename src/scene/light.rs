use nalgebra::{Point3, Vector3};

/// The single point light of the scene.
///
/// Both draw modes read the same position: the shading path as its `light`
/// uniform, the shadow path as the projection centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
}

impl PointLight {
    pub fn new(position: Point3<f32>) -> Self {
        Self { position }
    }

    /// Places the light on a sphere around `target`.
    ///
    /// Azimuth turns about +Y starting from +Z; elevation tilts up from the
    /// XZ plane. Both are in degrees.
    pub fn orbiting(target: Point3<f32>, azimuth_deg: f32, elevation_deg: f32, distance: f32) -> Self {
        let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();
        let (sin_el, cos_el) = elevation_deg.to_radians().sin_cos();
        let dir = Vector3::new(sin_az * cos_el, sin_el, cos_az * cos_el);
        Self::new(target + dir * distance)
    }
}
