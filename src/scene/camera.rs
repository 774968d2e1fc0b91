use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    /// `height` is the full height of the view volume.
    Orthographic { height: f32, aspect_ratio: f32 },
}

/// Manages the view and projection matrices. Its position is the `eye`
/// uniform of the shading path.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub near: f32,
    pub far: f32,
    pub projection_type: ProjectionType,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        projection_type: ProjectionType,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            near,
            far,
            projection_type,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let projection = ProjectionType::Perspective {
            fov_y_rad,
            aspect_ratio,
        };
        Self::new(position, target, up, projection, near, far)
    }

    pub fn new_orthographic(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        height: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let projection = ProjectionType::Orthographic {
            height,
            aspect_ratio,
        };
        Self::new(position, target, up, projection, near, far)
    }

    /// An orthographic camera whose view volume just holds a sphere of
    /// `radius` around `target` along the shorter screen axis.
    pub fn fit_radius(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        radius: f32,
        aspect_ratio: f32,
    ) -> Self {
        let height = if aspect_ratio >= 1.0 {
            2.0 * radius
        } else {
            2.0 * radius / aspect_ratio
        };
        let distance = (position - target).norm();
        let near = (distance - radius).max(1e-3);
        let far = distance + radius;
        Self::new_orthographic(position, target, up, height, aspect_ratio, near, far)
    }

    /// Recalculates view and projection matrices from the current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;
                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// Projection * view * model.
    pub fn mvp(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix * model
    }
}
