use crate::core::color::ShadedColor;
use crate::core::geometry::Vertex;
use crate::core::math::transform::to_clip;
use crate::core::pipeline::{Interpolatable, Shader, VertexOutput};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use std::ops::{Add, Mul};

/// An infinite plane that receives shadows: the `plane` and `normal`
/// uniforms of the shadow path.
///
/// `normal` is the plane's normal, unrelated to any surface normal of the
/// shaded geometry. It should be unit length: with a scaled normal the
/// inside/outside decision is still right, but the projected point is not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPlane {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl ShadowPlane {
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { point, normal }
    }

    /// The plane through three points, with unit normal `(p1 - p2) x (p2 - p3)`.
    ///
    /// Returns `None` if the points are collinear.
    pub fn from_points(p1: Point3<f32>, p2: Point3<f32>, p3: Point3<f32>) -> Option<Self> {
        let normal = (p1 - p2).cross(&(p2 - p3));
        let len = normal.norm();
        (len > f32::EPSILON).then(|| Self::new(p1, normal / len))
    }

    /// Signed distance of `p` along the normal.
    #[inline]
    pub fn signed_distance(&self, p: &Point3<f32>) -> f32 {
        (p - self.point).dot(&self.normal)
    }
}

/// Result of projecting one vertex onto the shadow plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectedPosition {
    /// The vertex casts a shadow at `point` (on the plane); `clip` is that
    /// point after projection * model-view.
    OnPlane {
        point: Point3<f32>,
        clip: Vector4<f32>,
    },
    /// The vertex casts no shadow and must not be rasterized.
    Degenerate,
}

impl ProjectedPosition {
    /// Homogeneous position as a fixed-function rasterizer expects it. A
    /// degenerate vertex collapses to (0, 0, 0, 1).
    pub fn clip(&self) -> Vector4<f32> {
        match self {
            ProjectedPosition::OnPlane { clip, .. } => *clip,
            ProjectedPosition::Degenerate => Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, ProjectedPosition::Degenerate)
    }
}

/// Projects `q` onto `plane` along the ray from the point light through `q`.
///
/// With `L_P = (L - P)·n` and `Q_P = (Q - P)·n` the vertex casts a shadow only
/// when `L_P > 0` and `0 < Q_P < L_P`: the light is strictly above the plane
/// and the vertex strictly between the plane and the light's height. Both
/// bounds are exclusive. Anything else returns `None`, which is an ordinary
/// outcome, not an error.
///
/// Inside that range `L_Q = (L - Q)·n = L_P - Q_P` is positive, and the shadow
/// is `L + (L_P / L_Q)(Q - L)`.
pub fn project_onto_plane(
    q: &Point3<f32>,
    light: &Point3<f32>,
    plane: &ShadowPlane,
) -> Option<Point3<f32>> {
    let l_p = plane.signed_distance(light);
    let q_p = plane.signed_distance(q);
    if !(l_p > 0.0 && q_p > 0.0 && q_p < l_p) {
        return None;
    }

    // Only reached when L_Q > 0.
    let l_q = (light - q).dot(&plane.normal);
    Some(light + (q - light) * (l_p / l_q))
}

/// The shadow path has nothing to interpolate: the shadow is drawn flat.
#[derive(Clone, Copy, Debug)]
pub struct ShadowVarying;

impl Add for ShadowVarying {
    type Output = Self;
    fn add(self, _other: Self) -> Self {
        Self
    }
}

impl Mul<f32> for ShadowVarying {
    type Output = Self;
    fn mul(self, _scalar: f32) -> Self {
        Self
    }
}

impl Interpolatable for ShadowVarying {}

/// The shadow-projection path: flattens geometry onto a plane as seen from
/// the light and fills it with a constant colour.
#[derive(Debug, Clone)]
pub struct PlanarShadowShader {
    /// Combined projection * model-view.
    pub mvp: Matrix4<f32>,
    pub light: Point3<f32>,
    pub plane: ShadowPlane,
    pub shadow_color: Vector3<f32>,
}

impl PlanarShadowShader {
    pub fn new(
        mvp: Matrix4<f32>,
        light: Point3<f32>,
        plane: ShadowPlane,
        shadow_color: Vector3<f32>,
    ) -> Self {
        Self {
            mvp,
            light,
            plane,
            shadow_color,
        }
    }

    /// Projects a single vertex position.
    pub fn project(&self, q: &Point3<f32>) -> ProjectedPosition {
        match project_onto_plane(q, &self.light, &self.plane) {
            Some(point) => ProjectedPosition::OnPlane {
                point,
                clip: to_clip(&self.mvp, &point),
            },
            None => ProjectedPosition::Degenerate,
        }
    }
}

impl Shader for PlanarShadowShader {
    type Varying = ShadowVarying;

    fn vertex(&self, vertex: &Vertex) -> Option<VertexOutput<ShadowVarying>> {
        match self.project(&vertex.position) {
            ProjectedPosition::OnPlane { clip, .. } => Some(VertexOutput {
                clip,
                varying: ShadowVarying,
            }),
            ProjectedPosition::Degenerate => None,
        }
    }

    fn fragment(&self, _varying: ShadowVarying) -> ShadedColor {
        ShadedColor::opaque(self.shadow_color)
    }
}
