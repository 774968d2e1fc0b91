use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Calculates the barycentric coordinates (alpha, beta, gamma) of point p
/// with respect to triangle (v1, v2, v3).
///
/// Returns `None` if the triangle is degenerate (area is near zero).
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    // Twice the signed area of the triangle
    let area_x2 = e1.x * e2.y - e1.y * e2.x;
    if area_x2.abs() < EPSILON {
        return None;
    }
    let inv_area_x2 = 1.0 / area_x2;

    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_area_x2;

    Some(Vector3::new(1.0 - beta - gamma, beta, gamma))
}

/// Returns true if alpha, beta and gamma are all (nearly) non-negative.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Compute perspective-correct barycentric coordinates from screen-space ones
/// and the clip-space w of each corner.
///
/// Returns `None` when numerical instability is detected (sum near zero).
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    let inv_w = |w: f32| if w.abs() > EPSILON { 1.0 / w } else { 1.0 };

    let weighted = Vector3::new(bary.x * inv_w(w1), bary.y * inv_w(w2), bary.z * inv_w(w3));
    let sum = weighted.x + weighted.y + weighted.z;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(weighted / sum)
}

/// Linearly combines three per-vertex values with barycentric weights:
/// `w.x * a + w.y * b + w.z * c`.
///
/// This is the whole interpolation law of the attribute stage; it never
/// normalizes or otherwise post-processes the result.
#[inline]
pub fn interpolate<T: Interpolatable>(values: &[T; 3], weights: Vector3<f32>) -> T {
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}
