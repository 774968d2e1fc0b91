use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, interpolate, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::Shader;
use log::warn;
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scan-converts clipped triangles into a [`FrameBuffer`], invoking the
/// fragment stage of a [`Shader`] for every covered sample that passes the
/// depth test.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
    pub wireframe: bool,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl CullMode {
    /// Parses "back", "front" or "none". Anything else is reported and
    /// falls back to `None`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "back" => CullMode::Back,
            "front" => CullMode::Front,
            "none" => CullMode::None,
            _ => {
                warn!("Unknown cull mode '{}'; culling is disabled.", name);
                CullMode::None
            }
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

// Clip planes in homogeneous space as (axis, sign): sign * p[axis] <= p.w
const CLIP_PLANES: [(usize, f32); 6] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

const WIREFRAME_THRESHOLD: f32 = 0.02;

type ClipVertex<V> = (Vector4<f32>, V);

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::None,
            wireframe: false,
        }
    }

    /// Rasterizes a triangle given in clip space. Returns the number of
    /// fragments that were shaded.
    ///
    /// The triangle is first clipped against the view volume with
    /// Sutherland–Hodgman; the resulting convex polygon is drawn as a fan.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) -> usize {
        // A clipped triangle has at most 9 vertices; reserve once and swap.
        let mut current: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut scratch: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        current.extend(clip_coords.iter().copied().zip(varyings.iter().copied()));

        for &(axis, sign) in &CLIP_PLANES {
            if current.is_empty() {
                return 0;
            }
            clip_polygon_against_plane(&current, &mut scratch, axis, sign);
            std::mem::swap(&mut current, &mut scratch);
        }

        if current.len() < 3 {
            return 0;
        }

        let v0 = current[0];
        current
            .windows(2)
            .skip(1)
            .map(|pair| {
                self.rasterize_clipped(
                    framebuffer,
                    shader,
                    &[v0.0, pair[0].0, pair[1].0],
                    &[v0.1, pair[0].1, pair[1].1],
                )
            })
            .sum()
    }

    /// Draws a triangle that lies entirely inside the view volume.
    fn rasterize_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) -> usize {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        let mut screen = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];
        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return 0;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            w_values[i] = clip_coords[i].w;
            screen[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
        }

        // Screen Y points down, so counter-clockwise triangles have negative area.
        let edge1 = screen[1] - screen[0];
        let edge2 = screen[2] - screen[1];
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return 0,
            CullMode::Front if signed_area <= 0.0 => return 0,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return 0;
        }
        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.buffer_width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.buffer_height as i32 - 1) as usize;

        let shaded = AtomicUsize::new(0);

        // Row workloads vary a lot, so let rayon's work stealing balance them.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            let mut row_shaded = 0;
            for x in start_x..=end_x {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bary) = barycentric_coordinates(center, screen[0], screen[1], screen[2])
                else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }
                if self.wireframe
                    && bary.x > WIREFRAME_THRESHOLD
                    && bary.y > WIREFRAME_THRESHOLD
                    && bary.z > WIREFRAME_THRESHOLD
                {
                    continue;
                }

                let Some(weights) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };

                // NDC depth is affine in screen space, so it takes the uncorrected weights.
                let z_ndc = bary.x * clip_coords[0].z / w_values[0]
                    + bary.y * clip_coords[1].z / w_values[1]
                    + bary.z * clip_coords[2].z / w_values[2];
                let depth = z_ndc * 0.5 + 0.5;

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let varying = interpolate(varyings, weights);
                    let color = shader.fragment(varying);
                    framebuffer.set_sample(x, y, color.rgb);
                    row_shaded += 1;
                }
            }
            shaded.fetch_add(row_shaded, Ordering::Relaxed);
        });

        shaded.into_inner()
    }
}

/// Clips a polygon against one homogeneous plane, writing into `output`
/// (cleared first).
fn clip_polygon_against_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
    input: &[ClipVertex<V>],
    output: &mut Vec<ClipVertex<V>>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    let Some(&last) = input.last() else {
        return;
    };

    let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;

    let mut prev = last;
    let mut prev_inside = is_inside(&prev.0);
    for &curr in input {
        let curr_inside = is_inside(&curr.0);
        if curr_inside != prev_inside {
            if let Some(inter) = intersect_edge_plane(prev, curr, axis, sign) {
                output.push(inter);
            }
        }
        if curr_inside {
            output.push(curr);
        }
        prev = curr;
        prev_inside = curr_inside;
    }
}

/// Intersection of edge a-b with the plane `sign * p[axis] = p.w`, with the
/// varying interpolated at the same parameter.
#[inline(always)]
fn intersect_edge_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
    a: ClipVertex<V>,
    b: ClipVertex<V>,
    axis: usize,
    sign: f32,
) -> Option<ClipVertex<V>> {
    let denom = sign * (b.0[axis] - a.0[axis]) - (b.0.w - a.0.w);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (a.0.w - sign * a.0[axis]) / denom;
    if !t.is_finite() {
        return None;
    }

    Some((a.0 + (b.0 - a.0) * t, a.1 * (1.0 - t) + b.1 * t))
}

fn bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
