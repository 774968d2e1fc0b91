use crate::core::color::ShadedColor;
use crate::core::geometry::{Fragment, Vertex};
use crate::core::math::transform::to_clip;
use crate::core::pipeline::{Shader, VertexOutput};
use nalgebra::{Matrix4, Point3, Vector3};

/// Fixed lighting constants of the Phong model.
///
/// The defaults are the reference look: a slightly violet key light over a
/// greenish ambient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    /// Brightness of the highlight (scalar `s`).
    pub gloss: f32,
    /// Sharpness of the highlight (exponent `p`).
    pub shininess: f32,
    pub light_color: Vector3<f32>,
    pub ambient_color: Vector3<f32>,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            gloss: 0.5,
            shininess: 10.0,
            light_color: Vector3::new(0.75, 0.70, 0.80),
            ambient_color: Vector3::new(0.5, 0.6, 0.55),
        }
    }
}

/// Uniforms of the shading path: the `light` and `eye` positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniforms {
    pub light: Point3<f32>,
    pub eye: Point3<f32>,
}

/// Intermediate values of one Phong evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongTerms {
    pub diffuse_factor: f32,
    pub specular_factor: f32,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl PhongTerms {
    pub fn total(&self) -> Vector3<f32> {
        self.ambient + self.diffuse + self.specular
    }
}

/// Evaluates the lighting terms for one fragment.
///
/// * `r = -l + 2(l·n)n` is the mirror of `l` about `n`. It is left
///   unnormalized, as is the interpolated normal, so highlights on short or
///   long normals deviate from textbook Phong.
/// * The specular factor is gated by the diffuse factor: faces turned away
///   from the light get no highlight.
/// * The highlight takes the light colour only, not the material colour.
///
/// Zero-length `light - P` or `eye - P` yields NaN, which is propagated.
pub fn phong_terms(frag: &Fragment, uniforms: &LightUniforms, params: &PhongParams) -> PhongTerms {
    let n = frag.normal;
    let l = (uniforms.light - frag.position).normalize();
    let e = (uniforms.eye - frag.position).normalize();
    let l_dot_n = l.dot(&n);
    let r = -l + n * (2.0 * l_dot_n);

    let diffuse_factor = non_negative(l_dot_n);
    let specular_factor = diffuse_factor * non_negative(e.dot(&r)).powf(params.shininess);

    let c = frag.material_color;
    PhongTerms {
        diffuse_factor,
        specular_factor,
        ambient: params.ambient_color.component_mul(&c),
        diffuse: params.light_color.component_mul(&c) * diffuse_factor,
        specular: params.light_color * (params.gloss * specular_factor),
    }
}

// f32::max would swallow a NaN; this lets it through.
#[inline(always)]
fn non_negative(x: f32) -> f32 {
    if x < 0.0 { 0.0 } else { x }
}

/// Final colour of a fragment: ambient + diffuse + specular, alpha 1.0, unclamped.
pub fn shade(frag: &Fragment, uniforms: &LightUniforms, params: &PhongParams) -> ShadedColor {
    ShadedColor::opaque(phong_terms(frag, uniforms, params).total())
}

/// The normal-shading path: passes vertex attributes through to the
/// rasterizer and lights every fragment with [`shade`].
#[derive(Debug, Clone)]
pub struct PhongShader {
    /// Combined projection * model-view.
    pub mvp: Matrix4<f32>,
    pub uniforms: LightUniforms,
    pub params: PhongParams,
}

impl PhongShader {
    pub fn new(mvp: Matrix4<f32>, uniforms: LightUniforms, params: PhongParams) -> Self {
        Self {
            mvp,
            uniforms,
            params,
        }
    }
}

impl Shader for PhongShader {
    type Varying = Fragment;

    fn vertex(&self, vertex: &Vertex) -> Option<VertexOutput<Fragment>> {
        // Position, normal and colour go through untouched; only the emitted
        // position is transformed.
        Some(VertexOutput {
            clip: to_clip(&self.mvp, &vertex.position),
            varying: Fragment::from(*vertex),
        })
    }

    fn fragment(&self, varying: Fragment) -> ShadedColor {
        shade(&varying, &self.uniforms, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn frag(normal: Vector3<f32>, color: Vector3<f32>) -> Fragment {
        Fragment {
            position: Point3::origin(),
            normal,
            material_color: color,
        }
    }

    fn uniforms(light: [f32; 3], eye: [f32; 3]) -> LightUniforms {
        LightUniforms {
            light: Point3::from(light),
            eye: Point3::from(eye),
        }
    }

    #[test]
    fn defaults_match_reference_constants() {
        let p = PhongParams::default();
        assert_eq!(p.gloss, 0.5);
        assert_eq!(p.shininess, 10.0);
        assert_eq!(p.light_color, Vector3::new(0.75, 0.70, 0.80));
        assert_eq!(p.ambient_color, Vector3::new(0.5, 0.6, 0.55));
    }

    #[test]
    fn head_on_light_and_eye() {
        // l = e = n, so r = n and both factors are 1.
        let f = frag(Vector3::y(), Vector3::new(1.0, 0.5, 0.25));
        let params = PhongParams::default();
        let terms = phong_terms(&f, &uniforms([0.0, 3.0, 0.0], [0.0, 7.0, 0.0]), &params);

        assert!((terms.diffuse_factor - 1.0).abs() < EPS);
        assert!((terms.specular_factor - 1.0).abs() < EPS);

        let c = f.material_color;
        let expected = params.ambient_color.component_mul(&c)
            + params.light_color.component_mul(&c)
            + params.light_color * 0.5;
        let out = shade(&f, &uniforms([0.0, 3.0, 0.0], [0.0, 7.0, 0.0]), &params);
        assert!((out.rgb - expected).norm() < EPS);
        assert_eq!(out.alpha, 1.0);
    }

    #[test]
    fn output_is_not_clamped() {
        let f = frag(Vector3::y(), Vector3::repeat(1.0));
        let params = PhongParams {
            gloss: 4.0,
            ..PhongParams::default()
        };
        let out = shade(&f, &uniforms([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]), &params);
        assert!(out.rgb.x > 1.0);
    }

    #[test]
    fn light_behind_surface_leaves_only_ambient() {
        let f = frag(Vector3::y(), Vector3::new(0.2, 0.4, 0.6));
        let params = PhongParams::default();
        let terms = phong_terms(&f, &uniforms([0.0, -2.0, 0.0], [0.0, 5.0, 0.0]), &params);

        assert_eq!(terms.diffuse_factor, 0.0);
        assert_eq!(terms.specular_factor, 0.0);
        assert!((terms.total() - params.ambient_color.component_mul(&f.material_color)).norm() < EPS);
    }

    #[test]
    fn specular_is_gated_by_diffuse() {
        // Grazing light: l·n is tiny but e lines up with r exactly.
        let f = frag(Vector3::y(), Vector3::repeat(0.5));
        let params = PhongParams::default();
        let light = Vector3::new(-1.0, 0.01, 0.0).normalize();
        let eye = Vector3::new(1.0, 0.01, 0.0).normalize();
        let terms = phong_terms(
            &f,
            &uniforms(light.into(), eye.into()),
            &params,
        );
        assert!(terms.diffuse_factor < 0.02);
        assert!(terms.specular_factor <= terms.diffuse_factor + EPS);
    }

    #[test]
    fn factors_are_never_negative() {
        let params = PhongParams::default();
        let dirs = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 2.0, 0.5),
            Vector3::new(0.3, -1.0, 0.2),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.7, 0.7, 0.1),
        ];
        for n in dirs {
            for l in dirs {
                for e in dirs {
                    let f = frag(n.normalize(), Vector3::repeat(0.5));
                    let u = uniforms((l * 3.0).into(), (e * 4.0).into());
                    let t = phong_terms(&f, &u, &params);
                    assert!(t.diffuse_factor >= 0.0);
                    assert!(t.specular_factor >= 0.0);
                }
            }
        }
    }

    #[test]
    fn black_material_keeps_only_the_highlight() {
        let params = PhongParams::default();
        let f = frag(Vector3::new(0.2, 1.0, 0.1).normalize(), Vector3::zeros());
        let u = uniforms([1.0, 4.0, 0.5], [-0.5, 3.0, 1.0]);
        let terms = phong_terms(&f, &u, &params);
        let out = shade(&f, &u, &params);

        assert!(terms.specular_factor > 0.0);
        let expected = params.light_color * params.gloss * terms.specular_factor;
        assert!((out.rgb - expected).norm() < EPS);
    }

    #[test]
    fn zero_length_light_vector_propagates_nan() {
        let f = frag(Vector3::y(), Vector3::repeat(1.0));
        let out = shade(&f, &uniforms([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]), &PhongParams::default());
        assert!(out.rgb.x.is_nan());
    }

    #[test]
    fn vertex_stage_passes_attributes_through() {
        let mvp = Matrix4::new_scaling(2.0);
        let shader = PhongShader::new(mvp, uniforms([0.0; 3], [0.0; 3]), PhongParams::default());
        let v = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 3.0, 0.0),
            Vector3::new(0.1, 0.2, 0.3),
        );
        let out = shader.vertex(&v).unwrap();

        assert_eq!(out.varying.normal, v.normal);
        assert_eq!(out.varying.position, v.position);
        assert_eq!(out.varying.material_color, v.color);
        assert_eq!(out.clip, nalgebra::Vector4::new(2.0, 4.0, 6.0, 1.0));
    }
}
