use nalgebra::Vector3;

/// Terminal output of a fragment shader: linear RGB plus an alpha that the
/// shading path always sets to 1.0.
///
/// Channels are not clamped; values above one are left for the output stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedColor {
    pub rgb: Vector3<f32>,
    pub alpha: f32,
}

impl ShadedColor {
    /// An opaque colour (alpha = 1.0).
    pub fn opaque(rgb: Vector3<f32>) -> Self {
        Self { rgb, alpha: 1.0 }
    }
}

/// Applies a display gamma (1.0 leaves the colour linear).
pub fn apply_gamma(color: Vector3<f32>, gamma: f32) -> Vector3<f32> {
    if (gamma - 1.0).abs() < f32::EPSILON {
        return color;
    }
    let inv = 1.0 / gamma;
    color.map(|c| c.max(0.0).powf(inv))
}

/// Output-stage conversion: clamp each channel to [0, 1] and quantize to 8 bits.
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(color.x), q(color.y), q(color.z)]
}
