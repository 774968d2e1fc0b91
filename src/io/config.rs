use crate::io::error::{Result, SceneError};
use crate::pipeline::shaders::phong::PhongParams;
use crate::pipeline::shaders::shadow::ShadowPlane;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete scene description, read from a TOML file. Every section and field
/// is optional; missing values take the defaults below.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub shading: ShadingConfig,
    #[serde(default)]
    pub plane: PlaneConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output & Quality ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_background")]
    pub background_color: [f32; 3],
    /// 1.0 writes linear values straight to the image.
    #[serde(default = "default_gamma")]
    pub gamma: f32,

    // --- Pipeline & Debug ---
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default)]
    pub wireframe: bool,
    #[serde(default = "default_true")]
    pub shadows: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            samples: default_samples(),
            background_color: default_background(),
            gamma: default_gamma(),
            cull_mode: default_cull_mode(),
            wireframe: false,
            shadows: true,
        }
    }
}

impl RenderConfig {
    /// Output size in pixels, never zero in either direction.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width.max(1), self.height.max(1))
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.dimensions();
        w as f32 / h as f32
    }
}

fn default_width() -> usize {
    512
}
fn default_height() -> usize {
    512
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_samples() -> usize {
    2
}
fn default_background() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}
fn default_gamma() -> f32 {
    1.0
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Eye position.
    #[serde(default = "default_eye")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// "perspective", "orthographic", or "fit" (orthographic sized to the model).
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_eye(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            projection: default_projection(),
            ortho_height: default_ortho_height(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_eye() -> [f32; 3] {
    [0.0, 3.0, 6.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_projection() -> String {
    "perspective".to_string()
}
fn default_ortho_height() -> f32 {
    6.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

/// Where the point light sits. An `orbit` entry, when present, overrides
/// `position`.
#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: default_light_position(),
            orbit: None,
        }
    }
}

fn default_light_position() -> [f32; 3] {
    [1.5, 5.0, 1.0]
}

#[derive(Debug, Deserialize)]
pub struct OrbitConfig {
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default)]
    pub azimuth: f32,
    #[serde(default = "default_elevation")]
    pub elevation: f32,
    #[serde(default = "default_orbit_distance")]
    pub distance: f32,
}

fn default_elevation() -> f32 {
    60.0
}
fn default_orbit_distance() -> f32 {
    4.0
}

#[derive(Debug, Deserialize)]
pub struct ShadingConfig {
    #[serde(default = "default_gloss")]
    pub gloss: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_light_color")]
    pub light_color: [f32; 3],
    #[serde(default = "default_ambient_color")]
    pub ambient_color: [f32; 3],
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            gloss: default_gloss(),
            shininess: default_shininess(),
            light_color: default_light_color(),
            ambient_color: default_ambient_color(),
        }
    }
}

// Keep in step with PhongParams::default().
fn default_gloss() -> f32 {
    0.5
}
fn default_shininess() -> f32 {
    10.0
}
fn default_light_color() -> [f32; 3] {
    [0.75, 0.70, 0.80]
}
fn default_ambient_color() -> [f32; 3] {
    [0.5, 0.6, 0.55]
}

impl ShadingConfig {
    pub fn phong_params(&self) -> PhongParams {
        PhongParams {
            gloss: self.gloss,
            shininess: self.shininess,
            light_color: Vector3::from(self.light_color),
            ambient_color: Vector3::from(self.ambient_color),
        }
    }
}

/// The shadow-receiving plane and the ground drawn on it.
#[derive(Debug, Deserialize)]
pub struct PlaneConfig {
    #[serde(default)]
    pub point: [f32; 3],
    #[serde(default = "default_up")]
    pub normal: [f32; 3],
    /// Three points on the plane; overrides `point`/`normal` when given.
    #[serde(default)]
    pub through: Option<[[f32; 3]; 3]>,
    #[serde(default = "default_shadow_color")]
    pub shadow_color: [f32; 3],

    // --- Ground ---
    #[serde(default = "default_true")]
    pub ground: bool,
    #[serde(default = "default_ground_extent")]
    pub ground_extent: f32,
    #[serde(default = "default_ground_color")]
    pub ground_color: [f32; 3],
    #[serde(default = "default_ground_offset")]
    pub ground_offset: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            point: [0.0, 0.0, 0.0],
            normal: default_up(),
            through: None,
            shadow_color: default_shadow_color(),
            ground: true,
            ground_extent: default_ground_extent(),
            ground_color: default_ground_color(),
            ground_offset: default_ground_offset(),
        }
    }
}

fn default_shadow_color() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_ground_extent() -> f32 {
    10.0
}
fn default_ground_color() -> [f32; 3] {
    [0.4, 0.65, 0.45]
}
fn default_ground_offset() -> f32 {
    0.001
}

impl PlaneConfig {
    /// Builds the shadow plane. The normal is normalized here, since the
    /// projection is only exact for a unit normal.
    pub fn shadow_plane(&self) -> Result<ShadowPlane> {
        if let Some([a, b, c]) = self.through {
            return ShadowPlane::from_points(Point3::from(a), Point3::from(b), Point3::from(c))
                .ok_or_else(|| SceneError::InvalidPlane("the three points are collinear".into()));
        }
        let normal = Vector3::from(self.normal)
            .try_normalize(1e-12)
            .ok_or_else(|| SceneError::InvalidPlane("normal has zero length".into()))?;
        Ok(ShadowPlane::new(Point3::from(self.point), normal))
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// OBJ file. Without one, a built-in cube is used.
    #[serde(default)]
    pub path: Option<String>,
    /// Material colour for vertices that carry none.
    #[serde(default = "default_model_color")]
    pub color: [f32; 3],
    /// Rounds of Loop subdivision applied right after loading.
    #[serde(default = "default_subdivisions")]
    pub subdivisions: u32,

    // --- Transform ---
    #[serde(default = "default_model_position")]
    pub position: [f32; 3],
    /// Euler angles in degrees; the mesh is turned about Z, then Y, then X.
    #[serde(default = "default_model_rotation")]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Recentre the mesh and fit it into a box of this size before transforming.
    #[serde(default)]
    pub normalize: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            color: default_model_color(),
            subdivisions: default_subdivisions(),
            position: default_model_position(),
            rotation: default_model_rotation(),
            scale: default_scale(),
            normalize: None,
        }
    }
}

fn default_model_color() -> [f32; 3] {
    [0.8, 0.45, 0.3]
}
fn default_subdivisions() -> u32 {
    1
}
fn default_model_position() -> [f32; 3] {
    [0.0, 1.5, 0.0]
}
fn default_model_rotation() -> [f32; 3] {
    [0.0, 30.0, 0.0]
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
