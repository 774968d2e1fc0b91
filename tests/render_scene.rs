use nalgebra::{Point3, Vector3};
use phong_shadow::io::config::RenderConfig;
use phong_shadow::pipeline::mode::RenderMode;
use phong_shadow::pipeline::passes::{build_draw_list, post_process_to_buffer, render_frame};
use phong_shadow::pipeline::renderer::Renderer;
use phong_shadow::pipeline::shaders::phong::PhongParams;
use phong_shadow::pipeline::shaders::shadow::{PlanarShadowShader, ShadowPlane};
use phong_shadow::scene::camera::Camera;
use phong_shadow::scene::context::RenderContext;
use phong_shadow::scene::light::PointLight;
use phong_shadow::scene::mesh::Mesh;

const SIZE: usize = 64;
const SHADOW: [f32; 3] = [0.1, 0.1, 0.1];
const CUBE_COLOR: [f32; 3] = [0.8, 0.4, 0.2];
const GROUND_COLOR: [f32; 3] = [0.4, 0.65, 0.45];

/// A unit cube floating between y = 1 and y = 2 over the XZ floor, lit from
/// straight above and seen from straight above through an orthographic camera
/// 4 units wide. Screen x follows world x; 16 pixels per unit.
fn scene(light_y: f32) -> RenderContext {
    let plane = ShadowPlane::new(Point3::origin(), Vector3::y());
    let camera = Camera::new_orthographic(
        Point3::new(0.0, 10.0, 0.0),
        Point3::origin(),
        -Vector3::z(),
        4.0,
        1.0,
        0.1,
        20.0,
    );

    RenderContext {
        camera,
        light: PointLight::new(Point3::new(0.0, light_y, 0.0)),
        phong: PhongParams::default(),
        plane,
        shadow_color: Vector3::from(SHADOW),
        model: Mesh::create_cube(Point3::new(0.0, 1.5, 0.0), 0.5, Vector3::from(CUBE_COLOR)),
        ground: Some(Mesh::create_ground(
            &plane,
            5.0,
            0.001,
            Vector3::from(GROUND_COLOR),
        )),
    }
}

fn render_config(shadows: bool) -> RenderConfig {
    RenderConfig {
        width: SIZE,
        height: SIZE,
        samples: 1,
        shadows,
        ..RenderConfig::default()
    }
}

fn render(context: &RenderContext, shadows: bool) -> Renderer {
    let mut renderer = Renderer::new(SIZE, SIZE, 1);
    render_frame(&render_config(shadows), context, &mut renderer);
    renderer
}

fn pixel(renderer: &Renderer, x: usize, y: usize) -> Vector3<f32> {
    renderer.framebuffer.get_pixel(x, y).unwrap()
}

fn close(a: Vector3<f32>, b: Vector3<f32>, tol: f32) -> bool {
    (a - b).amax() < tol
}

#[test]
fn shadow_ring_around_cube_footprint() {
    let renderer = render(&scene(10.0), true);

    // Pixel 41 sits at x ~ 0.59: outside the cube (0.5) but inside its
    // shadow, which reaches 0.625 from the top edges.
    assert!(close(pixel(&renderer, 41, 32), Vector3::from(SHADOW), 1e-6));

    // Well outside the shadow the ground is lit.
    let ground = pixel(&renderer, 60, 32);
    let ambient_only = PhongParams::default()
        .ambient_color
        .component_mul(&Vector3::from(GROUND_COLOR));
    assert!(ground.x > ambient_only.x && ground.y > ambient_only.y);
}

#[test]
fn cube_top_is_fully_lit_head_on() {
    let renderer = render(&scene(10.0), true);
    let params = PhongParams::default();
    let c = Vector3::from(CUBE_COLOR);

    // Light and eye are both straight above, so diffuse and specular are ~1.
    let expected = params.ambient_color.component_mul(&c)
        + params.light_color.component_mul(&c)
        + params.light_color * params.gloss;
    assert!(close(pixel(&renderer, 32, 32), expected, 0.02));
}

#[test]
fn without_shadow_pass_the_ring_is_lit_ground() {
    let renderer = render(&scene(10.0), false);
    let ring = pixel(&renderer, 41, 32);
    assert!(!close(ring, Vector3::from(SHADOW), 0.05));
    assert!(close(ring, pixel(&renderer, 42, 32), 0.02));
}

#[test]
fn light_below_cube_top_casts_partial_shadow() {
    // Light at y = 1.5: top vertices are above the light and never project,
    // so every triangle touching the top face is dropped.
    let context = scene(1.5);
    let mut renderer = Renderer::new(SIZE, SIZE, 1);

    let draws = build_draw_list(&context, true);
    let (mesh, mode) = draws.last().unwrap();
    assert!(matches!(mode, RenderMode::ShadowProject(_)));

    let stats = renderer.draw(mesh, mode);
    assert_eq!(stats.triangles, 12);
    // Every face touches y = 2 except the bottom one.
    assert_eq!(stats.culled, 10);
}

#[test]
fn light_below_plane_casts_nothing() {
    let context = scene(-3.0);
    let shader = PlanarShadowShader::new(
        context.camera.mvp(&nalgebra::Matrix4::identity()),
        context.light.position,
        context.plane,
        Vector3::from(SHADOW),
    );
    let mut renderer = Renderer::new(SIZE, SIZE, 1);
    let stats = renderer.draw(&context.model, &RenderMode::from(shader));

    assert_eq!(stats.culled, stats.triangles);
    assert_eq!(stats.fragments, 0);
}

#[test]
fn output_stage_packs_clamped_colors() {
    let renderer = render(&scene(10.0), true);
    let mut buffer = vec![0u32; SIZE * SIZE];
    post_process_to_buffer(&renderer.framebuffer, &mut buffer, 1.0);

    let shadow = buffer[32 * SIZE + 41];
    assert_eq!(shadow >> 24, 0xFF);
    for shift in [0, 8, 16] {
        let channel = (shadow >> shift) & 0xFF;
        assert!((25..=26).contains(&channel), "channel {channel}");
    }

    // The lit cube top overflows 1.0 in red and is clamped.
    assert_eq!((buffer[32 * SIZE + 32] >> 16) & 0xFF, 0xFF);
}
