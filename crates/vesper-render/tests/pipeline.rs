//! End-to-end pipeline wiring over the mock device: the real passes are
//! registered out of order, sorted by their declared dependencies, and
//! driven through a full frame.

mod common;

use common::MockDevice;
use vesper_core::gpu::{BufferId, IndexFormat};
use vesper_core::light::{DirectionalLight, LightType, PointLight};
use vesper_core::math::{Extent2D, Mat4, Vec3};
use vesper_render::config::RenderConfig;
use vesper_render::deferred::{DeferredLightingRenderer, DeferredOffScreenRenderer};
use vesper_render::manager::RenderManager;
use vesper_render::mesh::GpuMesh;
use vesper_render::omni::OmniShadowRenderer;
use vesper_render::shadow::CascadedShadowRenderer;
use vesper_render::world::{ExtractedCamera, ExtractedLight, ExtractedMesh, RenderWorld};

fn test_world(light_count: usize) -> RenderWorld {
    let mut world = RenderWorld::new();
    world.camera = Some(ExtractedCamera {
        projection: Mat4::perspective_rh_zo(1.2, 16.0 / 9.0, 0.1, 100.0),
        view: Mat4::look_at_rh(Vec3::new(0.0, 3.0, 8.0), Vec3::ZERO, Vec3::Y).unwrap(),
        position: Vec3::new(0.0, 3.0, 8.0),
        near: 0.1,
        far: 100.0,
    });
    world.lights.push(ExtractedLight {
        light: LightType::Directional(DirectionalLight::default()),
        position: Vec3::new(0.0, 10.0, 0.0),
    });
    world.lights.push(ExtractedLight {
        light: LightType::Point(PointLight {
            radius: 25.0,
            ..Default::default()
        }),
        position: Vec3::new(2.0, 2.0, 2.0),
    });
    for i in world.lights.len()..light_count {
        world.lights.push(ExtractedLight {
            light: LightType::Point(PointLight::default()),
            position: Vec3::new(i as f32, 0.0, 0.0),
        });
    }
    world.meshes.push(ExtractedMesh {
        mesh: GpuMesh {
            vertex_buffer: BufferId(90_001),
            index_buffer: BufferId(90_002),
            index_count: 36,
            index_format: IndexFormat::Uint32,
        },
        transform: Mat4::IDENTITY,
        material: None,
        casts_shadows: true,
    });
    world
}

fn full_manager(device: std::sync::Arc<MockDevice>) -> RenderManager {
    let mut manager = RenderManager::new(device, RenderConfig::default());
    // Deliberately mis-ordered: the consumer goes in first.
    manager.add_renderer(Box::new(DeferredLightingRenderer::new()));
    manager.add_renderer(Box::new(CascadedShadowRenderer::new()));
    manager.add_renderer(Box::new(OmniShadowRenderer::new()));
    manager.add_renderer(Box::new(DeferredOffScreenRenderer::new()));
    manager
}

#[test]
fn dependency_sort_places_producers_before_the_lighting_pass() {
    let device = MockDevice::new(Extent2D::new(1280, 720));
    let mut manager = full_manager(device);
    manager.init(Extent2D::new(1280, 720)).unwrap();

    let order = manager.execution_order();
    let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
    assert!(position("cascade_shadow") < position("deferred_lighting"));
    assert!(position("omni_shadow") < position("deferred_lighting"));
    assert!(position("deferred_offscreen") < position("deferred_lighting"));
}

#[test]
fn one_frame_records_every_pass_in_dependency_order() {
    let device = MockDevice::new(Extent2D::new(1280, 720));
    let mut manager = full_manager(std::sync::Arc::clone(&device));
    manager.init(Extent2D::new(1280, 720)).unwrap();

    let world = test_world(2);
    manager.begin_scene(&world).unwrap();
    device.clear_events();
    manager.on_render(&world).unwrap();

    let events = device.events();
    let passes: Vec<&String> = events.iter().filter(|e| e.starts_with("pass:")).collect();

    // 4 cascades + 6 cube faces + off-screen + lighting.
    assert_eq!(passes.len(), 12);
    assert_eq!(
        passes.iter().filter(|p| p.as_str() == "pass:cascade_shadow").count(),
        4
    );
    assert_eq!(
        passes.iter().filter(|p| p.as_str() == "pass:omni_shadow").count(),
        6
    );
    let last_pass = passes.last().unwrap();
    assert_eq!(last_pass.as_str(), "pass:deferred_lighting");

    // Each cube face is copied into its cube layer after its pass.
    for face in 0..6 {
        assert!(events.contains(&format!("copy:layer{face}")));
    }

    // Frame bracketing: acquire first, then submit and present.
    assert_eq!(events.first().unwrap(), "begin_frame");
    let submit = events.iter().position(|e| e == "submit").unwrap();
    let present = events.iter().position(|e| e == "present").unwrap();
    assert!(submit < present);
}

#[test]
fn missing_lights_skip_shadow_passes_without_errors() {
    let device = MockDevice::new(Extent2D::new(1280, 720));
    let mut manager = full_manager(std::sync::Arc::clone(&device));
    manager.init(Extent2D::new(1280, 720)).unwrap();

    // A world with a camera and meshes but no lights at all.
    let mut world = test_world(2);
    world.lights.clear();

    manager.begin_scene(&world).unwrap();
    device.clear_events();
    manager.on_render(&world).unwrap();

    let events = device.events();
    let passes: Vec<&String> = events.iter().filter(|e| e.starts_with("pass:")).collect();
    // Only the off-screen and lighting passes run this frame.
    assert_eq!(passes.len(), 2);
    assert!(passes.iter().all(|p| !p.contains("shadow")));

    // The next frame with lights restored renders shadows again.
    let world = test_world(2);
    manager.begin_scene(&world).unwrap();
    device.clear_events();
    manager.on_render(&world).unwrap();
    let passes = device
        .events()
        .iter()
        .filter(|e| e.starts_with("pass:"))
        .count();
    assert_eq!(passes, 12);
}

#[test]
fn light_overflow_renders_without_crashing() {
    let device = MockDevice::new(Extent2D::new(1280, 720));
    let mut manager = full_manager(device);
    manager.init(Extent2D::new(1280, 720)).unwrap();

    let world = test_world(vesper_core::light::MAX_LIGHTS + 5);
    manager.begin_scene(&world).unwrap();
    manager.on_render(&world).unwrap();
}

#[test]
fn missing_camera_is_a_silent_noop_frame() {
    let device = MockDevice::new(Extent2D::new(1280, 720));
    let mut manager = full_manager(std::sync::Arc::clone(&device));
    manager.init(Extent2D::new(1280, 720)).unwrap();

    let mut world = test_world(2);
    world.camera = None;

    manager.begin_scene(&world).unwrap();
    manager.on_render(&world).unwrap();
}
