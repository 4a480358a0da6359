//! Resize semantics: the G-buffer and every size-dependent framebuffer
//! agree on the new dimensions after a resize, and a zero-sized resize
//! (minimized window) is a no-op.

mod common;

use common::MockDevice;
use vesper_core::math::Extent2D;
use vesper_render::config::RenderConfig;
use vesper_render::deferred::{DeferredLightingRenderer, DeferredOffScreenRenderer};
use vesper_render::manager::RenderManager;
use vesper_render::shadow::CascadedShadowRenderer;

const INITIAL: Extent2D = Extent2D {
    width: 1280,
    height: 720,
};
const RESIZED: Extent2D = Extent2D {
    width: 1920,
    height: 1080,
};

fn manager_with_screen_passes(device: std::sync::Arc<MockDevice>) -> RenderManager {
    let mut manager = RenderManager::new(device, RenderConfig::default());
    manager.add_renderer(Box::new(CascadedShadowRenderer::new()));
    manager.add_renderer(Box::new(DeferredOffScreenRenderer::new()));
    manager.add_renderer(Box::new(DeferredLightingRenderer::new()));
    manager
}

#[test]
fn resize_updates_gbuffer_and_all_screen_framebuffers() {
    let device = MockDevice::new(INITIAL);
    let mut manager = manager_with_screen_passes(std::sync::Arc::clone(&device));
    manager.init(INITIAL).unwrap();

    // The surface resizes first (the windowing layer does this), then
    // the manager reacts.
    device.set_surface_extent(RESIZED);
    manager.on_resize(RESIZED).unwrap();

    assert_eq!(manager.gbuffer().unwrap().extent(), RESIZED);

    // No live framebuffer still carries the old screen size. Shadow-map
    // framebuffers keep their own resolution, which never equals the
    // screen size in this test.
    let extents = device.framebuffer_extents();
    assert!(!extents.is_empty());
    assert!(extents.iter().all(|e| *e != INITIAL));
    assert!(extents.iter().any(|e| *e == RESIZED));

    // The device was idled before targets were destroyed.
    assert!(device.events().contains(&"wait_idle".to_string()));
}

#[test]
fn zero_sized_resize_is_a_noop() {
    let device = MockDevice::new(INITIAL);
    let mut manager = manager_with_screen_passes(std::sync::Arc::clone(&device));
    manager.init(INITIAL).unwrap();

    let before = device.framebuffer_extents();
    manager.on_resize(Extent2D::new(0, 0)).unwrap();
    manager.on_resize(Extent2D::new(0, 720)).unwrap();

    assert_eq!(manager.gbuffer().unwrap().extent(), INITIAL);
    assert_eq!(device.framebuffer_extents().len(), before.len());
    assert!(device.framebuffer_extents().iter().all(|e| *e != RESIZED));
}

#[test]
fn shadow_framebuffers_are_unaffected_by_screen_resize() {
    let device = MockDevice::new(INITIAL);
    let config = RenderConfig::default();
    let shadow_size = Extent2D::new(config.shadow.map_size, config.shadow.map_size);

    let mut manager = manager_with_screen_passes(std::sync::Arc::clone(&device));
    manager.init(INITIAL).unwrap();

    let shadow_before = device
        .framebuffer_extents()
        .iter()
        .filter(|e| **e == shadow_size)
        .count();
    assert_eq!(shadow_before, 4);

    device.set_surface_extent(RESIZED);
    manager.on_resize(RESIZED).unwrap();

    let shadow_after = device
        .framebuffer_extents()
        .iter()
        .filter(|e| **e == shadow_size)
        .count();
    assert_eq!(shadow_after, 4);
}
