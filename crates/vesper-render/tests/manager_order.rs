//! Execution-order guarantees of the render manager: registration order
//! is preserved among independent passes, declared dependencies reorder
//! execution, and a missing producer fails pipeline construction.

mod common;

use common::MockDevice;
use std::sync::{Arc, Mutex};
use vesper_core::math::Extent2D;
use vesper_render::board::PassBoard;
use vesper_render::config::RenderConfig;
use vesper_render::error::RendererError;
use vesper_render::gbuffer::GBuffer;
use vesper_render::manager::RenderManager;
use vesper_render::renderer::{FrameContext, PassResource, Renderer};
use vesper_render::world::RenderWorld;
use vesper_core::gpu::GraphicsDevice;

/// A pass that only records when it runs.
struct ProbePass {
    name: &'static str,
    produces: Vec<PassResource>,
    consumes: Vec<PassResource>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ProbePass {
    fn new(
        name: &'static str,
        produces: Vec<PassResource>,
        consumes: Vec<PassResource>,
        calls: &Arc<Mutex<Vec<String>>>,
    ) -> Box<Self> {
        Box::new(Self {
            name,
            produces,
            consumes,
            calls: Arc::clone(calls),
        })
    }

    fn record(&self, phase: &str) {
        self.calls.lock().unwrap().push(format!("{phase}:{}", self.name));
    }
}

impl Renderer for ProbePass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn produces(&self) -> &[PassResource] {
        &self.produces
    }

    fn consumes(&self) -> &[PassResource] {
        &self.consumes
    }

    fn init(
        &mut self,
        _device: &dyn GraphicsDevice,
        _gbuffer: &GBuffer,
        _config: &RenderConfig,
    ) -> Result<(), RendererError> {
        self.record("init");
        Ok(())
    }

    fn begin_scene(
        &mut self,
        _device: &dyn GraphicsDevice,
        _world: &RenderWorld,
        _board: &mut PassBoard,
    ) -> Result<(), RendererError> {
        self.record("begin");
        Ok(())
    }

    fn render_scene(&mut self, _frame: &mut FrameContext<'_>) -> Result<(), RendererError> {
        self.record("render");
        Ok(())
    }

    fn destroy(&mut self, _device: &dyn GraphicsDevice) {}
}

fn phase_order(calls: &Arc<Mutex<Vec<String>>>, phase: &str) -> Vec<String> {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.starts_with(phase))
        .cloned()
        .collect()
}

#[test]
fn registration_order_is_execution_order_without_dependencies() {
    let device = MockDevice::new(Extent2D::new(640, 480));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let mut manager = RenderManager::new(device, RenderConfig::default());
    manager.add_renderer(ProbePass::new("alpha", vec![], vec![], &calls));
    manager.add_renderer(ProbePass::new("beta", vec![], vec![], &calls));
    manager.add_renderer(ProbePass::new("gamma", vec![], vec![], &calls));
    manager.init(Extent2D::new(640, 480)).unwrap();

    assert_eq!(manager.execution_order(), vec!["alpha", "beta", "gamma"]);

    let world = RenderWorld::new();
    manager.begin_scene(&world).unwrap();
    manager.on_render(&world).unwrap();

    assert_eq!(
        phase_order(&calls, "render"),
        vec!["render:alpha", "render:beta", "render:gamma"]
    );
    // begin_scene runs in the same order, before any rendering.
    assert_eq!(
        phase_order(&calls, "begin"),
        vec!["begin:alpha", "begin:beta", "begin:gamma"]
    );
}

#[test]
fn declared_dependencies_override_registration_order() {
    let device = MockDevice::new(Extent2D::new(640, 480));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let mut manager = RenderManager::new(device, RenderConfig::default());
    // The consumer is registered first — the graph must still run the
    // producer before it.
    manager.add_renderer(ProbePass::new(
        "lighting",
        vec![],
        vec![PassResource::CascadeShadowMap],
        &calls,
    ));
    manager.add_renderer(ProbePass::new(
        "shadow",
        vec![PassResource::CascadeShadowMap],
        vec![],
        &calls,
    ));
    manager.init(Extent2D::new(640, 480)).unwrap();

    assert_eq!(manager.execution_order(), vec!["shadow", "lighting"]);
}

#[test]
fn missing_producer_fails_pipeline_construction() {
    let device = MockDevice::new(Extent2D::new(640, 480));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let mut manager = RenderManager::new(device, RenderConfig::default());
    manager.add_renderer(ProbePass::new(
        "lighting",
        vec![],
        vec![PassResource::GeometryBuffer],
        &calls,
    ));

    match manager.init(Extent2D::new(640, 480)) {
        Err(RendererError::MissingProducer { resource, consumer }) => {
            assert_eq!(resource, PassResource::GeometryBuffer);
            assert_eq!(consumer, "lighting");
        }
        other => panic!("expected MissingProducer, got {other:?}"),
    }
}

#[test]
fn duplicate_producers_are_rejected() {
    let device = MockDevice::new(Extent2D::new(640, 480));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let mut manager = RenderManager::new(device, RenderConfig::default());
    manager.add_renderer(ProbePass::new(
        "first",
        vec![PassResource::FinalColor],
        vec![],
        &calls,
    ));
    manager.add_renderer(ProbePass::new(
        "second",
        vec![PassResource::FinalColor],
        vec![],
        &calls,
    ));

    assert!(matches!(
        manager.init(Extent2D::new(640, 480)),
        Err(RendererError::DuplicateProducer { .. })
    ));
}

#[test]
fn driving_an_uninitialized_manager_is_an_error() {
    let device = MockDevice::new(Extent2D::new(640, 480));
    let mut manager = RenderManager::new(device, RenderConfig::default());
    let world = RenderWorld::new();
    assert!(matches!(
        manager.begin_scene(&world),
        Err(RendererError::NotInitialized)
    ));
    assert!(matches!(
        manager.on_render(&world),
        Err(RendererError::NotInitialized)
    ));
}
