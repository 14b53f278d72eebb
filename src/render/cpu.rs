use kurbo::Shape as _;

use crate::animation::curve::AnimationPose;
use crate::foundation::core::{
    Affine, BezPath, CameraId, NodeId, SceneId, ShaderId, TargetId, TargetSize, TextureId,
};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::{FrameRGBA, RenderBackend, WEIGHTED_SUM_SHADER};
use crate::render::composite::{CompositeInput, weighted_sum_into};
use crate::scene::graph::SceneGraph;

/// Options for [`CpuBackend`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackendOpts {
    /// Worker threads for the composite pass. `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Upper bound on the bytes held by live render targets. `None` is unbounded.
    pub max_target_bytes: Option<usize>,
}

/// Fillable geometry of a scene node, in node-local units.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle centred on the origin.
    Rect {
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
    },
    /// Circle centred on the origin.
    Circle {
        /// Circle radius.
        radius: f64,
    },
    /// Arbitrary filled path.
    Path(BezPath),
}

impl Shape {
    fn to_cpu_path(&self) -> vello_cpu::kurbo::BezPath {
        match self {
            Self::Rect { width, height } => {
                let r = kurbo::Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
                bezpath_to_cpu(&r.to_path(0.1))
            }
            Self::Circle { radius } => {
                bezpath_to_cpu(&kurbo::Circle::new((0.0, 0.0), *radius).to_path(0.1))
            }
            Self::Path(p) => bezpath_to_cpu(p),
        }
    }
}

#[derive(Clone, Debug)]
struct CpuNode {
    scene: SceneId,
    path: vello_cpu::kurbo::BezPath,
    color: [u8; 4],
    rest: Affine,
    pose: Affine,
    visible: bool,
    opacity: f32,
}

#[derive(Clone, Debug)]
struct CpuScene {
    background: Option<[u8; 4]>,
    nodes: Vec<NodeId>,
    visible: bool,
}

struct CpuTarget {
    size: TargetSize,
    pixmap: vello_cpu::Pixmap,
}

/// Reference backend: `vello_cpu` pixmaps as render targets and a small retained scene store.
///
/// Colors passed to [`CpuBackend::add_scene`] and [`CpuBackend::add_node`] are straight RGBA8;
/// targets and composited frames are premultiplied.
pub struct CpuBackend {
    canvas: TargetSize,
    opts: CpuBackendOpts,
    pool: Option<rayon::ThreadPool>,
    ctx: Option<vello_cpu::RenderContext>,
    scenes: Vec<CpuScene>,
    nodes: Vec<CpuNode>,
    cameras: Vec<Affine>,
    targets: Vec<Option<CpuTarget>>,
    frame: Option<FrameRGBA>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("canvas", &self.canvas)
            .field("opts", &self.opts)
            .field("scenes", &self.scenes.len())
            .field("nodes", &self.nodes.len())
            .field("live_targets", &self.live_targets())
            .finish()
    }
}

impl CpuBackend {
    /// Backend composing into a `canvas`-sized frame. Camera 0 is the identity view.
    pub fn new(canvas: TargetSize, opts: CpuBackendOpts) -> CompositorResult<Self> {
        canvas.validate()?;
        to_u16_size(canvas)?;
        Ok(Self {
            canvas,
            pool: build_thread_pool(opts.threads)?,
            opts,
            ctx: None,
            scenes: Vec::new(),
            nodes: Vec::new(),
            cameras: vec![Affine::IDENTITY],
            targets: Vec::new(),
            frame: None,
        })
    }

    /// Output frame size.
    pub fn canvas(&self) -> TargetSize {
        self.canvas
    }

    /// Change the output frame size. Targets must be resized to match before the next composite.
    pub fn set_canvas(&mut self, canvas: TargetSize) -> CompositorResult<()> {
        canvas.validate()?;
        to_u16_size(canvas)?;
        self.canvas = canvas;
        self.frame = None;
        Ok(())
    }

    /// Register a scene, optionally cleared to a straight-alpha background color.
    pub fn add_scene(&mut self, background: Option<[u8; 4]>) -> SceneId {
        self.scenes.push(CpuScene {
            background,
            nodes: Vec::new(),
            visible: true,
        });
        SceneId((self.scenes.len() - 1) as u32)
    }

    /// Add a filled node to `scene`, placed by `rest`. Poses apply in the node's rest frame.
    pub fn add_node(
        &mut self,
        scene: SceneId,
        shape: &Shape,
        color: [u8; 4],
        rest: Affine,
    ) -> CompositorResult<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        let sc = self.scene_mut(scene)?;
        sc.nodes.push(id);
        self.nodes.push(CpuNode {
            scene,
            path: shape.to_cpu_path(),
            color,
            rest,
            pose: Affine::IDENTITY,
            visible: true,
            opacity: 1.0,
        });
        Ok(id)
    }

    /// Register a view transform applied to every node of a rendered scene.
    pub fn add_camera(&mut self, view: Affine) -> CameraId {
        self.cameras.push(view);
        CameraId((self.cameras.len() - 1) as u32)
    }

    /// Scene a node belongs to.
    pub fn node_scene(&self, node: NodeId) -> Option<SceneId> {
        self.nodes.get(node.index()).map(|n| n.scene)
    }

    /// Most recent composited frame.
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Take ownership of the most recent composited frame.
    pub fn take_frame(&mut self) -> Option<FrameRGBA> {
        self.frame.take()
    }

    /// Premultiplied pixels of a live target.
    pub fn target_pixels(&self, target: TargetId) -> CompositorResult<&[u8]> {
        Ok(self.target(target)?.pixmap.data_as_u8_slice())
    }

    /// Number of allocated targets.
    pub fn live_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    /// Bytes held by live targets.
    pub fn live_target_bytes(&self) -> usize {
        self.targets
            .iter()
            .flatten()
            .map(|t| t.size.rgba8_len())
            .sum()
    }

    fn scene_mut(&mut self, scene: SceneId) -> CompositorResult<&mut CpuScene> {
        self.scenes
            .get_mut(scene.index())
            .ok_or_else(|| CompositorError::render(format!("unknown scene {}", scene.0)))
    }

    fn node_mut(&mut self, node: NodeId) -> CompositorResult<&mut CpuNode> {
        self.nodes
            .get_mut(node.index())
            .ok_or_else(|| CompositorError::render(format!("unknown node {}", node.0)))
    }

    fn target(&self, target: TargetId) -> CompositorResult<&CpuTarget> {
        self.targets
            .get(target.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| CompositorError::render(format!("unknown render target {}", target.0)))
    }

    fn check_budget(&self, extra: usize, released: usize) -> CompositorResult<()> {
        if let Some(max) = self.opts.max_target_bytes {
            let total = self.live_target_bytes() - released + extra;
            if total > max {
                return Err(CompositorError::resource(format!(
                    "render target budget exceeded: {total} bytes > {max}"
                )));
            }
        }
        Ok(())
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&Self, &mut vello_cpu::RenderContext) -> CompositorResult<R>,
    ) -> CompositorResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn draw_scene(
        &self,
        scene: &CpuScene,
        view: Affine,
        size: TargetSize,
        ctx: &mut vello_cpu::RenderContext,
    ) {
        if !scene.visible {
            return;
        }
        if let Some([r, g, b, a]) = scene.background {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            ));
        }
        for id in &scene.nodes {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            let opacity = node.opacity.clamp(0.0, 1.0);
            if !node.visible || opacity <= 0.0 {
                continue;
            }
            let [r, g, b, a] = node.color;
            ctx.set_transform(affine_to_cpu(view * node.rest * node.pose));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            ctx.fill_path(&node.path);
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }
}

impl RenderBackend for CpuBackend {
    fn create_target(&mut self, size: TargetSize) -> CompositorResult<TargetId> {
        size.validate()?;
        let (w, h) = to_u16_size(size)?;
        self.check_budget(size.rgba8_len(), 0)?;
        let target = CpuTarget {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        };
        let id = match self.targets.iter().position(Option::is_none) {
            Some(free) => {
                self.targets[free] = Some(target);
                free
            }
            None => {
                self.targets.push(Some(target));
                self.targets.len() - 1
            }
        };
        tracing::debug!(
            target_id = id,
            width = size.width,
            height = size.height,
            "allocated cpu target"
        );
        Ok(TargetId(id as u32))
    }

    fn resize_target(&mut self, target: TargetId, size: TargetSize) -> CompositorResult<()> {
        size.validate()?;
        let (w, h) = to_u16_size(size)?;
        let old = self.target(target)?.size;
        if old == size {
            return Ok(());
        }
        self.check_budget(size.rgba8_len(), old.rgba8_len())?;
        self.targets[target.index()] = Some(CpuTarget {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        });
        Ok(())
    }

    fn dispose_target(&mut self, target: TargetId) -> CompositorResult<()> {
        self.target(target)?;
        self.targets[target.index()] = None;
        Ok(())
    }

    fn target_texture(&self, target: TargetId) -> CompositorResult<TextureId> {
        self.target(target)?;
        Ok(TextureId(target.0))
    }

    fn render_scene_to_target(
        &mut self,
        scene: SceneId,
        camera: CameraId,
        target: TargetId,
    ) -> CompositorResult<()> {
        let size = self.target(target)?.size;
        let view = *self
            .cameras
            .get(camera.index())
            .ok_or_else(|| CompositorError::render(format!("unknown camera {}", camera.0)))?;
        if scene.index() >= self.scenes.len() {
            return Err(CompositorError::render(format!("unknown scene {}", scene.0)));
        }
        let (w, h) = to_u16_size(size)?;

        let mut pixmap = match self.targets[target.index()].take() {
            Some(t) => t.pixmap,
            None => vello_cpu::Pixmap::new(w, h),
        };
        let out = self.with_ctx_mut(w, h, |this, ctx| {
            this.draw_scene(&this.scenes[scene.index()], view, size, ctx);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        });
        self.targets[target.index()] = Some(CpuTarget { size, pixmap });
        out
    }

    fn draw_fullscreen_composite(
        &mut self,
        textures: &[Option<TextureId>],
        weights: &[f32],
        shader: ShaderId,
    ) -> CompositorResult<()> {
        if shader != WEIGHTED_SUM_SHADER {
            return Err(CompositorError::render(format!(
                "unknown composite shader {}",
                shader.0
            )));
        }
        if textures.len() != weights.len() {
            return Err(CompositorError::render(format!(
                "composite expects matching inputs, got {} textures and {} weights",
                textures.len(),
                weights.len()
            )));
        }

        let canvas = self.canvas;
        let mut inputs: Vec<CompositeInput<'_>> = Vec::with_capacity(textures.len());
        for (tex, w) in textures.iter().zip(weights) {
            let Some(tex) = tex else {
                continue;
            };
            let t = self.target(TargetId(tex.0))?;
            if t.size != canvas {
                return Err(CompositorError::render(format!(
                    "composite input {}x{} does not match canvas {}x{}",
                    t.size.width, t.size.height, canvas.width, canvas.height
                )));
            }
            inputs.push((t.pixmap.data_as_u8_slice(), *w));
        }

        let mut data = vec![0u8; canvas.rgba8_len()];
        let row_bytes = canvas.width as usize * 4;
        match &self.pool {
            Some(pool) => pool.install(|| weighted_sum_into(&mut data, row_bytes, &inputs))?,
            None => weighted_sum_into(&mut data, row_bytes, &inputs)?,
        }
        self.frame = Some(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        });
        Ok(())
    }
}

impl SceneGraph for CpuBackend {
    fn set_scene_visible(&mut self, scene: SceneId, visible: bool) -> CompositorResult<()> {
        self.scene_mut(scene)?.visible = visible;
        Ok(())
    }

    fn set_node_pose(&mut self, node: NodeId, pose: AnimationPose) -> CompositorResult<()> {
        self.node_mut(node)?.pose = pose.to_affine();
        Ok(())
    }

    fn set_node_visible(&mut self, node: NodeId, visible: bool) -> CompositorResult<()> {
        self.node_mut(node)?.visible = visible;
        Ok(())
    }

    fn set_node_opacity(&mut self, node: NodeId, opacity: f32) -> CompositorResult<()> {
        self.node_mut(node)?.opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        Ok(())
    }
}

fn to_u16_size(size: TargetSize) -> CompositorResult<(u16, u16)> {
    let w = u16::try_from(size.width).map_err(|_| {
        CompositorError::resource(format!("target width {} exceeds u16", size.width))
    })?;
    let h = u16::try_from(size.height).map_err(|_| {
        CompositorError::resource(format!("target height {} exceeds u16", size.height))
    })?;
    Ok((w, h))
}

fn build_thread_pool(threads: Option<usize>) -> CompositorResult<Option<rayon::ThreadPool>> {
    let Some(n) = threads else {
        return Ok(None);
    };
    if n == 0 {
        return Err(CompositorError::configuration(
            "cpu backend 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map(Some)
        .map_err(|e| CompositorError::render(format!("failed to build rayon thread pool: {e}")))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
