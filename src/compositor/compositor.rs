use smallvec::SmallVec;

use crate::compositor::command::{BlendEntry, BlendWeights, CompositeCommand};
use crate::config::params::CompositorParams;
use crate::foundation::core::{ShaderId, SlotId, TargetSize, TextureId};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::{RenderBackend, WEIGHTED_SUM_SHADER};
use crate::scene::graph::SceneGraph;
use crate::scene::slot::SceneSlot;
use crate::schedule::config::CyclePhaseConfig;
use crate::schedule::routing::{ChannelWeight, ChannelWeights, Routing};
use crate::schedule::{PhaseScheduler, PhaseWeights, build_scheduler};
use crate::timing::clock::Clock;

/// Options fixed for the lifetime of a [`Compositor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Size of every slot render target.
    pub target_size: TargetSize,
    /// Consecutive frames a slot may fail target allocation before `tick` errors.
    pub max_alloc_retries: u32,
    /// Composite shader program.
    pub shader: ShaderId,
}

impl CompositorOpts {
    /// Defaults for `target_size`: three allocation retries and the weighted-sum shader.
    pub fn new(target_size: TargetSize) -> Self {
        Self {
            target_size,
            max_alloc_retries: 3,
            shader: WEIGHTED_SUM_SHADER,
        }
    }
}

/// Running counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CompositorStats {
    /// Frames composited.
    pub frames: u64,
    /// Render-into-target commands issued.
    pub slot_renders: u64,
    /// Slot renders skipped because the slot did not contribute.
    pub skipped_renders: u64,
    /// Failed target allocations.
    pub alloc_failures: u64,
}

/// Owns the clock, the schedule and the slots, and turns elapsed time into composite draws.
///
/// All per-frame values are recomputed from the logical time; the clock is the only state carried
/// between frames.
#[derive(Debug)]
pub struct Compositor {
    params: CompositorParams,
    config: CyclePhaseConfig,
    routing: Routing,
    scheduler: Box<dyn PhaseScheduler>,
    clock: Clock,
    slots: Vec<SceneSlot>,
    opts: CompositorOpts,
    stats: CompositorStats,
}

impl Compositor {
    /// Validate `params` and take ownership of `slots`, which must be indexed `0..slot_count`.
    #[tracing::instrument(skip_all, fields(slots = slots.len()))]
    pub fn new(
        params: CompositorParams,
        slots: Vec<SceneSlot>,
        opts: CompositorOpts,
    ) -> CompositorResult<Self> {
        let (config, routing) = params.validate()?;
        opts.target_size.validate()?;
        if slots.len() != params.slot_count as usize {
            return Err(CompositorError::configuration(format!(
                "expected {} slots, got {}",
                params.slot_count,
                slots.len()
            )));
        }
        for (i, slot) in slots.iter().enumerate() {
            if slot.id().index() != i {
                return Err(CompositorError::configuration(format!(
                    "slot at position {i} has id {}",
                    slot.id().0
                )));
            }
        }
        let scheduler = build_scheduler(params.policy, config)?;
        let clock = Clock::new(params.time_scale)?;
        Ok(Self {
            params,
            config,
            routing,
            scheduler,
            clock,
            slots,
            opts,
            stats: CompositorStats::default(),
        })
    }

    /// Current logical time.
    pub fn t(&self) -> f64 {
        self.clock.t()
    }

    /// Clock mapping raw elapsed seconds to logical time.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Parameters currently in effect.
    pub fn params(&self) -> &CompositorParams {
        &self.params
    }

    /// Cycle configuration derived from [`Self::params`].
    pub fn config(&self) -> &CyclePhaseConfig {
        &self.config
    }

    /// Phase-to-input routing derived from [`Self::params`].
    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    /// Options fixed at construction, with the current target size.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Counters since construction.
    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Freeze logical time; ticks keep compositing the same weights.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Let logical time advance again.
    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// Whether logical time is frozen.
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Slots in index order.
    pub fn slots(&self) -> &[SceneSlot] {
        &self.slots
    }

    /// Slot `id`, if it exists.
    pub fn slot(&self, id: SlotId) -> Option<&SceneSlot> {
        self.slots.get(id.index())
    }

    /// Mutable slot access, for show/hide.
    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut SceneSlot> {
        self.slots.get_mut(id.index())
    }

    /// Render only `solo` at full weight, or return to the schedule with `None`.
    pub fn set_solo(&mut self, solo: Option<SlotId>) -> CompositorResult<()> {
        let mut params = self.params.clone();
        params.solo = solo;
        self.apply_params(params)
    }

    /// Per-phase weights at `t`.
    pub fn phase_weights_at(&self, t: f64) -> PhaseWeights {
        self.scheduler.phase_weights(t)
    }

    /// Composite inputs at `t`, ignoring slot show/hide and allocation state.
    pub fn weights_at(&self, t: f64) -> ChannelWeights {
        let phase = self.scheduler.phase_weights(t);
        self.route(t, &phase)
    }

    fn route(&self, t: f64, phase: &[f32]) -> ChannelWeights {
        let mut out = self.routing.route(&self.config, t, phase);
        if let Some(solo) = self.params.solo {
            for (i, c) in out.iter_mut().enumerate() {
                *c = if i == 0 {
                    ChannelWeight {
                        slot: solo,
                        weight: 1.0,
                    }
                } else {
                    ChannelWeight {
                        slot: c.slot,
                        weight: 0.0,
                    }
                };
            }
        }
        out
    }

    /// Replace the tunable parameters between frames. Logical time is preserved.
    ///
    /// The slot count and the number of composite inputs cannot change. Occupant schedules are
    /// moved onto the new cycle.
    #[tracing::instrument(skip_all)]
    pub fn apply_params(&mut self, params: CompositorParams) -> CompositorResult<()> {
        let (config, routing) = params.validate()?;
        if params.slot_count as usize != self.slots.len() {
            return Err(CompositorError::configuration(format!(
                "slot_count cannot change on reload ({} -> {})",
                self.slots.len(),
                params.slot_count
            )));
        }
        if routing.width() != self.routing.width() {
            return Err(CompositorError::configuration(format!(
                "composite width cannot change on reload ({} -> {})",
                self.routing.width(),
                routing.width()
            )));
        }
        let scheduler = build_scheduler(params.policy, config)?;
        let occupants = self
            .slots
            .iter()
            .map(|slot| slot.occupants().map(|o| o.retimed(&config)).transpose())
            .collect::<CompositorResult<Vec<_>>>()?;
        self.clock.set_rate(params.time_scale)?;
        for (slot, occ) in self.slots.iter_mut().zip(occupants) {
            if let Some(occ) = occ {
                slot.set_occupants(occ);
            }
        }
        self.config = config;
        self.routing = routing;
        self.scheduler = scheduler;
        self.params = params;
        tracing::debug!(t = self.clock.t(), "compositor params reloaded");
        Ok(())
    }

    /// Resize every allocated target and use `size` for future allocations.
    pub fn resize_targets<B: RenderBackend + ?Sized>(
        &mut self,
        size: TargetSize,
        backend: &mut B,
    ) -> CompositorResult<()> {
        size.validate()?;
        for slot in &self.slots {
            if let Some(target) = slot.target() {
                backend.resize_target(target, size)?;
            }
        }
        tracing::debug!(width = size.width, height = size.height, "resized slot targets");
        self.opts.target_size = size;
        Ok(())
    }

    /// Dispose every slot target. Targets are reallocated on the next tick.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> CompositorResult<()> {
        for slot in &mut self.slots {
            if let Some(target) = slot.take_target() {
                backend.dispose_target(target)?;
            }
        }
        Ok(())
    }

    /// Advance the clock by `dt` raw seconds and draw one frame.
    ///
    /// A slot whose target cannot be allocated is left out of this frame and retried on the next;
    /// once it has failed more than `max_alloc_retries` frames in a row the error is returned.
    /// The clock has already advanced by `dt` when that error is returned.
    #[tracing::instrument(level = "debug", skip(self, host))]
    pub fn tick<H: RenderBackend + SceneGraph + ?Sized>(
        &mut self,
        dt: f64,
        host: &mut H,
    ) -> CompositorResult<CompositeCommand> {
        let t = self.clock.advance(dt);
        let phase_weights = self.scheduler.phase_weights(t);
        let channels = self.route(t, &phase_weights);

        let degraded = self.ensure_targets(host)?;

        for slot in &mut self.slots {
            let weight: f32 = if degraded.contains(&slot.id()) {
                0.0
            } else {
                channels
                    .iter()
                    .filter(|c| c.slot == slot.id())
                    .map(|c| c.weight)
                    .sum()
            };
            slot.set_frame_weight(weight);
        }

        for slot in &self.slots {
            slot.pose(t, self.params.spread, host)?;
        }

        let mut rendered = SmallVec::new();
        for slot in &self.slots {
            if slot.render(host)? {
                rendered.push(slot.id());
                self.stats.slot_renders += 1;
            } else {
                self.stats.skipped_renders += 1;
            }
        }

        let entries: BlendWeights = channels
            .iter()
            .map(|c| match self.slots.get(c.slot.index()) {
                Some(slot) if slot.is_visible() => BlendEntry {
                    slot: c.slot,
                    texture: slot.texture(),
                    weight: c.weight.clamp(0.0, 1.0),
                },
                Some(slot) => BlendEntry {
                    slot: c.slot,
                    texture: slot.texture(),
                    weight: 0.0,
                },
                None => BlendEntry {
                    slot: c.slot,
                    texture: None,
                    weight: 0.0,
                },
            })
            .collect();

        let textures: SmallVec<[Option<TextureId>; 3]> =
            entries.iter().map(|e| e.texture).collect();
        let weights: SmallVec<[f32; 3]> = entries.iter().map(|e| e.weight).collect();
        host.draw_fullscreen_composite(&textures, &weights, self.opts.shader)?;

        let cmd = CompositeCommand {
            frame: self.stats.frames,
            t,
            shader: self.opts.shader,
            entries,
            phase_weights,
            rendered,
            degraded,
        };
        self.stats.frames += 1;
        Ok(cmd)
    }

    fn ensure_targets<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> CompositorResult<SmallVec<[SlotId; 3]>> {
        let mut degraded = SmallVec::new();
        for slot in &mut self.slots {
            if slot.target().is_some() {
                continue;
            }
            match backend.create_target(self.opts.target_size) {
                Ok(target) => {
                    let texture = match backend.target_texture(target) {
                        Ok(texture) => texture,
                        Err(e) => {
                            backend.dispose_target(target)?;
                            return Err(e);
                        }
                    };
                    slot.attach_target(target, texture);
                    tracing::debug!(
                        slot = slot.id().0,
                        target_id = target.0,
                        "attached slot target"
                    );
                }
                Err(e) if e.is_resource() => {
                    self.stats.alloc_failures += 1;
                    let failures = slot.note_alloc_failure();
                    if failures > self.opts.max_alloc_retries {
                        return Err(CompositorError::resource(format!(
                            "slot {} failed to allocate a render target {failures} frames in a row: {e}",
                            slot.id().0
                        )));
                    }
                    tracing::warn!(
                        slot = slot.id().0,
                        failures,
                        error = %e,
                        "compositing without slot"
                    );
                    degraded.push(slot.id());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(degraded)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/compositor.rs"]
mod tests;
