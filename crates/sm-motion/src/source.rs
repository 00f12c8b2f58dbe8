//! `SourceMotion` — one source's state plus its active components, and the
//! per-frame composition step.

use std::collections::BTreeMap;

use tracing::warn;

use sm_core::SourceId;

use crate::component::{ComponentKind, FrameContext, MotionComponent};
use crate::state::{MotionDelta, MotionState};

/// One source: its pose and the set of motion effects currently driving it.
///
/// Components are keyed by [`ComponentKind`], which gives two invariants for
/// free: at most one component per kind (installing a second replaces the
/// first), and a stable per-frame iteration order (the kind's declaration
/// order) independent of installation order.
pub struct SourceMotion {
    pub id: SourceId,
    pub state: MotionState,
    components: BTreeMap<ComponentKind, Box<dyn MotionComponent>>,
}

impl SourceMotion {
    /// A source at rest at `position` with no components.
    pub fn new(id: SourceId, position: sm_core::Vec3) -> Self {
        Self {
            id,
            state: MotionState::at(position),
            components: BTreeMap::new(),
        }
    }

    // ── Component management ──────────────────────────────────────────────

    /// Install `component`, replacing any existing component of the same kind.
    pub fn install(&mut self, component: Box<dyn MotionComponent>) {
        self.components.insert(component.kind(), component);
    }

    /// Remove and return the component of `kind`, if installed.
    pub fn remove(&mut self, kind: ComponentKind) -> Option<Box<dyn MotionComponent>> {
        self.components.remove(&kind)
    }

    /// Enable or disable the component of `kind`.  Returns `false` if none
    /// is installed.  Disabling preserves interpolation state; re-enabling
    /// resumes where the component left off.
    pub fn set_component_enabled(&mut self, kind: ComponentKind, enabled: bool) -> bool {
        match self.components.get_mut(&kind) {
            Some(c) => {
                c.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// `true` if a component of `kind` is installed (enabled or not).
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Installed kinds in evaluation order.
    pub fn component_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    /// Downcast the component of `kind` to its concrete type.
    pub fn component<T: 'static>(&self, kind: ComponentKind) -> Option<&T> {
        self.components
            .get(&kind)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Mutable downcast of the component of `kind`.
    pub fn component_mut<T: 'static>(&mut self, kind: ComponentKind) -> Option<&mut T> {
        self.components
            .get_mut(&kind)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    // ── Composition ───────────────────────────────────────────────────────

    /// Advance this source by one frame.
    ///
    /// Every enabled component is evaluated exactly once against the
    /// frame-start state; their deltas are summed field-wise and committed in
    /// one step.  A failing component's contribution is dropped for this
    /// frame and logged; the frame never aborts.
    pub fn advance(&mut self, ctx: &FrameContext) {
        let frame_start = self.state;
        let mut total = MotionDelta::NONE;

        for (kind, component) in self.components.iter_mut() {
            if !component.enabled() {
                continue;
            }
            match component.calculate_delta(&frame_start, ctx) {
                Ok(delta) => total.merge(&delta),
                Err(e) => {
                    warn!(source = %self.id, component = %kind, error = %e,
                          "component failed; contribution skipped this frame");
                }
            }
        }

        self.commit(frame_start, total, ctx);
    }

    /// Apply the accumulated delta: clamp against the configured bounds,
    /// refuse non-finite fields, derive velocity and distance when no
    /// component drove them explicitly.
    fn commit(&mut self, frame_start: MotionState, total: MotionDelta, ctx: &FrameContext) {
        let limits = ctx.limits;

        if let Some(dp) = total.position {
            if !dp.is_finite() {
                warn!(source = %self.id, "non-finite position delta dropped");
            } else {
                let clamped = dp.clamped_length(limits.max_position_step);
                if clamped != dp {
                    warn!(source = %self.id, step = dp.length(),
                          max = limits.max_position_step,
                          "position delta clamped (numeric divergence)");
                }
                self.state.position += clamped;
            }
        }

        if let Some(dr) = total.orientation {
            if !dr.is_finite() {
                warn!(source = %self.id, "non-finite orientation delta dropped");
            } else {
                let clamped = dr.clamped_abs(limits.max_angle_step);
                if clamped != dr {
                    warn!(source = %self.id, step = dr.max_abs(),
                          max = limits.max_angle_step,
                          "orientation delta clamped (numeric divergence)");
                }
                self.state.orientation += clamped;
            }
        }

        if let Some(da) = total.aperture {
            if da.is_finite() {
                self.state.aperture = (self.state.aperture + da).max(0.0);
            } else {
                warn!(source = %self.id, "non-finite aperture delta dropped");
            }
        }

        // Velocity: explicit delta wins; otherwise derive from the committed
        // position change.  A zero-dt frame moves nothing and leaves the
        // previous velocity untouched.
        match total.velocity {
            Some(dv) if dv.is_finite() => self.state.velocity += dv,
            Some(_) => warn!(source = %self.id, "non-finite velocity delta dropped"),
            None if ctx.dt > 0.0 => {
                self.state.velocity =
                    (self.state.position - frame_start.position) * (1.0 / ctx.dt);
            }
            None => {}
        }

        // Distance: explicit delta wins; otherwise track the listener-origin
        // distance implied by the committed position.
        match total.distance {
            Some(dd) if dd.is_finite() => {
                self.state.distance = (self.state.distance + dd).max(0.0);
            }
            Some(_) => warn!(source = %self.id, "non-finite distance delta dropped"),
            None => self.state.distance = self.state.position.length(),
        }
    }
}
