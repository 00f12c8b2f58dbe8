//! The per-frame motion scheduler.
//!
//! # Frame model
//!
//! The host calls [`MotionEngine::update`] once per frame.  Each frame:
//!
//! 1. The clock measures (and caps) `dt`.
//! 2. Every macro's live center is computed from its members' *committed*
//!    frame-start positions — before any source moves, so every
//!    center-relative component in the frame sees the same value.
//! 3. Every source advances, in ascending [`SourceId`] order: its enabled
//!    components each produce one additive delta, the deltas are summed and
//!    committed once.
//! 4. The committed poses are handed to the output sink.  Sink errors are
//!    logged, never propagated — a dead renderer costs packets, not motion.
//!
//! Commands (create/delete, install effects, enable/disable) validate all
//! their inputs before mutating anything, so a failed command leaves the
//! scene untouched.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use sm_core::{EngineConfig, EulerAngles, FrameClock, MacroId, SourceId, SourceRng, Vec3};
use sm_motion::{
    ComponentKind, Concentration, ConcentrationState, EasingCurve, FrameContext, MacroRotation,
    ManualRotation, ManualRotationSpec, MotionState, PlaybackMode, SourceMotion, Trajectory,
    TrajectorySpec,
};

use crate::error::{EngineError, EngineResult};
use crate::formation::Formation;
use crate::macro_group::{MacroGroup, MacroInfo};
use crate::sink::{FrameSnapshot, NullSink, OutputSink, SinkResult, SourcePose};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── Command targets ───────────────────────────────────────────────────────────

/// What a motion command applies to: one source, or every member of a macro.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Source(SourceId),
    Macro(MacroId),
}

impl From<SourceId> for Target {
    fn from(id: SourceId) -> Self {
        Target::Source(id)
    }
}

impl From<MacroId> for Target {
    fn from(id: MacroId) -> Self {
        Target::Macro(id)
    }
}

/// How a macro acquires its members.
#[derive(Clone, Debug)]
pub enum MacroMembers {
    /// Spawn `count` new sources laid out in `formation` around `origin`.
    Spawn {
        count:     usize,
        formation: Formation,
        origin:    Vec3,
        spacing:   f32,
    },
    /// Group sources that already exist.
    Existing(Vec<SourceId>),
}

/// What happens to a macro's members when the macro is deleted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MacroDeletion {
    /// Members survive as free sources; group-scale components are removed,
    /// individual-scale ones keep running.
    Detach,
    /// Members are deleted along with the macro.
    RemoveSources,
}

/// Component kinds installed by group-scale commands, stripped on detach.
const GROUP_KINDS: [ComponentKind; 4] = [
    ComponentKind::Concentration,
    ComponentKind::MacroTrajectory,
    ComponentKind::MacroRotation,
    ComponentKind::ManualMacroRotation,
];

// ── MotionEngine ──────────────────────────────────────────────────────────────

/// The motion scheduler: owns every source and macro, advances them each
/// frame, and streams committed poses to its output sink.
pub struct MotionEngine<S: OutputSink = NullSink> {
    config: EngineConfig,
    clock:  FrameClock,
    sink:   S,

    sources:     BTreeMap<SourceId, SourceMotion>,
    next_source: u32,

    macros:     BTreeMap<MacroId, MacroGroup>,
    next_macro: u16,
    /// Macro lookup by name.  Names are unique.
    names: Map<String, MacroId>,
    /// Which macro each grouped source belongs to.  A source belongs to at
    /// most one macro.
    membership: Map<SourceId, MacroId>,

    /// Frame-start macro centers, recomputed at the top of every frame.
    centers: BTreeMap<MacroId, Vec3>,
    /// Reused pose buffer for sink snapshots.
    pose_buf: Vec<SourcePose>,
}

impl MotionEngine<NullSink> {
    /// An engine with no output, for tests and offline use.
    pub fn headless(config: EngineConfig) -> Self {
        Self::new(config, NullSink)
    }
}

impl<S: OutputSink> MotionEngine<S> {
    pub fn new(config: EngineConfig, sink: S) -> Self {
        let clock = config.make_clock();
        Self {
            config,
            clock,
            sink,
            sources:     BTreeMap::new(),
            next_source: 0,
            macros:      BTreeMap::new(),
            next_macro:  0,
            names:       Map::default(),
            membership:  Map::default(),
            centers:     BTreeMap::new(),
            pose_buf:    Vec::new(),
        }
    }

    // ── Sources ───────────────────────────────────────────────────────────

    /// Create a free source at rest at `position`.
    pub fn create_source(&mut self, position: Vec3) -> SourceId {
        let id = SourceId(self.next_source);
        self.next_source += 1;
        self.sources.insert(id, SourceMotion::new(id, position));
        debug!(source = %id, %position, "source created");
        id
    }

    /// Delete a source.  Its macro, if any, shrinks; a macro whose last
    /// member disappears is deleted too.
    pub fn remove_source(&mut self, id: SourceId) -> EngineResult<()> {
        if self.sources.remove(&id).is_none() {
            return Err(EngineError::UnknownSource(id));
        }
        if let Some(macro_id) = self.membership.remove(&id)
            && let Some(group) = self.macros.get_mut(&macro_id)
        {
            group.remove_member(id);
            if group.is_empty() {
                let name = group.name().to_owned();
                self.macros.remove(&macro_id);
                self.names.remove(&name);
                debug!(%macro_id, name, "macro emptied by source removal, deleted");
            }
        }
        Ok(())
    }

    pub fn source(&self, id: SourceId) -> Option<&SourceMotion> {
        self.sources.get(&id)
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut SourceMotion> {
        self.sources.get_mut(&id)
    }

    /// Committed pose of `id`.
    pub fn source_state(&self, id: SourceId) -> EngineResult<MotionState> {
        self.sources
            .get(&id)
            .map(|s| s.state)
            .ok_or(EngineError::UnknownSource(id))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// All sources in ascending ID order.
    pub fn sources(&self) -> impl Iterator<Item = &SourceMotion> {
        self.sources.values()
    }

    // ── Macros ────────────────────────────────────────────────────────────

    /// Create a named macro.  Validates everything before allocating: on
    /// error, no sources were spawned and no IDs were consumed.
    pub fn create_macro(&mut self, name: &str, members: MacroMembers) -> EngineResult<MacroId> {
        if name.is_empty() {
            return Err(EngineError::Config("macro name must not be empty"));
        }
        if self.names.contains_key(name) {
            return Err(EngineError::DuplicateMacroName(name.to_owned()));
        }
        let id = MacroId(self.next_macro);

        let member_ids = match members {
            MacroMembers::Existing(ids) => {
                if ids.is_empty() {
                    return Err(EngineError::EmptyMacro);
                }
                for (i, &sid) in ids.iter().enumerate() {
                    if !self.sources.contains_key(&sid) {
                        return Err(EngineError::UnknownSource(sid));
                    }
                    if let Some(&owner) = self.membership.get(&sid) {
                        return Err(EngineError::DuplicateSource(sid, owner));
                    }
                    if ids[..i].contains(&sid) {
                        return Err(EngineError::DuplicateSource(sid, id));
                    }
                }
                ids
            }
            MacroMembers::Spawn { count, formation, origin, spacing } => {
                if count == 0 {
                    return Err(EngineError::EmptyMacro);
                }
                formation
                    .layout(count, spacing)
                    .into_iter()
                    .map(|offset| self.create_source(origin + offset))
                    .collect()
            }
        };

        self.next_macro += 1;
        for &sid in &member_ids {
            self.membership.insert(sid, id);
        }
        self.names.insert(name.to_owned(), id);
        self.macros
            .insert(id, MacroGroup::new(id, name.to_owned(), member_ids));
        debug!(macro_id = %id, name, members = self.macros[&id].len(), "macro created");
        Ok(id)
    }

    /// Delete a macro, detaching or deleting its members per `policy`.
    pub fn delete_macro(&mut self, id: MacroId, policy: MacroDeletion) -> EngineResult<()> {
        let group = self
            .macros
            .remove(&id)
            .ok_or(EngineError::UnknownMacro(id))?;
        self.names.remove(group.name());

        for &sid in group.members() {
            self.membership.remove(&sid);
            match policy {
                MacroDeletion::RemoveSources => {
                    self.sources.remove(&sid);
                }
                MacroDeletion::Detach => {
                    if let Some(src) = self.sources.get_mut(&sid) {
                        for kind in GROUP_KINDS {
                            src.remove(kind);
                        }
                    }
                }
            }
        }
        debug!(macro_id = %id, name = group.name(), ?policy, "macro deleted");
        Ok(())
    }

    pub fn macro_group(&self, id: MacroId) -> Option<&MacroGroup> {
        self.macros.get(&id)
    }

    pub fn macro_by_name(&self, name: &str) -> Option<MacroId> {
        self.names.get(name).copied()
    }

    /// Live center of a macro: the mean of its members' committed positions.
    pub fn macro_center(&self, id: MacroId) -> EngineResult<Vec3> {
        let group = self.macros.get(&id).ok_or(EngineError::UnknownMacro(id))?;
        Ok(self.center_of(group))
    }

    /// Summaries of every macro, for scene introspection.
    pub fn list_macros(&self) -> Vec<MacroInfo> {
        self.macros
            .values()
            .map(|g| MacroInfo {
                id:      g.id(),
                name:    g.name().to_owned(),
                members: g.len(),
                center:  self.center_of(g),
            })
            .collect()
    }

    fn center_of(&self, group: &MacroGroup) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut n = 0u32;
        for &sid in group.members() {
            if let Some(src) = self.sources.get(&sid) {
                sum += src.state.position;
                n += 1;
            }
        }
        if n > 0 { sum * (1.0 / n as f32) } else { Vec3::ZERO }
    }

    /// Validated member list for a command target.
    fn resolve(&self, target: Target) -> EngineResult<Vec<SourceId>> {
        match target {
            Target::Source(id) => {
                if self.sources.contains_key(&id) {
                    Ok(vec![id])
                } else {
                    Err(EngineError::UnknownSource(id))
                }
            }
            Target::Macro(id) => self
                .macros
                .get(&id)
                .map(|g| g.members().to_vec())
                .ok_or(EngineError::UnknownMacro(id)),
        }
    }

    // ── Motion commands ───────────────────────────────────────────────────

    /// Install an individual trajectory.
    ///
    /// Applied to a macro, each member gets its own copy with its phase
    /// staggered by `i · τ / n`, so members spread evenly along the shape
    /// instead of moving in lockstep.
    pub fn set_trajectory(&mut self, target: Target, spec: TrajectorySpec) -> EngineResult<()> {
        let members = self.resolve(target)?;
        let n = members.len() as f32;
        let seed = self.config.seed;
        let stagger = matches!(target, Target::Macro(_));

        for (i, sid) in members.into_iter().enumerate() {
            let mut spec = spec;
            if stagger {
                spec.phase += i as f32 / n * std::f32::consts::TAU;
            }
            let src = self.sources.get_mut(&sid).ok_or(EngineError::UnknownSource(sid))?;
            let mut traj = Trajectory::individual(spec, src.state.position);
            if matches!(spec.mode, PlaybackMode::RandomWalk) {
                traj = traj.with_rng(SourceRng::new(seed, sid));
            }
            src.install(Box::new(traj));
        }
        Ok(())
    }

    /// Install a macro trajectory: every member follows the same path in
    /// lockstep, moving the group as a whole.
    pub fn set_macro_trajectory(&mut self, id: MacroId, spec: TrajectorySpec) -> EngineResult<()> {
        let members = self.resolve(Target::Macro(id))?;
        let center = self.macro_center(id)?;
        let seed = self.config.seed;

        for sid in members {
            let src = self.sources.get_mut(&sid).ok_or(EngineError::UnknownSource(sid))?;
            let mut traj = Trajectory::for_macro(spec, center);
            if matches!(spec.mode, PlaybackMode::RandomWalk) {
                // The whole group shares one jitter stream so it drifts as a
                // unit: seed from the macro, not the member.
                traj = traj.with_rng(SourceRng::new(seed, SourceId(id.0 as u32)));
            }
            src.install(Box::new(traj));
        }
        Ok(())
    }

    /// Set the concentration factor immediately (1 = dispersed, 0 = fully
    /// concentrated at `point`).  Cancels any running factor animation.
    pub fn set_concentration(
        &mut self,
        target: Target,
        factor: f32,
        point:  Vec3,
    ) -> EngineResult<()> {
        self.with_concentration(target, point, |c| c.set_factor(factor))
    }

    /// Animate the concentration factor to `factor` over `duration` seconds.
    pub fn animate_concentration(
        &mut self,
        target:   Target,
        factor:   f32,
        duration: f32,
        curve:    EasingCurve,
        point:    Vec3,
    ) -> EngineResult<()> {
        self.with_concentration(target, point, |c| c.animate(factor, duration, curve))
    }

    fn with_concentration(
        &mut self,
        target: Target,
        point:  Vec3,
        f: impl Fn(&mut Concentration),
    ) -> EngineResult<()> {
        let members = self.resolve(target)?;
        for sid in members {
            let src = self.sources.get_mut(&sid).ok_or(EngineError::UnknownSource(sid))?;
            match src.component_mut::<Concentration>(ComponentKind::Concentration) {
                Some(existing) => {
                    existing.set_target(point);
                    f(existing);
                }
                None => {
                    // Fresh component starts dispersed; the command then
                    // drives it exactly like an existing one.
                    let mut c = Concentration::new(1.0, point);
                    f(&mut c);
                    src.install(Box::new(c));
                }
            }
        }
        Ok(())
    }

    /// Current concentration state of a macro (from its first member — all
    /// members share the commanded factor).  `None` if no concentration is
    /// installed.
    pub fn concentration_state(&self, id: MacroId) -> EngineResult<Option<ConcentrationState>> {
        let group = self.macros.get(&id).ok_or(EngineError::UnknownMacro(id))?;
        let first = group.members().first().copied().ok_or(EngineError::EmptyMacro)?;
        Ok(self
            .sources
            .get(&first)
            .and_then(|s| s.component::<Concentration>(ComponentKind::Concentration))
            .map(Concentration::state))
    }

    /// Constant-rate algorithmic rotation of a macro about its live center.
    pub fn set_macro_rotation(&mut self, id: MacroId, rates: EulerAngles) -> EngineResult<()> {
        let members = self.resolve(Target::Macro(id))?;
        for sid in members {
            let src = self.sources.get_mut(&sid).ok_or(EngineError::UnknownSource(sid))?;
            src.install(Box::new(MacroRotation::new(rates)));
        }
        Ok(())
    }

    /// Manually-driven interpolated rotation toward `angles` about `center`.
    ///
    /// Without an explicit center, a macro rotates about the group center
    /// captured *now*, and a single source about its own position
    /// (orientation-only).  Repeating the command retargets the existing
    /// interpolation without restarting it, which is what a fader or encoder
    /// being nudged expects.
    pub fn set_manual_rotation(
        &mut self,
        target: Target,
        angles: EulerAngles,
        speed:  f32,
        center: Option<Vec3>,
    ) -> EngineResult<()> {
        let members = self.resolve(target)?;
        let (kind, default_center) = match target {
            Target::Macro(id) => (ComponentKind::ManualMacroRotation, Some(self.macro_center(id)?)),
            Target::Source(_) => (ComponentKind::ManualIndividualRotation, None),
        };
        let center = center.or(default_center);

        for sid in members {
            let src = self.sources.get_mut(&sid).ok_or(EngineError::UnknownSource(sid))?;
            if let Some(existing) = src.component_mut::<ManualRotation>(kind) {
                existing.set_target(angles);
                existing.set_speed(speed);
                if let Some(c) = center {
                    existing.set_center(c);
                }
                continue;
            }
            let spec = ManualRotationSpec {
                target: angles,
                speed,
                center: center.unwrap_or(src.state.position),
            };
            let component = match kind {
                ComponentKind::ManualMacroRotation => ManualRotation::for_macro(spec),
                _ => ManualRotation::individual(spec),
            };
            src.install(Box::new(component));
        }
        Ok(())
    }

    /// Discard a manual rotation's progress so its full target applies again.
    pub fn reset_manual_rotation(&mut self, target: Target) -> EngineResult<()> {
        let members = self.resolve(target)?;
        let kind = match target {
            Target::Macro(_)  => ComponentKind::ManualMacroRotation,
            Target::Source(_) => ComponentKind::ManualIndividualRotation,
        };
        for sid in members {
            if let Some(src) = self.sources.get_mut(&sid)
                && let Some(rot) = src.component_mut::<ManualRotation>(kind)
            {
                rot.reset();
            }
        }
        Ok(())
    }

    /// Enable or disable a component on every resolved member.  Members
    /// without that component are skipped.
    pub fn set_component_enabled(
        &mut self,
        target:  Target,
        kind:    ComponentKind,
        enabled: bool,
    ) -> EngineResult<()> {
        let members = self.resolve(target)?;
        for sid in members {
            if let Some(src) = self.sources.get_mut(&sid)
                && !src.set_component_enabled(kind, enabled)
            {
                debug!(source = %sid, component = %kind, "enable toggle on missing component");
            }
        }
        Ok(())
    }

    /// Remove a component from every resolved member.
    pub fn remove_component(&mut self, target: Target, kind: ComponentKind) -> EngineResult<()> {
        let members = self.resolve(target)?;
        for sid in members {
            if let Some(src) = self.sources.get_mut(&sid) {
                src.remove(kind);
            }
        }
        Ok(())
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Advance one frame using wall-clock timing.
    pub fn update(&mut self) {
        let dt = self.clock.tick();
        self.frame_step(dt);
    }

    /// Advance one frame by an exact `dt` (offline rendering and tests).
    pub fn update_with_dt(&mut self, dt: f32) {
        let dt = self.clock.tick_fixed(dt);
        self.frame_step(dt);
    }

    fn frame_step(&mut self, dt: f32) {
        // Macro centers from committed frame-start positions, before anything
        // moves.
        self.centers.clear();
        for (&id, group) in &self.macros {
            let mut sum = Vec3::ZERO;
            let mut n = 0u32;
            for &sid in group.members() {
                if let Some(src) = self.sources.get(&sid) {
                    sum += src.state.position;
                    n += 1;
                }
            }
            if n > 0 {
                self.centers.insert(id, sum * (1.0 / n as f32));
            }
        }

        let elapsed = self.clock.elapsed_secs();
        for (&sid, src) in self.sources.iter_mut() {
            let macro_center = self
                .membership
                .get(&sid)
                .and_then(|m| self.centers.get(m))
                .copied();
            let ctx = FrameContext {
                dt,
                elapsed,
                macro_center,
                limits: self.config.limits,
            };
            src.advance(&ctx);
        }

        self.pose_buf.clear();
        self.pose_buf.extend(
            self.sources
                .values()
                .map(|s| SourcePose { id: s.id, state: s.state }),
        );
        let snapshot = FrameSnapshot {
            frame:   self.clock.frame(),
            elapsed,
            dt,
            poses:   &self.pose_buf,
        };
        if let Err(e) = self.sink.send_frame(&snapshot) {
            warn!(frame = snapshot.frame, error = %e, "output sink failed, frame dropped");
        }
    }

    // ── Introspection / lifecycle ─────────────────────────────────────────

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.clock.elapsed_secs()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Flush the output sink (call once at shutdown).
    pub fn flush(&mut self) -> SinkResult<()> {
        self.sink.flush()
    }
}
