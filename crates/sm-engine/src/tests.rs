//! Integration-level tests for the scheduler.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use sm_core::{EngineConfig, EulerAngles, SourceId, Vec3};
use sm_motion::{
    ComponentKind, EasingCurve, MotionState, PlaybackMode, Trajectory, TrajectoryShape,
    TrajectorySpec,
};

use crate::engine::{MacroDeletion, MacroMembers, MotionEngine, Target};
use crate::error::EngineError;
use crate::formation::Formation;
use crate::sink::{FrameSnapshot, OutputSink, SinkResult, SourcePose};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 60.0;

fn engine() -> MotionEngine {
    MotionEngine::headless(EngineConfig::default())
}

fn run(engine: &mut MotionEngine<impl OutputSink>, frames: usize) {
    for _ in 0..frames {
        engine.update_with_dt(DT);
    }
}

fn circle_spec(radius: f32, speed: f32) -> TrajectorySpec {
    TrajectorySpec {
        shape: TrajectoryShape::Circle { radius },
        mode:  PlaybackMode::Loop,
        speed,
        phase: 0.0,
    }
}

/// A capture sink for asserting what the engine emits.
#[derive(Default)]
struct CaptureSink {
    frames: Vec<(u64, Vec<SourcePose>)>,
}

impl OutputSink for CaptureSink {
    fn send_position(&mut self, _id: SourceId, _position: Vec3) -> SinkResult<()> {
        unreachable!("engine uses send_frame");
    }

    fn send_orientation(&mut self, _id: SourceId, _orientation: sm_core::EulerAngles) -> SinkResult<()> {
        unreachable!("engine uses send_frame");
    }

    fn send_frame(&mut self, frame: &FrameSnapshot<'_>) -> SinkResult<()> {
        self.frames.push((frame.frame, frame.poses.to_vec()));
        Ok(())
    }
}

// ── Formations ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod formation {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn layouts_return_exact_count() {
        for f in [
            Formation::Circle,
            Formation::Line,
            Formation::Grid { columns: 3 },
            Formation::Sphere,
        ] {
            for n in [1, 2, 7, 16] {
                assert_eq!(f.layout(n, 1.0).len(), n, "{f:?} n={n}");
            }
        }
    }

    #[test]
    fn line_is_centered_with_uniform_spacing() {
        let pts = Formation::Line.layout(5, 2.0);
        assert_abs_diff_eq!(pts[2].x, 0.0, epsilon = 1e-6);
        for w in pts.windows(2) {
            assert_abs_diff_eq!(w[1].x - w[0].x, 2.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn circle_members_share_a_radius() {
        let pts = Formation::Circle.layout(8, 1.0);
        let r = pts[0].length();
        for p in &pts {
            assert_abs_diff_eq!(p.length(), r, epsilon = 1e-5);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn grid_wraps_rows() {
        let pts = Formation::Grid { columns: 3 }.layout(6, 1.0);
        // Two rows of three: y takes exactly two distinct values.
        assert_abs_diff_eq!(pts[0].y, pts[1].y, epsilon = 1e-6);
        assert!((pts[3].y - pts[0].y).abs() > 0.5);
    }

    #[test]
    fn sphere_members_share_a_radius() {
        let pts = Formation::Sphere.layout(20, 1.0);
        let r = pts[0].length();
        assert!(r > 0.0);
        for p in &pts {
            approx::assert_abs_diff_eq!(p.length(), r, epsilon = 1e-4);
        }
    }
}

// ── Scene management ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scene {
    use super::*;

    #[test]
    fn macro_names_are_unique() {
        let mut e = engine();
        let a = e.create_source(Vec3::ZERO);
        let b = e.create_source(Vec3::new(1.0, 0.0, 0.0));
        e.create_macro("pair", MacroMembers::Existing(vec![a])).unwrap();
        let err = e
            .create_macro("pair", MacroMembers::Existing(vec![b]))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateMacroName("pair".into()));
    }

    #[test]
    fn grouping_validates_before_allocating() {
        let mut e = engine();
        let a = e.create_source(Vec3::ZERO);
        e.create_macro("one", MacroMembers::Existing(vec![a])).unwrap();

        // `a` is taken; the command must fail without creating "two".
        let b = e.create_source(Vec3::ZERO);
        let err = e
            .create_macro("two", MacroMembers::Existing(vec![b, a]))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateSource(id, _) if id == a));
        assert!(e.macro_by_name("two").is_none());
        assert!(e.macro_group(e.macro_by_name("one").unwrap()).unwrap().contains(a));
    }

    #[test]
    fn empty_and_unknown_members_are_rejected() {
        let mut e = engine();
        assert_eq!(
            e.create_macro("m", MacroMembers::Existing(vec![])).unwrap_err(),
            EngineError::EmptyMacro,
        );
        let ghost = SourceId(99);
        assert_eq!(
            e.create_macro("m", MacroMembers::Existing(vec![ghost])).unwrap_err(),
            EngineError::UnknownSource(ghost),
        );
        assert_eq!(
            e.create_macro("m", MacroMembers::Spawn {
                count:     0,
                formation: Formation::Line,
                origin:    Vec3::ZERO,
                spacing:   1.0,
            })
            .unwrap_err(),
            EngineError::EmptyMacro,
        );
    }

    #[test]
    fn spawned_members_are_laid_out_around_origin() {
        let mut e = engine();
        let origin = Vec3::new(0.0, 5.0, 1.0);
        let id = e
            .create_macro("ring", MacroMembers::Spawn {
                count:     6,
                formation: Formation::Circle,
                origin,
                spacing:   1.0,
            })
            .unwrap();
        assert_eq!(e.source_count(), 6);
        let center = e.macro_center(id).unwrap();
        approx::assert_abs_diff_eq!(center.distance(origin), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn detach_strips_group_components_only() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     2,
                formation: Formation::Line,
                origin:    Vec3::ZERO,
                spacing:   2.0,
            })
            .unwrap();
        let members = e.macro_group(id).unwrap().members().to_vec();

        e.set_macro_rotation(id, EulerAngles::new(1.0, 0.0, 0.0)).unwrap();
        e.set_trajectory(Target::Source(members[0]), circle_spec(1.0, 1.0)).unwrap();

        e.delete_macro(id, MacroDeletion::Detach).unwrap();
        assert_eq!(e.source_count(), 2);
        let s0 = e.source(members[0]).unwrap();
        assert!(!s0.has_component(ComponentKind::MacroRotation));
        assert!(s0.has_component(ComponentKind::IndividualTrajectory));
    }

    #[test]
    fn delete_with_sources_removes_everything() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     3,
                formation: Formation::Line,
                origin:    Vec3::ZERO,
                spacing:   1.0,
            })
            .unwrap();
        e.delete_macro(id, MacroDeletion::RemoveSources).unwrap();
        assert_eq!(e.source_count(), 0);
        assert!(e.macro_by_name("g").is_none());
        // The name is free again.
        e.create_macro("g", MacroMembers::Spawn {
            count:     1,
            formation: Formation::Line,
            origin:    Vec3::ZERO,
            spacing:   1.0,
        })
        .unwrap();
    }

    #[test]
    fn removing_the_last_member_deletes_the_macro() {
        let mut e = engine();
        let a = e.create_source(Vec3::ZERO);
        let id = e.create_macro("solo", MacroMembers::Existing(vec![a])).unwrap();
        e.remove_source(a).unwrap();
        assert!(e.macro_group(id).is_none());
        assert!(e.macro_by_name("solo").is_none());
    }

    #[test]
    fn commands_on_unknown_targets_fail_cleanly() {
        let mut e = engine();
        assert!(matches!(
            e.set_trajectory(Target::Source(SourceId(5)), circle_spec(1.0, 1.0)),
            Err(EngineError::UnknownSource(_)),
        ));
        assert!(matches!(
            e.set_macro_rotation(sm_core::MacroId(3), EulerAngles::ZERO),
            Err(EngineError::UnknownMacro(_)),
        ));
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod frames {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn sink_receives_every_frame_in_source_order() {
        let mut e = MotionEngine::new(EngineConfig::default(), CaptureSink::default());
        e.create_source(Vec3::new(1.0, 0.0, 0.0));
        e.create_source(Vec3::new(2.0, 0.0, 0.0));
        run(&mut e, 3);

        let frames = &e.sink().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].0, 1);
        assert_eq!(frames[2].0, 3);
        for (_, poses) in frames {
            assert_eq!(poses.len(), 2);
            assert!(poses[0].id < poses[1].id);
        }
    }

    #[test]
    fn zero_dt_frame_changes_no_pose() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     3,
                formation: Formation::Circle,
                origin:    Vec3::ZERO,
                spacing:   1.0,
            })
            .unwrap();
        e.set_macro_rotation(id, EulerAngles::new(1.0, 0.0, 0.0)).unwrap();
        e.set_trajectory(Target::Macro(id), circle_spec(1.0, 2.0)).unwrap();
        run(&mut e, 10);

        let before: Vec<MotionState> = e.sources().map(|s| s.state).collect();
        e.update_with_dt(0.0);
        let after: Vec<MotionState> = e.sources().map(|s| s.state).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn macro_members_get_staggered_phases() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     4,
                formation: Formation::Line,
                origin:    Vec3::ZERO,
                spacing:   1.0,
            })
            .unwrap();
        e.set_trajectory(Target::Macro(id), circle_spec(1.0, 1.0)).unwrap();

        let members = e.macro_group(id).unwrap().members().to_vec();
        for (i, &sid) in members.iter().enumerate() {
            let t = e
                .source(sid)
                .unwrap()
                .component::<Trajectory>(ComponentKind::IndividualTrajectory)
                .unwrap();
            assert_abs_diff_eq!(t.phase(), i as f32 * TAU / 4.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn macro_trajectory_moves_members_in_lockstep() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     2,
                formation: Formation::Line,
                origin:    Vec3::new(0.0, 3.0, 0.0),
                spacing:   2.0,
            })
            .unwrap();
        let members = e.macro_group(id).unwrap().members().to_vec();
        let starts: Vec<Vec3> = members
            .iter()
            .map(|&m| e.source_state(m).unwrap().position)
            .collect();

        e.set_macro_trajectory(id, circle_spec(1.5, 2.0)).unwrap();
        run(&mut e, 45);

        let d0 = e.source_state(members[0]).unwrap().position - starts[0];
        let d1 = e.source_state(members[1]).unwrap().position - starts[1];
        assert_abs_diff_eq!(d0.x, d1.x, epsilon = 1e-5);
        assert_abs_diff_eq!(d0.y, d1.y, epsilon = 1e-5);
        assert_abs_diff_eq!(d0.z, d1.z, epsilon = 1e-5);
        assert!(d0.length() > 0.01, "group actually moved");
    }

    #[test]
    fn macro_rotation_is_rigid() {
        let mut e = engine();
        // Deliberately asymmetric pair: the center is not the midpoint of
        // any symmetry, so a center recomputed mid-frame would warp the
        // group.
        let a = e.create_source(Vec3::new(1.0, 0.0, 0.0));
        let b = e.create_source(Vec3::new(4.0, 2.0, 1.0));
        let id = e.create_macro("g", MacroMembers::Existing(vec![a, b])).unwrap();
        e.set_macro_rotation(id, EulerAngles::new(2.0, 0.0, 0.0)).unwrap();

        let gap = e
            .source_state(a)
            .unwrap()
            .position
            .distance(e.source_state(b).unwrap().position);
        run(&mut e, 120);
        let gap_after = e
            .source_state(a)
            .unwrap()
            .position
            .distance(e.source_state(b).unwrap().position);
        assert_abs_diff_eq!(gap_after, gap, epsilon = 1e-2);
    }

    #[test]
    fn random_walks_reproduce_per_seed() {
        let run_scene = |seed: u64| {
            let mut e = MotionEngine::headless(EngineConfig { seed, ..EngineConfig::default() });
            let id = e
                .create_macro("g", MacroMembers::Spawn {
                    count:     3,
                    formation: Formation::Line,
                    origin:    Vec3::ZERO,
                    spacing:   1.0,
                })
                .unwrap();
            let spec = TrajectorySpec { mode: PlaybackMode::RandomWalk, ..circle_spec(2.0, 3.0) };
            e.set_trajectory(Target::Macro(id), spec).unwrap();
            run(&mut e, 60);
            e.sources().map(|s| s.state.position).collect::<Vec<_>>()
        };
        assert_eq!(run_scene(42), run_scene(42));
        assert_ne!(run_scene(42), run_scene(43));
    }
}

// ── Motion semantics through the engine ───────────────────────────────────────

#[cfg(test)]
mod motion {
    use approx::assert_abs_diff_eq;

    use super::*;

    /// The canonical regression scene: four sources in a cross, manually
    /// rotated half a turn at speed 0.1.  After 100 frames at 60 fps every
    /// member must have crossed to the opposite side — including the ones
    /// whose x or y starts at exactly zero.
    #[test]
    fn quad_half_turn_crosses_every_member() {
        let mut e = engine();
        let positions = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(0.0, -3.0, 0.0),
        ];
        let ids: Vec<SourceId> = positions.iter().map(|&p| e.create_source(p)).collect();
        let id = e.create_macro("quad", MacroMembers::Existing(ids.clone())).unwrap();

        e.set_manual_rotation(Target::Macro(id), EulerAngles::new(PI, 0.0, 0.0), 0.1, None)
            .unwrap();
        run(&mut e, 100);

        for (start, &sid) in positions.iter().zip(&ids) {
            let p = e.source_state(sid).unwrap().position;
            let expected = -*start;
            assert!(
                p.distance(expected) < 0.5,
                "member at {start} ended at {p}, expected near {expected}",
            );
        }
    }

    #[test]
    fn concentration_gathers_and_releases_a_macro() {
        let mut e = engine();
        let point = Vec3::new(0.0, 2.0, 1.0);
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     5,
                formation: Formation::Circle,
                origin:    Vec3::new(0.0, 6.0, 0.0),
                spacing:   1.5,
            })
            .unwrap();
        let starts: Vec<Vec3> = e.sources().map(|s| s.state.position).collect();

        e.animate_concentration(Target::Macro(id), 0.0, 1.0, EasingCurve::Linear, point)
            .unwrap();
        run(&mut e, 70);
        for s in e.sources() {
            assert!(s.state.position.distance(point) < 1e-3, "gathered");
        }
        let state = e.concentration_state(id).unwrap().unwrap();
        assert_eq!(state.factor, 0.0);
        assert!(!state.animating);

        e.set_concentration(Target::Macro(id), 1.0, point).unwrap();
        run(&mut e, 2);
        for (s, start) in e.sources().zip(&starts) {
            assert_abs_diff_eq!(s.state.position.distance(*start), 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn disabling_one_effect_leaves_the_other() {
        let mut e = engine();
        let point = Vec3::ZERO;
        let a = e.create_source(Vec3::new(4.0, 0.0, 0.0));
        e.set_trajectory(Target::Source(a), circle_spec(1.0, 2.0)).unwrap();
        e.set_concentration(Target::Source(a), 0.5, point).unwrap();
        run(&mut e, 10);

        // Freeze the trajectory; only concentration remains (already settled,
        // so the source should hold still).
        e.set_component_enabled(Target::Source(a), ComponentKind::IndividualTrajectory, false)
            .unwrap();
        let held = e.source_state(a).unwrap().position;
        run(&mut e, 10);
        assert_eq!(e.source_state(a).unwrap().position, held);

        e.set_component_enabled(Target::Source(a), ComponentKind::IndividualTrajectory, true)
            .unwrap();
        run(&mut e, 1);
        assert_ne!(e.source_state(a).unwrap().position, held);
    }

    #[test]
    fn repeating_a_manual_rotation_retargets_without_restart() {
        let mut e = engine();
        let a = e.create_source(Vec3::new(2.0, 0.0, 0.0));
        e.set_manual_rotation(Target::Source(a), EulerAngles::new(FRAC_PI_2, 0.0, 0.0), 0.5, None)
            .unwrap();
        run(&mut e, 30);
        let partway = e.source_state(a).unwrap().orientation.yaw;
        assert!(partway > 0.0 && partway <= FRAC_PI_2 + 1e-4);

        // Retarget to a full half-turn: interpolation continues from the
        // yaw already traveled.
        e.set_manual_rotation(Target::Source(a), EulerAngles::new(PI, 0.0, 0.0), 0.5, None)
            .unwrap();
        run(&mut e, 120);
        assert_abs_diff_eq!(e.source_state(a).unwrap().orientation.yaw, PI, epsilon = 1e-3);
    }

    #[test]
    fn individual_rotation_of_a_free_source_turns_in_place() {
        let mut e = engine();
        let p = Vec3::new(1.0, 2.0, 3.0);
        let a = e.create_source(p);
        e.set_manual_rotation(Target::Source(a), EulerAngles::new(PI, 0.0, 0.0), 1.0, None)
            .unwrap();
        run(&mut e, 1);
        let s = e.source_state(a).unwrap();
        assert_eq!(s.position, p);
        assert_abs_diff_eq!(s.orientation.yaw, PI, epsilon = 1e-5);
    }

    #[test]
    fn individual_rotation_about_an_explicit_center_orbits_it() {
        let mut e = engine();
        let center = Vec3::new(0.0, 2.0, 0.0);
        let a = e.create_source(Vec3::new(1.0, 2.0, 0.0)); // radius 1 from center
        e.set_manual_rotation(
            Target::Source(a),
            EulerAngles::new(FRAC_PI_2, 0.0, 0.0),
            1.0,
            Some(center),
        )
        .unwrap();
        run(&mut e, 1);
        let s = e.source_state(a).unwrap();
        // Quarter turn about (0,2,0): (1,2,0) → (0,3,0).
        assert_abs_diff_eq!(s.position.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(s.position.y, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(s.orientation.yaw, FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn trajectory_and_rotation_compose_on_a_macro() {
        let mut e = engine();
        let id = e
            .create_macro("g", MacroMembers::Spawn {
                count:     3,
                formation: Formation::Circle,
                origin:    Vec3::new(0.0, 4.0, 0.0),
                spacing:   1.0,
            })
            .unwrap();
        e.set_macro_rotation(id, EulerAngles::new(1.0, 0.0, 0.0)).unwrap();
        e.set_trajectory(Target::Macro(id), circle_spec(0.5, 1.5)).unwrap();
        run(&mut e, 90);

        // Both effects ran without either suppressing the other: every pose
        // is finite, the group still orbits near its origin, and orientation
        // accumulated the algorithmic rotation (1 rad/s × 1.5 s).
        for s in e.sources() {
            assert!(s.state.position.is_finite());
            assert_abs_diff_eq!(s.state.orientation.yaw, 1.5, epsilon = 1e-2);
        }
        let center = e.macro_center(id).unwrap();
        assert!(center.distance(Vec3::new(0.0, 4.0, 0.0)) < 1.5);
    }
}
