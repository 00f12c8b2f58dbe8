//! Unit tests for sm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{MacroId, SourceId};

    #[test]
    fn index_roundtrip() {
        let id = SourceId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(SourceId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(SourceId(0) < SourceId(1));
        assert!(MacroId(100) > MacroId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(SourceId::INVALID.0, u32::MAX);
        assert_eq!(MacroId::INVALID.0, u16::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(SourceId(7).to_string(), "SourceId(7)");
    }
}

#[cfg(test)]
mod math {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use crate::{EulerAngles, Vec3};

    #[test]
    fn vec_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -2.0, 1.0);
        assert_eq!(a + b, Vec3::new(1.5, 0.0, 4.0));
        assert_eq!(a - b, Vec3::new(0.5, 4.0, 2.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn distance() {
        let a = Vec3::new(0.0, 3.0, 0.0);
        let b = Vec3::new(4.0, 0.0, 0.0);
        assert_abs_diff_eq!(a.distance(b), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn clamped_length_caps_only_long_vectors() {
        let v = Vec3::new(3.0, 4.0, 0.0); // length 5
        assert_abs_diff_eq!(v.clamped_length(2.5).length(), 2.5, epsilon = 1e-5);
        assert_eq!(v.clamped_length(10.0), v);
        assert_eq!(v.clamped_length(0.0), v); // disabled clamp passes through
        assert_eq!(Vec3::ZERO.clamped_length(1.0), Vec3::ZERO);
    }

    #[test]
    fn yaw_quarter_turn_in_xy_plane() {
        let p = Vec3::new(3.0, 0.0, 1.0);
        let q = p.rotated_about(Vec3::ZERO, EulerAngles::new(FRAC_PI_2, 0.0, 0.0));
        assert_abs_diff_eq!(q.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(q.y, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(q.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_about_offset_center_preserves_radius() {
        let center = Vec3::new(1.0, 1.0, 0.0);
        let p = Vec3::new(4.0, 1.0, 0.0); // radius 3 from center
        let mut q = p;
        // 90° in 90 one-degree steps.
        let step = EulerAngles::new(FRAC_PI_2 / 90.0, 0.0, 0.0);
        for _ in 0..90 {
            q = q.rotated_about(center, step);
        }
        assert_abs_diff_eq!(q.distance(center), 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(q.x, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(q.y, 4.0, epsilon = 1e-3);
    }

    #[test]
    fn euler_clamped_abs() {
        let e = EulerAngles::new(2.0, -3.0, 0.5);
        let c = e.clamped_abs(1.0);
        assert_eq!(c, EulerAngles::new(1.0, -1.0, 0.5));
        assert_eq!(e.clamped_abs(0.0), e); // disabled clamp passes through
        assert_abs_diff_eq!(e.max_abs(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn finite_checks() {
        assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!EulerAngles::new(f32::INFINITY, 0.0, 0.0).is_finite());
    }
}

#[cfg(test)]
mod time {
    use crate::{DeltaLimits, EngineConfig, FrameClock};

    #[test]
    fn first_tick_uses_nominal_dt() {
        let mut clock = FrameClock::new(60.0, 0.25);
        let dt = clock.tick();
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn fixed_ticks_accumulate() {
        let mut clock = FrameClock::new(60.0, 0.25);
        for _ in 0..10 {
            assert_eq!(clock.tick_fixed(0.1), 0.1);
        }
        assert_eq!(clock.frame(), 10);
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fixed_tick_respects_cap() {
        let mut clock = FrameClock::new(60.0, 0.25);
        assert_eq!(clock.tick_fixed(5.0), 0.25);
    }

    #[test]
    fn config_defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.fps, 60.0);
        assert!(cfg.max_dt_secs > 0.0);
        let limits = DeltaLimits::default();
        assert!(limits.max_position_step > 0.0);
        assert!(limits.max_angle_step > 0.0);
        let _clock = cfg.make_clock();
    }
}

#[cfg(test)]
mod rng {
    use crate::{SourceId, SourceRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SourceRng::new(12345, SourceId(0));
        let mut r2 = SourceRng::new(12345, SourceId(0));
        for _ in 0..100 {
            assert_eq!(r1.jitter(), r2.jitter());
        }
    }

    #[test]
    fn different_sources_differ() {
        let mut r0 = SourceRng::new(1, SourceId(0));
        let mut r1 = SourceRng::new(1, SourceId(1));
        let a: f32 = r0.gen_range(0.0f32..1.0);
        let b: f32 = r1.gen_range(0.0f32..1.0);
        assert_ne!(a, b, "seeds for adjacent sources should diverge");
    }

    #[test]
    fn jitter_in_bounds() {
        let mut rng = SourceRng::new(0, SourceId(0));
        for _ in 0..1000 {
            let v = rng.jitter();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SourceRng::new(0, SourceId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
