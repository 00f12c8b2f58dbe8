//! orbit — smallest end-to-end demo of the spatmotion framework.
//!
//! Renders a short offline "performance" for a ring of 8 sources: they orbit
//! individually, gather toward a focus point, rotate half a turn as a group,
//! then disperse back out.  Poses for every frame land in
//! `output/orbit/motion_trace.csv`; point the CSV at a plotting tool to watch
//! the choreography.  Swap the trace sink for `OscUdpSink` to drive a real
//! spatialization renderer live.

use std::f32::consts::PI;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use sm_core::{EngineConfig, EulerAngles, Vec3};
use sm_engine::{Formation, MacroMembers, MotionEngine, Target};
use sm_motion::{EasingCurve, PlaybackMode, TrajectoryShape, TrajectorySpec};
use sm_output::CsvTraceSink;

// ── Constants ─────────────────────────────────────────────────────────────────

const SOURCE_COUNT: usize = 8;
const SEED:         u64   = 42;
const FPS:          f32   = 60.0;
const DT:           f32   = 1.0 / FPS;

/// Center of the spawn ring (renderer units; y is ahead of the listener).
const RING_ORIGIN: Vec3 = Vec3 { x: 0.0, y: 4.0, z: 1.5 };
/// Where the group gathers in the second movement.
const FOCUS: Vec3 = Vec3 { x: 0.0, y: 2.0, z: 1.5 };

// ── main ──────────────────────────────────────────────────────────────────────

fn run_secs(engine: &mut MotionEngine<CsvTraceSink>, secs: f32) {
    for _ in 0..(secs * FPS) as usize {
        engine.update_with_dt(DT);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== orbit — spatmotion demo ===");
    println!("Sources: {SOURCE_COUNT}  |  Seed: {SEED}  |  {FPS} fps offline");
    println!();

    // 1. Engine with a CSV trace sink.
    std::fs::create_dir_all("output/orbit")?;
    let sink = CsvTraceSink::new(Path::new("output/orbit"))?;
    let config = EngineConfig { seed: SEED, ..EngineConfig::default() };
    let mut engine = MotionEngine::new(config, sink);

    // 2. Spawn the ring.
    let choir = engine.create_macro("choir", MacroMembers::Spawn {
        count:     SOURCE_COUNT,
        formation: Formation::Circle,
        origin:    RING_ORIGIN,
        spacing:   1.0,
    })?;
    println!("Macro \"choir\": {SOURCE_COUNT} members around {RING_ORIGIN}");

    // 3. First movement: individual orbits, phases staggered around the ring.
    engine.set_trajectory(Target::Macro(choir), TrajectorySpec {
        shape: TrajectoryShape::Circle { radius: 0.4 },
        mode:  PlaybackMode::Loop,
        speed: 1.2,
        phase: 0.0,
    })?;

    let t0 = Instant::now();
    run_secs(&mut engine, 4.0);

    // 4. Second movement: gather toward the focus over two seconds, orbits
    //    still running — the effects compose.
    engine.animate_concentration(Target::Macro(choir), 0.2, 2.0, EasingCurve::SmoothStep, FOCUS)?;
    run_secs(&mut engine, 3.0);

    // 5. Third movement: half a turn of the gathered cluster.
    engine.set_manual_rotation(Target::Macro(choir), EulerAngles::new(PI, 0.0, 0.0), 0.1, None)?;
    run_secs(&mut engine, 3.0);

    // 6. Finale: release back to the dispersed ring.
    engine.animate_concentration(Target::Macro(choir), 1.0, 2.0, EasingCurve::EaseOut, FOCUS)?;
    run_secs(&mut engine, 3.0);

    let elapsed = t0.elapsed();
    engine.flush().map_err(|e| anyhow::anyhow!("flush failed: {e}"))?;

    // 7. Summary.
    println!(
        "Rendered {} frames ({:.1} s of motion) in {:.3} s",
        engine.frame(),
        engine.elapsed_secs(),
        elapsed.as_secs_f64(),
    );
    println!("Trace: output/orbit/motion_trace.csv");
    println!();

    // 8. Final pose table.
    println!("{:<8} {:<26} {:<10} {:<10}", "Source", "Position", "Yaw", "Distance");
    println!("{}", "-".repeat(58));
    for s in engine.sources() {
        println!(
            "{:<8} {:<26} {:<10.3} {:<10.3}",
            s.id.0,
            s.state.position.to_string(),
            s.state.orientation.yaw,
            s.state.distance,
        );
    }
    let center = engine.macro_center(choir)?;
    println!();
    println!("Final macro center: {center}  (spawned at {RING_ORIGIN})");

    Ok(())
}
