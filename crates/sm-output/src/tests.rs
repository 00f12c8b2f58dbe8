//! Unit tests for sm-output.

use sm_core::{EngineConfig, SourceId, Vec3};
use sm_engine::{MotionEngine, OutputSink, Target};
use sm_motion::{PlaybackMode, TrajectoryShape, TrajectorySpec};

use crate::csv::CsvTraceSink;
use crate::memory::MemorySink;
use crate::osc::{OscArg, OscMessage};

const DT: f32 = 1.0 / 60.0;

fn orbit_spec() -> TrajectorySpec {
    TrajectorySpec {
        shape: TrajectoryShape::Circle { radius: 1.0 },
        mode:  PlaybackMode::Loop,
        speed: 2.0,
        phase: 0.0,
    }
}

// ── OSC encoding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod osc {
    use super::*;

    #[test]
    fn single_float_message_matches_the_wire_spec() {
        let bytes = OscMessage::new("/ab").float(1.0).encode();
        assert_eq!(bytes, vec![
            b'/', b'a', b'b', 0,            // address, null-terminated, padded
            b',', b'f', 0, 0,               // type tags
            0x3f, 0x80, 0x00, 0x00,         // 1.0f32 big-endian
        ]);
    }

    #[test]
    fn address_padding_always_includes_a_terminator() {
        // A 4-byte address still gets a full pad word for its terminator.
        let bytes = OscMessage::new("/abc").encode();
        assert_eq!(&bytes[..8], &[b'/', b'a', b'b', b'c', 0, 0, 0, 0]);
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn int_and_string_arguments_encode() {
        let bytes = OscMessage::new("/x")
            .int(-2)
            .arg(OscArg::Str("hi".into()))
            .encode();
        // addr "/x" → 4 bytes, tags ",is" → 4 bytes.
        assert_eq!(&bytes[0..4], &[b'/', b'x', 0, 0]);
        assert_eq!(&bytes[4..8], &[b',', b'i', b's', 0]);
        assert_eq!(&bytes[8..12], &(-2i32).to_be_bytes());
        assert_eq!(&bytes[12..16], &[b'h', b'i', 0, 0]);
    }

    #[test]
    fn per_source_addresses_embed_the_index() {
        let m = OscMessage::addressed("source", 7, "xyz");
        assert_eq!(m.address(), "/source/7/xyz");
    }

    #[test]
    fn encode_into_reuses_the_buffer() {
        let mut buf = vec![0xAA; 64];
        OscMessage::new("/a").float(0.5).encode_into(&mut buf);
        assert_eq!(&buf[..4], &[b'/', b'a', 0, 0]);
        assert_eq!(buf.len(), 12);
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sinks {
    use super::*;

    #[test]
    fn csv_trace_writes_one_row_per_source_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvTraceSink::new(dir.path()).unwrap();
        let mut engine = MotionEngine::new(EngineConfig::default(), sink);
        engine.create_source(Vec3::new(1.0, 0.0, 0.0));
        engine.create_source(Vec3::new(0.0, 2.0, 0.0));
        for _ in 0..5 {
            engine.update_with_dt(DT);
        }
        engine.flush().unwrap();

        let text = std::fs::read_to_string(dir.path().join("motion_trace.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 5 * 2);
        assert!(lines[0].starts_with("frame,elapsed,source,"));
        // First data row: frame 1, source 0, at its spawn position.
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields[0], "1");
        assert_eq!(fields[2], "0");
        assert_eq!(fields[3], "1");
    }

    #[test]
    fn memory_sink_tracks_one_source_through_time() {
        let mut engine = MotionEngine::new(EngineConfig::default(), MemorySink::new());
        let id = engine.create_source(Vec3::new(1.0, 0.0, 0.0));
        engine.set_trajectory(Target::Source(id), orbit_spec()).unwrap();
        for _ in 0..30 {
            engine.update_with_dt(DT);
        }

        let track = engine.sink().track_of(id);
        assert_eq!(track.len(), 30);
        // The orbit actually moved the source between first and last frame.
        assert!(track[0].position.distance(track[29].position) > 1e-3);
        assert_eq!(engine.sink().last().unwrap().frame, 30);
    }

    #[test]
    fn default_frame_delivery_fans_out_to_poses() {
        // A sink without its own send_frame still sees every source.
        struct CountingSink {
            positions:    usize,
            orientations: usize,
        }
        impl OutputSink for CountingSink {
            fn send_position(
                &mut self,
                _id: SourceId,
                _position: Vec3,
            ) -> sm_engine::SinkResult<()> {
                self.positions += 1;
                Ok(())
            }

            fn send_orientation(
                &mut self,
                _id: SourceId,
                _orientation: sm_core::EulerAngles,
            ) -> sm_engine::SinkResult<()> {
                self.orientations += 1;
                Ok(())
            }
        }

        let sink = CountingSink { positions: 0, orientations: 0 };
        let mut engine = MotionEngine::new(EngineConfig::default(), sink);
        engine.create_source(Vec3::ZERO);
        engine.create_source(Vec3::ZERO);
        engine.create_source(Vec3::ZERO);
        engine.update_with_dt(DT);
        assert_eq!(engine.sink().positions, 3);
        assert_eq!(engine.sink().orientations, 3);
    }
}
