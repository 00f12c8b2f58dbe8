//! CSV trace backend.
//!
//! Writes one row per source per frame to `motion_trace.csv` in the
//! configured directory.  Meant for offline analysis and regression
//! comparison of rendered motion, not for the live path.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use sm_core::{EulerAngles, SourceId, Vec3};
use sm_engine::{FrameSnapshot, OutputSink, SinkResult};

use crate::error::OutputResult;
use crate::row::SourcePoseRow;

/// Writes committed poses to a CSV file.
pub struct CsvTraceSink {
    trace:    Writer<File>,
    finished: bool,
}

impl CsvTraceSink {
    /// Create `motion_trace.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trace = Writer::from_path(dir.join("motion_trace.csv"))?;
        trace.write_record([
            "frame", "elapsed", "source", "x", "y", "z", "yaw", "pitch", "roll", "distance",
        ])?;
        Ok(Self { trace, finished: false })
    }

    fn write_row(&mut self, row: &SourcePoseRow) -> OutputResult<()> {
        self.trace.write_record(&[
            row.frame.to_string(),
            row.elapsed.to_string(),
            row.source.to_string(),
            row.x.to_string(),
            row.y.to_string(),
            row.z.to_string(),
            row.yaw.to_string(),
            row.pitch.to_string(),
            row.roll.to_string(),
            row.distance.to_string(),
        ])?;
        Ok(())
    }
}

impl OutputSink for CsvTraceSink {
    // Rows need frame context; everything goes through send_frame.
    fn send_position(&mut self, _id: SourceId, _position: Vec3) -> SinkResult<()> {
        Ok(())
    }

    fn send_orientation(&mut self, _id: SourceId, _orientation: EulerAngles) -> SinkResult<()> {
        Ok(())
    }

    fn send_frame(&mut self, frame: &FrameSnapshot<'_>) -> SinkResult<()> {
        for pose in frame.poses {
            self.write_row(&SourcePoseRow::new(frame.frame, frame.elapsed, pose))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trace.flush().map_err(Into::into)
    }
}
