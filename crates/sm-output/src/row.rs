//! Plain data row types written by trace backends.

use sm_engine::SourcePose;

/// One source's pose in one frame, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePoseRow {
    pub frame:    u64,
    pub elapsed:  f32,
    pub source:   u32,
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    pub yaw:      f32,
    pub pitch:    f32,
    pub roll:     f32,
    pub distance: f32,
}

impl SourcePoseRow {
    pub fn new(frame: u64, elapsed: f32, pose: &SourcePose) -> Self {
        Self {
            frame,
            elapsed,
            source:   pose.id.0,
            x:        pose.state.position.x,
            y:        pose.state.position.y,
            z:        pose.state.position.z,
            yaw:      pose.state.orientation.yaw,
            pitch:    pose.state.orientation.pitch,
            roll:     pose.state.orientation.roll,
            distance: pose.state.distance,
        }
    }
}
