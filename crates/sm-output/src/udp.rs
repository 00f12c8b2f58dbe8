//! OSC-over-UDP sink: the live path to the spatialization renderer.
//!
//! Fire-and-forget by design.  The socket is non-blocking and errors are
//! surfaced to the engine (which logs and drops the frame); the next frame
//! supersedes anything lost, so there is no retry and no buffering.

use std::io::ErrorKind;
use std::net::{ToSocketAddrs, UdpSocket};

use sm_core::{EulerAngles, SourceId, Vec3};
use sm_engine::{FrameSnapshot, OutputSink, SinkResult};

use crate::error::OutputResult;
use crate::osc::OscMessage;

/// Default address prefix understood by the renderers we target.
const SOURCE_PREFIX: &str = "source";

/// Streams per-source pose messages to a renderer over UDP.
///
/// Per pose: `/source/{id}/xyz  f f f` (position) and `/source/{id}/ypr
/// f f f` (orientation, radians).  Aperture goes out as
/// `/source/{id}/aperture f` only when it is non-zero, since most renderers
/// treat the parameter as optional.
pub struct OscUdpSink {
    socket:  UdpSocket,
    /// Reused encode buffer; one datagram per message.
    scratch: Vec<u8>,
}

impl OscUdpSink {
    /// Bind an ephemeral local port and connect to the renderer at `target`
    /// (e.g. `"127.0.0.1:18032"`).
    pub fn connect(target: impl ToSocketAddrs) -> OutputResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(target)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, scratch: Vec::with_capacity(64) })
    }

    fn send(&mut self, msg: &OscMessage) -> std::io::Result<()> {
        msg.encode_into(&mut self.scratch);
        match self.socket.send(&self.scratch) {
            Ok(_) => Ok(()),
            // A full socket buffer means the OS is already holding more than
            // a frame of packets; dropping this one is the right call.
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl OutputSink for OscUdpSink {
    fn send_position(&mut self, id: SourceId, position: Vec3) -> SinkResult<()> {
        self.send(
            &OscMessage::addressed(SOURCE_PREFIX, id.index(), "xyz")
                .float(position.x)
                .float(position.y)
                .float(position.z),
        )?;
        Ok(())
    }

    fn send_orientation(&mut self, id: SourceId, orientation: EulerAngles) -> SinkResult<()> {
        self.send(
            &OscMessage::addressed(SOURCE_PREFIX, id.index(), "ypr")
                .float(orientation.yaw)
                .float(orientation.pitch)
                .float(orientation.roll),
        )?;
        Ok(())
    }

    fn send_frame(&mut self, frame: &FrameSnapshot<'_>) -> SinkResult<()> {
        for pose in frame.poses {
            self.send_position(pose.id, pose.state.position)?;
            self.send_orientation(pose.id, pose.state.orientation)?;
            if pose.state.aperture != 0.0 {
                self.send(
                    &OscMessage::addressed(SOURCE_PREFIX, pose.id.index(), "aperture")
                        .float(pose.state.aperture),
                )?;
            }
        }
        Ok(())
    }
}
