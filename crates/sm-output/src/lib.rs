//! `sm-output` — concrete output sinks for the spatmotion engine.
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | [`udp`]    | `OscUdpSink` — live OSC/UDP path to a renderer  |
//! | [`csv`]    | `CsvTraceSink` — per-frame pose trace           |
//! | [`memory`] | `MemorySink` — in-memory capture                |
//! | [`osc`]    | minimal OSC 1.0 message encoder                 |
//! | [`row`]    | flattened row types for tabular backends        |
//! | [`error`]  | `OutputError`, `OutputResult`                   |
//!
//! Every sink implements [`sm_engine::OutputSink`]; pick one (or compose your
//! own) and hand it to `MotionEngine::new`.

pub mod csv;
pub mod error;
pub mod memory;
pub mod osc;
pub mod row;
pub mod udp;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvTraceSink;
pub use error::{OutputError, OutputResult};
pub use memory::{CapturedFrame, MemorySink};
pub use osc::{OscArg, OscMessage};
pub use row::SourcePoseRow;
pub use udp::OscUdpSink;
