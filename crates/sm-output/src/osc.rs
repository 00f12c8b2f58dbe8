//! Minimal OSC 1.0 message encoder.
//!
//! Only the subset the renderer protocol needs: messages with `i`, `f`, and
//! `s` arguments.  No bundles, no timetags, no pattern matching — the engine
//! only ever *sends*.
//!
//! Wire layout per the OSC 1.0 spec: a null-terminated, 4-byte-padded address
//! string; a type-tag string starting with `,`, null-terminated and padded the
//! same way; then each argument big-endian, strings padded to 4 bytes.

use std::fmt::Write as _;

/// One OSC argument.
#[derive(Clone, Debug, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
}

/// An OSC message under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct OscMessage {
    address: String,
    args:    Vec<OscArg>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), args: Vec::new() }
    }

    /// Address `/{prefix}/{index}/{suffix}` — the shape every per-source
    /// message takes.
    pub fn addressed(prefix: &str, index: usize, suffix: &str) -> Self {
        let mut address = String::with_capacity(prefix.len() + suffix.len() + 8);
        let _ = write!(address, "/{prefix}/{index}/{suffix}");
        Self::new(address)
    }

    pub fn arg(mut self, arg: OscArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn float(self, v: f32) -> Self {
        self.arg(OscArg::Float(v))
    }

    pub fn int(self, v: i32) -> Self {
        self.arg(OscArg::Int(v))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Encode into `buf` (cleared first).  Infallible: every message this
    /// builder can construct is representable.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.clear();
        write_padded_str(buf, &self.address);

        let mut tags = String::with_capacity(1 + self.args.len());
        tags.push(',');
        for arg in &self.args {
            tags.push(match arg {
                OscArg::Int(_)   => 'i',
                OscArg::Float(_) => 'f',
                OscArg::Str(_)   => 's',
            });
        }
        write_padded_str(buf, &tags);

        for arg in &self.args {
            match arg {
                OscArg::Int(v)   => buf.extend_from_slice(&v.to_be_bytes()),
                OscArg::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
                OscArg::Str(s)   => write_padded_str(buf, s),
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.address.len() + 8 + self.args.len() * 4);
        self.encode_into(&mut buf);
        buf
    }
}

/// Append `s`, a null terminator, and padding up to a 4-byte boundary.
fn write_padded_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    // At least one null, then pad to a multiple of 4.
    let padded = (s.len() + 4) & !3;
    buf.resize(buf.len() + (padded - s.len()), 0);
}
