//! Component computation errors.
//!
//! These are per-frame, recoverable failures: the composition step drops the
//! failing component's contribution for the frame, logs it, and carries on.
//! Structural errors (unknown source, duplicate macro name) live in
//! `sm-engine`, where the operations that raise them are defined.

use thiserror::Error;

use crate::component::ComponentKind;

/// A failure inside one component's `calculate_delta`.
#[derive(Debug, Error, PartialEq)]
pub enum ComponentError {
    /// The computed delta contained NaN or infinity, usually from degenerate
    /// parameters (zero-duration animation, non-finite target).
    #[error("{kind} produced a non-finite delta")]
    NonFinite { kind: ComponentKind },

    /// A parameter left the component unable to compute (e.g. a non-finite
    /// rotation center).
    #[error("{kind}: invalid parameter: {detail}")]
    InvalidParameter {
        kind:   ComponentKind,
        detail: &'static str,
    },
}
