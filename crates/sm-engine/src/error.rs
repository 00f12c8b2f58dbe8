//! Engine error taxonomy.
//!
//! Command methods validate *everything* before mutating: a command that
//! returns an error has changed nothing, so the host can surface it and keep
//! running with a consistent scene.

use sm_core::{MacroId, SourceId};

/// Errors returned by [`MotionEngine`][crate::MotionEngine] commands.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown source {0}")]
    UnknownSource(SourceId),

    #[error("unknown macro {0}")]
    UnknownMacro(MacroId),

    #[error("a macro named {0:?} already exists")]
    DuplicateMacroName(String),

    #[error("source {0} is already a member of macro {1}")]
    DuplicateSource(SourceId, MacroId),

    #[error("a macro needs at least one member")]
    EmptyMacro,

    #[error("invalid configuration: {0}")]
    Config(&'static str),
}

pub type EngineResult<T> = Result<T, EngineError>;
