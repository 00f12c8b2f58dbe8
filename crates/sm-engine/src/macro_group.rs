//! Macro bookkeeping: a named group of sources that receives group-scale
//! motion commands.

use sm_core::{MacroId, SourceId};

/// A named group of sources.
///
/// The group itself carries no motion state — group effects are installed as
/// components on every member, and the live center is recomputed by the
/// engine each frame from the members' committed positions.
#[derive(Clone, Debug)]
pub struct MacroGroup {
    id:      MacroId,
    name:    String,
    /// Members in insertion order.  Iteration order is stable so staggered
    /// phase assignment is reproducible.
    members: Vec<SourceId>,
}

impl MacroGroup {
    pub(crate) fn new(id: MacroId, name: String, members: Vec<SourceId>) -> Self {
        Self { id, name, members }
    }

    pub fn id(&self) -> MacroId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[SourceId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn remove_member(&mut self, id: SourceId) {
        self.members.retain(|&m| m != id);
    }
}

/// Host-facing summary of one macro, for scene introspection.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroInfo {
    pub id:      MacroId,
    pub name:    String,
    pub members: usize,
    pub center:  sm_core::Vec3,
}
