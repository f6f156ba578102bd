//! Procedure change events and the event-driven undo/redo primitive.
//!
//! Every observable mutation of a [`ProcedureMap`] is described by one
//! [`ProcedureEvent`] variant carrying only its relevant payload. A single
//! exhaustive [`ProcedureEvent::apply`] / [`ProcedureEvent::revert`]
//! dispatcher replays or reverses any event, which is all
//! [`ProcedureHistory`] needs for undo/redo at the data layer.
//!
//! Events serialize with serde (internally tagged), so external persistence
//! or logging layers can consume them without knowing the variants.

use serde::{Deserialize, Serialize};

use crate::procedures::map::ProcedureMap;
use crate::procedures::model::{ParameterModel, ProcedureModel};
use crate::variables::Workspace;

// ────────────────────────────────────────────────────────────────────────────
// ProcedureEvent
// ────────────────────────────────────────────────────────────────────────────

/// A change to the procedure map or to a model registered in it.
///
/// Membership events (`Create`, `Delete`) carry a full model snapshot so
/// they can be reversed. Mutation events carry the procedure id plus the
/// old value where the new value is not queryable after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ProcedureEvent {
    /// A procedure was registered in the map.
    Create { procedure: ProcedureModel },
    /// A procedure was removed from the map.
    Delete { procedure: ProcedureModel },
    /// A procedure's display name changed.
    Rename {
        procedure_id: String,
        old_name: String,
        new_name: String,
    },
    /// A procedure's enabled flag flipped. Fires for both transitions; the
    /// current value is queryable from the map.
    Enable { procedure_id: String },
    /// A procedure's return-type descriptor changed. `None` means no
    /// return value, `Some(vec![])` an untyped return.
    ChangeReturn {
        procedure_id: String,
        old_types: Option<Vec<String>>,
        new_types: Option<Vec<String>>,
    },
    /// A parameter was inserted.
    ParameterCreate {
        procedure_id: String,
        parameter: ParameterModel,
        index: usize,
    },
    /// A parameter was deleted.
    ParameterDelete {
        procedure_id: String,
        parameter: ParameterModel,
        index: usize,
    },
    /// A parameter was renamed (and its backing variable re-resolved).
    ParameterRename {
        procedure_id: String,
        parameter_id: String,
        old_name: String,
        new_name: String,
    },
}

impl ProcedureEvent {
    /// Short variant name, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ProcedureEvent::Create { .. } => "create",
            ProcedureEvent::Delete { .. } => "delete",
            ProcedureEvent::Rename { .. } => "rename",
            ProcedureEvent::Enable { .. } => "enable",
            ProcedureEvent::ChangeReturn { .. } => "change_return",
            ProcedureEvent::ParameterCreate { .. } => "parameter_create",
            ProcedureEvent::ParameterDelete { .. } => "parameter_delete",
            ProcedureEvent::ParameterRename { .. } => "parameter_rename",
        }
    }

    /// Id of the procedure this event concerns.
    pub fn procedure_id(&self) -> &str {
        match self {
            ProcedureEvent::Create { procedure } | ProcedureEvent::Delete { procedure } => {
                procedure.id()
            }
            ProcedureEvent::Rename { procedure_id, .. }
            | ProcedureEvent::Enable { procedure_id }
            | ProcedureEvent::ChangeReturn { procedure_id, .. }
            | ProcedureEvent::ParameterCreate { procedure_id, .. }
            | ProcedureEvent::ParameterDelete { procedure_id, .. }
            | ProcedureEvent::ParameterRename { procedure_id, .. } => procedure_id,
        }
    }

    /// Replay this event against the map, returning the event the replay
    /// fired (if it was not suppressed as a no-op).
    pub fn apply(
        &self,
        map: &mut ProcedureMap,
        workspace: &mut Workspace,
    ) -> Option<ProcedureEvent> {
        match self {
            ProcedureEvent::Create { procedure } => map.add(procedure.clone()),
            ProcedureEvent::Delete { procedure } => map.delete(procedure.id()),
            ProcedureEvent::Rename {
                procedure_id,
                new_name,
                ..
            } => map.set_name(procedure_id, new_name),
            ProcedureEvent::Enable { procedure_id } => toggle_enabled(map, procedure_id),
            ProcedureEvent::ChangeReturn {
                procedure_id,
                new_types,
                ..
            } => map.set_return_types(procedure_id, new_types.clone()),
            ProcedureEvent::ParameterCreate {
                procedure_id,
                parameter,
                index,
            } => map.insert_parameter(procedure_id, *index, parameter.clone()),
            ProcedureEvent::ParameterDelete {
                procedure_id,
                index,
                ..
            } => map.delete_parameter(procedure_id, *index),
            ProcedureEvent::ParameterRename {
                procedure_id,
                parameter_id,
                new_name,
                ..
            } => rename_by_parameter_id(map, procedure_id, parameter_id, new_name, workspace),
        }
    }

    /// Reverse this event against the map.
    pub fn revert(
        &self,
        map: &mut ProcedureMap,
        workspace: &mut Workspace,
    ) -> Option<ProcedureEvent> {
        match self {
            ProcedureEvent::Create { procedure } => map.delete(procedure.id()),
            ProcedureEvent::Delete { procedure } => map.add(procedure.clone()),
            ProcedureEvent::Rename {
                procedure_id,
                old_name,
                ..
            } => map.set_name(procedure_id, old_name),
            // The enable event fires on both transitions, so its reverse is
            // the same toggle.
            ProcedureEvent::Enable { procedure_id } => toggle_enabled(map, procedure_id),
            ProcedureEvent::ChangeReturn {
                procedure_id,
                old_types,
                ..
            } => map.set_return_types(procedure_id, old_types.clone()),
            ProcedureEvent::ParameterCreate {
                procedure_id,
                index,
                ..
            } => map.delete_parameter(procedure_id, *index),
            ProcedureEvent::ParameterDelete {
                procedure_id,
                parameter,
                index,
            } => map.insert_parameter(procedure_id, *index, parameter.clone()),
            ProcedureEvent::ParameterRename {
                procedure_id,
                parameter_id,
                old_name,
                ..
            } => rename_by_parameter_id(map, procedure_id, parameter_id, old_name, workspace),
        }
    }
}

fn toggle_enabled(map: &mut ProcedureMap, procedure_id: &str) -> Option<ProcedureEvent> {
    let current = map
        .get(procedure_id)
        .unwrap_or_else(|| panic!("no procedure with id {procedure_id:?} in map"))
        .is_enabled();
    map.set_enabled(procedure_id, !current)
}

fn rename_by_parameter_id(
    map: &mut ProcedureMap,
    procedure_id: &str,
    parameter_id: &str,
    name: &str,
    workspace: &mut Workspace,
) -> Option<ProcedureEvent> {
    let index = map
        .parameter_index(procedure_id, parameter_id)
        .unwrap_or_else(|| {
            panic!("no parameter with id {parameter_id:?} in procedure {procedure_id:?}")
        });
    map.rename_parameter(procedure_id, index, name, workspace)
}

// ────────────────────────────────────────────────────────────────────────────
// ProcedureHistory (undo / redo stack)
// ────────────────────────────────────────────────────────────────────────────

/// Bounded undo/redo history over procedure events.
///
/// Callers push the events returned by [`ProcedureMap`] mutators:
///
/// ```rust,ignore
/// if let Some(ev) = map.set_name(&id, "sum") {
///     history.push(ev);
/// }
/// history.undo(&mut map, &mut workspace); // reverts the rename
/// history.redo(&mut map, &mut workspace); // re-applies it
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcedureHistory {
    undo_stack: Vec<ProcedureEvent>,
    redo_stack: Vec<ProcedureEvent>,
    max_size: usize,
}

impl ProcedureHistory {
    /// Create a history with the given maximum undo depth (0 = unbounded).
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record an event and clear the redo stack.
    pub fn push(&mut self, event: ProcedureEvent) {
        self.undo_stack.push(event);
        self.redo_stack.clear();
        if self.max_size > 0 && self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Reverse the most recent event. Returns true if an undo happened.
    pub fn undo(&mut self, map: &mut ProcedureMap, workspace: &mut Workspace) -> bool {
        if let Some(event) = self.undo_stack.pop() {
            event.revert(map, workspace);
            self.redo_stack.push(event);
            true
        } else {
            false
        }
    }

    /// Re-apply the most recently undone event. Returns true if a redo
    /// happened.
    pub fn redo(&mut self, map: &mut ProcedureMap, workspace: &mut Workspace) -> bool {
        if let Some(event) = self.redo_stack.pop() {
            event.apply(map, workspace);
            self.undo_stack.push(event);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
