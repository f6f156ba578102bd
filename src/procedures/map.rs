//! The authoritative procedure collection of a workspace.
//!
//! [`ProcedureMap`] owns every [`ProcedureModel`] and is the sole place
//! that decides whether a mutation is novel enough to broadcast. All
//! post-registration mutation flows through map methods: each one performs
//! no-op suppression, fires at most one [`ProcedureEvent`] to the
//! registered listeners, and returns the fired event to the caller (for
//! history recording or further routing).
//!
//! Models that have not yet been added to the map are plain values;
//! mutating them fires nothing, which is exactly the construction-time
//! silence the event contract requires.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::procedures::events::ProcedureEvent;
use crate::procedures::model::{ParameterModel, ProcedureModel};
use crate::variables::Workspace;

/// A listener invoked synchronously after every broadcast mutation.
///
/// Listeners receive the event only, never the map, so a listener cannot
/// re-enter the map mid-dispatch. A block's `do_procedure_update` hook is
/// a listener that filters on its procedure id.
pub type ProcedureListener = Box<dyn FnMut(&ProcedureEvent)>;

/// A single edit to a procedure's parameter list, as produced by a
/// parameter-editing UI. Kept as plain data so edit handling is testable
/// without any widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ParameterEdit {
    Insert { index: usize, parameter: ParameterModel },
    Delete { index: usize },
    Rename { index: usize, name: String },
}

/// Mapping from procedure id to [`ProcedureModel`], in insertion order.
pub struct ProcedureMap {
    procedures: IndexMap<String, ProcedureModel>,
    listeners: Vec<ProcedureListener>,
}

impl std::fmt::Debug for ProcedureMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcedureMap")
            .field("procedures", &self.procedures)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ProcedureMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcedureMap {
    pub fn new() -> Self {
        Self {
            procedures: IndexMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a change listener. Listeners run in registration order.
    pub fn add_listener(&mut self, listener: ProcedureListener) {
        self.listeners.push(listener);
    }

    fn broadcast(&mut self, event: &ProcedureEvent) {
        debug!(event = event.kind_name(), "procedure event");
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn expect_mut(&mut self, id: &str) -> &mut ProcedureModel {
        self.procedures
            .get_mut(id)
            .unwrap_or_else(|| panic!("no procedure with id {id:?} in map"))
    }

    // ── Pure lookups ──

    pub fn get(&self, id: &str) -> Option<&ProcedureModel> {
        self.procedures.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.procedures.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// All procedures in insertion order.
    pub fn procedures(&self) -> impl Iterator<Item = &ProcedureModel> {
        self.procedures.values()
    }

    /// Index of the parameter with the given id in a procedure, if any.
    pub fn parameter_index(&self, procedure_id: &str, parameter_id: &str) -> Option<usize> {
        self.get(procedure_id)?
            .parameters()
            .iter()
            .position(|p| p.id() == parameter_id)
    }

    // ── Membership ──

    /// Register a procedure under its own id. Re-adding a model equal to
    /// the one already present is a no-op; otherwise the model is inserted
    /// (replacing any previous entry) and a create event fires.
    pub fn add(&mut self, model: ProcedureModel) -> Option<ProcedureEvent> {
        if self.procedures.get(model.id()) == Some(&model) {
            return None;
        }
        let event = ProcedureEvent::Create {
            procedure: model.clone(),
        };
        self.procedures.insert(model.id().to_string(), model);
        self.broadcast(&event);
        Some(event)
    }

    /// Register a procedure under `id`. The id must be the model's own id;
    /// violating that is a caller bug and only checked in debug builds.
    pub fn set(&mut self, id: &str, model: ProcedureModel) -> Option<ProcedureEvent> {
        debug_assert_eq!(id, model.id(), "set() id must match the model id");
        self.add(model)
    }

    /// Remove a procedure. No-op (no event) if absent.
    pub fn delete(&mut self, id: &str) -> Option<ProcedureEvent> {
        let removed = self.procedures.shift_remove(id)?;
        let event = ProcedureEvent::Delete { procedure: removed };
        self.broadcast(&event);
        Some(event)
    }

    /// Remove every procedure, firing one delete event per entry in
    /// insertion order.
    pub fn clear(&mut self) -> Vec<ProcedureEvent> {
        let ids: Vec<String> = self.procedures.keys().cloned().collect();
        ids.iter().filter_map(|id| self.delete(id)).collect()
    }

    // ── Model mutation (post-registration) ──
    //
    // Each method panics if `id` is not in the map: mutating an
    // unregistered procedure through the map is a caller logic error.

    /// Rename a procedure. No-op if the name is unchanged.
    pub fn set_name(&mut self, id: &str, name: &str) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        if model.name() == name {
            return None;
        }
        let old_name = model.name().to_string();
        model.set_name(name);
        let event = ProcedureEvent::Rename {
            procedure_id: id.to_string(),
            old_name,
            new_name: name.to_string(),
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Change a procedure's return-type descriptor.
    ///
    /// Only the `None` → `None` transition is suppressed. Equal non-null
    /// vectors still count as a change, as do `Some(vec![])` ↔ `None` in
    /// either direction.
    pub fn set_return_types(
        &mut self,
        id: &str,
        types: Option<Vec<String>>,
    ) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        if model.return_types().is_none() && types.is_none() {
            return None;
        }
        let old_types = model.return_types().map(<[String]>::to_vec);
        model.set_return_types(types.clone());
        let event = ProcedureEvent::ChangeReturn {
            procedure_id: id.to_string(),
            old_types,
            new_types: types,
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Enable or disable a procedure. No-op if the flag is unchanged.
    ///
    /// The event identifies the model only; it fires for both transitions
    /// and the current value is queryable from the map.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        if model.is_enabled() == enabled {
            return None;
        }
        model.set_enabled(enabled);
        let event = ProcedureEvent::Enable {
            procedure_id: id.to_string(),
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Insert a parameter at `index`. Panics if `index > len`.
    pub fn insert_parameter(
        &mut self,
        id: &str,
        index: usize,
        parameter: ParameterModel,
    ) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        model.insert_parameter(index, parameter.clone());
        let event = ProcedureEvent::ParameterCreate {
            procedure_id: id.to_string(),
            parameter,
            index,
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Delete the parameter at `index`. Panics if `index >= len`.
    pub fn delete_parameter(&mut self, id: &str, index: usize) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        let parameter = model.delete_parameter(index);
        let event = ProcedureEvent::ParameterDelete {
            procedure_id: id.to_string(),
            parameter,
            index,
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Rename the parameter at `index`, re-resolving its backing variable
    /// against `workspace`. No-op if the name is unchanged. Panics if
    /// `index >= len`.
    pub fn rename_parameter(
        &mut self,
        id: &str,
        index: usize,
        name: &str,
        workspace: &mut Workspace,
    ) -> Option<ProcedureEvent> {
        let model = self.expect_mut(id);
        assert!(
            index < model.parameters().len(),
            "parameter index {index} out of bounds (len {})",
            model.parameters().len()
        );
        let parameter = model.parameter_mut(index);
        let old_name = parameter.name().to_string();
        if !parameter.set_name(name, workspace) {
            return None;
        }
        let parameter_id = parameter.id().to_string();
        let event = ProcedureEvent::ParameterRename {
            procedure_id: id.to_string(),
            parameter_id,
            old_name,
            new_name: name.to_string(),
        };
        self.broadcast(&event);
        Some(event)
    }

    /// Apply a single [`ParameterEdit`] to a procedure's parameter list.
    pub fn edit_parameters(
        &mut self,
        id: &str,
        edit: ParameterEdit,
        workspace: &mut Workspace,
    ) -> Option<ProcedureEvent> {
        match edit {
            ParameterEdit::Insert { index, parameter } => {
                self.insert_parameter(id, index, parameter)
            }
            ParameterEdit::Delete { index } => self.delete_parameter(id, index),
            ParameterEdit::Rename { index, name } => {
                self.rename_parameter(id, index, &name, workspace)
            }
        }
    }
}
