//! Data-only procedure and parameter definitions.
//!
//! A [`ProcedureModel`] is the authoritative, renderer-independent
//! definition of one user-defined procedure: name, ordered parameters,
//! return-type descriptor, and enabled flag. Blocks reference a procedure
//! by id only and resynchronize their shape from change events; they never
//! hold the model itself.
//!
//! Models are built with consuming `with_*` chains before registration in a
//! [`crate::procedures::ProcedureMap`]. Construction-time mutation is
//! silent — only mutations routed through the map after registration are
//! observable as events.

use std::rc::Rc;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::variables::{VariableModel, Workspace};

// ────────────────────────────────────────────────────────────────────────────
// ParameterModel
// ────────────────────────────────────────────────────────────────────────────

/// One named parameter of a procedure, backed by a workspace variable.
///
/// The backing variable is resolved by name against the owning workspace:
/// reused if a variable of that name exists, created otherwise. Renaming a
/// parameter re-resolves (and may create) the backing variable; the old
/// variable is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterModel {
    id: String,
    name: String,
    variable: Rc<VariableModel>,
}

impl ParameterModel {
    pub fn new(workspace: &mut Workspace, name: &str) -> Self {
        let id = workspace.gen_id();
        let variable = workspace.create_variable(name);
        Self {
            id,
            name: name.to_string(),
            variable,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The currently resolved backing variable, shared with the workspace
    /// variable table.
    pub fn variable_model(&self) -> &Rc<VariableModel> {
        &self.variable
    }

    /// Rename the parameter, re-resolving the backing variable.
    ///
    /// Returns `true` if the name actually changed. A same-name rename
    /// leaves both the parameter and the variable table untouched.
    pub fn set_name(&mut self, name: &str, workspace: &mut Workspace) -> bool {
        if name == self.name {
            return false;
        }
        self.name = name.to_string();
        self.variable = workspace.create_variable(name);
        true
    }

    /// Parameter typing is an extension point; the base model has no type
    /// system and always refuses.
    pub fn set_types(&mut self, _types: &[String]) -> anyhow::Result<()> {
        bail!("the base parameter model does not support typing");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ProcedureModel
// ────────────────────────────────────────────────────────────────────────────

/// The definition of one procedure, independent of any block instance.
///
/// `return_types` distinguishes "no return value" (`None`) from "returns a
/// value with these type tags" (`Some`, possibly empty meaning untyped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureModel {
    id: String,
    name: String,
    parameters: Vec<ParameterModel>,
    return_types: Option<Vec<String>>,
    enabled: bool,
}

impl ProcedureModel {
    pub fn new(workspace: &mut Workspace, name: &str) -> Self {
        Self {
            id: workspace.gen_id(),
            name: name.to_string(),
            parameters: Vec::new(),
            return_types: None,
            enabled: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterModel] {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> Option<&ParameterModel> {
        self.parameters.get(index)
    }

    /// `None` means the procedure has no return value; `Some(&[])` means an
    /// untyped return value.
    pub fn return_types(&self) -> Option<&[String]> {
        self.return_types.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ── Construction chaining (silent; the model is not yet registered) ──

    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_return_types(mut self, types: Option<Vec<String>>) -> Self {
        self.set_return_types(types);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    /// Append a parameter during construction.
    pub fn with_parameter(mut self, parameter: ParameterModel) -> Self {
        let at = self.parameters.len();
        self.insert_parameter(at, parameter);
        self
    }

    // ── Plain setters ──
    //
    // These mutate silently. After the model is registered in a
    // ProcedureMap, mutations must go through the map so that no-op
    // suppression and event emission apply.

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_return_types(&mut self, types: Option<Vec<String>>) {
        self.return_types = types;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Insert a parameter at `index` (0-based; `index == len` appends).
    ///
    /// # Panics
    ///
    /// Panics if `index > len`. Duplicate parameter names are not validated
    /// here; uniqueness is a higher-layer concern.
    pub fn insert_parameter(&mut self, index: usize, parameter: ParameterModel) {
        assert!(
            index <= self.parameters.len(),
            "parameter index {index} out of bounds (len {})",
            self.parameters.len()
        );
        self.parameters.insert(index, parameter);
    }

    /// Remove and return the parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn delete_parameter(&mut self, index: usize) -> ParameterModel {
        assert!(
            index < self.parameters.len(),
            "parameter index {index} out of bounds (len {})",
            self.parameters.len()
        );
        self.parameters.remove(index)
    }

    pub(crate) fn parameter_mut(&mut self, index: usize) -> &mut ParameterModel {
        &mut self.parameters[index]
    }
}
