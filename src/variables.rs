//! Workspace variable table.
//!
//! Procedures do not own the variables their parameters bind to; parameters
//! resolve a backing [`VariableModel`] by name against the owning
//! [`Workspace`] and share it by reference. The workspace is the single
//! owner of the variable table and of the id generator used for variables,
//! procedures, and parameters.

use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named workspace variable. Shared by reference between the workspace
/// table and any parameters backed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableModel {
    id: String,
    name: String,
}

impl VariableModel {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The variable-management side of a workspace.
///
/// Ids are generated from a per-workspace monotonic counter: stable for the
/// lifetime of the workspace and never reused.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Variables keyed by id, in creation order.
    variables: IndexMap<String, Rc<VariableModel>>,
    next_id: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh unique id.
    pub fn gen_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    /// Look up a variable by name, creating it if absent.
    ///
    /// Lookup and creation are a single logical step; callers never observe
    /// a state where the name is resolved but the variable does not yet
    /// exist in the table.
    pub fn create_variable(&mut self, name: &str) -> Rc<VariableModel> {
        if let Some(existing) = self.get_variable(name) {
            return existing;
        }
        let variable = Rc::new(VariableModel {
            id: self.gen_id(),
            name: name.to_string(),
        });
        self.variables
            .insert(variable.id.clone(), Rc::clone(&variable));
        variable
    }

    /// Look up a variable by name.
    pub fn get_variable(&self, name: &str) -> Option<Rc<VariableModel>> {
        self.variables
            .values()
            .find(|v| v.name == name)
            .map(Rc::clone)
    }

    /// Look up a variable by id.
    pub fn get_variable_by_id(&self, id: &str) -> Option<Rc<VariableModel>> {
        self.variables.get(id).map(Rc::clone)
    }

    /// Number of variables in the table.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// All variables in creation order.
    pub fn variables(&self) -> impl Iterator<Item = &Rc<VariableModel>> {
        self.variables.values()
    }
}
