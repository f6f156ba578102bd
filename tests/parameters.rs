use std::rc::Rc;

use rustyblocks::procedures::ParameterModel;
use rustyblocks::variables::Workspace;

#[test]
fn parameter_reuses_existing_variable_by_name() {
    let mut ws = Workspace::new();
    let existing = ws.create_variable("v");

    let param = ParameterModel::new(&mut ws, "v");
    assert!(
        Rc::ptr_eq(param.variable_model(), &existing),
        "same variable shared by reference"
    );
    assert_eq!(param.variable_model().id(), existing.id());
    assert_eq!(ws.variable_count(), 1, "no duplicate created");
}

#[test]
fn parameter_with_fresh_name_creates_one_variable() {
    let mut ws = Workspace::new();
    assert_eq!(ws.variable_count(), 0);

    let param = ParameterModel::new(&mut ws, "total");
    assert_eq!(ws.variable_count(), 1);
    let created = ws.get_variable("total").expect("variable created");
    assert!(Rc::ptr_eq(param.variable_model(), &created));
    assert!(ws.get_variable_by_id(created.id()).is_some());
}

#[test]
fn rename_re_resolves_and_leaves_old_variable() {
    let mut ws = Workspace::new();
    let mut param = ParameterModel::new(&mut ws, "old");
    let old_var = Rc::clone(param.variable_model());

    assert!(param.set_name("new", &mut ws));
    assert_eq!(param.name(), "new");
    assert_eq!(param.variable_model().name(), "new");

    // The old variable survives untouched; it is never renamed in place.
    let still_there = ws.get_variable("old").expect("old variable kept");
    assert!(Rc::ptr_eq(&still_there, &old_var));
    assert_eq!(ws.variable_count(), 2);
}

#[test]
fn rename_to_existing_name_shares_that_variable() {
    let mut ws = Workspace::new();
    let shared = ws.create_variable("shared");
    let mut param = ParameterModel::new(&mut ws, "mine");

    param.set_name("shared", &mut ws);
    assert!(Rc::ptr_eq(param.variable_model(), &shared));
}

#[test]
fn same_name_rename_is_a_noop() {
    let mut ws = Workspace::new();
    let mut param = ParameterModel::new(&mut ws, "x");
    let before = Rc::clone(param.variable_model());

    assert!(!param.set_name("x", &mut ws));
    assert!(Rc::ptr_eq(param.variable_model(), &before));
    assert_eq!(ws.variable_count(), 1);
}

#[test]
fn base_model_refuses_typing() {
    let mut ws = Workspace::new();
    let mut param = ParameterModel::new(&mut ws, "x");
    let err = param
        .set_types(&["Number".to_string()])
        .expect_err("base model has no type system");
    assert!(err.to_string().contains("does not support typing"));
}

#[test]
fn workspace_ids_are_unique_and_stable() {
    let mut ws = Workspace::new();
    let a = ws.create_variable("a");
    let b = ws.create_variable("b");
    assert_ne!(a.id(), b.id());
    // Looking the variable up again yields the same id.
    assert_eq!(ws.get_variable("a").unwrap().id(), a.id());
}
