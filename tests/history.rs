use std::cell::RefCell;
use std::rc::Rc;

use rustyblocks::procedures::{
    ParameterModel, ProcedureEvent, ProcedureHistory, ProcedureMap, ProcedureModel,
};
use rustyblocks::variables::Workspace;

fn record(map: &mut ProcedureMap) -> Rc<RefCell<Vec<ProcedureEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    map.add_listener(Box::new(move |event| sink.borrow_mut().push(event.clone())));
    log
}

#[test]
fn undo_redo_round_trips_a_rename() {
    let mut ws = Workspace::new();
    let mut map = ProcedureMap::new();
    let mut history = ProcedureHistory::new(100);

    let model = ProcedureModel::new(&mut ws, "original");
    let id = model.id().to_string();
    map.add(model);

    let event = map.set_name(&id, "renamed").unwrap();
    history.push(event);
    assert!(history.can_undo());

    assert!(history.undo(&mut map, &mut ws));
    assert_eq!(map.get(&id).unwrap().name(), "original");
    assert!(history.can_redo());

    assert!(history.redo(&mut map, &mut ws));
    assert_eq!(map.get(&id).unwrap().name(), "renamed");
}

#[test]
fn undo_of_delete_restores_the_model() {
    let mut ws = Workspace::new();
    let mut map = ProcedureMap::new();
    let mut history = ProcedureHistory::new(100);

    let model = ProcedureModel::new(&mut ws, "keep_me")
        .with_return_types(Some(vec!["Number".into()]))
        .with_parameter(ParameterModel::new(&mut ws, "n"));
    let id = model.id().to_string();
    map.add(model.clone());

    history.push(map.delete(&id).unwrap());
    assert!(!map.has(&id));

    history.undo(&mut map, &mut ws);
    let restored = map.get(&id).expect("model restored");
    assert_eq!(restored, &model, "full snapshot round trip");
}

#[test]
fn undo_emits_the_inverse_event() {
    let mut ws = Workspace::new();
    let mut map = ProcedureMap::new();
    let mut history = ProcedureHistory::new(100);

    let model = ProcedureModel::new(&mut ws, "f");
    let id = model.id().to_string();
    map.add(model);
    history.push(map.set_enabled(&id, false).unwrap());

    // Listening blocks must see undo mutations like any other change.
    let log = record(&mut map);
    history.undo(&mut map, &mut ws);
    assert!(map.get(&id).unwrap().is_enabled());
    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert!(matches!(&log[0], ProcedureEvent::Enable { .. }));
}

#[test]
fn parameter_rename_undo_re_resolves_variable() {
    let mut ws = Workspace::new();
    let mut map = ProcedureMap::new();
    let mut history = ProcedureHistory::new(100);

    let model =
        ProcedureModel::new(&mut ws, "f").with_parameter(ParameterModel::new(&mut ws, "before"));
    let id = model.id().to_string();
    map.add(model);

    history.push(map.rename_parameter(&id, 0, "after", &mut ws).unwrap());
    history.undo(&mut map, &mut ws);

    let param = &map.get(&id).unwrap().parameters()[0];
    assert_eq!(param.name(), "before");
    let backing = ws.get_variable("before").unwrap();
    assert!(Rc::ptr_eq(param.variable_model(), &backing));
}

#[test]
fn push_clears_redo_and_respects_depth() {
    let mut ws = Workspace::new();
    let mut map = ProcedureMap::new();
    let mut history = ProcedureHistory::new(2);

    let model = ProcedureModel::new(&mut ws, "a");
    let id = model.id().to_string();
    map.add(model);

    for name in ["b", "c", "d"] {
        history.push(map.set_name(&id, name).unwrap());
    }
    // Depth 2: the oldest rename fell off the stack.
    assert!(history.undo(&mut map, &mut ws));
    assert!(history.undo(&mut map, &mut ws));
    assert!(!history.undo(&mut map, &mut ws));
    assert_eq!(map.get(&id).unwrap().name(), "b");

    // A new edit clears the redo stack.
    assert!(history.can_redo());
    history.push(map.set_name(&id, "e").unwrap());
    assert!(!history.can_redo());
}
