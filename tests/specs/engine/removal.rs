//! Expression removal and lifecycle specs
//!
//! Verify removed or stopped expressions stay silent.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn removed_expression_never_fires_again() {
    let h = Harness::new().route("r1", "");
    let id = h.watch(Expression::route("r1"));
    h.send(Msg::on("r1", 1)).fires(1);

    assert!(h.engine.remove_expression(&id));
    h.send(Msg::on("r1", 2)).fires(0);
    h.send(Msg::on("r1", 3)).fires(0);
    assert_eq!(h.fired().len(), 1);
}

#[test]
fn last_binding_removal_drops_route_entry() {
    let h = Harness::new();
    let keep = h.watch(Expression::route("r1"));
    let gone = h.watch(Expression::and(
        Expression::route("r1"),
        Expression::route("r2"),
    ));
    assert_eq!(h.engine.routes(), vec!["r1".to_string(), "r2".to_string()]);

    h.engine.remove_expression(&gone);
    assert_eq!(h.engine.bindings("r1"), vec![keep.clone()]);
    assert!(h.engine.bindings("r2").is_empty());
    assert_eq!(h.engine.routes(), vec!["r1".to_string()]);

    h.engine.remove_expression(&keep);
    assert!(h.engine.routes().is_empty());
    // Caches outlive their bindings
    assert!(h.engine.cache("r2").is_some());
}

#[test]
fn stop_silences_everything() {
    let h = Harness::new();
    h.watch(Expression::route("r1"));
    h.engine.start();
    h.send(Msg::on("r1", 1)).fires(1);

    h.engine.stop();
    assert!(!h.engine.is_running());
    h.send(Msg::on("r1", 2)).fires(0);
    assert_eq!(h.engine.expression_count(), 0);
}

#[test]
fn shared_tree_survives_removal_of_one_registration() {
    let h = Harness::new().route("r1", "");
    let tree = Arc::new(Expression::route("r1"));
    let first = h.watch_shared(Arc::clone(&tree));
    h.watch_shared(tree);

    h.engine.remove_expression(&first);
    h.send(Msg::on("r1", 1)).fires(1);
}

#[test]
fn route_removed_and_added_again_keeps_feeding_expressions() {
    let h = Harness::new().route("r1", "");
    h.watch(Expression::route("r1"));

    assert!(h.engine.remove_route("r1"));
    h.send(Msg::on("r1", 1)).is_dropped();

    let h = h.route("r1", "");
    h.send(Msg::on("r1", 2)).fires(1);
}
