//! Expression operator specs
//!
//! Verify compound expressions evaluate against live cache contents.

use crate::prelude::*;
use crate::prelude::assert_eq;

fn leaf(route: &str) -> Expression<Msg> {
    Expression::route(route)
}

#[test]
fn and_matches_only_when_both_routes_hold_events() {
    let h = Harness::new().route("a", "").route("b", "");
    let expr = Arc::new(Expression::and(leaf("a"), leaf("b")));
    expr.start(h.engine.cache_manager().as_ref());

    assert!(!expr.is_match());
    assert!(expr.matching().is_none());

    h.send(Msg::on("a", 1));
    assert!(!expr.is_match());
    assert!(expr.matching().is_none());

    h.send(Msg::on("b", 2));
    assert!(expr.is_match());
    let matching = expr.matching().unwrap();
    let ids: Vec<u32> = matching.iter().map(|item| item.event().id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn and_stops_matching_when_one_side_expires() {
    let h = Harness::new().route("a", "5s").route("b", "");
    h.watch(Expression::and(leaf("a"), leaf("b")));

    h.send(Msg::on("a", 1)).fires(0);
    h.send(Msg::on("b", 2)).fires(1);
    h.advance_ms(6_000);
    h.send(Msg::on("b", 3)).fires(0);
    h.send(Msg::on("a", 4)).fires(1);

    assert_eq!(
        h.fired(),
        vec![("(a AND b)".to_string(), 2), ("(a AND b)".to_string(), 4)]
    );
}

#[test]
fn or_fires_for_either_route() {
    let h = Harness::new();
    h.watch(Expression::or(leaf("a"), leaf("b")));

    h.send(Msg::on("b", 1)).fires(1);
    h.send(Msg::on("a", 2)).fires(1);
}

#[test]
fn before_fires_until_the_later_route_sees_an_event() {
    let h = Harness::new();
    h.watch(Expression::before(leaf("a"), leaf("b")));

    h.send(Msg::on("a", 1)).fires(1);
    h.send(Msg::on("b", 2)).fires(0);
    h.send(Msg::on("a", 3)).fires(0);
}

#[test]
fn not_inverts_its_operand() {
    let h = Harness::new().route("trigger", "");
    h.watch(Expression::and(leaf("trigger"), Expression::not(leaf("veto"))));

    h.send(Msg::on("trigger", 1)).fires(1);
    h.send(Msg::on("veto", 2)).fires(0);
    h.send(Msg::on("trigger", 3)).fires(0);
}

#[test]
fn parsed_operators_build_equivalent_trees() {
    let op: vigil_engine::Operator = "&&".parse().unwrap();
    let expr: Expression<Msg> = Expression::compound(op, Some(leaf("a")), Some(leaf("b")));

    assert_eq!(expr.to_string().as_str(), "(a AND b)");
    assert_eq!(expr.from_ids().as_str(), "a,b");
}
