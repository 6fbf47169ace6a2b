//! Configuration specs
//!
//! Verify engines built from TOML get their routes and windows.

use crate::prelude::*;
use crate::prelude::assert_eq;

const CONFIG: &str = r#"
cache_manager = "local"

[[routes]]
id = "orders"
window = "2"

[[routes]]
id = "payments"
window = "1m"
"#;

#[test]
fn configured_routes_accept_events() {
    let h = Harness::from_config(CONFIG);
    h.watch(Expression::and(
        Expression::route("orders"),
        Expression::route("payments"),
    ));

    h.send(Msg::on("orders", 1)).fires(0);
    h.send(Msg::on("payments", 2)).fires(1);
    h.send(Msg::on("shipping", 3)).is_dropped();
}

#[test]
fn configured_windows_apply() {
    let h = Harness::from_config(CONFIG);
    for id in 0..4 {
        h.send(Msg::on("orders", id));
    }
    h.send(Msg::on("payments", 9));

    let orders = h.engine.cache("orders").unwrap();
    assert_eq!(ids(&orders.window()), vec![2, 3]);

    let payments = h.engine.cache("payments").unwrap();
    assert_eq!(payments.window_spec(), Window::age(Duration::from_secs(60)));
    h.advance_ms(61_000);
    assert!(payments.is_empty());
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.routes.len(), 2);
    assert_eq!(config.routes[1].window.to_string().as_str(), "1m");
}

#[test]
fn unknown_cache_manager_is_rejected() {
    let config = EngineConfig::from_toml_str("cache_manager = \"hazelcast\"\n").unwrap();
    let context = EngineContext::new(FakeClock::new().shared(), SequentialIdGen::default());
    let registry = vigil_cache::CacheManagerRegistry::with_defaults();

    let result: Result<EventEngine<Msg, _>, _> =
        EventEngine::from_config(&config, &registry, context);
    let err = result.err().unwrap();
    assert!(err.to_string().contains("hazelcast"), "got: {}", err);
}
