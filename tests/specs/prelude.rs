//! Shared harness for the behavioral specs

#![allow(dead_code)]

pub use similar_asserts::assert_eq;
pub use std::sync::Arc;
pub use std::time::Duration;
pub use vigil_cache::{EventCache, LocalCacheManager};
pub use vigil_core::{FakeClock, RoutedEvent, SequentialIdGen, Window};
pub use vigil_engine::{
    EngineConfig, EngineContext, EventEngine, Expression, ExpressionId, ListenerError,
    ProcessOutcome,
};

use std::sync::Mutex;
use vigil_cache::CacheManagerRegistry;

/// Minimal routed event: identity is the (route, id) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Msg {
    pub route: String,
    pub id: u32,
    pub alias: Option<String>,
}

impl Msg {
    pub fn on(route: &str, id: u32) -> Self {
        Self {
            route: route.to_string(),
            id,
            alias: None,
        }
    }

    pub fn aliased(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }
}

impl RoutedEvent for Msg {
    fn from_route(&self) -> Option<&str> {
        Some(&self.route)
    }

    fn alias_key(&self) -> Option<String> {
        self.alias.clone()
    }
}

/// A standalone cache on a fake clock
pub fn cache(spec: &str) -> (EventCache<Msg>, FakeClock) {
    let clock = FakeClock::new();
    let window = Window::parse(spec).unwrap();
    (EventCache::new("standalone", window, clock.shared()), clock)
}

pub fn ids(events: &[Arc<Msg>]) -> Vec<u32> {
    events.iter().map(|e| e.id).collect()
}

/// An engine on a fake clock whose listeners record every firing
pub struct Harness {
    pub engine: Arc<EventEngine<Msg, SequentialIdGen>>,
    pub clock: FakeClock,
    fired: Arc<Mutex<Vec<(String, u32)>>>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = FakeClock::new();
        let manager: Arc<LocalCacheManager<Msg>> =
            Arc::new(LocalCacheManager::new(clock.shared()));
        Self {
            engine: Arc::new(EventEngine::new(manager, SequentialIdGen::default())),
            clock,
            fired: Arc::default(),
        }
    }

    pub fn from_config(toml: &str) -> Self {
        let clock = FakeClock::new();
        let config = EngineConfig::from_toml_str(toml).unwrap();
        let context = EngineContext::new(clock.shared(), SequentialIdGen::default());
        let engine =
            EventEngine::from_config(&config, &CacheManagerRegistry::with_defaults(), context)
                .unwrap();
        Self {
            engine: Arc::new(engine),
            clock,
            fired: Arc::default(),
        }
    }

    pub fn route(self, id: &str, window: &str) -> Self {
        self.engine.add_route(id, window).unwrap();
        self
    }

    /// Register an expression whose listener records (expression, event id)
    pub fn watch(&self, expression: Expression<Msg>) -> ExpressionId {
        self.watch_shared(Arc::new(expression))
    }

    /// Register an already shared tree
    pub fn watch_shared(&self, expression: Arc<Expression<Msg>>) -> ExpressionId {
        let fired = Arc::clone(&self.fired);
        self.engine
            .add_expression(expression, move |expr: &Expression<Msg>, ev: &Msg| {
                fired.lock().unwrap().push((expr.to_string(), ev.id));
                Ok::<(), ListenerError>(())
            })
    }

    pub fn send(&self, event: Msg) -> Sent {
        Sent(self.engine.process(event).unwrap())
    }

    /// Drain the recorded firings
    pub fn fired(&self) -> Vec<(String, u32)> {
        std::mem::take(&mut *self.fired.lock().unwrap())
    }

    pub fn advance_ms(&self, millis: i64) {
        self.clock.advance_by(millis);
    }
}

/// Outcome of one `process` call, with fluent assertions
#[derive(Debug)]
pub struct Sent(pub ProcessOutcome);

impl Sent {
    pub fn fires(self, expected: usize) -> Self {
        match &self.0 {
            ProcessOutcome::Admitted { fired, .. } => assert_eq!(
                *fired, expected,
                "wrong number of listeners fired for {:?}",
                self.0
            ),
            other => panic!("expected admission, got {:?}", other),
        }
        self
    }

    pub fn is_duplicate(self) -> Self {
        assert!(
            matches!(self.0, ProcessOutcome::Duplicate { .. }),
            "expected duplicate, got {:?}",
            self.0
        );
        self
    }

    pub fn is_dropped(self) -> Self {
        assert!(
            matches!(
                self.0,
                ProcessOutcome::NoCache { .. } | ProcessOutcome::Unrouted
            ),
            "expected the event to be dropped, got {:?}",
            self.0
        );
        self
    }

    pub fn lands_in(self, route: &str) -> Self {
        match &self.0 {
            ProcessOutcome::Admitted { route: r, .. } | ProcessOutcome::Duplicate { route: r } => {
                assert_eq!(r.as_str(), route)
            }
            other => panic!("expected {} to receive the event, got {:?}", route, other),
        }
        self
    }
}
