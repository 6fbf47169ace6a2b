// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event engine: routes events into caches and fires matching expressions
//!
//! `process` may be called from many threads at once. Registration and
//! removal of expressions serialize on the routing table's write guard;
//! `process` only holds its read guard long enough to copy one route's
//! bindings, so listeners are free to call back into the engine.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::expression::{Expression, ExpressionError, RoutingContext};
use crate::listener::Listener;
use crate::routing::{Binding, RoutingTable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace, warn};
use vigil_cache::{CacheManager, CacheManagerRegistry, EventCache};
use vigil_core::{ExpressionId, IdGen, RoutedEvent, SharedClock, SystemClock, UuidIdGen, Window};

/// What `process` did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The event named no route or endpoint
    Unrouted,
    /// No cache is registered for the event's route or alias
    NoCache { route: String },
    /// An equal event is already retained
    Duplicate { route: String },
    /// The event was admitted and `fired` listeners were notified
    Admitted { route: String, fired: usize },
}

/// Host-supplied collaborators for building an engine
#[derive(Clone)]
pub struct EngineContext<I = UuidIdGen> {
    pub clock: SharedClock,
    pub id_gen: I,
}

impl EngineContext {
    /// Wall clock and UUID expression ids
    pub fn system() -> Self {
        Self {
            clock: SystemClock::shared(),
            id_gen: UuidIdGen,
        }
    }
}

impl<I> EngineContext<I> {
    pub fn new(clock: SharedClock, id_gen: I) -> Self {
        Self { clock, id_gen }
    }
}

pub struct EventEngine<E, I = UuidIdGen> {
    manager: Arc<dyn CacheManager<E>>,
    routing: RwLock<RoutingTable<E>>,
    id_gen: I,
    running: AtomicBool,
}

impl<E: RoutedEvent, I: IdGen> EventEngine<E, I> {
    /// Build around an explicit cache manager
    pub fn new(manager: Arc<dyn CacheManager<E>>, id_gen: I) -> Self {
        Self {
            manager,
            routing: RwLock::new(RoutingTable::new()),
            id_gen,
            running: AtomicBool::new(false),
        }
    }

    /// Build with the cache manager registered under `cache_manager`
    pub fn initialize(
        context: EngineContext<I>,
        registry: &CacheManagerRegistry<E>,
        cache_manager: &str,
    ) -> Result<Self, EngineError> {
        let manager = registry
            .create(cache_manager, context.clock)
            .ok_or_else(|| EngineError::UnknownCacheManager(cache_manager.to_string()))?;
        info!(cache_manager, "event engine initialized");
        Ok(Self::new(manager, context.id_gen))
    }

    /// Initialize from configuration and register its routes
    pub fn from_config(
        config: &EngineConfig,
        registry: &CacheManagerRegistry<E>,
        context: EngineContext<I>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let engine = Self::initialize(context, registry, &config.cache_manager)?;
        for route in &config.routes {
            engine.add_route_with(route.id.trim(), route.window);
        }
        Ok(engine)
    }

    fn read_routing(&self) -> RwLockReadGuard<'_, RoutingTable<E>> {
        self.routing.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_routing(&self) -> RwLockWriteGuard<'_, RoutingTable<E>> {
        self.routing.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn cache_manager(&self) -> &Arc<dyn CacheManager<E>> {
        &self.manager
    }

    // === Routes ===

    /// Register a route's cache, parsing `window` as a window specification.
    /// An existing cache is returned unchanged.
    pub fn add_route(&self, route: &str, window: &str) -> Result<Arc<EventCache<E>>, EngineError> {
        let window = Window::parse(window)?;
        Ok(self.add_route_with(route, window))
    }

    pub fn add_route_with(&self, route: &str, window: Window) -> Arc<EventCache<E>> {
        debug!(route, %window, "adding route");
        let routing = self.read_routing();
        if let Some(existing) = self.manager.lookup_cache(route) {
            if existing.window_spec() != window {
                warn!(
                    route,
                    requested = %window,
                    existing = %existing.window_spec(),
                    "route already has a cache with a different window, keeping it"
                );
            }
            return existing;
        }
        let cache = self.manager.get_cache(route, window);
        for binding in routing.bindings(route) {
            binding.expression.rebind(route, Some(&cache));
        }
        cache
    }

    /// Drop a route's cache. Bound expressions stop reading it until the
    /// route is added again.
    pub fn remove_route(&self, route: &str) -> bool {
        debug!(route, "removing route");
        let routing = self.read_routing();
        let removed = self.manager.remove_cache(route);
        if removed {
            for binding in routing.bindings(route) {
                binding.expression.rebind(route, None);
            }
        }
        removed
    }

    pub fn cache(&self, route: &str) -> Option<Arc<EventCache<E>>> {
        self.manager.lookup_cache(route)
    }

    // === Expressions ===

    /// Start `expression` and bind it, with `listener`, to every route it
    /// reads
    pub fn add_expression(
        &self,
        expression: impl Into<Arc<Expression<E>>>,
        listener: impl Listener<E> + 'static,
    ) -> ExpressionId {
        let expression = expression.into();
        expression.start(self.manager.as_ref());

        let id = self.id_gen.mint();
        let routes = self.write_routing().bind(Binding {
            id: id.clone(),
            expression: Arc::clone(&expression),
            listener: Arc::new(listener),
        });
        debug!(expression = %id, tree = %expression, ?routes, "expression registered");
        id
    }

    /// Unbind and stop an expression. Returns whether it was registered.
    pub fn remove_expression(&self, id: &ExpressionId) -> bool {
        let mut routing = self.write_routing();
        let Some(expression) = routing.unbind(id) else {
            return false;
        };
        // The same tree may be registered under another id
        if routing.holds(&expression) {
            debug!(expression = %id, "expression removed, tree still registered");
        } else {
            expression.stop();
            debug!(expression = %id, "expression removed");
        }
        true
    }

    /// Expressions bound to `route`, in registration order
    pub fn bindings(&self, route: &str) -> Vec<ExpressionId> {
        self.read_routing()
            .bindings(route)
            .into_iter()
            .map(|b| b.id)
            .collect()
    }

    /// Routes with at least one bound expression, sorted
    pub fn routes(&self) -> Vec<String> {
        self.read_routing().routes()
    }

    pub fn expression_count(&self) -> usize {
        self.read_routing().len()
    }

    /// Check an expression's routes against the registered caches
    pub fn validate(&self, expression: &Expression<E>) -> Result<(), ExpressionError> {
        expression.validate(self)
    }

    // === Events ===

    /// Admit an event into its route's cache and notify every bound
    /// expression that matches afterwards.
    ///
    /// A listener error stops evaluation for this event and is returned.
    pub fn process(&self, event: impl Into<Arc<E>>) -> Result<ProcessOutcome, EngineError> {
        let event = event.into();

        let Some(origin) = event.origin() else {
            warn!("event has no originating route or endpoint, dropping");
            return Ok(ProcessOutcome::Unrouted);
        };

        let (route, cache) = match self.manager.lookup_cache(origin) {
            Some(cache) => (origin.to_string(), cache),
            None => {
                let alias = event
                    .alias_key()
                    .and_then(|key| self.manager.lookup_cache(&key).map(|cache| (key, cache)));
                match alias {
                    Some(found) => found,
                    None => {
                        warn!(route = origin, "no cache registered for route, dropping event");
                        return Ok(ProcessOutcome::NoCache {
                            route: origin.to_string(),
                        });
                    }
                }
            }
        };

        if !cache.add(Arc::clone(&event)) {
            trace!(route = %route, "duplicate event ignored");
            return Ok(ProcessOutcome::Duplicate { route });
        }

        let bindings = self.read_routing().bindings(&route);
        let mut fired = 0;
        for binding in bindings {
            if !binding.expression.is_match() {
                continue;
            }
            debug!(route = %route, expression = %binding.id, "expression matched");
            binding
                .listener
                .on_match(&binding.expression, &event)
                .map_err(|source| EngineError::Listener {
                    expression: binding.id.clone(),
                    source,
                })?;
            fired += 1;
        }

        Ok(ProcessOutcome::Admitted { route, fired })
    }

    // === Lifecycle ===

    pub fn start(&self) {
        self.manager.start();
        let expressions = self.read_routing().expressions();
        for expression in &expressions {
            expression.start(self.manager.as_ref());
        }
        self.running.store(true, Ordering::SeqCst);
        info!(expressions = expressions.len(), "event engine started");
    }

    /// Stop every expression and the cache manager, then drop all bindings
    pub fn stop(&self) {
        let mut routing = self.write_routing();
        for expression in routing.expressions() {
            expression.stop();
        }
        self.manager.stop();
        routing.clear();
        drop(routing);
        self.running.store(false, Ordering::SeqCst);
        info!("event engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl<E: RoutedEvent, I: IdGen> RoutingContext for EventEngine<E, I> {
    fn has_route(&self, route: &str) -> bool {
        self.manager.lookup_cache(route).is_some()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
