// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route bindings for registered expressions
//!
//! The forward map lists, per route, every expression that must be
//! re-evaluated when that route admits an event. The inverse map remembers
//! which routes each expression was bound to so removal can undo all of them.

use crate::expression::Expression;
use crate::listener::Listener;
use std::collections::HashMap;
use std::sync::Arc;
use vigil_core::ExpressionId;

/// An expression and the listener to notify when it matches
pub struct Binding<E> {
    pub id: ExpressionId,
    pub expression: Arc<Expression<E>>,
    pub listener: Arc<dyn Listener<E>>,
}

impl<E> Clone for Binding<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            expression: Arc::clone(&self.expression),
            listener: Arc::clone(&self.listener),
        }
    }
}

struct Registration<E> {
    expression: Arc<Expression<E>>,
    routes: Vec<String>,
}

/// Forward and inverse route maps
pub struct RoutingTable<E> {
    forward: HashMap<String, Vec<Binding<E>>>,
    inverse: HashMap<ExpressionId, Registration<E>>,
}

impl<E> RoutingTable<E> {
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            inverse: HashMap::new(),
        }
    }

    /// Append the binding to every route its expression reads. Returns the
    /// routes it was bound to.
    pub fn bind(&mut self, binding: Binding<E>) -> Vec<String> {
        let routes = split_route_ids(&binding.expression.from_ids());
        for route in &routes {
            self.forward
                .entry(route.clone())
                .or_default()
                .push(binding.clone());
        }
        self.inverse.insert(
            binding.id,
            Registration {
                expression: binding.expression,
                routes: routes.clone(),
            },
        );
        routes
    }

    /// Remove every binding created for `id`, dropping routes left without
    /// bindings. Returns the expression if it was registered.
    pub fn unbind(&mut self, id: &ExpressionId) -> Option<Arc<Expression<E>>> {
        let registration = self.inverse.remove(id)?;
        for route in &registration.routes {
            if let Some(bindings) = self.forward.get_mut(route) {
                bindings.retain(|b| &b.id != id);
                if bindings.is_empty() {
                    self.forward.remove(route);
                }
            }
        }
        Some(registration.expression)
    }

    /// Bindings for `route`, in registration order
    pub fn bindings(&self, route: &str) -> Vec<Binding<E>> {
        self.forward.get(route).cloned().unwrap_or_default()
    }

    /// Routes an expression was bound to
    pub fn routes_for(&self, id: &ExpressionId) -> Option<&[String]> {
        self.inverse.get(id).map(|r| r.routes.as_slice())
    }

    /// Routes with at least one binding, sorted
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self.forward.keys().cloned().collect();
        routes.sort();
        routes
    }

    pub fn contains_route(&self, route: &str) -> bool {
        self.forward.contains_key(route)
    }

    /// Every registered expression
    pub fn expressions(&self) -> Vec<Arc<Expression<E>>> {
        self.inverse
            .values()
            .map(|r| Arc::clone(&r.expression))
            .collect()
    }

    /// Whether any registration still holds this exact expression tree
    pub fn holds(&self, expression: &Arc<Expression<E>>) -> bool {
        self.inverse
            .values()
            .any(|r| Arc::ptr_eq(&r.expression, expression))
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }
}

impl<E> Default for RoutingTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a comma-separated route list, trimming whitespace and dropping
/// empty and repeated entries
pub fn split_route_ids(from_ids: &str) -> Vec<String> {
    let mut routes: Vec<String> = Vec::new();
    for route in from_ids.split(',').map(str::trim) {
        if !route.is_empty() && !routes.iter().any(|r| r == route) {
            routes.push(route.to_string());
        }
    }
    routes
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
