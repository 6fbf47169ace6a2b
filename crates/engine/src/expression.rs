// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composable expressions over route caches
//!
//! A route expression matches while its cache holds any event. A leaf may
//! name several routes (`"a, b"`); it then matches while any of them does.
//! Compound expressions combine two optional children:
//!
//! | Operator | matches when | matching events |
//! |---|---|---|
//! | AND | both sides match | both sides, when both produced some |
//! | OR | either side matches | whatever either side produced |
//! | NOT | the designated side does not match | whatever either side produced |
//! | BEFORE | left matches and right does not | left's, when right produced none |
//! | AFTER | right matches and left does not | right's, when left produced none |
//!
//! NOT designates its right child, or its left child when there is no right.
//!
//! `evaluate` reads every leaf cache exactly once, so the match state and
//! the matching set always describe the same snapshot. `is_match` makes the
//! same single pass but only asks each cache whether it is empty. Caches touched by
//! one expression are still read one after another without a joint lock;
//! another thread may admit into a later cache between two reads.

use crate::routing::split_route_ids;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use vigil_cache::{sort_by_timestamp, CacheItem, CacheManager, EventCache};
use vigil_core::Window;

/// Errors from building or validating expressions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}

/// Source of truth for which route ids exist
pub trait RoutingContext {
    fn has_route(&self, route: &str) -> bool;
}

impl RoutingContext for HashSet<String> {
    fn has_route(&self, route: &str) -> bool {
        self.contains(route)
    }
}

impl RoutingContext for BTreeSet<String> {
    fn has_route(&self, route: &str) -> bool {
        self.contains(route)
    }
}

impl RoutingContext for Vec<String> {
    fn has_route(&self, route: &str) -> bool {
        self.iter().any(|r| r == route)
    }
}

impl RoutingContext for [&str] {
    fn has_route(&self, route: &str) -> bool {
        self.iter().any(|r| *r == route)
    }
}

/// Compound operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    Before,
    After,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Before => "BEFORE",
            Operator::After => "AFTER",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" | "&&" | "&" => Ok(Operator::And),
            "or" | "||" | "|" => Ok(Operator::Or),
            "not" | "!" => Ok(Operator::Not),
            "before" | "<" => Ok(Operator::Before),
            "after" | ">" => Ok(Operator::After),
            _ => Err(ExpressionError::UnknownOperator(s.to_string())),
        }
    }
}

/// Match state and matching events from a single evaluation pass
pub struct Evaluation<E> {
    pub matched: bool,
    /// Events behind the match, oldest first; `None` when nothing qualifies
    pub matching: Option<Vec<CacheItem<E>>>,
}

/// Leaf expression over one route, or a comma-separated set of routes.
/// It matches while any of its caches holds an event.
pub struct RouteExpression<E> {
    routes: Vec<String>,
    window: Window,
    // One slot per route while started, empty while stopped
    caches: RwLock<Vec<Option<Arc<EventCache<E>>>>>,
}

impl<E> RouteExpression<E> {
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Window used if this leaf is the first to reference a route
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn is_bound(&self) -> bool {
        !self.read_caches().is_empty()
    }

    fn read_caches(&self) -> RwLockReadGuard<'_, Vec<Option<Arc<EventCache<E>>>>> {
        self.caches.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_caches(&self) -> RwLockWriteGuard<'_, Vec<Option<Arc<EventCache<E>>>>> {
        self.caches.write().unwrap_or_else(|e| e.into_inner())
    }

    fn bound_caches(&self) -> Vec<Arc<EventCache<E>>> {
        self.read_caches().iter().flatten().cloned().collect()
    }
}

impl<E: Eq + std::hash::Hash> RouteExpression<E> {
    fn has_events(&self) -> bool {
        self.bound_caches().iter().any(|cache| !cache.is_empty())
    }

    fn evaluate(&self) -> Evaluation<E> {
        let caches = self.bound_caches();
        let mut items: Vec<CacheItem<E>> = Vec::new();
        for cache in &caches {
            items.extend(cache.items());
        }
        if caches.len() > 1 {
            sort_by_timestamp(&mut items);
        }
        let matched = !items.is_empty();
        Evaluation {
            matched,
            matching: matched.then_some(items),
        }
    }
}

/// Operator applied to two optional children
pub struct CompoundExpression<E> {
    operator: Operator,
    left: Option<Box<Expression<E>>>,
    right: Option<Box<Expression<E>>>,
}

impl<E> CompoundExpression<E> {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn left(&self) -> Option<&Expression<E>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Expression<E>> {
        self.right.as_deref()
    }
}

/// A node of the expression tree
pub enum Expression<E> {
    Route(RouteExpression<E>),
    Compound(CompoundExpression<E>),
}

impl<E> Expression<E> {
    /// Leaf on `route`; an unbounded cache is created if none exists yet
    pub fn route(route: impl Into<String>) -> Self {
        Self::route_with_window(route, Window::unbounded())
    }

    /// Leaf on `route`, creating its cache with `window` if none exists yet.
    /// `route` may list several routes separated by commas.
    pub fn route_with_window(route: impl Into<String>, window: Window) -> Self {
        Expression::Route(RouteExpression {
            routes: split_route_ids(&route.into()),
            window,
            caches: RwLock::new(Vec::new()),
        })
    }

    pub fn compound(
        operator: Operator,
        left: Option<Expression<E>>,
        right: Option<Expression<E>>,
    ) -> Self {
        Expression::Compound(CompoundExpression {
            operator,
            left: left.map(Box::new),
            right: right.map(Box::new),
        })
    }

    pub fn and(left: Expression<E>, right: Expression<E>) -> Self {
        Self::compound(Operator::And, Some(left), Some(right))
    }

    pub fn or(left: Expression<E>, right: Expression<E>) -> Self {
        Self::compound(Operator::Or, Some(left), Some(right))
    }

    pub fn not(inner: Expression<E>) -> Self {
        Self::compound(Operator::Not, None, Some(inner))
    }

    pub fn before(left: Expression<E>, right: Expression<E>) -> Self {
        Self::compound(Operator::Before, Some(left), Some(right))
    }

    pub fn after(left: Expression<E>, right: Expression<E>) -> Self {
        Self::compound(Operator::After, Some(left), Some(right))
    }

    /// Comma-joined route ids this expression reads, leaves in tree order
    pub fn from_ids(&self) -> String {
        self.route_ids().join(",")
    }

    /// Route ids this expression reads, leaves in tree order
    pub fn route_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_route_ids(&mut ids);
        ids
    }

    fn collect_route_ids(&self, ids: &mut Vec<String>) {
        match self {
            Expression::Route(leaf) => ids.extend(leaf.routes.iter().cloned()),
            Expression::Compound(node) => {
                for child in [&node.left, &node.right].into_iter().flatten() {
                    child.collect_route_ids(ids);
                }
            }
        }
    }

    /// Check every leaf route against the routing context
    pub fn validate<C: RoutingContext + ?Sized>(&self, context: &C) -> Result<(), ExpressionError> {
        match self {
            Expression::Route(leaf) => {
                if leaf.routes.is_empty() {
                    return Err(ExpressionError::UnknownRoute(String::new()));
                }
                match leaf.routes.iter().find(|r| !context.has_route(r)) {
                    Some(missing) => Err(ExpressionError::UnknownRoute(missing.clone())),
                    None => Ok(()),
                }
            }
            Expression::Compound(node) => {
                for child in [&node.left, &node.right].into_iter().flatten() {
                    child.validate(context)?;
                }
                Ok(())
            }
        }
    }

    /// Bind every leaf to its routes' caches, creating missing ones
    pub fn start(&self, manager: &dyn CacheManager<E>) {
        match self {
            Expression::Route(leaf) => {
                let caches = leaf
                    .routes
                    .iter()
                    .map(|route| Some(manager.get_cache(route, leaf.window)))
                    .collect();
                *leaf.write_caches() = caches;
            }
            Expression::Compound(node) => {
                for child in [&node.left, &node.right].into_iter().flatten() {
                    child.start(manager);
                }
            }
        }
    }

    /// Release every leaf's caches
    pub fn stop(&self) {
        match self {
            Expression::Route(leaf) => leaf.write_caches().clear(),
            Expression::Compound(node) => {
                for child in [&node.left, &node.right].into_iter().flatten() {
                    child.stop();
                }
            }
        }
    }

    /// Point started leaves that read `route` at `cache`, or detach them
    /// from it with `None`. Stopped leaves are left alone.
    pub(crate) fn rebind(&self, route: &str, cache: Option<&Arc<EventCache<E>>>) {
        match self {
            Expression::Route(leaf) => {
                let mut caches = leaf.write_caches();
                for (slot, r) in caches.iter_mut().zip(&leaf.routes) {
                    if r == route {
                        *slot = cache.cloned();
                    }
                }
            }
            Expression::Compound(node) => {
                for child in [&node.left, &node.right].into_iter().flatten() {
                    child.rebind(route, cache);
                }
            }
        }
    }

    /// Match state only. Reads each leaf once without copying its items.
    pub fn is_match(&self) -> bool
    where
        E: Eq + std::hash::Hash,
    {
        match self {
            Expression::Route(leaf) => leaf.has_events(),
            Expression::Compound(node) => {
                let left = node.left.as_ref().is_some_and(|e| e.is_match());
                let right = node.right.as_ref().is_some_and(|e| e.is_match());
                node.combine(left, right)
            }
        }
    }

    pub fn matching(&self) -> Option<Vec<CacheItem<E>>>
    where
        E: Eq + std::hash::Hash,
    {
        self.evaluate().matching
    }

    /// Compute match state and matching events in one pass
    pub fn evaluate(&self) -> Evaluation<E>
    where
        E: Eq + std::hash::Hash,
    {
        match self {
            Expression::Route(leaf) => leaf.evaluate(),
            Expression::Compound(node) => node.evaluate(),
        }
    }
}

impl<E> CompoundExpression<E> {
    /// Operator truth table over the children's match states
    fn combine(&self, left: bool, right: bool) -> bool {
        match self.operator {
            Operator::And => left && right,
            Operator::Or => left || right,
            // Right child is designated, falling back to the left
            Operator::Not if self.right.is_some() => !right,
            Operator::Not => !left,
            Operator::Before => left && !right,
            Operator::After => right && !left,
        }
    }
}

impl<E: Eq + std::hash::Hash> CompoundExpression<E> {
    fn evaluate(&self) -> Evaluation<E> {
        let left = self.left.as_ref().map(|e| e.evaluate());
        let right = self.right.as_ref().map(|e| e.evaluate());
        let matched = self.combine(
            left.as_ref().is_some_and(|e| e.matched),
            right.as_ref().is_some_and(|e| e.matched),
        );
        let left_items = left.and_then(|e| e.matching);
        let right_items = right.and_then(|e| e.matching);

        let matching = match self.operator {
            Operator::And => match (left_items, right_items) {
                (Some(l), Some(r)) => Some(union(l, r)),
                _ => None,
            },
            Operator::Or | Operator::Not => union_present(left_items, right_items),
            Operator::Before => right_items.is_none().then_some(left_items).flatten(),
            Operator::After => left_items.is_none().then_some(right_items).flatten(),
        };
        Evaluation { matched, matching }
    }
}

fn union_present<E>(
    left: Option<Vec<CacheItem<E>>>,
    right: Option<Vec<CacheItem<E>>>,
) -> Option<Vec<CacheItem<E>>> {
    match (left, right) {
        (Some(l), Some(r)) => Some(union(l, r)),
        (Some(items), None) | (None, Some(items)) => Some(items),
        (None, None) => None,
    }
}

/// Merge two match sets by admission time. An item read through two leaves
/// on the same route appears once.
fn union<E>(mut left: Vec<CacheItem<E>>, right: Vec<CacheItem<E>>) -> Vec<CacheItem<E>> {
    let seen: HashSet<*const E> = left.iter().map(|i| Arc::as_ptr(i.event())).collect();
    left.extend(
        right
            .into_iter()
            .filter(|i| !seen.contains(&Arc::as_ptr(i.event()))),
    );
    sort_by_timestamp(&mut left);
    left
}

impl<E> fmt::Display for Expression<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Route(leaf) => f.write_str(&leaf.routes.join(",")),
            Expression::Compound(node) => match (&node.left, &node.right) {
                (Some(l), Some(r)) => write!(f, "({} {} {})", l, node.operator, r),
                (None, Some(r)) => write!(f, "({} {})", node.operator, r),
                (Some(l), None) => write!(f, "({} {})", l, node.operator),
                (None, None) => write!(f, "({})", node.operator),
            },
        }
    }
}

impl<E> fmt::Debug for Expression<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression({})", self)
    }
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
