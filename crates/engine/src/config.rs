// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! ```toml
//! cache_manager = "local"
//!
//! [[routes]]
//! id = "orders"
//! window = "100,5m"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vigil_cache::LOCAL_CACHE_MANAGER;
use vigil_core::Window;

/// Errors that can occur loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("route id must not be empty")]
    EmptyRouteId,
    #[error("route declared more than once: {0}")]
    DuplicateRoute(String),
}

/// A route and the window its cache is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub id: String,
    #[serde(default)]
    pub window: Window,
}

impl RouteConfig {
    pub fn new(id: impl Into<String>, window: Window) -> Self {
        Self {
            id: id.into(),
            window,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Registry key of the cache manager implementation
    #[serde(default = "default_cache_manager")]
    pub cache_manager: String,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_cache_manager() -> String {
    LOCAL_CACHE_MANAGER.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_manager: default_cache_manager(),
            routes: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            let id = route.id.trim();
            if id.is_empty() {
                return Err(ConfigError::EmptyRouteId);
            }
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateRoute(id.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
