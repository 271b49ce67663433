//! Watcher configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! tolerance = 1.0
//! scrollbar_width = 0.0
//! policy = "require_overflow"      # or "flush_when_static"
//! silent_initial_refresh = true
//! namespace = "scroll-stop"
//! debug = false
//!
//! [classes]
//! top = "scroll-top"
//! bottom = "scroll-bottom"
//! left = "scroll-left"
//! right = "scroll-right"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use scrollstop_core::{Edge, EdgeDetector, EdgePolicy, DEFAULT_TOLERANCE};

use crate::error::{Result, ScrollStopError};

/// Marker (class) names applied to a watched element, one per edge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeClasses {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl Default for EdgeClasses {
    fn default() -> Self {
        Self {
            top: "scroll-top".to_string(),
            bottom: "scroll-bottom".to_string(),
            left: "scroll-left".to_string(),
            right: "scroll-right".to_string(),
        }
    }
}

impl EdgeClasses {
    /// Default names with a prefix, e.g. `prefixed("djs-")` gives `djs-scroll-top`
    pub fn prefixed(prefix: &str) -> Self {
        let defaults = Self::default();
        Self {
            top: format!("{prefix}{}", defaults.top),
            bottom: format!("{prefix}{}", defaults.bottom),
            left: format!("{prefix}{}", defaults.left),
            right: format!("{prefix}{}", defaults.right),
        }
    }

    /// Marker name for an edge
    pub fn name(&self, edge: Edge) -> &str {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }
}

/// Configuration for an [`EdgeWatcher`](crate::EdgeWatcher)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Pixel slack when testing for the bottom and right edges (default: 1.0)
    pub tolerance: f32,
    /// Scrollbar thickness subtracted from the perpendicular axis (default: 0.0)
    pub scrollbar_width: f32,
    /// Treatment of axes without overflow
    pub policy: EdgePolicy,
    /// Suppress callbacks on the refresh performed by `watch` (default: true)
    pub silent_initial_refresh: bool,
    /// Namespace for scroll and resize subscriptions
    pub namespace: String,
    /// Marker names
    pub classes: EdgeClasses,
    /// Log every transition from the default callbacks
    pub debug: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            scrollbar_width: 0.0,
            policy: EdgePolicy::default(),
            silent_initial_refresh: true,
            namespace: "scroll-stop".to_string(),
            classes: EdgeClasses::default(),
            debug: false,
        }
    }
}

impl WatcherConfig {
    /// Parse and validate a config from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WatcherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ScrollStopError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.scrollbar_width.is_finite() || self.scrollbar_width < 0.0 {
            return Err(ScrollStopError::InvalidConfig(format!(
                "scrollbar_width must be a non-negative number, got {}",
                self.scrollbar_width
            )));
        }
        if self.namespace.is_empty() {
            return Err(ScrollStopError::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        for edge in Edge::ALL {
            if self.classes.name(edge).trim().is_empty() {
                return Err(ScrollStopError::InvalidConfig(format!(
                    "class name for the {edge} edge must not be empty"
                )));
            }
        }
        for (i, a) in Edge::ALL.iter().enumerate() {
            for b in &Edge::ALL[i + 1..] {
                if self.classes.name(*a) == self.classes.name(*b) {
                    return Err(ScrollStopError::InvalidConfig(format!(
                        "the {a} and {b} edges share the class name '{}'",
                        self.classes.name(*a)
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_scrollbar_width(mut self, width: f32) -> Self {
        self.scrollbar_width = width;
        self
    }

    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_silent_initial_refresh(mut self, silent: bool) -> Self {
        self.silent_initial_refresh = silent;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_classes(mut self, classes: EdgeClasses) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Edge detector configured from these settings
    pub fn detector(&self) -> EdgeDetector {
        EdgeDetector::new(self.tolerance, self.scrollbar_width, self.policy)
    }
}
