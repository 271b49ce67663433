//! Scenario files
//!
//! A scenario declares a set of scroll containers and a list of steps to play
//! against them:
//!
//! ```toml
//! [watcher]
//! silent_initial_refresh = false
//!
//! [[element]]
//! id = "scroller-1"
//! visible = [200.0, 200.0]
//! content = [200.0, 500.0]
//!
//! [[step]]
//! action = "watch"
//! id = "scroller-1"
//!
//! [[step]]
//! action = "scroll"
//! id = "scroller-1"
//! y = 300.0
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scrollstop::WatcherConfig;
use serde::Deserialize;

/// A scripted run
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Watcher settings, defaults when omitted
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A simulated scroll container
#[derive(Debug, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    /// Visible box `[width, height]`
    pub visible: [f32; 2],
    /// Content size `[width, height]`
    pub content: [f32; 2],
    /// Initial scroll offset `[x, y]`
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default)]
    pub scrollbar_width: f32,
}

/// One action of a scenario
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Start watching an element, keyed by its id
    Watch { id: String },
    /// Stop watching one element, or all of them when `id` is omitted
    Unwatch { id: Option<String> },
    /// Scroll to an absolute offset; a missing axis keeps its current offset
    Scroll {
        id: String,
        x: Option<f32>,
        y: Option<f32>,
    },
    /// Scroll by a relative amount
    ScrollBy {
        id: String,
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    /// Change an element's visible size and report a viewport resize
    Resize { id: String, width: f32, height: f32 },
    /// Change an element's content size without notifying anyone
    Content { id: String, width: f32, height: f32 },
    /// Refresh one element, or all of them when `id` is omitted
    ///
    /// Only a single-element refresh can be silent.
    Refresh {
        id: Option<String>,
        #[serde(default)]
        silent: bool,
    },
}

impl Step {
    /// Element id this step targets, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Step::Watch { id }
            | Step::Scroll { id, .. }
            | Step::ScrollBy { id, .. }
            | Step::Resize { id, .. }
            | Step::Content { id, .. } => Some(id.as_str()),
            Step::Unwatch { id } | Step::Refresh { id, .. } => id.as_deref(),
        }
    }
}

impl Scenario {
    /// Parse and validate a scenario
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Check ids and the watcher config
    pub fn validate(&self) -> Result<()> {
        self.watcher.validate()?;

        let mut ids = HashSet::new();
        for element in &self.elements {
            if element.id.is_empty() {
                anyhow::bail!("Element ids must not be empty");
            }
            if !ids.insert(element.id.as_str()) {
                anyhow::bail!("Duplicate element id '{}'", element.id);
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(id) = step.target() {
                if !ids.contains(id) {
                    anyhow::bail!("Step {} refers to unknown element '{}'", index + 1, id);
                }
            }
            if let Step::Refresh { id: None, silent: true } = step {
                anyhow::bail!("Step {}: a refresh of every element cannot be silent", index + 1);
            }
        }

        Ok(())
    }
}
