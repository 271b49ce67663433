//! Scroll geometry snapshot and edge classification
//!
//! A [`ScrollMetrics`] is a point-in-time reading of a container: its scroll offset,
//! the size of its visible box and the full size of its content. [`EdgeDetector`]
//! turns one of those readings into an [`EdgeSet`].
//!
//! # Example
//!
//! ```rust
//! use scrollstop_core::{EdgeDetector, ScrollMetrics};
//!
//! let detector = EdgeDetector::default();
//!
//! // 200px viewport over 500px of content, scrolled to the top
//! let metrics = ScrollMetrics::new((0.0, 0.0), (200.0, 200.0), (200.0, 500.0));
//! let edges = detector.detect(&metrics);
//! assert!(edges.at_top());
//! assert!(!edges.at_bottom());
//! ```

use serde::{Deserialize, Serialize};

use crate::edge::{Edge, EdgeSet, ScrollDirection};

/// Default pixel slack when comparing an offset against its maximum
pub const DEFAULT_TOLERANCE: f32 = 1.0;

/// How a non-scrollable axis affects its two edges
///
/// The two policies only disagree when an axis has no overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// An edge is only reached if its axis overflows (`scrollable && at_edge`)
    #[default]
    RequireOverflow,
    /// A non-scrollable axis sits at both of its ends (`at_edge || !scrollable`)
    FlushWhenStatic,
}

/// Point-in-time scroll geometry of a container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Horizontal scroll offset (scrollLeft)
    pub scroll_x: f32,
    /// Vertical scroll offset (scrollTop)
    pub scroll_y: f32,
    /// Outer width of the visible box, scrollbar included
    pub visible_width: f32,
    /// Outer height of the visible box, scrollbar included
    pub visible_height: f32,
    /// Full scrollable content width
    pub content_width: f32,
    /// Full scrollable content height
    pub content_height: f32,
}

impl ScrollMetrics {
    /// Create metrics from `(x, y)` offset, `(w, h)` visible size and `(w, h)` content size
    pub fn new(offset: (f32, f32), visible: (f32, f32), content: (f32, f32)) -> Self {
        Self {
            scroll_x: offset.0,
            scroll_y: offset.1,
            visible_width: visible.0,
            visible_height: visible.1,
            content_width: content.0,
            content_height: content.1,
        }
    }

    pub fn scrollable_horizontally(&self) -> bool {
        self.content_width > self.visible_width
    }

    pub fn scrollable_vertically(&self) -> bool {
        self.content_height > self.visible_height
    }

    /// Which axes overflow
    pub fn direction(&self) -> ScrollDirection {
        ScrollDirection::from_axes(self.scrollable_horizontally(), self.scrollable_vertically())
    }

    /// Largest reachable offset on each axis, `(x, y)`
    pub fn max_offset(&self) -> (f32, f32) {
        (
            (self.content_width - self.visible_width).max(0.0),
            (self.content_height - self.visible_height).max(0.0),
        )
    }
}

/// Classifies scroll metrics into reached edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    /// Pixel slack for the bottom/right comparisons
    pub tolerance: f32,
    /// Thickness of a scrollbar, subtracted from the perpendicular axis
    pub scrollbar_width: f32,
    pub policy: EdgePolicy,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            scrollbar_width: 0.0,
            policy: EdgePolicy::default(),
        }
    }
}

impl EdgeDetector {
    pub fn new(tolerance: f32, scrollbar_width: f32, policy: EdgePolicy) -> Self {
        Self {
            tolerance,
            scrollbar_width,
            policy,
        }
    }

    /// Compute the reached edges for a metrics snapshot
    pub fn detect(&self, m: &ScrollMetrics) -> EdgeSet {
        let vertical = m.scrollable_vertically();
        let horizontal = m.scrollable_horizontally();

        // A horizontal scrollbar eats visible height and a vertical one eats width.
        // Scrollability is decided on the outer box, before this correction.
        let mut visible_width = m.visible_width;
        let mut visible_height = m.visible_height;
        if horizontal {
            visible_height -= self.scrollbar_width;
        }
        if vertical {
            visible_width -= self.scrollbar_width;
        }

        let top = m.scroll_y <= 0.0;
        let bottom = m.scroll_y >= m.content_height - visible_height - self.tolerance;
        let left = m.scroll_x <= 0.0;
        let right = m.scroll_x >= m.content_width - visible_width - self.tolerance;

        let (top, bottom, left, right) = match self.policy {
            EdgePolicy::RequireOverflow => (
                vertical && top,
                vertical && bottom,
                horizontal && left,
                horizontal && right,
            ),
            EdgePolicy::FlushWhenStatic => (
                top || !vertical,
                bottom || !vertical,
                left || !horizontal,
                right || !horizontal,
            ),
        };

        EdgeSet::new()
            .with(Edge::Top, top)
            .with(Edge::Bottom, bottom)
            .with(Edge::Left, left)
            .with(Edge::Right, right)
    }
}
