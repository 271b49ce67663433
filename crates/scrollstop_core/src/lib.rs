//! Scroll Stop Core
//!
//! Foundational pieces shared by the scroll edge watcher:
//!
//! - **Edges**: [`Edge`], [`EdgeSet`] and [`ScrollDirection`]
//! - **Classification**: [`ScrollMetrics`] snapshots and the [`EdgeDetector`] that
//!   decides which edges a container has reached
//! - **Resize notification**: [`ResizeDispatcher`], a namespaced, priority-stacked
//!   subscription hub for viewport resizes
//!
//! # Example
//!
//! ```rust
//! use scrollstop_core::{EdgeDetector, EdgePolicy, ScrollMetrics};
//!
//! let detector = EdgeDetector::new(1.0, 0.0, EdgePolicy::RequireOverflow);
//! let metrics = ScrollMetrics::new((0.0, 300.0), (200.0, 200.0), (200.0, 500.0));
//!
//! let edges = detector.detect(&metrics);
//! assert!(edges.at_bottom());
//! assert!(!edges.at_top());
//! ```

pub mod edge;
pub mod metrics;
pub mod resize;

pub use edge::{Edge, EdgeSet, ScrollDirection};
pub use metrics::{EdgeDetector, EdgePolicy, ScrollMetrics, DEFAULT_TOLERANCE};
pub use resize::{ResizeCallback, ResizeDispatcher, ResizeStack, ResizeSubscription};
