//! Scroll Stop
//!
//! Watches scroll containers and reflects which of their edges are reached as
//! class markers (`scroll-top`, `scroll-bottom`, `scroll-left`, `scroll-right`),
//! so styling can react to them (fade-out shadows, "load more" affordances, ...).
//!
//! - [`EdgeWatcher`] - registry of watched elements, refresh logic and callbacks
//! - [`ScrollElement`] - what a host element has to provide
//! - [`SimElement`] - in-memory element for tests and scripted scenarios
//! - [`WatcherConfig`] - tolerance, marker names, overflow policy
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use scrollstop::prelude::*;
//!
//! let dispatcher = Rc::new(ResizeDispatcher::new());
//! let watcher = EdgeWatcher::new(WatcherConfig::default());
//! watcher
//!     .bind_resize(&dispatcher)
//!     .on_reach(|_el, id, edge| println!("{id} did reach {edge}"))
//!     .on_leave(|_el, id, edge| println!("{id} did leave {edge}"));
//!
//! let panel = Rc::new(SimElement::new((300.0, 200.0), (300.0, 800.0)));
//! watcher.watch(&panel, "panel");
//! assert_eq!(watcher.edges("panel"), Some(EdgeSet::new().with(Edge::Top, true)));
//!
//! // Growing the viewport removes the overflow; the resize refresh clears the marker
//! panel.set_visible_size(300.0, 800.0);
//! dispatcher.dispatch();
//! assert!(!panel.has_class("scroll-top"));
//! ```

pub mod config;
pub mod element;
mod error;
pub mod watcher;

pub use config::{EdgeClasses, WatcherConfig};
pub use element::{ScrollCallback, ScrollElement, SimElement};
pub use error::{Result, ScrollStopError};
pub use watcher::{EdgeCallback, EdgeWatcher};

pub use scrollstop_core::{
    Edge, EdgeDetector, EdgePolicy, EdgeSet, ResizeDispatcher, ResizeStack, ScrollDirection,
    ScrollMetrics,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EdgeClasses, WatcherConfig};
    pub use crate::element::{ScrollElement, SimElement};
    pub use crate::error::{Result, ScrollStopError};
    pub use crate::watcher::EdgeWatcher;
    pub use scrollstop_core::{
        Edge, EdgePolicy, EdgeSet, ResizeDispatcher, ResizeStack, ScrollDirection,
    };
}
