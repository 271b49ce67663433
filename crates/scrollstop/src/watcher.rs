//! Edge watcher
//!
//! Keeps a registry of scroll containers keyed by string id and, whenever one of
//! them scrolls (or the viewport resizes), reflects the edges it touches as class
//! markers and reports transitions through the reach/leave callbacks.
//!
//! # Architecture
//!
//! ```text
//! SimElement / host element
//!     ↓ scroll notification (namespaced per watcher and id)
//! refresh(id)
//!     ↓ ScrollMetrics → EdgeDetector → EdgeSet
//! class markers toggled on the element
//!     ↓ for each changed edge
//! on_reach / on_leave callback
//! ```
//!
//! Subscription closures hold a `Weak` to the watcher state plus the id they were
//! registered for, so dropping the watcher is enough to make them inert. Dropping
//! it also unbinds them.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use scrollstop::prelude::*;
//!
//! let watcher = EdgeWatcher::new(WatcherConfig::default());
//! watcher.on_reach(|_el, id, edge| println!("{id} did reach {edge}"));
//!
//! let list = Rc::new(SimElement::new((200.0, 200.0), (200.0, 500.0)));
//! watcher.watch(&list, "list");
//! assert!(list.has_class("scroll-top"));
//!
//! list.scroll_to(0.0, 300.0);
//! assert!(list.has_class("scroll-bottom"));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use scrollstop_core::{
    Edge, EdgeDetector, EdgeSet, ResizeDispatcher, ResizeStack, ResizeSubscription,
    ScrollDirection,
};

use crate::config::WatcherConfig;
use crate::element::ScrollElement;

/// Edge transition callback: `(element, id, edge)`. Uses Rc since UI is single-threaded.
pub type EdgeCallback = Rc<dyn Fn(&Rc<dyn ScrollElement>, &str, Edge)>;

struct Watched {
    element: Weak<dyn ScrollElement>,
    /// Scroll namespace this entry bound on the element
    namespace: String,
}

struct ResizeBinding {
    dispatcher: Weak<ResizeDispatcher>,
    subscription: ResizeSubscription,
}

struct WatcherState {
    config: Rc<WatcherConfig>,
    detector: EdgeDetector,
    items: IndexMap<String, Watched>,
    on_reach: EdgeCallback,
    on_leave: EdgeCallback,
    resize: Option<ResizeBinding>,
}

/// Watches scroll containers and toggles edge markers on them
pub struct EdgeWatcher {
    state: Rc<RefCell<WatcherState>>,
    config: Rc<WatcherConfig>,
    /// Address of the shared state, unique while this watcher is alive
    instance: usize,
}

impl fmt::Debug for EdgeWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EdgeWatcher")
            .field("instance", &self.instance)
            .field("ids", &state.items.keys().collect::<Vec<_>>())
            .field("resize_bound", &state.resize.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for EdgeWatcher {
    fn default() -> Self {
        Self::new(WatcherConfig::default())
    }
}

impl EdgeWatcher {
    /// Create a watcher with its own, empty registry
    pub fn new(config: WatcherConfig) -> Self {
        let config = Rc::new(config);
        let state = WatcherState {
            detector: config.detector(),
            items: IndexMap::new(),
            on_reach: default_callback(config.debug, "reach"),
            on_leave: default_callback(config.debug, "leave"),
            resize: None,
            config: Rc::clone(&config),
        };

        let state = Rc::new(RefCell::new(state));
        Self {
            instance: Rc::as_ptr(&state) as usize,
            state,
            config,
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Start watching `element` under `id`
    ///
    /// An existing registration for `id` is torn down first. An empty id is ignored.
    pub fn watch<E: ScrollElement + 'static>(&self, element: &Rc<E>, id: &str) -> &Self {
        let handle: Rc<dyn ScrollElement> = element.clone();
        self.watch_dyn(&handle, id)
    }

    /// [`watch`](Self::watch) for an already type-erased element
    pub fn watch_dyn(&self, element: &Rc<dyn ScrollElement>, id: &str) -> &Self {
        if id.is_empty() {
            tracing::warn!("ignoring watch request without an id");
            return self;
        }

        self.unwatch(id);

        let namespace = format!("{}.{:x}.{}", self.config.namespace, self.instance, id);
        let weak_state = Rc::downgrade(&self.state);
        let key = id.to_string();
        element.bind_scroll(
            &namespace,
            Rc::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    refresh_entry(&state, &key, false);
                }
            }),
        );

        self.state.borrow_mut().items.insert(
            id.to_string(),
            Watched {
                element: Rc::downgrade(element),
                namespace,
            },
        );
        tracing::debug!(id, "watching element");

        refresh_entry(&self.state, id, self.config.silent_initial_refresh);
        self
    }

    /// Stop watching `id`: clear its markers and cancel its scroll subscription
    pub fn unwatch(&self, id: &str) -> &Self {
        let removed = self.state.borrow_mut().items.shift_remove(id);
        if let Some(watched) = removed {
            detach(&self.config, &watched);
            tracing::debug!(id, "unwatched element");
        }
        self
    }

    /// Stop watching every registered element
    pub fn unwatch_all(&self) -> &Self {
        for id in self.ids() {
            self.unwatch(&id);
        }
        self
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Re-evaluate one element, firing callbacks for changed edges
    ///
    /// Edges are processed one at a time in top, bottom, left, right order. Each
    /// marker is toggled immediately before its own callback, so a callback for
    /// `top` still sees the old `left` marker.
    pub fn refresh(&self, id: &str) -> &Self {
        refresh_entry(&self.state, id, false);
        self
    }

    /// Re-evaluate one element, updating markers without firing callbacks
    pub fn refresh_silent(&self, id: &str) -> &Self {
        refresh_entry(&self.state, id, true);
        self
    }

    /// Re-evaluate every registered element in registration order
    pub fn refresh_all(&self) -> &Self {
        refresh_all(&self.state);
        self
    }

    /// Which axes of `element` overflow, whether or not it is watched
    pub fn scroll_direction(element: &dyn ScrollElement) -> ScrollDirection {
        element.metrics().direction()
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Replace the callback fired when an element reaches an edge
    pub fn on_reach<F>(&self, callback: F) -> &Self
    where
        F: Fn(&Rc<dyn ScrollElement>, &str, Edge) + 'static,
    {
        self.state.borrow_mut().on_reach = Rc::new(callback);
        self
    }

    /// Replace the callback fired when an element leaves an edge
    pub fn on_leave<F>(&self, callback: F) -> &Self
    where
        F: Fn(&Rc<dyn ScrollElement>, &str, Edge) + 'static,
    {
        self.state.borrow_mut().on_leave = Rc::new(callback);
        self
    }

    // =========================================================================
    // Resize binding
    // =========================================================================

    /// Refresh every element whenever `dispatcher` reports a resize
    ///
    /// Binds once at [`ResizeStack::Core`]; binding again replaces the previous binding.
    pub fn bind_resize(&self, dispatcher: &Rc<ResizeDispatcher>) -> &Self {
        self.unbind_resize();

        let weak_state = Rc::downgrade(&self.state);
        let subscription = dispatcher.bind(&self.config.namespace, ResizeStack::Core, move || {
            if let Some(state) = weak_state.upgrade() {
                refresh_all(&state);
            }
        });

        self.state.borrow_mut().resize = Some(ResizeBinding {
            dispatcher: Rc::downgrade(dispatcher),
            subscription,
        });
        self
    }

    /// Cancel the resize subscription, if any
    pub fn unbind_resize(&self) -> &Self {
        let binding = self.state.borrow_mut().resize.take();
        if let Some(binding) = binding {
            if let Some(dispatcher) = binding.dispatcher.upgrade() {
                dispatcher.unbind_subscription(&binding.subscription);
            }
        }
        self
    }

    pub fn is_resize_bound(&self) -> bool {
        self.state.borrow().resize.is_some()
    }

    /// Release every subscription and clear every marker
    pub fn teardown(&self) {
        self.unbind_resize();
        self.unwatch_all();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_watched(&self, id: &str) -> bool {
        self.state.borrow().items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.state.borrow().items.keys().cloned().collect()
    }

    /// Edges currently marked on the element watched under `id`
    pub fn edges(&self, id: &str) -> Option<EdgeSet> {
        let element = self.state.borrow().items.get(id)?.element.upgrade()?;
        Some(
            Edge::ALL
                .into_iter()
                .filter(|edge| element.has_class(self.config.classes.name(*edge)))
                .collect(),
        )
    }
}

impl Drop for EdgeWatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn default_callback(debug: bool, verb: &'static str) -> EdgeCallback {
    Rc::new(move |_element, id, edge| {
        if debug {
            tracing::debug!("{id} did {verb} {edge}");
        }
    })
}

/// Remove markers and the scroll subscription of a registry entry
fn detach(config: &WatcherConfig, watched: &Watched) {
    let Some(element) = watched.element.upgrade() else {
        return;
    };
    for edge in Edge::ALL {
        element.remove_class(config.classes.name(edge));
    }
    element.unbind_scroll(&watched.namespace);
}

fn refresh_all(state: &Rc<RefCell<WatcherState>>) {
    let ids: Vec<String> = state.borrow().items.keys().cloned().collect();
    for id in ids {
        refresh_entry(state, &id, false);
    }
}

/// Evaluate one registry entry
///
/// Changed edges are handled in [`Edge::ALL`] order: each marker is toggled right
/// before its callback runs, so a callback sees the markers of the edges after it
/// still in their previous state. The state is never borrowed while the element or a callback runs, so both may
/// call back into the watcher.
fn refresh_entry(state: &Rc<RefCell<WatcherState>>, id: &str, silent: bool) {
    let lookup = {
        let st = state.borrow();
        st.items.get(id).map(|w| {
            (
                w.element.upgrade(),
                Rc::clone(&st.config),
                st.detector,
                Rc::clone(&st.on_reach),
                Rc::clone(&st.on_leave),
            )
        })
    };
    let Some((element, config, detector, on_reach, on_leave)) = lookup else {
        return;
    };
    let Some(element) = element else {
        tracing::warn!(id, "watched element was dropped, removing it");
        state.borrow_mut().items.shift_remove(id);
        return;
    };

    let metrics = element.metrics();
    let edges = detector.detect(&metrics);
    tracing::trace!(id, ?metrics, %edges, "refresh");

    let marked: EdgeSet = Edge::ALL
        .into_iter()
        .filter(|edge| element.has_class(config.classes.name(*edge)))
        .collect();

    for edge in marked.changed(edges).iter() {
        // A previous callback may have unwatched or replaced this id.
        if !is_current(state, id, &element) {
            break;
        }
        let reached = edges.contains(edge);
        element.toggle_class(config.classes.name(edge), reached);
        if silent {
            continue;
        }
        if reached {
            on_reach(&element, id, edge);
        } else {
            on_leave(&element, id, edge);
        }
    }
}

fn is_current(
    state: &Rc<RefCell<WatcherState>>,
    id: &str,
    element: &Rc<dyn ScrollElement>,
) -> bool {
    state
        .borrow()
        .items
        .get(id)
        .and_then(|w| w.element.upgrade())
        .is_some_and(|current| Rc::ptr_eq(&current, element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SimElement;
    use scrollstop_core::EdgePolicy;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording(watcher: &EdgeWatcher) -> Log {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let reach = log.clone();
        let leave = log.clone();
        watcher
            .on_reach(move |_, id, edge| reach.borrow_mut().push(format!("{id} did reach {edge}")))
            .on_leave(move |_, id, edge| leave.borrow_mut().push(format!("{id} did leave {edge}")));
        log
    }

    fn tall() -> Rc<SimElement> {
        Rc::new(SimElement::new((200.0, 200.0), (200.0, 500.0)))
    }

    #[test]
    fn test_scroll_scenario() {
        let watcher = EdgeWatcher::new(WatcherConfig::default().with_silent_initial_refresh(false));
        let log = recording(&watcher);
        let el = tall();

        watcher.watch(&el, "list");
        assert_eq!(*log.borrow(), vec!["list did reach top"]);
        assert_eq!(el.classes(), vec!["scroll-top"]);

        el.scroll_to(0.0, 300.0);
        assert_eq!(
            *log.borrow(),
            vec!["list did reach top", "list did leave top", "list did reach bottom"]
        );
        assert_eq!(el.classes(), vec!["scroll-bottom"]);
        assert_eq!(watcher.edges("list"), Some(EdgeSet::new().with(Edge::Bottom, true)));
    }

    #[test]
    fn test_silent_initial_refresh() {
        let watcher = EdgeWatcher::default();
        let log = recording(&watcher);
        let el = tall();

        watcher.watch(&el, "list");
        assert!(log.borrow().is_empty());
        assert!(el.has_class("scroll-top"));

        el.scroll_to(0.0, 100.0);
        assert_eq!(*log.borrow(), vec!["list did leave top"]);
    }

    #[test]
    fn test_no_overflow_never_marks() {
        let watcher = EdgeWatcher::default();
        let el = Rc::new(SimElement::new((300.0, 300.0), (300.0, 300.0)));
        watcher.watch(&el, "static");
        el.scroll_to(50.0, 50.0);
        watcher.refresh("static");
        assert!(el.classes().is_empty());
        assert_eq!(watcher.edges("static"), Some(EdgeSet::EMPTY));
    }

    #[test]
    fn test_flush_policy_marks_static_axes() {
        let watcher = EdgeWatcher::new(
            WatcherConfig::default().with_policy(EdgePolicy::FlushWhenStatic),
        );
        let el = Rc::new(SimElement::new((300.0, 300.0), (300.0, 300.0)));
        watcher.watch(&el, "static");
        assert_eq!(watcher.edges("static"), Some(EdgeSet::ALL));
    }

    #[test]
    fn test_tolerance_boundary() {
        let watcher = EdgeWatcher::default();
        let el = tall();
        watcher.watch(&el, "list");

        el.scroll_to(0.0, 298.0);
        assert!(!el.has_class("scroll-bottom"));

        el.scroll_to(0.0, 299.0);
        assert!(el.has_class("scroll-bottom"));
    }

    #[test]
    fn test_watch_then_unwatch_restores_element() {
        let watcher = EdgeWatcher::default();
        let el = tall();
        el.add_class("user-class");

        watcher.watch(&el, "list");
        assert_eq!(el.scroll_listener_count(), 1);

        watcher.unwatch("list");
        assert_eq!(el.classes(), vec!["user-class"]);
        assert_eq!(el.scroll_listener_count(), 0);
        assert!(!watcher.is_watched("list"));
    }

    #[test]
    fn test_rewatch_detaches_previous_element() {
        let watcher = EdgeWatcher::default();
        let first = tall();
        let second = tall();

        watcher.watch(&first, "list");
        watcher.watch(&second, "list");

        assert!(first.classes().is_empty());
        assert_eq!(first.scroll_listener_count(), 0);
        assert_eq!(second.classes(), vec!["scroll-top"]);
        assert_eq!(second.scroll_listener_count(), 1);
        assert_eq!(watcher.len(), 1);

        // Scrolling the detached element is not observed any more
        first.scroll_to(0.0, 300.0);
        assert!(first.classes().is_empty());
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let watcher = EdgeWatcher::default();
        let el = tall();
        watcher.watch(&el, "");
        assert!(watcher.is_empty());
        assert_eq!(el.scroll_listener_count(), 0);
        assert!(el.classes().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let watcher = EdgeWatcher::default();
        watcher.refresh("missing").refresh_silent("missing").unwatch("missing");
        assert!(watcher.edges("missing").is_none());
    }

    #[test]
    fn test_refresh_all_is_independent_per_element() {
        let watcher = EdgeWatcher::default();
        let log = recording(&watcher);
        let a = tall();
        let b = Rc::new(SimElement::new((200.0, 100.0), (600.0, 100.0)));

        watcher.watch(&a, "a").watch(&b, "b");
        assert_eq!(b.classes(), vec!["scroll-left"]);

        // Move both without notifying, then refresh globally
        a.set_content_size(200.0, 200.0);
        b.set_visible_size(600.0, 100.0);
        watcher.refresh_all();

        assert!(a.classes().is_empty());
        assert!(b.classes().is_empty());
        assert_eq!(*log.borrow(), vec!["a did leave top", "b did leave left"]);
    }

    #[test]
    fn test_scrollbar_compensation() {
        let watcher = EdgeWatcher::new(
            WatcherConfig::default()
                .with_scrollbar_width(15.0)
                .with_tolerance(0.0),
        );
        let el = Rc::new(SimElement::new((200.0, 200.0), (400.0, 500.0)).with_scrollbar_width(15.0));
        watcher.watch(&el, "grid");

        el.scroll_to(0.0, 300.0);
        assert!(!el.has_class("scroll-bottom"));

        el.scroll_to(215.0, 315.0);
        assert_eq!(el.classes(), vec!["scroll-bottom", "scroll-right"]);
    }

    #[test]
    fn test_resize_refreshes_everything() {
        let dispatcher = Rc::new(ResizeDispatcher::new());
        let watcher = EdgeWatcher::default();
        watcher.bind_resize(&dispatcher);
        let log = recording(&watcher);

        let el = tall();
        watcher.watch(&el, "list");

        el.set_visible_size(200.0, 500.0);
        dispatcher.dispatch();
        assert_eq!(*log.borrow(), vec!["list did leave top"]);
        assert!(dispatcher.is_bound("scroll-stop", ResizeStack::Core));
    }

    #[test]
    fn test_drop_releases_subscriptions() {
        let dispatcher = Rc::new(ResizeDispatcher::new());
        let el = tall();

        {
            let watcher = EdgeWatcher::default();
            watcher.bind_resize(&dispatcher).watch(&el, "list");
            assert_eq!(dispatcher.len(), 1);
            assert_eq!(el.scroll_listener_count(), 1);
        }

        assert!(dispatcher.is_empty());
        assert_eq!(el.scroll_listener_count(), 0);
        assert!(el.classes().is_empty());
    }

    #[test]
    fn test_rebinding_resize_replaces_subscription() {
        let dispatcher = Rc::new(ResizeDispatcher::new());
        let watcher = EdgeWatcher::default();
        watcher.bind_resize(&dispatcher).bind_resize(&dispatcher);
        assert_eq!(dispatcher.len(), 1);

        watcher.unbind_resize();
        assert!(dispatcher.is_empty());
        assert!(!watcher.is_resize_bound());
    }

    #[test]
    fn test_instances_do_not_interfere() {
        let dispatcher = Rc::new(ResizeDispatcher::new());
        let first = EdgeWatcher::default();
        let second = EdgeWatcher::new(WatcherConfig::default().with_classes(
            crate::config::EdgeClasses::prefixed("alt-"),
        ));
        first.bind_resize(&dispatcher);
        second.bind_resize(&dispatcher);

        let el = tall();
        first.watch(&el, "list");
        second.watch(&el, "list");
        assert_eq!(el.scroll_listener_count(), 2);

        first.unwatch("list");
        assert_eq!(el.classes(), vec!["alt-scroll-top"]);
        assert_eq!(el.scroll_listener_count(), 1);

        drop(first);
        assert_eq!(dispatcher.len(), 1);
        assert!(second.is_watched("list"));
    }

    #[test]
    fn test_callback_may_unwatch() {
        let watcher = Rc::new(EdgeWatcher::new(
            WatcherConfig::default().with_silent_initial_refresh(false),
        ));
        let reached = Rc::new(RefCell::new(Vec::new()));

        {
            let weak = Rc::downgrade(&watcher);
            let reached = reached.clone();
            watcher.on_reach(move |_, id, edge| {
                reached.borrow_mut().push(edge);
                if let Some(w) = weak.upgrade() {
                    w.unwatch(id);
                }
            });
        }

        // Both vertical and horizontal overflow: top and left reached together
        let el = Rc::new(SimElement::new((200.0, 200.0), (400.0, 500.0)));
        watcher.watch(&el, "grid");

        assert_eq!(*reached.borrow(), vec![Edge::Top]);
        assert!(!watcher.is_watched("grid"));
        assert!(el.classes().is_empty());
        assert_eq!(el.scroll_listener_count(), 0);
    }

    #[test]
    fn test_markers_toggle_before_each_callback() {
        let watcher = EdgeWatcher::new(WatcherConfig::default().with_silent_initial_refresh(false));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            watcher.on_reach(move |el, _, edge| {
                seen.borrow_mut().push((
                    edge,
                    el.has_class("scroll-top"),
                    el.has_class("scroll-left"),
                ));
            });
        }

        let el = Rc::new(SimElement::new((200.0, 200.0), (400.0, 500.0)));
        watcher.watch(&el, "grid");

        // Top's marker is set when its callback runs, left's is not yet
        assert_eq!(
            *seen.borrow(),
            vec![(Edge::Top, true, false), (Edge::Left, true, true)]
        );
    }

    #[test]
    fn test_dropped_element_is_pruned() {
        let watcher = EdgeWatcher::default();
        let el = tall();
        watcher.watch(&el, "list");
        drop(el);

        watcher.refresh_all();
        assert!(watcher.is_empty());
    }

    #[test]
    fn test_scroll_direction() {
        let el = SimElement::new((200.0, 200.0), (400.0, 500.0));
        assert_eq!(EdgeWatcher::scroll_direction(&el), ScrollDirection::Both);

        let el = SimElement::new((200.0, 200.0), (200.0, 200.0));
        assert_eq!(EdgeWatcher::scroll_direction(&el), ScrollDirection::None);
    }

    #[test]
    fn test_ids_keep_registration_order() {
        let watcher = EdgeWatcher::default();
        let els: Vec<_> = (0..3).map(|_| tall()).collect();
        for (i, el) in els.iter().enumerate().rev() {
            watcher.watch(el, &format!("scroller-{}", i + 1));
        }
        assert_eq!(watcher.ids(), vec!["scroller-3", "scroller-2", "scroller-1"]);

        watcher.unwatch_all();
        assert!(watcher.is_empty());
        assert!(els.iter().all(|el| el.scroll_listener_count() == 0));
    }
}
