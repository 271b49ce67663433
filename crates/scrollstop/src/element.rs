//! Scrollable element contract
//!
//! [`ScrollElement`] is what the watcher needs from a host element: scroll geometry,
//! a set of toggleable class markers, and a namespaced scroll notification.
//! Implementations are shared handles (the way DOM nodes are), so every method
//! takes `&self` and mutation goes through interior mutability.
//!
//! [`SimElement`] is an in-memory implementation used by the scenario runner and tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use scrollstop_core::ScrollMetrics;

/// Scroll notification callback. Uses Rc since UI is single-threaded.
pub type ScrollCallback = Rc<dyn Fn()>;

/// A scroll container the watcher can observe
pub trait ScrollElement {
    /// Current scroll offset `(x, y)`
    fn scroll_offset(&self) -> (f32, f32);

    /// Outer size of the visible box `(width, height)`, scrollbars included
    fn visible_size(&self) -> (f32, f32);

    /// Full content size `(width, height)`
    fn content_size(&self) -> (f32, f32);

    fn has_class(&self, name: &str) -> bool;

    fn add_class(&self, name: &str);

    fn remove_class(&self, name: &str);

    /// Add or remove a class depending on `on`
    fn toggle_class(&self, name: &str, on: bool) {
        if on {
            self.add_class(name);
        } else {
            self.remove_class(name);
        }
    }

    /// Call `callback` whenever the element scrolls
    fn bind_scroll(&self, namespace: &str, callback: ScrollCallback);

    /// Drop every scroll callback bound under `namespace`
    fn unbind_scroll(&self, namespace: &str);

    /// Snapshot of the current geometry
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.scroll_offset(), self.visible_size(), self.content_size())
    }
}

#[derive(Debug, Default)]
struct SimState {
    offset: (f32, f32),
    visible: (f32, f32),
    content: (f32, f32),
    scrollbar_width: f32,
    classes: FxHashSet<String>,
}

impl SimState {
    /// Largest offsets the element accepts, accounting for scrollbars eating
    /// into the perpendicular axis
    fn max_offset(&self) -> (f32, f32) {
        let direction = ScrollMetrics::new(self.offset, self.visible, self.content).direction();
        let mut visible = self.visible;
        if direction.is_horizontal() {
            visible.1 -= self.scrollbar_width;
        }
        if direction.is_vertical() {
            visible.0 -= self.scrollbar_width;
        }
        ScrollMetrics::new(self.offset, visible, self.content).max_offset()
    }

    fn clamp_offset(&mut self) {
        let (max_x, max_y) = self.max_offset();
        self.offset = (self.offset.0.clamp(0.0, max_x), self.offset.1.clamp(0.0, max_y));
    }
}

/// In-memory scroll container
///
/// # Example
///
/// ```rust
/// use scrollstop::element::{ScrollElement, SimElement};
///
/// let el = SimElement::new((200.0, 200.0), (200.0, 500.0));
/// el.scroll_to(0.0, 1000.0);
/// assert_eq!(el.scroll_offset(), (0.0, 300.0));
/// ```
pub struct SimElement {
    state: RefCell<SimState>,
    listeners: RefCell<Vec<(String, ScrollCallback)>>,
}

impl fmt::Debug for SimElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimElement")
            .field("state", &self.state.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl SimElement {
    /// Create an element with a visible size and a content size, scrolled to the origin
    pub fn new(visible: (f32, f32), content: (f32, f32)) -> Self {
        Self {
            state: RefCell::new(SimState {
                visible,
                content,
                ..Default::default()
            }),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Set the scrollbar thickness used when clamping offsets
    pub fn with_scrollbar_width(self, width: f32) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.scrollbar_width = width;
            state.clamp_offset();
        }
        self
    }

    /// Set the initial offset without notifying listeners
    pub fn with_offset(self, x: f32, y: f32) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.offset = (x, y);
            state.clamp_offset();
        }
        self
    }

    /// Scroll to an absolute offset, clamped to the scrollable range
    ///
    /// Listeners are notified only if the offset actually changed.
    pub fn scroll_to(&self, x: f32, y: f32) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.offset;
            state.offset = (x, y);
            state.clamp_offset();
            state.offset != before
        };
        if changed {
            self.fire_scroll();
        }
    }

    /// Scroll by a relative amount
    pub fn scroll_by(&self, dx: f32, dy: f32) {
        let (x, y) = self.scroll_offset();
        self.scroll_to(x + dx, y + dy);
    }

    /// Change the visible box size; the offset is clamped silently
    pub fn set_visible_size(&self, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        state.visible = (width, height);
        state.clamp_offset();
    }

    /// Change the content size; the offset is clamped silently
    pub fn set_content_size(&self, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        state.content = (width, height);
        state.clamp_offset();
    }

    /// Current classes, sorted
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.state.borrow().classes.iter().cloned().collect();
        classes.sort();
        classes
    }

    /// Number of bound scroll callbacks
    pub fn scroll_listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Notify scroll listeners as if the user scrolled
    pub fn fire_scroll(&self) {
        // Listeners may unbind themselves, so never hold the borrow while calling out.
        let callbacks: Vec<ScrollCallback> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl ScrollElement for SimElement {
    fn scroll_offset(&self) -> (f32, f32) {
        self.state.borrow().offset
    }

    fn visible_size(&self) -> (f32, f32) {
        self.state.borrow().visible
    }

    fn content_size(&self) -> (f32, f32) {
        self.state.borrow().content
    }

    fn has_class(&self, name: &str) -> bool {
        self.state.borrow().classes.contains(name)
    }

    fn add_class(&self, name: &str) {
        self.state.borrow_mut().classes.insert(name.to_string());
    }

    fn remove_class(&self, name: &str) {
        self.state.borrow_mut().classes.remove(name);
    }

    fn bind_scroll(&self, namespace: &str, callback: ScrollCallback) {
        self.listeners
            .borrow_mut()
            .push((namespace.to_string(), callback));
    }

    fn unbind_scroll(&self, namespace: &str) {
        self.listeners.borrow_mut().retain(|(ns, _)| ns != namespace);
    }
}
