//! Resize notification hub
//!
//! Components that depend on viewport size bind a callback under a namespace and a
//! priority [`ResizeStack`]. When the host reports a resize, [`ResizeDispatcher::dispatch`]
//! runs every callback stack by stack, so core components settle before the ones
//! layered on top of them.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use scrollstop_core::resize::{ResizeDispatcher, ResizeStack};
//!
//! let dispatcher = ResizeDispatcher::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = hits.clone();
//! dispatcher.bind("my-widget", ResizeStack::Normal, move || counter.set(counter.get() + 1));
//!
//! dispatcher.dispatch();
//! assert_eq!(hits.get(), 1);
//!
//! dispatcher.unbind("my-widget", ResizeStack::Normal);
//! dispatcher.dispatch();
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Resize callback. Uses Rc since UI is single-threaded.
pub type ResizeCallback = Rc<dyn Fn()>;

/// Priority tier of a resize subscription
///
/// Stacks are dispatched in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResizeStack {
    /// Framework-level components (layout helpers, scroll watchers)
    Core,
    /// Application components
    Normal,
    /// Anything that must observe the final state of the other stacks
    Last,
}

impl ResizeStack {
    pub const ALL: [ResizeStack; 3] = [ResizeStack::Core, ResizeStack::Normal, ResizeStack::Last];

    fn index(self) -> usize {
        match self {
            ResizeStack::Core => 0,
            ResizeStack::Normal => 1,
            ResizeStack::Last => 2,
        }
    }
}

/// Handle identifying one bound callback
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResizeSubscription {
    namespace: String,
    stack: ResizeStack,
    id: u64,
}

impl ResizeSubscription {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn stack(&self) -> ResizeStack {
        self.stack
    }
}

struct Binding {
    namespace: String,
    id: u64,
    callback: ResizeCallback,
}

/// Single-threaded resize subscription hub
pub struct ResizeDispatcher {
    stacks: RefCell<[Vec<Binding>; 3]>,
    next_id: Cell<u64>,
}

impl fmt::Debug for ResizeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stacks = self.stacks.borrow();
        f.debug_struct("ResizeDispatcher")
            .field("core", &stacks[0].len())
            .field("normal", &stacks[1].len())
            .field("last", &stacks[2].len())
            .finish()
    }
}

impl Default for ResizeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeDispatcher {
    pub fn new() -> Self {
        Self {
            stacks: RefCell::new([Vec::new(), Vec::new(), Vec::new()]),
            next_id: Cell::new(0),
        }
    }

    /// Bind a callback under `namespace` in `stack`
    ///
    /// Several callbacks may share a namespace; [`unbind`](Self::unbind) removes all of them.
    pub fn bind<F>(&self, namespace: &str, stack: ResizeStack, callback: F) -> ResizeSubscription
    where
        F: Fn() + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.stacks.borrow_mut()[stack.index()].push(Binding {
            namespace: namespace.to_string(),
            id,
            callback: Rc::new(callback),
        });
        tracing::debug!(namespace, ?stack, id, "resize callback bound");

        ResizeSubscription {
            namespace: namespace.to_string(),
            stack,
            id,
        }
    }

    /// Remove every callback bound under `namespace` in `stack`
    pub fn unbind(&self, namespace: &str, stack: ResizeStack) {
        let mut stacks = self.stacks.borrow_mut();
        let bindings = &mut stacks[stack.index()];
        let before = bindings.len();
        bindings.retain(|b| b.namespace != namespace);
        tracing::debug!(
            namespace,
            ?stack,
            removed = before - bindings.len(),
            "resize namespace unbound"
        );
    }

    /// Remove exactly the callback identified by `subscription`
    ///
    /// Returns false if it was already gone.
    pub fn unbind_subscription(&self, subscription: &ResizeSubscription) -> bool {
        let mut stacks = self.stacks.borrow_mut();
        let bindings = &mut stacks[subscription.stack.index()];
        let before = bindings.len();
        bindings.retain(|b| b.id != subscription.id);
        before != bindings.len()
    }

    /// Whether any callback is bound under `namespace` in `stack`
    pub fn is_bound(&self, namespace: &str, stack: ResizeStack) -> bool {
        self.stacks.borrow()[stack.index()]
            .iter()
            .any(|b| b.namespace == namespace)
    }

    /// Number of bound callbacks across all stacks
    pub fn len(&self) -> usize {
        self.stacks.borrow().iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify every bound callback of a viewport resize
    pub fn dispatch(&self) {
        // Snapshot first: callbacks are free to bind and unbind while we run them.
        let callbacks: Vec<ResizeCallback> = {
            let stacks = self.stacks.borrow();
            ResizeStack::ALL
                .iter()
                .flat_map(|stack| stacks[stack.index()].iter())
                .map(|b| Rc::clone(&b.callback))
                .collect()
        };

        tracing::trace!(count = callbacks.len(), "dispatching resize");
        for callback in callbacks {
            callback();
        }
    }
}
