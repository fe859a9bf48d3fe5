//! Host Node Implementation
//!
//! A `HostNode` is a cheap clonable handle to a live node in the host
//! tree. All handles to the same node share state; mutating through one
//! handle is visible through every other.
//!
//! # Identity
//!
//! Every node carries a unique ID. Handle equality (`PartialEq`) is node
//! identity, not structural equality: two handles are equal exactly when
//! they refer to the same live node.
//!
//! # Thread Safety
//!
//! Node state lives behind an `RwLock`. The rendering engine itself is
//! strictly single-threaded, but the handles are `Send + Sync` so trees
//! can be handed across threads between render passes.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

/// Handler invoked when an event is dispatched to a host node.
///
/// Handlers are compared by pointer identity when detached, so the same
/// handle that was attached must be used to remove it.
pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Counter for generating unique host node IDs.
static HOST_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique host node ID.
fn next_host_id() -> u64 {
    HOST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// The kind of host node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostKind {
    /// An element with a tag name, attributes, listeners, and children.
    Element { tag: String },

    /// A text leaf.
    Text,
}

/// Mutable node state, shared by all handles to the node.
struct HostState {
    /// The parent node, if attached. Weak to avoid parent/child cycles.
    parent: Weak<HostInner>,

    /// Child nodes in document order.
    children: Vec<HostNode>,

    /// Live attribute values, keyed by attribute name.
    attributes: IndexMap<String, String>,

    /// Attached listeners in attach order. An event name may appear more
    /// than once.
    listeners: Vec<(String, EventHandler)>,

    /// Text content (text nodes only).
    text: String,
}

struct HostInner {
    /// Unique identifier for this node.
    id: u64,

    /// What kind of node this is. Fixed at creation.
    kind: HostKind,

    /// Shared mutable state.
    state: RwLock<HostState>,

    /// Number of attribute values actually written to this node.
    attribute_writes: AtomicU64,

    /// Number of text values actually written to this node.
    text_writes: AtomicU64,
}

/// A handle to a live node in the host tree.
#[derive(Clone)]
pub struct HostNode {
    inner: Arc<HostInner>,
}

impl HostNode {
    fn new(kind: HostKind, text: String) -> Self {
        Self {
            inner: Arc::new(HostInner {
                id: next_host_id(),
                kind,
                state: RwLock::new(HostState {
                    parent: Weak::new(),
                    children: Vec::new(),
                    attributes: IndexMap::new(),
                    listeners: Vec::new(),
                    text,
                }),
                attribute_writes: AtomicU64::new(0),
                text_writes: AtomicU64::new(0),
            }),
        }
    }

    /// Create a detached element node with the given tag name.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(HostKind::Element { tag: tag.into() }, String::new())
    }

    /// Create a detached text node with the given content.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(HostKind::Text, content.into())
    }

    /// Get the node's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The tag name, for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.inner.kind {
            HostKind::Element { tag } => Some(tag),
            HostKind::Text => None,
        }
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        self.inner.kind == HostKind::Text
    }

    /// Whether this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.inner.kind, HostKind::Element { .. })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Attach `child` as the last child of this node.
    ///
    /// If the child is currently attached elsewhere it is detached first;
    /// a node has at most one parent.
    pub fn append_child(&self, child: &HostNode) {
        self.attach_child(None, child);
    }

    /// Attach `child` at `index` among this node's children.
    ///
    /// An index past the end behaves like `append_child`.
    pub fn insert_child(&self, index: usize, child: &HostNode) {
        self.attach_child(Some(index), child);
    }

    fn attach_child(&self, index: Option<usize>, child: &HostNode) {
        child.remove();
        child.inner.state.write().parent = Arc::downgrade(&self.inner);

        let mut state = self.inner.state.write();
        let at = match index {
            Some(i) => i.min(state.children.len()),
            None => state.children.len(),
        };
        state.children.insert(at, child.clone());
    }

    /// Detach this node from its parent. A no-op if already detached.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent
                .inner
                .state
                .write()
                .children
                .retain(|c| c.inner.id != self.inner.id);
        }
        self.inner.state.write().parent = Weak::new();
    }

    /// The parent node, if this node is attached.
    pub fn parent(&self) -> Option<HostNode> {
        self.inner
            .state
            .read()
            .parent
            .upgrade()
            .map(|inner| HostNode { inner })
    }

    /// Position of this node among its parent's children, if attached.
    pub fn sibling_index(&self) -> Option<usize> {
        let parent = self.parent()?;
        let state = parent.inner.state.read();
        state.children.iter().position(|c| c.inner.id == self.inner.id)
    }

    /// Snapshot of the child handles in document order.
    pub fn children(&self) -> Vec<HostNode> {
        self.inner.state.read().children.clone()
    }

    /// The child at `index`, if present.
    pub fn child(&self, index: usize) -> Option<HostNode> {
        self.inner.state.read().children.get(index).cloned()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.inner.state.read().children.len()
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Synchronize this node's attributes to the complete mapping given.
    ///
    /// Attributes absent from `attributes` are removed, new names are
    /// added, and changed values are updated. Values already equal to the
    /// live value are not written, so the write counter reflects actual
    /// mutations only.
    pub fn set_attributes(&self, attributes: &IndexMap<String, Value>) {
        debug_assert!(self.is_element(), "set_attributes on a text node");
        let mut state = self.inner.state.write();

        let stale: Vec<String> = state
            .attributes
            .keys()
            .filter(|name| !attributes.contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            state.attributes.shift_remove(&name);
            self.inner.attribute_writes.fetch_add(1, Ordering::Relaxed);
        }

        for (name, value) in attributes {
            let text = attribute_text(value);
            if state.attributes.get(name) != Some(&text) {
                state.attributes.insert(name.clone(), text);
                self.inner.attribute_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// The live value of a single attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.state.read().attributes.get(name).cloned()
    }

    /// Snapshot of all live attributes.
    pub fn attributes(&self) -> IndexMap<String, String> {
        self.inner.state.read().attributes.clone()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Overwrite the text content of a text node.
    pub fn set_text(&self, text: impl Into<String>) {
        debug_assert!(self.is_text(), "set_text on an element node");
        self.inner.state.write().text = text.into();
        self.inner.text_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// The current text content.
    pub fn text(&self) -> String {
        self.inner.state.read().text.clone()
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Attach a listener for `event`. Listeners stack in attach order.
    pub fn add_listener(&self, event: impl Into<String>, handler: EventHandler) {
        self.inner.state.write().listeners.push((event.into(), handler));
    }

    /// Detach one listener, matched by event name and handler identity.
    pub fn remove_listener(&self, event: &str, handler: &EventHandler) {
        self.inner
            .state
            .write()
            .listeners
            .retain(|(name, h)| !(name == event && Arc::ptr_eq(h, handler)));
    }

    /// Number of attached listeners across all events.
    pub fn listener_count(&self) -> usize {
        self.inner.state.read().listeners.len()
    }

    /// Dispatch an event to every listener attached for `event`, in
    /// attach order.
    ///
    /// Handlers run outside the node's lock, so a handler may freely read
    /// the node it fired on.
    pub fn emit(&self, event: &str, payload: &Value) {
        let handlers: Vec<EventHandler> = self
            .inner
            .state
            .read()
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(payload);
        }
    }

    // ------------------------------------------------------------------
    // Write counters
    // ------------------------------------------------------------------

    /// Number of attribute values written to this node so far.
    pub fn attribute_write_count(&self) -> u64 {
        self.inner.attribute_writes.load(Ordering::Relaxed)
    }

    /// Number of text values written to this node so far.
    pub fn text_write_count(&self) -> u64 {
        self.inner.text_writes.load(Ordering::Relaxed)
    }
}

impl PartialEq for HostNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for HostNode {}

impl Debug for HostNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostNode")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("children", &self.child_count())
            .finish()
    }
}

/// Coerce an attribute value to its live string form.
///
/// Strings are used verbatim; any other value takes its JSON rendering
/// (numbers and booleans print as written, null as "null").
fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
