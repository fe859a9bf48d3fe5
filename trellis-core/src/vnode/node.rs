//! Virtual Node Implementation
//!
//! `VNode` is the single core entity of the tree description: a tagged
//! union over four kinds sharing an optional sibling key.
//!
//! # Ownership
//!
//! - A mounted node's host reference is present exactly for the element
//!   and text kinds. Component kinds delegate their host presence to
//!   their rendered subtree and never hold a host reference directly.
//! - `rendered` is present iff the node is a component kind and has been
//!   rendered at least once.
//! - Exactly one node owns a given host node at a time. The engine moves
//!   these fields from an old tree onto a new one during a patch; the two
//!   trees never alias them.

use std::fmt::Debug;

use indexmap::IndexMap;
use serde_json::Value;

use crate::host::{EventHandler, HostNode};

use super::component::{Component, Constructor, Props, RenderFn};

/// Discriminator identifying a virtual node's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// A text leaf.
    Text,

    /// A host element with attributes, listeners, and children.
    Element,

    /// A pure function component.
    Function,

    /// A stateful component.
    Class,
}

/// A point in the virtual tree.
pub struct VNode {
    /// Optional identity hint, stable across renders, unique among
    /// siblings when present.
    pub(crate) key: Option<String>,

    /// The kind-specific payload.
    pub(crate) kind: Kind,
}

pub(crate) enum Kind {
    Text(TextNode),
    Element(ElementNode),
    Function(FunctionNode),
    Class(ClassNode),
}

pub(crate) struct TextNode {
    /// Raw content value. Coerced to a string via [`text_content`] when
    /// written to the host.
    pub(crate) content: Value,

    /// The live host text node, once mounted.
    pub(crate) host: Option<HostNode>,
}

pub(crate) struct ElementNode {
    /// Host tag name. Part of the node's identity during reconciliation.
    pub(crate) tag: String,

    /// Attribute mapping in declaration order. Equality between two
    /// mappings is order-insensitive.
    pub(crate) attributes: IndexMap<String, Value>,

    /// Event listeners by event name.
    pub(crate) listeners: IndexMap<String, EventHandler>,

    /// Ordered child nodes.
    pub(crate) children: Vec<VNode>,

    /// The live host element, once mounted.
    pub(crate) host: Option<HostNode>,
}

pub(crate) struct FunctionNode {
    /// The view function. Part of the node's identity.
    pub(crate) render: RenderFn,

    /// Props passed to the view function.
    pub(crate) props: Props,

    /// The subtree produced by the most recent render.
    pub(crate) rendered: Option<Box<VNode>>,
}

pub(crate) struct ClassNode {
    /// The component constructor. Part of the node's identity.
    pub(crate) constructor: Constructor,

    /// Props for the instance.
    pub(crate) props: Props,

    /// The live instance, created at mount and carried across patches
    /// that reuse this node's identity.
    pub(crate) instance: Option<Box<dyn Component>>,

    /// The subtree produced by the most recent render.
    pub(crate) rendered: Option<Box<VNode>>,
}

impl VNode {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    /// A text leaf. String and number content render as written; any
    /// other value renders as empty text.
    pub fn text(content: impl Into<Value>) -> Self {
        Self {
            key: None,
            kind: Kind::Text(TextNode {
                content: content.into(),
                host: None,
            }),
        }
    }

    /// A host element with the given tag name and no attributes,
    /// listeners, or children yet.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            key: None,
            kind: Kind::Element(ElementNode {
                tag: tag.into(),
                attributes: IndexMap::new(),
                listeners: IndexMap::new(),
                children: Vec::new(),
                host: None,
            }),
        }
    }

    /// A function component node.
    pub fn function(render: RenderFn, props: Props) -> Self {
        Self {
            key: None,
            kind: Kind::Function(FunctionNode {
                render,
                props,
                rendered: None,
            }),
        }
    }

    /// A stateful component node. The instance is created when the node
    /// is first mounted.
    pub fn component(constructor: Constructor, props: Props) -> Self {
        Self {
            key: None,
            kind: Kind::Class(ClassNode {
                constructor,
                props,
                instance: None,
                rendered: None,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Attach a sibling key.
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add an attribute (element nodes only).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        debug_assert!(
            matches!(self.kind, Kind::Element(_)),
            "attr on a non-element node"
        );
        if let Kind::Element(el) = &mut self.kind {
            el.attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Attach an event listener (element nodes only).
    pub fn on(mut self, event: impl Into<String>, handler: EventHandler) -> Self {
        debug_assert!(
            matches!(self.kind, Kind::Element(_)),
            "listener on a non-element node"
        );
        if let Kind::Element(el) = &mut self.kind {
            el.listeners.insert(event.into(), handler);
        }
        self
    }

    /// Append a child (element nodes only).
    pub fn child(mut self, child: VNode) -> Self {
        debug_assert!(
            matches!(self.kind, Kind::Element(_)),
            "child on a non-element node"
        );
        if let Kind::Element(el) = &mut self.kind {
            el.children.push(child);
        }
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The node's kind discriminator.
    pub fn flag(&self) -> Flag {
        match self.kind {
            Kind::Text(_) => Flag::Text,
            Kind::Element(_) => Flag::Element,
            Kind::Function(_) => Flag::Function,
            Kind::Class(_) => Flag::Class,
        }
    }

    /// The sibling key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The directly owned host node. Present only for mounted element and
    /// text nodes; component nodes always return `None` here.
    pub fn host(&self) -> Option<&HostNode> {
        match &self.kind {
            Kind::Text(t) => t.host.as_ref(),
            Kind::Element(el) => el.host.as_ref(),
            Kind::Function(_) | Kind::Class(_) => None,
        }
    }

    /// The host node this virtual node is effectively anchored to,
    /// following component `rendered` chains down to the element or text
    /// node that owns one.
    pub fn effective_host(&self) -> Option<&HostNode> {
        match &self.kind {
            Kind::Text(_) | Kind::Element(_) => self.host(),
            Kind::Function(f) => f.rendered.as_deref().and_then(VNode::effective_host),
            Kind::Class(c) => c.rendered.as_deref().and_then(VNode::effective_host),
        }
    }

    /// The most recently rendered subtree (component nodes only).
    pub fn rendered(&self) -> Option<&VNode> {
        match &self.kind {
            Kind::Function(f) => f.rendered.as_deref(),
            Kind::Class(c) => c.rendered.as_deref(),
            Kind::Text(_) | Kind::Element(_) => None,
        }
    }

    /// The child nodes (element nodes only; empty otherwise).
    pub fn children(&self) -> &[VNode] {
        match &self.kind {
            Kind::Element(el) => &el.children,
            _ => &[],
        }
    }
}

impl Debug for VNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("VNode");
        dbg.field("flag", &self.flag());
        if let Some(key) = &self.key {
            dbg.field("key", key);
        }
        match &self.kind {
            Kind::Text(t) => {
                dbg.field("content", &t.content);
                dbg.field("mounted", &t.host.is_some());
            }
            Kind::Element(el) => {
                dbg.field("tag", &el.tag);
                dbg.field("children", &el.children.len());
                dbg.field("mounted", &el.host.is_some());
            }
            Kind::Function(fun) => {
                dbg.field("rendered", &fun.rendered.is_some());
            }
            Kind::Class(class) => {
                dbg.field("instance", &class.instance.is_some());
                dbg.field("rendered", &class.rendered.is_some());
            }
        }
        dbg.finish()
    }
}

/// Coerce text content to its rendered string form.
///
/// Strings and numbers stringify; any other value renders as empty text.
pub fn text_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
