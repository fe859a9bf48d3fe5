//! Virtual Node Model
//!
//! This module defines the lightweight description of a UI tree that the
//! rendering engine synchronizes the host tree against.
//!
//! # Concepts
//!
//! ## Virtual nodes
//!
//! A [`VNode`] describes one point in the UI tree. It is one of four
//! kinds: a text leaf, a host element, a function component, or a
//! stateful component. The kind is a closed tagged union; every engine
//! operation dispatches over it exhaustively.
//!
//! ## Keys
//!
//! Every node may carry an optional key, a per-sibling identity hint that
//! lets list entries be matched across renders independent of their
//! position. Keys should be unique within a sibling list when present.
//!
//! ## Identity carry-forward
//!
//! Virtual trees are rebuilt from scratch on every render. Continuity
//! lives in three fields the engine moves from the previous tree onto the
//! next one during a patch: the host reference (text and element nodes),
//! the component instance (stateful components), and the rendered subtree
//! (both component kinds). A node from a new tree is otherwise immutable
//! input to the engine.
//!
//! # Value model
//!
//! Props, attribute values, and text content are dynamic
//! [`serde_json::Value`]s. This keeps the tree description plain data;
//! the only opaque fields are event handlers and component instances.

mod component;
mod node;

pub use component::{props_of, Component, Constructor, Props, RenderFn};
pub use node::{text_content, Flag, VNode};

pub(crate) use node::{ClassNode, ElementNode, FunctionNode, Kind, TextNode};
