//! Host Tree
//!
//! This module implements the live render target that the virtual tree is
//! mirrored onto. It exposes the primitive operations the rendering engine
//! is written against:
//!
//! - Node creation (`HostNode::element`, `HostNode::text`) and removal
//! - Structural mutation (`append_child`, `insert_child`, `remove`)
//! - Full-map attribute synchronization (`set_attributes`)
//! - Listener attachment, detachment, and dispatch
//! - Sibling position lookup (`sibling_index`)
//!
//! The implementation here is an in-memory tree. It stands in for a real
//! render target (a browser document, a terminal scene graph) and is what
//! the test suite observes. A platform backend would provide the same
//! surface over its own node type.
//!
//! # Observability
//!
//! Each node tracks how many attribute and text writes have actually been
//! applied to it. The engine's no-op guarantees (an unchanged attribute
//! map or text value causes zero host writes) are asserted against these
//! counters.

mod node;

pub use node::{EventHandler, HostNode};
