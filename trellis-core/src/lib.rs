//! Trellis Core
//!
//! This crate provides the core rendering engine for the Trellis
//! declarative UI library. It implements:
//!
//! - A virtual-node tree model (text leaves, host elements, function
//!   components, stateful components)
//! - Mounting and unmounting of virtual trees onto a live host tree
//! - Tree reconciliation: patching a previously mounted tree into the
//!   shape of a new one with minimal host mutations, including keyed
//!   children diffing
//! - An in-memory host tree standing in for a platform render target
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `vnode`: the virtual tree description and component capability
//! - `host`: the live host tree and its primitive mutation operations
//! - `render`: mount, unmount, patch, and the render root
//! - `error`: the engine's error type
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_core::host::HostNode;
//! use trellis_core::render::Root;
//! use trellis_core::vnode::VNode;
//!
//! let mut root = Root::new(HostNode::element("app"));
//!
//! // First render mounts the tree.
//! root.render(
//!     VNode::element("div")
//!         .attr("class", "counter")
//!         .child(VNode::text(0)),
//! )?;
//!
//! // Later renders patch the live tree in place.
//! root.render(
//!     VNode::element("div")
//!         .attr("class", "counter")
//!         .child(VNode::text(1)),
//! )?;
//! ```

pub mod error;
pub mod host;
pub mod render;
pub mod vnode;
