//! Unmounter
//!
//! Unmounting consumes a mounted virtual tree, removes its host nodes,
//! and releases component instances and listeners. For stateful
//! components the pre-teardown hook fires before the host subtree is
//! removed.
//!
//! Callers must never unmount a node that was not mounted; that is a
//! programming error and surfaces as [`RenderError::NotMounted`] rather
//! than silently corrupting the tree.

use tracing::trace;

use crate::error::RenderError;
use crate::vnode::{Kind, VNode};

/// Unmount `node`, removing its host subtree and dropping whatever
/// instance and listener state it owned.
pub fn unmount(node: VNode) -> Result<(), RenderError> {
    match node.kind {
        Kind::Text(text) => {
            let host = text
                .host
                .ok_or(RenderError::NotMounted { operation: "unmount" })?;
            host.remove();
        }
        Kind::Element(el) => {
            let host = el
                .host
                .ok_or(RenderError::NotMounted { operation: "unmount" })?;
            trace!(tag = %el.tag, "unmounting element");
            for (event, handler) in &el.listeners {
                host.remove_listener(event, handler);
            }
            for child in el.children {
                unmount(child)?;
            }
            host.remove();
        }
        Kind::Function(func) => {
            let rendered = func
                .rendered
                .ok_or(RenderError::NotMounted { operation: "unmount" })?;
            unmount(*rendered)?;
        }
        Kind::Class(class) => {
            let mut instance = class
                .instance
                .ok_or(RenderError::NotMounted { operation: "unmount" })?;
            let rendered = class
                .rendered
                .ok_or(RenderError::NotMounted { operation: "unmount" })?;
            // The hook sees the host subtree while it still exists.
            instance.before_unmount();
            unmount(*rendered)?;
        }
    }
    Ok(())
}
