//! Error Types
//!
//! The engine distinguishes two failure classes:
//!
//! 1. Precondition violations: an operation was invoked against a node in
//!    the wrong lifecycle state (patching a node that was never mounted,
//!    replacing a node whose host reference has no parent). These are
//!    programming errors in the caller, surfaced as `RenderError` so the
//!    current operation halts before the host tree can be corrupted.
//!
//! 2. Render failures: a component's `render` panics. The engine does not
//!    catch the unwind; it propagates to whatever triggered the render.
//!
//! Text content of an unsupported type is not an error at all. It coerces
//! to empty text (see `vnode::text_content`).

use thiserror::Error;

/// Errors produced by mount, unmount, and patch operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An operation required a live host reference, but the node was never
    /// mounted or its reference was already released.
    #[error("{operation} requires a mounted node, but no live host reference exists")]
    NotMounted {
        /// The operation that failed.
        operation: &'static str,
    },

    /// An operation required the node's position among its siblings, but
    /// the host node is not attached to any parent.
    #[error("{operation} requires an attached host node, but it has no parent")]
    Detached {
        /// The operation that failed.
        operation: &'static str,
    },
}
