//! Render Root
//!
//! A `Root` ties a host mount point to the virtual tree of record. The
//! first render mounts; every later render patches against the previous
//! tree, which the root owns between passes.
//!
//! Renders are strictly sequential: a render runs to completion before
//! the host tree is consistent again, and the caller must not trigger a
//! new render while one is in progress.

use crate::error::RenderError;
use crate::host::HostNode;
use crate::vnode::VNode;

use super::mount::mount;
use super::patch::patch;
use super::unmount::unmount;

/// The entry point for rendering: owns a container host node and the
/// currently mounted virtual tree.
pub struct Root {
    /// The host node trees are mounted under.
    container: HostNode,

    /// The tree of record: the virtual tree currently mirrored onto the
    /// host. `None` before the first render and after `unmount`.
    tree: Option<VNode>,
}

impl Root {
    /// Create a root rendering into `container`.
    pub fn new(container: HostNode) -> Self {
        Self {
            container,
            tree: None,
        }
    }

    /// The container node this root renders into.
    pub fn container(&self) -> &HostNode {
        &self.container
    }

    /// The currently mounted tree, if any.
    pub fn tree(&self) -> Option<&VNode> {
        self.tree.as_ref()
    }

    /// Synchronize the host tree to `next`.
    ///
    /// Mounts on the first call, patches against the previous tree on
    /// every later call. On success `next` becomes the tree of record.
    /// On error the previous tree has been partially consumed and the
    /// root holds no tree of record; the error propagates unrecovered.
    pub fn render(&mut self, mut next: VNode) -> Result<(), RenderError> {
        match self.tree.take() {
            None => mount(&mut next, &self.container, None)?,
            Some(previous) => patch(&mut next, previous)?,
        }
        self.tree = Some(next);
        Ok(())
    }

    /// Tear down the mounted tree, if any, leaving the container empty.
    pub fn unmount(&mut self) -> Result<(), RenderError> {
        match self.tree.take() {
            Some(tree) => unmount(tree),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("container", &self.container.id())
            .field("mounted", &self.tree.is_some())
            .finish()
    }
}
