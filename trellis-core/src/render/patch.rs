//! Patcher
//!
//! Patching reconciles a freshly built virtual tree against the previous
//! one, mutating the live host tree in place wherever identity allows
//! and falling back to a full replace where it does not.
//!
//! # Decision rule
//!
//! For every node pair the engine first compares identity: the kind
//! discriminator plus the kind-specific type (element tag, view function,
//! component constructor). A mismatch means the old subtree cannot be
//! reused; it is unmounted and the new subtree mounted in its place, at
//! the same position under the same parent. That path is always correct
//! and never minimal.
//!
//! Matching nodes are updated in place:
//!
//! - Stateful components keep their instance; it receives the new props
//!   and re-renders, and the rendered subtrees are patched recursively.
//! - Function components re-render and patch their rendered subtrees.
//! - Elements sync attributes (only when the mapping changed), swap
//!   listener sets wholesale, and reconcile their children.
//! - Text leaves rewrite their host text only when the content changed.
//!
//! In every reuse path the new node takes ownership of the old node's
//! host reference, instance, and rendered subtree; the old node is
//! consumed and cannot alias them afterwards.
//!
//! # Children reconciliation
//!
//! [`reconcile_children`] walks the new child list once, left to right.
//! Each new child prefers the old child at the same index when their keys
//! agree (two keyless children always agree); otherwise a keyed child
//! searches the old list for the first key match, and an unmatched child
//! mounts as new. Old children that nothing claimed are unmounted after
//! the pass.
//!
//! A keyed match found at a shifted index is patched where it stands; the
//! host node is not moved to the new position. Identity and state are
//! preserved, host sibling order is not corrected. Unkeyed lists are
//! reconciled purely by index, never by search.

use std::ptr;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::RenderError;
use crate::host::HostNode;
use crate::vnode::{text_content, ClassNode, ElementNode, FunctionNode, Kind, TextNode, VNode};

use super::mount::mount;
use super::unmount::unmount;

/// Patch the mounted tree `old` into the shape described by `new`.
///
/// Precondition: `old` is currently mounted. Postcondition: the host
/// tree matches `new`, which now owns the carried-forward host
/// reference, instance, and rendered references; `old` is consumed.
pub fn patch(new: &mut VNode, old: VNode) -> Result<(), RenderError> {
    // Matching arms update in place and return. The fallthrough value is
    // the old node handed back for the replace path.
    let old = match (&mut new.kind, old.kind) {
        (Kind::Class(n), Kind::Class(o)) if ptr::fn_addr_eq(n.constructor, o.constructor) => {
            return patch_class(n, o);
        }
        (Kind::Function(n), Kind::Function(o)) if ptr::fn_addr_eq(n.render, o.render) => {
            return patch_function(n, o);
        }
        (Kind::Element(n), Kind::Element(o)) if n.tag == o.tag => {
            return patch_element(n, o);
        }
        (Kind::Text(n), Kind::Text(o)) => {
            return patch_text(n, o);
        }
        (_, old_kind) => VNode {
            key: old.key,
            kind: old_kind,
        },
    };

    debug!(new = ?new.flag(), old = ?old.flag(), "identity mismatch, replacing subtree");
    replace(new, old)
}

/// Unmount `old` and mount `new` under the same parent at the same
/// position. The fallback whenever in-place update is not possible.
fn replace(new: &mut VNode, old: VNode) -> Result<(), RenderError> {
    let anchor = old
        .effective_host()
        .cloned()
        .ok_or(RenderError::NotMounted { operation: "replace" })?;
    let parent = anchor
        .parent()
        .ok_or(RenderError::Detached { operation: "replace" })?;
    let index = anchor.sibling_index();

    unmount(old)?;
    mount(new, &parent, index)
}

fn patch_class(new: &mut ClassNode, old: ClassNode) -> Result<(), RenderError> {
    let mut instance = old
        .instance
        .ok_or(RenderError::NotMounted { operation: "patch" })?;
    let old_rendered = old
        .rendered
        .ok_or(RenderError::NotMounted { operation: "patch" })?;

    // The carried-forward instance re-renders with the new props and
    // whatever internal state it already holds.
    instance.set_props(new.props.clone());
    let mut rendered = Box::new(instance.render());
    patch(&mut rendered, *old_rendered)?;
    instance.updated();

    new.instance = Some(instance);
    new.rendered = Some(rendered);
    Ok(())
}

fn patch_function(new: &mut FunctionNode, old: FunctionNode) -> Result<(), RenderError> {
    let old_rendered = old
        .rendered
        .ok_or(RenderError::NotMounted { operation: "patch" })?;

    let mut rendered = Box::new((new.render)(&new.props));
    patch(&mut rendered, *old_rendered)?;

    new.rendered = Some(rendered);
    Ok(())
}

fn patch_element(new: &mut ElementNode, old: ElementNode) -> Result<(), RenderError> {
    let host = old
        .host
        .ok_or(RenderError::NotMounted { operation: "patch" })?;

    if new.attributes != old.attributes {
        host.set_attributes(&new.attributes);
    }

    // Listener sets are replaced wholesale, not diffed.
    for (event, handler) in &old.listeners {
        host.remove_listener(event, handler);
    }
    for (event, handler) in &new.listeners {
        host.add_listener(event.clone(), handler.clone());
    }

    reconcile_children(&mut new.children, old.children, &host)?;

    new.host = Some(host);
    Ok(())
}

fn patch_text(new: &mut TextNode, old: TextNode) -> Result<(), RenderError> {
    let host = old
        .host
        .ok_or(RenderError::NotMounted { operation: "patch" })?;

    if new.content != old.content {
        host.set_text(text_content(&new.content));
    }

    new.host = Some(host);
    Ok(())
}

/// Reconcile an ordered child list against its previous state.
///
/// Walks `new_children` once, left to right, patching each child against
/// the old child it matches (positionally, or by key search for keyed
/// children) and mounting children that match nothing. Old children that
/// were never matched are unmounted after the pass.
pub fn reconcile_children(
    new_children: &mut [VNode],
    old_children: Vec<VNode>,
    parent: &HostNode,
) -> Result<(), RenderError> {
    trace!(
        new = new_children.len(),
        old = old_children.len(),
        "reconciling children"
    );

    let old_keys: SmallVec<[Option<String>; 8]> =
        old_children.iter().map(|child| child.key.clone()).collect();
    let mut slots: Vec<Option<VNode>> = old_children.into_iter().map(Some).collect();

    for (i, new_child) in new_children.iter_mut().enumerate() {
        let mut matched = None;

        // Positional match, including the case where both are keyless.
        if i < slots.len() && old_keys[i] == new_child.key {
            matched = slots[i].take();
        }

        // Keyed search over the full old list in original order; the
        // first key match wins. Unkeyed children never search. An empty
        // slot here means a duplicate key already consumed the match, and
        // the child mounts as new instead of aliasing it.
        if matched.is_none() {
            if let Some(key) = &new_child.key {
                if let Some(position) =
                    old_keys.iter().position(|k| k.as_deref() == Some(key.as_str()))
                {
                    matched = slots[position].take();
                }
            }
        }

        match matched {
            Some(old_child) => patch(new_child, old_child)?,
            None => mount(new_child, parent, None)?,
        }
    }

    for slot in slots {
        if let Some(old_child) = slot {
            unmount(old_child)?;
        }
    }

    Ok(())
}
