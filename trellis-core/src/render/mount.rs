//! Mounter
//!
//! Mounting walks a virtual tree that has no live counterpart yet and
//! produces the matching host subtree: a single synchronous depth-first
//! pass that creates host nodes, applies attributes, attaches listeners,
//! instantiates components, and records the host reference on each
//! element and text node it creates.
//!
//! An element attaches to its parent only after its whole subtree has
//! been built underneath it, so a render that panics mid-mount leaves no
//! partial subtree in the live tree.

use tracing::trace;

use crate::error::RenderError;
use crate::host::HostNode;
use crate::vnode::{text_content, Kind, VNode};

/// Mount `node` under `parent`, at position `index` when given and
/// appended otherwise.
///
/// On return the node (or, for components, its rendered subtree) owns
/// the host nodes that were created. Errors abort the whole mount.
pub fn mount(node: &mut VNode, parent: &HostNode, index: Option<usize>) -> Result<(), RenderError> {
    match &mut node.kind {
        Kind::Text(text) => {
            let host = HostNode::text(text_content(&text.content));
            attach(parent, &host, index);
            text.host = Some(host);
        }
        Kind::Element(el) => {
            trace!(tag = %el.tag, children = el.children.len(), "mounting element");
            let host = HostNode::element(el.tag.clone());
            host.set_attributes(&el.attributes);
            for (event, handler) in &el.listeners {
                host.add_listener(event.clone(), handler.clone());
            }
            for child in &mut el.children {
                mount(child, &host, None)?;
            }
            attach(parent, &host, index);
            el.host = Some(host);
        }
        Kind::Function(func) => {
            let mut rendered = Box::new((func.render)(&func.props));
            mount(&mut rendered, parent, index)?;
            func.rendered = Some(rendered);
        }
        Kind::Class(class) => {
            let mut instance = (class.constructor)(class.props.clone());
            let mut rendered = Box::new(instance.render());
            mount(&mut rendered, parent, index)?;
            // The host subtree exists now; tell the instance.
            instance.mounted();
            class.instance = Some(instance);
            class.rendered = Some(rendered);
        }
    }
    Ok(())
}

fn attach(parent: &HostNode, host: &HostNode, index: Option<usize>) {
    match index {
        Some(i) => parent.insert_child(i, host),
        None => parent.append_child(host),
    }
}
