//! Component Capability
//!
//! Components come in two shapes:
//!
//! - Function components: a pure `fn(&Props) -> VNode`. They must not
//!   retain mutable state between calls; any state they appear to have
//!   belongs to an external state container that triggers re-renders.
//!
//! - Stateful components: a type implementing [`Component`], constructed
//!   from props by a plain constructor function. The instance lives for
//!   as long as the engine can match the node across renders, so internal
//!   state survives patches.
//!
//! In both cases the function pointer is the component's identity: two
//! nodes describe "the same" component exactly when they carry the same
//! constructor or render function. A different pointer at the same tree
//! position forces a full replace.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::VNode;

/// Ordered property mapping handed to components.
pub type Props = IndexMap<String, Value>;

/// Constructor for a stateful component.
///
/// The pointer doubles as the component definition's identity during
/// reconciliation.
pub type Constructor = fn(Props) -> Box<dyn Component>;

/// A pure view function mapping props to a virtual subtree.
pub type RenderFn = fn(&Props) -> VNode;

/// A stateful component instance.
///
/// The engine owns the instance through the node that mounted it, assigns
/// new props through [`set_props`](Component::set_props) before each
/// re-render, and invokes the lifecycle hooks at the documented points.
/// The hooks are side-effecting with no return contract; the default
/// implementations do nothing.
pub trait Component: Send + Sync {
    /// Produce the virtual subtree for the current props and state.
    fn render(&self) -> VNode;

    /// Replace the component's props.
    ///
    /// Called by the engine immediately before re-rendering during a
    /// patch; the subsequent `render` sees the new props combined with
    /// whatever internal state the instance already holds.
    fn set_props(&mut self, props: Props);

    /// Invoked once, after the component's host subtree exists.
    fn mounted(&mut self) {}

    /// Invoked after a patch of this component's subtree completes.
    fn updated(&mut self) {}

    /// Invoked before the component's host subtree is removed.
    fn before_unmount(&mut self) {}
}

/// Build a [`Props`] mapping from any serializable value.
///
/// The value must serialize to an object; anything else produces an
/// empty mapping.
pub fn props_of(value: impl Serialize) -> Props {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => Props::new(),
    }
}
