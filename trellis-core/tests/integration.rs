//! Integration Tests for the Rendering Engine
//!
//! These tests drive mount, patch, and unmount together through a render
//! root and assert the externally observable properties of the engine:
//! what the host tree looks like, which nodes were reused, and how many
//! writes actually reached the host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::{json, Value};

use trellis_core::host::HostNode;
use trellis_core::render::{mount, unmount, Root};
use trellis_core::vnode::{props_of, Component, Props, VNode};

/// Sum attribute and text writes over a host subtree.
fn host_writes(node: &HostNode) -> (u64, u64) {
    let mut attrs = node.attribute_write_count();
    let mut texts = node.text_write_count();
    for child in node.children() {
        let (a, t) = host_writes(&child);
        attrs += a;
        texts += t;
    }
    (attrs, texts)
}

/// Test that unmounting removes exactly what mounting added.
#[test]
fn mount_then_unmount_round_trip() {
    let container = HostNode::element("app");
    let unrelated = HostNode::element("aside");
    container.append_child(&unrelated);

    let mut tree = VNode::element("main")
        .attr("class", "layout")
        .child(VNode::element("h1").child(VNode::text("title")))
        .child(
            VNode::element("ul")
                .child(VNode::element("li").child(VNode::text(1)))
                .child(VNode::element("li").child(VNode::text(2))),
        );
    mount(&mut tree, &container, None).unwrap();
    assert_eq!(container.child_count(), 2);

    unmount(tree).unwrap();

    // Only the node that was there before mounting remains.
    assert_eq!(container.child_count(), 1);
    assert_eq!(container.child(0).unwrap(), unrelated);
}

fn static_page(_props: &Props) -> VNode {
    VNode::element("section")
        .attr("class", "card")
        .attr("data-role", "summary")
        .child(VNode::element("h2").child(VNode::text("report")))
        .child(VNode::element("p").child(VNode::text(1024)))
}

/// Test that patching a structurally identical tree writes nothing.
#[test]
fn identical_patch_is_a_host_no_op() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::function(static_page, Props::new())).unwrap();
    let baseline = host_writes(root.container());

    root.render(VNode::function(static_page, Props::new())).unwrap();

    assert_eq!(host_writes(root.container()), baseline);
}

/// Test that a text/element flag mismatch always replaces, never merges.
#[test]
fn flag_mismatch_replaces_the_subtree() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::element("div").child(VNode::element("span").child(VNode::text("x"))))
        .unwrap();
    let outer = root.tree().unwrap().host().unwrap().clone();
    let old_inner = outer.child(0).unwrap();
    assert!(old_inner.is_element());

    root.render(VNode::element("div").child(VNode::text("x")))
        .unwrap();

    let new_inner = outer.child(0).unwrap();
    assert!(new_inner.is_text());
    assert_eq!(new_inner.text(), "x");
    assert!(old_inner.parent().is_none());
    assert_eq!(outer.child_count(), 1);
}

/// Test that a text change updates exactly one host value in place.
#[test]
fn text_update_touches_one_value() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::element("p").child(VNode::text("A")))
        .unwrap();
    let paragraph = root.tree().unwrap().host().unwrap().clone();
    let leaf = paragraph.child(0).unwrap();
    let (attrs_before, texts_before) = host_writes(root.container());

    root.render(VNode::element("p").child(VNode::text("B")))
        .unwrap();

    // Same nodes, one new text write, no attribute writes.
    assert_eq!(paragraph.child(0).unwrap(), leaf);
    assert_eq!(leaf.text(), "B");
    let (attrs_after, texts_after) = host_writes(root.container());
    assert_eq!(attrs_after, attrs_before);
    assert_eq!(texts_after, texts_before + 1);
}

/// Test that an attribute sync adds, updates, and removes in one pass.
#[test]
fn attribute_sync_merges_to_the_new_mapping() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::element("div").attr("class", "a").attr("id", "1"))
        .unwrap();
    let host = root.tree().unwrap().host().unwrap().clone();

    root.render(VNode::element("div").attr("class", "b")).unwrap();

    let mut expected = IndexMap::new();
    expected.insert("class".to_string(), "b".to_string());
    assert_eq!(host.attributes(), expected);
}

// ----------------------------------------------------------------------
// Keyed and unkeyed lists
// ----------------------------------------------------------------------

static ROW_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

struct Row {
    props: Props,
    mark: u64,
}

impl Component for Row {
    fn render(&self) -> VNode {
        let label = self.props.get("label").and_then(Value::as_str).unwrap_or("");
        VNode::element("li")
            .attr("mark", self.mark)
            .child(VNode::text(label))
    }

    fn set_props(&mut self, props: Props) {
        self.props = props;
    }
}

fn row(props: Props) -> Box<dyn Component> {
    let mark = ROW_CONSTRUCTED.fetch_add(1, Ordering::SeqCst) as u64;
    Box::new(Row { props, mark })
}

fn keyed_rows(keys: &[&str]) -> VNode {
    let mut list = VNode::element("ul");
    for key in keys {
        list = list.child(VNode::component(row, props_of(json!({ "label": *key }))).keyed(*key));
    }
    list
}

/// Map each row's label to the identity mark its instance carries.
fn marks_by_label(list: &HostNode) -> IndexMap<String, String> {
    list.children()
        .iter()
        .map(|li| {
            let label = li.child(0).unwrap().text();
            let mark = li.attribute("mark").unwrap();
            (label, mark)
        })
        .collect()
}

/// Test that reordered keyed children keep their component instances.
///
/// Host sibling order after a shifted keyed match is not corrected, so
/// only identity is asserted here, never order.
#[test]
fn keyed_reorder_preserves_instances() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(keyed_rows(&["a", "b", "c"])).unwrap();
    let list = root.tree().unwrap().host().unwrap().clone();
    let before = marks_by_label(&list);
    let constructed = ROW_CONSTRUCTED.load(Ordering::SeqCst);

    root.render(keyed_rows(&["c", "a", "b"])).unwrap();

    // No instance was rebuilt, and every key kept its own mark.
    assert_eq!(ROW_CONSTRUCTED.load(Ordering::SeqCst), constructed);
    assert_eq!(marks_by_label(&list), before);
    assert_eq!(list.child_count(), 3);
}

/// Test that a shrinking unkeyed list patches by index and truncates.
#[test]
fn unkeyed_list_truncates_from_the_end() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(
        VNode::element("ul")
            .child(VNode::element("li").child(VNode::text("x")))
            .child(VNode::element("li").child(VNode::text("y")))
            .child(VNode::element("li").child(VNode::text("z"))),
    )
    .unwrap();
    let list = root.tree().unwrap().host().unwrap().clone();
    let first = list.child(0).unwrap();
    let second = list.child(1).unwrap();
    let third = list.child(2).unwrap();

    root.render(
        VNode::element("ul")
            .child(VNode::element("li").child(VNode::text("x2")))
            .child(VNode::element("li").child(VNode::text("y2"))),
    )
    .unwrap();

    // Indexes 0 and 1 were patched in place; index 2 was unmounted.
    assert_eq!(list.child_count(), 2);
    assert_eq!(list.child(0).unwrap(), first);
    assert_eq!(list.child(1).unwrap(), second);
    assert!(third.parent().is_none());
    assert_eq!(first.child(0).unwrap().text(), "x2");
    assert_eq!(second.child(0).unwrap().text(), "y2");
}

static CARD_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

struct Card {
    props: Props,
}

impl Component for Card {
    fn render(&self) -> VNode {
        let label = self.props.get("label").and_then(Value::as_str).unwrap_or("");
        VNode::element("li").attr("class", "card").child(VNode::text(label))
    }

    fn set_props(&mut self, props: Props) {
        self.props = props;
    }
}

fn card(props: Props) -> Box<dyn Component> {
    CARD_CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
    Box::new(Card { props })
}

fn keyed_cards(keys: &[&str]) -> VNode {
    let mut list = VNode::element("ul");
    for key in keys {
        list = list.child(VNode::component(card, props_of(json!({ "label": *key }))).keyed(*key));
    }
    list
}

/// Test that a growing keyed list mounts only the unmatched entries.
#[test]
fn keyed_list_growth_mounts_only_new_keys() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(keyed_cards(&["a", "b"])).unwrap();
    let list = root.tree().unwrap().host().unwrap().clone();
    let constructed = CARD_CONSTRUCTED.load(Ordering::SeqCst);

    root.render(keyed_cards(&["a", "b", "c", "d"])).unwrap();

    assert_eq!(CARD_CONSTRUCTED.load(Ordering::SeqCst), constructed + 2);
    assert_eq!(list.child_count(), 4);
}

// ----------------------------------------------------------------------
// Components and lifecycle
// ----------------------------------------------------------------------

fn badge(props: &Props) -> VNode {
    let count = props.get("count").and_then(Value::as_i64).unwrap_or(0);
    VNode::element("span").attr("class", "badge").child(VNode::text(count))
}

/// Test that a function component re-render patches its rendered subtree
/// in place.
#[test]
fn function_component_patches_in_place() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::function(badge, props_of(json!({"count": 1}))))
        .unwrap();
    let span = root.tree().unwrap().effective_host().unwrap().clone();
    assert_eq!(span.child(0).unwrap().text(), "1");

    root.render(VNode::function(badge, props_of(json!({"count": 2}))))
        .unwrap();

    // Same host element, updated text.
    assert_eq!(root.tree().unwrap().effective_host(), Some(&span));
    assert_eq!(span.child(0).unwrap().text(), "2");
}

static WIDGET_EVENTS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

struct Widget {
    props: Props,
}

impl Component for Widget {
    fn render(&self) -> VNode {
        let title = self.props.get("title").and_then(Value::as_str).unwrap_or("");
        VNode::element("div").child(VNode::text(title))
    }

    fn set_props(&mut self, props: Props) {
        self.props = props;
    }

    fn mounted(&mut self) {
        WIDGET_EVENTS.lock().push("mounted");
    }

    fn updated(&mut self) {
        WIDGET_EVENTS.lock().push("updated");
    }

    fn before_unmount(&mut self) {
        WIDGET_EVENTS.lock().push("before_unmount");
    }
}

fn widget(props: Props) -> Box<dyn Component> {
    Box::new(Widget { props })
}

/// Test the lifecycle hook order across mount, update, and unmount.
#[test]
fn lifecycle_hooks_fire_in_order() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::component(widget, props_of(json!({"title": "one"}))))
        .unwrap();
    root.render(VNode::component(widget, props_of(json!({"title": "two"}))))
        .unwrap();

    // The re-render saw the new props.
    let text = root
        .tree()
        .unwrap()
        .effective_host()
        .unwrap()
        .child(0)
        .unwrap()
        .text();
    assert_eq!(text, "two");

    root.unmount().unwrap();

    assert_eq!(
        *WIDGET_EVENTS.lock(),
        vec!["mounted", "updated", "before_unmount"]
    );
}

struct Stopwatch;

impl Component for Stopwatch {
    fn render(&self) -> VNode {
        VNode::element("div").child(VNode::text("0:00"))
    }

    fn set_props(&mut self, _props: Props) {}
}

fn stopwatch(_props: Props) -> Box<dyn Component> {
    Box::new(Stopwatch)
}

struct Scoreboard;

impl Component for Scoreboard {
    fn render(&self) -> VNode {
        VNode::element("div").child(VNode::text("0 - 0"))
    }

    fn set_props(&mut self, _props: Props) {}
}

fn scoreboard(_props: Props) -> Box<dyn Component> {
    Box::new(Scoreboard)
}

/// Test that a different component constructor at the same position
/// forces a replace even when the rendered output is identical.
#[test]
fn constructor_mismatch_forces_replace() {
    let mut root = Root::new(HostNode::element("app"));

    root.render(VNode::component(stopwatch, Props::new())).unwrap();
    let old_host = root.tree().unwrap().effective_host().unwrap().clone();

    root.render(VNode::component(scoreboard, Props::new())).unwrap();

    let new_host = root.tree().unwrap().effective_host().unwrap().clone();
    assert_ne!(new_host, old_host);
    assert!(old_host.parent().is_none());
    assert_eq!(root.container().child_count(), 1);
}

/// Test that a patch swaps listener sets so stale handlers never fire.
#[test]
fn patched_listeners_replace_stale_ones() {
    let mut root = Root::new(HostNode::element("app"));
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let first_clone = first.clone();
    root.render(VNode::element("button").on(
        "press",
        Arc::new(move |_| {
            first_clone.fetch_add(1, Ordering::SeqCst);
        }),
    ))
    .unwrap();

    let button = root.tree().unwrap().host().unwrap().clone();
    button.emit("press", &json!(null));
    assert_eq!(first.load(Ordering::SeqCst), 1);

    let second_clone = second.clone();
    root.render(VNode::element("button").on(
        "press",
        Arc::new(move |payload| {
            if payload.get("count").is_some() {
                second_clone.fetch_add(1, Ordering::SeqCst);
            }
        }),
    ))
    .unwrap();

    button.emit("press", &json!({"count": 2}));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

struct Panel {
    props: Props,
}

impl Component for Panel {
    fn render(&self) -> VNode {
        let title = self.props.get("title").and_then(Value::as_str).unwrap_or("");
        VNode::element("header").child(VNode::text(title))
    }

    fn set_props(&mut self, props: Props) {
        self.props = props;
    }
}

fn panel(props: Props) -> Box<dyn Component> {
    Box::new(Panel { props })
}

/// Test a deep mixed tree: components nested under elements, patched
/// through several levels in one pass.
#[test]
fn nested_components_patch_through_levels() {
    let mut root = Root::new(HostNode::element("app"));

    let page = |count: i64, title: &str| {
        VNode::element("main")
            .child(VNode::component(panel, props_of(json!({ "title": title }))))
            .child(VNode::function(badge, props_of(json!({ "count": count }))))
    };

    root.render(page(1, "inbox")).unwrap();
    let main = root.tree().unwrap().host().unwrap().clone();
    let header = main.child(0).unwrap();
    let badge_span = main.child(1).unwrap();

    root.render(page(2, "archive")).unwrap();

    // Both subtrees were reused, not rebuilt.
    assert_eq!(main.child(0).unwrap(), header);
    assert_eq!(main.child(1).unwrap(), badge_span);
    assert_eq!(header.child(0).unwrap().text(), "archive");
    assert_eq!(badge_span.child(0).unwrap().text(), "2");
}
