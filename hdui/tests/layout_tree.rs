//! Parsing and tree behaviour through the public API.

use glam::Vec2;
use hdui::gui::{ButtonState, Callback, MouseButton, NodeKind};
use hdui::{Color, HdUiError, LayoutParser, UiEvent};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn absolute_position_sums_ancestors() {
    let tree = LayoutParser::new()
        .parse_layout(
            r#"<layout>
                <Container name="child" x="100" y="50">
                    <Container name="grandchild" x="10" y="10"/>
                </Container>
            </layout>"#,
        )
        .unwrap();

    let grandchild = tree.find("child/grandchild").unwrap();
    assert_eq!(tree.absolute_position(grandchild), Vec2::new(110.0, 60.0));
}

#[test]
fn wrong_root_yields_no_tree() {
    let result = LayoutParser::new().parse_layout(r#"<Container name="x"/>"#);
    assert!(matches!(result, Err(HdUiError::UnexpectedRoot { .. })));
}

#[test]
fn container_and_rectangle_form_depth_two_tree() {
    let tree = LayoutParser::new()
        .parse_layout(
            r#"<layout name="t" w="800" h="600">
                <Container name="panel"><Rectangle name="box"/></Container>
            </layout>"#,
        )
        .unwrap();

    assert_eq!(tree.len(), 3);
    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 1);
    let panel = root_children[0];
    assert_eq!(tree.get(panel).unwrap().name, "panel");

    let panel_children = tree.children(panel);
    assert_eq!(panel_children.len(), 1);
    let rect = tree.get(panel_children[0]).unwrap();
    assert_eq!(rect.name, "box");
    assert!(matches!(rect.kind, NodeKind::Rectangle(_)));
    assert!(tree.children(panel_children[0]).is_empty());
}

#[test]
fn unknown_tag_keeps_sibling_count() {
    let tree = LayoutParser::new()
        .parse_layout(
            r#"<layout>
                <Container name="a"/>
                <Sparkle name="b"/>
                <TextPoint name="c" text="c"/>
            </layout>"#,
        )
        .unwrap();

    let names: Vec<&str> = tree
        .children(tree.root())
        .iter()
        .map(|&id| tree.get(id).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn recursive_lookup() {
    let full = LayoutParser::new()
        .parse_layout(r#"<layout><Container name="a"><Container name="b"><Container name="c"/></Container></Container></layout>"#)
        .unwrap();
    let c = full.find("a/b/c").unwrap();
    assert_eq!(full.get(c).unwrap().name, "c");

    let missing_b = LayoutParser::new()
        .parse_layout(r#"<layout><Container name="a"><Container name="c"/></Container></layout>"#)
        .unwrap();
    assert!(missing_b.find("a/b/c").is_none());
}

#[test]
fn button_click_cancelled_by_leaving() {
    let mut tree = LayoutParser::new()
        .parse_layout(r#"<layout><ButtonStandard name="btn" x="0" y="0" w="100" h="50"/></layout>"#)
        .unwrap();
    let btn = tree.find("btn").unwrap();

    let clicks = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&clicks);
    tree.set_on_click(btn, Callback::new(move |_| counter.set(counter.get() + 1)));

    tree.on_mouse_enter(btn);
    tree.on_mouse_down(btn);
    tree.on_mouse_leave(btn);
    tree.on_mouse_up(btn);
    assert_eq!(clicks.get(), 0);

    tree.on_mouse_enter(btn);
    tree.on_mouse_down(btn);
    tree.on_mouse_up(btn);
    assert_eq!(clicks.get(), 1);

    // Same through event dispatch
    for state in [ButtonState::Pressed, ButtonState::Released] {
        tree.handle_event(&UiEvent::MouseButton {
            button: MouseButton::Left,
            state,
            x: 50.0,
            y: 25.0,
        });
    }
    assert_eq!(clicks.get(), 2);
}

#[test]
fn hex_colour_parsing() {
    let c = Color::from_hex("#FF8800");
    assert_eq!(c.r, 1.0);
    assert!((c.g - 0.533).abs() < 1e-3);
    assert_eq!(c.b, 0.0);
    assert_eq!(c.a, 1.0);

    assert_eq!(Color::from_hex("#12"), Color::rgba(0.0, 0.0, 0.0, 1.0));
}
