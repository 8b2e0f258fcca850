//! Input events and their dispatch through a UI tree.
//!
//! Events carry design-space coordinates; the platform layer converts from
//! window pixels before they get here.

use super::node::NodeId;
use super::tree::UiTree;

/// Result of handling a UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; stop propagation.
    Consumed,
    /// Event was not handled; offer it to the next layer.
    Ignored,
}

impl EventResult {
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// UI-level input, mapped from window system events.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    MouseMove {
        x: f32,
        y: f32,
    },
    MouseButton {
        button: MouseButton,
        state: ButtonState,
        x: f32,
        y: f32,
    },
    KeyPress {
        key: KeyCode,
        modifiers: Modifiers,
    },
    TextInput {
        character: char,
    },
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Keys the UI reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Requests raised by screen widgets for the host to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Main menu shutdown button.
    Shutdown,
    /// Main menu options button.
    ShowOptions,
    /// Sign-in form submitted.
    SubmitPassword,
    /// Game speed button, 0 (paused) to 3.
    SetSpeed(u8),
}

impl UiTree {
    /// Interactive nodes that can currently receive pointer input, in draw
    /// order.
    fn hit_candidates(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| {
                self.get(id).is_some_and(|n| n.is_interactive() && n.enabled)
                    && self.is_effectively_visible(id)
            })
            .collect()
    }

    /// Run enter/leave transitions for the cursor position. Returns true if
    /// the cursor is over any interactive node.
    fn update_hover(&mut self, x: f32, y: f32) -> bool {
        let candidates = self.hit_candidates();
        let mut over_any = false;

        for id in self.descendants(self.root()) {
            let Some(hovered) = self
                .get(id)
                .filter(|n| n.is_interactive())
                .map(|n| n.hovered)
            else {
                continue;
            };
            let hit = candidates.contains(&id) && self.contains_point(id, x, y);
            over_any |= hit;

            if hit && !hovered {
                self.on_mouse_enter(id);
            } else if !hit && hovered {
                self.on_mouse_leave(id);
            }
        }
        over_any
    }

    /// Route one event through the tree.
    pub fn handle_event(&mut self, event: &UiEvent) -> EventResult {
        match *event {
            UiEvent::MouseMove { x, y } => {
                if self.update_hover(x, y) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            UiEvent::MouseButton {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                x,
                y,
            } => {
                self.update_hover(x, y);
                let target = self
                    .hit_candidates()
                    .into_iter()
                    .rev()
                    .find(|&id| {
                        self.get(id).is_some_and(|n| n.hovered) && self.contains_point(id, x, y)
                    });

                match target {
                    Some(id) => {
                        self.on_mouse_down(id);
                        EventResult::Consumed
                    }
                    None => {
                        self.clear_focus();
                        EventResult::Ignored
                    }
                }
            }
            UiEvent::MouseButton {
                button: MouseButton::Left,
                state: ButtonState::Released,
                x,
                y,
            } => {
                self.update_hover(x, y);
                let pressed: Vec<NodeId> = self
                    .descendants(self.root())
                    .into_iter()
                    .filter(|&id| self.get(id).is_some_and(|n| n.pressed))
                    .collect();
                for &id in &pressed {
                    self.on_mouse_up(id);
                }
                if pressed.is_empty() {
                    EventResult::Ignored
                } else {
                    EventResult::Consumed
                }
            }
            UiEvent::TextInput { character } => self.send_to_focused(character),
            UiEvent::KeyPress {
                key: KeyCode::Backspace,
                ..
            } => self.send_to_focused('\u{8}'),
            UiEvent::FocusLost => {
                for id in self.descendants(self.root()) {
                    if self.get(id).is_some_and(|n| n.hovered || n.pressed) {
                        self.on_mouse_leave(id);
                    }
                }
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    fn send_to_focused(&mut self, ch: char) -> EventResult {
        match self.focused() {
            Some(id) => {
                self.on_text_input(id, ch);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::node::{ButtonData, Callback, Node, NodeKind, TextFieldData};
    use std::cell::Cell;
    use std::rc::Rc;

    fn press(x: f32, y: f32) -> UiEvent {
        UiEvent::MouseButton {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
            x,
            y,
        }
    }

    fn release(x: f32, y: f32) -> UiEvent {
        UiEvent::MouseButton {
            button: MouseButton::Left,
            state: ButtonState::Released,
            x,
            y,
        }
    }

    fn tree_with_counter() -> (UiTree, NodeId, Rc<Cell<u32>>) {
        let mut tree = UiTree::new("t", 200.0, 200.0);
        let btn = tree
            .add_child(
                tree.root(),
                Node::new("btn", NodeKind::Button(ButtonData::default()))
                    .with_rect(10.0, 10.0, 50.0, 20.0),
            )
            .unwrap();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        tree.set_on_click(btn, Callback::new(move |_| counter.set(counter.get() + 1)));
        (tree, btn, clicks)
    }

    #[test]
    fn test_click_sequence() {
        let (mut tree, btn, clicks) = tree_with_counter();

        assert_eq!(tree.handle_event(&UiEvent::MouseMove { x: 20.0, y: 20.0 }), EventResult::Consumed);
        assert!(tree.get(btn).unwrap().hovered);
        assert_eq!(tree.handle_event(&press(20.0, 20.0)), EventResult::Consumed);
        assert_eq!(tree.handle_event(&release(20.0, 20.0)), EventResult::Consumed);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_drag_off_cancels_click() {
        let (mut tree, btn, clicks) = tree_with_counter();

        tree.handle_event(&press(20.0, 20.0));
        assert!(tree.get(btn).unwrap().pressed);
        tree.handle_event(&UiEvent::MouseMove { x: 150.0, y: 150.0 });
        assert!(!tree.get(btn).unwrap().hovered);
        tree.handle_event(&release(20.0, 20.0));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_hidden_ancestor_blocks_hit() {
        let (mut tree, btn, clicks) = tree_with_counter();
        tree.get_mut(tree.root()).unwrap().visible = false;

        assert_eq!(tree.handle_event(&press(20.0, 20.0)), EventResult::Ignored);
        tree.handle_event(&release(20.0, 20.0));
        assert_eq!(clicks.get(), 0);
        assert!(!tree.get(btn).unwrap().hovered);
    }

    #[test]
    fn test_disabled_node_ignored() {
        let (mut tree, btn, clicks) = tree_with_counter();
        tree.get_mut(btn).unwrap().enabled = false;

        tree.handle_event(&press(20.0, 20.0));
        tree.handle_event(&release(20.0, 20.0));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_topmost_receives_press() {
        let (mut tree, under, _) = tree_with_counter();
        let over = tree
            .add_child(
                tree.root(),
                Node::new("over", NodeKind::Button(ButtonData::default()))
                    .with_rect(10.0, 10.0, 50.0, 20.0),
            )
            .unwrap();

        tree.handle_event(&press(20.0, 20.0));
        assert!(tree.get(over).unwrap().pressed);
        assert!(!tree.get(under).unwrap().pressed);
    }

    #[test]
    fn test_text_routing_and_focus_clear() {
        let mut tree = UiTree::new("t", 200.0, 200.0);
        let field = tree
            .add_child(
                tree.root(),
                Node::new("field", NodeKind::TextField(TextFieldData::default()))
                    .with_rect(0.0, 0.0, 100.0, 20.0),
            )
            .unwrap();

        assert_eq!(
            tree.handle_event(&UiEvent::TextInput { character: 'a' }),
            EventResult::Ignored
        );

        tree.handle_event(&press(5.0, 5.0));
        tree.handle_event(&release(5.0, 5.0));
        assert_eq!(tree.focused(), Some(field));

        tree.handle_event(&UiEvent::TextInput { character: 'h' });
        tree.handle_event(&UiEvent::TextInput { character: 'i' });
        tree.handle_event(&UiEvent::KeyPress {
            key: KeyCode::Backspace,
            modifiers: Modifiers::default(),
        });
        assert_eq!(tree.get(field).unwrap().text_field().unwrap().input, "h");

        tree.handle_event(&press(150.0, 150.0));
        assert_eq!(tree.focused(), None);
    }
}
