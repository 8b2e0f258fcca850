//! Screens: a layout plus the behaviour wired onto it.
//!
//! Each screen loads its layout through the [`LayoutManager`], connects
//! button callbacks to [`UiAction`]s and exposes typed setters for the text
//! it displays. Setters quietly do nothing when the layout lacks an element,
//! so a partial or missing layout never takes the host down.

mod main_menu;
mod taskbar;
mod topbar;

pub use main_menu::MainMenu;
pub use taskbar::TaskBar;
pub use topbar::TopBar;

use super::input::{EventResult, UiAction, UiEvent};
use super::layouts::{LayoutManager, SharedLayout};
use super::node::{Callback, NodeId};
use super::tree::UiTree;
use crate::atlas::AtlasManager;
use crate::backend::Renderer;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};

/// State common to every screen.
#[derive(Debug)]
pub struct ScreenBase {
    layout_name: String,
    layout: Option<SharedLayout>,
    visible: bool,
    actions_tx: Sender<UiAction>,
    actions_rx: Receiver<UiAction>,
}

impl ScreenBase {
    pub fn new(layout_name: impl Into<String>) -> Self {
        let (actions_tx, actions_rx) = channel();
        Self {
            layout_name: layout_name.into(),
            layout: None,
            visible: false,
            actions_tx,
            actions_rx,
        }
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    pub fn layout(&self) -> Option<&SharedLayout> {
        self.layout.as_ref()
    }

    pub fn is_created(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Load the layout and make the screen visible. A missing layout is
    /// logged and leaves the screen visible but empty.
    pub fn create(&mut self, layouts: &mut LayoutManager, atlases: &AtlasManager) {
        if !self.layout_name.is_empty() {
            self.layout = layouts.get_layout(&self.layout_name, atlases);
            match &self.layout {
                Some(_) => log::debug!("Screen layout '{}' attached", self.layout_name),
                None => log::warn!("Screen layout '{}' unavailable", self.layout_name),
            }
        }
        self.visible = true;
    }

    pub fn remove(&mut self) {
        self.layout = None;
        self.visible = false;
    }

    /// Advance the layout and collect actions raised since the last update.
    pub fn update(&mut self, dt: f32) -> Vec<UiAction> {
        if let Some(layout) = &self.layout {
            layout.borrow_mut().update(dt);
        }
        self.actions_rx.try_iter().collect()
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        if self.visible
            && let Some(layout) = &self.layout
        {
            layout.borrow().draw(renderer);
        }
    }

    pub fn handle_event(&mut self, event: &UiEvent) -> EventResult {
        match &self.layout {
            Some(layout) if self.visible => layout.borrow_mut().handle_event(event),
            _ => EventResult::Ignored,
        }
    }

    pub fn find_element(&self, path: &str) -> Option<NodeId> {
        self.layout.as_ref()?.borrow().find(path)
    }

    /// Run `f` against the layout tree, if one is attached.
    pub fn with_tree<R>(&self, f: impl FnOnce(&mut UiTree) -> R) -> Option<R> {
        let layout = self.layout.as_ref()?;
        let mut tree = layout.borrow_mut();
        Some(f(&mut tree))
    }

    /// Set the text of the `TextPoint` at `path`.
    pub fn set_text(&self, path: &str, text: impl Into<String>) -> bool {
        self.with_tree(|tree| match tree.find(path) {
            Some(id) => tree.set_text(id, text),
            None => false,
        })
        .unwrap_or(false)
    }

    pub fn set_element_visible(&self, path: &str, visible: bool) -> bool {
        self.with_tree(|tree| match tree.find(path) {
            Some(id) => {
                tree.set_visible(id, visible);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    /// Make clicks on the element at `path` raise `action`.
    pub fn connect(&self, path: &str, action: UiAction) -> bool {
        let tx = self.actions_tx.clone();
        let connected = self
            .with_tree(|tree| match tree.find(path) {
                Some(id) => {
                    tree.set_on_click(
                        id,
                        Callback::new(move |_| {
                            // The receiver lives as long as the screen.
                            let _ = tx.send(action);
                        }),
                    );
                    true
                }
                None => false,
            })
            .unwrap_or(false);

        if !connected {
            log::debug!("'{}' has no element '{}' to connect", self.layout_name, path);
        }
        connected
    }

    /// True when both screens draw the same tree instance.
    pub fn shares_layout_with(&self, other: &ScreenBase) -> bool {
        match (&self.layout, &other.layout) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A screen drawn by the UI manager.
pub trait Screen {
    fn base(&self) -> &ScreenBase;

    fn base_mut(&mut self) -> &mut ScreenBase;

    /// Wire button callbacks once the layout is attached.
    fn setup_callbacks(&mut self) {}

    fn create(&mut self, layouts: &mut LayoutManager, atlases: &AtlasManager) {
        self.base_mut().create(layouts, atlases);
        self.setup_callbacks();
    }

    fn remove(&mut self) {
        self.base_mut().remove();
    }

    fn update(&mut self, dt: f32) -> Vec<UiAction> {
        self.base_mut().update(dt)
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        self.base().draw(renderer);
    }

    fn handle_event(&mut self, event: &UiEvent) -> EventResult {
        self.base_mut().handle_event(event)
    }

    fn find_element(&self, path: &str) -> Option<NodeId> {
        self.base().find_element(path)
    }

    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::layout_dir;
    use super::*;
    use crate::gui::input::{ButtonState, MouseButton};

    struct Plain(ScreenBase);

    impl Screen for Plain {
        fn base(&self) -> &ScreenBase {
            &self.0
        }
        fn base_mut(&mut self) -> &mut ScreenBase {
            &mut self.0
        }
    }

    #[test]
    fn test_missing_layout_degrades() {
        let (_dir, mut layouts, atlases) = layout_dir(&[]);
        let mut screen = Plain(ScreenBase::new("Nope/Missing"));
        screen.create(&mut layouts, &atlases);

        assert!(screen.is_visible());
        assert!(screen.find_element("anything").is_none());
        assert!(!screen.base().set_text("txt", "x"));
        assert!(!screen.base().connect("btn", UiAction::Shutdown));
        assert!(screen.update(0.1).is_empty());
    }

    #[test]
    fn test_connected_click_yields_action() {
        let (_dir, mut layouts, atlases) = layout_dir(&[(
            "menu.xml",
            r#"<layout><ButtonStandard name="btn" w="10" h="10"/></layout>"#,
        )]);
        let mut screen = Plain(ScreenBase::new("menu"));
        screen.create(&mut layouts, &atlases);
        assert!(screen.base().connect("btn", UiAction::ShowOptions));

        for state in [ButtonState::Pressed, ButtonState::Released] {
            screen.handle_event(&UiEvent::MouseButton {
                button: MouseButton::Left,
                state,
                x: 5.0,
                y: 5.0,
            });
        }
        assert_eq!(screen.update(0.0), vec![UiAction::ShowOptions]);
        assert!(screen.update(0.0).is_empty());
    }

    #[test]
    fn test_hidden_screen_ignores_input() {
        let (_dir, mut layouts, atlases) = layout_dir(&[(
            "menu.xml",
            r#"<layout><ButtonStandard name="btn" w="10" h="10"/></layout>"#,
        )]);
        let mut screen = Plain(ScreenBase::new("menu"));
        screen.create(&mut layouts, &atlases);
        screen.set_visible(false);

        let result = screen.handle_event(&UiEvent::MouseMove { x: 5.0, y: 5.0 });
        assert_eq!(result, EventResult::Ignored);
    }
}
