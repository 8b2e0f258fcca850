//! Main menu: sign-in panel, shutdown and options buttons.

use super::{Screen, ScreenBase};
use crate::atlas::AtlasManager;
use crate::backend::{GradientDirection, Renderer};
use crate::color::Color;
use crate::gui::input::UiAction;
use crate::gui::layouts::LayoutManager;

pub const LAYOUT: &str = "MainMenu/MainMenu";
pub const VERSION: &str = "Uplink HD v1.0";

const BACKGROUND_TOP: &str = "0B0B0B";
const BACKGROUND_BOTTOM: &str = "112B3C";

#[derive(Debug)]
pub struct MainMenu {
    base: ScreenBase,
    username: String,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            base: ScreenBase::new(LAYOUT),
            username: String::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, name: &str) {
        self.username = name.to_string();
        self.base.set_text("signIn/txtUsername", name);
    }

    pub fn set_last_sign_in(&mut self, date: &str) {
        self.base
            .set_text("signIn/txtLastSignIn", format!("Last Sign In: {}", date));
    }

    pub fn set_version(&mut self, version: &str) {
        self.base.set_text("signIn/txtVersion", version);
    }

    /// Show `message` in the notice line.
    pub fn show_error(&mut self, message: &str) {
        if self.base.set_text("signIn/txtNotice", message) {
            self.base.set_element_visible("signIn/txtNotice", true);
        }
    }

    pub fn hide_error(&mut self) {
        self.base.set_element_visible("signIn/txtNotice", false);
    }
}

impl Screen for MainMenu {
    fn base(&self) -> &ScreenBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ScreenBase {
        &mut self.base
    }

    fn setup_callbacks(&mut self) {
        self.base.connect("btnShutdown", UiAction::Shutdown);
        self.base.connect("btnOptions", UiAction::ShowOptions);
        self.base.connect("signIn/btnSubmit", UiAction::SubmitPassword);
    }

    fn create(&mut self, layouts: &mut LayoutManager, atlases: &AtlasManager) {
        self.base.create(layouts, atlases);
        self.setup_callbacks();
        self.set_version(VERSION);
    }

    /// Full-screen background gradient, then the layout on top.
    fn draw(&self, renderer: &mut dyn Renderer) {
        if !self.base.is_visible() {
            return;
        }

        let top = Color::from_hex(BACKGROUND_TOP);
        let size = renderer.scaler().base_size();
        renderer.clear(top);
        renderer.draw_gradient(
            0.0,
            0.0,
            size.x,
            size.y,
            top,
            Color::from_hex(BACKGROUND_BOTTOM),
            GradientDirection::Vertical,
        );
        self.base.draw(renderer);
    }
}
