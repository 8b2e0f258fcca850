//! The HD UI manager: owns the backend, caches and screens.
//!
//! Hosts create one manager, call [`HdUiManager::initialize`] once a window
//! exists, then drive `handle_event`, `update` and `draw` every frame.

use super::input::{EventResult, UiAction, UiEvent};
use super::layouts::LayoutManager;
use super::screens::{MainMenu, Screen, TaskBar, TopBar};
use crate::atlas::AtlasManager;
use crate::backend::{Renderer, Scaler};
use crate::config::UiConfig;
use crate::error::Result;

/// Screens the manager knows about, in draw order (bottom first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    MainMenu,
    TopBar,
    TaskBar,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 3] = [ScreenKind::MainMenu, ScreenKind::TopBar, ScreenKind::TaskBar];
}

pub struct HdUiManager<R: Renderer> {
    config: UiConfig,
    renderer: R,
    layouts: LayoutManager,
    atlases: AtlasManager,
    main_menu: Option<MainMenu>,
    top_bar: Option<TopBar>,
    task_bar: Option<TaskBar>,
    active: bool,
}

impl<R: Renderer> std::fmt::Debug for HdUiManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdUiManager")
            .field("config", &self.config)
            .field("active", &self.active)
            .field("cached_layouts", &self.layouts.cached_count())
            .field("atlases", &self.atlases.atlas_count())
            .finish()
    }
}

impl<R: Renderer> HdUiManager<R> {
    pub fn new(config: UiConfig, renderer: R) -> Self {
        Self {
            config,
            renderer,
            layouts: LayoutManager::new(),
            atlases: AtlasManager::new(),
            main_menu: None,
            top_bar: None,
            task_bar: None,
            active: false,
        }
    }

    /// Bring up the backend, load the default atlas and construct the
    /// screens. Screens start hidden; call [`show`](Self::show).
    ///
    /// Calling this again while active does nothing.
    pub fn initialize(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<()> {
        if self.active {
            return Ok(());
        }

        self.renderer.init(width, height, fullscreen)?;

        self.layouts.set_layout_directory(&self.config.layout_dir);
        self.layouts.set_asset_directory(&self.config.asset_dir);

        self.atlases.set_base_path(&self.config.atlas_dir);
        if let Err(e) = self.atlases.load_atlas(&self.config.default_atlas) {
            log::warn!(
                "Default atlas '{}' not loaded, images fall back to files: {}",
                self.config.default_atlas,
                e
            );
        }

        self.renderer
            .set_base_resolution(self.config.base_width, self.config.base_height);

        self.main_menu = Some(MainMenu::new());
        self.top_bar = Some(TopBar::new());
        self.task_bar = Some(TaskBar::new());

        self.active = true;
        log::info!("HD UI initialized at {}x{}", width, height);
        Ok(())
    }

    /// Release screens, caches and the backend. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }

        self.main_menu = None;
        self.top_bar = None;
        self.task_bar = None;

        self.layouts.clear_cache();
        self.atlases.clear_all();
        self.renderer.shutdown();

        self.active = false;
        log::info!("HD UI shut down");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn screen(&self, kind: ScreenKind) -> Option<&dyn Screen> {
        match kind {
            ScreenKind::MainMenu => self.main_menu.as_ref().map(|s| s as &dyn Screen),
            ScreenKind::TopBar => self.top_bar.as_ref().map(|s| s as &dyn Screen),
            ScreenKind::TaskBar => self.task_bar.as_ref().map(|s| s as &dyn Screen),
        }
    }

    fn screen_mut(&mut self, kind: ScreenKind) -> Option<&mut dyn Screen> {
        match kind {
            ScreenKind::MainMenu => self.main_menu.as_mut().map(|s| s as &mut dyn Screen),
            ScreenKind::TopBar => self.top_bar.as_mut().map(|s| s as &mut dyn Screen),
            ScreenKind::TaskBar => self.task_bar.as_mut().map(|s| s as &mut dyn Screen),
        }
    }

    /// Make a screen visible, loading its layout the first time.
    pub fn show(&mut self, kind: ScreenKind) {
        let screen: Option<&mut dyn Screen> = match kind {
            ScreenKind::MainMenu => self.main_menu.as_mut().map(|s| s as &mut dyn Screen),
            ScreenKind::TopBar => self.top_bar.as_mut().map(|s| s as &mut dyn Screen),
            ScreenKind::TaskBar => self.task_bar.as_mut().map(|s| s as &mut dyn Screen),
        };
        let Some(screen) = screen else {
            log::warn!("Cannot show {:?} before initialize", kind);
            return;
        };

        if screen.base().is_created() {
            screen.set_visible(true);
        } else {
            screen.create(&mut self.layouts, &self.atlases);
        }
    }

    pub fn hide(&mut self, kind: ScreenKind) {
        if let Some(screen) = self.screen_mut(kind) {
            screen.set_visible(false);
        }
    }

    pub fn is_visible(&self, kind: ScreenKind) -> bool {
        self.screen(kind).is_some_and(|s| s.is_visible())
    }

    pub fn main_menu(&mut self) -> Option<&mut MainMenu> {
        self.main_menu.as_mut()
    }

    pub fn top_bar(&mut self) -> Option<&mut TopBar> {
        self.top_bar.as_mut()
    }

    pub fn task_bar(&mut self) -> Option<&mut TaskBar> {
        self.task_bar.as_mut()
    }

    /// Advance visible screens and collect the actions they raised.
    pub fn update(&mut self, dt: f32) -> Vec<UiAction> {
        let mut actions = Vec::new();
        for kind in ScreenKind::ALL {
            if let Some(screen) = self.screen_mut(kind)
                && screen.is_visible()
            {
                actions.extend(screen.update(dt));
            }
        }
        actions
    }

    /// Draw one frame of every visible screen.
    pub fn draw(&mut self) {
        if !self.active {
            return;
        }

        let renderer = &mut self.renderer;
        let screens: [Option<&dyn Screen>; 3] = [
            self.main_menu.as_ref().map(|s| s as &dyn Screen),
            self.top_bar.as_ref().map(|s| s as &dyn Screen),
            self.task_bar.as_ref().map(|s| s as &dyn Screen),
        ];

        renderer.begin_frame();
        for screen in screens.into_iter().flatten() {
            if screen.is_visible() {
                screen.draw(renderer);
            }
        }
        renderer.end_frame();
    }

    /// Offer an event to visible screens, topmost first, until one consumes
    /// it. Cursor motion and focus loss reach every visible screen so each
    /// can run its leave transitions.
    pub fn handle_event(&mut self, event: &UiEvent) -> EventResult {
        if matches!(event, UiEvent::MouseMove { .. } | UiEvent::FocusLost) {
            let mut result = EventResult::Ignored;
            for kind in ScreenKind::ALL.into_iter().rev() {
                if let Some(screen) = self.screen_mut(kind)
                    && screen.is_visible()
                    && screen.handle_event(event).is_consumed()
                {
                    result = EventResult::Consumed;
                }
            }
            return result;
        }

        for kind in ScreenKind::ALL.into_iter().rev() {
            if let Some(screen) = self.screen_mut(kind)
                && screen.is_visible()
                && screen.handle_event(event).is_consumed()
            {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    /// Track a new display size. Layouts keep their design coordinates.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.set_display_size(width, height);
        log::debug!("HD UI resized to {}x{}", width, height);
    }

    pub fn scaler(&self) -> Scaler {
        self.renderer.scaler()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn layouts(&self) -> &LayoutManager {
        &self.layouts
    }

    pub fn atlases(&self) -> &AtlasManager {
        &self.atlases
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }
}

impl<R: Renderer> Drop for HdUiManager<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
