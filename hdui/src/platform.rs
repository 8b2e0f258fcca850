//! Window system glue: winit event translation and frame timing.

use crate::backend::Scaler;
use crate::gui::{ButtonState, KeyCode, Modifiers, MouseButton, UiEvent};
use std::time::Instant;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Longest frame step handed to `update`, in seconds.
pub const MAX_FRAME_DT: f32 = 0.25;

/// What the host should do with a window event.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Forward to the UI manager.
    Ui(UiEvent),
    /// Window resized to the given physical size.
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// Turns winit window events into UI events in design space.
///
/// Mouse button events carry no position in winit, so the translator keeps
/// the last cursor position.
#[derive(Debug, Default)]
pub struct EventTranslator {
    cursor: (f32, f32),
    modifiers: Modifiers,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position in design space.
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent, scaler: &Scaler) -> Vec<PlatformEvent> {
        match event {
            WindowEvent::CloseRequested => vec![PlatformEvent::CloseRequested],
            WindowEvent::Resized(size) => vec![PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            }],
            WindowEvent::Focused(true) => vec![PlatformEvent::Ui(UiEvent::FocusGained)],
            WindowEvent::Focused(false) => vec![PlatformEvent::Ui(UiEvent::FocusLost)],
            WindowEvent::CursorMoved { position, .. } => {
                vec![PlatformEvent::Ui(self.cursor_moved(
                    position.x as f32,
                    position.y as f32,
                    scaler,
                ))]
            }
            WindowEvent::MouseInput { button, state, .. } => self
                .mouse_input(*button, *state)
                .map(PlatformEvent::Ui)
                .into_iter()
                .collect(),
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                };
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => self
                .key_input(&event.logical_key, event.text.as_deref(), event.state)
                .into_iter()
                .map(PlatformEvent::Ui)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Record a cursor position given in window pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32, scaler: &Scaler) -> UiEvent {
        let design = scaler.to_design(x, y);
        self.cursor = (design.x, design.y);
        UiEvent::MouseMove {
            x: design.x,
            y: design.y,
        }
    }

    pub fn mouse_input(
        &self,
        button: winit::event::MouseButton,
        state: ElementState,
    ) -> Option<UiEvent> {
        let button = match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        let state = match state {
            ElementState::Pressed => ButtonState::Pressed,
            ElementState::Released => ButtonState::Released,
        };
        Some(UiEvent::MouseButton {
            button,
            state,
            x: self.cursor.0,
            y: self.cursor.1,
        })
    }

    /// Key presses become a `KeyPress` for keys the UI knows, plus one
    /// `TextInput` per printable character of the produced text.
    pub fn key_input(&self, key: &Key, text: Option<&str>, state: ElementState) -> Vec<UiEvent> {
        if state != ElementState::Pressed {
            return Vec::new();
        }

        let mut events = Vec::new();
        let code = match key {
            Key::Named(NamedKey::Tab) => Some(KeyCode::Tab),
            Key::Named(NamedKey::Enter) => Some(KeyCode::Enter),
            Key::Named(NamedKey::Escape) => Some(KeyCode::Escape),
            Key::Named(NamedKey::Backspace) => Some(KeyCode::Backspace),
            Key::Named(NamedKey::Delete) => Some(KeyCode::Delete),
            _ => None,
        };
        if let Some(key) = code {
            events.push(UiEvent::KeyPress {
                key,
                modifiers: self.modifiers,
            });
        }

        if let Some(text) = text {
            events.extend(
                text.chars()
                    .filter(|c| !c.is_control())
                    .map(|character| UiEvent::TextInput { character }),
            );
        }
        events
    }
}

/// Measures the time between frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick, clamped to [`MAX_FRAME_DT`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(MAX_FRAME_DT)
    }
}
