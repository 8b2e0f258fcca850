//! Retained-mode UI built from layout documents.
//!
//! [`LayoutParser`] turns a layout into a [`UiTree`]; screens attach
//! behaviour to shared trees handed out by the [`LayoutManager`]; the
//! [`HdUiManager`] drives them every frame.

mod input;
mod layouts;
mod manager;
mod node;
mod parser;
pub mod screens;
mod tree;

pub use input::{ButtonState, EventResult, KeyCode, Modifiers, MouseButton, UiAction, UiEvent};
pub use layouts::{LayoutManager, SharedLayout};
pub use manager::{HdUiManager, ScreenKind};
pub use node::{
    ArrangeType, ButtonData, CARET_BLINK, Callback, DEFAULT_FONT, DEFAULT_FONT_SIZE,
    DEFAULT_MAX_LENGTH, GradStop, GradientData, ImageBitmap, ImageData, LineData, Node, NodeId,
    NodeKind, RectStyle, RectangleData, ScalingType, TextData, TextFieldData,
};
pub use parser::{DEFAULT_LAYOUT_HEIGHT, DEFAULT_LAYOUT_WIDTH, LayoutParser};
pub use screens::{MainMenu, Screen, ScreenBase, TaskBar, TopBar};
pub use tree::UiTree;
