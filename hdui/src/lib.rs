//! HD user interface for Uplink.
//!
//! Layouts authored as XML at a fixed design resolution are parsed into UI
//! trees, drawn through a [`Renderer`] that scales them to the display, and
//! driven by the [`HdUiManager`].

pub mod atlas;
pub mod backend;
pub mod bitmap;
pub mod color;
pub mod config;
pub mod error;
pub mod gui;
pub mod platform;

pub use atlas::{AtlasManager, TextureAtlas};
pub use backend::{Renderer, Scaler};
pub use bitmap::Bitmap;
pub use color::Color;
pub use config::UiConfig;
pub use error::{HdUiError, Result};
pub use gui::{HdUiManager, LayoutManager, LayoutParser, ScreenKind, UiAction, UiEvent, UiTree};
