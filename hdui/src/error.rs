//! Error types for the HD UI crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading layouts, atlases, bitmaps and configuration.
///
/// None of these are fatal to the host: callers log them and treat the
/// affected visual as absent.
#[derive(Error, Debug)]
pub enum HdUiError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("Expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("Failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Font '{name}' could not be loaded")]
    Font { name: String },
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Renderer backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, HdUiError>;
