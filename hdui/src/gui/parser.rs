//! Parser for HD layout documents.
//!
//! A layout is an XML document with a `<layout>` root whose child elements
//! map one-to-one onto UI nodes:
//!
//! ```xml
//! <layout name="MainMenu" w="1920" h="1080">
//!     <ButtonStandard name="btnShutdown" x="40" y="1000" w="64" h="64">
//!         <Image name="gfxStandard" file="shutdown.png"/>
//!         <Image name="gfxHover" file="shutdown_hover.png"/>
//!     </ButtonStandard>
//! </layout>
//! ```

use super::node::{
    ArrangeType, ButtonData, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_MAX_LENGTH, GradStop,
    GradientData, ImageBitmap, ImageData, LineData, Node, NodeId, NodeKind, RectStyle,
    RectangleData, ScalingType, TextData, TextFieldData,
};
use super::tree::UiTree;
use crate::atlas::AtlasManager;
use crate::backend::{GradientDirection, TextAlign};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::{HdUiError, Result};
use roxmltree::Node as XmlNode;
use std::path::{Path, PathBuf};

pub const DEFAULT_LAYOUT_WIDTH: i64 = 1920;
pub const DEFAULT_LAYOUT_HEIGHT: i64 = 1080;

/// Builds [`UiTree`]s from layout documents.
///
/// Images resolve against the atlases first, then against the asset base
/// directory. Without an asset base, images are left unloaded.
#[derive(Debug, Default, Clone)]
pub struct LayoutParser<'a> {
    atlases: Option<&'a AtlasManager>,
    asset_base: Option<PathBuf>,
}

impl<'a> LayoutParser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atlases(mut self, atlases: &'a AtlasManager) -> Self {
        self.atlases = Some(atlases);
        self
    }

    pub fn with_asset_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_base = Some(path.into());
        self
    }

    /// Read and parse a layout file.
    pub fn load_layout(&self, path: &Path) -> Result<UiTree> {
        let text = std::fs::read_to_string(path).map_err(|source| HdUiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = self.parse_document(&text, path)?;
        log::info!("Loaded layout {}", path.display());
        Ok(tree)
    }

    /// Parse a layout from a string.
    pub fn parse_layout(&self, xml: &str) -> Result<UiTree> {
        self.parse_document(xml, Path::new("<memory>"))
    }

    fn parse_document(&self, xml: &str, origin: &Path) -> Result<UiTree> {
        let doc = roxmltree::Document::parse(xml).map_err(|source| HdUiError::Xml {
            path: origin.to_path_buf(),
            source,
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != "layout" {
            return Err(HdUiError::UnexpectedRoot {
                expected: "layout",
                found: root.tag_name().name().to_string(),
            });
        }

        let width = attr_int(root, "w", DEFAULT_LAYOUT_WIDTH);
        let height = attr_int(root, "h", DEFAULT_LAYOUT_HEIGHT);
        let name = attr_str(root, "name", "layout");

        let mut tree = UiTree::new(name, width as f32, height as f32);
        let tree_root = tree.root();
        for child in root.children().filter(XmlNode::is_element) {
            self.parse_element(&mut tree, tree_root, child);
        }
        tree.bind_state_graphics();

        log::debug!(
            "Parsed layout '{}' ({}x{}, {} nodes)",
            name,
            width,
            height,
            tree.len()
        );
        Ok(tree)
    }

    fn parse_element(&self, tree: &mut UiTree, parent: NodeId, elem: XmlNode) {
        let tag = elem.tag_name().name();
        let kind = match tag {
            "Container" => NodeKind::Container,
            "Gradient" => NodeKind::Gradient(parse_gradient(elem)),
            "Rectangle" => NodeKind::Rectangle(parse_rectangle(elem)),
            "Line" => NodeKind::Line(parse_line(elem)),
            "TextPoint" => NodeKind::TextPoint(parse_text(elem)),
            "Image" => NodeKind::Image(self.parse_image(elem)),
            "ButtonStandard" => NodeKind::Button(ButtonData::default()),
            "ButtonTextField" => NodeKind::TextField(parse_text_field(elem)),
            // Consumed by the enclosing Gradient.
            "GradStop" => return,
            _ => {
                log::warn!("Unknown layout element <{}>, treating as Container", tag);
                NodeKind::Container
            }
        };

        let mut node = Node::new(attr_str(elem, "name", ""), kind);
        apply_common(&mut node, elem);

        let Some(id) = tree.add_child(parent, node) else {
            return;
        };
        for child in elem.children().filter(XmlNode::is_element) {
            self.parse_element(tree, id, child);
        }
    }

    fn parse_image(&self, elem: XmlNode) -> ImageData {
        let file = attr_str(elem, "file", "").to_string();
        let bitmap = match &self.asset_base {
            Some(base) if !file.is_empty() => self.resolve_image(base, &file),
            _ => None,
        };
        ImageData { file, bitmap }
    }

    fn resolve_image(&self, base: &Path, file: &str) -> Option<ImageBitmap> {
        if let Some(atlases) = self.atlases
            && let Some(bitmap) = atlases.get_texture(file)
        {
            return Some(ImageBitmap::Atlas(bitmap.clone()));
        }

        match Bitmap::load(&base.join(file)) {
            Ok(bitmap) => Some(ImageBitmap::Owned(bitmap)),
            Err(e) => {
                log::warn!("Image '{}' unavailable: {}", file, e);
                None
            }
        }
    }
}

fn attr_str<'x>(elem: XmlNode<'x, '_>, name: &str, default: &'x str) -> &'x str {
    elem.attribute(name).unwrap_or(default)
}

fn attr_f32(elem: XmlNode, name: &str, default: f32) -> f32 {
    elem.attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn attr_int(elem: XmlNode, name: &str, default: i64) -> i64 {
    elem.attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn attr_color(elem: XmlNode, name: &str, default: &str) -> Color {
    Color::from_hex(attr_str(elem, name, default))
}

fn apply_common(node: &mut Node, elem: XmlNode) {
    node.x = attr_f32(elem, "x", 0.0);
    node.y = attr_f32(elem, "y", 0.0);
    node.w = attr_f32(elem, "w", 0.0);
    node.h = attr_f32(elem, "h", 0.0);
    node.alpha = attr_f32(elem, "alpha", 1.0);
    node.scaling = ScalingType::from_attr(attr_str(elem, "scalingType", "scaleNormal"));
    node.arrange = ArrangeType::from_attr(attr_str(elem, "arrangeType", "arrangeFree"));
    node.arrange_padding = attr_f32(elem, "arrangePadding", 0.0);
}

fn parse_gradient(elem: XmlNode) -> GradientData {
    let direction = match attr_str(elem, "subtype", "gradVertical") {
        "gradHorizontal" => GradientDirection::Horizontal,
        _ => GradientDirection::Vertical,
    };
    let stops = elem
        .children()
        .filter(|c| c.has_tag_name("GradStop"))
        .map(|stop| GradStop {
            location: attr_f32(stop, "location", 0.0),
            color: attr_color(stop, "fillColor", "000000"),
        })
        .collect();
    GradientData { stops, direction }
}

fn parse_rectangle(elem: XmlNode) -> RectangleData {
    RectangleData {
        style: RectStyle::from_attr(attr_str(elem, "subtype", "filled")),
        fill: attr_color(elem, "fillColor", "FFFFFF"),
        fill_alpha: attr_f32(elem, "fillA", 1.0),
        stroke: attr_color(elem, "strokeColor", "FFFFFF"),
        stroke_width: attr_f32(elem, "strokeW", 1.0),
    }
}

fn parse_line(elem: XmlNode) -> LineData {
    LineData {
        x1: attr_f32(elem, "x1", 0.0),
        y1: attr_f32(elem, "y1", 0.0),
        x2: attr_f32(elem, "x2", 0.0),
        y2: attr_f32(elem, "y2", 0.0),
        stroke: attr_color(elem, "strokeColor", "FFFFFF"),
        stroke_width: attr_f32(elem, "strokeW", 1.0),
    }
}

fn parse_text(elem: XmlNode) -> TextData {
    TextData {
        text: attr_str(elem, "text", "").to_string(),
        font: attr_str(elem, "font", DEFAULT_FONT).to_string(),
        size: attr_int(elem, "size", DEFAULT_FONT_SIZE as i64).max(0) as u32,
        fill: attr_color(elem, "fillColor", "FFFFFF"),
        align: TextAlign::from_attr(attr_str(elem, "align", "left")),
    }
}

fn parse_text_field(elem: XmlNode) -> TextFieldData {
    TextFieldData {
        is_password: matches!(attr_str(elem, "isPassword", "false"), "true" | "1"),
        max_length: attr_int(elem, "maxLength", DEFAULT_MAX_LENGTH as i64).max(0) as usize,
        ..TextFieldData::default()
    }
}
