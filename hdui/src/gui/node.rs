//! UI node data: identity, geometry, flags and kind-specific payloads.

use crate::backend::{GradientDirection, TextAlign};
use crate::bitmap::Bitmap;
use crate::color::Color;

/// Generational index of a node within a [`UiTree`](super::UiTree).
///
/// The generation counter rejects ids whose slot has since been freed and
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub index: u32,
    pub generation: u32,
}

impl NodeId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// How a node would scale with the display. Stored, not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalingType {
    #[default]
    Normal,
    ByHeight,
    ByWidth,
}

impl ScalingType {
    pub fn from_attr(s: &str) -> Self {
        match s {
            "scaleByHeight" => ScalingType::ByHeight,
            "scaleByWidth" => ScalingType::ByWidth,
            _ => ScalingType::Normal,
        }
    }
}

/// How a container would arrange its children. Stored, not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrangeType {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

impl ArrangeType {
    pub fn from_attr(s: &str) -> Self {
        match s {
            "arrangeHorizontal" => ArrangeType::Horizontal,
            "arrangeVertical" => ArrangeType::Vertical,
            _ => ArrangeType::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RectStyle {
    #[default]
    Filled,
    Stroked,
    StrokedFill,
}

impl RectStyle {
    pub fn from_attr(s: &str) -> Self {
        match s {
            "stroked" => RectStyle::Stroked,
            "strokedFill" => RectStyle::StrokedFill,
            _ => RectStyle::Filled,
        }
    }

    pub fn fills(self) -> bool {
        matches!(self, RectStyle::Filled | RectStyle::StrokedFill)
    }

    pub fn strokes(self) -> bool {
        matches!(self, RectStyle::Stroked | RectStyle::StrokedFill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradStop {
    pub location: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Default)]
pub struct GradientData {
    pub stops: Vec<GradStop>,
    pub direction: GradientDirection,
}

#[derive(Debug, Clone)]
pub struct RectangleData {
    pub style: RectStyle,
    pub fill: Color,
    pub fill_alpha: f32,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Default for RectangleData {
    fn default() -> Self {
        Self {
            style: RectStyle::Filled,
            fill: Color::WHITE,
            fill_alpha: 1.0,
            stroke: Color::WHITE,
            stroke_width: 1.0,
        }
    }
}

/// Line endpoints are relative to the node's absolute origin.
#[derive(Debug, Clone)]
pub struct LineData {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Default for LineData {
    fn default() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            stroke: Color::WHITE,
            stroke_width: 1.0,
        }
    }
}

pub const DEFAULT_FONT: &str = "AeroMaticsRegular";
pub const DEFAULT_FONT_SIZE: u32 = 18;

#[derive(Debug, Clone)]
pub struct TextData {
    pub text: String,
    pub font: String,
    pub size: u32,
    pub fill: Color,
    pub align: TextAlign,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: DEFAULT_FONT.to_string(),
            size: DEFAULT_FONT_SIZE,
            fill: Color::WHITE,
            align: TextAlign::Left,
        }
    }
}

/// Where an image's pixels came from.
#[derive(Debug, Clone)]
pub enum ImageBitmap {
    /// View into an atlas owned by the `AtlasManager`.
    Atlas(Bitmap),
    /// Standalone file loaded for this node.
    Owned(Bitmap),
}

impl ImageBitmap {
    pub fn bitmap(&self) -> &Bitmap {
        match self {
            ImageBitmap::Atlas(b) | ImageBitmap::Owned(b) => b,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageData {
    pub file: String,
    pub bitmap: Option<ImageBitmap>,
}

impl ImageData {
    pub fn owns_bitmap(&self) -> bool {
        matches!(self.bitmap, Some(ImageBitmap::Owned(_)))
    }
}

/// State graphics of a button, resolved by the tree's bind step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonData {
    pub standard: Option<NodeId>,
    pub hover: Option<NodeId>,
    pub click: Option<NodeId>,
}

pub const DEFAULT_MAX_LENGTH: usize = 256;

/// Seconds per caret blink half-cycle.
pub const CARET_BLINK: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct TextFieldData {
    pub button: ButtonData,
    pub input: String,
    pub is_password: bool,
    pub max_length: usize,
    pub has_focus: bool,
    pub caption: Option<NodeId>,
    /// Caption text as authored, shown while the field is empty and unfocused.
    pub placeholder: String,
    pub caret_phase: f32,
}

impl Default for TextFieldData {
    fn default() -> Self {
        Self {
            button: ButtonData::default(),
            input: String::new(),
            is_password: false,
            max_length: DEFAULT_MAX_LENGTH,
            has_focus: false,
            caption: None,
            placeholder: String::new(),
            caret_phase: 0.0,
        }
    }
}

impl TextFieldData {
    pub fn caret_visible(&self) -> bool {
        self.caret_phase < CARET_BLINK
    }

    /// Text the caption should currently show.
    pub fn display_text(&self) -> String {
        if self.input.is_empty() && !self.has_focus {
            return self.placeholder.clone();
        }

        let mut text = if self.is_password {
            "*".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        };
        if self.has_focus && self.caret_visible() {
            text.push('_');
        }
        text
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Container,
    Gradient(GradientData),
    Rectangle(RectangleData),
    Line(LineData),
    TextPoint(TextData),
    Image(ImageData),
    Button(ButtonData),
    TextField(TextFieldData),
}

impl NodeKind {
    /// Layout tag this kind is parsed from.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Container => "Container",
            NodeKind::Gradient(_) => "Gradient",
            NodeKind::Rectangle(_) => "Rectangle",
            NodeKind::Line(_) => "Line",
            NodeKind::TextPoint(_) => "TextPoint",
            NodeKind::Image(_) => "Image",
            NodeKind::Button(_) => "ButtonStandard",
            NodeKind::TextField(_) => "ButtonTextField",
        }
    }

    pub fn is_button(&self) -> bool {
        matches!(self, NodeKind::Button(_) | NodeKind::TextField(_))
    }

    pub fn button(&self) -> Option<&ButtonData> {
        match self {
            NodeKind::Button(b) => Some(b),
            NodeKind::TextField(f) => Some(&f.button),
            _ => None,
        }
    }
}

/// Click or hover handler. Receives the id of the node it fired on.
pub struct Callback(Box<dyn FnMut(NodeId)>);

impl Callback {
    pub fn new(f: impl FnMut(NodeId) + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(&mut self, id: NodeId) {
        (self.0)(id)
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback")
    }
}

/// One element of a UI tree.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub alpha: f32,
    pub visible: bool,
    pub enabled: bool,
    pub hovered: bool,
    pub pressed: bool,
    pub scaling: ScalingType,
    pub arrange: ArrangeType,
    pub arrange_padding: f32,
    pub kind: NodeKind,
    pub on_click: Option<Callback>,
    pub on_hover: Option<Callback>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            alpha: 1.0,
            visible: true,
            enabled: true,
            hovered: false,
            pressed: false,
            scaling: ScalingType::Normal,
            arrange: ArrangeType::Free,
            arrange_padding: 0.0,
            kind,
            on_click: None,
            on_hover: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Container)
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            name,
            NodeKind::TextPoint(TextData {
                text: text.into(),
                ..TextData::default()
            }),
        )
    }

    pub fn with_rect(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Buttons, text fields and anything with a handler take pointer input.
    pub fn is_interactive(&self) -> bool {
        self.kind.is_button() || self.on_click.is_some() || self.on_hover.is_some()
    }

    pub fn text_data(&self) -> Option<&TextData> {
        match &self.kind {
            NodeKind::TextPoint(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.kind {
            NodeKind::TextPoint(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_field(&self) -> Option<&TextFieldData> {
        match &self.kind {
            NodeKind::TextField(f) => Some(f),
            _ => None,
        }
    }

    pub fn text_field_mut(&mut self) -> Option<&mut TextFieldData> {
        match &mut self.kind {
            NodeKind::TextField(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_enums() {
        assert_eq!(ScalingType::from_attr("scaleByHeight"), ScalingType::ByHeight);
        assert_eq!(ScalingType::from_attr("bogus"), ScalingType::Normal);
        assert_eq!(ArrangeType::from_attr("arrangeVertical"), ArrangeType::Vertical);
        assert_eq!(ArrangeType::from_attr(""), ArrangeType::Free);
        assert_eq!(RectStyle::from_attr("strokedFill"), RectStyle::StrokedFill);
        assert_eq!(RectStyle::from_attr("dotted"), RectStyle::Filled);
        assert!(RectStyle::StrokedFill.fills() && RectStyle::StrokedFill.strokes());
        assert!(!RectStyle::Stroked.fills());
    }

    #[test]
    fn test_text_field_display() {
        let mut field = TextFieldData {
            placeholder: "Password".to_string(),
            is_password: true,
            ..TextFieldData::default()
        };
        assert_eq!(field.display_text(), "Password");

        field.input = "abc".to_string();
        assert_eq!(field.display_text(), "***");

        field.has_focus = true;
        assert_eq!(field.display_text(), "***_");
        field.caret_phase = CARET_BLINK + 0.1;
        assert_eq!(field.display_text(), "***");

        field.input.clear();
        assert_eq!(field.display_text(), "");
    }

    #[test]
    fn test_node_defaults() {
        let node = Node::container("root");
        assert!(node.visible);
        assert!(node.enabled);
        assert_eq!(node.alpha, 1.0);
        assert!(!node.is_interactive());
        assert!(Node::new("b", NodeKind::Button(ButtonData::default())).is_interactive());
    }
}
