//! Arena-backed UI tree.
//!
//! Every node lives in one slot of the arena. Parents list their children by
//! [`NodeId`]; removing a node frees its whole subtree and bumps the slot
//! generation so stale ids stop resolving.

use super::node::{ButtonData, CARET_BLINK, Callback, Node, NodeId, NodeKind};
use crate::backend::Renderer;
use glam::Vec2;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A parsed layout: one root container and everything below it.
#[derive(Debug)]
pub struct UiTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl UiTree {
    /// Create a tree whose root container covers `width x height`.
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::new(0, 0),
            focused: None,
        };
        tree.root = tree.alloc(Node::container(name).with_rect(0.0, 0.0, width, height));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self) -> &str {
        self.get(self.root).map(|n| n.name.as_str()).unwrap_or_default()
    }

    /// Resolution the layout was authored at (the root's size).
    pub fn design_size(&self) -> Vec2 {
        self.get(self.root)
            .map(|n| Vec2::new(n.w, n.h))
            .unwrap_or(Vec2::ZERO)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(self.slots.len() as u32 - 1, 0)
        }
    }

    fn release(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        let slot = &mut self.slots[id.index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        let Some(node) = slot.node.take() else {
            return;
        };
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.free.push(id.index);
        for child in node.children {
            self.release(child);
        }
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Returns `None` when `parent` is not a live node.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = self.alloc(node);
        self.get_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Remove every direct child of `parent` named `name`, freeing their
    /// subtrees. Returns how many children were removed.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> usize {
        let Some(children) = self.get(parent).map(|p| p.children.clone()) else {
            return 0;
        };

        let (doomed, kept): (Vec<NodeId>, Vec<NodeId>) = children
            .into_iter()
            .partition(|&c| self.get(c).is_some_and(|n| n.name == name));

        if let Some(p) = self.get_mut(parent) {
            p.children = kept;
        }
        for id in &doomed {
            self.release(*id);
        }
        doomed.len()
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        let Some(children) = self.get_mut(parent).map(|p| std::mem::take(&mut p.children)) else {
            return;
        };
        for id in children {
            self.release(id);
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// First direct child of `parent` whose name matches exactly.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.name == name))
    }

    /// Resolve a slash-separated path below `parent`, e.g. `signIn/btnSubmit`.
    pub fn find_child_recursive(&self, parent: NodeId, path: &str) -> Option<NodeId> {
        match path.split_once('/') {
            Some((head, rest)) => {
                let child = self.find_child(parent, head)?;
                self.find_child_recursive(child, rest)
            }
            None => self.find_child(parent, path),
        }
    }

    /// Resolve a path from the root.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.find_child_recursive(self.root, path)
    }

    pub fn absolute_position(&self, id: NodeId) -> Vec2 {
        let mut pos = Vec2::ZERO;
        let mut current = Some(id);
        while let Some(cur) = current
            && let Some(node) = self.get(cur)
        {
            pos += Vec2::new(node.x, node.y);
            current = node.parent;
        }
        pos
    }

    pub fn absolute_x(&self, id: NodeId) -> f32 {
        self.absolute_position(id).x
    }

    pub fn absolute_y(&self, id: NodeId) -> f32 {
        self.absolute_position(id).y
    }

    /// Half-open hit test against the node's absolute rectangle. Ignores
    /// visibility.
    pub fn contains_point(&self, id: NodeId, px: f32, py: f32) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let pos = self.absolute_position(id);
        px >= pos.x && px < pos.x + node.w && py >= pos.y && py < pos.y + node.h
    }

    /// True when the node and every ancestor are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.get(cur) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// All live nodes below and including `id`, in draw order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.get(cur) else {
                continue;
            };
            out.push(cur);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Set the text of a `TextPoint`. Returns false if `id` is not one.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.get_mut(id).and_then(|n| n.text_data_mut()) {
            Some(data) => {
                data.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.text_data().map(|t| t.text.as_str())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.visible = visible;
        }
    }

    pub fn set_on_click(&mut self, id: NodeId, callback: Callback) {
        if let Some(node) = self.get_mut(id) {
            node.on_click = Some(callback);
        }
    }

    pub fn set_on_hover(&mut self, id: NodeId, callback: Callback) {
        if let Some(node) = self.get_mut(id) {
            node.on_hover = Some(callback);
        }
    }

    fn fire_click(&mut self, id: NodeId) {
        let Some(mut cb) = self.get_mut(id).and_then(|n| n.on_click.take()) else {
            return;
        };
        cb.call(id);
        if let Some(node) = self.get_mut(id)
            && node.on_click.is_none()
        {
            node.on_click = Some(cb);
        }
    }

    fn fire_hover(&mut self, id: NodeId) {
        let Some(mut cb) = self.get_mut(id).and_then(|n| n.on_hover.take()) else {
            return;
        };
        cb.call(id);
        if let Some(node) = self.get_mut(id)
            && node.on_hover.is_none()
        {
            node.on_hover = Some(cb);
        }
    }

    pub fn on_mouse_enter(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.hovered = true;
        self.refresh_state_graphics(id);
        self.fire_hover(id);
    }

    pub fn on_mouse_leave(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.hovered = false;
        node.pressed = false;
        self.refresh_state_graphics(id);
    }

    pub fn on_mouse_down(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.pressed = true;
        self.refresh_state_graphics(id);
    }

    pub fn on_mouse_up(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.pressed && node.hovered {
            self.on_click(id);
        }
        if let Some(node) = self.get_mut(id) {
            node.pressed = false;
        }
        self.refresh_state_graphics(id);
    }

    /// Fire the click handler. Text fields take focus first.
    pub fn on_click(&mut self, id: NodeId) {
        if self.get(id).and_then(|n| n.text_field()).is_some() {
            self.focus_text_field(id);
        }
        self.fire_click(id);
    }

    /// Show exactly the state graphic matching the button's flags.
    pub fn refresh_state_graphics(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let Some(&ButtonData {
            standard,
            hover,
            click,
        }) = node.kind.button()
        else {
            return;
        };
        let (hovered, pressed) = (node.hovered, node.pressed);

        if let Some(gfx) = standard {
            self.set_visible(gfx, !hovered && !pressed);
        }
        if let Some(gfx) = hover {
            self.set_visible(gfx, hovered && !pressed);
        }
        if let Some(gfx) = click {
            self.set_visible(gfx, pressed);
        }
    }

    /// Resolve each button's `gfxStandard` / `gfxHover` / `gfxClick`
    /// children, and `txtCaption` for text fields, then apply the initial
    /// state graphics. Safe to call again after the tree changes.
    pub fn bind_state_graphics(&mut self) {
        for id in self.descendants(self.root) {
            let Some(node) = self.get(id) else {
                continue;
            };
            if !node.kind.is_button() {
                continue;
            }

            let graphics = ButtonData {
                standard: self.find_child(id, "gfxStandard"),
                hover: self.find_child(id, "gfxHover"),
                click: self.find_child(id, "gfxClick"),
            };
            let caption = self.find_child(id, "txtCaption");
            let caption_text = caption.and_then(|c| self.text(c)).map(str::to_string);

            let Some(node) = self.get_mut(id) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Button(button) => *button = graphics,
                NodeKind::TextField(field) => {
                    field.button = graphics;
                    // Keep the authored placeholder across rebinds.
                    if field.caption != caption {
                        field.caption = caption;
                        field.placeholder = caption_text.unwrap_or_default();
                    }
                }
                _ => {}
            }

            self.refresh_state_graphics(id);
            if caption.is_some() {
                self.sync_caption(id);
            }
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Give keyboard focus to a text field, taking it from any other.
    pub fn focus_text_field(&mut self, id: NodeId) {
        if self.get(id).and_then(|n| n.text_field()).is_none() {
            return;
        }
        if self.focused == Some(id) {
            return;
        }
        self.clear_focus();

        if let Some(field) = self.get_mut(id).and_then(|n| n.text_field_mut()) {
            field.has_focus = true;
            field.caret_phase = 0.0;
        }
        self.focused = Some(id);
        self.sync_caption(id);
    }

    pub fn clear_focus(&mut self) {
        let Some(prev) = self.focused.take() else {
            return;
        };
        if let Some(field) = self.get_mut(prev).and_then(|n| n.text_field_mut()) {
            field.has_focus = false;
        }
        self.sync_caption(prev);
    }

    /// Feed one character to a focused text field. `'\u{8}'` deletes the
    /// last character; printable ASCII appends up to the field's max length.
    pub fn on_text_input(&mut self, id: NodeId, ch: char) {
        let Some(field) = self.get_mut(id).and_then(|n| n.text_field_mut()) else {
            return;
        };
        if !field.has_focus {
            return;
        }

        match ch {
            '\u{8}' => {
                field.input.pop();
            }
            ' '..='~' if field.input.chars().count() < field.max_length => {
                field.input.push(ch);
            }
            _ => return,
        }
        field.caret_phase = 0.0;
        self.sync_caption(id);
    }

    /// Copy a text field's display text into its caption.
    fn sync_caption(&mut self, id: NodeId) {
        let Some(field) = self.get(id).and_then(|n| n.text_field()) else {
            return;
        };
        let Some(caption) = field.caption else {
            return;
        };
        let text = field.display_text();
        self.set_text(caption, text);
    }

    /// Advance time-based state on every node, visible or not.
    pub fn update(&mut self, dt: f32) {
        for id in self.descendants(self.root) {
            let Some(field) = self.get_mut(id).and_then(|n| n.text_field_mut()) else {
                continue;
            };
            if !field.has_focus {
                continue;
            }
            let was_visible = field.caret_visible();
            field.caret_phase = (field.caret_phase + dt) % (CARET_BLINK * 2.0);
            if field.caret_visible() != was_visible {
                self.sync_caption(id);
            }
        }
    }

    /// Draw visible nodes depth-first in insertion order.
    ///
    /// Images with a positive `w` and `h` are stretched to that size, a
    /// deliberate change from the shipped UI, which always drew them at
    /// natural size. Images without a size still draw at natural size.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.draw_node(self.root, Vec2::ZERO, renderer);
    }

    fn draw_node(&self, id: NodeId, origin: Vec2, renderer: &mut dyn Renderer) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let pos = origin + Vec2::new(node.x, node.y);

        match &node.kind {
            NodeKind::Container | NodeKind::Button(_) | NodeKind::TextField(_) => {}
            NodeKind::Rectangle(rect) => {
                if rect.style.fills() {
                    let fill = rect.fill.with_alpha(rect.fill_alpha * node.alpha);
                    renderer.draw_rect_filled(pos.x, pos.y, node.w, node.h, fill);
                }
                if rect.style.strokes() && rect.stroke_width > 0.0 {
                    let stroke = rect.stroke.with_alpha(node.alpha);
                    renderer.draw_rect_outline(
                        pos.x,
                        pos.y,
                        node.w,
                        node.h,
                        stroke,
                        rect.stroke_width,
                    );
                }
            }
            NodeKind::Line(line) => {
                renderer.draw_line(
                    pos.x + line.x1,
                    pos.y + line.y1,
                    pos.x + line.x2,
                    pos.y + line.y2,
                    line.stroke.fade(node.alpha),
                    line.stroke_width,
                );
            }
            NodeKind::Gradient(grad) => {
                let (Some(first), Some(last)) = (grad.stops.first(), grad.stops.last()) else {
                    return;
                };
                if grad.stops.len() < 2 {
                    return;
                }
                renderer.draw_gradient(
                    pos.x,
                    pos.y,
                    node.w,
                    node.h,
                    first.color.fade(node.alpha),
                    last.color.fade(node.alpha),
                    grad.direction,
                );
            }
            NodeKind::TextPoint(text) => {
                if text.text.is_empty() {
                    return;
                }
                renderer.draw_text(
                    &text.font,
                    text.size,
                    pos.x,
                    pos.y,
                    &text.text,
                    text.fill.fade(node.alpha),
                    text.align,
                );
            }
            NodeKind::Image(image) => {
                if let Some(bitmap) = &image.bitmap {
                    if node.w > 0.0 && node.h > 0.0 {
                        renderer.draw_bitmap_scaled(
                            bitmap.bitmap(),
                            pos.x,
                            pos.y,
                            node.w,
                            node.h,
                            node.alpha,
                        );
                    } else {
                        renderer.draw_bitmap(bitmap.bitmap(), pos.x, pos.y, node.alpha);
                    }
                }
            }
        }

        for &child in &node.children {
            self.draw_node(child, pos, renderer);
        }
    }
}
