//! Minimal flow layout producing the boxes behind `getBoundingClientRect()`.
//!
//! Block-level children stack vertically. Consecutive inline-level children
//! (and every child of a `display: flex` container) share a line whose
//! height is the tallest item. Text takes one line of `line-height`.
//! Widths are split evenly across a line; margins never collapse.

use crate::cssom::{Declaration, StyleSheetSource as _};
use crate::document::Document;
use crate::geometry::Rect;
use crate::node::NodeData;
use crate::selectors::{SelectorList, Specificity};
use crate::style_attr::parse_style_attribute;
use indextree::NodeId;
use std::collections::HashMap;

/// Line height used when none is declared, in px.
pub const DEFAULT_LINE_HEIGHT: f64 = 20.0;

/// Elements that never generate a box.
const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "template", "noscript",
];

/// Elements that are inline-level unless their `display` says otherwise.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "button", "code", "em", "i", "img", "input", "label", "select", "small",
    "span", "strong", "svg",
];

/// Boxes produced by one layout pass over the current tree and styles.
///
/// Nothing is kept on the [`Document`]; a new pass is needed after any change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    boxes: HashMap<NodeId, Rect>,
}

impl Layout {
    /// The box of `node`, if it generated one.
    pub fn layout_box(&self, node: NodeId) -> Option<Rect> {
        self.boxes.get(&node).copied()
    }

    /// `getBoundingClientRect()`: the layout box, or an all-zero rect for
    /// nodes that generated none.
    pub fn bounding_client_rect(&self, node: NodeId) -> Rect {
        self.layout_box(node).unwrap_or_default()
    }
}

impl Document {
    /// Lay out the page for a viewport `viewport_width` px wide.
    pub fn compute_layout(&self, viewport_width: f64) -> Layout {
        let boxes: HashMap<NodeId, Rect> = FlowLayout::new(self)
            .run(viewport_width)
            .into_iter()
            .collect();
        log::debug!(
            "layout produced {} boxes at width {viewport_width}",
            boxes.len()
        );
        Layout { boxes }
    }
}

/// Used values of the properties the layouter understands.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoxStyle {
    hidden: bool,
    inline_level: bool,
    flex: bool,
    align_center: bool,
    height: Option<f64>,
    margin_top: f64,
    margin_bottom: f64,
    padding_top: f64,
    padding_bottom: f64,
    line_height: f64,
}

/// Cascade key: `!important`, then specificity, then source order.
type CascadeRank = (bool, Specificity, usize);

/// Resolves declared values from accessible style rules and inline styles.
struct StyleResolver<'doc> {
    rules: Vec<(SelectorList, &'doc [Declaration])>,
}

impl<'doc> StyleResolver<'doc> {
    fn new(document: &'doc Document) -> Self {
        let mut rules = Vec::new();
        let sheets = document.style_sheets().unwrap_or_default();
        for sheet in sheets {
            let Ok(sheet_rules) = sheet.css_rules() else {
                continue;
            };
            for rule in sheet_rules {
                if let Some(selector_text) = rule.selector_text() {
                    rules.push((SelectorList::parse(selector_text), rule.declarations()));
                }
            }
        }
        Self { rules }
    }

    /// Declared values for `node`, keyed by property name.
    fn declared(&self, document: &Document, node: NodeId) -> HashMap<String, String> {
        let mut winners: HashMap<String, (CascadeRank, String)> = HashMap::new();
        for (order, (selectors, declarations)) in self.rules.iter().enumerate() {
            let Some(specificity) = selectors.matching_specificity(document, node) else {
                continue;
            };
            for decl in *declarations {
                let rank = (decl.important, specificity, order);
                let replaces = winners
                    .get(&decl.name)
                    .is_none_or(|(current, _)| rank >= *current);
                if replaces {
                    winners.insert(decl.name.clone(), (rank, decl.value.clone()));
                }
            }
        }
        let mut declared: HashMap<String, String> = winners
            .into_iter()
            .map(|(name, (_, value))| (name, value))
            .collect();
        if let Some(inline) = document.get_attribute(node, "style") {
            for decl in parse_style_attribute(inline) {
                declared.insert(decl.property, decl.value);
            }
        }
        declared
    }

    fn box_style(&self, document: &Document, node: NodeId, tag: &str) -> BoxStyle {
        let declared = self.declared(document, node);
        let get = |name: &str| declared.get(name).map(String::as_str);
        let display = get("display");
        let hidden = display == Some("none") || (display.is_none() && HIDDEN_TAGS.contains(&tag));
        let inline_level = match display {
            Some(value) => value.starts_with("inline"),
            None => INLINE_TAGS.contains(&tag),
        };
        let flex = display.is_some_and(|value| value == "flex" || value == "inline-flex");
        let (margin_top, margin_bottom) = vertical_edges(get("margin"), get("margin-top"), get("margin-bottom"));
        let (padding_top, padding_bottom) =
            vertical_edges(get("padding"), get("padding-top"), get("padding-bottom"));
        BoxStyle {
            hidden,
            inline_level,
            flex,
            align_center: get("align-items") == Some("center"),
            height: get("height").and_then(parse_px),
            margin_top,
            margin_bottom,
            padding_top,
            padding_bottom,
            line_height: get("line-height")
                .and_then(parse_px)
                .unwrap_or(DEFAULT_LINE_HEIGHT),
        }
    }
}

/// Parse a px length. Bare numbers are taken as px; other units are ignored.
fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse::<f64>().ok().filter(|px| px.is_finite())
}

/// Top and bottom edges from a box shorthand plus its longhands.
fn vertical_edges(shorthand: Option<&str>, top: Option<&str>, bottom: Option<&str>) -> (f64, f64) {
    let values: Vec<f64> = shorthand
        .map(|text| {
            text.split_ascii_whitespace()
                .map(|part| parse_px(part).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();
    let short_top = values.first().copied().unwrap_or(0.0);
    let short_bottom = values.get(2).or_else(|| values.first()).copied().unwrap_or(0.0);
    (
        top.and_then(parse_px).unwrap_or(short_top),
        bottom.and_then(parse_px).unwrap_or(short_bottom),
    )
}

/// A child taking part in flow.
#[derive(Debug, Clone, Copy)]
enum FlowItem {
    Element(NodeId, BoxStyle),
    Text,
}

impl FlowItem {
    const fn is_inline_level(&self) -> bool {
        match self {
            Self::Element(_, style) => style.inline_level,
            Self::Text => true,
        }
    }
}

struct FlowLayout<'doc> {
    document: &'doc Document,
    resolver: StyleResolver<'doc>,
    /// Boxes in document order; parents are pushed before their children.
    boxes: Vec<(NodeId, Rect)>,
}

impl<'doc> FlowLayout<'doc> {
    fn new(document: &'doc Document) -> Self {
        Self {
            document,
            resolver: StyleResolver::new(document),
            boxes: Vec::new(),
        }
    }

    fn run(mut self, viewport_width: f64) -> Vec<(NodeId, Rect)> {
        let root = self.document.root();
        self.layout_children(root, 0.0, 0.0, viewport_width, false, false, DEFAULT_LINE_HEIGHT);
        self.boxes
    }

    fn flow_items(&self, parent: NodeId) -> Vec<FlowItem> {
        let mut items = Vec::new();
        for child in self.document.children(parent) {
            match self.document.node_data(child) {
                Some(NodeData::Element(element)) => {
                    let style = self
                        .resolver
                        .box_style(self.document, child, &element.tag_name);
                    if !style.hidden {
                        items.push(FlowItem::Element(child, style));
                    }
                }
                Some(NodeData::Text(text)) if !text.trim().is_empty() => items.push(FlowItem::Text),
                _ => {}
            }
        }
        items
    }

    /// Lay out the children of `parent` from `top`; returns the content height.
    #[allow(
        clippy::too_many_arguments,
        reason = "Flow state is passed explicitly to keep the recursion stateless"
    )]
    fn layout_children(
        &mut self,
        parent: NodeId,
        left: f64,
        top: f64,
        width: f64,
        single_line: bool,
        align_center: bool,
        line_height: f64,
    ) -> f64 {
        let items = self.flow_items(parent);
        let mut cursor = top;
        let mut line: Vec<FlowItem> = Vec::new();
        for item in items {
            if single_line || item.is_inline_level() {
                line.push(item);
                continue;
            }
            cursor += self.layout_line(&line, left, cursor, width, align_center, line_height);
            line.clear();
            if let FlowItem::Element(node, style) = item {
                cursor += self.layout_element(node, style, left, cursor, width);
            }
        }
        cursor += self.layout_line(&line, left, cursor, width, align_center, line_height);
        cursor - top
    }

    /// Lay out one line of items side by side; returns the line height.
    fn layout_line(
        &mut self,
        items: &[FlowItem],
        left: f64,
        top: f64,
        width: f64,
        align_center: bool,
        line_height: f64,
    ) -> f64 {
        if items.is_empty() {
            return 0.0;
        }
        let share = width / items.len() as f64;
        let mut placed: Vec<(usize, usize, f64)> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let start = self.boxes.len();
            let item_left = left + share * index as f64;
            let height = match item {
                FlowItem::Element(node, style) => {
                    self.layout_element(*node, *style, item_left, top, share)
                }
                FlowItem::Text => line_height,
            };
            placed.push((start, self.boxes.len(), height));
        }
        let line_box = placed
            .iter()
            .map(|(_, _, height)| *height)
            .fold(0.0_f64, f64::max);
        if align_center {
            for (start, end, height) in placed {
                let delta = (line_box - height) / 2.0;
                for entry in &mut self.boxes[start..end] {
                    entry.1 = entry.1.shifted_down(delta);
                }
            }
        }
        line_box
    }

    /// Lay out an element at `top`; returns its outer height (margins included).
    fn layout_element(&mut self, node: NodeId, style: BoxStyle, left: f64, top: f64, width: f64) -> f64 {
        let border_top = top + style.margin_top;
        let slot = self.boxes.len();
        self.boxes.push((node, Rect::default()));
        let children_height = self.layout_children(
            node,
            left,
            border_top + style.padding_top,
            width,
            style.flex,
            style.align_center,
            style.line_height,
        );
        let content_height = style.height.unwrap_or(children_height);
        if style.flex && style.align_center && content_height > children_height {
            let delta = (content_height - children_height) / 2.0;
            for entry in &mut self.boxes[slot + 1..] {
                entry.1 = entry.1.shifted_down(delta);
            }
        }
        let height = style.padding_top + content_height + style.padding_bottom;
        self.boxes[slot].1 = Rect::new(left, border_top, width, height);
        style.margin_top + height + style.margin_bottom
    }
}
