//! In-memory page model for the UI probe.
//!
//! A [`Document`] owns an arena-backed DOM tree, the style sheets collected from
//! the page, and computes layout boxes on demand with the flow layouter. It is the host
//! page the instrumentation harness attaches to: everything the harness reads
//! (elements, attributes, style rules, bounding boxes) comes from here.

#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod cssom;
pub mod document;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod parser;
pub mod selectors;
pub mod style_attr;

pub use cssom::{CssRule, CssomError, Declaration, SheetOrigin, StyleSheet, StyleSheetSource};
pub use document::Document;
pub use geometry::Rect;
pub use layout::Layout;
pub use indextree::NodeId;
pub use node::{DomError, ElementData, NodeData};
