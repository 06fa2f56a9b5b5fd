//! HTML5 parsing using html5ever.
//!
//! The page is parsed into an `RcDom` and converted into a [`Document`].
//! Style sheets are collected while converting: `<style>` bodies are parsed
//! as same-origin sheets and `<link rel="stylesheet">` elements become
//! external sheets whose readability depends on their origin.

use crate::cssom::{SheetOrigin, StyleSheet};
use crate::document::Document;
use anyhow::Result;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

impl Document {
    /// Parse a page without a base URL.
    ///
    /// # Errors
    /// Returns an error if html5ever fails to read the input.
    pub fn parse_html(html: &str) -> Result<Self> {
        HtmlParser::new(None).parse(html)
    }

    /// Parse a page served from `url`; linked sheets from other origins are
    /// marked cross-origin.
    ///
    /// # Errors
    /// Returns an error if html5ever fails to read the input.
    pub fn parse_html_with_url(html: &str, url: Url) -> Result<Self> {
        HtmlParser::new(Some(url)).parse(html)
    }
}

/// Converts html5ever output into a [`Document`].
struct HtmlParser {
    document: Document,
}

impl HtmlParser {
    fn new(url: Option<Url>) -> Self {
        let mut document = Document::new();
        if let Some(base) = url {
            document.set_url(base);
        }
        Self { document }
    }

    fn parse(mut self, html: &str) -> Result<Document> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        let root = self.document.root();
        for child in dom.document.children.borrow().iter() {
            self.convert_node(child, root)?;
        }
        log::debug!(
            "parsed document with {} nodes",
            self.document.descendants(root).len()
        );
        Ok(self.document)
    }

    /// Convert an html5ever node (and its subtree) under `parent`.
    fn convert_node(&mut self, rc_node: &Handle, parent: NodeId) -> Result<()> {
        match &rc_node.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return Ok(());
                }
                let node = self.document.create_text(&text);
                self.document.append_child(parent, node)?;
            }
            RcNodeData::Comment { contents } => {
                let node = self.document.create_comment(contents);
                self.document.append_child(parent, node)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let node = self.document.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    self.document
                        .set_attribute(node, &attr.name.local, &attr.value)?;
                }
                self.document.append_child(parent, node)?;
                for child in rc_node.children.borrow().iter() {
                    self.convert_node(child, node)?;
                }
                self.collect_style_sheet(node);
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }

    /// Register the sheet carried by a `<style>` or `<link rel=stylesheet>` element.
    fn collect_style_sheet(&mut self, node: NodeId) {
        let tag = self.document.tag_name(node).map(str::to_owned);
        match tag.as_deref() {
            Some("style") => {
                let css = self.document.text_content(node);
                self.document.add_style_sheet(StyleSheet::parse(&css));
            }
            Some("link") => {
                let is_stylesheet = self
                    .document
                    .get_attribute(node, "rel")
                    .is_some_and(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
                    });
                let Some(href) = self.document.get_attribute(node, "href") else {
                    return;
                };
                if !is_stylesheet {
                    return;
                }
                let href = href.to_owned();
                let origin = sheet_origin(self.document.url(), &href);
                log::debug!("linked stylesheet {href} ({origin:?}); contents are not fetched");
                self.document
                    .add_style_sheet(StyleSheet::external(&href, origin, ""));
            }
            _ => {}
        }
    }
}

/// Decide whether a linked sheet is readable from a document at `base`.
fn sheet_origin(base: Option<&Url>, href: &str) -> SheetOrigin {
    let resolved = match base {
        Some(base_url) => base_url.join(href),
        None => Url::parse(href),
    };
    match (base, resolved) {
        (Some(base_url), Ok(sheet_url)) if sheet_url.origin() == base_url.origin() => {
            SheetOrigin::SameOrigin
        }
        (None, Err(_)) => SheetOrigin::SameOrigin,
        _ => SheetOrigin::CrossOrigin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_links_without_base_are_same_origin() {
        assert_eq!(sheet_origin(None, "static/app.css"), SheetOrigin::SameOrigin);
        assert_eq!(
            sheet_origin(None, "https://cdn.example.com/x.css"),
            SheetOrigin::CrossOrigin
        );
    }

    #[test]
    fn origin_comparison_uses_scheme_host_and_port() {
        let base = Url::parse("http://127.0.0.1:3000/?case=a").unwrap();
        assert_eq!(
            sheet_origin(Some(&base), "/static/app.css"),
            SheetOrigin::SameOrigin
        );
        assert_eq!(
            sheet_origin(Some(&base), "http://127.0.0.1:4000/app.css"),
            SheetOrigin::CrossOrigin
        );
    }
}
