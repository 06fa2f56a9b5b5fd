//! Selector parsing, matching and specificity.
//!
//! Supports the subset the harness and the flow layouter need: type, `#id`,
//! `.class`, `[attr]`, `[attr=value]` and `*` compounds joined by descendant or
//! child combinators, in comma-separated lists. A selector that uses a
//! pseudo-class or pseudo-element is dropped from its list, so it never matches.

use crate::document::Document;
use crate::node::ElementData;
use core::iter::Peekable;
use core::mem::take;
use indextree::NodeId;

/// Combinator between two selector parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Attribute condition of a compound selector.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrCondition {
    /// `[name]`
    Exists(String),
    /// `[name=value]`
    Equals(String, String),
}

/// A compound selector: tag, id, classes and attribute conditions that must
/// all hold on one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    element_id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    universal: bool,
}

impl Compound {
    fn has_content(&self) -> bool {
        self.universal
            || self.tag.is_some()
            || self.element_id.is_some()
            || !self.classes.is_empty()
            || !self.attrs.is_empty()
    }

    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !element.tag_name.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(element_id) = &self.element_id
            && element.attribute("id") != Some(element_id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|condition| match condition {
            AttrCondition::Exists(name) => element.attribute(name).is_some(),
            AttrCondition::Equals(name, value) => element.attribute(name) == Some(value.as_str()),
        })
    }
}

/// One compound and the combinator linking it to the next compound.
#[derive(Clone, Debug, PartialEq, Eq)]
struct SelectorPart {
    compound: Compound,
    combinator_to_next: Option<Combinator>,
}

/// A complex selector: compounds left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector(Vec<SelectorPart>);

/// Specificity represented as (ids, classes + attributes, tags).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Selector {
    pub fn specificity(&self) -> Specificity {
        let mut ids = 0u32;
        let mut classes = 0u32;
        let mut tags = 0u32;
        for part in &self.0 {
            if part.compound.element_id.is_some() {
                ids = ids.saturating_add(1);
            }
            let class_like = part.compound.classes.len() + part.compound.attrs.len();
            classes = classes.saturating_add(u32::try_from(class_like).unwrap_or(u32::MAX));
            if part.compound.tag.is_some() {
                tags = tags.saturating_add(1);
            }
        }
        Specificity(ids, classes, tags)
    }

    /// Match right to left, climbing ancestors for combinators.
    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some((last, rest)) = self.0.split_last() else {
            return false;
        };
        if !document
            .element(node)
            .is_some_and(|element| last.compound.matches(element))
        {
            return false;
        }
        matches_remaining(document, node, rest)
    }
}

/// Match the parts left of an already-matched element at `node`.
fn matches_remaining(document: &Document, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some((part, rest)) = parts.split_last() else {
        return true;
    };
    let combinator = part.combinator_to_next.unwrap_or(Combinator::Descendant);
    let mut candidate = document.parent(node);
    while let Some(ancestor) = candidate {
        let matched = document
            .element(ancestor)
            .is_some_and(|element| part.compound.matches(element));
        if matched && matches_remaining(document, ancestor, rest) {
            return true;
        }
        if combinator == Combinator::Child {
            return false;
        }
        candidate = document.parent(ancestor);
    }
    false
}

/// A comma-separated selector list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    pub fn parse(input: &str) -> Self {
        Self(input.split(',').filter_map(parse_single_selector).collect())
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.0
            .iter()
            .any(|selector| selector.matches(document, node))
    }

    /// Highest specificity among the selectors that match `node`.
    pub fn matching_specificity(&self, document: &Document, node: NodeId) -> Option<Specificity> {
        self.0
            .iter()
            .filter(|selector| selector.matches(document, node))
            .map(Selector::specificity)
            .max()
    }
}

/// Consume an identifier from a character iterator.
fn consume_ident<I>(chars: &mut Peekable<I>) -> String
where
    I: Iterator<Item = char>,
{
    let mut out = String::new();
    while let Some(&character) = chars.peek() {
        if !(character.is_alphanumeric() || character == '-' || character == '_') {
            break;
        }
        out.push(character);
        chars.next();
    }
    out
}

fn skip_whitespace<I>(chars: &mut Peekable<I>)
where
    I: Iterator<Item = char>,
{
    while chars.peek().is_some_and(char::is_ascii_whitespace) {
        chars.next();
    }
}

/// Parse an attribute value (quoted or unquoted).
fn parse_attr_value<I>(chars: &mut Peekable<I>) -> String
where
    I: Iterator<Item = char>,
{
    let Some(quote) = chars.peek().copied() else {
        return String::new();
    };
    if quote != '"' && quote != '\'' {
        return consume_ident(chars);
    }
    chars.next();
    let mut value = String::new();
    for character in chars.by_ref() {
        if character == quote {
            break;
        }
        value.push(character);
    }
    value
}

/// Parse `[attr]` or `[attr=value]`. The opening `[` is already consumed.
fn parse_attribute_selector<I>(chars: &mut Peekable<I>) -> Option<AttrCondition>
where
    I: Iterator<Item = char>,
{
    skip_whitespace(chars);
    let name = consume_ident(chars).to_ascii_lowercase();
    skip_whitespace(chars);
    let condition = if chars.peek().copied() == Some('=') {
        chars.next();
        skip_whitespace(chars);
        AttrCondition::Equals(name.clone(), parse_attr_value(chars))
    } else {
        AttrCondition::Exists(name.clone())
    };
    // Operators other than `=` (`~=`, `^=`, ...) are not supported.
    let mut clean = true;
    for character in chars.by_ref() {
        if character == ']' {
            break;
        }
        if !character.is_ascii_whitespace() {
            clean = false;
        }
    }
    (clean && !name.is_empty()).then_some(condition)
}

fn commit(parts: &mut Vec<SelectorPart>, current: &mut Compound, combinator: Combinator) {
    parts.push(SelectorPart {
        compound: take(current),
        combinator_to_next: Some(combinator),
    });
}

/// Parse a single complex selector. Returns `None` for unsupported syntax.
fn parse_single_selector(selector_str: &str) -> Option<Selector> {
    let mut chars = selector_str.trim().chars().peekable();
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut current = Compound::default();
    let mut pending_child = false;

    loop {
        let mut saw_whitespace = false;
        while chars.peek().is_some_and(char::is_ascii_whitespace) {
            saw_whitespace = true;
            chars.next();
        }
        let Some(character) = chars.peek().copied() else {
            break;
        };
        if character == '>' {
            chars.next();
            pending_child = true;
            continue;
        }
        if (saw_whitespace || pending_child) && current.has_content() {
            let combinator = if pending_child {
                Combinator::Child
            } else {
                Combinator::Descendant
            };
            commit(&mut parts, &mut current, combinator);
            pending_child = false;
        }
        match character {
            '*' => {
                chars.next();
                current.universal = true;
            }
            '#' => {
                chars.next();
                current.element_id = Some(consume_ident(&mut chars));
            }
            '.' => {
                chars.next();
                current.classes.push(consume_ident(&mut chars));
            }
            '[' => {
                chars.next();
                current.attrs.push(parse_attribute_selector(&mut chars)?);
            }
            ':' => return None,
            other if other.is_alphanumeric() => {
                current.tag = Some(consume_ident(&mut chars).to_ascii_lowercase());
            }
            _ => return None,
        }
    }
    if pending_child || !current.has_content() {
        return None;
    }
    parts.push(SelectorPart {
        compound: current,
        combinator_to_next: None,
    });
    Some(Selector(parts))
}
