//! CSS object model: style sheets, rules and the stylesheet parser.

use core::fmt::{Display, Formatter, Result as FmtResult};
use cssparser::{ParseError, Parser, ParserInput, Token};
use std::error::Error;

/// A single declaration inside a style rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// One entry of a sheet's rule list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CssRule {
    /// `selector { declarations }`
    Style {
        selector_text: String,
        declarations: Vec<Declaration>,
    },
    /// `@name prelude { ... }` or `@name prelude;`. Nested rules are not exposed.
    At { prelude: String },
}

impl CssRule {
    /// Selector text of a style rule; at-rules have none.
    pub fn selector_text(&self) -> Option<&str> {
        match self {
            Self::Style { selector_text, .. } => Some(selector_text),
            Self::At { .. } => None,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        match self {
            Self::Style { declarations, .. } => declarations,
            Self::At { .. } => &[],
        }
    }

    /// Serialised declaration block, e.g. `color: red; margin: 0 !important;`.
    pub fn css_text(&self) -> String {
        self.declarations()
            .iter()
            .map(|decl| {
                let priority = if decl.important { " !important" } else { "" };
                format!("{}: {}{};", decl.name, decl.value, priority)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Where a sheet came from, which decides whether its rules may be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetOrigin {
    /// Inline `<style>` or a same-origin `<link>`.
    SameOrigin,
    /// A `<link>` to another origin; its rule list is not readable.
    CrossOrigin,
}

/// A style sheet attached to the document.
#[derive(Clone, Debug)]
pub struct StyleSheet {
    pub href: Option<String>,
    pub origin: SheetOrigin,
    rules: Vec<CssRule>,
}

impl StyleSheet {
    /// Parse an inline sheet.
    pub fn parse(css: &str) -> Self {
        Self {
            href: None,
            origin: SheetOrigin::SameOrigin,
            rules: parse_stylesheet(css),
        }
    }

    /// An external sheet. Cross-origin sheets keep no rules.
    pub fn external(href: &str, origin: SheetOrigin, css: &str) -> Self {
        let rules = match origin {
            SheetOrigin::SameOrigin => parse_stylesheet(css),
            SheetOrigin::CrossOrigin => Vec::new(),
        };
        Self {
            href: Some(href.to_owned()),
            origin,
            rules,
        }
    }

    /// The rule list, or an access error for cross-origin sheets.
    ///
    /// # Errors
    /// Returns [`CssomError::CrossOrigin`] when the sheet is not readable.
    pub fn css_rules(&self) -> Result<&[CssRule], CssomError> {
        match self.origin {
            SheetOrigin::SameOrigin => Ok(&self.rules),
            SheetOrigin::CrossOrigin => Err(CssomError::CrossOrigin {
                href: self.href.clone().unwrap_or_default(),
            }),
        }
    }
}

/// Errors raised when reading style sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssomError {
    /// Reading rules of a sheet from another origin.
    CrossOrigin { href: String },
    /// The style sheet list itself could not be enumerated.
    Unavailable(String),
}

impl Display for CssomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::CrossOrigin { href } => {
                write!(f, "SecurityError: cannot access rules of cross-origin sheet {href}")
            }
            Self::Unavailable(reason) => write!(f, "style sheets unavailable: {reason}"),
        }
    }
}

impl Error for CssomError {}

/// Anything that can enumerate the active style sheets of a page.
pub trait StyleSheetSource {
    /// The active sheets in document order.
    ///
    /// # Errors
    /// Returns [`CssomError::Unavailable`] when the list cannot be enumerated.
    fn style_sheets(&self) -> Result<&[StyleSheet], CssomError>;
}

/// Parse a CSS stylesheet into rules. Unparseable rules are skipped.
pub fn parse_stylesheet(css: &str) -> Vec<CssRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        match parse_rule(&mut parser) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err(error) => log::debug!("skipping malformed css rule: {error:?}"),
        }
    }

    rules
}

/// Parse one rule: everything up to the first `{` (or `;` for at-rules) is the prelude.
fn parse_rule<'i>(parser: &mut Parser<'i, '_>) -> Result<Option<CssRule>, ParseError<'i, ()>> {
    let start = parser.position();
    let at_rule = matches!(parser.next_including_whitespace()?, Token::AtKeyword(_));
    loop {
        if parser.is_exhausted() {
            let prelude = parser.slice_from(start).trim().to_owned();
            return Ok(at_rule.then_some(CssRule::At { prelude }));
        }
        let before = parser.position();
        match parser.next_including_whitespace()? {
            Token::CurlyBracketBlock => {
                let prelude = parser.slice(start..before).trim().to_owned();
                if at_rule {
                    parser.parse_nested_block(|_| Ok::<(), ParseError<'i, ()>>(()))?;
                    return Ok(Some(CssRule::At { prelude }));
                }
                let declarations = parser.parse_nested_block(parse_declaration_list)?;
                return Ok(Some(CssRule::Style {
                    selector_text: prelude,
                    declarations,
                }));
            }
            Token::Semicolon if at_rule => {
                let prelude = parser.slice(start..before).trim().to_owned();
                return Ok(Some(CssRule::At { prelude }));
            }
            _ => {}
        }
    }
}

/// Parse the body of a declaration block.
fn parse_declaration_list<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<Vec<Declaration>, ParseError<'i, ()>> {
    let mut declarations = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        let name = match parser.next()? {
            Token::Ident(name) => name.to_string(),
            _ => {
                skip_to_semicolon(parser);
                continue;
            }
        };
        if parser.expect_colon().is_err() {
            skip_to_semicolon(parser);
            continue;
        }

        let value_start = parser.position();
        let mut value_end = value_start;
        while !parser.is_exhausted() {
            let before = parser.position();
            if matches!(parser.next()?, Token::Semicolon) {
                value_end = before;
                break;
            }
            value_end = parser.position();
        }
        let raw = parser.slice(value_start..value_end).trim();
        let (value, important) = split_important(raw);
        if !value.is_empty() {
            let name = if name.starts_with("--") {
                name
            } else {
                name.to_ascii_lowercase()
            };
            declarations.push(Declaration {
                name,
                value: value.to_owned(),
                important,
            });
        }
    }

    Ok(declarations)
}

fn skip_to_semicolon(parser: &mut Parser<'_, '_>) {
    while let Ok(token) = parser.next() {
        if matches!(token, Token::Semicolon) {
            break;
        }
    }
}

/// Strip a trailing `!important`, case-insensitively.
fn split_important(raw: &str) -> (&str, bool) {
    if let Some(bang) = raw.rfind('!') {
        let flag = raw[bang + 1..].trim();
        if flag.eq_ignore_ascii_case("important") {
            return (raw[..bang].trim_end(), true);
        }
    }
    (raw, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_in_source_order() {
        let rules = parse_stylesheet(
            ".task { color: red; margin: 0 auto !important }\n\
             @media (max-width: 600px) { .task { color: blue } }\n\
             @import url(x.css);\n\
             ul > li{height:40px}",
        );
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].selector_text(), Some(".task"));
        assert_eq!(rules[0].css_text(), "color: red; margin: 0 auto !important;");
        assert_eq!(rules[1].selector_text(), None);
        assert_eq!(rules[2].selector_text(), None);
        assert_eq!(rules[3].selector_text(), Some("ul > li"));
        assert_eq!(rules[3].declarations()[0].value, "40px");
    }

    #[test]
    fn bad_declarations_do_not_drop_the_rule() {
        let rules = parse_stylesheet(".row { 12: x; height: 10px; color }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].css_text(), "height: 10px;");
    }

    #[test]
    fn cross_origin_rules_are_unreadable() {
        let sheet = StyleSheet::external(
            "https://cdn.example.com/site.css",
            SheetOrigin::CrossOrigin,
            ".a{color:red}",
        );
        assert_eq!(
            sheet.css_rules(),
            Err(CssomError::CrossOrigin {
                href: "https://cdn.example.com/site.css".into()
            })
        );
    }
}
