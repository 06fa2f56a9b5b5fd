//! `style="..."` attribute processing.
//! Spec: <https://www.w3.org/TR/css-style-attr/>

/// A single declaration parsed from a style attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineDeclaration {
    /// Property name normalized to ASCII lowercase. Custom properties keep their case.
    pub property: String,
    /// Raw value trimmed of surrounding ASCII whitespace.
    pub value: String,
}

/// Parse the value of a `style` attribute into a list of declarations.
///
/// Splits on `;`, then on the first `:`. Items without a colon, with an empty
/// property or with an empty value are skipped.
pub fn parse_style_attribute(input: &str) -> Vec<InlineDeclaration> {
    let mut out = Vec::new();
    for raw_item in input.split(';') {
        let item = raw_item.trim_matches(is_ascii_whitespace);
        if item.is_empty() {
            continue;
        }
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_ascii_whitespace);
        let value_text = raw_value.trim_matches(is_ascii_whitespace);
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        let property = if property_text.starts_with("--") {
            property_text.to_owned()
        } else {
            property_text.to_ascii_lowercase()
        };
        out.push(InlineDeclaration {
            property,
            value: value_text.to_owned(),
        });
    }
    out
}

/// Last value declared for `property`, if any.
pub fn style_property(input: &str, property: &str) -> Option<String> {
    parse_style_attribute(input)
        .into_iter()
        .rev()
        .find(|decl| decl.property.eq_ignore_ascii_case(property))
        .map(|decl| decl.value)
}

/// Return `input` with `property` set to `value`.
///
/// An existing declaration is updated where it stands and later duplicates are
/// dropped; otherwise the declaration is appended.
pub fn with_property(input: &str, property: &str, value: &str) -> String {
    let mut declarations = parse_style_attribute(input);
    let mut replaced = false;
    declarations.retain_mut(|decl| {
        if !decl.property.eq_ignore_ascii_case(property) {
            return true;
        }
        if replaced {
            return false;
        }
        value.clone_into(&mut decl.value);
        replaced = true;
        true
    });
    if !replaced {
        declarations.push(InlineDeclaration {
            property: property.to_owned(),
            value: value.to_owned(),
        });
    }
    serialize(&declarations)
}

/// Serialize declarations back into attribute text: `a: 1; b: 2;`.
pub fn serialize(declarations: &[InlineDeclaration]) -> String {
    declarations
        .iter()
        .map(|decl| format!("{}: {};", decl.property, decl.value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}
