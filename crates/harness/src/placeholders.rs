//! Placeholder text for rows rendered with missing labels or titles.

use crate::contract::DomContract;
use probe_dom::{Document, DomError};

pub const LABEL_PLACEHOLDER: &str = "Needs label";
pub const TITLE_PLACEHOLDER: &str = "Untitled task";

/// Fill empty labels and titles of every row. Returns how many elements changed.
///
/// # Errors
/// Propagates tree errors from rewriting element text.
pub fn fill(document: &mut Document, contract: &DomContract) -> Result<usize, DomError> {
    let mut filled = 0;
    for row in document.query_selector_all(document.root(), &contract.item) {
        if let Some(label) = document.query_selector(row, &contract.label) {
            let text = document.text_content(label);
            if text.is_empty() || text == "None" || text == "No label" {
                document.set_text_content(label, LABEL_PLACEHOLDER)?;
                filled += 1;
            }
        }
        if let Some(title) = document.query_selector(row, &contract.title) {
            let text = document.text_content(title);
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed == "None" {
                document.set_text_content(title, TITLE_PLACEHOLDER)?;
                filled += 1;
            }
        }
    }
    if filled > 0 {
        log::debug!("filled {filled} placeholder texts");
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_placeholder_values() {
        let mut doc = Document::parse_html(
            r#"<ul data-task-list>
                 <li data-task-item><span class="task-title"> None </span><span class="task-label">None</span></li>
                 <li data-task-item><span class="task-title">Ship it</span><span class="task-label">No label</span></li>
                 <li data-task-item><span class="task-title"></span><span class="task-label">work</span></li>
                 <li data-task-item></li>
               </ul>"#,
        )
        .unwrap();
        let contract = DomContract::default();
        assert_eq!(fill(&mut doc, &contract).unwrap(), 4);

        let titles: Vec<String> = doc
            .query_selector_all(doc.root(), ".task-title")
            .into_iter()
            .map(|node| doc.text_content(node))
            .collect();
        assert_eq!(titles, [TITLE_PLACEHOLDER, "Ship it", TITLE_PLACEHOLDER]);
        let labels: Vec<String> = doc
            .query_selector_all(doc.root(), ".task-label")
            .into_iter()
            .map(|node| doc.text_content(node))
            .collect();
        assert_eq!(labels, [LABEL_PLACEHOLDER, LABEL_PLACEHOLDER, "work"]);

        assert_eq!(fill(&mut doc, &contract).unwrap(), 0);
    }
}
