//! Positional metadata for nested subtasks.

use crate::contract::DomContract;
use probe_dom::{Document, DomError};

/// Attribute carrying a subtask's index within its group.
pub const DEPTH_ATTRIBUTE: &str = "data-depth";
/// Custom property carrying the same index for styling.
pub const OFFSET_PROPERTY: &str = "--offset";

/// Mark every subtask group with `role="group"` and index its subtasks from 0.
///
/// Groups are visited in document order, so a subtask inside nested groups
/// ends up indexed within its innermost group. Returns the number of groups.
///
/// # Errors
/// Propagates tree errors from writing attributes.
pub fn normalize(document: &mut Document, contract: &DomContract) -> Result<usize, DomError> {
    let groups = document.query_selector_all(document.root(), &contract.subtask_group);
    for group in &groups {
        document.set_attribute(*group, "role", "group")?;
        for (index, item) in document
            .query_selector_all(*group, &contract.subtask_item)
            .into_iter()
            .enumerate()
        {
            let position = index.to_string();
            document.set_attribute(item, DEPTH_ATTRIBUTE, &position)?;
            document.set_style_property(item, OFFSET_PROPERTY, &position)?;
        }
    }
    Ok(groups.len())
}
