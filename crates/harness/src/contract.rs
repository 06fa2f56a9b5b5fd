//! Selectors and attribute names the harness expects the page markup to provide.

/// The DOM contract between the page and the harness.
///
/// Defaults accept both markup variants of the task list page, so selector
/// fields may be comma-separated lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomContract {
    /// `id` of the element whose text is the JSON payload
    pub payload_id: String,
    /// The list container that is reordered and snapshotted
    pub list: String,
    /// One element per task row
    pub item: String,
    /// Attribute holding a row's stable identifier
    pub item_id_attribute: String,
    pub icon: String,
    pub title: String,
    pub label: String,
    /// Action controls inside a row
    pub buttons: String,
    /// Element inside a row carrying the priority attribute
    pub priority: String,
    /// Attribute holding the priority value, read from `priority` or the row itself
    pub priority_attribute: String,
    pub subtask_group: String,
    pub subtask_item: String,
    /// Attribute set on the list container once the mutation ran
    pub reordered_attribute: String,
    /// Class toggled on a hovered row
    pub hovered_class: String,
}

impl Default for DomContract {
    fn default() -> Self {
        Self {
            payload_id: "case-data".to_owned(),
            list: "[data-task-list]".to_owned(),
            item: "[data-task-item]".to_owned(),
            item_id_attribute: "data-task-id".to_owned(),
            icon: "[data-icon]".to_owned(),
            title: ".task-title".to_owned(),
            label: ".task-label".to_owned(),
            buttons: ".task-actions button, [data-task-actions] .btn".to_owned(),
            priority: ".task-priority".to_owned(),
            priority_attribute: "data-priority".to_owned(),
            subtask_group: "[data-subtasks], .subtask-list".to_owned(),
            subtask_item: ".subtask".to_owned(),
            reordered_attribute: "data-reordered".to_owned(),
            hovered_class: "hovered".to_owned(),
        }
    }
}
