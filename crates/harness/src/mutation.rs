//! The one-shot mutation applied to the task list.

use crate::contract::DomContract;
use probe_dom::{Document, DomError, NodeId};

/// A declarative mutation named by the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationDirective {
    /// `reorder_on_priority`: stable sort of the list's children by priority.
    ReorderOnPriority,
    /// Any other name; logged and ignored.
    Unsupported(String),
}

impl MutationDirective {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "reorder_on_priority" => Self::ReorderOnPriority,
            other => Self::Unsupported(other.to_owned()),
        }
    }
}

/// Priority vocabulary, declared in ascending rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
    Unknown,
}

impl Priority {
    /// Case-insensitive; anything unrecognised is [`Priority::Unknown`] and sorts
    /// last. Browser-side `indexOf` ranking would match case-sensitively and put
    /// unrecognised values ahead of `high`; this ranking intentionally differs.
    pub fn from_attr(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("high") {
            Self::High
        } else if trimmed.eq_ignore_ascii_case("medium") {
            Self::Medium
        } else if trimmed.eq_ignore_ascii_case("low") {
            Self::Low
        } else {
            Self::Unknown
        }
    }
}

/// Priority of a row: the priority indicator's attribute, else the row's own
/// attribute, else unknown.
pub fn row_priority(document: &Document, row: NodeId, contract: &DomContract) -> Priority {
    document
        .query_selector(row, &contract.priority)
        .and_then(|indicator| document.get_attribute(indicator, &contract.priority_attribute))
        .or_else(|| document.get_attribute(row, &contract.priority_attribute))
        .map_or(Priority::Unknown, Priority::from_attr)
}

/// What an application attempt did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The list was reordered and marked.
    Applied { rows: usize },
    /// The mutation already ran on this page.
    AlreadyApplied,
    /// The page has no list container.
    ContainerMissing,
    /// The container has no children; nothing was marked.
    NothingToReorder,
    /// The payload names no mutation.
    NoDirective,
    /// The payload names a mutation this harness does not know.
    Unsupported(String),
}

/// Applies the payload's mutation at most once per page.
#[derive(Debug, Default)]
pub struct MutationApplicator {
    applied: bool,
}

impl MutationApplicator {
    pub const fn new() -> Self {
        Self { applied: false }
    }

    pub const fn applied(&self) -> bool {
        self.applied
    }

    /// Apply `directive` to the list container of `document`.
    ///
    /// # Errors
    /// Propagates tree errors from moving rows; none occur for a well-formed list.
    pub fn apply(
        &mut self,
        document: &mut Document,
        contract: &DomContract,
        directive: Option<&MutationDirective>,
    ) -> Result<MutationOutcome, DomError> {
        let outcome = match directive {
            None => MutationOutcome::NoDirective,
            Some(MutationDirective::Unsupported(name)) => {
                log::warn!("unsupported mutation directive {name:?}; ignoring");
                MutationOutcome::Unsupported(name.clone())
            }
            Some(MutationDirective::ReorderOnPriority) => self.reorder_on_priority(document, contract)?,
        };
        log::debug!("mutation outcome: {outcome:?}");
        Ok(outcome)
    }

    fn reorder_on_priority(
        &mut self,
        document: &mut Document,
        contract: &DomContract,
    ) -> Result<MutationOutcome, DomError> {
        let Some(list) = document.query_selector(document.root(), &contract.list) else {
            return Ok(MutationOutcome::ContainerMissing);
        };
        if self.applied || document.get_attribute(list, &contract.reordered_attribute).is_some() {
            self.applied = true;
            return Ok(MutationOutcome::AlreadyApplied);
        }
        let mut rows: Vec<(Priority, NodeId)> = document
            .element_children(list)
            .into_iter()
            .map(|row| (row_priority(document, row, contract), row))
            .collect();
        if rows.is_empty() {
            return Ok(MutationOutcome::NothingToReorder);
        }
        // `sort_by_key` is stable, so equal priorities keep their order.
        rows.sort_by_key(|(priority, _)| *priority);
        for (_, row) in &rows {
            document.append_child(list, *row)?;
        }
        document.set_attribute(list, &contract.reordered_attribute, "true")?;
        self.applied = true;
        Ok(MutationOutcome::Applied { rows: rows.len() })
    }
}
