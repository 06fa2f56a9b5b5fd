//! Structural checks over DOM snapshots.

use probe_harness::SnapshotNode;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DomValidation {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// The list root must be a `UL` and every child of a `UL` must be an `LI`.
pub fn validate_dom(snapshot: Option<&SnapshotNode>) -> DomValidation {
    let Some(root) = snapshot else {
        return DomValidation {
            valid: false,
            issues: vec!["Snapshot was empty".to_owned()],
        };
    };
    let mut issues = Vec::new();
    if root.tag != "UL" {
        issues.push("Root node must be UL".to_owned());
    }
    walk(root, None, &mut issues);
    DomValidation {
        valid: issues.is_empty(),
        issues,
    }
}

fn walk(node: &SnapshotNode, parent: Option<&str>, issues: &mut Vec<String>) {
    if parent == Some("UL") && node.tag != "LI" {
        issues.push(format!("UL child must be LI but found {}", node.tag));
    }
    for child in &node.children {
        walk(child, Some(&node.tag), issues);
    }
}
