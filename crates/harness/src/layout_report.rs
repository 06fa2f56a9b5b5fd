//! Per-row geometry reports, recomputed on every call.

use crate::contract::DomContract;
use probe_dom::{Document, Layout, NodeId};
use serde::{Deserialize, Serialize};

/// Geometry of one task row and its parts. Missing parts report `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: Option<String>,
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
    pub icon_top: Option<f64>,
    pub text_top: Option<f64>,
    pub button_heights: Vec<f64>,
    pub button_top: Option<f64>,
}

/// One record per row currently in `document`, in document order, from a
/// layout pass run for this call.
pub fn capture_layout(
    document: &Document,
    contract: &DomContract,
    viewport_width: f64,
) -> Vec<LayoutRecord> {
    let layout = document.compute_layout(viewport_width);
    document
        .query_selector_all(document.root(), &contract.item)
        .into_iter()
        .map(|row| record_for(document, &layout, contract, row))
        .collect()
}

fn record_for(
    document: &Document,
    layout: &Layout,
    contract: &DomContract,
    row: NodeId,
) -> LayoutRecord {
    let rect = layout.bounding_client_rect(row);
    let top_of = |selector: &str| {
        document
            .query_selector(row, selector)
            .map(|node| layout.bounding_client_rect(node).top())
    };
    let buttons = document.query_selector_all(row, &contract.buttons);
    LayoutRecord {
        id: document
            .get_attribute(row, &contract.item_id_attribute)
            .map(str::to_owned),
        top: rect.top(),
        bottom: rect.bottom(),
        height: rect.height,
        icon_top: top_of(&contract.icon),
        text_top: top_of(&contract.title),
        button_heights: buttons
            .iter()
            .map(|button| layout.bounding_client_rect(*button).height)
            .collect(),
        button_top: buttons
            .first()
            .map(|button| layout.bounding_client_rect(*button).top()),
    }
}
