//! Layout metrics for one page and their acceptance verdict.

use crate::dom::validate_dom;
use crate::geometry::{ICON_TOLERANCE, button_height_range, misaligned_icons, spacing};
use probe_harness::{GlobalMeasurements, LayoutRecord};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutMetrics {
    pub spacing_values: Vec<f64>,
    pub spacing_variance: f64,
    pub button_height_range: f64,
    pub misaligned_icons: usize,
    pub css_collisions: u32,
    pub hover_latency: f64,
    pub dom_valid: bool,
    pub dom_issues: Vec<String>,
}

/// Summarize one `captureLayout()` / `measureGlobal()` pair.
pub fn summarize(records: &[LayoutRecord], globals: &GlobalMeasurements) -> LayoutMetrics {
    let gaps = spacing(records);
    let dom = validate_dom(globals.dom_snapshot.as_ref());
    LayoutMetrics {
        spacing_values: gaps.gaps,
        spacing_variance: gaps.variance,
        button_height_range: button_height_range(records),
        misaligned_icons: misaligned_icons(records, ICON_TOLERANCE),
        css_collisions: globals.css_collisions,
        hover_latency: globals.hover_latency,
        dom_valid: dom.valid,
        dom_issues: dom.issues,
    }
}

/// Upper bounds a page must stay within to be accepted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Thresholds {
    pub max_spacing_variance: f64,
    pub max_button_height_range: f64,
    pub max_misaligned_icons: usize,
    /// One frame at 60Hz
    pub max_hover_latency_ms: f64,
    pub max_css_collisions: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_spacing_variance: 2.0,
            max_button_height_range: 2.0,
            max_misaligned_icons: 0,
            max_hover_latency_ms: 16.0,
            max_css_collisions: 1,
        }
    }
}

/// Per-check results plus the conjunction of all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub spacing: bool,
    pub buttons: bool,
    pub icons: bool,
    pub hover: bool,
    pub dom: bool,
    pub css: bool,
    pub overall: bool,
}

pub fn evaluate(metrics: &LayoutMetrics, thresholds: &Thresholds) -> Verdict {
    let spacing = metrics.spacing_variance <= thresholds.max_spacing_variance;
    let buttons = metrics.button_height_range <= thresholds.max_button_height_range;
    let icons = metrics.misaligned_icons <= thresholds.max_misaligned_icons;
    let hover = metrics.hover_latency <= thresholds.max_hover_latency_ms;
    let dom = metrics.dom_valid;
    let css = metrics.css_collisions <= thresholds.max_css_collisions;
    let verdict = Verdict {
        spacing,
        buttons,
        icons,
        hover,
        dom,
        css,
        overall: spacing && buttons && icons && hover && dom && css,
    };
    log::debug!("acceptance verdict: {verdict:?}");
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_harness::SnapshotNode;

    fn metrics() -> LayoutMetrics {
        let records = vec![
            LayoutRecord {
                id: Some("a".into()),
                top: 0.0,
                bottom: 40.0,
                height: 40.0,
                icon_top: Some(10.0),
                text_top: Some(10.0),
                button_heights: vec![24.0, 24.0],
                button_top: Some(8.0),
            },
            LayoutRecord {
                id: Some("b".into()),
                top: 48.0,
                bottom: 88.0,
                height: 40.0,
                icon_top: Some(58.0),
                text_top: Some(58.0),
                button_heights: vec![25.0],
                button_top: Some(56.0),
            },
        ];
        let globals = GlobalMeasurements {
            css_collisions: 1,
            hover_latency: 0.0,
            dom_snapshot: Some(SnapshotNode {
                tag: "UL".into(),
                children: vec![],
            }),
        };
        summarize(&records, &globals)
    }

    #[test]
    fn clean_page_is_accepted() {
        let summary = metrics();
        assert_eq!(summary.spacing_values, [8.0]);
        assert_eq!(summary.button_height_range, 1.0);
        let verdict = evaluate(&summary, &Thresholds::default());
        assert!(verdict.overall);
    }

    #[test]
    fn each_check_can_fail_overall() {
        let mut slow = metrics();
        slow.hover_latency = 48.0;
        let verdict = evaluate(&slow, &Thresholds::default());
        assert!(!verdict.hover);
        assert!(verdict.spacing && verdict.buttons && verdict.icons && verdict.dom && verdict.css);
        assert!(!verdict.overall);

        let mut noisy = metrics();
        noisy.css_collisions = 4;
        noisy.dom_valid = false;
        let verdict = evaluate(&noisy, &Thresholds::default());
        assert!(!verdict.css && !verdict.dom && !verdict.overall);
    }
}
