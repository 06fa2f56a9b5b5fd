//! Before/after comparison of two pages and its markdown report.

use crate::summary::{LayoutMetrics, Thresholds, Verdict, evaluate};
use serde::Serialize;

/// One numeric metric on both pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricDelta {
    pub name: &'static str,
    pub before: f64,
    pub after: f64,
}

impl MetricDelta {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub before: LayoutMetrics,
    pub after: LayoutMetrics,
    pub before_verdict: Verdict,
    pub after_verdict: Verdict,
    pub deltas: Vec<MetricDelta>,
}

pub fn compare(before: &LayoutMetrics, after: &LayoutMetrics, thresholds: &Thresholds) -> Comparison {
    let delta = |name, pick: fn(&LayoutMetrics) -> f64| MetricDelta {
        name,
        before: pick(before),
        after: pick(after),
    };
    Comparison {
        before: before.clone(),
        after: after.clone(),
        before_verdict: evaluate(before, thresholds),
        after_verdict: evaluate(after, thresholds),
        deltas: vec![
            delta("Spacing Variance", |metrics| metrics.spacing_variance),
            delta("Button Height Range", |metrics| metrics.button_height_range),
            delta("Misaligned Icons", |metrics| metrics.misaligned_icons as f64),
            delta("Hover Latency (ms)", |metrics| metrics.hover_latency),
            delta("CSS Collisions", |metrics| f64::from(metrics.css_collisions)),
        ],
    }
}

fn pass(value: bool) -> &'static str {
    if value { "pass" } else { "fail" }
}

impl Comparison {
    /// Render the comparison as a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# UI/UX Evaluation Compare Report\n\n");
        out.push_str("## Summary Metrics\n");
        out.push_str("| Metric | Before | After | Delta |\n");
        out.push_str("|---|---:|---:|---:|\n");
        for metric in &self.deltas {
            out.push_str(&format!(
                "|{}|{:.3}|{:.3}|{:+.3}|\n",
                metric.name,
                metric.before,
                metric.after,
                metric.delta()
            ));
        }
        out.push_str(&format!(
            "|DOM Valid|{}|{}|{}|\n",
            self.before.dom_valid,
            self.after.dom_valid,
            self.before.dom_valid != self.after.dom_valid
        ));

        out.push_str("\n## Acceptance\n");
        out.push_str("| Check | Before | After |\n");
        out.push_str("|---|---|---|\n");
        let checks = [
            ("spacing", self.before_verdict.spacing, self.after_verdict.spacing),
            ("buttons", self.before_verdict.buttons, self.after_verdict.buttons),
            ("icons", self.before_verdict.icons, self.after_verdict.icons),
            ("hover", self.before_verdict.hover, self.after_verdict.hover),
            ("dom", self.before_verdict.dom, self.after_verdict.dom),
            ("css", self.before_verdict.css, self.after_verdict.css),
            ("overall", self.before_verdict.overall, self.after_verdict.overall),
        ];
        for (name, before, after) in checks {
            out.push_str(&format!("|{name}|{}|{}|\n", pass(before), pass(after)));
        }

        out.push_str("\n## DOM Issues\n");
        if self.before.dom_issues.is_empty() && self.after.dom_issues.is_empty() {
            out.push_str("- none\n");
        }
        for issue in &self.before.dom_issues {
            out.push_str(&format!("- before: {issue}\n"));
        }
        for issue in &self.after.dom_issues {
            out.push_str(&format!("- after: {issue}\n"));
        }

        out.push_str("\n## Notes\n");
        if self.after.spacing_variance < self.before.spacing_variance {
            out.push_str("- Spacing variance decreased; layout is more consistent.\n");
        } else if self.after.spacing_variance > self.before.spacing_variance {
            out.push_str("- Spacing variance increased; review layout rules.\n");
        }
        if self.after.misaligned_icons < self.before.misaligned_icons {
            out.push_str("- Fewer misaligned icons.\n");
        }
        if self.after.hover_latency < self.before.hover_latency {
            out.push_str("- Hover feedback is faster.\n");
        }

        for (title, metrics) in [("Before", &self.before), ("After", &self.after)] {
            let json = serde_json::to_string_pretty(metrics).unwrap_or_default();
            out.push_str(&format!("\n**{title}**\n```json\n{json}\n```\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(variance: f64, hover: f64, collisions: u32) -> LayoutMetrics {
        LayoutMetrics {
            spacing_values: vec![],
            spacing_variance: variance,
            button_height_range: 0.0,
            misaligned_icons: 0,
            css_collisions: collisions,
            hover_latency: hover,
            dom_valid: true,
            dom_issues: vec![],
        }
    }

    #[test]
    fn report_lists_deltas_and_verdicts() {
        let before = metrics(6.25, 48.0, 3);
        let after = metrics(0.0, 0.0, 0);
        let comparison = compare(&before, &after, &Thresholds::default());
        assert_eq!(comparison.deltas[0].delta(), -6.25);
        assert!(!comparison.before_verdict.overall);
        assert!(comparison.after_verdict.overall);

        let report = comparison.to_markdown();
        assert!(report.starts_with("# UI/UX Evaluation Compare Report"));
        assert!(report.contains("|Spacing Variance|6.250|0.000|-6.250|"));
        assert!(report.contains("|Hover Latency (ms)|48.000|0.000|-48.000|"));
        assert!(report.contains("|overall|fail|pass|"));
        assert!(report.contains("- Spacing variance decreased"));
        assert!(report.contains("\"css_collisions\": 3"));
    }
}
