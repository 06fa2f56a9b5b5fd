//! Row geometry metrics.

use probe_harness::LayoutRecord;
use serde::Serialize;

/// Allowed distance between an icon's top and its title's top, in px.
pub const ICON_TOLERANCE: f64 = 2.0;

/// Vertical gaps between consecutive rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Spacing {
    /// `next.top - prev.bottom`, rounded to 2 decimals
    pub gaps: Vec<f64>,
    /// Population variance of `gaps`; 0 with fewer than two rows
    pub variance: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count
}

pub fn spacing(records: &[LayoutRecord]) -> Spacing {
    let gaps: Vec<f64> = records
        .windows(2)
        .map(|pair| round2(pair[1].top - pair[0].bottom))
        .collect();
    Spacing {
        variance: variance(&gaps),
        gaps,
    }
}

/// Spread of non-zero button heights across all rows; 0 when there are none.
pub fn button_height_range(records: &[LayoutRecord]) -> f64 {
    let heights = records
        .iter()
        .flat_map(|record| record.button_heights.iter().copied())
        .filter(|height| *height != 0.0);
    let (min, max) = heights.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), height| {
        (lo.min(height), hi.max(height))
    });
    if min.is_finite() { max - min } else { 0.0 }
}

/// Rows whose icon and title tops differ by more than `tolerance`.
/// Rows missing either element are not counted.
pub fn misaligned_icons(records: &[LayoutRecord], tolerance: f64) -> usize {
    records
        .iter()
        .filter(|record| match (record.icon_top, record.text_top) {
            (Some(icon), Some(text)) => (icon - text).abs() > tolerance,
            _ => false,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(top: f64, bottom: f64) -> LayoutRecord {
        LayoutRecord {
            id: None,
            top,
            bottom,
            height: bottom - top,
            icon_top: None,
            text_top: None,
            button_heights: Vec::new(),
            button_top: None,
        }
    }

    #[test]
    fn spacing_gaps_and_variance() {
        let records = [record(0.0, 40.0), record(48.0, 88.0), record(100.004, 140.0)];
        let result = spacing(&records);
        assert_eq!(result.gaps, [8.0, 12.0]);
        assert_eq!(result.variance, 4.0);
        assert_eq!(spacing(&records[..1]), Spacing::default());
    }

    #[test]
    fn button_range_ignores_zero_heights() {
        let mut first = record(0.0, 40.0);
        first.button_heights = vec![24.0, 0.0, 28.5];
        let mut second = record(48.0, 88.0);
        second.button_heights = vec![26.0];
        assert_eq!(button_height_range(&[first, second]), 4.5);
        assert_eq!(button_height_range(&[record(0.0, 1.0)]), 0.0);
    }

    #[test]
    fn icon_alignment_uses_tolerance() {
        let mut aligned = record(0.0, 40.0);
        aligned.icon_top = Some(10.0);
        aligned.text_top = Some(12.0);
        let mut off = record(48.0, 88.0);
        off.icon_top = Some(48.0);
        off.text_top = Some(58.0);
        let mut missing = record(96.0, 136.0);
        missing.icon_top = Some(0.0);
        assert_eq!(misaligned_icons(&[aligned, off, missing], ICON_TOLERANCE), 1);
    }
}
