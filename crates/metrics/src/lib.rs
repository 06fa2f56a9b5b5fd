//! Summaries of UI probe measurements.
//!
//! Turns the layout records and global measurements read from a
//! [`probe_harness::Harness`] into layout metrics, checks them against
//! acceptance thresholds and compares a "before" page with an "after" page.

#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod compare;
pub mod dom;
pub mod geometry;
pub mod summary;

pub use compare::{Comparison, MetricDelta, compare};
pub use dom::{DomValidation, validate_dom};
pub use geometry::{ICON_TOLERANCE, Spacing, button_height_range, misaligned_icons, spacing};
pub use summary::{LayoutMetrics, Thresholds, Verdict, evaluate, summarize};
