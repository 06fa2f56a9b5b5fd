//! Page-lifetime measurement state.
//!
//! Each field has exactly one writer: the collision detector owns the
//! collision count, the hover instrumentor owns the latency and the
//! snapshotter owns the DOM snapshot.

use crate::snapshot::SnapshotNode;

/// Hover latency reported before any pointer interaction, in milliseconds.
pub const DEFAULT_HOVER_LATENCY_MS: f64 = 0.0;

#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementState {
    css_collision_count: u32,
    last_hover_latency: f64,
    dom_snapshot: Option<SnapshotNode>,
}

impl Default for MeasurementState {
    fn default() -> Self {
        Self {
            css_collision_count: 0,
            last_hover_latency: DEFAULT_HOVER_LATENCY_MS,
            dom_snapshot: None,
        }
    }
}

impl MeasurementState {
    pub const fn css_collision_count(&self) -> u32 {
        self.css_collision_count
    }

    pub const fn last_hover_latency(&self) -> f64 {
        self.last_hover_latency
    }

    pub const fn dom_snapshot(&self) -> Option<&SnapshotNode> {
        self.dom_snapshot.as_ref()
    }

    pub(crate) const fn record_collisions(&mut self, count: u32) {
        self.css_collision_count = count;
    }

    /// Last interaction wins.
    pub(crate) const fn record_hover_latency(&mut self, millis: f64) {
        self.last_hover_latency = millis;
    }

    /// Replaces any earlier snapshot.
    pub(crate) fn record_snapshot(&mut self, snapshot: Option<SnapshotNode>) {
        self.dom_snapshot = snapshot;
    }
}
